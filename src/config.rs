//! Configuration of the pruning methods and the search.
//!
//! All configuration is validated once at setup. Nothing in here is consulted
//! on a per-state basis except through the values copied out of it.

use crate::pruning::atom_centric::AtomSelectionStrategy;
use core::fmt;

pub mod defaults {
    use super::AtomSelectionStrategy;

    pub const USE_SIBLING_SHORTCUT: bool = true;
    pub const ATOM_SELECTION_STRATEGY: AtomSelectionStrategy = AtomSelectionStrategy::QuickSkip;
    pub const MIN_REQUIRED_PRUNING_RATIO: f64 = 0.0;
    pub const EXPANSIONS_BEFORE_CHECKING_PRUNING_RATIO: usize = 1000;
}

/// Errors in a configuration, reported before any state is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The identifier does not name one of the atom selection strategies.
    UnknownAtomSelectionStrategy(String),
    /// The minimum pruning ratio lies outside of `[0, 1]`.
    InvalidPruningRatio(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAtomSelectionStrategy(name) => {
                write!(
                    f,
                    "unknown atom selection strategy `{}`, expected one of {}",
                    name,
                    AtomSelectionStrategy::NAMES.join(", ")
                )
            }
            Self::InvalidPruningRatio(ratio) => {
                write!(f, "minimum pruning ratio {} is not within [0, 1]", ratio)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration of the atom-centric stubborn set computation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AtomCentricConfig {
    /// Use variable-based marking in addition to atom-based marking.
    pub use_sibling_shortcut: bool,
    /// How to pick one unsatisfied atom out of a goal or precondition.
    pub atom_selection_strategy: AtomSelectionStrategy,
}

impl Default for AtomCentricConfig {
    fn default() -> Self {
        Self {
            use_sibling_shortcut: defaults::USE_SIBLING_SHORTCUT,
            atom_selection_strategy: defaults::ATOM_SELECTION_STRATEGY,
        }
    }
}

impl AtomCentricConfig {
    /// Creates the configuration from the textual options.
    ///
    /// # Errors
    ///
    /// If the strategy identifier is unknown.
    pub fn from_options(use_sibling_shortcut: bool, strategy: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            use_sibling_shortcut,
            atom_selection_strategy: strategy.parse()?,
        })
    }
}

/// Options shared by all stubborn set pruning methods.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PruningConfig {
    /// Disable pruning if the ratio of pruned operators falls below this
    /// value once the check is made.
    pub min_required_pruning_ratio: f64,
    /// Number of pruning calls after which the pruning ratio is checked.
    pub expansions_before_checking_pruning_ratio: usize,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            min_required_pruning_ratio: defaults::MIN_REQUIRED_PRUNING_RATIO,
            expansions_before_checking_pruning_ratio: defaults::EXPANSIONS_BEFORE_CHECKING_PRUNING_RATIO,
        }
    }
}

impl PruningConfig {
    /// Checks that the options are within their valid ranges.
    ///
    /// # Errors
    ///
    /// If the minimum pruning ratio is not within `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.min_required_pruning_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::InvalidPruningRatio(ratio))
        }
        Ok(())
    }
}

/// Limits of the search.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Stop after this many expansions if set.
    pub max_expansions: Option<usize>,
}
