//! Atom-centric stubborn sets for pruning the applicable operators of
//! finite-domain planning tasks.
//!
//! The crate contains a small planning task model, a parser for a line-based
//! task format, the stubborn set pruning framework with its atom-centric
//! computation and a uniform cost search to drive it.
//!
//! # Example
//!
//! ```
//! use stubborn_sets::{
//!     config::{AtomCentricConfig, PruningConfig, SearchConfig},
//!     pruning::AtomCentricStubbornSets,
//!     search::UniformCostSearch,
//!     task::parser::parse_task,
//! };
//!
//! let task = parse_task("
//!     variables 2 2
//!     init 0 0
//!     goal 0=1
//!     operator set-a
//!     eff 0=1
//!     end
//!     operator set-b
//!     eff 1=1
//!     end
//! ").unwrap();
//! let pruning = AtomCentricStubbornSets::atom_centric(
//!     AtomCentricConfig::default(),
//!     PruningConfig::default(),
//! ).unwrap();
//! let mut search = UniformCostSearch::new(&task, pruning, SearchConfig::default());
//! let outcome = search.run();
//! assert_eq!(outcome.plan().map(|plan| plan.cost()), Some(1));
//! assert_eq!(search.pruning_statistics().successors_after_pruning, 1);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod logging;
pub mod pruning;
pub mod search;
pub mod task;


use crate::{
    config::ConfigError,
    task::{
        parser::ParseError,
        TaskError,
    },
};
use core::fmt;

/// Errors that may be encountered when setting up a search.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Task(TaskError),
    Parse(ParseError),
    Config(ConfigError),
}

impl From<TaskError> for Error {
    fn from(err: TaskError) -> Self {
        Self::Task(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(err) => write!(f, "invalid task: {}", err),
            Self::Parse(err) => write!(f, "could not parse task: {}", err),
            Self::Config(err) => write!(f, "invalid configuration: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Task(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}
