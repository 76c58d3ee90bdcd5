//! Pruning of applicable operators during search.
//!
//! A [`PruningMethod`] is consulted once per expanded state with the list of
//! applicable operators and may remove operators that need not be considered
//! there. Stubborn set methods keep completeness and optimality of the search.

pub mod atom_centric;
mod index;
mod stubborn_sets;

pub use self::{
    atom_centric::{
        AtomCentric,
        AtomCentricStubbornSets,
    },
    index::AtomOperatorIndex,
    stubborn_sets::{
        find_unsatisfied_condition,
        StubbornSetCore,
        StubbornSetIndices,
        StubbornSets,
        StubbornTable,
    },
};
use crate::task::{
    OperatorId,
    State,
    Task,
};
use core::fmt;

/// Removes operators from the applicable operators of a state.
pub trait PruningMethod {
    /// One-time setup for the given task.
    fn initialize(&mut self, task: &Task);

    /// Removes the operators that need not be applied in the state.
    ///
    /// The order of the remaining operators is preserved. The state must not
    /// be a goal state.
    fn prune_operators(&mut self, state: &State, operators: &mut Vec<OperatorId>);

    /// Returns the statistics gathered since initialization.
    fn statistics(&self) -> PruningStatistics;
}

/// Counters of a pruning method.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PruningStatistics {
    /// Number of states for which pruning was actually computed.
    pub calls: u64,
    /// Sum of the numbers of applicable operators handed in.
    pub successors_before_pruning: u64,
    /// Sum of the numbers of operators that survived pruning.
    pub successors_after_pruning: u64,
    /// Whether pruning has been switched off because it pruned too little.
    pub disabled: bool,
}

impl PruningStatistics {
    /// Returns the fraction of operators removed so far.
    ///
    /// Returns `1.0` if no operators have been seen yet.
    pub fn pruning_ratio(&self) -> f64 {
        if self.successors_before_pruning == 0 {
            return 1.0
        }
        1.0 - self.successors_after_pruning as f64 / self.successors_before_pruning as f64
    }
}

impl fmt::Display for PruningStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total successors before pruning: {}", self.successors_before_pruning)?;
        writeln!(f, "total successors after pruning: {}", self.successors_after_pruning)?;
        write!(f, "pruning calls: {}", self.calls)?;
        if self.disabled {
            write!(f, " (pruning disabled)")?;
        }
        Ok(())
    }
}

/// A pruning method that keeps every applicable operator.
#[derive(Debug, Default, Clone)]
pub struct NullPruning {
    statistics: PruningStatistics,
}

impl PruningMethod for NullPruning {
    fn initialize(&mut self, _task: &Task) {
        self.statistics = PruningStatistics::default();
    }

    fn prune_operators(&mut self, _state: &State, operators: &mut Vec<OperatorId>) {
        self.statistics.successors_before_pruning += operators.len() as u64;
        self.statistics.successors_after_pruning += operators.len() as u64;
    }

    fn statistics(&self) -> PruningStatistics {
        self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pruning_ratio_of_fresh_statistics_is_one() {
        assert_eq!(PruningStatistics::default().pruning_ratio(), 1.0);
    }

    #[test]
    fn pruning_ratio_counts_removed_fraction() {
        let statistics = PruningStatistics {
            calls: 2,
            successors_before_pruning: 8,
            successors_after_pruning: 2,
            disabled: false,
        };
        assert_eq!(statistics.pruning_ratio(), 0.75);
    }
}
