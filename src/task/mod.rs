//! Finite-domain planning tasks.
//!
//! A task consists of variables with finite domains, operators with
//! precondition and effect atoms, an initial state and a goal. Tasks are
//! immutable once built; the pruning methods derive all of their static
//! indices from them at setup.

mod atom;
mod builder;
mod operator;
pub mod parser;
mod state;

pub use self::{
    atom::{
        Atom,
        AtomIndex,
        AtomLayout,
        Variable,
    },
    builder::{
        AtomContext,
        TaskBuilder,
        TaskError,
    },
    operator::{
        Cost,
        Operator,
        OperatorId,
    },
    state::State,
};
use bounded::BoundedArray;

/// A validated planning task.
///
/// Created through the [`TaskBuilder`] or the [`parser`].
#[derive(Debug, Clone)]
pub struct Task {
    layout: AtomLayout,
    operators: BoundedArray<OperatorId, Operator>,
    initial_state: State,
    goal: Vec<Atom>,
}

impl Task {
    /// Returns the domain sizes and atom numbering of the task.
    #[inline]
    pub fn layout(&self) -> &AtomLayout {
        &self.layout
    }

    /// Returns the number of operators.
    #[inline]
    pub fn num_operators(&self) -> usize {
        self.operators.len()
    }

    /// Returns the operator with the given identifier.
    ///
    /// # Panics
    ///
    /// If the identifier does not belong to the task.
    #[inline]
    pub fn operator(&self, id: OperatorId) -> &Operator {
        &self.operators[id]
    }

    /// Returns all operators together with their identifiers in enumeration order.
    pub fn operators(&self) -> impl Iterator<Item = (OperatorId, &Operator)> + '_ {
        self.operators.iter_indexed()
    }

    /// Returns the initial state.
    #[inline]
    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    /// Returns the goal atoms in variable order.
    #[inline]
    pub fn goal(&self) -> &[Atom] {
        &self.goal
    }

    /// Returns `true` if the state satisfies every goal atom.
    pub fn is_goal_state(&self, state: &State) -> bool {
        state.satisfies_all(&self.goal)
    }

    /// Collects the operators applicable in the state in enumeration order.
    ///
    /// Clears `applicable` before filling it.
    pub fn applicable_operators(&self, state: &State, applicable: &mut Vec<OperatorId>) {
        applicable.clear();
        applicable.extend(
            self.operators()
                .filter(|(_, operator)| state.satisfies_all(operator.preconditions()))
                .map(|(id, _)| id),
        );
    }
}
