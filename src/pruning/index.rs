use crate::task::{
    Atom,
    AtomIndex,
    AtomLayout,
    OperatorId,
    Task,
};
use bounded::BoundedArray;

/// Maps every atom of a task to a list of operators.
///
/// Used both for the achievers of an atom (operators with the atom as an
/// effect) and for its consumers (operators with the atom as a
/// precondition). Lists keep the order in which operators were registered,
/// which is the operator enumeration order when built from a task.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AtomOperatorIndex {
    layout: AtomLayout,
    operators: BoundedArray<AtomIndex, Vec<OperatorId>>,
}

impl AtomOperatorIndex {
    /// Creates an index with an empty list for every atom of the layout.
    pub fn new(layout: &AtomLayout) -> Self {
        Self {
            layout: layout.clone(),
            operators: BoundedArray::with_len(layout.num_atoms(), |_| Vec::new()),
        }
    }

    /// Builds the index of achievers: for every atom, the operators that have it as an effect.
    pub fn achievers(task: &Task) -> Self {
        let mut index = Self::new(task.layout());
        for (id, operator) in task.operators() {
            for &effect in operator.effects() {
                index.register(effect, id);
            }
        }
        index
    }

    /// Appends the operator to the list of the atom.
    ///
    /// # Panics
    ///
    /// If the atom does not belong to the layout of the index.
    pub fn register(&mut self, atom: Atom, operator: OperatorId) {
        let index = self.layout.index(atom);
        self.operators[index].push(operator);
    }

    /// Returns the operators registered for the atom.
    ///
    /// # Panics
    ///
    /// If the atom does not belong to the layout of the index.
    #[inline]
    pub fn get(&self, atom: Atom) -> &[OperatorId] {
        &self.operators[self.layout.index(atom)]
    }

    /// Returns the number of operators registered for the atom.
    #[inline]
    pub fn count(&self, atom: Atom) -> usize {
        self.get(atom).len()
    }

    /// Returns the layout the index was built for.
    pub fn layout(&self) -> &AtomLayout {
        &self.layout
    }
}
