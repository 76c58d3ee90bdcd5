use super::Atom;
use bounded::Index;
use core::{
    convert::TryFrom,
    fmt,
};

/// Cost of an operator or of a plan.
pub type Cost = u64;

/// Identifies an operator by its position in the operator list of a task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OperatorId(u32);

impl OperatorId {
    /// Returns the operator identifier for the given index if valid.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// Returns the index of the operator.
    #[inline]
    pub fn into_index(self) -> usize {
        self.0 as usize
    }
}

impl Index for OperatorId {
    fn from_index(index: usize) -> Self {
        OperatorId::from_index(index).expect("encountered invalid operator index")
    }

    fn into_index(self) -> usize {
        self.into_index()
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

/// An operator with its precondition and effect atoms.
///
/// Preconditions and effects are kept sorted by variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    name: String,
    cost: Cost,
    preconditions: Vec<Atom>,
    effects: Vec<Atom>,
}

impl Operator {
    /// Creates a new operator, sorting its atoms into variable order.
    pub fn new<N>(name: N, cost: Cost, mut preconditions: Vec<Atom>, mut effects: Vec<Atom>) -> Self
    where
        N: Into<String>,
    {
        preconditions.sort_unstable();
        effects.sort_unstable();
        Self {
            name: name.into(),
            cost,
            preconditions,
            effects,
        }
    }

    /// Returns the name of the operator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cost of applying the operator.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Returns the precondition atoms in variable order.
    pub fn preconditions(&self) -> &[Atom] {
        &self.preconditions
    }

    /// Returns the effect atoms in variable order.
    pub fn effects(&self) -> &[Atom] {
        &self.effects
    }
}
