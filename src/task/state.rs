use super::{
    Atom,
    Operator,
    Variable,
};
use core::{
    fmt,
    ops,
};

/// A complete assignment of values to all variables of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    values: Box<[u32]>,
}

impl From<Vec<u32>> for State {
    fn from(values: Vec<u32>) -> Self {
        Self {
            values: values.into_boxed_slice(),
        }
    }
}

impl State {
    /// Returns the number of variables of the state.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the state has no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the values of all variables in variable order.
    #[inline]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Returns `true` if the atom holds in the state.
    #[inline]
    pub fn satisfies(&self, atom: Atom) -> bool {
        self[atom.var] == atom.value
    }

    /// Returns `true` if all atoms hold in the state.
    pub fn satisfies_all(&self, atoms: &[Atom]) -> bool {
        atoms.iter().all(|&atom| self.satisfies(atom))
    }

    /// Returns the state reached by applying the operator.
    ///
    /// Does not check whether the operator is applicable.
    pub fn successor(&self, operator: &Operator) -> Self {
        let mut values = self.values.clone();
        for effect in operator.effects() {
            values[effect.var.into_index()] = effect.value;
        }
        Self { values }
    }
}

impl ops::Index<Variable> for State {
    type Output = u32;

    #[inline]
    fn index(&self, var: Variable) -> &Self::Output {
        &self.values[var.into_index()]
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (n, value) in self.values.iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
