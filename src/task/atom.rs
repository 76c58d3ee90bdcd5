use bounded::{
    BoundedArray,
    Index,
};
use core::{
    convert::TryFrom,
    fmt,
};

/// A finite-domain state variable of a planning task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Variable {
    value: u32,
}

impl Variable {
    /// The maximum supported number of unique variables.
    pub const MAX_LEN: usize = u32::MAX as usize;

    /// Returns the variable for the given index if valid.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(|value| Self { value })
    }

    /// Returns the index of the variable.
    #[inline]
    pub fn into_index(self) -> usize {
        self.value as usize
    }
}

impl Index for Variable {
    fn from_index(index: usize) -> Self {
        Variable::from_index(index).expect("encountered invalid variable index")
    }

    fn into_index(self) -> usize {
        self.into_index()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.value)
    }
}

/// A variable together with one value of its domain.
///
/// Atoms are ordered by variable first and value second. Every sorted atom
/// sequence in this crate (preconditions, effects, the goal) follows this
/// order, which doubles as the deterministic tie-breaker of atom selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom {
    pub var: Variable,
    pub value: u32,
}

impl Atom {
    /// Creates the atom `var = value`.
    #[inline]
    pub fn new(var: Variable, value: u32) -> Self {
        Self { var, value }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.var, self.value)
    }
}

/// The position of an atom in the flat numbering of all atoms of a task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct AtomIndex(u32);

impl Index for AtomIndex {
    #[inline]
    fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("encountered invalid atom index"))
    }

    #[inline]
    fn into_index(self) -> usize {
        self.0 as usize
    }
}

/// Domain sizes of all variables and the flat atom numbering derived from them.
///
/// The atoms of variable `v` occupy the contiguous range
/// `offset(v) .. offset(v) + domain_size(v)`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AtomLayout {
    domain_sizes: BoundedArray<Variable, u32>,
    offsets: BoundedArray<Variable, u32>,
    num_atoms: usize,
}

impl AtomLayout {
    /// Creates the layout for variables with the given domain sizes.
    ///
    /// Returns `None` if the atoms of all variables do not fit into the `u32`
    /// atom numbering.
    pub fn new<I>(domain_sizes: I) -> Option<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let domain_sizes = domain_sizes.into_iter().collect::<BoundedArray<Variable, u32>>();
        let mut num_atoms = 0_u32;
        let mut offsets = Vec::with_capacity(domain_sizes.len());
        for &size in domain_sizes.iter() {
            offsets.push(num_atoms);
            num_atoms = num_atoms.checked_add(size)?;
        }
        Some(Self {
            domain_sizes,
            offsets: offsets.into_iter().collect(),
            num_atoms: num_atoms as usize,
        })
    }

    /// Returns the number of variables.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.domain_sizes.len()
    }

    /// Returns the total number of atoms over all variables.
    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    /// Returns the domain size of the variable.
    ///
    /// # Panics
    ///
    /// If the variable does not belong to the layout.
    #[inline]
    pub fn domain_size(&self, var: Variable) -> u32 {
        self.domain_sizes[var]
    }

    /// Returns all variables in order.
    pub fn variables(&self) -> impl Iterator<Item = Variable> {
        (0..self.num_variables()).map(<Variable as Index>::from_index)
    }

    /// Returns `true` if the atom names an existing variable and a value of its domain.
    pub fn contains(&self, atom: Atom) -> bool {
        self.domain_sizes
            .get(atom.var)
            .map(|&size| atom.value < size)
            .unwrap_or(false)
    }

    /// Returns the flat index of the atom.
    ///
    /// # Panics
    ///
    /// If the variable of the atom does not belong to the layout.
    #[inline]
    pub fn index(&self, atom: Atom) -> AtomIndex {
        debug_assert!(self.contains(atom), "atom {} is not part of the layout", atom);
        AtomIndex(self.offsets[atom.var] + atom.value)
    }

    /// Returns all atoms of the variable in value order.
    pub fn atoms_of(&self, var: Variable) -> impl Iterator<Item = Atom> {
        (0..self.domain_size(var)).map(move |value| Atom::new(var, value))
    }

    /// Returns all atoms of the same variable with a different value.
    pub fn siblings(&self, atom: Atom) -> impl Iterator<Item = Atom> {
        self.atoms_of(atom.var)
            .filter(move |sibling| sibling.value != atom.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(index: usize) -> Variable {
        Variable::from_index(index).unwrap()
    }

    #[test]
    fn atom_indices_are_contiguous_per_variable() {
        let layout = AtomLayout::new(vec![2, 3, 1]).unwrap();
        assert_eq!(layout.num_variables(), 3);
        assert_eq!(layout.num_atoms(), 6);
        let indices = layout
            .variables()
            .flat_map(|v| layout.atoms_of(v))
            .map(|atom| layout.index(atom).into_index())
            .collect::<Vec<_>>();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn atom_numbering_must_fit_into_u32() {
        assert!(AtomLayout::new(vec![u32::MAX, 2]).is_none());
        let layout = AtomLayout::new(vec![u32::MAX - 1, 1]).unwrap();
        assert_eq!(layout.num_atoms(), u32::MAX as usize);
    }

    #[test]
    fn siblings_skip_the_atom_itself() {
        let layout = AtomLayout::new(vec![4]).unwrap();
        let siblings = layout.siblings(Atom::new(var(0), 2)).collect::<Vec<_>>();
        assert_eq!(
            siblings,
            vec![Atom::new(var(0), 0), Atom::new(var(0), 1), Atom::new(var(0), 3)]
        );
    }

    #[test]
    fn contains_rejects_foreign_atoms() {
        let layout = AtomLayout::new(vec![2]).unwrap();
        assert!(layout.contains(Atom::new(var(0), 1)));
        assert!(!layout.contains(Atom::new(var(0), 2)));
        assert!(!layout.contains(Atom::new(var(1), 0)));
    }

    #[test]
    fn atoms_order_by_variable_first() {
        let mut atoms = vec![
            Atom::new(var(2), 0),
            Atom::new(var(0), 1),
            Atom::new(var(1), 0),
            Atom::new(var(0), 0),
        ];
        atoms.sort();
        assert_eq!(
            atoms,
            vec![
                Atom::new(var(0), 0),
                Atom::new(var(0), 1),
                Atom::new(var(1), 0),
                Atom::new(var(2), 0),
            ]
        );
    }
}
