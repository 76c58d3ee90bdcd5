use super::{
    ensure_in_bounds,
    Index,
    OutOfBoundsAccess,
};
use alloc::vec::Vec;
use core::{
    iter::FromIterator,
    marker::PhantomData,
    ops,
    slice,
};

/// A fixed length array that is indexed by a typed key.
///
/// The length is decided once at construction. Per-variable, per-operator and
/// per-atom tables of a planning task are all stored this way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedArray<Idx, T> {
    values: Vec<T>,
    marker: PhantomData<fn() -> Idx>,
}

impl<Idx, T> Default for BoundedArray<Idx, T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            marker: Default::default(),
        }
    }
}

impl<Idx, T> FromIterator<T> for BoundedArray<Idx, T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            values: iter.into_iter().collect(),
            marker: Default::default(),
        }
    }
}

impl<Idx, T> BoundedArray<Idx, T> {
    /// Returns the length of the bounded array.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the bounded array has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the values of the array in index order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Returns an iterator yielding shared references over the array values.
    #[inline]
    pub fn iter(&self) -> slice::Iter<T> {
        self.values.iter()
    }

    /// Returns an iterator yielding exclusive references over the array values.
    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<T> {
        self.values.iter_mut()
    }
}

impl<Idx, T> BoundedArray<Idx, T>
where
    Idx: Index,
{
    /// Creates a bounded array of the given length.
    ///
    /// Every slot is initialized by the given closure with its key.
    pub fn with_len<F>(len: usize, mut init: F) -> Self
    where
        F: FnMut(Idx) -> T,
    {
        Self {
            values: (0..len).map(|idx| init(Idx::from_index(idx))).collect(),
            marker: Default::default(),
        }
    }

    /// Returns a shared reference to the element at the given index.
    ///
    /// # Errors
    ///
    /// If the given index is out of bounds for the bounded array.
    #[inline]
    pub fn get(&self, index: Idx) -> Result<&T, OutOfBoundsAccess> {
        ensure_in_bounds(index, self.len()).map(move |index| &self.values[index])
    }

    /// Returns an exclusive reference to the element at the given index.
    ///
    /// # Errors
    ///
    /// If the given index is out of bounds for the bounded array.
    #[inline]
    pub fn get_mut(&mut self, index: Idx) -> Result<&mut T, OutOfBoundsAccess> {
        ensure_in_bounds(index, self.len()).map(move |index| &mut self.values[index])
    }

    /// Updates the value of the element at the given index.
    ///
    /// # Errors
    ///
    /// If the given index is out of bounds for the bounded array.
    #[inline]
    pub fn update(&mut self, index: Idx, new_value: T) -> Result<(), OutOfBoundsAccess> {
        self.get_mut(index).map(|slot| *slot = new_value)
    }

    /// Returns an iterator over the keys and values of the array.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (Idx, &T)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (Idx::from_index(index), value))
    }
}

impl<Idx, T> BoundedArray<Idx, T>
where
    T: Clone,
{
    /// Overwrites every slot of the array with the given value.
    ///
    /// The length of the array is left untouched and nothing is reallocated.
    #[inline]
    pub fn fill(&mut self, value: T) {
        for slot in &mut self.values {
            slot.clone_from(&value);
        }
    }
}

impl<'a, Idx, T> IntoIterator for &'a BoundedArray<Idx, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, Idx, T> IntoIterator for &'a mut BoundedArray<Idx, T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<Idx, T> ops::Index<Idx> for BoundedArray<Idx, T>
where
    Idx: Index,
{
    type Output = T;

    /// Returns a shared reference to the value at the given index.
    ///
    /// # Panics
    ///
    /// If the index is out of bounds.
    #[inline]
    fn index(&self, index: Idx) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|err| panic!("encountered invalid key: {}", err))
    }
}

impl<Idx, T> ops::IndexMut<Idx> for BoundedArray<Idx, T>
where
    Idx: Index,
{
    /// Returns an exclusive reference to the value at the given index.
    ///
    /// # Panics
    ///
    /// If the index is out of bounds.
    #[inline]
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        self.get_mut(index)
            .unwrap_or_else(|err| panic!("encountered invalid key: {}", err))
    }
}
