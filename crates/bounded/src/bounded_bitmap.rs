use super::{
    ensure_in_bounds,
    Index,
    OutOfBoundsAccess,
};
use alloc::vec::Vec;
use core::marker::PhantomData;

type Chunk = u64;
const CHUNK_LEN: usize = core::mem::size_of::<Chunk>() * 8;

/// Splits a raw bit index into its chunk position and the mask within that chunk.
#[inline]
fn split_index(index: usize) -> (usize, Chunk) {
    (index / CHUNK_LEN, 1 << (index % CHUNK_LEN))
}

/// A fixed length set of flags indexed by a typed key.
///
/// Stores one bit per key. Clearing all flags only touches one word per 64
/// keys which makes it cheap to reset between rounds of a fixpoint computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedBitmap<Idx> {
    len: usize,
    chunks: Vec<Chunk>,
    marker: PhantomData<fn() -> Idx>,
}

impl<Idx> Default for BoundedBitmap<Idx> {
    fn default() -> Self {
        Self {
            len: 0,
            chunks: Vec::new(),
            marker: Default::default(),
        }
    }
}

impl<Idx> BoundedBitmap<Idx> {
    /// Returns the number of chunks required to store `len` bits.
    fn required_chunks(len: usize) -> usize {
        (len + CHUNK_LEN - 1) / CHUNK_LEN
    }

    /// Creates a bitmap with `len` flags that are all unset.
    pub fn with_len(len: usize) -> Self {
        let mut chunks = Vec::new();
        chunks.resize(Self::required_chunks(len), 0);
        Self {
            len,
            chunks,
            marker: Default::default(),
        }
    }

    /// Returns the number of flags of the bitmap.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap has no flags.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unsets all flags.
    #[inline]
    pub fn clear(&mut self) {
        for chunk in &mut self.chunks {
            *chunk = 0;
        }
    }

    /// Returns the number of set flags.
    pub fn count_ones(&self) -> usize {
        self.chunks
            .iter()
            .map(|chunk| chunk.count_ones() as usize)
            .sum()
    }
}

impl<Idx> BoundedBitmap<Idx>
where
    Idx: Index,
{
    /// Returns `true` if the flag at the given index is set.
    ///
    /// # Errors
    ///
    /// If the index is out of bounds.
    #[inline]
    pub fn get(&self, index: Idx) -> Result<bool, OutOfBoundsAccess> {
        let (chunk, mask) = split_index(ensure_in_bounds(index, self.len)?);
        Ok(self.chunks[chunk] & mask != 0)
    }

    /// Sets the flag at the given index to the new value.
    ///
    /// # Errors
    ///
    /// If the index is out of bounds.
    #[inline]
    pub fn set(&mut self, index: Idx, new_value: bool) -> Result<(), OutOfBoundsAccess> {
        let (chunk, mask) = split_index(ensure_in_bounds(index, self.len)?);
        match new_value {
            true => self.chunks[chunk] |= mask,
            false => self.chunks[chunk] &= !mask,
        }
        Ok(())
    }

    /// Sets the flag at the given index.
    ///
    /// Returns `true` if the flag was unset before, similar to `HashSet::insert`.
    ///
    /// # Errors
    ///
    /// If the index is out of bounds.
    #[inline]
    pub fn insert(&mut self, index: Idx) -> Result<bool, OutOfBoundsAccess> {
        let (chunk, mask) = split_index(ensure_in_bounds(index, self.len)?);
        let was_unset = self.chunks[chunk] & mask == 0;
        self.chunks[chunk] |= mask;
        Ok(was_unset)
    }

    /// Returns an iterator over the keys of all set flags in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = Idx> + '_ {
        let len = self.len;
        self.chunks
            .iter()
            .enumerate()
            .flat_map(|(n, &chunk)| {
                (0..CHUNK_LEN)
                    .filter(move |bit| chunk & (1 << bit) != 0)
                    .map(move |bit| n * CHUNK_LEN + bit)
            })
            .take_while(move |&index| index < len)
            .map(Idx::from_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn default_works() {
        let map = <BoundedBitmap<usize>>::default();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn with_len_starts_unset() {
        let map = <BoundedBitmap<usize>>::with_len(70);
        assert_eq!(map.len(), 70);
        for i in 0..70 {
            assert_eq!(map.get(i), Ok(false));
        }
        assert_eq!(map.count_ones(), 0);
    }

    #[test]
    fn set_and_get_work() {
        let mut map = <BoundedBitmap<usize>>::with_len(3);
        map.set(0, true).unwrap();
        assert_eq!(map.get(0), Ok(true));
        map.set(0, false).unwrap();
        assert_eq!(map.get(0), Ok(false));
    }

    #[test]
    fn insert_reports_first_set() {
        let mut map = <BoundedBitmap<usize>>::with_len(100);
        assert_eq!(map.insert(65), Ok(true));
        assert_eq!(map.insert(65), Ok(false));
        assert_eq!(map.get(65), Ok(true));
        assert_eq!(map.get(64), Ok(false));
        assert_eq!(map.count_ones(), 1);
    }

    #[test]
    fn out_of_bounds_fails() {
        let mut map = <BoundedBitmap<usize>>::with_len(3);
        assert_eq!(map.get(3), Err(OutOfBoundsAccess { index: 3, len: 3 }));
        assert_eq!(map.set(3, true), Err(OutOfBoundsAccess { index: 3, len: 3 }));
        assert_eq!(map.insert(64), Err(OutOfBoundsAccess { index: 64, len: 3 }));
    }

    #[test]
    fn clear_unsets_all_multiword() {
        let len = 130;
        let mut map = <BoundedBitmap<usize>>::with_len(len);
        for i in (0..len).step_by(3) {
            map.set(i, true).unwrap();
        }
        assert_eq!(map.count_ones(), (len + 2) / 3);
        map.clear();
        assert_eq!(map.count_ones(), 0);
        assert_eq!(map.len(), len);
    }

    #[test]
    fn iter_ones_is_sorted() {
        let mut map = <BoundedBitmap<usize>>::with_len(200);
        for &i in &[199, 0, 64, 63, 128] {
            map.set(i, true).unwrap();
        }
        let ones = map.iter_ones().collect::<alloc::vec::Vec<_>>();
        assert_eq!(ones, vec![0, 63, 64, 128, 199]);
    }
}
