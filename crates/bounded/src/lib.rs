#![forbid(unsafe_code)]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod bounded_array;
pub mod bounded_bitmap;
pub mod bounded_stack;

pub use self::{
    bounded_array::BoundedArray,
    bounded_bitmap::BoundedBitmap,
    bounded_stack::BoundedStack,
};
use core::fmt;

/// Error returned when a bounded collection is accessed outside of its bounds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OutOfBoundsAccess {
    /// The offending raw index.
    pub index: usize,
    /// The length or capacity of the accessed collection.
    pub len: usize,
}

impl fmt::Display for OutOfBoundsAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} is out of bounds for a bounded collection of length {}",
            self.index, self.len
        )
    }
}

/// Typed keys for the bounded collections.
///
/// Implemented by the identifier types of the planning task so that an
/// operator table can never be indexed by a variable and vice versa.
pub trait Index: Copy + Clone {
    /// Creates a new key from the given raw index.
    fn from_index(index: usize) -> Self;
    /// Returns the raw index of the key.
    fn into_index(self) -> usize;
}

impl Index for usize {
    #[inline]
    fn from_index(index: usize) -> Self {
        index
    }

    #[inline]
    fn into_index(self) -> usize {
        self
    }
}

/// Checks the raw index of `index` against `len`.
#[inline]
fn ensure_in_bounds<Idx: Index>(index: Idx, len: usize) -> Result<usize, OutOfBoundsAccess> {
    let index = index.into_index();
    if index >= len {
        return Err(OutOfBoundsAccess { index, len })
    }
    Ok(index)
}
