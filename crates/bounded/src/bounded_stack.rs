use super::OutOfBoundsAccess;
use alloc::vec::Vec;
use core::slice;

/// A LIFO stack that never holds more than a fixed number of elements.
///
/// The capacity is reserved up front so pushing never reallocates. Worklists
/// whose elements are pushed at most once per round use the capacity as a
/// hard upper bound on the amount of work of that round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedStack<T> {
    capacity: usize,
    stack: Vec<T>,
}

impl<T> Default for BoundedStack<T> {
    fn default() -> Self {
        Self {
            capacity: 0,
            stack: Vec::default(),
        }
    }
}

impl<T> BoundedStack<T> {
    /// Creates an empty stack that can hold up to `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            stack: Vec::with_capacity(capacity),
        }
    }

    /// Returns the length of the bounded stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns the capacity of the bounded stack.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the bounded stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Returns `true` if the bounded stack is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Returns a shared reference to the last value of the stack if any.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.stack.last()
    }

    /// Pushes the value to the bounded stack.
    ///
    /// # Errors
    ///
    /// If the bounded stack is full already.
    #[inline]
    pub fn try_push(&mut self, new_value: T) -> Result<(), OutOfBoundsAccess> {
        if self.is_full() {
            return Err(OutOfBoundsAccess {
                index: self.len(),
                len: self.capacity(),
            })
        }
        self.stack.push(new_value);
        Ok(())
    }

    /// Pushes the value to the bounded stack.
    ///
    /// # Panics
    ///
    /// If the bounded stack is full already.
    #[inline]
    pub fn push(&mut self, new_value: T) {
        self.try_push(new_value).unwrap_or_else(|_| {
            panic!(
                "pushed more elements to bounded stack than its capacity of {}",
                self.capacity()
            )
        })
    }

    /// Pops the last value from the bounded stack if any.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.stack.pop()
    }

    /// Removes all elements while keeping the reserved capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Returns an iterator over the stack from bottom to top.
    #[inline]
    pub fn iter(&self) -> slice::Iter<T> {
        self.stack.iter()
    }
}

impl<'a, T> IntoIterator for &'a BoundedStack<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
