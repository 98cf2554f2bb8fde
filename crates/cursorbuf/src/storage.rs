// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cell::RefCell;
use std::rc::Rc;

/// Backing memory of a buffer.
///
/// Usually owned by exactly one buffer. A shallow copy clones the handle, after which both
/// buffers see each other's writes until one of them replaces its storage (e.g. by growing).
///
/// Borrows of the inner cell never outlive a single call on this type, so they cannot conflict.
#[derive(Debug, Clone)]
pub(crate) struct Storage {
    bytes: Rc<RefCell<Box<[u8]>>>,
}

impl Storage {
    /// Allocates `len` zeroed bytes.
    pub(crate) fn zeroed(len: usize) -> Self {
        Self {
            bytes: Rc::new(RefCell::new(vec![0; len].into_boxed_slice())),
        }
    }

    /// Allocates `len` zeroed bytes and copies `content` to the front.
    ///
    /// `content` must not be longer than `len`.
    pub(crate) fn with_content(len: usize, content: &[u8]) -> Self {
        debug_assert!(content.len() <= len);

        let mut bytes = vec![0; len];
        bytes[..content.len()].copy_from_slice(content);

        Self {
            bytes: Rc::new(RefCell::new(bytes.into_boxed_slice())),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.borrow().len()
    }

    /// Copies `dst.len()` bytes starting at `offset` into `dst`.
    ///
    /// The caller has validated the range.
    pub(crate) fn copy_out(&self, offset: usize, dst: &mut [u8]) {
        let bytes = self.bytes.borrow();
        dst.copy_from_slice(&bytes[offset..offset + dst.len()]);
    }

    /// Copies `src` into the storage starting at `offset`.
    ///
    /// The caller has validated the range.
    pub(crate) fn copy_in(&self, offset: usize, src: &[u8]) {
        let mut bytes = self.bytes.borrow_mut();
        bytes[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Moves the bytes in `range` to the start of the storage.
    pub(crate) fn shift_to_front(&self, range: std::ops::Range<usize>) {
        self.bytes.borrow_mut().copy_within(range, 0);
    }

    /// Returns a copy of the first `len` bytes.
    pub(crate) fn to_vec(&self, len: usize) -> Vec<u8> {
        self.bytes.borrow()[..len].to_vec()
    }

    /// Creates independent storage of `new_len` bytes that starts with a copy of these bytes.
    ///
    /// `new_len` must be at least the current length. Returns `None` if the memory cannot be
    /// allocated.
    pub(crate) fn grown(&self, new_len: usize) -> Option<Self> {
        let bytes = self.bytes.borrow();

        let mut grown = Vec::new();
        grown.try_reserve_exact(new_len).ok()?;
        grown.extend_from_slice(&bytes);
        grown.resize(new_len, 0);

        Some(Self {
            bytes: Rc::new(RefCell::new(grown.into_boxed_slice())),
        })
    }

    /// Creates independent storage with identical length and content.
    pub(crate) fn deep_clone(&self) -> Self {
        let bytes = self.bytes.borrow();

        Self {
            bytes: Rc::new(RefCell::new(bytes.clone())),
        }
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.bytes, &other.bytes)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_has_requested_length() {
        let storage = Storage::zeroed(16);
        assert_eq!(storage.len(), 16);
        assert_eq!(storage.to_vec(16), vec![0; 16]);
    }

    #[test]
    fn copy_in_and_out() {
        let storage = Storage::zeroed(8);
        storage.copy_in(2, &[1, 2, 3]);

        let mut dst = [0_u8; 4];
        storage.copy_out(1, &mut dst);

        assert_eq!(dst, [0, 1, 2, 3]);
    }

    #[test]
    fn clone_aliases_but_grown_does_not() {
        let storage = Storage::with_content(4, &[9, 9]);
        let alias = storage.clone();
        let grown = storage.grown(8).unwrap();

        assert!(storage.ptr_eq(&alias));
        assert!(!storage.ptr_eq(&grown));
        assert_eq!(grown.to_vec(8), vec![9, 9, 0, 0, 0, 0, 0, 0]);

        alias.copy_in(0, &[1]);
        assert_eq!(storage.to_vec(2), vec![1, 9]);
        assert_eq!(grown.to_vec(2), vec![9, 9]);
    }

    #[test]
    fn grown_beyond_address_space_fails() {
        let storage = Storage::zeroed(4);

        assert!(storage.grown(usize::MAX).is_none());
        assert_eq!(storage.len(), 4);
    }

    #[test]
    fn deep_clone_is_independent() {
        let storage = Storage::with_content(4, &[1, 2, 3, 4]);
        let copy = storage.deep_clone();

        copy.copy_in(0, &[0xFF]);

        assert!(!storage.ptr_eq(&copy));
        assert_eq!(storage.to_vec(4), vec![1, 2, 3, 4]);
        assert_eq!(copy.to_vec(4), vec![0xFF, 2, 3, 4]);
    }

    #[test]
    fn shift_to_front_moves_suffix() {
        let storage = Storage::with_content(6, &[1, 2, 3, 4, 5, 6]);
        storage.shift_to_front(2..5);

        assert_eq!(storage.to_vec(3), vec![3, 4, 5]);
    }
}
