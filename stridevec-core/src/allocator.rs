//! Allocator handles used by [`Vector`](crate::Vector) to obtain and release
//! element storage.

use crate::error::{Result, StrideError};
use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;

/// A cloneable handle to a source of element storage.
///
/// Handles are stored by value inside every container and cloned along with
/// it, so an implementation should be cheap to clone (a reference to an arena,
/// not the arena itself). Containers only ever call these four methods.
pub trait Allocator: Clone {
    /// Allocates uninitialized storage for `count` values of `T`.
    ///
    /// # Errors
    /// Returns `StrideError::AllocationFailure` if the request cannot be satisfied.
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>>;

    /// Releases storage previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    /// `ptr` must come from `allocate::<T>(count)` on this allocator (or a clone
    /// of it) with the same `count`, and must not be used afterwards.
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize);

    /// Moves `value` into the uninitialized slot at `ptr`.
    ///
    /// # Safety
    /// `ptr` must point into storage obtained from this allocator and the slot
    /// must not hold a live value.
    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        ptr.as_ptr().write(value);
    }

    /// Drops the live value at `ptr`, leaving the slot uninitialized.
    ///
    /// # Safety
    /// `ptr` must point to a live value constructed through this allocator.
    unsafe fn destroy<T>(&self, ptr: NonNull<T>) {
        ptr.as_ptr().drop_in_place();
    }
}

/// The system heap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

impl Allocator for Global {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>> {
        let failure = || StrideError::AllocationFailure {
            count,
            elem_size: mem::size_of::<T>(),
        };
        let layout = Layout::array::<T>(count).map_err(|_| failure())?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or_else(|| {
            log::debug!("System allocator refused {} bytes", layout.size());
            failure()
        })
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        if let Ok(layout) = Layout::array::<T>(count) {
            if layout.size() != 0 {
                alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout);
            }
        }
    }
}
