//! The owning, allocator-aware vector.

use crate::allocator::{Allocator, Global};
use crate::error::{or_panic, Result, StrideError};
use crate::ops;
use crate::traits::{AsView, Scalar};
use crate::view::{VectorRef, VectorRefMut};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut, Neg};
use std::ptr::{self, NonNull};
use std::slice;

/// Pointer to slot `index` of a block starting at `base`.
///
/// # Safety
/// `index` must lie within the block `base` was allocated with.
unsafe fn slot<T>(base: NonNull<T>, index: usize) -> NonNull<T> {
    NonNull::new_unchecked(base.as_ptr().add(index))
}

/// A block whose elements are still being constructed.
///
/// Dropping it (on an error or while unwinding out of an element constructor)
/// destroys the elements built so far and frees the block.
struct PartialBlock<'a, T, A: Allocator> {
    alloc: &'a A,
    ptr: NonNull<T>,
    capacity: usize,
    built: usize,
}

impl<T, A: Allocator> Drop for PartialBlock<'_, T, A> {
    fn drop(&mut self) {
        log::warn!(
            "Rolling back partially constructed block ({} of {} elements built)",
            self.built,
            self.capacity
        );
        unsafe {
            for i in 0..self.built {
                self.alloc.destroy(slot(self.ptr, i));
            }
            self.alloc.deallocate(self.ptr, self.capacity);
        }
    }
}

/// A contiguous, fixed-length sequence of `T` whose storage comes from `A`.
///
/// An empty vector owns no storage and never touches its allocator. A
/// non-empty one holds exactly `len()` constructed elements, with no spare
/// capacity. Views obtained through [`as_view`](Self::as_view) and
/// [`as_view_mut`](Self::as_view_mut) borrow the vector, so it cannot be
/// reset, reassigned or dropped while they are in use.
pub struct Vector<T, A: Allocator = Global> {
    alloc: A,
    ptr: NonNull<T>,
    len: usize,
    _marker: PhantomData<T>,
}

// SAFETY: the vector uniquely owns its elements, like Box<[T]>.
unsafe impl<T: Send, A: Allocator + Send> Send for Vector<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Vector<T, A> {}

impl<T> Vector<T> {
    /// An empty vector on the global allocator.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// `count` default values.
    pub fn with_len(count: usize) -> Result<Self>
    where
        T: Default,
    {
        Self::with_len_in(count, Global)
    }

    /// `count` clones of `value`.
    pub fn from_elem(count: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_elem_in(count, value, Global)
    }

    pub fn from_slice(items: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_slice_in(items, Global)
    }

    /// Copies the elements of any view.
    pub fn from_view<R>(src: &R) -> Result<Self>
    where
        T: Clone,
        R: AsView<T> + ?Sized,
    {
        Self::from_view_in(src, Global)
    }

    /// Collects an iterator whose length is known up front.
    pub fn try_from_iter<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Self::from_iter_in(items, Global)
    }
}

impl<T, A: Allocator> Vector<T, A> {
    pub fn new_in(alloc: A) -> Self {
        Self {
            alloc,
            ptr: NonNull::dangling(),
            len: 0,
            _marker: PhantomData,
        }
    }

    pub fn with_len_in(count: usize, alloc: A) -> Result<Self>
    where
        T: Default,
    {
        Self::build(count, iter::repeat_with(T::default), alloc)
    }

    pub fn from_elem_in(count: usize, value: T, alloc: A) -> Result<Self>
    where
        T: Clone,
    {
        Self::build(count, iter::repeat(value), alloc)
    }

    pub fn from_slice_in(items: &[T], alloc: A) -> Result<Self>
    where
        T: Clone,
    {
        Self::build(items.len(), items.iter().cloned(), alloc)
    }

    /// Copies the elements of any view into storage from `alloc`.
    ///
    /// There is no way to move out of a view, so this is also how a vector is
    /// built "from" a view that is no longer needed.
    pub fn from_view_in<R>(src: &R, alloc: A) -> Result<Self>
    where
        T: Clone,
        R: AsView<T> + ?Sized,
    {
        let view = src.as_view();
        Self::build(view.len(), view.iter().cloned(), alloc)
    }

    /// Collects an iterator whose length is known up front.
    ///
    /// # Errors
    /// `StrideError::AllocationFailure` if storage cannot be obtained, and
    /// `StrideError::SizeMismatch` if the iterator ends before the length it
    /// reported. Either way nothing is leaked.
    pub fn from_iter_in<I>(items: I, alloc: A) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        Self::build(items.len(), items, alloc)
    }

    /// Allocates `count` slots and constructs them from `items`, in order.
    fn build<I>(count: usize, items: I, alloc: A) -> Result<Self>
    where
        I: Iterator<Item = T>,
    {
        if count == 0 {
            return Ok(Self::new_in(alloc));
        }
        log::trace!(
            "Allocating {} elements of {} bytes",
            count,
            mem::size_of::<T>()
        );
        let ptr = alloc.allocate::<T>(count)?;
        let mut block = PartialBlock {
            alloc: &alloc,
            ptr,
            capacity: count,
            built: 0,
        };
        for item in items.take(count) {
            unsafe { alloc.construct(slot(ptr, block.built), item) };
            block.built += 1;
        }
        if block.built != count {
            let built = block.built;
            drop(block);
            return Err(StrideError::SizeMismatch {
                lhs: count,
                rhs: built,
            });
        }
        mem::forget(block);
        Ok(Self {
            alloc,
            ptr,
            len: count,
            _marker: PhantomData,
        })
    }

    /// Deep copy using a clone of this vector's allocator.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        self.try_clone_in(self.alloc.clone())
    }

    pub fn try_clone_in<B: Allocator>(&self, alloc: B) -> Result<Vector<T, B>>
    where
        T: Clone,
    {
        Vector::from_slice_in(self.as_slice(), alloc)
    }

    /// Moves the contents out, leaving `self` empty with the same allocator.
    pub fn take(&mut self) -> Self {
        let empty = Self::new_in(self.alloc.clone());
        mem::replace(self, empty)
    }

    /// Replaces the contents with a copy of `src`.
    ///
    /// The new storage is fully built before the old is released, so on error
    /// `self` is unchanged.
    pub fn assign_view<R>(&mut self, src: &R) -> Result<()>
    where
        T: Clone,
        R: AsView<T> + ?Sized,
    {
        *self = Self::from_view_in(src, self.alloc.clone())?;
        Ok(())
    }

    /// Replaces the contents with `count` clones of `value`.
    pub fn assign_elem(&mut self, count: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        *self = Self::from_elem_in(count, value, self.alloc.clone())?;
        Ok(())
    }

    pub fn assign_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        *self = Self::from_slice_in(items, self.alloc.clone())?;
        Ok(())
    }

    pub fn assign_iter<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        *self = Self::from_iter_in(items, self.alloc.clone())?;
        Ok(())
    }

    /// Destroys every element and frees the storage. The vector stays usable.
    pub fn reset(&mut self) {
        if self.len == 0 {
            return;
        }
        let (ptr, len) = (self.ptr, self.len);
        // Empty first: a panicking destructor leaks rather than double-frees.
        self.ptr = NonNull::dangling();
        self.len = 0;
        log::trace!("Releasing {} elements", len);
        unsafe {
            for i in 0..len {
                self.alloc.destroy(slot(ptr, i));
            }
            self.alloc.deallocate(ptr, len);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for len initialized elements (dangling when 0).
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Step-1 view of the whole vector.
    pub fn as_view(&self) -> VectorRef<'_, T> {
        VectorRef::new(self.as_slice())
    }

    pub fn as_view_mut(&mut self) -> VectorRefMut<'_, T> {
        VectorRefMut::new(self.as_mut_slice())
    }

    pub fn at(&self, index: usize) -> Result<&T> {
        self.as_slice().get(index).ok_or(StrideError::OutOfRange {
            index,
            len: self.len,
        })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(StrideError::OutOfRange { index, len })
    }

    /// Exchanges storage and allocators with `other` in O(1).
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Exchanges elements with a view of the same length.
    ///
    /// A view owns nothing to hand over, so unlike [`swap_with`](Self::swap_with)
    /// this copies element by element.
    ///
    /// # Errors
    /// `StrideError::SizeMismatch` if the lengths differ; nothing is swapped.
    pub fn swap_with_view(&mut self, other: &mut VectorRefMut<'_, T>) -> Result<()> {
        self.as_view_mut().swap_elements(other)
    }

    pub fn add_in_place<R>(&mut self, rhs: &R) -> Result<&mut Self>
    where
        T: Scalar,
        R: AsView<T> + ?Sized,
    {
        self.as_view_mut().add_in_place(rhs)?;
        Ok(self)
    }

    pub fn sub_in_place<R>(&mut self, rhs: &R) -> Result<&mut Self>
    where
        T: Scalar,
        R: AsView<T> + ?Sized,
    {
        self.as_view_mut().sub_in_place(rhs)?;
        Ok(self)
    }

    pub fn mul_in_place(&mut self, rhs: T) -> &mut Self
    where
        T: Scalar,
    {
        self.as_view_mut().mul_in_place(rhs);
        self
    }

    pub fn div_in_place(&mut self, rhs: T) -> Result<&mut Self>
    where
        T: Scalar,
    {
        self.as_view_mut().div_in_place(rhs)?;
        Ok(self)
    }

    /// A negated copy on this vector's allocator (unary `-`).
    pub fn negated(&self) -> Result<Self>
    where
        T: Clone + Neg<Output = T>,
    {
        ops::neg_in(self, self.alloc.clone())
    }

    pub fn lexicographic_cmp<R>(&self, other: &R) -> Result<Option<Ordering>>
    where
        T: PartialOrd,
        R: AsView<T> + ?Sized,
    {
        ops::lexicographic_cmp(self, other)
    }

    /// The element storage as raw bytes.
    #[cfg(feature = "pod")]
    pub fn as_bytes(&self) -> &[u8]
    where
        T: bytemuck::Pod,
    {
        bytemuck::cast_slice(self.as_slice())
    }
}

impl<T, A: Allocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> AsView<T> for Vector<T, A> {
    fn as_view(&self) -> VectorRef<'_, T> {
        Vector::as_view(self)
    }
}

impl<'a, T, A: Allocator> From<&'a Vector<T, A>> for VectorRef<'a, T> {
    fn from(vector: &'a Vector<T, A>) -> Self {
        vector.as_view()
    }
}

impl<'a, T, A: Allocator> From<&'a mut Vector<T, A>> for VectorRefMut<'a, T> {
    fn from(vector: &'a mut Vector<T, A>) -> Self {
        vector.as_view_mut()
    }
}

impl<T: Clone, A: Allocator> Clone for Vector<T, A> {
    /// # Panics
    /// If the allocator cannot provide storage; use
    /// [`try_clone`](Vector::try_clone) to handle that case.
    fn clone(&self) -> Self {
        or_panic(self.try_clone())
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> FromIterator<T> for Vector<T> {
    /// # Panics
    /// If the global allocator cannot provide storage.
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        let items = items.into_iter();
        match items.size_hint() {
            (lower, Some(upper)) if lower == upper => {
                or_panic(Self::build(lower, items, Global))
            }
            // Unknown length: the block is sized once, so stage the items first.
            _ => {
                let staged: Vec<T> = items.collect();
                or_panic(Self::from_iter_in(staged, Global))
            }
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let this = ManuallyDrop::new(self);
        IntoIter {
            // SAFETY: `this` is never dropped, so the allocator is read exactly once.
            alloc: unsafe { ptr::read(&this.alloc) },
            ptr: this.ptr,
            capacity: this.len,
            front: 0,
            back: this.len,
        }
    }
}

/// Consuming iterator. Elements it yields are moved out of the block; the rest
/// are destroyed through the allocator when it is dropped.
pub struct IntoIter<T, A: Allocator = Global> {
    alloc: A,
    ptr: NonNull<T>,
    capacity: usize,
    front: usize,
    back: usize,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let item = unsafe { slot(self.ptr, self.front).as_ptr().read() };
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(unsafe { slot(self.ptr, self.back).as_ptr().read() })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

// SAFETY: the iterator uniquely owns the elements it has not yielded.
unsafe impl<T: Send, A: Allocator + Send> Send for IntoIter<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        if self.capacity == 0 {
            return;
        }
        unsafe {
            for i in self.front..self.back {
                self.alloc.destroy(slot(self.ptr, i));
            }
            self.alloc.deallocate(self.ptr, self.capacity);
        }
    }
}
