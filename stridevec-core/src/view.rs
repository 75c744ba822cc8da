//! Non-owning strided views over contiguous storage.
//!
//! A view is described by the run of storage between its first and last
//! logical element plus a step size, so element `i` lives at raw offset
//! `i * step`. Views borrow that storage: the lifetime `'a` ties every view to
//! the owner of the elements, which cannot be reallocated, reset, reassigned
//! or dropped while the view is alive.

use crate::allocator::Allocator;
use crate::error::{or_panic, Result, StrideError};
use crate::ops;
use crate::traits::{AsView, Scalar};
use crate::vector::Vector;
use std::cmp::Ordering;
use std::fmt;
use std::iter::StepBy;
use std::mem;
use std::ops::{Index, IndexMut, Neg};
use std::slice;

/// Number of raw slots spanned from the first to the last of `len` elements.
fn span_of(len: usize, step: usize) -> Option<usize> {
    match len {
        0 => Some(0),
        n => (n - 1).checked_mul(step)?.checked_add(1),
    }
}

/// Logical length of a `[first, last)` range of `span` raw slots.
fn checked_len(span: usize, step: usize) -> Result<usize> {
    if step == 0 {
        log::debug!("Rejecting view with a zero step size");
        return Err(StrideError::InvalidRange(
            "step size must be at least 1".to_string(),
        ));
    }
    if span % step != 0 {
        log::debug!("Rejecting view: span {} is not a multiple of step {}", span, step);
        return Err(StrideError::InvalidRange(format!(
            "range of {} elements is not a multiple of step size {}",
            span, step
        )));
    }
    Ok(span / step)
}

/// Raw slots needed for `len` elements `step` apart within `available` slots.
fn checked_span(available: usize, step: usize, len: usize) -> Result<usize> {
    if step == 0 {
        return Err(StrideError::InvalidRange(
            "step size must be at least 1".to_string(),
        ));
    }
    match span_of(len, step) {
        Some(span) if span <= available => Ok(span),
        _ => Err(StrideError::InvalidRange(format!(
            "{} elements with step size {} do not fit in {} elements of storage",
            len, step, available
        ))),
    }
}

/// Validates a raw `[first, last)` pair and returns its length in elements.
///
/// # Safety
/// When non-null, both pointers must be derived from the same allocation.
unsafe fn raw_span<T>(first: *const T, last: *const T) -> Result<usize> {
    if mem::size_of::<T>() == 0 {
        return Err(StrideError::InvalidRange(
            "zero-sized elements have no address range".to_string(),
        ));
    }
    if first.is_null() || last.is_null() {
        return if first == last {
            Ok(0)
        } else {
            Err(StrideError::InvalidRange("null bound".to_string()))
        };
    }
    usize::try_from(last.offset_from(first))
        .map_err(|_| StrideError::InvalidRange("end precedes begin".to_string()))
}

/// A read-only strided view.
pub struct VectorRef<'a, T> {
    // Trimmed to end at the last logical element; empty for an empty view.
    data: &'a [T],
    step: usize,
}

impl<T> Clone for VectorRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VectorRef<'_, T> {}

impl<'a, T> VectorRef<'a, T> {
    /// A step-1 view of the whole slice.
    pub fn new(data: &'a [T]) -> Self {
        Self { data, step: 1 }
    }

    /// A view of every `step`-th element of `data`, starting with the first.
    ///
    /// # Errors
    /// `StrideError::InvalidRange` if `step` is zero or `data.len()` is not a
    /// multiple of `step`.
    pub fn with_step(data: &'a [T], step: usize) -> Result<Self> {
        let len = checked_len(data.len(), step)?;
        Self::strided(data, step, len)
    }

    /// A view of `len` elements, `step` apart, starting at `data[0]`.
    ///
    /// Unlike [`with_step`](Self::with_step) the slice may end anywhere after
    /// the last logical element, which is what a column of a row-major matrix
    /// needs.
    ///
    /// # Errors
    /// `StrideError::InvalidRange` if `step` is zero or the last element would
    /// fall outside `data`.
    pub fn strided(data: &'a [T], step: usize, len: usize) -> Result<Self> {
        let span = checked_span(data.len(), step, len)?;
        Ok(Self {
            data: &data[..span],
            step,
        })
    }

    /// Builds a view from a raw `[first, last)` pair.
    ///
    /// # Errors
    /// `StrideError::InvalidRange` if `last` precedes `first`, only one of them
    /// is null, the range is not a multiple of `step`, or `T` is zero-sized.
    ///
    /// # Safety
    /// `[first, last)` must be initialized elements of a single allocation that
    /// stays alive and unmutated for `'a`.
    pub unsafe fn from_raw_parts(first: *const T, last: *const T, step: usize) -> Result<Self> {
        let span = raw_span(first, last)?;
        if span == 0 {
            return Self::with_step(Default::default(), step);
        }
        Self::with_step(slice::from_raw_parts(first, span), step)
    }

    /// Number of logical elements.
    pub fn len(&self) -> usize {
        match self.data.len() {
            0 => 0,
            span => (span - 1) / self.step + 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Distance between consecutive logical elements, in elements.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index < self.len() {
            self.data.get(index * self.step)
        } else {
            None
        }
    }

    /// Checked indexing.
    ///
    /// # Errors
    /// `StrideError::OutOfRange` if `index >= self.len()`.
    pub fn at(&self, index: usize) -> Result<&'a T> {
        self.get(index).ok_or(StrideError::OutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn iter(&self) -> Iter<'a, T> {
        Iter {
            inner: self.data.iter().step_by(self.step),
        }
    }

    /// Exchanges the described ranges of two views. The elements are untouched.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Copies the elements into a new vector (unary `+`).
    pub fn to_vector(&self) -> Result<Vector<T>>
    where
        T: Clone,
    {
        ops::copy(self)
    }

    pub fn to_vector_in<A: Allocator>(&self, alloc: A) -> Result<Vector<T, A>>
    where
        T: Clone,
    {
        ops::copy_in(self, alloc)
    }

    /// A new vector holding the negated elements (unary `-`).
    pub fn negated(&self) -> Result<Vector<T>>
    where
        T: Clone + Neg<Output = T>,
    {
        ops::neg(self)
    }

    pub fn negated_in<A: Allocator>(&self, alloc: A) -> Result<Vector<T, A>>
    where
        T: Clone + Neg<Output = T>,
    {
        ops::neg_in(self, alloc)
    }

    /// Lexicographic comparison of two views of equal length.
    ///
    /// `Ok(None)` means some pair of elements is unordered (NaN).
    ///
    /// # Errors
    /// `StrideError::SizeMismatch` if the lengths differ.
    pub fn lexicographic_cmp<R>(&self, other: &R) -> Result<Option<Ordering>>
    where
        T: PartialOrd,
        R: AsView<T> + ?Sized,
    {
        ops::lexicographic_cmp(self, other)
    }
}

impl<T> AsView<T> for VectorRef<'_, T> {
    fn as_view(&self) -> VectorRef<'_, T> {
        *self
    }
}

impl<'a, T> From<&'a [T]> for VectorRef<'a, T> {
    fn from(data: &'a [T]) -> Self {
        Self::new(data)
    }
}

impl<'a, T, const N: usize> From<&'a [T; N]> for VectorRef<'a, T> {
    fn from(data: &'a [T; N]) -> Self {
        Self::new(data.as_slice())
    }
}

impl<T> Index<usize> for VectorRef<'_, T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        or_panic(self.at(index))
    }
}

impl<'a, T> IntoIterator for VectorRef<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &VectorRef<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for VectorRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A mutable strided view. Arithmetic through it writes to the borrowed storage.
pub struct VectorRefMut<'a, T> {
    data: &'a mut [T],
    step: usize,
}

impl<'a, T> VectorRefMut<'a, T> {
    pub fn new(data: &'a mut [T]) -> Self {
        Self { data, step: 1 }
    }

    /// See [`VectorRef::with_step`].
    pub fn with_step(data: &'a mut [T], step: usize) -> Result<Self> {
        let len = checked_len(data.len(), step)?;
        Self::strided(data, step, len)
    }

    /// See [`VectorRef::strided`].
    pub fn strided(data: &'a mut [T], step: usize, len: usize) -> Result<Self> {
        let span = checked_span(data.len(), step, len)?;
        Ok(Self {
            data: &mut data[..span],
            step,
        })
    }

    /// Builds a mutable view from a raw `[first, last)` pair.
    ///
    /// # Errors
    /// Same conditions as [`VectorRef::from_raw_parts`].
    ///
    /// # Safety
    /// `[first, last)` must be initialized elements of a single allocation that
    /// stays alive for `'a` and is not accessed through any other path while
    /// the view exists.
    pub unsafe fn from_raw_parts(first: *mut T, last: *mut T, step: usize) -> Result<Self> {
        let span = raw_span(first.cast_const(), last.cast_const())?;
        if span == 0 {
            return Self::with_step(Default::default(), step);
        }
        Self::with_step(slice::from_raw_parts_mut(first, span), step)
    }

    pub fn len(&self) -> usize {
        self.as_view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Shortens the borrow into a read-only view.
    pub fn as_view(&self) -> VectorRef<'_, T> {
        VectorRef {
            data: &*self.data,
            step: self.step,
        }
    }

    /// Reborrows for a shorter lifetime, leaving `self` usable afterwards.
    pub fn reborrow(&mut self) -> VectorRefMut<'_, T> {
        VectorRefMut {
            data: &mut *self.data,
            step: self.step,
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            self.data.get(index * self.step)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            self.data.get_mut(index * self.step)
        } else {
            None
        }
    }

    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.get(index).ok_or(StrideError::OutOfRange { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        self.get_mut(index)
            .ok_or(StrideError::OutOfRange { index, len })
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.as_view().iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.data.iter_mut().step_by(self.step),
        }
    }

    /// Exchanges the described ranges of two views in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Exchanges the elements of two equally long views.
    ///
    /// # Errors
    /// `StrideError::SizeMismatch` if the lengths differ; nothing is swapped.
    pub fn swap_elements(&mut self, other: &mut VectorRefMut<'_, T>) -> Result<()> {
        ops::check_sizes(self.len(), other.len())?;
        for (a, b) in self.iter_mut().zip(other.iter_mut()) {
            mem::swap(a, b);
        }
        Ok(())
    }

    /// `self[i] += rhs[i]` for every `i`.
    ///
    /// # Errors
    /// `StrideError::SizeMismatch` if the lengths differ; `self` is untouched.
    pub fn add_in_place<R>(&mut self, rhs: &R) -> Result<&mut Self>
    where
        T: Scalar,
        R: AsView<T> + ?Sized,
    {
        let rhs = rhs.as_view();
        ops::check_sizes(self.len(), rhs.len())?;
        for (a, &b) in self.iter_mut().zip(rhs.iter()) {
            *a += b;
        }
        Ok(self)
    }

    /// `self[i] -= rhs[i]` for every `i`.
    ///
    /// # Errors
    /// `StrideError::SizeMismatch` if the lengths differ; `self` is untouched.
    pub fn sub_in_place<R>(&mut self, rhs: &R) -> Result<&mut Self>
    where
        T: Scalar,
        R: AsView<T> + ?Sized,
    {
        let rhs = rhs.as_view();
        ops::check_sizes(self.len(), rhs.len())?;
        for (a, &b) in self.iter_mut().zip(rhs.iter()) {
            *a -= b;
        }
        Ok(self)
    }

    pub fn mul_in_place(&mut self, rhs: T) -> &mut Self
    where
        T: Scalar,
    {
        for a in self.iter_mut() {
            *a *= rhs;
        }
        self
    }

    /// `self[i] /= rhs` for every `i`.
    ///
    /// # Errors
    /// `StrideError::DivisionByZero` for an integer `rhs` of zero and
    /// `StrideError::DivisionOverflow` if any integer quotient overflows
    /// (`MIN / -1`); either way `self` is untouched. Floating point division
    /// follows IEEE rules.
    pub fn div_in_place(&mut self, rhs: T) -> Result<&mut Self>
    where
        T: Scalar,
    {
        ops::check_quotients(self.iter(), rhs)?;
        for a in self.iter_mut() {
            *a /= rhs;
        }
        Ok(self)
    }

    pub fn to_vector(&self) -> Result<Vector<T>>
    where
        T: Clone,
    {
        ops::copy(self)
    }

    pub fn negated(&self) -> Result<Vector<T>>
    where
        T: Clone + Neg<Output = T>,
    {
        ops::neg(self)
    }

    pub fn lexicographic_cmp<R>(&self, other: &R) -> Result<Option<Ordering>>
    where
        T: PartialOrd,
        R: AsView<T> + ?Sized,
    {
        ops::lexicographic_cmp(self, other)
    }
}

impl<T> AsView<T> for VectorRefMut<'_, T> {
    fn as_view(&self) -> VectorRef<'_, T> {
        VectorRefMut::as_view(self)
    }
}

impl<'a, T> From<&'a mut [T]> for VectorRefMut<'a, T> {
    fn from(data: &'a mut [T]) -> Self {
        Self::new(data)
    }
}

impl<'a, T> From<VectorRefMut<'a, T>> for VectorRef<'a, T> {
    fn from(view: VectorRefMut<'a, T>) -> Self {
        VectorRef {
            data: view.data,
            step: view.step,
        }
    }
}

impl<T> Index<usize> for VectorRefMut<'_, T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        or_panic(self.at(index))
    }
}

impl<T> IndexMut<usize> for VectorRefMut<'_, T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        or_panic(self.at_mut(index))
    }
}

impl<'a, T> IntoIterator for VectorRefMut<'a, T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        IterMut {
            inner: self.data.iter_mut().step_by(self.step),
        }
    }
}

impl<'b, T> IntoIterator for &'b VectorRefMut<'_, T> {
    type Item = &'b T;
    type IntoIter = Iter<'b, T>;

    fn into_iter(self) -> Iter<'b, T> {
        self.iter()
    }
}

impl<'b, T> IntoIterator for &'b mut VectorRefMut<'_, T> {
    type Item = &'b mut T;
    type IntoIter = IterMut<'b, T>;

    fn into_iter(self) -> IterMut<'b, T> {
        self.iter_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for VectorRefMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_view().fmt(f)
    }
}

/// Iterator over the elements of a view, front to back.
///
/// Double-ended: `.rev()` walks the same positions in reverse.
pub struct Iter<'a, T> {
    inner: StepBy<slice::Iter<'a, T>>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Mutable counterpart of [`Iter`].
pub struct IterMut<'a, T> {
    inner: StepBy<slice::IterMut<'a, T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_one_view() {
        let data = [1, 2, 3, 4];
        let view = VectorRef::new(&data);
        assert_eq!(view.len(), 4);
        assert_eq!(view.step(), 1);
        assert_eq!(view[2], 3);
        assert_eq!(view.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_strided_indexing() {
        let data = [10, 11, 12, 13, 14, 15];
        let view = VectorRef::with_step(&data, 2).unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view[1], data[2]);
        assert_eq!(view.iter().copied().collect::<Vec<_>>(), vec![10, 12, 14]);
        assert_eq!(view.iter().rev().copied().collect::<Vec<_>>(), vec![14, 12, 10]);
        assert_eq!(view.iter().len(), 3);
    }

    #[test]
    fn test_misaligned_step_rejected() {
        let data = [1, 2, 3, 4, 5];
        match VectorRef::with_step(&data, 2) {
            Err(StrideError::InvalidRange(msg)) => assert!(msg.contains("not a multiple")),
            other => panic!("Expected InvalidRange, got {:?}", other),
        }
        match VectorRef::with_step(&data, 0) {
            Err(StrideError::InvalidRange(msg)) => assert!(msg.contains("at least 1")),
            other => panic!("Expected InvalidRange, got {:?}", other),
        }
    }

    #[test]
    fn test_strided_with_explicit_len() {
        // Column 1 of a 3x3 row-major matrix.
        let data = [0, 1, 2, 3, 4, 5, 6, 7, 8];
        let column = VectorRef::strided(&data[1..], 3, 3).unwrap();
        assert_eq!(column.iter().copied().collect::<Vec<_>>(), vec![1, 4, 7]);
        assert!(VectorRef::strided(&data[1..], 3, 4).is_err());
        assert!(VectorRef::strided(&data, 0, 1).is_err());
        assert!(VectorRef::strided(&data, 5, 0).unwrap().is_empty());
    }

    #[test]
    fn test_checked_access() {
        let data = [1.0, 2.0];
        let view = VectorRef::new(&data);
        assert_eq!(view.at(1), Ok(&2.0));
        assert_eq!(
            view.at(2),
            Err(StrideError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(view.get(5), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let data = [1, 2, 3, 4];
        let view = VectorRef::with_step(&data, 2).unwrap();
        let _ = view[2];
    }

    #[test]
    fn test_raw_parts() {
        let mut data = [1, 2, 3, 4, 5, 6];
        let range = data.as_mut_ptr_range();
        let mut view = unsafe { VectorRefMut::from_raw_parts(range.start, range.end, 3) }.unwrap();
        assert_eq!(view.len(), 2);
        view[1] = 40;
        assert_eq!(data, [1, 2, 3, 40, 5, 6]);

        let range = data.as_ptr_range();
        let reversed = unsafe { VectorRef::from_raw_parts(range.end, range.start, 1) };
        assert!(matches!(reversed, Err(StrideError::InvalidRange(_))));

        let empty = unsafe { VectorRef::<u8>::from_raw_parts(std::ptr::null(), std::ptr::null(), 1) };
        assert!(empty.unwrap().is_empty());
    }

    #[test]
    fn test_in_place_arithmetic() {
        let mut data = [1, 2, 3, 4, 5, 6];
        let mut view = VectorRefMut::with_step(&mut data, 2).unwrap();
        view.add_in_place(&[10, 20, 30]).unwrap();
        view.mul_in_place(2);
        view.sub_in_place(&[1, 1, 1]).unwrap();
        view.div_in_place(3).unwrap();
        assert_eq!(data, [7, 2, 15, 4, 23, 6]);
    }

    #[test]
    fn test_size_mismatch_leaves_view_untouched() {
        let mut data = [1, 2, 3];
        let mut view = VectorRefMut::new(&mut data);
        let result = view.add_in_place(&[1, 1]).map(|_| ());
        assert_eq!(result, Err(StrideError::SizeMismatch { lhs: 3, rhs: 2 }));
        assert_eq!(data, [1, 2, 3]);
    }

    #[test]
    fn test_division_by_zero() {
        let mut ints = [4, 8];
        let mut view = VectorRefMut::new(&mut ints);
        assert!(matches!(
            view.div_in_place(0),
            Err(StrideError::DivisionByZero)
        ));
        assert_eq!(ints, [4, 8]);

        let mut mins = [4, i32::MIN];
        let mut view = VectorRefMut::new(&mut mins);
        assert_eq!(
            view.div_in_place(-1).map(|v| v.len()),
            Err(StrideError::DivisionOverflow)
        );
        assert_eq!(mins, [4, i32::MIN]);

        let mut floats = [1.0f64, -1.0];
        VectorRefMut::new(&mut floats).div_in_place(0.0).unwrap();
        assert_eq!(floats, [f64::INFINITY, f64::NEG_INFINITY]);
    }

    #[test]
    fn test_swap_descriptors() {
        let a = [1, 2, 3, 4];
        let b = [9, 8];
        let mut left = VectorRef::with_step(&a, 2).unwrap();
        let mut right = VectorRef::new(&b);
        left.swap(&mut right);
        assert_eq!(left.step(), 1);
        assert_eq!(right.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(a, [1, 2, 3, 4]);
    }

    #[test]
    fn test_swap_elements() {
        let mut a = [1, 2, 3, 4];
        let mut b = [7, 8];
        let mut left = VectorRefMut::with_step(&mut a, 2).unwrap();
        let mut right = VectorRefMut::new(&mut b);
        left.swap_elements(&mut right).unwrap();
        assert_eq!(a, [7, 2, 8, 4]);
        assert_eq!(b, [1, 3]);
    }

    #[test]
    fn test_reverse_iter_mut_honors_step() {
        let mut data = [0; 6];
        let view = VectorRefMut::with_step(&mut data, 2).unwrap();
        for (i, x) in view.into_iter().rev().enumerate() {
            *x = i + 1;
        }
        assert_eq!(data, [3, 0, 2, 0, 1, 0]);
    }

    #[test]
    fn test_debug_lists_logical_elements() {
        let data = [1, 2, 3, 4];
        let view = VectorRef::with_step(&data, 2).unwrap();
        assert_eq!(format!("{:?}", view), "[1, 3]");
    }
}
