// Element-wise operators shared by owning vectors and views.
// The named functions are the fallible surface; the `std::ops` impls further
// down call them and panic with the error message, since operator traits
// cannot return a `Result`.

use crate::allocator::{Allocator, Global};
use crate::error::{or_panic, Result, StrideError};
use crate::traits::{AsView, Scalar};
use crate::vector::Vector;
use crate::view::{VectorRef, VectorRefMut};
use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

pub(crate) fn check_sizes(lhs: usize, rhs: usize) -> Result<()> {
    if lhs != rhs {
        return Err(StrideError::SizeMismatch { lhs, rhs });
    }
    Ok(())
}

/// `lhs / rhs` for a single pair, rejecting the integer cases that would trap.
pub(crate) fn quotient<T: Scalar>(lhs: T, rhs: T) -> Result<T> {
    check_divisor(rhs)?;
    lhs.checked_quotient(rhs).ok_or(StrideError::DivisionOverflow)
}

/// Fails if any `lhs[i] / rhs` would trap. Floats never do.
pub(crate) fn check_quotients<'a, T, I>(dividends: I, rhs: T) -> Result<()>
where
    T: Scalar + 'a,
    I: IntoIterator<Item = &'a T>,
{
    check_divisor(rhs)?;
    if T::INTEGRAL {
        for &a in dividends {
            quotient(a, rhs)?;
        }
    }
    Ok(())
}

pub(crate) fn check_divisor<T: Scalar>(divisor: T) -> Result<()> {
    if T::INTEGRAL && divisor.is_zero() {
        return Err(StrideError::DivisionByZero);
    }
    Ok(())
}

/// `lhs[i] + rhs[i]` as a new vector on the global allocator.
pub fn add<T, L, R>(lhs: &L, rhs: &R) -> Result<Vector<T>>
where
    T: Scalar,
    L: AsView<T> + ?Sized,
    R: AsView<T> + ?Sized,
{
    add_in(lhs, rhs, Global)
}

pub fn add_in<T, L, R, A>(lhs: &L, rhs: &R, alloc: A) -> Result<Vector<T, A>>
where
    T: Scalar,
    L: AsView<T> + ?Sized,
    R: AsView<T> + ?Sized,
    A: Allocator,
{
    let (lhs, rhs) = (lhs.as_view(), rhs.as_view());
    check_sizes(lhs.len(), rhs.len())?;
    Vector::from_iter_in(lhs.iter().zip(rhs.iter()).map(|(&a, &b)| a + b), alloc)
}

/// `lhs[i] - rhs[i]` as a new vector on the global allocator.
pub fn sub<T, L, R>(lhs: &L, rhs: &R) -> Result<Vector<T>>
where
    T: Scalar,
    L: AsView<T> + ?Sized,
    R: AsView<T> + ?Sized,
{
    sub_in(lhs, rhs, Global)
}

pub fn sub_in<T, L, R, A>(lhs: &L, rhs: &R, alloc: A) -> Result<Vector<T, A>>
where
    T: Scalar,
    L: AsView<T> + ?Sized,
    R: AsView<T> + ?Sized,
    A: Allocator,
{
    let (lhs, rhs) = (lhs.as_view(), rhs.as_view());
    check_sizes(lhs.len(), rhs.len())?;
    Vector::from_iter_in(lhs.iter().zip(rhs.iter()).map(|(&a, &b)| a - b), alloc)
}

/// `lhs[i] * rhs`.
pub fn mul_scalar<T, L>(lhs: &L, rhs: T) -> Result<Vector<T>>
where
    T: Scalar,
    L: AsView<T> + ?Sized,
{
    mul_scalar_in(lhs, rhs, Global)
}

pub fn mul_scalar_in<T, L, A>(lhs: &L, rhs: T, alloc: A) -> Result<Vector<T, A>>
where
    T: Scalar,
    L: AsView<T> + ?Sized,
    A: Allocator,
{
    Vector::from_iter_in(lhs.as_view().iter().map(|&a| a * rhs), alloc)
}

/// `lhs * rhs[i]`.
pub fn scalar_mul<T, R>(lhs: T, rhs: &R) -> Result<Vector<T>>
where
    T: Scalar,
    R: AsView<T> + ?Sized,
{
    scalar_mul_in(lhs, rhs, Global)
}

pub fn scalar_mul_in<T, R, A>(lhs: T, rhs: &R, alloc: A) -> Result<Vector<T, A>>
where
    T: Scalar,
    R: AsView<T> + ?Sized,
    A: Allocator,
{
    Vector::from_iter_in(rhs.as_view().iter().map(|&b| lhs * b), alloc)
}

/// `lhs[i] / rhs`; integer division by zero or overflow (`MIN / -1`) is
/// rejected before allocating.
pub fn div_scalar<T, L>(lhs: &L, rhs: T) -> Result<Vector<T>>
where
    T: Scalar,
    L: AsView<T> + ?Sized,
{
    div_scalar_in(lhs, rhs, Global)
}

pub fn div_scalar_in<T, L, A>(lhs: &L, rhs: T, alloc: A) -> Result<Vector<T, A>>
where
    T: Scalar,
    L: AsView<T> + ?Sized,
    A: Allocator,
{
    let lhs = lhs.as_view();
    check_quotients(lhs.iter(), rhs)?;
    Vector::from_iter_in(lhs.iter().map(|&a| a / rhs), alloc)
}

/// `lhs / rhs[i]`; fails if any integer quotient would divide by zero or
/// overflow.
pub fn scalar_div<T, R>(lhs: T, rhs: &R) -> Result<Vector<T>>
where
    T: Scalar,
    R: AsView<T> + ?Sized,
{
    scalar_div_in(lhs, rhs, Global)
}

pub fn scalar_div_in<T, R, A>(lhs: T, rhs: &R, alloc: A) -> Result<Vector<T, A>>
where
    T: Scalar,
    R: AsView<T> + ?Sized,
    A: Allocator,
{
    let rhs = rhs.as_view();
    for &b in rhs.iter() {
        quotient(lhs, b)?;
    }
    Vector::from_iter_in(rhs.iter().map(|&b| lhs / b), alloc)
}

/// Element-wise negation into a new vector.
pub fn neg<T, V>(src: &V) -> Result<Vector<T>>
where
    T: Clone + Neg<Output = T>,
    V: AsView<T> + ?Sized,
{
    neg_in(src, Global)
}

pub fn neg_in<T, V, A>(src: &V, alloc: A) -> Result<Vector<T, A>>
where
    T: Clone + Neg<Output = T>,
    V: AsView<T> + ?Sized,
    A: Allocator,
{
    Vector::from_iter_in(src.as_view().iter().map(|a| -a.clone()), alloc)
}

/// Element-wise copy into a new vector.
pub fn copy<T, V>(src: &V) -> Result<Vector<T>>
where
    T: Clone,
    V: AsView<T> + ?Sized,
{
    copy_in(src, Global)
}

pub fn copy_in<T, V, A>(src: &V, alloc: A) -> Result<Vector<T, A>>
where
    T: Clone,
    V: AsView<T> + ?Sized,
    A: Allocator,
{
    Vector::from_view_in(src, alloc)
}

/// Lexicographic comparison of two equally long views.
///
/// # Errors
/// `StrideError::SizeMismatch` if the lengths differ.
pub fn lexicographic_cmp<T, L, R>(lhs: &L, rhs: &R) -> Result<Option<Ordering>>
where
    T: PartialOrd,
    L: AsView<T> + ?Sized,
    R: AsView<T> + ?Sized,
{
    let (lhs, rhs) = (lhs.as_view(), rhs.as_view());
    check_sizes(lhs.len(), rhs.len())?;
    Ok(lhs.iter().partial_cmp(rhs.iter()))
}

fn views_eq<T, L, R>(lhs: &L, rhs: &R) -> bool
where
    T: PartialEq,
    L: AsView<T> + ?Sized,
    R: AsView<T> + ?Sized,
{
    let (lhs, rhs) = (lhs.as_view(), rhs.as_view());
    lhs.len() == rhs.len() && lhs.iter().eq(rhs.iter())
}

// Unequal lengths compare unequal and unordered.
macro_rules! view_cmp_impl {
    ([$($gen:tt)*] $lhs:ty, $rhs:ty) => (
        impl<$($gen)*> PartialEq<$rhs> for $lhs
        where
            T: PartialEq,
        {
            fn eq(&self, other: &$rhs) -> bool {
                views_eq(self, other)
            }
        }
    );
    (ordered [$($gen:tt)*] $lhs:ty, $rhs:ty) => (
        view_cmp_impl!([$($gen)*] $lhs, $rhs);

        impl<$($gen)*> PartialOrd<$rhs> for $lhs
        where
            T: PartialOrd,
        {
            fn partial_cmp(&self, other: &$rhs) -> Option<Ordering> {
                lexicographic_cmp(self, other).ok().flatten()
            }
        }
    );
}

view_cmp_impl!(ordered ['a, 'b, T] VectorRef<'a, T>, VectorRef<'b, T>);
view_cmp_impl!(ordered ['a, 'b, T] VectorRefMut<'a, T>, VectorRefMut<'b, T>);
view_cmp_impl!(ordered [T, A: Allocator, B: Allocator] Vector<T, A>, Vector<T, B>);
view_cmp_impl!(['a, 'b, T] VectorRef<'a, T>, VectorRefMut<'b, T>);
view_cmp_impl!(['a, 'b, T] VectorRefMut<'a, T>, VectorRef<'b, T>);
view_cmp_impl!(['a, T, A: Allocator] Vector<T, A>, VectorRef<'a, T>);
view_cmp_impl!(['a, T, A: Allocator] VectorRef<'a, T>, Vector<T, A>);
view_cmp_impl!(['a, T] VectorRef<'a, T>, [T]);
view_cmp_impl!(['a, T] VectorRefMut<'a, T>, [T]);
view_cmp_impl!([T, A: Allocator] Vector<T, A>, [T]);
view_cmp_impl!(['a, T, const N: usize] VectorRef<'a, T>, [T; N]);
view_cmp_impl!(['a, T, const N: usize] VectorRefMut<'a, T>, [T; N]);
view_cmp_impl!([T, A: Allocator, const N: usize] Vector<T, A>, [T; N]);

impl<T: Eq> Eq for VectorRef<'_, T> {}
impl<T: Eq> Eq for VectorRefMut<'_, T> {}
impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

// --- std::ops on mutable views ---

impl<T: Scalar, R: AsView<T> + ?Sized> AddAssign<&R> for VectorRefMut<'_, T> {
    #[track_caller]
    fn add_assign(&mut self, rhs: &R) {
        or_panic(self.add_in_place(rhs).map(|_| ()));
    }
}

impl<T: Scalar, R: AsView<T> + ?Sized> SubAssign<&R> for VectorRefMut<'_, T> {
    #[track_caller]
    fn sub_assign(&mut self, rhs: &R) {
        or_panic(self.sub_in_place(rhs).map(|_| ()));
    }
}

impl<T: Scalar> MulAssign<T> for VectorRefMut<'_, T> {
    fn mul_assign(&mut self, rhs: T) {
        self.mul_in_place(rhs);
    }
}

impl<T: Scalar> DivAssign<T> for VectorRefMut<'_, T> {
    #[track_caller]
    fn div_assign(&mut self, rhs: T) {
        or_panic(self.div_in_place(rhs).map(|_| ()));
    }
}

// --- std::ops on owning vectors ---

impl<T: Scalar, A: Allocator, R: AsView<T> + ?Sized> AddAssign<&R> for Vector<T, A> {
    #[track_caller]
    fn add_assign(&mut self, rhs: &R) {
        or_panic(self.add_in_place(rhs).map(|_| ()));
    }
}

impl<T: Scalar, A: Allocator, R: AsView<T> + ?Sized> SubAssign<&R> for Vector<T, A> {
    #[track_caller]
    fn sub_assign(&mut self, rhs: &R) {
        or_panic(self.sub_in_place(rhs).map(|_| ()));
    }
}

impl<T: Scalar, A: Allocator> MulAssign<T> for Vector<T, A> {
    fn mul_assign(&mut self, rhs: T) {
        self.mul_in_place(rhs);
    }
}

impl<T: Scalar, A: Allocator> DivAssign<T> for Vector<T, A> {
    #[track_caller]
    fn div_assign(&mut self, rhs: T) {
        or_panic(self.div_in_place(rhs).map(|_| ()));
    }
}

impl<T: Scalar, A: Allocator, R: AsView<T> + ?Sized> Add<&R> for &Vector<T, A> {
    type Output = Vector<T, A>;

    #[track_caller]
    fn add(self, rhs: &R) -> Vector<T, A> {
        or_panic(add_in(self, rhs, self.allocator().clone()))
    }
}

impl<T: Scalar, A: Allocator, R: AsView<T> + ?Sized> Sub<&R> for &Vector<T, A> {
    type Output = Vector<T, A>;

    #[track_caller]
    fn sub(self, rhs: &R) -> Vector<T, A> {
        or_panic(sub_in(self, rhs, self.allocator().clone()))
    }
}

impl<T: Scalar, A: Allocator> Mul<T> for &Vector<T, A> {
    type Output = Vector<T, A>;

    #[track_caller]
    fn mul(self, rhs: T) -> Vector<T, A> {
        or_panic(mul_scalar_in(self, rhs, self.allocator().clone()))
    }
}

impl<T: Scalar, A: Allocator> Div<T> for &Vector<T, A> {
    type Output = Vector<T, A>;

    #[track_caller]
    fn div(self, rhs: T) -> Vector<T, A> {
        or_panic(div_scalar_in(self, rhs, self.allocator().clone()))
    }
}

impl<T: Clone + Neg<Output = T>, A: Allocator> Neg for &Vector<T, A> {
    type Output = Vector<T, A>;

    #[track_caller]
    fn neg(self) -> Vector<T, A> {
        or_panic(self.negated())
    }
}

// --- std::ops on read-only views, producing vectors on the global allocator ---

impl<T: Scalar, R: AsView<T> + ?Sized> Add<&R> for VectorRef<'_, T> {
    type Output = Vector<T>;

    #[track_caller]
    fn add(self, rhs: &R) -> Vector<T> {
        or_panic(add(&self, rhs))
    }
}

impl<T: Scalar, R: AsView<T> + ?Sized> Sub<&R> for VectorRef<'_, T> {
    type Output = Vector<T>;

    #[track_caller]
    fn sub(self, rhs: &R) -> Vector<T> {
        or_panic(sub(&self, rhs))
    }
}

impl<T: Scalar> Mul<T> for VectorRef<'_, T> {
    type Output = Vector<T>;

    #[track_caller]
    fn mul(self, rhs: T) -> Vector<T> {
        or_panic(mul_scalar(&self, rhs))
    }
}

impl<T: Scalar> Div<T> for VectorRef<'_, T> {
    type Output = Vector<T>;

    #[track_caller]
    fn div(self, rhs: T) -> Vector<T> {
        or_panic(div_scalar(&self, rhs))
    }
}

impl<T: Clone + Neg<Output = T>> Neg for VectorRef<'_, T> {
    type Output = Vector<T>;

    #[track_caller]
    fn neg(self) -> Vector<T> {
        or_panic(neg(&self))
    }
}

// Scalar on the left needs a concrete type.
macro_rules! scalar_lhs_impl {
    ($($t:ty),*) => (
        $(
            impl<A: Allocator> Mul<&Vector<$t, A>> for $t {
                type Output = Vector<$t, A>;

                #[track_caller]
                fn mul(self, rhs: &Vector<$t, A>) -> Vector<$t, A> {
                    or_panic(scalar_mul_in(self, rhs, rhs.allocator().clone()))
                }
            }

            impl<A: Allocator> Div<&Vector<$t, A>> for $t {
                type Output = Vector<$t, A>;

                #[track_caller]
                fn div(self, rhs: &Vector<$t, A>) -> Vector<$t, A> {
                    or_panic(scalar_div_in(self, rhs, rhs.allocator().clone()))
                }
            }

            impl Mul<VectorRef<'_, $t>> for $t {
                type Output = Vector<$t>;

                #[track_caller]
                fn mul(self, rhs: VectorRef<'_, $t>) -> Vector<$t> {
                    or_panic(scalar_mul(self, &rhs))
                }
            }

            impl Div<VectorRef<'_, $t>> for $t {
                type Output = Vector<$t>;

                #[track_caller]
                fn div(self, rhs: VectorRef<'_, $t>) -> Vector<$t> {
                    or_panic(scalar_div(self, &rhs))
                }
            }
        )*
    )
}

scalar_lhs_impl!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_ops_allocate_new_vectors() {
        let a = [1, 2, 3];
        let b = Vector::from_slice(&[10, 20, 30]).unwrap();
        assert_eq!(add(&a, &b).unwrap(), [11, 22, 33]);
        assert_eq!(sub(&b, &a).unwrap(), [9, 18, 27]);
        assert_eq!(mul_scalar(&a, 3).unwrap(), [3, 6, 9]);
        assert_eq!(scalar_mul(2, &b).unwrap(), [20, 40, 60]);
        assert_eq!(div_scalar(&b, 10).unwrap(), [1, 2, 3]);
        assert_eq!(scalar_div(60, &b).unwrap(), [6, 3, 2]);
    }

    #[test]
    fn test_binary_ops_reject_mismatch() {
        assert_eq!(
            add(&[1, 2], &[1, 2, 3]).map(|v| v.len()),
            Err(StrideError::SizeMismatch { lhs: 2, rhs: 3 })
        );
    }

    #[test]
    fn test_integer_zero_divisors() {
        assert_eq!(
            div_scalar(&[1, 2], 0).map(|v| v.len()),
            Err(StrideError::DivisionByZero)
        );
        assert_eq!(
            scalar_div(6u8, &[3, 0]).map(|v| v.len()),
            Err(StrideError::DivisionByZero)
        );
        let halves = scalar_div(1.0f32, &[2.0, 0.0]).unwrap();
        assert_eq!(halves[0], 0.5);
        assert!(halves[1].is_infinite());
    }

    #[test]
    fn test_integer_division_overflow() {
        assert_eq!(
            div_scalar(&[4, i32::MIN], -1).map(|v| v.len()),
            Err(StrideError::DivisionOverflow)
        );
        assert_eq!(
            scalar_div(i32::MIN, &[2, -1]).map(|v| v.len()),
            Err(StrideError::DivisionOverflow)
        );
        assert_eq!(div_scalar(&[4i8, -128], 2).unwrap(), [2, -64]);
        assert_eq!(scalar_div(i64::MIN, &[1]).unwrap(), [i64::MIN]);
        assert_eq!(div_scalar(&[f32::MIN], -1.0).unwrap(), [-f32::MIN]);
    }

    #[test]
    fn test_lexicographic_cmp() {
        assert_eq!(lexicographic_cmp(&[1, 2, 3], &[1, 3, 0]), Ok(Some(Ordering::Less)));
        assert_eq!(lexicographic_cmp(&[1, 2], &[1, 2]), Ok(Some(Ordering::Equal)));
        assert_eq!(
            lexicographic_cmp(&[1.0, f64::NAN], &[1.0, 0.0]),
            Ok(None)
        );
        assert_eq!(
            lexicographic_cmp(&[1], &[1, 2]),
            Err(StrideError::SizeMismatch { lhs: 1, rhs: 2 })
        );
    }

    #[test]
    fn test_comparison_operators() {
        let a = Vector::from_slice(&[1, 2, 3]).unwrap();
        let b = Vector::from_slice(&[1, 2, 4]).unwrap();
        let short = Vector::from_slice(&[0]).unwrap();
        assert!(a < b);
        assert!(b >= a);
        assert!(a != b);
        assert!(a == a.as_view());
        assert!(a != short);
        assert_eq!(a.partial_cmp(&short), None);
    }

    #[test]
    fn test_std_operators() {
        let mut a = Vector::from_slice(&[2.0, 4.0]).unwrap();
        a += &[1.0, 1.0];
        a *= 2.0;
        let copy = a.try_clone().unwrap();
        a -= &copy;
        assert_eq!(a, [0.0, 0.0]);

        let b = Vector::from_slice(&[3, 6]).unwrap();
        assert_eq!(&b + &b, [6, 12]);
        assert_eq!(&b - &[1, 1], [2, 5]);
        assert_eq!(&b * 2, [6, 12]);
        assert_eq!(&b / 3, [1, 2]);
        assert_eq!(-&b, [-3, -6]);
        assert_eq!(2 * &b, [6, 12]);
        assert_eq!(12 / &b, [4, 2]);
        assert_eq!(b.as_view() + &[1, 1], [4, 7]);
        assert_eq!(-b.as_view(), [-3, -6]);
    }

    #[test]
    #[should_panic(expected = "Operand sizes do not match")]
    fn test_add_assign_operator_panics_on_mismatch() {
        let mut a = Vector::from_slice(&[1, 2]).unwrap();
        a += &[1];
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_div_assign_operator_panics_on_zero() {
        let mut a = Vector::from_slice(&[1, 2]).unwrap();
        a /= 0;
    }
}
