use crate::view::VectorRef;
use num_traits::NumAssign;
use std::fmt::Debug;

/// Generic trait representing a matrix.
/// Implementations only describe their shape; no arithmetic is attached.
pub trait Matrix: Debug {
    /// The element type of the matrix.
    type Value;

    /// Returns the dimensions of the matrix as (rows, columns).
    fn dims(&self) -> (usize, usize);

    /// Returns the number of rows.
    fn rows(&self) -> usize {
        self.dims().0
    }

    /// Returns the number of columns.
    fn cols(&self) -> usize {
        self.dims().1
    }

    /// Checks if the matrix is square.
    fn is_square(&self) -> bool {
        let (rows, cols) = self.dims();
        rows == cols
    }
}

/// Anything that can be borrowed as a read-only strided view.
///
/// This is the conversion every binary operation goes through, so owning
/// vectors, views, slices and arrays mix freely as operands.
pub trait AsView<T> {
    fn as_view(&self) -> VectorRef<'_, T>;
}

impl<T> AsView<T> for [T] {
    fn as_view(&self) -> VectorRef<'_, T> {
        VectorRef::new(self)
    }
}

impl<T, const N: usize> AsView<T> for [T; N] {
    fn as_view(&self) -> VectorRef<'_, T> {
        VectorRef::new(self.as_slice())
    }
}

impl<T> AsView<T> for Vec<T> {
    fn as_view(&self) -> VectorRef<'_, T> {
        VectorRef::new(self.as_slice())
    }
}

impl<T, V: AsView<T> + ?Sized> AsView<T> for &V {
    fn as_view(&self) -> VectorRef<'_, T> {
        (**self).as_view()
    }
}

/// Element types that support the element-wise arithmetic surface.
pub trait Scalar: Copy + Debug + PartialOrd + NumAssign {
    /// True for integer types, where dividing by zero is an error rather than
    /// an IEEE infinity or NaN.
    const INTEGRAL: bool;

    /// `self / rhs`, or `None` where integer division would trap.
    fn checked_quotient(self, rhs: Self) -> Option<Self>;
}

macro_rules! scalar_impl {
    (int $($t:ty),*) => (
        $(
            impl Scalar for $t {
                const INTEGRAL: bool = true;

                fn checked_quotient(self, rhs: Self) -> Option<Self> {
                    self.checked_div(rhs)
                }
            }
        )*
    );
    (float $($t:ty),*) => (
        $(
            impl Scalar for $t {
                const INTEGRAL: bool = false;

                fn checked_quotient(self, rhs: Self) -> Option<Self> {
                    Some(self / rhs)
                }
            }
        )*
    );
}

scalar_impl!(int i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
scalar_impl!(float f32, f64);
