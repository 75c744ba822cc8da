//! # Strided Vector Core
//!
//! An allocator-aware owning vector and the strided views that borrow it.
//!
//! [`Vector`] owns exactly `len()` constructed elements in storage obtained
//! from an [`Allocator`]. [`VectorRef`] and [`VectorRefMut`] describe every
//! `step`-th element of a run of storage they do not own. Both sides share
//! the same element-wise arithmetic and comparison surface; see [`ops`].
//!
//! ```
//! use stridevec_core::{Vector, VectorRef};
//!
//! let mut a = Vector::from_slice(&[1i64, 2, 3])?;
//! let b = Vector::from_slice(&[4i64, 5, 6])?;
//! a.add_in_place(&b)?;
//! assert_eq!(a, [5, 7, 9]);
//!
//! let raw = [0, 1, 2, 3, 4, 5];
//! let evens = VectorRef::with_step(&raw, 2)?;
//! assert_eq!(evens[1], 2);
//! # Ok::<(), stridevec_core::StrideError>(())
//! ```

pub mod allocator;
pub mod error;
pub mod ops;
pub mod traits;
pub mod vector;
pub mod view;

// Re-export public types
pub use allocator::{Allocator, Global};
pub use error::{Result, StrideError};
pub use traits::{AsView, Matrix, Scalar};
pub use vector::{IntoIter, Vector};
pub use view::{Iter, IterMut, VectorRef, VectorRefMut};
