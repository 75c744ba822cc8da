//! `stridevec-matrix`: row-major matrices stored in allocator-aware vectors.
//!
//! Rows are exposed as contiguous views and columns as strided views over the
//! same storage, so the vector arithmetic of `stridevec-core` applies to both.

pub mod dense_matrix;

pub use dense_matrix::DenseMatrix;

// Re-export from stridevec_core
pub use stridevec_core::{
    Allocator, Global, Matrix, Result, StrideError, Vector, VectorRef, VectorRefMut,
};
