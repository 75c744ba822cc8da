use std::fmt;
use stridevec_core::{
    Allocator, Global, Matrix, Result, StrideError, Vector, VectorRef, VectorRefMut,
};

/// Represents a dense matrix stored in row-major order in a [`Vector`].
#[derive(Clone)]
pub struct DenseMatrix<T, A: Allocator = Global> {
    rows: usize,
    cols: usize,
    data: Vector<T, A>, // Data stored row-major: data[row * cols + col]
}

fn element_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        StrideError::InvalidDimensions(format!("{}x{} overflows usize", rows, cols))
    })
}

impl<T> DenseMatrix<T> {
    /// Creates a new DenseMatrix filled with `T::default()`.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self>
    where
        T: Default,
    {
        Self::zeros_in(rows, cols, Global)
    }

    /// Copies row-major `data` into a new matrix.
    pub fn from_slice(rows: usize, cols: usize, data: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        Self::new(rows, cols, Vector::from_slice(data)?)
    }
}

impl<T, A: Allocator> DenseMatrix<T, A> {
    /// Wraps row-major `data` as a `rows` x `cols` matrix.
    ///
    /// # Errors
    /// `StrideError::InvalidDimensions` if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vector<T, A>) -> Result<Self> {
        if data.len() != element_count(rows, cols)? {
            log::debug!(
                "Rejecting {} elements for a {}x{} matrix",
                data.len(),
                rows,
                cols
            );
            return Err(StrideError::InvalidDimensions(format!(
                "Data length ({}) does not match dimensions ({}x{})",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros_in(rows: usize, cols: usize, alloc: A) -> Result<Self>
    where
        T: Default,
    {
        let data = Vector::with_len_in(element_count(rows, cols)?, alloc)?;
        Ok(Self { rows, cols, data })
    }

    /// Returns a slice view of the underlying data vector.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable slice view of the underlying data vector.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Gives up the matrix shape and returns the storage.
    pub fn into_data(self) -> Vector<T, A> {
        self.data
    }

    /// Gets the element at the specified row and column (immutable).
    /// Returns None if indices are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Gets the element at the specified row and column (mutable).
    /// Returns None if indices are out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            self.data.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// A contiguous view of row `row`.
    pub fn row(&self, row: usize) -> Option<VectorRef<'_, T>> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(VectorRef::new(&self.data[start..start + self.cols]))
    }

    pub fn row_mut(&mut self, row: usize) -> Option<VectorRefMut<'_, T>> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(VectorRefMut::new(&mut self.data[start..start + self.cols]))
    }

    /// A view of column `col`, stepping `cols` elements between rows.
    pub fn column(&self, col: usize) -> Option<VectorRef<'_, T>> {
        if col >= self.cols {
            return None;
        }
        let tail = self.data.get(col..).unwrap_or_default();
        VectorRef::strided(tail, self.cols, self.rows).ok()
    }

    pub fn column_mut(&mut self, col: usize) -> Option<VectorRefMut<'_, T>> {
        if col >= self.cols {
            return None;
        }
        let (cols, rows) = (self.cols, self.rows);
        let tail = self.data.get_mut(col..).unwrap_or_default();
        VectorRefMut::strided(tail, cols, rows).ok()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for DenseMatrix<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseMatrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("data", &self.data)
            .finish()
    }
}

// Implement the generic Matrix trait
impl<T: fmt::Debug, A: Allocator> Matrix for DenseMatrix<T, A> {
    type Value = T;

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    // rows(), cols(), is_square() are provided by default impls in the trait
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DenseMatrix<i32> {
        // 1 2 3
        // 4 5 6
        DenseMatrix::from_slice(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let data = Vector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
        match DenseMatrix::new(2, 2, data) {
            Err(StrideError::InvalidDimensions(msg)) => {
                assert!(msg.contains("Data length (3)"));
                assert!(msg.contains("2x2"));
            }
            _ => panic!("Expected InvalidDimensions error"),
        }
    }

    #[test]
    fn test_overflowing_dimensions() {
        let result: Result<DenseMatrix<u8>> = DenseMatrix::zeros(usize::MAX, 2);
        assert!(matches!(result, Err(StrideError::InvalidDimensions(_))));
    }

    #[test]
    fn test_zeros_and_dims() {
        let m: DenseMatrix<f64> = DenseMatrix::zeros(3, 3).unwrap();
        assert_eq!(m.dims(), (3, 3));
        assert!(m.is_square());
        assert!(m.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_get_row_major() {
        let mut m = sample();
        assert_eq!(m.get(1, 0), Some(&4));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 3), None);
        *m.get_mut(0, 2).unwrap() = 30;
        assert_eq!(m.data(), &[1, 2, 30, 4, 5, 6]);
    }

    #[test]
    fn test_rows_and_columns() {
        let m = sample();
        assert_eq!(m.row(1).unwrap(), [4, 5, 6]);
        assert!(m.row(2).is_none());

        let col = m.column(2).unwrap();
        assert_eq!(col.step(), 3);
        assert_eq!(col, [3, 6]);
        assert_eq!(m.column(0).unwrap(), [1, 4]);
        assert!(m.column(3).is_none());
    }

    #[test]
    fn test_column_mut_writes_through() {
        let mut m = sample();
        m.column_mut(1).unwrap().mul_in_place(10);
        m.row_mut(0).unwrap().add_in_place(&[1, 1, 1]).unwrap();
        assert_eq!(m.into_data(), [2, 21, 4, 4, 50, 6]);
    }

    #[test]
    fn test_empty_shapes() {
        let m: DenseMatrix<i32> = DenseMatrix::zeros(0, 4).unwrap();
        assert_eq!(m.column(3).unwrap().len(), 0);
        assert!(m.row(0).is_none());

        let m: DenseMatrix<i32> = DenseMatrix::zeros(4, 0).unwrap();
        assert_eq!(m.row(3).unwrap().len(), 0);
        assert!(m.column(0).is_none());
    }
}
