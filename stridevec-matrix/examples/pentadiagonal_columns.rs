use stridevec_matrix::{DenseMatrix, Matrix, StrideError, Vector};

/// Creates a pentadiagonal matrix A of size n x n.
/// Diagonals:
/// - Main: 4.0
/// - Adjacent (+1, -1): -1.0
/// - Outer (+2, -2): -0.5
fn create_pentadiagonal_matrix(n: usize) -> Result<DenseMatrix<f64>, StrideError> {
    let mut a = DenseMatrix::zeros(n, n)?;
    for i in 0..n {
        for j in i.saturating_sub(2)..(i + 3).min(n) {
            let value = match i.abs_diff(j) {
                0 => 4.0,
                1 => -1.0,
                _ => -0.5,
            };
            if let Some(slot) = a.get_mut(i, j) {
                *slot = value;
            }
        }
    }
    Ok(a)
}

fn main() -> Result<(), StrideError> {
    // Initialize logging based on RUST_LOG environment variable
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n = 8;
    let mut a = create_pentadiagonal_matrix(n)?;
    log::info!("Built {}x{} pentadiagonal matrix", a.rows(), a.cols());

    // Column sums through strided views.
    let sums: Vector<f64> = (0..a.cols())
        .filter_map(|j| a.column(j))
        .map(|col| col.iter().sum())
        .collect();
    log::info!("Column sums: {:?}", sums);

    // Scale the last column in place; the same storage is visible through the rows.
    if let Some(mut last) = a.column_mut(n - 1) {
        last.mul_in_place(2.0);
    }
    if let Some(row) = a.row(n - 1) {
        log::info!("Last row after scaling: {:?}", row);
    }
    Ok(())
}
