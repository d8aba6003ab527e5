//! Dense 2D matrix primitives
//!
//! Thin, shape-checked wrappers over rank-2 Burn tensors. Every binary
//! operation verifies its operand shapes first and reports a mismatch as an
//! error naming the operation and both shapes, so a wiring mistake in the
//! network surfaces as a diagnostic instead of a backend panic.

use anyhow::{anyhow, ensure, Result};
use burn::tensor::{activation, backend::Backend, Tensor, TensorData};

/// A rows × cols matrix
pub type Matrix<B> = Tensor<B, 2>;

/// (rows, cols) of a matrix
pub fn shape<B: Backend>(m: &Matrix<B>) -> (usize, usize) {
    let [rows, cols] = m.dims();
    (rows, cols)
}

/// Allocate a zero-filled matrix
pub fn zeros<B: Backend>(rows: usize, cols: usize, device: &B::Device) -> Matrix<B> {
    Tensor::zeros([rows, cols], device)
}

/// Build a matrix from row-major values
pub fn from_vec<B: Backend>(
    data: Vec<f32>,
    rows: usize,
    cols: usize,
    device: &B::Device,
) -> Result<Matrix<B>> {
    ensure!(
        data.len() == rows * cols,
        "from_vec: {} values cannot fill a {}x{} matrix",
        data.len(),
        rows,
        cols
    );
    Ok(Tensor::from_data(TensorData::new(data, [rows, cols]), device))
}

/// Read a matrix back as row-major values
pub fn to_vec<B: Backend>(m: &Matrix<B>) -> Result<Vec<f32>> {
    m.to_data()
        .to_vec::<f32>()
        .map_err(|err| anyhow!("failed to read matrix values: {err:?}"))
}

/// Matrix product `a · b`
pub fn matmul<B: Backend>(a: &Matrix<B>, b: &Matrix<B>) -> Result<Matrix<B>> {
    let (a_rows, a_cols) = shape(a);
    let (b_rows, b_cols) = shape(b);
    ensure!(
        a_cols == b_rows,
        "matmul: cannot multiply {a_rows}x{a_cols} by {b_rows}x{b_cols}"
    );
    Ok(a.clone().matmul(b.clone()))
}

/// Elementwise sum
pub fn add<B: Backend>(a: &Matrix<B>, b: &Matrix<B>) -> Result<Matrix<B>> {
    ensure_same_shape("add", a, b)?;
    Ok(a.clone().add(b.clone()))
}

/// Elementwise product
pub fn hadamard<B: Backend>(a: &Matrix<B>, b: &Matrix<B>) -> Result<Matrix<B>> {
    ensure_same_shape("hadamard", a, b)?;
    Ok(a.clone().mul(b.clone()))
}

/// `a - scale * b`, the SGD update rule
pub fn scaled_sub<B: Backend>(a: &Matrix<B>, b: &Matrix<B>, scale: f32) -> Result<Matrix<B>> {
    ensure_same_shape("scaled_sub", a, b)?;
    Ok(a.clone().sub(b.clone().mul_scalar(scale)))
}

/// Independent copy of a matrix
pub fn copy<B: Backend>(m: &Matrix<B>) -> Matrix<B> {
    m.clone()
}

pub fn transpose<B: Backend>(m: &Matrix<B>) -> Matrix<B> {
    m.clone().transpose()
}

/// max(0, x) elementwise
pub fn relu<B: Backend>(m: &Matrix<B>) -> Matrix<B> {
    activation::relu(m.clone())
}

/// Derivative of ReLU: 1 where x > 0, else 0
pub fn relu_mask<B: Backend>(m: &Matrix<B>) -> Matrix<B> {
    m.clone().greater_elem(0.0).float()
}

/// Row-major flatten into a single column
pub fn flatten<B: Backend>(m: &Matrix<B>) -> Matrix<B> {
    let (rows, cols) = shape(m);
    m.clone().reshape([rows * cols, 1])
}

fn ensure_same_shape<B: Backend>(op: &str, a: &Matrix<B>, b: &Matrix<B>) -> Result<()> {
    let (a_rows, a_cols) = shape(a);
    let (b_rows, b_cols) = shape(b);
    ensure!(
        a_rows == b_rows && a_cols == b_cols,
        "{op}: shape mismatch {a_rows}x{a_cols} vs {b_rows}x{b_cols}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    type TestBackend = NdArray<f32>;

    fn m(data: &[f32], rows: usize, cols: usize) -> Matrix<TestBackend> {
        from_vec(data.to_vec(), rows, cols, &NdArrayDevice::default()).unwrap()
    }

    #[test]
    fn test_zeros_shape_and_values() {
        let z = zeros::<TestBackend>(3, 4, &NdArrayDevice::default());
        assert_eq!(shape(&z), (3, 4));
        assert!(to_vec(&z).unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let result = from_vec::<TestBackend>(vec![1.0; 5], 2, 3, &NdArrayDevice::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_matmul() {
        let a = m(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let b = m(&[1.0, 0.0, 0.0, 1.0, 1.0, 1.0], 3, 2);

        let c = matmul(&a, &b).unwrap();

        assert_eq!(shape(&c), (2, 2));
        assert_eq!(to_vec(&c).unwrap(), vec![4.0, 5.0, 10.0, 11.0]);
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let a = m(&[1.0; 6], 2, 3);
        let b = m(&[1.0; 6], 2, 3);

        let err = matmul(&a, &b).unwrap_err();
        assert!(err.to_string().contains("2x3 by 2x3"));
    }

    #[test]
    fn test_add_and_mismatch() {
        let a = m(&[1.0, 2.0], 2, 1);
        let b = m(&[0.5, -2.0], 2, 1);
        assert_eq!(to_vec(&add(&a, &b).unwrap()).unwrap(), vec![1.5, 0.0]);

        let c = m(&[1.0, 2.0], 1, 2);
        assert!(add(&a, &c).is_err());
    }

    #[test]
    fn test_hadamard_and_scaled_sub() {
        let a = m(&[1.0, 2.0, 3.0], 3, 1);
        let b = m(&[2.0, 0.0, -1.0], 3, 1);

        assert_eq!(to_vec(&hadamard(&a, &b).unwrap()).unwrap(), vec![2.0, 0.0, -3.0]);
        assert_eq!(
            to_vec(&scaled_sub(&a, &b, 0.5).unwrap()).unwrap(),
            vec![0.0, 2.0, 3.5]
        );
    }

    #[test]
    fn test_relu_and_mask() {
        let a = m(&[-1.0, 0.0, 2.5, -0.1], 2, 2);

        assert_eq!(to_vec(&relu(&a)).unwrap(), vec![0.0, 0.0, 2.5, 0.0]);
        assert_eq!(to_vec(&relu_mask(&a)).unwrap(), vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_flatten_is_row_major_column() {
        let a = m(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let col = flatten(&a);

        assert_eq!(shape(&col), (6, 1));
        assert_eq!(to_vec(&col).unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_transpose_and_copy() {
        let a = m(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let t = transpose(&a);

        assert_eq!(shape(&t), (3, 2));
        assert_eq!(to_vec(&t).unwrap(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

        let c = copy(&a);
        assert_eq!(to_vec(&c).unwrap(), to_vec(&a).unwrap());
    }
}
