//! Backend type aliases and device management
//!
//! The value network is small enough that the CPU `NdArray` backend is all
//! it needs. Gradients are computed by hand in [`crate::rl::network`], so the
//! backend is used without the autodiff wrapper.
//!
//! # Example
//!
//! ```rust
//! use q_snake::rl::{default_device, TrainingBackend};
//! use q_snake::rl::matrix;
//!
//! let device = default_device();
//! let m = matrix::zeros::<TrainingBackend>(2, 3, &device);
//! assert_eq!(matrix::shape(&m), (2, 3));
//! ```

use burn::backend::ndarray::{NdArray, NdArrayDevice};

/// Backend used for training and play
pub type TrainingBackend = NdArray<f32>;

/// Get the default device for computation
///
/// Returns the default NdArray device (CPU).
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
