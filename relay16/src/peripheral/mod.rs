//! Peripheral drivers.

pub mod pca9535;
pub mod relay16;
