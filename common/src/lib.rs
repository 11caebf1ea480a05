pub mod file_format;
pub mod float_ext;
pub mod log_setup;
pub mod serde;

pub use file_format::{FileExtensionError, FileFormat};

/// Tolerance for comparing floating point values that should be equal
/// after a lossless transformation.
pub const EPSILON: f64 = 1e-9;
