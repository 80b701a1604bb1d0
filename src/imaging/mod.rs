//! Image normalization, test-time augmentation and tensor standardization

pub mod augment;
pub mod preprocess;
pub mod tensor;

pub use augment::AugmentationSet;
pub use preprocess::ImagePreprocessor;
pub use tensor::{standardize, InputTensor};
