//! Trained classifier loading and inference

pub mod classifier;
pub mod handle;
pub mod loader;
pub mod logistic;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use classifier::Classifier;
pub use handle::ModelHandle;
pub use loader::ModelLoader;
pub use logistic::LogisticModel;
