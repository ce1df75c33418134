pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod error;
pub mod config;
pub mod logging;
pub mod plant;
pub mod preprocess;
pub mod loader;
pub mod predictor;
pub mod workflow;
pub mod ui;
pub mod demo;

// Convenience re-exports
pub use math::{matrix::Matrix, tensor::Tensor};
pub use activation::activation::ActivationFunction;
pub use network::{ModelDescriptor, Network};
pub use error::{Error, LoadError, LoggingError, PredictError, PreprocessError, Result};
pub use config::AppConfig;
pub use plant::Plant;
pub use preprocess::{preprocess_image, Preprocessor};
pub use loader::{ModelSource, ModelStore};
pub use predictor::{predict, Diagnosis, Prediction};
pub use workflow::PredictWorkflow;
pub use ui::{Session, UiState};
