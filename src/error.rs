//! Error types for every stage of the predict workflow.
//!
//! Each stage has its own enum so callers can tell a corrupt upload from a
//! missing model artifact; [`Error`] wraps them all for code that does not care.

use std::path::PathBuf;

use thiserror::Error;

/// Image could not be turned into an input tensor (DecodeError).
#[derive(Error, Debug)]
pub enum PreprocessError {
    /// Bytes are not a decodable image (corrupt data, unsupported format).
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Decoded image has a zero-length side.
    #[error("degenerate image dimensions {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },

    /// Batch size of zero was requested.
    #[error("batch size must be at least 1")]
    ZeroBatch,

    /// Target canvas side of zero was requested.
    #[error("target size must be at least 1")]
    ZeroTarget,
}

/// Model artifact could not be resolved or materialized (AssetLoadError).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unknown plant '{0}'")]
    UnknownPlant(String),

    #[error("missing model artifact '{path}': {source}")]
    MissingArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model descriptor '{path}': {source}")]
    MalformedDescriptor {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported weight dtype '{dtype}' for '{name}'")]
    UnsupportedDtype { name: String, dtype: String },

    #[error("weight payload is {actual} bytes, manifest describes {expected}")]
    WeightPayloadSize { expected: usize, actual: usize },

    #[error("layer {layer} expects {expected} weight tensors, manifest provides {actual}")]
    WeightCount { layer: usize, expected: usize, actual: usize },

    #[error("layer {layer} weight '{name}' has shape {actual:?}, expected {expected:?}")]
    WeightShape {
        layer: usize,
        name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Inference could not run on the given input (ShapeMismatchError).
#[derive(Error, Debug, PartialEq)]
pub enum PredictError {
    #[error("input shape {actual:?} does not match model input {expected:?}")]
    ShapeMismatch { expected: [usize; 3], actual: [usize; 3] },

    #[error("input batch is empty")]
    EmptyBatch,

    #[error("model has no layers")]
    EmptyNetwork,
}

/// Configuration could not be read or is out of range.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// The global tracing subscriber could not be installed.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log filter '{level}': {source}")]
    Filter {
        level: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to initialize logging: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Crate-wide error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
