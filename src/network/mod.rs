pub mod metadata;
pub mod network;
pub mod spec;
pub mod weights;

pub use metadata::ModelMetadata;
pub use network::Network;
pub use spec::{ModelDescriptor, ModelTopology, WeightSpec, WeightsGroup, DEFAULT_WEIGHTS_FILE};
pub use weights::{decode_weights, encode_weights};
