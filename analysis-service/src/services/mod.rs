pub mod extract;
pub mod prompt;
pub mod providers;

pub use extract::extract_json_object;
pub use providers::{
    GenerationParams, ImageData, ProviderError, ProviderResponse, VisionProvider,
};
