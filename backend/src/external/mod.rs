//! External API integrations

pub mod chat_completion;
pub mod image_generation;

pub use chat_completion::{ChatCompletionClient, ChatMessage};
pub use image_generation::ImageGenerationClient;
