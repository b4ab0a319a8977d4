//! Configuration sections, one per component that needs settings.

pub mod chat;
pub mod defaults;
pub mod embedding;
pub mod pipeline;
pub mod prompts;
pub mod retry;
pub mod storage;

pub use chat::*;
pub use embedding::*;
pub use pipeline::*;
pub use prompts::*;
pub use retry::*;
pub use storage::*;
