pub mod assembler;
pub mod llm_service;
pub mod prompts;
pub mod repair;

pub use assembler::{assemble, commit_message, AssembledPair, Augmentation};
pub use llm_service::LlmService;
pub use repair::{repair, strip_code_fence};
