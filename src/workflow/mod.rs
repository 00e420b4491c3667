pub mod idea_ctx;
pub mod idea_flow;

pub use idea_ctx::{IdeaCtx, PipelineStage};
pub use idea_flow::{IdeaFlow, PostOutcome};
