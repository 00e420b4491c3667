pub mod api;
pub mod document;
pub mod idea;
pub mod lang;
pub mod slug;
pub mod structured;

pub use api::{SubmitRequest, SubmitResponse};
pub use document::{FrontMatter, MarkdownDocument};
pub use idea::IdeaSubmission;
pub use lang::{classify, LanguageTag};
pub use slug::Slug;
pub use structured::{ParseError, StructuredResult};
