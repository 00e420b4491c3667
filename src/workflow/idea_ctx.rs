//! 想法处理上下文
//!
//! 封装"正在处理哪一条想法、走到了哪一步"这一信息

use std::fmt::{self, Display};

use tracing::info;

use crate::models::{IdeaSubmission, MarkdownDocument};

/// 流程阶段
///
/// 出错时记录的是正在进入的阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Classified,
    Polished,
    Sluggable,
    Augmented,
    Assembled,
    Committed,
    Done,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Classified => "classified",
            PipelineStage::Polished => "polished",
            PipelineStage::Sluggable => "sluggable",
            PipelineStage::Augmented => "augmented",
            PipelineStage::Assembled => "assembled",
            PipelineStage::Committed => "committed",
            PipelineStage::Done => "done",
        }
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 想法处理上下文（仅用于当前请求，不跨请求共享）
#[derive(Debug, Clone)]
pub struct IdeaCtx {
    /// 日志中用于区分请求的标识
    pub idea_id: String,
    stage: PipelineStage,
}

impl IdeaCtx {
    /// 创建新的上下文，阶段为 `Received`
    pub fn new(submission: &IdeaSubmission) -> Self {
        Self {
            idea_id: submission.received_at().format("%Y%m%d-%H%M%S%.3f").to_string(),
            stage: PipelineStage::Received,
        }
    }

    /// 补写单篇文档时使用的上下文，以 slug 作为标识，阶段为 `Committed`
    pub fn for_document(document: &MarkdownDocument) -> Self {
        Self {
            idea_id: document.front_matter.slug.to_string(),
            stage: PipelineStage::Committed,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// 进入下一阶段
    pub fn enter(&mut self, stage: PipelineStage) {
        info!("{} → {}", self, stage);
        self.stage = stage;
    }
}

impl Display for IdeaCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[想法 #{} 阶段#{}]", self.idea_id, self.stage)
    }
}
