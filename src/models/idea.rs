use chrono::{DateTime, FixedOffset, Local};

use crate::error::ValidationError;

/// 一条待处理的想法
///
/// 创建后不再修改。可选字段为空白时视为未提供。
#[derive(Debug, Clone)]
pub struct IdeaSubmission {
    title: Option<String>,
    content: String,
    augmented: Option<String>,
    received_at: DateTime<FixedOffset>,
}

impl IdeaSubmission {
    /// 校验并创建，内容在去除首尾空白后不能为空
    pub fn new(
        title: Option<String>,
        content: impl AsRef<str>,
        augmented: Option<String>,
    ) -> Result<Self, ValidationError> {
        let content = content.as_ref().trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        Ok(Self {
            title: non_blank(title),
            content: content.to_string(),
            augmented: non_blank(augmented),
            received_at: Local::now().fixed_offset(),
        })
    }

    /// 固定提交时间（用于测试和重放）
    pub fn with_received_at(mut self, received_at: DateTime<FixedOffset>) -> Self {
        self.received_at = received_at;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn augmented(&self) -> Option<&str> {
        self.augmented.as_deref()
    }

    pub fn received_at(&self) -> DateTime<FixedOffset> {
        self.received_at
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
