//! 外部系统客户端
//!
//! 只负责与外部服务通信，不包含业务流程。
//! 流程层通过 [`ChatBackend`] 和 [`ContentStore`] 两个 trait 使用客户端，
//! 测试中可以替换为内存实现。

pub mod github_client;
pub mod llm_client;

pub use github_client::GithubClient;
pub use llm_client::LlmClient;

use async_trait::async_trait;

use crate::error::{LlmError, WriteError};

/// LLM 对话接口
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// 发送一轮 system + user 对话，返回去除首尾空白的回复文本
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, LlmError>;
}

/// 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// 新文件已创建
    Created,
    /// 路径已存在，未写入
    Conflict,
}

/// 只追加的内容仓库
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// 路径是否已存在
    async fn exists(&self, path: &str) -> Result<bool, WriteError>;

    /// 创建新文件，已存在时返回 [`WriteOutcome::Conflict`]
    async fn create(
        &self,
        path: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<WriteOutcome, WriteError>;
}
