use std::time::Duration;

use thiserror::Error;

use crate::models::{LanguageTag, MarkdownDocument, ParseError};
use crate::workflow::PipelineStage;

/// 应用程序错误类型
///
/// 每个变体都对应调用方可见的一类失败，`Display` 即返回给调用方的原因。
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验失败（不会发起任何外部调用）
    #[error("输入无效: {0}")]
    Validation(#[from] ValidationError),

    /// LLM 返回内容修复、解析后仍然无效
    #[error("LLM 返回内容无法解析 (阶段: {stage}): {source}")]
    MalformedResponse {
        stage: PipelineStage,
        #[source]
        source: ParseError,
        /// 原始返回内容
        raw: String,
        /// 修复后的内容
        repaired: String,
    },

    /// 上游服务（LLM 或写入 API）失败
    #[error("上游调用失败 (阶段: {stage}): {source}")]
    Upstream {
        stage: PipelineStage,
        #[source]
        source: UpstreamError,
    },

    /// 只有一种语言的文档提交成功
    ///
    /// `pending` 是未写入的文档，交给 `IdeaFlow::complete` 补写，
    /// 不必重跑整个流程。
    #[error("部分提交: {committed} 版本已写入 {committed_path}，{missing} 版本写入失败: {source}")]
    PartialCommit {
        committed: LanguageTag,
        committed_path: String,
        missing: LanguageTag,
        pending: Box<MarkdownDocument>,
        #[source]
        source: Box<AppError>,
    },

    /// 所有候选 slug 均已被占用
    #[error("slug '{base}' 尝试 {attempts} 次后仍然冲突")]
    SlugExhausted { base: String, attempts: usize },

    /// 请求被取消
    #[error("请求已取消 (阶段: {stage})")]
    Cancelled { stage: PipelineStage },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 输入校验错误
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 内容为空
    #[error("内容不能为空")]
    EmptyContent,
}

/// 上游调用错误
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// 调用超时
    #[error("调用超时 ({}秒)", .after.as_secs())]
    Timeout { after: Duration },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 返回结果为空
    #[error("LLM返回结果为空 (模型: {model})")]
    EmptyResponse { model: String },

    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 内容写入 API 错误
#[derive(Debug, Error)]
pub enum WriteError {
    /// 网络请求失败
    #[error("写入请求失败 ({path}): {source}")]
    RequestFailed {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// 目标路径已存在
    #[error("路径已存在: {path}")]
    AlreadyExists { path: String },

    /// API 返回非成功状态
    #[error("写入 API 返回 {status} ({path}): {body}")]
    BadStatus {
        path: String,
        status: u16,
        body: String,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建上游调用错误
    pub fn upstream(stage: PipelineStage, source: impl Into<UpstreamError>) -> Self {
        AppError::Upstream {
            stage,
            source: source.into(),
        }
    }

    /// 该错误发生时，是否已有文档写入成功
    pub fn is_partial(&self) -> bool {
        matches!(self, AppError::PartialCommit { .. })
    }

    /// 部分提交时尚未写入的文档
    pub fn pending_document(&self) -> Option<&MarkdownDocument> {
        match self {
            AppError::PartialCommit { pending, .. } => Some(pending),
            _ => None,
        }
    }
}

impl LlmError {
    /// 创建 LLM API 调用错误
    pub fn api_call_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
