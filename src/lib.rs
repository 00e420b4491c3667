//! # Idea Polish
//!
//! 把一条简短的想法润色、翻译成中英双语文档，并提交到内容仓库
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与外部系统通信，只暴露能力
//! - `ChatBackend` - LLM 对话（`LlmClient` 基于 async-openai）
//! - `ContentStore` - 只追加的内容仓库（`GithubClient` 基于 GitHub 内容 API）
//!
//! ### ② 数据模型（Models）
//! - `models/` - 提交、语言标签、结构化结果、slug、Markdown 文档
//! - `classify` - 语言识别
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条想法的一个步骤
//! - `repair` - 修复 LLM 返回的近似 JSON
//! - `LlmService` - 各类提示词
//! - `assemble` - 渲染两种语言的文档
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一条想法"的完整处理流程
//! - `IdeaCtx` - 上下文封装（请求标识 + 当前阶段）
//! - `IdeaFlow` - 流程编排（识别 → 润色 → slug → 扩展 → 组装 → 提交）
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{IdeaSubmission, LanguageTag, StructuredResult, SubmitRequest, SubmitResponse};
pub use workflow::{IdeaFlow, PostOutcome};
