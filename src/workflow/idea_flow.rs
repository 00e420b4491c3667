//! 想法处理流程 - 流程层
//!
//! 核心职责：定义"一条想法"从提交到写入仓库的完整流程
//!
//! 流程顺序：
//! 1. 识别语言（必要时先生成标题）
//! 2. 润色 + 翻译 → 修复 → 解析
//! 3. 生成 slug，处理冲突
//! 4. 扩展内容（调用方提供时直接使用），并翻译成另一种语言
//! 5. 组装两篇文档
//! 6. 依次写入原文语言和翻译文档

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::clients::{ChatBackend, ContentStore, GithubClient, LlmClient, WriteOutcome};
use crate::config::Config;
use crate::error::{AppError, AppResult, UpstreamError, WriteError};
use crate::models::{
    classify, IdeaSubmission, LanguageTag, MarkdownDocument, Slug, StructuredResult,
    SubmitRequest, SubmitResponse,
};
use crate::services::{
    assemble, commit_message, repair, strip_code_fence, AssembledPair, Augmentation, LlmService,
};
use crate::utils::logging::truncate_text;
use crate::workflow::idea_ctx::{IdeaCtx, PipelineStage};

/// 一次成功提交的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostOutcome {
    pub slug: Slug,
    /// 原文语言
    pub lang: LanguageTag,
    pub native_path: String,
    pub other_path: String,
}

/// 写入一对文档的结果
enum CommitStatus {
    Committed,
    /// 原文语言文档路径已被占用，需要换 slug
    NativeConflict,
}

/// 想法处理流程
///
/// - 编排完整的处理流程，决定何时调用哪个能力
/// - 不持有跨请求的可变状态，可以被多个请求并发使用
/// - 每次外部调用都有独立的超时，并响应请求取消
pub struct IdeaFlow {
    config: Arc<Config>,
    llm_service: LlmService,
    store: Arc<dyn ContentStore>,
}

impl IdeaFlow {
    /// 使用真实的 LLM 和 GitHub 客户端创建流程
    pub fn new(config: Config) -> Self {
        let chat: Arc<dyn ChatBackend> = Arc::new(LlmClient::new(&config));
        let store: Arc<dyn ContentStore> = Arc::new(GithubClient::new(&config));
        Self::with_backends(config, chat, store)
    }

    /// 使用指定的后端创建流程
    pub fn with_backends(
        config: Config,
        chat: Arc<dyn ChatBackend>,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            llm_service: LlmService::new(&config, chat),
            config: Arc::new(config),
            store,
        }
    }

    // ========== 对外接口 ==========

    /// 处理提交请求：完整流程，返回接口响应
    pub async fn handle_post(
        &self,
        request: SubmitRequest,
        cancel: &CancellationToken,
    ) -> SubmitResponse {
        let result = match request.into_submission() {
            Ok(submission) => self.post(&submission, cancel).await,
            Err(e) => Err(e.into()),
        };
        SubmitResponse::from(result)
    }

    /// 处理仅润色请求：返回润色后的正文，不写入仓库
    pub async fn handle_improve(
        &self,
        request: SubmitRequest,
        cancel: &CancellationToken,
    ) -> SubmitResponse {
        let result = match request.into_submission() {
            Ok(submission) => self.improve(&submission, cancel).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(result) => SubmitResponse::with_content(result.polished_content),
            Err(e) => SubmitResponse::failed(e.to_string()),
        }
    }

    /// 完整流程：润色、翻译、扩展并写入两篇文档
    pub async fn post(
        &self,
        submission: &IdeaSubmission,
        cancel: &CancellationToken,
    ) -> AppResult<PostOutcome> {
        let mut ctx = IdeaCtx::new(submission);
        self.log_submission(&ctx, submission);

        let result = self.run_post(&mut ctx, submission, cancel).await;
        match &result {
            Ok(outcome) => info!(
                "{} ✓ 已写入 {} 和 {}",
                ctx, outcome.native_path, outcome.other_path
            ),
            Err(e) => error!("{} ✗ 处理失败: {}", ctx, e),
        }
        result
    }

    /// 仅润色：识别语言并润色，不生成标题、不写入
    pub async fn improve(
        &self,
        submission: &IdeaSubmission,
        cancel: &CancellationToken,
    ) -> AppResult<StructuredResult> {
        let mut ctx = IdeaCtx::new(submission);
        self.log_submission(&ctx, submission);

        ctx.enter(PipelineStage::Classified);
        let lang = classify_submission(submission);

        ctx.enter(PipelineStage::Polished);
        let result = self
            .polish(&ctx, submission.title(), submission.content(), lang, cancel)
            .await;

        match &result {
            Ok(_) => ctx.enter(PipelineStage::Done),
            Err(e) => error!("{} ✗ 润色失败: {}", ctx, e),
        }
        result
    }

    /// 补写部分提交中缺失的文档
    ///
    /// 只写入 `pending` 本身，不重新生成内容，也不换 slug。
    /// 路径已存在时返回 `AlreadyExists`，不会覆盖。
    pub async fn complete(
        &self,
        pending: &MarkdownDocument,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        let ctx = IdeaCtx::for_document(pending);
        info!("{} 补写 {}", ctx, pending.path);

        match self.write_document(&ctx, pending, cancel).await? {
            WriteOutcome::Created => {
                info!("{} ✓ 已补写 {}", ctx, pending.path);
                Ok(())
            }
            WriteOutcome::Conflict => {
                error!("{} ✗ {} 已存在，未补写", ctx, pending.path);
                Err(AppError::upstream(
                    ctx.stage(),
                    WriteError::AlreadyExists {
                        path: pending.path.clone(),
                    },
                ))
            }
        }
    }

    // ========== 流程步骤 ==========

    async fn run_post(
        &self,
        ctx: &mut IdeaCtx,
        submission: &IdeaSubmission,
        cancel: &CancellationToken,
    ) -> AppResult<PostOutcome> {
        // Received → Classified
        ctx.enter(PipelineStage::Classified);
        let lang = classify_submission(submission);
        info!("{} 识别语言: {}", ctx, lang);

        // Classified → Polished
        ctx.enter(PipelineStage::Polished);
        let title = match submission.title() {
            Some(title) => title.to_string(),
            None => {
                let title = self
                    .guarded(
                        ctx,
                        self.config.title_timeout(),
                        cancel,
                        self.llm_service.generate_title(submission.content()),
                    )
                    .await?;
                info!("{} 生成标题: {}", ctx, title);
                title
            }
        };
        let result = self
            .polish(ctx, Some(&title), submission.content(), lang, cancel)
            .await?;

        // Polished → Sluggable
        ctx.enter(PipelineStage::Sluggable);
        let base_slug = self.derive_slug(ctx, submission, &result, cancel).await?;
        let (mut slug, mut attempt) = self.resolve_free_slug(ctx, &base_slug, 0, cancel).await?;
        info!("{} 使用 slug: {}", ctx, slug);

        // Sluggable → Augmented
        ctx.enter(PipelineStage::Augmented);
        let augmentation = self.augment(ctx, submission, &result, cancel).await?;

        loop {
            // Augmented → Assembled
            ctx.enter(PipelineStage::Assembled);
            let pair = assemble(
                &result,
                &slug,
                submission.received_at(),
                Some(&augmentation),
                &self.config.content_dir,
            );

            // Assembled → Committed
            ctx.enter(PipelineStage::Committed);
            match self.commit_pair(ctx, &pair, cancel).await? {
                CommitStatus::Committed => {
                    ctx.enter(PipelineStage::Done);
                    return Ok(PostOutcome {
                        slug,
                        lang: result.lang,
                        native_path: pair.native.path,
                        other_path: pair.other.path,
                    });
                }
                CommitStatus::NativeConflict => {
                    warn!("{} slug {} 在写入时已被占用，重新选择", ctx, slug);
                    (slug, attempt) = self
                        .resolve_free_slug(ctx, &base_slug, attempt + 1, cancel)
                        .await?;
                }
            }
        }
    }

    /// 润色 + 翻译，修复并解析结果
    ///
    /// 无法解析时最多额外重试 `max_malformed_retries` 次，重试提示词会要求严格的 JSON。
    async fn polish(
        &self,
        ctx: &IdeaCtx,
        title: Option<&str>,
        content: &str,
        lang: LanguageTag,
        cancel: &CancellationToken,
    ) -> AppResult<StructuredResult> {
        let max_attempts = self.config.max_malformed_retries + 1;
        let mut attempt = 0;

        loop {
            let raw = self
                .guarded(
                    ctx,
                    self.config.polish_timeout(),
                    cancel,
                    self.llm_service
                        .polish_and_translate(title, content, lang, attempt),
                )
                .await?;

            let repaired = repair(strip_code_fence(&raw));
            match StructuredResult::parse(&repaired) {
                Ok(mut result) => {
                    if result.lang != lang {
                        warn!(
                            "{} 模型返回语言 {} 与识别结果 {} 不一致，以识别结果为准",
                            ctx, result.lang, lang
                        );
                    }
                    if result.align_to(lang) {
                        warn!("{} 润色结果不是 {}，已交换原文与译文字段", ctx, lang);
                    }
                    return Ok(result);
                }
                Err(source) => {
                    error!(
                        "{} 返回内容无法解析 (第 {}/{} 次): {}\n原始内容: {}\n修复后: {}",
                        ctx,
                        attempt + 1,
                        max_attempts,
                        source,
                        raw,
                        repaired
                    );
                    attempt += 1;
                    if attempt >= max_attempts {
                        return Err(AppError::MalformedResponse {
                            stage: ctx.stage(),
                            source,
                            raw,
                            repaired,
                        });
                    }
                }
            }
        }
    }

    /// 生成 slug 基础值
    ///
    /// 模型返回的内容清洗后为空时，依次退回到英文标题和提交时间。
    async fn derive_slug(
        &self,
        ctx: &IdeaCtx,
        submission: &IdeaSubmission,
        result: &StructuredResult,
        cancel: &CancellationToken,
    ) -> AppResult<Slug> {
        let english_title = result.title_in(LanguageTag::En);
        let raw = self
            .guarded(
                ctx,
                self.config.slug_timeout(),
                cancel,
                self.llm_service.generate_slug(english_title),
            )
            .await?;

        let slug = Slug::sanitize(&raw)
            .or_else(|| {
                warn!("{} 模型返回的 slug 无效: {}", ctx, truncate_text(&raw, 80));
                Slug::sanitize(english_title)
            })
            .unwrap_or_else(|| Slug::from_timestamp(submission.received_at()));
        Ok(slug)
    }

    /// 从第 `start` 个候选开始，找到两种语言路径都未被占用的 slug
    ///
    /// 返回 (slug, 候选序号)。
    async fn resolve_free_slug(
        &self,
        ctx: &IdeaCtx,
        base: &Slug,
        start: usize,
        cancel: &CancellationToken,
    ) -> AppResult<(Slug, usize)> {
        let max_attempts = self.config.max_slug_attempts;

        for attempt in start..max_attempts {
            let candidate = if attempt == 0 {
                base.clone()
            } else {
                base.with_suffix(attempt + 1)
            };

            let mut taken = false;
            for lang in [LanguageTag::En, LanguageTag::Zh] {
                let path = MarkdownDocument::path_for(&self.config.content_dir, &candidate, lang);
                if self
                    .guarded(ctx, self.config.write_timeout(), cancel, self.store.exists(&path))
                    .await?
                {
                    info!("{} 路径已存在: {}", ctx, path);
                    taken = true;
                    break;
                }
            }

            if !taken {
                return Ok((candidate, attempt));
            }
        }

        Err(AppError::SlugExhausted {
            base: base.to_string(),
            attempts: max_attempts,
        })
    }

    /// 准备两种语言的扩展内容
    async fn augment(
        &self,
        ctx: &IdeaCtx,
        submission: &IdeaSubmission,
        result: &StructuredResult,
        cancel: &CancellationToken,
    ) -> AppResult<Augmentation> {
        let native = match submission.augmented() {
            Some(augmented) => {
                info!("{} 使用调用方提供的扩展内容", ctx);
                augmented.to_string()
            }
            None => {
                self.guarded(
                    ctx,
                    self.config.augment_timeout(),
                    cancel,
                    self.llm_service
                        .augment(&result.polished_title, &result.polished_content),
                )
                .await?
            }
        };

        let other = self
            .guarded(
                ctx,
                self.config.augment_timeout(),
                cancel,
                self.llm_service
                    .translate_augmentation(&native, result.lang, result.lang.other()),
            )
            .await?;

        Ok(Augmentation { native, other })
    }

    /// 依次写入原文语言文档和翻译文档
    ///
    /// 原文写入成功后，翻译文档的任何失败都报告为部分提交。
    async fn commit_pair(
        &self,
        ctx: &IdeaCtx,
        pair: &AssembledPair,
        cancel: &CancellationToken,
    ) -> AppResult<CommitStatus> {
        match self.write_document(ctx, &pair.native, cancel).await? {
            WriteOutcome::Created => info!("{} ✓ 已写入 {}", ctx, pair.native.path),
            WriteOutcome::Conflict => return Ok(CommitStatus::NativeConflict),
        }

        let second = match self.write_document(ctx, &pair.other, cancel).await {
            Ok(WriteOutcome::Created) => Ok(()),
            Ok(WriteOutcome::Conflict) => Err(AppError::upstream(
                ctx.stage(),
                WriteError::AlreadyExists {
                    path: pair.other.path.clone(),
                },
            )),
            Err(e) => Err(e),
        };

        match second {
            Ok(()) => {
                info!("{} ✓ 已写入 {}", ctx, pair.other.path);
                Ok(CommitStatus::Committed)
            }
            Err(source) => {
                error!(
                    "{} ⚠️ {} 已写入，{} 写入失败: {}",
                    ctx, pair.native.path, pair.other.path, source
                );
                Err(AppError::PartialCommit {
                    committed: pair.native.lang(),
                    committed_path: pair.native.path.clone(),
                    missing: pair.other.lang(),
                    pending: Box::new(pair.other.clone()),
                    source: Box::new(source),
                })
            }
        }
    }

    async fn write_document(
        &self,
        ctx: &IdeaCtx,
        document: &MarkdownDocument,
        cancel: &CancellationToken,
    ) -> AppResult<WriteOutcome> {
        let content = document.render();
        let message = commit_message(document.title());
        self.guarded(
            ctx,
            self.config.write_timeout(),
            cancel,
            self.store.create(&document.path, &content, &message),
        )
        .await
    }

    // ========== 辅助方法 ==========

    /// 为一次外部调用加上超时和取消
    async fn guarded<T, E, F>(
        &self,
        ctx: &IdeaCtx,
        timeout: Duration,
        cancel: &CancellationToken,
        call: F,
    ) -> AppResult<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<UpstreamError>,
    {
        let stage = ctx.stage();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("{} 请求已取消", ctx);
                Err(AppError::Cancelled { stage })
            }
            outcome = tokio::time::timeout(timeout, call) => match outcome {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(AppError::upstream(stage, e)),
                Err(_) => {
                    warn!("{} 调用超时 ({:?})", ctx, timeout);
                    Err(AppError::upstream(stage, UpstreamError::Timeout { after: timeout }))
                }
            },
        }
    }

    /// 显示提交预览
    fn log_submission(&self, ctx: &IdeaCtx, submission: &IdeaSubmission) {
        info!(
            "{} 收到想法: {} | 标题: {}",
            ctx,
            truncate_text(submission.content(), 80),
            submission.title().unwrap_or("(自动生成)")
        );
    }
}

/// 识别提交的语言：有标题时标题和正文一起统计
fn classify_submission(submission: &IdeaSubmission) -> LanguageTag {
    match submission.title() {
        Some(title) => classify(&format!("{}\n{}", title, submission.content())),
        None => classify(submission.content()),
    }
}
