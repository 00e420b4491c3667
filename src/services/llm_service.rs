//! LLM 服务 - 业务能力层
//!
//! 只负责"向模型要什么"，不关心流程顺序、超时和重试策略。
//! 每个方法对应一种提示词，返回模型的原始文本。

use std::sync::Arc;

use tracing::debug;

use crate::clients::ChatBackend;
use crate::config::Config;
use crate::error::LlmError;
use crate::models::LanguageTag;
use crate::services::prompts;

/// LLM 服务
///
/// 职责：
/// - 拼装提示词
/// - 选择模型（轻量任务用标题模型）
/// - 不解析结构化结果
pub struct LlmService {
    backend: Arc<dyn ChatBackend>,
    model_name: String,
    title_model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            model_name: config.llm_model_name.clone(),
            title_model_name: config.llm_title_model_name.clone(),
        }
    }

    /// 为没有标题的想法生成标题
    pub async fn generate_title(&self, content: &str) -> Result<String, LlmError> {
        let title = self
            .backend
            .complete(&self.title_model_name, prompts::TITLE_PROMPT, content)
            .await?;
        Ok(clean_title(&title))
    }

    /// 润色并翻译，返回模型原始回复（期望是 JSON）
    ///
    /// `attempt` 从 0 开始，重试时会在提示词末尾追加格式提醒。
    pub async fn polish_and_translate(
        &self,
        title: Option<&str>,
        content: &str,
        lang: LanguageTag,
        attempt: usize,
    ) -> Result<String, LlmError> {
        let user_message = build_polish_message(title, content, lang, attempt);
        debug!(
            "润色请求 (第 {} 次)，长度: {} 字符",
            attempt + 1,
            user_message.chars().count()
        );

        self.backend
            .complete(&self.model_name, prompts::POLISH_PROMPT, &user_message)
            .await
    }

    /// 根据英文标题生成 slug（未清洗）
    pub async fn generate_slug(&self, english_title: &str) -> Result<String, LlmError> {
        self.backend
            .complete(&self.title_model_name, prompts::SLUG_PROMPT, english_title)
            .await
    }

    /// 生成扩展内容（Context / Key Insights / Open Questions）
    pub async fn augment(&self, title: &str, content: &str) -> Result<String, LlmError> {
        let user_message = format!("Title: {}\n\nContent:\n{}", title, content);
        self.backend
            .complete(&self.model_name, prompts::AUGMENT_PROMPT, &user_message)
            .await
    }

    /// 把扩展内容翻译成另一种语言
    pub async fn translate_augmentation(
        &self,
        block: &str,
        from: LanguageTag,
        to: LanguageTag,
    ) -> Result<String, LlmError> {
        let user_message = format!(
            "Source language: {}\nTarget language: {}\n\n{}",
            language_name(from),
            language_name(to),
            block
        );
        self.backend
            .complete(&self.model_name, prompts::TRANSLATE_PROMPT, &user_message)
            .await
    }
}

/// 构建润色请求的 user 消息
fn build_polish_message(
    title: Option<&str>,
    content: &str,
    lang: LanguageTag,
    attempt: usize,
) -> String {
    let mut message = format!(
        "Source language: {}\nTitle: {}\n\nContent:\n{}",
        lang,
        title.unwrap_or(""),
        content
    );
    if attempt > 0 {
        message.push_str("\n\n");
        message.push_str(prompts::MALFORMED_RETRY_HINT);
    }
    message
}

/// 去掉模型常加的引号和 "Title:" 前缀
fn clean_title(raw: &str) -> String {
    let line = raw.trim().lines().next().unwrap_or_default().trim();
    let line = line
        .strip_prefix("Title:")
        .or_else(|| line.strip_prefix("标题："))
        .unwrap_or(line)
        .trim();
    line.trim_matches(|c: char| {
        matches!(c, '"' | '\'' | '“' | '”' | '「' | '」' | '《' | '》')
    })
    .trim()
    .to_string()
}

fn language_name(lang: LanguageTag) -> &'static str {
    match lang {
        LanguageTag::En => "English",
        LanguageTag::Zh => "Chinese (Simplified)",
    }
}
