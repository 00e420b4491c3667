//! Markdown 组装 - 业务能力层
//!
//! 纯转换：把结构化结果、slug 和扩展内容渲染成两篇文档，不发起任何网络请求。

use chrono::{DateTime, FixedOffset};

use crate::models::{FrontMatter, LanguageTag, MarkdownDocument, Slug, StructuredResult};

/// 提交信息最大长度（字符）
const MAX_COMMIT_MSG_CHARS: usize = 200;

/// 两种语言的扩展内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Augmentation {
    /// 原文语言版本
    pub native: String,
    /// 另一语言版本
    pub other: String,
}

/// 组装结果：原文语言文档与翻译文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPair {
    pub native: MarkdownDocument,
    pub other: MarkdownDocument,
}

/// 组装两篇文档
pub fn assemble(
    result: &StructuredResult,
    slug: &Slug,
    date: DateTime<FixedOffset>,
    augmentation: Option<&Augmentation>,
    content_dir: &str,
) -> AssembledPair {
    let native_lang = result.lang;
    let other_lang = native_lang.other();

    let native = build_document(
        result,
        native_lang,
        slug,
        date,
        augmentation.map(|a| a.native.as_str()),
        content_dir,
    );
    let other = build_document(
        result,
        other_lang,
        slug,
        date,
        augmentation.map(|a| a.other.as_str()),
        content_dir,
    );

    AssembledPair { native, other }
}

fn build_document(
    result: &StructuredResult,
    lang: LanguageTag,
    slug: &Slug,
    date: DateTime<FixedOffset>,
    augmentation: Option<&str>,
    content_dir: &str,
) -> MarkdownDocument {
    let front_matter = FrontMatter {
        title: result.title_in(lang).trim().to_string(),
        slug: slug.clone(),
        date,
        lang,
        counterpart: Some(MarkdownDocument::path_for(content_dir, slug, lang.other())),
    };

    let mut body = result.content_in(lang).to_string();
    if !body.ends_with('\n') {
        body.push('\n');
    }

    if let Some(block) = augmentation.map(str::trim).filter(|b| !b.is_empty()) {
        body.push('\n');
        body.push_str(augmented_heading(lang));
        body.push_str("\n\n");
        body.push_str(block);
        body.push('\n');
    }

    MarkdownDocument {
        path: MarkdownDocument::path_for(content_dir, slug, lang),
        front_matter,
        body,
    }
}

fn augmented_heading(lang: LanguageTag) -> &'static str {
    match lang {
        LanguageTag::En => "## Augmented",
        LanguageTag::Zh => "## 延伸阅读",
    }
}

/// 根据标题生成提交信息：去掉控制字符，限制长度
pub fn commit_message(title: &str) -> String {
    let cleaned: String = format!("ideas: {}", title)
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    cleaned
        .trim()
        .chars()
        .take(MAX_COMMIT_MSG_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}
