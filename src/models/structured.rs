use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lang::{classify_against, LanguageTag};

/// 一次润色 + 翻译的结构化结果
///
/// `polished_*` 字段使用 `lang` 指定的语言，`translated_*` 字段使用另一种语言。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredResult {
    pub lang: LanguageTag,
    pub polished_title: String,
    pub polished_content: String,
    pub translated_title: String,
    pub translated_content: String,
}

/// 结构化结果解析失败的原因
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON 语法错误、字段缺失或字段类型不对
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 字段为空白
    #[error("字段 {0} 为空")]
    BlankField(&'static str),
}

impl StructuredResult {
    /// 从（已修复的）JSON 文本解析
    ///
    /// 要么得到完整结果，要么失败，不接受部分字段。
    pub fn parse(json: &str) -> Result<Self, ParseError> {
        let result: StructuredResult = serde_json::from_str(json)?;

        let fields = [
            ("polished_title", &result.polished_title),
            ("polished_content", &result.polished_content),
            ("translated_title", &result.translated_title),
            ("translated_content", &result.translated_content),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ParseError::BlankField(name));
            }
        }

        Ok(result)
    }

    /// 以 `lang` 为准，让两组字段与标签一致
    ///
    /// 模型有时把译文放进 `polished_*`，或者标错 `lang`。
    /// `polished_content` 实际是另一种语言时交换两组字段，返回是否交换。
    pub fn align_to(&mut self, lang: LanguageTag) -> bool {
        let written = classify_against(&self.polished_content, &self.translated_content);
        self.lang = lang;
        if written == lang {
            return false;
        }

        std::mem::swap(&mut self.polished_title, &mut self.translated_title);
        std::mem::swap(&mut self.polished_content, &mut self.translated_content);
        true
    }

    /// 指定语言的标题
    pub fn title_in(&self, lang: LanguageTag) -> &str {
        if lang == self.lang {
            &self.polished_title
        } else {
            &self.translated_title
        }
    }

    /// 指定语言的正文
    pub fn content_in(&self, lang: LanguageTag) -> &str {
        if lang == self.lang {
            &self.polished_content
        } else {
            &self.translated_content
        }
    }
}
