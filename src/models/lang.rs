//! 语言识别
//!
//! 统计汉字与拉丁字母的数量，判断一段文本以中文还是英文为主。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 语言标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    En,
    Zh,
}

impl LanguageTag {
    /// 双语对中的另一种语言
    pub fn other(self) -> Self {
        match self {
            LanguageTag::En => LanguageTag::Zh,
            LanguageTag::Zh => LanguageTag::En,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageTag::En => "en",
            LanguageTag::Zh => "zh",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 判断文本的主要语言
///
/// 汉字数量严格多于拉丁字母数量时返回 `Zh`，否则返回 `En`
/// （空字符串、纯标点以及数量相等都视为英文）。
pub fn classify(text: &str) -> LanguageTag {
    let (mut zh_count, mut en_count) = (0usize, 0usize);
    for c in text.chars() {
        if is_han(c) {
            zh_count += 1;
        } else if c.is_ascii_alphabetic() {
            en_count += 1;
        }
    }

    if zh_count > en_count {
        LanguageTag::Zh
    } else {
        LanguageTag::En
    }
}

/// 判断一对互为译文的文本中，`text` 是哪种语言
///
/// 夹杂大量英文标识符的中文会被 [`classify`] 判成英文，
/// 而译文几乎不含汉字，所以比较两段文本的汉字数量更可靠。
/// 数量相同时退回到 [`classify`]。
pub fn classify_against(text: &str, counterpart: &str) -> LanguageTag {
    let (text_han, counterpart_han) = (han_count(text), han_count(counterpart));
    if text_han > counterpart_han {
        LanguageTag::Zh
    } else if text_han < counterpart_han {
        LanguageTag::En
    } else {
        classify(text)
    }
}

fn han_count(text: &str) -> usize {
    text.chars().filter(|&c| is_han(c)).count()
}

/// 是否为汉字（CJK 统一表意文字及其扩展区、兼容区）
fn is_han(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2FA1F}'
    )
}
