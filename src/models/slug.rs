use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

/// slug 最大长度
pub const MAX_SLUG_LEN: usize = 60;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug 正则无效"));

/// URL 安全的短标识，中英文两篇文档共用
///
/// 只包含小写字母、数字和单个连字符，首尾不是连字符，长度不超过 [`MAX_SLUG_LEN`]。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// 把任意文本清洗成 slug，清洗后为空时返回 `None`
    ///
    /// 只取第一行，LLM 偶尔会在 slug 后面附带解释。
    pub fn sanitize(raw: &str) -> Option<Self> {
        let first_line = raw.trim().lines().next().unwrap_or_default();
        let lowered = first_line.to_lowercase();
        let replaced = NON_SLUG_CHARS.replace_all(&lowered, "-");
        let slug = truncate_at_hyphen(replaced.trim_matches('-'), MAX_SLUG_LEN);

        if slug.is_empty() {
            None
        } else {
            Some(Self(slug.to_string()))
        }
    }

    /// 无法从标题得到 slug 时的兜底：`idea-{yyyymmddHHMMSS}`
    pub fn from_timestamp(at: DateTime<FixedOffset>) -> Self {
        Self(format!("idea-{}", at.format("%Y%m%d%H%M%S")))
    }

    /// 冲突时使用的候选：第 n 个候选为 `{slug}-{n}`，n 从 2 开始
    pub fn with_suffix(&self, n: usize) -> Self {
        let suffix = format!("-{}", n);
        let base = truncate_at_hyphen(&self.0, MAX_SLUG_LEN - suffix.len());
        Self(format!("{}{}", base, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 截断到 `max` 字节以内，尽量在连字符处断开（slug 只含 ASCII）
fn truncate_at_hyphen(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let cut = &s[..max];
    let cut = match cut.rfind('-') {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut,
    };
    cut.trim_end_matches('-')
}
