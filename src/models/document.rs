use chrono::{DateTime, FixedOffset, SecondsFormat};

use super::lang::LanguageTag;
use super::slug::Slug;

/// 文档头信息（YAML front matter）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub slug: Slug,
    pub date: DateTime<FixedOffset>,
    pub lang: LanguageTag,
    /// 另一语言版本的仓库路径
    pub counterpart: Option<String>,
}

impl FrontMatter {
    /// 渲染为 `---` 包围的 YAML
    ///
    /// 字符串用 JSON 转义输出，JSON 字符串同时也是合法的 YAML 双引号标量。
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        out.push_str(&format!("title: {}\n", quote(&self.title)));
        out.push_str(&format!("slug: {}\n", quote(self.slug.as_str())));
        out.push_str(&format!(
            "date: {}\n",
            self.date.to_rfc3339_opts(SecondsFormat::Secs, false)
        ));
        out.push_str(&format!("lang: {}\n", self.lang));
        out.push_str(&format!("translationKey: {}\n", quote(self.slug.as_str())));
        if let Some(counterpart) = &self.counterpart {
            out.push_str(&format!("counterpart: {}\n", quote(counterpart)));
        }
        out.push_str("---\n");
        out
    }
}

/// 一篇待写入的 Markdown 文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    /// 仓库内路径
    pub path: String,
    pub front_matter: FrontMatter,
    pub body: String,
}

impl MarkdownDocument {
    /// 文档在内容目录下的路径：`{content_dir}/{slug}.{lang}.md`
    pub fn path_for(content_dir: &str, slug: &Slug, lang: LanguageTag) -> String {
        let dir = content_dir.trim_matches('/');
        if dir.is_empty() {
            format!("{}.{}.md", slug, lang)
        } else {
            format!("{}/{}.{}.md", dir, slug, lang)
        }
    }

    pub fn lang(&self) -> LanguageTag {
        self.front_matter.lang
    }

    pub fn title(&self) -> &str {
        &self.front_matter.title
    }

    /// 完整的文件内容
    pub fn render(&self) -> String {
        format!("{}\n{}", self.front_matter.render(), self.body)
    }
}

fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
