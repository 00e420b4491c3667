//! 提示词
//!
//! system 提示词固定不变，每次调用的变化部分都放在 user 消息里。

/// 生成标题
pub const TITLE_PROMPT: &str = "Generate a short title (max 10 words) for the following idea/note.
Reply with ONLY the title text, no quotes, no punctuation at the end, no prefix.
Use the same language as the content.";

/// 润色 + 翻译，要求返回 JSON
pub const POLISH_PROMPT: &str = r#"You are polishing a short idea or note for a personal bilingual (English/Chinese) blog. Your task:
- Fix grammar, wording and style while keeping the original meaning, tone and language
- Keep markdown formatting; do not add new sections or facts
- Translate the polished title and content into the other language (English <-> Chinese)
- Reply with ONLY a JSON object, no code fences, no commentary, with exactly these string fields:
  {"lang": "<en|zh, the source language>", "polished_title": "...", "polished_content": "...", "translated_title": "...", "translated_content": "..."}
- Escape newlines inside string values as \n"#;

/// 生成 slug
pub const SLUG_PROMPT: &str = "Generate a short URL slug (2 to 6 English words) for a blog post with the following title.
Reply with ONLY the slug: lowercase ASCII letters and digits separated by hyphens, nothing else.";

/// 扩展内容
pub const AUGMENT_PROMPT: &str = "You are augmenting a short idea or note for a personal blog. Your task:
- Expand the idea with relevant context, research, and references
- Write in the same language as the original content
- Structure the answer in exactly three markdown sections with level-3 headings: Context, Key Insights, Open Questions (translate the headings into the content's language)
- Keep it concise but informative (roughly 2-4 short paragraphs or bullet lists in total)
- Add relevant links or references where appropriate
- Do not repeat the original content, only expand on it";

/// 翻译扩展内容
pub const TRANSLATE_PROMPT: &str = "Translate the following markdown from the source language into the target language.
Keep the markdown structure, headings, links and code unchanged apart from translating the prose.
Reply with ONLY the translated markdown.";

/// 解析失败后重试时追加到 user 消息末尾
pub const MALFORMED_RETRY_HINT: &str = "Your previous reply could not be parsed as JSON. Reply again with ONLY the JSON object described above: no code fences, no text before or after it, every field a string, and every newline inside a string value written as \\n.";
