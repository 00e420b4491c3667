//! LLM 返回内容修复 - 业务能力层
//!
//! 模型经常在 JSON 字符串里直接输出换行、制表符而不转义，
//! 这里只修复这一类问题，其他格式错误交给后续解析报错。

/// 把字符串字面量中的裸换行、回车、制表符转义
///
/// 单次从左到右扫描：
/// - 反斜杠后的一个字符原样保留，已有的转义序列不会被重复处理
/// - 未转义的 `"` 切换"是否在字符串内"
/// - 字符串内的 `\n` `\r` `\t` 替换为两字符转义序列
/// - 字符串外的内容一律不动
///
/// 对合法 JSON 是幂等的。
pub fn repair(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 16);
    let mut in_string = false;
    let mut after_backslash = false;

    for c in raw.chars() {
        if after_backslash {
            out.push(c);
            after_backslash = false;
            continue;
        }

        match c {
            '\\' => {
                out.push(c);
                after_backslash = true;
            }
            '"' => {
                out.push(c);
                in_string = !in_string;
            }
            '\n' if in_string => out.push_str("\\n"),
            '\r' if in_string => out.push_str("\\r"),
            '\t' if in_string => out.push_str("\\t"),
            _ => out.push(c),
        }
    }

    out
}

/// 去掉包裹在外层的 Markdown 代码块（```json ... ```）
///
/// 没有代码块时返回去除首尾空白后的原文。
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // 第一行是语言标记（可能为空）
    match body.find('\n') {
        Some(pos) => body[pos + 1..].trim(),
        None => body.trim(),
    }
}
