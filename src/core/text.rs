//! 日志与事件里的文本预览

/// 预览最大字符数
pub const PREVIEW_CHARS: usize = 200;

/// 超过 max_chars 个字符时截断并追加 "..."；按字符而非字节计数，中文不会被截坏
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
