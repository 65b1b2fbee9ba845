//! 核心层：错误类型与文本预览

pub mod error;
pub mod text;

pub use error::AgentError;
pub use text::{truncate_preview, PREVIEW_CHARS};
