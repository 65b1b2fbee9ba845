//! 记忆层：短期窗口（最近 Step）与长期答案缓存（相似问题直接复用）

pub mod long_term;
pub mod short_term;

pub use long_term::{
    jaccard_similarity, AnswerCache, DEFAULT_CACHE_CAPACITY, DEFAULT_SIMILARITY_THRESHOLD,
};
pub use short_term::ShortTermWindow;
