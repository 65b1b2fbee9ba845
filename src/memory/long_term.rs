//! 长期记忆：按问题文本缓存完整的 RunResult
//!
//! 键为问题原文，按插入顺序淘汰（同键覆盖不改变位置）；查找时对每个已缓存问题计算词集 Jaccard 相似度，
//! 按插入顺序返回第一个超过阈值的结果。

use std::collections::{HashMap, HashSet, VecDeque};

use crate::react::RunResult;

/// 默认缓存容量
pub const DEFAULT_CACHE_CAPACITY: usize = 100;
/// 默认相似度阈值（严格大于才算命中）
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.9;

/// 将文本切分为小写词集合（按空白）
fn tokenize_lower(s: &str) -> HashSet<String> {
    s.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// 两段文本小写词集合的 Jaccard 指数 |A∩B| / |A∪B|；两者皆空时为 0
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a = tokenize_lower(a);
    let b = tokenize_lower(b);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

#[derive(Clone, Debug)]
pub struct AnswerCache {
    entries: HashMap<String, RunResult>,
    order: VecDeque<String>,
    capacity: usize,
    threshold: f64,
}

impl AnswerCache {
    pub fn new(capacity: usize, threshold: f64) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            threshold,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, question: &str) -> bool {
        self.entries.contains_key(question)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// 找到第一个与 question 相似度超过阈值的缓存结果
    pub fn lookup(&self, question: &str) -> Option<(&str, &RunResult)> {
        self.order.iter().find_map(|key| {
            let score = jaccard_similarity(question, key);
            if score > self.threshold {
                self.entries.get(key).map(|r| (key.as_str(), r))
            } else {
                None
            }
        })
    }

    /// 写入；超过容量时淘汰最早插入的键
    pub fn insert(&mut self, question: impl Into<String>, result: RunResult) {
        let question = question.into();
        if self.entries.insert(question.clone(), result).is_none() {
            self.order.push_back(question);
        }
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::debug!(question = %oldest, "long-term cache evicted oldest entry");
        }
    }
}

impl Default for AnswerCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_SIMILARITY_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(answer: &str) -> RunResult {
        RunResult::new(answer, vec![], 1)
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard_similarity("What is Rust", "what is rust"), 1.0);
        assert_eq!(jaccard_similarity("a b", "b c"), 1.0 / 3.0);
        assert_eq!(jaccard_similarity("", "   "), 0.0);
        assert_eq!(jaccard_similarity("rust is  fast", "fast rust is"), 1.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut cache = AnswerCache::new(10, 0.5);
        cache.insert("a b", result("x"));
        // 相似度恰好 0.5，不命中
        assert!(cache.lookup("a b c d").is_none());
        assert!(cache.lookup("a b c").is_some());
    }

    #[test]
    fn test_capacity_evicts_first_inserted() {
        let mut cache = AnswerCache::new(3, 0.9);
        for q in ["q1", "q2", "q3", "q4"] {
            cache.insert(q, result(q));
        }
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains_key("q1"));
        assert!(cache.lookup("q1").is_none());
        assert_eq!(cache.lookup("q4").unwrap().1.answer, "q4");
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut cache = AnswerCache::new(2, 0.9);
        cache.insert("q1", result("old"));
        cache.insert("q2", result("b"));
        cache.insert("q1", result("new"));
        cache.insert("q3", result("c"));
        assert!(!cache.contains_key("q1"));
        assert!(cache.contains_key("q2"));
        assert!(cache.contains_key("q3"));
    }
}
