//! 上下文构建策略：每个 Step 完成后如何得到下一轮的 context
//!
//! TranscriptContext 把每步文本无限追加；WindowedContext 只保留最近 N 步的思考。

use crate::memory::ShortTermWindow;
use crate::react::prompt::render_step;
use crate::react::Step;

pub trait ContextStrategy: Send {
    /// question 为原始问题，previous 为上一轮 context
    fn update(&mut self, question: &str, previous: &str, step: &Step) -> String;
}

/// 默认策略：previous + 空行 + 本步三行文本
#[derive(Debug, Default, Clone, Copy)]
pub struct TranscriptContext;

impl ContextStrategy for TranscriptContext {
    fn update(&mut self, _question: &str, previous: &str, step: &Step) -> String {
        format!("{}\n\n{}", previous, render_step(step))
    }
}

/// 短期记忆策略：question + "Recent memory:" + 窗口内思考
#[derive(Debug, Clone, Default)]
pub struct WindowedContext {
    window: ShortTermWindow,
}

impl WindowedContext {
    pub fn new(capacity: usize) -> Self {
        Self {
            window: ShortTermWindow::new(capacity),
        }
    }

    pub fn window(&self) -> &ShortTermWindow {
        &self.window
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }
}

impl ContextStrategy for WindowedContext {
    fn update(&mut self, question: &str, _previous: &str, step: &Step) -> String {
        self.window.push(step.clone());
        format!("{}\n\n{}", question, self.window.to_prompt_section())
    }
}
