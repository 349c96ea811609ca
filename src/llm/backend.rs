//! 生成式文本后端抽象
//!
//! 所有后端（Groq / Mock）实现 ChatBackend：给定 system prompt 与任务 prompt，
//! 返回单条完成文本。错误在 trait 边界用 String 表达，由上层包装上下文。

use async_trait::async_trait;

/// 聊天完成后端 trait：单轮 system + user 完成
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, String>;
}
