//! Mock 后端（用于测试，无需 API）
//!
//! 按 prompt 内容返回脚本化回复：评估类 prompt 返回固定分数加简评，追问类
//! prompt 返回一条带引号的追问（用于验证去引号），其余返回通用文本。记录
//! 底层调用次数，供缓存测试断言。

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::llm::ChatBackend;

/// Mock 客户端：脚本化回复 + 调用计数
#[derive(Debug)]
pub struct MockBackend {
    /// 评估类 prompt 返回的分数
    pub score: u32,
    calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::with_score(8)
    }
}

impl MockBackend {
    pub fn with_score(score: u32) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }

    /// 底层被真正调用的次数（缓存命中不计）
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// 恒失败客户端：模拟外部服务故障，验证错误路径（道歉回复 / 批量兜底）
#[derive(Debug, Default)]
pub struct FailingBackend;

#[async_trait]
impl ChatBackend for FailingBackend {
    async fn complete(&self, _system_prompt: &str, _prompt: &str) -> Result<String, String> {
        Err("service unavailable".to_string())
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn complete(&self, _system_prompt: &str, prompt: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if prompt.contains("Rate 1-10") {
            return Ok(format!("{} - Jawaban cukup jelas dan terstruktur.", self.score));
        }
        if prompt.contains("follow-up question") {
            return Ok("\"Boleh ceritakan lebih detail tentang pengalaman itu?\"".to_string());
        }
        if prompt.contains("answer these candidate questions") {
            return Ok("Halo! Terima kasih atas pertanyaannya, berikut jawabannya.".to_string());
        }
        Ok("Baik, terima kasih atas jawabannya.".to_string())
    }
}
