//! LLM 客户端：后端抽象与带缓存的生成客户端
//!
//! - **backend**: ChatBackend trait（Groq / Mock 实现）
//! - **groq**: Groq OpenAI 兼容客户端
//! - **mock**: 测试用脚本化客户端
//! - GenerativeClient: 在后端之上做 (prompt, system) 精确匹配的进程级缓存

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::KoruError;

pub mod backend;
pub mod groq;
pub mod mock;

pub use backend::ChatBackend;
pub use groq::GroqBackend;
pub use mock::{FailingBackend, MockBackend};

/// 带缓存的生成客户端
///
/// 以 (prompt, system_prompt) 的精确组合为键做进程生命周期内的记忆化：重复的
/// 相同调用直接返回缓存文本，不再触发底层请求（用小概率的陈旧换延迟与成本）。
/// 底层失败包装为 KoruError::Llm 向上传播，内部不做重试。
#[derive(Clone)]
pub struct GenerativeClient {
    backend: Arc<dyn ChatBackend>,
    cache: Arc<RwLock<HashMap<(String, String), String>>>,
}

impl GenerativeClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn generate_response(
        &self,
        prompt: &str,
        system_prompt: &str,
    ) -> Result<String, KoruError> {
        let key = (prompt.to_string(), system_prompt.to_string());

        if let Some(cached) = self.cache.read().await.get(&key) {
            return Ok(cached.clone());
        }

        let response = self
            .backend
            .complete(system_prompt, prompt)
            .await
            .map_err(|e| KoruError::Llm(format!("generate_response: {}", e)))?;

        self.cache
            .write()
            .await
            .insert(key, response.clone());

        Ok(response)
    }
}
