//! 问答收集器：按用户缓冲自由提问 + 防抖计时器
//!
//! 每个用户最多一个在途计时器；新问题到达时旧计时器被 abort 并换新（防抖），
//! 计时器只触发一次，触发后批量回答全部缓冲问题。会话结束（过期 / 收尾 / 被
//! 触发词重开）时显式取消，避免迟到的批量回复发给已不存在的会话。

use std::collections::HashMap;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// 每用户的待回答问题缓冲与防抖计时器
pub struct QuestionCollector {
    pending: Mutex<HashMap<String, Vec<String>>>,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Default for QuestionCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionCollector {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// 追加一条待回答的问题
    pub async fn push(&self, user_id: &str, question: String) {
        let mut pending = self.pending.lock().await;
        pending.entry(user_id.to_string()).or_default().push(question);
    }

    /// 替换该用户的防抖计时器，旧计时器被 abort
    pub async fn set_timer(&self, user_id: &str, handle: JoinHandle<()>) {
        let mut timers = self.timers.lock().await;
        if let Some(old) = timers.insert(user_id.to_string(), handle) {
            old.abort();
        }
    }

    /// 取走全部缓冲问题（计时器触发时调用），缓冲与计时器条目一并清除
    pub async fn take_pending(&self, user_id: &str) -> Vec<String> {
        self.timers.lock().await.remove(user_id);
        self.pending
            .lock()
            .await
            .remove(user_id)
            .unwrap_or_default()
    }

    /// 取消该用户的收集：abort 计时器并丢弃缓冲
    pub async fn cancel(&self, user_id: &str) {
        if let Some(handle) = self.timers.lock().await.remove(user_id) {
            handle.abort();
        }
        self.pending.lock().await.remove(user_id);
    }

    #[cfg(test)]
    pub async fn pending_count(&self, user_id: &str) -> usize {
        self.pending
            .lock()
            .await
            .get(user_id)
            .map_or(0, Vec::len)
    }
}
