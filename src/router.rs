//! 消息路由
//!
//! 对每条入站消息判定三类去向：触发词开新面试 / 活跃会话续聊 / 都不是则忽略
//! （关键词应答等外围逻辑不在核心内）。整个处理作为独立任务与固定超时竞速：
//! 超时方回复固定提示，在途任务不取消 —— 其状态变更保留，但迟到的回复被丢弃
//! 并记录（显式的败者策略）。

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use crate::error::KoruError;
use crate::interview::engine::InterviewEngine;
use crate::interview::messages;

/// 触发词：两个子串须同时出现（大小写不敏感）
const TRIGGER_POSITION: &str = "operation staff - worldcoin project";
const TRIGGER_INTEREST: &str = "tertarik";

/// 消息路由器
pub struct MessageRouter {
    engine: Arc<InterviewEngine>,
    reply_timeout: Duration,
}

impl MessageRouter {
    pub fn new(engine: Arc<InterviewEngine>, reply_timeout: Duration) -> Self {
        Self {
            engine,
            reply_timeout,
        }
    }

    /// 是否为开始面试的触发消息
    pub fn is_trigger(text: &str) -> bool {
        let lower = text.to_lowercase();
        lower.contains(TRIGGER_POSITION) && lower.contains(TRIGGER_INTEREST)
    }

    /// 处理一条入站消息，返回要同步回复的文本（None = 不回复）
    ///
    /// 所有失败路径都产生回复：超时回固定提示，其余错误回统一道歉。
    pub async fn handle_inbound(&self, user_id: &str, text: &str) -> Option<String> {
        let engine = Arc::clone(&self.engine);
        let user = user_id.to_string();
        let body = text.to_string();

        let mut task = tokio::spawn(async move { dispatch(engine, &user, &body).await });

        let outcome = match tokio::time::timeout(self.reply_timeout, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(KoruError::Transport(format!(
                "message handler panicked: {}",
                join_err
            ))),
            Err(_elapsed) => {
                // 在途任务继续跑完，状态变更保留；迟到回复丢弃并记录
                let user = user_id.to_string();
                tokio::spawn(async move {
                    match task.await {
                        Ok(Ok(Some(_))) => {
                            warn!(user = %user, "discarding late reply after timeout")
                        }
                        Ok(Err(e)) => {
                            warn!(user = %user, "late handler failure after timeout: {}", e)
                        }
                        _ => {}
                    }
                });
                Err(KoruError::Timeout)
            }
        };

        match outcome {
            Ok(reply) => reply,
            Err(KoruError::Timeout) => Some(messages::TIMEOUT_REPLY.to_string()),
            Err(e) => {
                error!(user = %user_id, "message handling failed: {}", e);
                Some(messages::GENERIC_APOLOGY.to_string())
            }
        }
    }
}

async fn dispatch(
    engine: Arc<InterviewEngine>,
    user_id: &str,
    text: &str,
) -> Result<Option<String>, KoruError> {
    if MessageRouter::is_trigger(text) {
        return Ok(Some(engine.start_interview(user_id).await));
    }

    if engine.has_session(user_id).await {
        return engine.handle_response(user_id, text).await;
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarService;
    use crate::interview::engine::InterviewSettings;
    use crate::interview::store::SessionStore;
    use crate::llm::{ChatBackend, FailingBackend, GenerativeClient, MockBackend};

    struct NullNotifier;

    #[async_trait::async_trait]
    impl crate::integrations::OutboundNotifier for NullNotifier {
        async fn send(&self, _user_id: &str, _body: &str) -> Result<(), KoruError> {
            Ok(())
        }
    }

    fn build_router(reply_timeout: Duration) -> MessageRouter {
        build_router_with(reply_timeout, Arc::new(MockBackend::default()))
    }

    fn build_router_with(reply_timeout: Duration, backend: Arc<dyn ChatBackend>) -> MessageRouter {
        let engine = Arc::new(InterviewEngine::new(
            Arc::new(SessionStore::new()),
            GenerativeClient::new(backend),
            CalendarService::disabled(),
            Arc::new(NullNotifier),
            InterviewSettings {
                session_timeout: Duration::from_secs(30 * 60),
                min_score_to_pass: 6.0,
                debounce: Duration::from_secs(20),
            },
        ));
        MessageRouter::new(engine, reply_timeout)
    }

    #[test]
    fn test_trigger_requires_both_substrings() {
        assert!(MessageRouter::is_trigger(
            "Halo, saya tertarik dengan posisi Operation Staff - Worldcoin Project"
        ));
        assert!(MessageRouter::is_trigger(
            "OPERATION STAFF - WORLDCOIN PROJECT, saya TERTARIK"
        ));
        assert!(!MessageRouter::is_trigger("saya tertarik"));
        assert!(!MessageRouter::is_trigger(
            "operation staff - worldcoin project"
        ));
        assert!(!MessageRouter::is_trigger("halo apa kabar"));
    }

    #[tokio::test]
    async fn test_trigger_starts_interview() {
        let router = build_router(Duration::from_secs(5));
        let reply = router
            .handle_inbound(
                "u1",
                "Saya tertarik dengan Operation Staff - Worldcoin Project",
            )
            .await;
        assert_eq!(reply.as_deref(), Some(messages::WELCOME));
    }

    #[tokio::test]
    async fn test_unrelated_message_is_ignored() {
        let router = build_router(Duration::from_secs(5));
        let reply = router.handle_inbound("u1", "halo apa kabar").await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_session_continuation_routes_to_engine() {
        let router = build_router(Duration::from_secs(5));
        router
            .handle_inbound(
                "u1",
                "Saya tertarik dengan Operation Staff - Worldcoin Project",
            )
            .await;

        let reply = router.handle_inbound("u1", "a@b.com").await;
        assert_eq!(reply.as_deref(), Some(messages::ASK_NAME));
    }

    #[tokio::test]
    async fn test_evaluator_failure_yields_generic_apology() {
        let router = build_router_with(Duration::from_secs(5), Arc::new(FailingBackend));
        router
            .handle_inbound(
                "u1",
                "Saya tertarik dengan Operation Staff - Worldcoin Project",
            )
            .await;
        // 注册阶段不触网，照常推进
        router.handle_inbound("u1", "a@b.com").await;
        router.handle_inbound("u1", "Jane").await;

        // 第一条回答触发评估调用，失败传播到顶层后回统一道歉（与超时提示区分）
        let reply = router.handle_inbound("u1", "jawaban saya").await;
        assert_eq!(reply.as_deref(), Some(messages::GENERIC_APOLOGY));

        // 会话被放回，没有因错误而丢失
        let retry = router.handle_inbound("u1", "jawaban saya").await;
        assert_eq!(retry.as_deref(), Some(messages::GENERIC_APOLOGY));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_distinct_reply() {
        // 超时设为 0ms 强制竞速失败分支
        let router = build_router(Duration::from_millis(0));
        let reply = router
            .handle_inbound(
                "u1",
                "Saya tertarik dengan Operation Staff - Worldcoin Project",
            )
            .await;
        assert_eq!(reply.as_deref(), Some(messages::TIMEOUT_REPLY));
    }
}
