//! 外部通道集成
//!
//! - **OutboundNotifier**: 主动出站发送的注入点（问答批量回复走这里，而不是
//!   Engine 里直接摸全局传输客户端）
//! - **whatsapp**: WhatsApp Cloud API Webhook 与发送端

use async_trait::async_trait;

use crate::error::KoruError;

pub mod whatsapp;

/// 主动出站通知：不依附于某条入站消息的 fire-and-forget 发送
#[async_trait]
pub trait OutboundNotifier: Send + Sync {
    async fn send(&self, user_id: &str, body: &str) -> Result<(), KoruError>;
}
