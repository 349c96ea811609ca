//! WhatsApp Cloud API 集成
//!
//! 通过 Webhook 接收消息，交给 MessageRouter 处理后回复；WhatsappNotifier
//! 同时实现 OutboundNotifier，供问答批量回复主动推送。

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::KoruError;
use crate::integrations::OutboundNotifier;
use crate::router::MessageRouter;

/// WhatsApp 服务状态
pub struct WhatsappState {
    pub router: MessageRouter,
    pub notifier: Arc<WhatsappNotifier>,
    pub verify_token: String,
}

/// Webhook 验证参数
#[derive(Debug, Deserialize)]
pub struct WebhookVerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// WhatsApp Webhook 请求体
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub object: Option<String>,
    pub entry: Option<Vec<WebhookEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    pub id: Option<String>,
    pub changes: Option<Vec<WebhookChange>>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookChange {
    pub value: Option<WebhookValue>,
    pub field: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookValue {
    pub messaging_product: Option<String>,
    pub messages: Option<Vec<WebhookMessage>>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookMessage {
    pub from: String,
    pub id: Option<String>,
    pub timestamp: Option<String>,
    #[serde(rename = "type")]
    pub msg_type: Option<String>,
    pub text: Option<WebhookText>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookText {
    pub body: String,
}

/// WhatsApp 发送消息 API 请求体
#[derive(Debug, Serialize)]
struct SendMessageRequest {
    messaging_product: String,
    to: String,
    #[serde(rename = "type")]
    msg_type: String,
    text: SendMessageText,
}

#[derive(Debug, Serialize)]
struct SendMessageText {
    body: String,
}

/// Cloud API 发送端：同步回复与主动推送共用
pub struct WhatsappNotifier {
    http: reqwest::Client,
    access_token: String,
    phone_number_id: String,
}

impl WhatsappNotifier {
    pub fn new(access_token: String, phone_number_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token,
            phone_number_id,
        }
    }

    /// 通过 WhatsApp Cloud API 发送消息，超长按 4000 字符分段
    async fn send_message(&self, to: &str, body: &str) -> Result<(), KoruError> {
        let max_len = 4000usize;
        let chunks: Vec<String> = if body.chars().count() <= max_len {
            vec![body.to_string()]
        } else {
            body.chars()
                .collect::<Vec<_>>()
                .chunks(max_len)
                .map(|c| c.iter().collect())
                .collect()
        };

        let url = format!(
            "https://graph.facebook.com/v18.0/{}/messages",
            self.phone_number_id
        );

        for chunk in chunks {
            let req = SendMessageRequest {
                messaging_product: "whatsapp".to_string(),
                to: to.replace('+', "").to_string(),
                msg_type: "text".to_string(),
                text: SendMessageText { body: chunk },
            };

            let resp = self
                .http
                .post(&url)
                .bearer_auth(&self.access_token)
                .json(&req)
                .send()
                .await
                .map_err(|e| KoruError::Transport(e.to_string()))?;

            if !resp.status().is_success() {
                let text = resp
                    .text()
                    .await
                    .unwrap_or_else(|e| e.to_string());
                return Err(KoruError::Transport(format!("WhatsApp API error: {}", text)));
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl OutboundNotifier for WhatsappNotifier {
    async fn send(&self, user_id: &str, body: &str) -> Result<(), KoruError> {
        self.send_message(user_id, body).await
    }
}

/// 创建 WhatsApp 路由
pub fn create_router(state: Arc<WhatsappState>) -> Router {
    Router::new()
        .route("/webhook", get(webhook_verify).post(webhook_receive))
        .route("/health", get(|| async { "Koru interview bot is running" }))
        .with_state(state)
}

/// GET /webhook - Meta 验证 Webhook
async fn webhook_verify(
    State(state): State<Arc<WhatsappState>>,
    Query(query): Query<WebhookVerifyQuery>,
) -> Result<String, StatusCode> {
    if query.mode.as_deref() == Some("subscribe")
        && query.verify_token.as_deref() == Some(&state.verify_token)
    {
        Ok(query.challenge.unwrap_or_default())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

/// POST /webhook - 接收 WhatsApp 消息
///
/// 每条文本消息交给 MessageRouter（内部含触发词识别与超时竞速）；回复为 None
/// 时（非核心消息或问答收集中）不发送任何内容。
async fn webhook_receive(
    State(state): State<Arc<WhatsappState>>,
    Json(payload): Json<WebhookPayload>,
) -> StatusCode {
    if payload.object.as_deref() != Some("whatsapp_business_account") {
        return StatusCode::OK;
    }

    let Some(entries) = payload.entry else {
        return StatusCode::OK;
    };

    for entry in entries {
        let Some(changes) = entry.changes else { continue };
        for change in changes {
            let Some(value) = change.value else { continue };
            let Some(messages) = value.messages else { continue };

            for msg in messages {
                if msg.msg_type.as_deref() != Some("text") {
                    continue;
                }
                let Some(text) = msg.text else { continue };

                let reply = state.router.handle_inbound(&msg.from, &text.body).await;

                if let Some(reply) = reply {
                    if let Err(e) = state.notifier.send(&msg.from, &reply).await {
                        tracing::error!("Failed to send WhatsApp reply: {}", e);
                    }
                }
            }
        }
    }

    StatusCode::OK
}
