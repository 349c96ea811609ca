//! Koru WhatsApp 面试服务
//!
//! 通过 WhatsApp Cloud API 接收候选人消息，驱动多阶段 AI 面试。
//!
//! 环境变量:
//! - WHATSAPP_ACCESS_TOKEN: Meta WhatsApp API 访问令牌
//! - WHATSAPP_PHONE_NUMBER_ID: 企业电话号码 ID
//! - GROQ_API_KEY: LLM API Key
//! - GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET / GOOGLE_REFRESH_TOKEN: 日历凭据（可选）
//!
//! 启动: cargo run

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use koru::calendar::CalendarService;
use koru::integrations::whatsapp::{create_router, WhatsappNotifier, WhatsappState};
use koru::interview::{InterviewEngine, InterviewSettings, SessionStore};
use koru::llm::{ChatBackend, GenerativeClient, GroqBackend, MockBackend};
use koru::router::MessageRouter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    koru::observability::init();

    let cfg = koru::config::load_config(None)?;

    let backend: Arc<dyn ChatBackend> = match cfg.llm.provider.as_str() {
        "mock" => Arc::new(MockBackend::default()),
        _ => Arc::new(GroqBackend::new(&cfg.llm.base_url, &cfg.llm.model, None)),
    };
    let llm = GenerativeClient::new(backend);

    let calendar = CalendarService::from_env(cfg.calendar.hr_email.clone());
    if calendar.is_enabled() {
        tracing::info!("Google Calendar scheduling enabled");
    }

    let access_token =
        std::env::var("WHATSAPP_ACCESS_TOKEN").expect("WHATSAPP_ACCESS_TOKEN must be set");
    let phone_number_id =
        std::env::var("WHATSAPP_PHONE_NUMBER_ID").expect("WHATSAPP_PHONE_NUMBER_ID must be set");
    let notifier = Arc::new(WhatsappNotifier::new(access_token, phone_number_id));

    let store = Arc::new(SessionStore::new());
    let engine = Arc::new(InterviewEngine::new(
        store,
        llm,
        calendar,
        notifier.clone(),
        InterviewSettings::from_config(&cfg.interview),
    ));

    let router = MessageRouter::new(
        engine,
        Duration::from_secs(cfg.interview.reply_timeout_secs),
    );

    let state = Arc::new(WhatsappState {
        router,
        notifier,
        verify_token: cfg.whatsapp.verify_token.clone(),
    });

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.whatsapp.port));
    tracing::info!("Koru interview server listening on http://{}", addr);
    tracing::info!("Webhook URL: http://YOUR_HOST:{}/webhook", cfg.whatsapp.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
