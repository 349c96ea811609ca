//! Koru - WhatsApp 招聘面试机器人
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **calendar**: Google Calendar 预约协作方（未配置时优雅降级）
//! - **error**: 领域错误类型
//! - **integrations**: WhatsApp Cloud API Webhook 与出站通知抽象
//! - **interview**: 面试核心（状态机、会话存储、阶段配置、问答收集）
//! - **llm**: 生成式文本客户端（Groq 兼容 / Mock）与记忆化缓存
//! - **observability**: tracing 初始化
//! - **router**: 入站消息路由与单消息超时竞速

pub mod calendar;
pub mod config;
pub mod error;
pub mod integrations;
pub mod interview;
pub mod llm;
pub mod observability;
pub mod router;

pub use error::KoruError;
