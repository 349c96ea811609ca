//! 错误类型
//!
//! 外部调用（LLM / 日历）在调用点包装上下文后向上传播；Router 捕获后统一转为
//! 用户可见的道歉回复，超时单独区分。进程不因单条消息失败而退出。

use thiserror::Error;

/// 消息处理过程中可能出现的错误（LLM、日历、超时、配置等）
#[derive(Error, Debug)]
pub enum KoruError {
    #[error("LLM error: {0}")]
    Llm(String),

    /// 日历凭据未配置，与运行时调用失败区分
    #[error("Calendar service is not configured")]
    CalendarDisabled,

    #[error("Calendar error: {0}")]
    Calendar(String),

    /// Router 超时竞速的失败分支，回复与统一道歉区分
    #[error("Request timeout")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),
}
