//! 面试核心
//!
//! - **stages**: 阶段枚举、角色与问题的静态配置
//! - **messages**: 固定文案与公司信息
//! - **session**: 会话数据模型
//! - **store**: user_id -> Session 的内存存储与生命周期
//! - **collector**: 问答收集缓冲与防抖计时器
//! - **engine**: 状态机本体

pub mod collector;
pub mod engine;
pub mod messages;
pub mod session;
pub mod stages;
pub mod store;

pub use engine::{InterviewEngine, InterviewSettings};
pub use session::{Evaluation, Session};
pub use stages::Stage;
pub use store::SessionStore;
