//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `KORU__*` 覆盖（双下划线表示嵌套，
//! 如 `KORU__INTERVIEW__TIMEOUT_MINUTES=45`）。密钥类（API Key、OAuth 凭据、
//! WhatsApp Token）只从独立环境变量读取，不进配置文件。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub interview: InterviewSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub calendar: CalendarSection,
    #[serde(default)]
    pub whatsapp: WhatsappSection,
}

/// [interview] 段：会话过期、及格线、问答收集防抖、单消息超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterviewSection {
    /// 会话无交互多少分钟后过期（下一条消息到达时惰性回收）
    pub timeout_minutes: u64,
    /// 平均分达到多少才预约后续面试
    pub min_score_to_pass: f64,
    /// 问答收集的静默期（秒），静默期满后批量回答
    pub debounce_secs: u64,
    /// 单条消息处理的超时（秒），超时后回复固定提示
    pub reply_timeout_secs: u64,
}

impl Default for InterviewSection {
    fn default() -> Self {
        Self {
            timeout_minutes: 30,
            min_score_to_pass: 6.0,
            debounce_secs: 20,
            reply_timeout_secs: 30,
        }
    }
}

/// [llm] 段：后端选择与端点
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端：groq / mock；API Key 从 GROQ_API_KEY 读取
    pub provider: String,
    pub model: String,
    /// OpenAI 兼容端点
    pub base_url: String,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "mixtral-8x7b-32768".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
        }
    }
}

/// [calendar] 段：HR 邮箱；OAuth 凭据从 GOOGLE_* 环境变量读取
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CalendarSection {
    pub hr_email: Option<String>,
}

/// [whatsapp] 段：监听端口与 Webhook 验证令牌
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhatsappSection {
    pub port: u16,
    /// Meta Webhook 订阅验证令牌
    pub verify_token: String,
}

impl Default for WhatsappSection {
    fn default() -> Self {
        Self {
            port: 3000,
            verify_token: "koru".to_string(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 KORU__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 KORU__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("KORU")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.interview.timeout_minutes, 30);
        assert_eq!(cfg.interview.debounce_secs, 20);
        assert_eq!(cfg.interview.reply_timeout_secs, 30);
        assert!((cfg.interview.min_score_to_pass - 6.0).abs() < f64::EPSILON);
        assert_eq!(cfg.llm.provider, "groq");
        assert_eq!(cfg.whatsapp.port, 3000);
    }
}
