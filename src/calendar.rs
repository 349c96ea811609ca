//! 日程预约协作方（Google Calendar v3 REST）
//!
//! 凭据（GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET / GOOGLE_REFRESH_TOKEN）缺失
//! 时服务降级为 disabled，schedule_interview 返回 CalendarDisabled 而不是运行时
//! 失败 —— 收尾流程据此回退到「HR 会联系你」文案。

use chrono::{Datelike, Duration as ChronoDuration, FixedOffset, Utc, Weekday};
use serde::Deserialize;

use crate::error::KoruError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const EVENTS_URL: &str =
    "https://www.googleapis.com/calendar/v3/calendars/primary/events?conferenceDataVersion=1&sendUpdates=all";

struct GoogleCredentials {
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct EventResponse {
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

/// 日历服务：为通过面试的候选人预约后续 HR 面试并返回会议链接
pub struct CalendarService {
    credentials: Option<GoogleCredentials>,
    hr_email: Option<String>,
    http: reqwest::Client,
}

impl CalendarService {
    /// 从环境变量读取凭据；不全则构造 disabled 实例（警告一次）
    pub fn from_env(hr_email: Option<String>) -> Self {
        let credentials = match (
            std::env::var("GOOGLE_CLIENT_ID"),
            std::env::var("GOOGLE_CLIENT_SECRET"),
            std::env::var("GOOGLE_REFRESH_TOKEN"),
        ) {
            (Ok(client_id), Ok(client_secret), Ok(refresh_token)) => Some(GoogleCredentials {
                client_id,
                client_secret,
                refresh_token,
            }),
            _ => {
                tracing::warn!(
                    "Google Calendar credentials not found, calendar features will be disabled"
                );
                None
            }
        };

        Self {
            credentials,
            hr_email,
            http: reqwest::Client::new(),
        }
    }

    /// 显式 disabled 实例（测试与无日历部署）
    pub fn disabled() -> Self {
        Self {
            credentials: None,
            hr_email: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// 预约后续面试：下一个工作日 10:00（Asia/Jakarta）一小时，带 Meet 会议
    pub async fn schedule_interview(
        &self,
        candidate_email: &str,
        candidate_name: &str,
    ) -> Result<String, KoruError> {
        let Some(creds) = &self.credentials else {
            return Err(KoruError::CalendarDisabled);
        };

        let access_token = self.refresh_access_token(creds).await?;

        let start = next_available_slot();
        let end = start + ChronoDuration::hours(1);
        let fmt = "%Y-%m-%dT%H:%M:%S";

        let mut attendees = vec![serde_json::json!({ "email": candidate_email })];
        if let Some(hr) = &self.hr_email {
            attendees.push(serde_json::json!({ "email": hr }));
        }

        let event = serde_json::json!({
            "summary": format!("HR Interview - {}", candidate_name),
            "description": "Follow-up interview with HR team",
            "start": { "dateTime": start.format(fmt).to_string(), "timeZone": "Asia/Jakarta" },
            "end": { "dateTime": end.format(fmt).to_string(), "timeZone": "Asia/Jakarta" },
            "attendees": attendees,
            "conferenceData": {
                "createRequest": {
                    "requestId": format!("interview-{}", uuid::Uuid::new_v4()),
                    "conferenceSolutionKey": { "type": "hangoutsMeet" }
                }
            }
        });

        let resp = self
            .http
            .post(EVENTS_URL)
            .bearer_auth(&access_token)
            .json(&event)
            .send()
            .await
            .map_err(|e| KoruError::Calendar(e.to_string()))?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_else(|e| e.to_string());
            return Err(KoruError::Calendar(format!("event insert failed: {}", text)));
        }

        let event: EventResponse = resp
            .json()
            .await
            .map_err(|e| KoruError::Calendar(e.to_string()))?;

        event
            .html_link
            .ok_or_else(|| KoruError::Calendar("event response missing htmlLink".to_string()))
    }

    async fn refresh_access_token(&self, creds: &GoogleCredentials) -> Result<String, KoruError> {
        let params = [
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("refresh_token", creds.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let resp = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| KoruError::Calendar(e.to_string()))?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_else(|e| e.to_string());
            return Err(KoruError::Calendar(format!("token refresh failed: {}", text)));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| KoruError::Calendar(e.to_string()))?;

        Ok(token.access_token)
    }
}

/// 下一个可用时段：明天 10:00（Asia/Jakarta），周末顺延到周一
fn next_available_slot() -> chrono::NaiveDateTime {
    let jakarta = FixedOffset::east_opt(7 * 3600).unwrap();
    let mut date = (Utc::now().with_timezone(&jakarta) + ChronoDuration::days(1)).date_naive();

    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date += ChronoDuration::days(1);
    }

    date.and_hms_opt(10, 0, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_is_business_day_at_ten() {
        let slot = next_available_slot();
        assert_eq!(slot.time(), chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert!(!matches!(
            slot.date().weekday(),
            Weekday::Sat | Weekday::Sun
        ));
    }

    #[tokio::test]
    async fn test_disabled_service_fails_distinctly() {
        let svc = CalendarService::disabled();
        assert!(!svc.is_enabled());

        let err = svc.schedule_interview("a@b.com", "Jane").await.unwrap_err();
        assert!(matches!(err, KoruError::CalendarDisabled));
    }
}
