//! 面试引擎：会话状态机
//!
//! 状态序列：等邮箱 → 等姓名 → 主问题 → 追问 → 阶段间问答窗口 → 下一阶段 →
//! … → 收尾。给定会话与一条入站消息，决定回复并推进会话状态。依赖生成客户端
//! （评估 / 追问 / 批量答疑）与日历协作方（收尾预约），均为注入。

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tracing::{info, warn};

use crate::calendar::CalendarService;
use crate::config::InterviewSection;
use crate::error::KoruError;
use crate::integrations::OutboundNotifier;
use crate::llm::GenerativeClient;

use super::collector::QuestionCollector;
use super::messages;
use super::session::{Evaluation, Session};
use super::stages::Stage;
use super::store::SessionStore;

/// Engine 的运行参数（启动时从配置取一次，不热更新）
#[derive(Debug, Clone)]
pub struct InterviewSettings {
    pub session_timeout: Duration,
    pub min_score_to_pass: f64,
    pub debounce: Duration,
}

impl InterviewSettings {
    pub fn from_config(cfg: &InterviewSection) -> Self {
        Self {
            session_timeout: Duration::from_secs(cfg.timeout_minutes * 60),
            min_score_to_pass: cfg.min_score_to_pass,
            debounce: Duration::from_secs(cfg.debounce_secs),
        }
    }
}

/// 单步状态机的产出
enum Outcome {
    /// 同步回复
    Reply(String),
    /// 有意不回复（问答收集中）
    Silent,
    /// 会话收尾：附最终消息，会话不再放回存储
    Concluded(String),
}

/// 面试引擎
pub struct InterviewEngine {
    store: Arc<SessionStore>,
    llm: GenerativeClient,
    calendar: CalendarService,
    collector: QuestionCollector,
    notifier: Arc<dyn OutboundNotifier>,
    settings: InterviewSettings,
    email_re: Regex,
    integer_re: Regex,
}

impl InterviewEngine {
    pub fn new(
        store: Arc<SessionStore>,
        llm: GenerativeClient,
        calendar: CalendarService,
        notifier: Arc<dyn OutboundNotifier>,
        settings: InterviewSettings,
    ) -> Self {
        Self {
            store,
            llm,
            calendar,
            collector: QuestionCollector::new(),
            notifier,
            settings,
            email_re: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap(),
            integer_re: Regex::new(r"\d+").unwrap(),
        }
    }

    /// 开始新面试：覆盖已有会话，取消残留的问答计时器，返回开场白
    pub async fn start_interview(&self, user_id: &str) -> String {
        self.collector.cancel(user_id).await;
        self.store.create(user_id).await;
        info!(user = %user_id, "interview started");
        messages::WELCOME.to_string()
    }

    pub async fn has_session(&self, user_id: &str) -> bool {
        self.store.contains(user_id).await
    }

    /// 处理一条活跃会话的入站消息
    ///
    /// 会话在处理期间从存储移出，结束后放回（收尾与过期除外）；出错也放回，
    /// 不回滚已发生的状态变更。返回 None 表示无会话或有意沉默。
    pub async fn handle_response(
        self: &Arc<Self>,
        user_id: &str,
        message: &str,
    ) -> Result<Option<String>, KoruError> {
        let Some(mut session) = self.store.take(user_id).await else {
            return Ok(None);
        };

        if session.is_expired(self.settings.session_timeout) {
            self.collector.cancel(user_id).await;
            info!(user = %user_id, "session expired, reclaimed");
            return Ok(Some(messages::SESSION_EXPIRED.to_string()));
        }

        session.touch();

        match self.process(&mut session, message).await {
            Ok(Outcome::Reply(text)) => {
                self.store.put(session).await;
                Ok(Some(text))
            }
            Ok(Outcome::Silent) => {
                self.store.put(session).await;
                Ok(None)
            }
            Ok(Outcome::Concluded(text)) => {
                self.collector.cancel(user_id).await;
                info!(user = %user_id, "interview concluded");
                Ok(Some(text))
            }
            Err(e) => {
                self.store.put(session).await;
                Err(e)
            }
        }
    }

    async fn process(
        self: &Arc<Self>,
        session: &mut Session,
        message: &str,
    ) -> Result<Outcome, KoruError> {
        // 注册：先邮箱后姓名，都齐了才开始提问
        if session.candidate_email.is_none() {
            let trimmed = message.trim();
            return if self.email_re.is_match(trimmed) {
                session.candidate_email = Some(trimmed.to_string());
                Ok(Outcome::Reply(messages::ASK_NAME.to_string()))
            } else {
                // 校验重试，停在原状态
                Ok(Outcome::Reply(messages::INVALID_EMAIL.to_string()))
            };
        }

        if session.candidate_name.is_none() {
            session.candidate_name = Some(message.to_string());
            session.stage = Stage::FIRST;
            session.current_question = 0;
            return Ok(Outcome::Reply(session.current_question_text().to_string()));
        }

        // 追问回答：评估后进下一题或进入问答窗口
        if session.follow_up_pending {
            let evaluation = self.evaluate_response(session, message, true).await?;
            session.scores.push(evaluation);
            session.follow_up_pending = false;

            if session.is_last_question() {
                session.in_qa_section = true;
                return Ok(Outcome::Reply(messages::ASK_QUESTIONS.to_string()));
            }

            session.current_question += 1;
            return Ok(Outcome::Reply(session.current_question_text().to_string()));
        }

        // 问答窗口：LANJUT 推进，其余进收集缓冲
        if session.in_qa_section {
            if message.trim().eq_ignore_ascii_case(messages::CONTINUE_KEYWORD) {
                self.collector.cancel(&session.user_id).await;
                session.in_qa_section = false;

                return match session.stage.next() {
                    Some(next) => {
                        session.stage = next;
                        session.current_question = 0;
                        Ok(Outcome::Reply(session.current_question_text().to_string()))
                    }
                    None => {
                        let text = self.conclude(session).await;
                        Ok(Outcome::Concluded(text))
                    }
                };
            }
            return self.collect_question(session, message).await;
        }

        // 主问题回答：评估 + 生成追问
        let evaluation = self.evaluate_response(session, message, false).await?;
        session.scores.push(evaluation);

        let follow_up = self.generate_follow_up(session, message).await?;
        session.follow_up_pending = true;
        Ok(Outcome::Reply(follow_up))
    }

    /// 缓冲一条自由提问并重置防抖计时器；同步侧有意不回复
    async fn collect_question(
        self: &Arc<Self>,
        session: &mut Session,
        message: &str,
    ) -> Result<Outcome, KoruError> {
        let user_id = session.user_id.clone();
        self.collector.push(&user_id, message.to_string()).await;

        let engine = Arc::clone(self);
        let timer_user = user_id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(engine.settings.debounce).await;
            engine.flush_questions(&timer_user).await;
        });
        self.collector.set_timer(&user_id, handle).await;

        Ok(Outcome::Silent)
    }

    /// 防抖计时器触发：批量回答全部缓冲问题并主动推送
    ///
    /// 没有请求在等待这条回复，发送失败只能记录；生成失败仍推送兜底文案。
    async fn flush_questions(&self, user_id: &str) {
        let questions = self.collector.take_pending(user_id).await;
        if questions.is_empty() {
            return;
        }

        let reply = match self.generate_batch_answers(&questions).await {
            Ok(text) => format!("{}\n\n{}", text, messages::BATCH_FOOTER),
            Err(e) => {
                warn!(user = %user_id, "batch answer generation failed: {}", e);
                messages::BATCH_FALLBACK.to_string()
            }
        };

        if let Err(e) = self.notifier.send(user_id, &reply).await {
            tracing::error!(user = %user_id, "failed to push batched answers: {}", e);
        }
    }

    async fn generate_batch_answers(&self, questions: &[String]) -> Result<String, KoruError> {
        let questions_text = questions
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "As a friendly HR representative having a natural conversation, answer these candidate questions about our company:\n\n\
Questions:\n{}\n\n\
Company Information:\n{}\n\n\
Please format your response in Bahasa Indonesia:\n\
1. Start with a warm, natural greeting\n\
2. Answer each question conversationally\n\
3. For salary/personal questions, politely defer to HR discussion\n\
4. Keep the tone friendly and casual, like chatting with a friend\n\
5. End naturally, inviting more questions or to continue\n\n\
Important: Make it sound like a natural conversation, not a formal response.",
            questions_text,
            messages::company_profile()
        );

        self.llm
            .generate_response(&prompt, super::stages::RECRUITER.system_prompt)
            .await
    }

    /// 评估一条回答：阶段角色打 1-10 分并给简评
    async fn evaluate_response(
        &self,
        session: &Session,
        message: &str,
        is_follow_up: bool,
    ) -> Result<Evaluation, KoruError> {
        let agent = session.stage.agent();

        let prompt = if is_follow_up {
            format!(
                "This is a follow-up response. Rate 1-10 & give brief feedback on how well they elaborated their previous answer: \"{}\"",
                message
            )
        } else {
            format!(
                "Q: {}\nA: \"{}\"\nRate 1-10 & brief feedback.",
                session.current_question_text(),
                message
            )
        };

        let evaluation = self
            .llm
            .generate_response(&prompt, agent.system_prompt)
            .await?;

        Ok(self.parse_evaluation(&evaluation))
    }

    /// 解析评估输出：取第一个整数子串为分数（找不到默认 5），其余为简评
    ///
    /// 解析器不钳制范围："Score: 42, great" 解析为 42。
    fn parse_evaluation(&self, evaluation: &str) -> Evaluation {
        match self.integer_re.find(evaluation) {
            Some(m) => {
                let score = m.as_str().parse().unwrap_or(5);
                let feedback = format!(
                    "{}{}",
                    &evaluation[..m.start()],
                    &evaluation[m.end()..]
                );
                Evaluation {
                    score,
                    feedback: feedback.trim().to_string(),
                }
            }
            None => Evaluation {
                score: 5,
                feedback: evaluation.trim().to_string(),
            },
        }
    }

    /// 根据主问题与候选人的回答生成一条自然的追问，去掉包裹引号
    async fn generate_follow_up(
        &self,
        session: &Session,
        response: &str,
    ) -> Result<String, KoruError> {
        let agent = session.stage.agent();
        let main_question = session.current_question_text();

        let prompt = format!(
            "You are having a natural conversation in Bahasa Indonesia with a job candidate. Based on their response: \"{}\" to the question \"{}\", ask a natural follow-up question.\n\n\
Rules:\n\
1. Respond as if you're having a casual conversation\n\
2. No quotation marks\n\
3. No translations\n\
4. No meta-text or explanations\n\
5. Keep it brief and friendly\n\
6. Use casual Indonesian conversational style\n\n\
Just write the follow-up question directly, nothing else.",
            response, main_question
        );

        let follow_up = self
            .llm
            .generate_response(&prompt, agent.system_prompt)
            .await?;

        Ok(follow_up
            .chars()
            .filter(|c| !matches!(c, '"' | '\'' | '“' | '”'))
            .collect::<String>()
            .trim()
            .to_string())
    }

    /// 收尾：算平均分、定结论、够分则预约，最后组最终消息
    ///
    /// 预约失败（包括服务未配置）绝不中断收尾，回退到 HR 联系文案。
    async fn conclude(&self, session: &Session) -> String {
        let average = session.average_score();
        let verdict = determine_result(average);

        if average >= self.settings.min_score_to_pass {
            let email = session.candidate_email.as_deref().unwrap_or_default();
            let name = session.candidate_name.as_deref().unwrap_or_default();

            match self.calendar.schedule_interview(email, name).await {
                Ok(link) => {
                    return messages::final_passed_with_link(average, verdict, email, &link)
                }
                Err(e) => {
                    warn!(user = %session.user_id, "failed to schedule interview: {}", e);
                    return messages::final_passed_fallback(average, verdict);
                }
            }
        }

        messages::final_failed(average, verdict)
    }
}

/// 三档结论：≥8 很好，≥6 好，其余待提高
fn determine_result(average: f64) -> &'static str {
    if average >= 8.0 {
        "Sangat Baik"
    } else if average >= 6.0 {
        "Baik"
    } else {
        "Perlu Improvement"
    }
}
