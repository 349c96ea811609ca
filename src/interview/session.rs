//! 面试会话数据模型

use std::time::{Duration, Instant};

use super::stages::Stage;

/// 一次已评估回答的结果：1-10 分与简评（追问回答同样计入）
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub score: u32,
    pub feedback: String,
}

/// 单个候选人的面试会话，按 user_id 唯一，由 SessionStore 持有
///
/// 状态机编码在字段上：email/name 缺失 = 注册阶段，follow_up_pending = 等待
/// 追问回答，in_qa_section = 阶段间问答窗口。
pub struct Session {
    pub user_id: String,
    /// 当前阶段，只前进不回退
    pub stage: Stage,
    /// 当前阶段问题下标，不变式 current_question < stage.questions().len()
    pub current_question: usize,
    pub scores: Vec<Evaluation>,
    pub started_at: Instant,
    /// 每处理一条入站消息刷新
    pub last_interaction: Instant,
    pub follow_up_pending: bool,
    pub in_qa_section: bool,
    pub candidate_email: Option<String>,
    pub candidate_name: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Instant::now();
        Self {
            user_id: user_id.into(),
            stage: Stage::FIRST,
            current_question: 0,
            scores: Vec::new(),
            started_at: now,
            last_interaction: now,
            follow_up_pending: false,
            in_qa_section: false,
            candidate_email: None,
            candidate_name: None,
        }
    }

    /// 刷新最后交互时间
    pub fn touch(&mut self) {
        self.last_interaction = Instant::now();
    }

    /// 会话是否过期（惰性回收，在下一条消息到达时判断）
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_interaction.elapsed() > timeout
    }

    pub fn has_basic_info(&self) -> bool {
        self.candidate_email.is_some() && self.candidate_name.is_some()
    }

    /// 当前问题是否为本阶段最后一题
    pub fn is_last_question(&self) -> bool {
        self.current_question + 1 >= self.stage.questions().len()
    }

    /// 当前阶段的当前问题文本
    pub fn current_question_text(&self) -> &'static str {
        self.stage.questions()[self.current_question]
    }

    /// 全部已评估分数的无权重平均；空列表按 0.0 处理（防御除零）
    pub fn average_score(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.scores.iter().map(|e| e.score).sum();
        f64::from(sum) / self.scores.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_awaits_email() {
        let s = Session::new("628123");
        assert!(!s.has_basic_info());
        assert_eq!(s.stage, Stage::Initial);
        assert_eq!(s.current_question, 0);
        assert!(!s.follow_up_pending);
        assert!(!s.in_qa_section);
    }

    #[test]
    fn test_expiry_window() {
        let s = Session::new("628123");
        assert!(!s.is_expired(Duration::from_secs(60)));

        std::thread::sleep(Duration::from_millis(30));
        assert!(s.is_expired(Duration::from_millis(10)));
        // 刚好在窗口内则正常处理
        assert!(!s.is_expired(Duration::from_secs(60)));
    }

    #[test]
    fn test_average_score() {
        let mut s = Session::new("628123");
        assert_eq!(s.average_score(), 0.0);

        for score in [7, 8, 6, 9, 7, 8] {
            s.scores.push(Evaluation {
                score,
                feedback: String::new(),
            });
        }
        assert!((s.average_score() - 7.5).abs() < f64::EPSILON);
    }
}
