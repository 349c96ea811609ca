//! 面试全流程集成测试
//!
//! 用 Mock 后端走完整条路径：触发词 → 邮箱 → 姓名 → 三阶段 9 题（主答 + 追问
//! 答）→ 阶段间问答窗口 → 收尾消息。不触网。

use std::sync::Arc;
use std::time::Duration;

use koru::calendar::CalendarService;
use koru::error::KoruError;
use koru::integrations::OutboundNotifier;
use koru::interview::{InterviewEngine, InterviewSettings, SessionStore, Stage};
use koru::llm::{GenerativeClient, MockBackend};
use koru::router::MessageRouter;

struct ChannelNotifier {
    tx: tokio::sync::mpsc::UnboundedSender<(String, String)>,
}

#[async_trait::async_trait]
impl OutboundNotifier for ChannelNotifier {
    async fn send(&self, user_id: &str, body: &str) -> Result<(), KoruError> {
        let _ = self.tx.send((user_id.to_string(), body.to_string()));
        Ok(())
    }
}

fn build_stack(
    score: u32,
    debounce: Duration,
) -> (
    MessageRouter,
    Arc<SessionStore>,
    tokio::sync::mpsc::UnboundedReceiver<(String, String)>,
) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let store = Arc::new(SessionStore::new());
    let engine = Arc::new(InterviewEngine::new(
        store.clone(),
        GenerativeClient::new(Arc::new(MockBackend::with_score(score))),
        CalendarService::disabled(),
        Arc::new(ChannelNotifier { tx }),
        InterviewSettings {
            session_timeout: Duration::from_secs(30 * 60),
            min_score_to_pass: 6.0,
            debounce,
        },
    ));
    let router = MessageRouter::new(engine, Duration::from_secs(5));
    (router, store, rx)
}

const TRIGGER: &str = "Halo, saya tertarik dengan posisi Operation Staff - Worldcoin Project";

#[tokio::test]
async fn test_full_interview_scenario() {
    let (router, store, _rx) = build_stack(7, Duration::from_secs(20));
    let user = "628123456789";

    // 触发词 → 开场白（索要邮箱）
    let welcome = router.handle_inbound(user, TRIGGER).await.unwrap();
    assert!(welcome.contains("interview"));
    assert!(welcome.contains("email"));

    // 无效邮箱：校验重试
    let retry = router.handle_inbound(user, "bukan email").await.unwrap();
    assert!(retry.contains("email yang valid"));

    // 有效邮箱 → 索要姓名
    let ask_name = router.handle_inbound(user, "a@b.com").await.unwrap();
    assert!(ask_name.contains("nama lengkap"));

    // 姓名 → 第一阶段第一题
    let q1 = router.handle_inbound(user, "Jane").await.unwrap();
    assert_eq!(q1, Stage::Initial.questions()[0]);

    // 主答 → 追问；追问答 → 下一题
    let follow_up = router
        .handle_inbound(user, "Saya pernah dua tahun jadi promoter")
        .await
        .unwrap();
    assert!(!follow_up.is_empty());
    assert_ne!(follow_up, Stage::Initial.questions()[1]);

    let q2 = router
        .handle_inbound(user, "Lebih detailnya begini")
        .await
        .unwrap();
    assert_eq!(q2, Stage::Initial.questions()[1]);

    // 每答一次记一次分（主答 + 追问答 = 2 条）
    {
        let session = store.take(user).await.unwrap();
        assert_eq!(session.scores.len(), 2);
        assert!(session.scores.iter().all(|e| e.score == 7));
        store.put(session).await;
    }

    // 走完剩余题目直到最终收尾
    let mut last_reply = q2;
    for _ in 0..40 {
        if last_reply.contains("Interview Selesai") {
            break;
        }
        let msg = if last_reply.contains("ditanyakan") {
            "LANJUT"
        } else {
            "jawaban saya berikutnya"
        };
        last_reply = router.handle_inbound(user, msg).await.unwrap();
    }

    assert!(last_reply.contains("Interview Selesai"));
    assert!(last_reply.contains("7.0/10"));
    assert!(last_reply.contains("Baik"));
    // 会话收尾后即删除
    assert!(store.take(user).await.is_none());

    // 会话已不存在：无关消息不再得到回复
    assert!(router.handle_inbound(user, "halo?").await.is_none());
}

#[tokio::test]
async fn test_qa_break_batches_questions_proactively() {
    let (router, _store, mut rx) = build_stack(8, Duration::from_millis(100));
    let user = "628987654321";

    router.handle_inbound(user, TRIGGER).await;
    router.handle_inbound(user, "a@b.com").await;
    router.handle_inbound(user, "Jane").await;

    // 答完第一阶段 3 题进入问答窗口
    let mut reply = String::new();
    for _ in 0..6 {
        reply = router.handle_inbound(user, "jawaban").await.unwrap();
    }
    assert!(reply.contains("ditanyakan"));

    // 三个自由提问，同步侧沉默
    for q in ["Gaji berapa?", "Jam kerja gimana?", "Lokasi di mana?"] {
        assert!(router.handle_inbound(user, q).await.is_none());
    }

    // 静默期满后恰好一条批量推送
    let (to, body) = tokio::time::timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("batched reply should arrive")
        .unwrap();
    assert_eq!(to, user);
    assert!(body.contains("LANJUT"));

    // 不再有第二条
    assert!(
        tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .is_err()
    );

    // 窗口后 LANJUT 推进到第二阶段
    let next = router.handle_inbound(user, "lanjut").await.unwrap();
    assert_eq!(next, Stage::Technical.questions()[0]);
}
