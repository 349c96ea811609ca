//! 会话存储
//!
//! user_id -> Session 的内存映射，持有显式生命周期接口（create / take / put /
//! delete），注入 Engine 而非全局可达。不持久化，进程重启即清空（接受的限制）。
//!
//! 同一用户的串行化靠 take/put：处理期间会话被移出映射，处理完再放回；并发的
//! 第二条消息取不到会话即被忽略，不会交错读写同一 Session。

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::session::Session;

/// 内存会话存储，无容量上限；过期会话由 Engine 惰性回收
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// 新建会话，覆盖该用户已有的会话
    pub async fn create(&self, user_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(user_id.to_string(), Session::new(user_id));
    }

    pub async fn contains(&self, user_id: &str) -> bool {
        self.sessions.read().await.contains_key(user_id)
    }

    /// 移出会话供处理；处理完必须 put 回去，除非会话结束
    pub async fn take(&self, user_id: &str) -> Option<Session> {
        self.sessions.write().await.remove(user_id)
    }

    pub async fn put(&self, session: Session) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.user_id.clone(), session);
    }

    pub async fn delete(&self, user_id: &str) {
        self.sessions.write().await.remove(user_id);
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_overwrites_existing() {
        let store = SessionStore::new();
        store.create("u1").await;

        let mut session = store.take("u1").await.unwrap();
        session.candidate_email = Some("a@b.com".to_string());
        store.put(session).await;

        store.create("u1").await;
        let fresh = store.take("u1").await.unwrap();
        assert!(fresh.candidate_email.is_none());
        assert_eq!(store.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_take_leaves_no_session() {
        let store = SessionStore::new();
        store.create("u1").await;

        let taken = store.take("u1").await;
        assert!(taken.is_some());
        // 处理在途期间，同一用户的第二条消息取不到会话
        assert!(store.take("u1").await.is_none());
        assert!(!store.contains("u1").await);
    }
}
