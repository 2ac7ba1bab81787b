//! 메모리 기반 사용자 디렉터리.
//!
//! 데이터베이스가 설정되지 않은 경우와 테스트에서 사용합니다.
//! 프로세스가 종료되면 데이터는 사라집니다.

use std::collections::HashMap;

use async_trait::async_trait;
use roster_core::{normalize_email, Identity, RosterError, RosterResult};
use tokio::sync::RwLock;

use super::UserDirectory;

/// 메모리 기반 사용자 디렉터리.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, Identity>>,
}

impl InMemoryUserDirectory {
    /// 빈 디렉터리 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 사용자 수.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// 비어 있는지 확인.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_by_email(&self, email: &str) -> RosterResult<Option<Identity>> {
        Ok(self.users.read().await.get(&normalize_email(email)).cloned())
    }

    async fn list(&self) -> RosterResult<Vec<Identity>> {
        let mut users: Vec<Identity> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn insert(&self, identity: &Identity) -> RosterResult<()> {
        let key = normalize_email(&identity.email);
        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(RosterError::DuplicateIdentity(key));
        }
        users.insert(key, identity.clone());
        Ok(())
    }

    async fn update(&self, identity: &Identity) -> RosterResult<bool> {
        let key = normalize_email(&identity.email);
        let mut users = self.users.write().await;
        match users.get_mut(&key) {
            Some(existing) => {
                *existing = identity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, email: &str) -> RosterResult<bool> {
        Ok(self.users.write().await.remove(&normalize_email(email)).is_some())
    }
}
