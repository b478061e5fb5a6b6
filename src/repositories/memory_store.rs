//! In-Memory Credential Store
//!
//! 테스트와 로컬 개발을 위한 저장소 구현입니다. 뮤텍스로 보호되는 해시맵을
//! 사용하므로 슬롯에 대한 read-modify-write가 락 아래에서 직렬화되며,
//! 도메인 상태 머신([`CodeSlot`])이 전이 규칙을 그대로 수행합니다.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::{CodePurpose, CodeSlot, CredentialCode, User};

use super::credential_store::CredentialStore;

/// 인메모리 사용자/코드 저장소
///
/// 키는 사용자 이메일입니다. `Default`로 비어 있는 저장소를 생성합니다.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryCredentialStore {
    /// 비어 있는 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut<'a>(user: &'a mut User, purpose: CodePurpose) -> &'a mut CodeSlot {
        match purpose {
            CodePurpose::EmailVerification => &mut user.verification_code,
            CodePurpose::PasswordReset => &mut user.reset_code,
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert_user(&self, user: User) -> AppResult<User> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if users.contains_key(&user.email) {
            return Err(AppError::ConflictError("Email already registered".to_string()));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::ConflictError("Username already taken".to_string()));
        }

        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self
            .users
            .lock()
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(users.get(email).cloned())
    }

    async fn mark_email_verified(&self, email: &str) -> AppResult<()> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let user = users
            .get_mut(email)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.is_email_verified = true;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_password_hash(&self, email: &str, password_hash: &str) -> AppResult<()> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let user = users
            .get_mut(email)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn store_code(
        &self,
        email: &str,
        purpose: CodePurpose,
        code: CredentialCode,
    ) -> AppResult<()> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let user = users
            .get_mut(email)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(prior) = Self::slot_mut(user, purpose).issue(code) {
            log::debug!(
                "기존 활성 코드 대체됨 - 사용자: {}, 목적: {}, 발급 시각: {}",
                email,
                purpose.as_str(),
                prior.issued_at
            );
        }
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn consume_code(
        &self,
        email: &str,
        purpose: CodePurpose,
        presented: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 존재하지 않는 사용자는 실패와 구분되지 않아야 함
        let Some(user) = users.get_mut(email) else {
            return Ok(false);
        };

        let consumed = Self::slot_mut(user, purpose).try_consume(presented, now);
        if consumed {
            user.updated_at = now;
        }
        Ok(consumed)
    }

    async fn clear_code(&self, email: &str, purpose: CodePurpose) -> AppResult<()> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(user) = users.get_mut(email) {
            Self::slot_mut(user, purpose).retire();
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    fn sample_user(email: &str, username: &str) -> User {
        User::new(email.to_string(), username.to_string(), "$2b$12$hash".to_string())
    }

    fn sample_code(value: &str, purpose: CodePurpose, now: DateTime<Utc>) -> CredentialCode {
        CredentialCode::new(value.to_string(), purpose, Duration::minutes(15), now)
    }

    #[actix_web::test]
    async fn test_duplicate_email_is_rejected() {
        let store = InMemoryCredentialStore::new();
        store
            .insert_user(sample_user("alice@example.com", "alice"))
            .await
            .unwrap();

        let result = store
            .insert_user(sample_user("alice@example.com", "alice2"))
            .await;
        assert!(matches!(result, Err(AppError::ConflictError(_))));
    }

    #[actix_web::test]
    async fn test_duplicate_username_is_rejected() {
        let store = InMemoryCredentialStore::new();
        store
            .insert_user(sample_user("alice@example.com", "alice"))
            .await
            .unwrap();

        let result = store
            .insert_user(sample_user("alice2@example.com", "alice"))
            .await;
        assert!(matches!(result, Err(AppError::ConflictError(_))));
    }

    #[actix_web::test]
    async fn test_consume_is_single_use() {
        let store = InMemoryCredentialStore::new();
        let now = Utc::now();
        store
            .insert_user(sample_user("alice@example.com", "alice"))
            .await
            .unwrap();
        store
            .store_code(
                "alice@example.com",
                CodePurpose::EmailVerification,
                sample_code("123456", CodePurpose::EmailVerification, now),
            )
            .await
            .unwrap();

        let first = store
            .consume_code("alice@example.com", CodePurpose::EmailVerification, "123456", now)
            .await
            .unwrap();
        let second = store
            .consume_code("alice@example.com", CodePurpose::EmailVerification, "123456", now)
            .await
            .unwrap();

        assert!(first);
        assert!(!second);
    }

    #[actix_web::test]
    async fn test_concurrent_consumes_yield_exactly_one_winner() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let now = Utc::now();
        store
            .insert_user(sample_user("alice@example.com", "alice"))
            .await
            .unwrap();
        store
            .store_code(
                "alice@example.com",
                CodePurpose::EmailVerification,
                sample_code("123456", CodePurpose::EmailVerification, now),
            )
            .await
            .unwrap();

        let a = {
            let store = store.clone();
            actix_web::rt::spawn(async move {
                store
                    .consume_code(
                        "alice@example.com",
                        CodePurpose::EmailVerification,
                        "123456",
                        now,
                    )
                    .await
                    .unwrap()
            })
        };
        let b = {
            let store = store.clone();
            actix_web::rt::spawn(async move {
                store
                    .consume_code(
                        "alice@example.com",
                        CodePurpose::EmailVerification,
                        "123456",
                        now,
                    )
                    .await
                    .unwrap()
            })
        };

        let (first, second) = (a.await.unwrap(), b.await.unwrap());
        assert!(first ^ second, "정확히 하나의 소비만 성공해야 함");
    }

    #[actix_web::test]
    async fn test_purposes_are_isolated() {
        let store = InMemoryCredentialStore::new();
        let now = Utc::now();
        store
            .insert_user(sample_user("alice@example.com", "alice"))
            .await
            .unwrap();
        store
            .store_code(
                "alice@example.com",
                CodePurpose::EmailVerification,
                sample_code("111111", CodePurpose::EmailVerification, now),
            )
            .await
            .unwrap();

        // 다른 목적의 슬롯으로는 소비 불가
        let crossed = store
            .consume_code("alice@example.com", CodePurpose::PasswordReset, "111111", now)
            .await
            .unwrap();
        assert!(!crossed);
    }

    #[actix_web::test]
    async fn test_unknown_user_consume_is_indistinguishable_failure() {
        let store = InMemoryCredentialStore::new();
        let result = store
            .consume_code(
                "ghost@example.com",
                CodePurpose::EmailVerification,
                "123456",
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(!result);
    }
}
