//! Credential Store Port
//!
//! 사용자 레코드와 크리덴셜 코드 슬롯을 보관하는 저장소의 추상 인터페이스입니다.
//! 서비스 계층은 이 trait에만 의존하며, 구현체는 명시적으로 주입됩니다.
//! 프로덕션은 MongoDB([`super::mongo_store`]), 테스트와 로컬 개발은
//! 인메모리([`super::memory_store`]) 구현을 사용합니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::errors::AppResult;
use crate::domain::entities::{CodePurpose, CredentialCode, User};

/// 사용자/코드 영속화 저장소
///
/// ## 동시성 계약
///
/// `consume_code`는 동일한 (사용자, 목적) 슬롯에 대한 read-modify-write를
/// 단일 원자 연산으로 수행해야 합니다. 같은 코드에 대한 두 개의 동시 호출 중
/// 정확히 하나만 `true`를 반환할 수 있습니다.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 새 사용자를 저장합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이메일 또는 사용자명이 이미 사용 중
    /// * `AppError::DatabaseError` - 저장소 연산 실패
    async fn insert_user(&self, user: User) -> AppResult<User>;

    /// 이메일로 사용자를 조회합니다.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// 사용자의 이메일 인증 상태를 true로 갱신합니다.
    async fn mark_email_verified(&self, email: &str) -> AppResult<()>;

    /// 사용자의 비밀번호 해시를 교체합니다.
    async fn update_password_hash(&self, email: &str, password_hash: &str) -> AppResult<()>;

    /// (사용자, 목적) 슬롯에 새 코드를 저장합니다.
    ///
    /// 기존 활성 코드는 대체(supersede)되어 더 이상 검증되지 않습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 해당 이메일의 사용자가 없음
    async fn store_code(
        &self,
        email: &str,
        purpose: CodePurpose,
        code: CredentialCode,
    ) -> AppResult<()>;

    /// 제시된 코드의 원자적 소비를 시도합니다.
    ///
    /// 슬롯이 활성 상태이고 값이 정확히 일치하며 `now <= expires_at`인
    /// 경우에만 소비 상태로 전이하고 `true`를 반환합니다.
    /// 사용자가 없거나 그 외 모든 실패는 구분 없이 `Ok(false)`입니다.
    async fn consume_code(
        &self,
        email: &str,
        purpose: CodePurpose,
        presented: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// 소비 완료된 슬롯을 비웁니다.
    async fn clear_code(&self, email: &str, purpose: CodePurpose) -> AppResult<()>;
}
