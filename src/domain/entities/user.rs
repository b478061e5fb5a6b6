//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다. 크리덴셜 코드 슬롯(이메일 인증,
//! 비밀번호 재설정)을 문서에 내장하여 (사용자, 목적) 쌍마다 최대 하나의
//! 활성 코드만 존재한다는 불변식을 저장 단위에서 보장합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::credential_code::CodeSlot;

/// 사용자 엔티티
///
/// 시스템의 모든 사용자를 표현하는 핵심 도메인 엔티티입니다.
/// 비밀번호는 bcrypt 해시로만 저장되며 평문은 어디에도 기록되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 사용자 고유 식별자 (UUID v4)
    pub id: String,
    /// 사용자 이메일 (unique)
    pub email: String,
    /// 사용자 이름 (unique)
    pub username: String,
    /// 해시된 비밀번호
    pub password_hash: String,
    /// 이메일 인증 여부 — 가입 시 false, 코드 소비 성공 시 true
    pub is_email_verified: bool,
    /// 이메일 인증 코드 슬롯
    #[serde(default)]
    pub verification_code: CodeSlot,
    /// 비밀번호 재설정 코드 슬롯
    #[serde(default)]
    pub reset_code: CodeSlot,
    /// 생성 시간
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    /// 수정 시간
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 새 사용자 생성
    ///
    /// 이메일 인증이 필요한 미인증 상태로 시작하며, 코드 슬롯은 비어 있습니다.
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            email,
            username,
            password_hash,
            is_email_verified: false,
            verification_code: CodeSlot::None,
            reset_code: CodeSlot::None,
            created_at: now,
            updated_at: now,
        }
    }
}
