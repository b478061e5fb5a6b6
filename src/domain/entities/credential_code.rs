//! Credential Code Slot Implementation
//!
//! 사용자와 목적(이메일 인증/비밀번호 재설정)에 바인딩된 단기 일회용 코드의
//! 상태 머신입니다. 슬롯은 (사용자, 목적) 쌍마다 하나씩 존재하며,
//! 영속화 기술과 무관하게 상태 전이를 명시적으로 표현합니다.
//!
//! ```text
//! None ──issue──> Active ──try_consume(일치, 기한 내)──> Consumed
//!                   │ │
//!                   │ └──try_consume(기한 초과)──> Expired
//!                   └──issue(재발급)──> Superseded (이전 코드)
//! ```
//!
//! 종료 상태(Consumed/Expired/Superseded)에서는 오직 새로운 `issue`만이
//! 슬롯을 다시 Active로 되돌립니다.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 코드의 발급 목적
///
/// 코드는 정확히 하나의 목적에 바인딩되며, 다른 목적의 검증에는
/// 절대 사용될 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodePurpose {
    /// 가입 후 이메일 소유 확인
    EmailVerification,
    /// 비밀번호 재설정 요청 확인
    PasswordReset,
}

impl CodePurpose {
    /// 사용자 문서에서 이 목적의 슬롯이 저장되는 필드 이름
    pub fn field_name(&self) -> &'static str {
        match self {
            CodePurpose::EmailVerification => "verification_code",
            CodePurpose::PasswordReset => "reset_code",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CodePurpose::EmailVerification => "email-verification",
            CodePurpose::PasswordReset => "password-reset",
        }
    }
}

/// 발급된 크리덴셜 코드
///
/// 값, 목적, 발급/만료 시각을 담습니다. 소비 여부는 코드 자체가 아니라
/// 슬롯의 상태([`CodeSlot`])가 표현합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialCode {
    /// 사용자에게 전달되는 불투명한 코드 값
    pub value: String,
    /// 바인딩된 목적
    pub purpose: CodePurpose,
    /// 발급 시각
    #[serde(with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    /// 만료 시각 (경계 포함: `now <= expires_at`이면 유효)
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl CredentialCode {
    /// 새 코드를 생성합니다. 만료 시각은 `now + ttl`입니다.
    pub fn new(value: String, purpose: CodePurpose, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            value,
            purpose,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    /// 주어진 시각 기준 만료 여부
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// (사용자, 목적) 슬롯의 명시적 상태
///
/// 사용자 문서에 내장되어 영속화됩니다. 태그 필드 `state`로 직렬화되므로
/// 저장소 구현이 상태 조건부 갱신(compare-and-set)을 단일 연산으로
/// 수행할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CodeSlot {
    /// 발급된 코드 없음
    None,
    /// 소비 가능한 활성 코드
    Active(CredentialCode),
    /// 검증에 성공하여 소비됨 — 재사용 불가
    Consumed(CredentialCode),
    /// 만료 후 소비 시도가 관찰되어 정규화됨
    Expired(CredentialCode),
    /// 재발급으로 대체됨
    Superseded(CredentialCode),
}

impl Default for CodeSlot {
    fn default() -> Self {
        CodeSlot::None
    }
}

impl CodeSlot {
    /// 새 코드를 발급하고 슬롯을 Active로 전이합니다.
    ///
    /// 이전에 활성 코드가 있었다면 그 코드는 Superseded가 되며,
    /// 감사 로그를 위해 호출자에게 반환됩니다. 이후 이전 코드 값으로는
    /// 어떤 검증도 성공할 수 없습니다.
    pub fn issue(&mut self, code: CredentialCode) -> Option<CredentialCode> {
        let prior = match std::mem::replace(self, CodeSlot::None) {
            CodeSlot::Active(prev) => Some(prev),
            _ => None,
        };
        *self = CodeSlot::Active(code);
        prior
    }

    /// 제시된 코드의 소비를 시도합니다.
    ///
    /// 슬롯이 Active이고 값이 정확히 일치하며 `now <= expires_at`인 경우에만
    /// 성공하고, 슬롯은 Consumed로 전이됩니다. 같은 코드로 두 번째 호출은
    /// 반드시 실패합니다.
    ///
    /// 만료된 활성 코드에 대한 시도는 슬롯을 Expired로 정규화합니다.
    /// 실패 사유(불일치/만료/소비됨/대체됨)는 반환값에서 구분되지 않습니다.
    pub fn try_consume(&mut self, presented: &str, now: DateTime<Utc>) -> bool {
        let slot = std::mem::replace(self, CodeSlot::None);
        match slot {
            CodeSlot::Active(code) => {
                if code.is_expired(now) {
                    *self = CodeSlot::Expired(code);
                    false
                } else if code.value == presented {
                    *self = CodeSlot::Consumed(code);
                    true
                } else {
                    *self = CodeSlot::Active(code);
                    false
                }
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// 소비 또는 대체 후 슬롯을 비웁니다.
    pub fn retire(&mut self) {
        *self = CodeSlot::None;
    }

    /// 현재 활성 코드에 대한 참조 (만료 여부와 무관하게 Active 상태만)
    pub fn active_code(&self) -> Option<&CredentialCode> {
        match self {
            CodeSlot::Active(code) => Some(code),
            _ => None,
        }
    }
}
