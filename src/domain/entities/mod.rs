//! # Domain Entities Module
//!
//! 비즈니스 도메인의 핵심 엔티티들을 정의합니다.
//! 엔티티는 저장소 구현(MongoDB/인메모리)과 무관하게 serde로 직렬화되며,
//! 크리덴셜 코드의 상태 전이는 [`credential_code`]의 명시적 상태 머신이
//! 담당합니다.

pub mod credential_code;
pub mod user;

pub use credential_code::{CodePurpose, CodeSlot, CredentialCode};
pub use user::User;
