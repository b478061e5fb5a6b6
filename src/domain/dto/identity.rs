//! # Identity API Data Transfer Objects
//!
//! 인증 서비스의 요청/응답 스키마입니다. 모든 요청 본문은 엔드포인트별
//! 명시적 구조체로 정의되며 `validator` derive로 필드 단위 검증을 수행합니다.
//!
//! ## 검증 실패 처리
//!
//! ```rust,ignore
//! payload.validate()
//!     .map_err(|e| AppError::ValidationError(e.to_string()))?;
//! ```

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::User;

/// 회원가입 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// 사용자 이름 (3-30자, 영숫자와 언더스코어만 허용)
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters"
    ))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    /// 이메일 주소 (시스템 전체에서 유일)
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// 평문 비밀번호 — 수신 즉시 해싱되며 저장/로깅되지 않음
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

/// 로그인 폼 (form-encoded)
///
/// OAuth2 password flow 관례에 따라 `username` 필드에 이메일을 담습니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// 이메일 인증 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

/// 인증 코드 재전송 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// 비밀번호 재설정 코드 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// 비밀번호 재설정 실행 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,

    /// 새 비밀번호 — 가입 시와 동일한 강도 요구사항 적용
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

/// 민감 정보를 제거한 사용자 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_verified: user.is_email_verified,
        }
    }
}

/// 회원가입 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub message: String,
}

/// 로그인 성공 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// 단순 메시지 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 사용자명 문자 집합 검증
///
/// 영숫자와 언더스코어만 허용합니다.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some("Username may only contain letters, digits and underscores".into());
        Err(error)
    }
}

/// 비밀번호 강도 검증
///
/// 대문자, 소문자, 숫자를 각각 최소 하나씩 포함해야 합니다.
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        let mut error = ValidationError::new("weak_password");
        error.message =
            Some("Password must contain an uppercase letter, a lowercase letter and a digit".into());
        Err(error)
    }
}
