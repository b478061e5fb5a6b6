//! # Payment API Data Transfer Objects
//!
//! 결제 서비스의 요청/응답 스키마입니다. 금액은 부동소수점 오차를 피하기
//! 위해 `rust_decimal::Decimal`로 표현하며, 주문 서비스의 기록과
//! 정확히 일치해야 합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 결제 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentRequest {
    /// 결제 대상 주문 식별자 — 멱등성 키 유도의 유일한 입력
    #[validate(length(min = 1, message = "Order id is required"))]
    pub order_id: String,

    /// 청구 금액 (주 단위, 예: 49.99)
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,

    /// ISO 4217 통화 코드
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,

    /// base64로 인코딩된 암호화 결제 수단 토큰
    #[validate(length(min = 1, message = "Encrypted token is required"))]
    pub encrypted_token: String,

    /// 결제 완료 알림을 받을 이메일
    #[validate(email(message = "Invalid email address"))]
    pub user_email: String,

    /// 결제 프로바이더 (기본값: stripe)
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_provider() -> String {
    "stripe".to_string()
}

/// 결제 성공 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub status: String,
    pub provider: String,
    pub payment_id: String,
}

/// 금액은 0보다 커야 합니다.
fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount > &Decimal::ZERO {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_amount");
        error.message = Some("Amount must be greater than zero".into());
        Err(error)
    }
}
