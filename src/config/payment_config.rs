//! # Payment Service Configuration
//!
//! 결제 서비스의 주문 검증, 게이트웨이, 프로바이더 설정을 관리하는 모듈입니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ```bash
//! export ORDER_SERVICE_URL="http://order-service/api/v1"
//! export STRIPE_API_BASE_URL="https://api.stripe.com"
//! export STRIPE_SECRET_NAME="stripe-secret-key"
//! export PAYMENT_BIND_ADDRESS="127.0.0.1:8081"
//! ```

use crate::core::errors::AppError;
use std::env;

/// 주문 서비스 연동 설정
///
/// 결제 요청의 금액을 검증하기 위해 호출하는 권위 있는 주문 서비스의
/// 엔드포인트를 관리합니다.
pub struct OrderServiceConfig;

impl OrderServiceConfig {
    /// 주문 서비스의 기본 URL을 반환합니다.
    ///
    /// # Panics
    ///
    /// `ORDER_SERVICE_URL` 환경 변수가 설정되지 않은 경우 패닉이 발생합니다.
    pub fn base_url() -> String {
        env::var("ORDER_SERVICE_URL").expect("ORDER_SERVICE_URL must be set")
    }
}

/// 결제 게이트웨이 설정
///
/// 게이트웨이 API 키 자체는 Secret Vault에서 가져오며,
/// 여기서는 볼트 키 이름과 API 엔드포인트만 관리합니다.
pub struct GatewayConfig;

impl GatewayConfig {
    /// Stripe 호환 게이트웨이의 API 기본 URL을 반환합니다.
    ///
    /// # 기본값
    ///
    /// `https://api.stripe.com`
    pub fn stripe_base_url() -> String {
        env::var("STRIPE_API_BASE_URL").unwrap_or_else(|_| "https://api.stripe.com".to_string())
    }

    /// Secret Vault에 저장된 게이트웨이 API 키의 이름을 반환합니다.
    ///
    /// # 기본값
    ///
    /// `stripe-secret-key`
    pub fn stripe_secret_name() -> String {
        env::var("STRIPE_SECRET_NAME").unwrap_or_else(|_| "stripe-secret-key".to_string())
    }
}

/// 결제 서비스 HTTP 서버 설정
pub struct PaymentServerConfig;

impl PaymentServerConfig {
    /// 서버 바인드 주소를 반환합니다.
    ///
    /// # 기본값
    ///
    /// `127.0.0.1:8081`
    pub fn bind_address() -> String {
        env::var("PAYMENT_BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8081".to_string())
    }
}

/// 지원되는 결제 프로바이더 열거형
///
/// 요청의 `provider` 필드를 파싱한 결과입니다. 파싱은 어떤 협력 서비스에도
/// 접근하기 전에 수행되며, 지원하지 않는 값은 즉시 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PaymentProvider {
    /// Stripe 카드 결제
    Stripe,
    /// PayPal (미구현 — 요청 시 501로 거부)
    Paypal,
}

impl PaymentProvider {
    /// 문자열에서 PaymentProvider를 생성합니다.
    ///
    /// # 인자
    ///
    /// * `s` - 프로바이더 이름 (대소문자 무관)
    ///
    /// # 반환값
    ///
    /// * `Ok(PaymentProvider)` - 유효한 프로바이더인 경우
    /// * `Err(AppError::UnsupportedProvider)` - 지원하지 않는 프로바이더
    ///
    /// # 예제
    ///
    /// ```rust,ignore
    /// let provider = PaymentProvider::from_str("stripe")?;
    /// assert_eq!(provider, PaymentProvider::Stripe);
    /// ```
    pub fn from_str(s: &str) -> Result<Self, AppError> {
        match s.to_lowercase().as_str() {
            "stripe" => Ok(PaymentProvider::Stripe),
            "paypal" => Ok(PaymentProvider::Paypal),
            _ => Err(AppError::UnsupportedProvider(format!(
                "Unsupported payment provider: {}",
                s
            ))),
        }
    }

    /// PaymentProvider를 문자열로 변환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Stripe => "stripe",
            PaymentProvider::Paypal => "paypal",
        }
    }
}
