//! Payment Gateway Client
//!
//! 결제 게이트웨이에 청구를 제출합니다. 모든 청구 요청은 호출자가 전달한
//! 결정적 멱등성 키를 `Idempotency-Key` 헤더로 포함하므로, 동일 주문의
//! 네트워크 재시도가 이중 청구를 만들지 않습니다.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::core::errors::{AppError, AppResult};

/// 게이트웨이 청구 결과
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeResult {
    /// 게이트웨이가 부여한 청구 식별자
    pub id: String,
    /// 청구 상태 (예: "succeeded")
    pub status: String,
}

/// 결제 게이트웨이 추상 인터페이스
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 단일 청구를 제출합니다.
    ///
    /// # 인자
    ///
    /// * `amount_minor` - 최소 화폐 단위 금액 (예: 센트)
    /// * `currency` - ISO 4217 통화 코드
    /// * `instrument` - 복호화된 결제 수단 토큰
    /// * `idempotency_key` - 주문 id에서 유도된 결정적 키
    /// * `description` - 청구 설명
    ///
    /// # Errors
    ///
    /// * `AppError::GatewayError` - 게이트웨이가 청구를 거부함
    /// * `AppError::UpstreamUnavailable` - 게이트웨이에 도달할 수 없음
    async fn create_charge(
        &self,
        amount_minor: i64,
        currency: &str,
        instrument: &str,
        idempotency_key: &str,
        description: &str,
    ) -> AppResult<ChargeResult>;
}

/// Stripe 호환 게이트웨이 클라이언트
pub struct StripeGateway {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl StripeGateway {
    /// 바운디드 타임아웃(5초)을 가진 클라이언트를 생성합니다.
    ///
    /// `api_key`는 Secret Vault에서 가져온 값이어야 합니다.
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self {
            base_url,
            api_key,
            client,
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_charge(
        &self,
        amount_minor: i64,
        currency: &str,
        instrument: &str,
        idempotency_key: &str,
        description: &str,
    ) -> AppResult<ChargeResult> {
        let url = format!("{}/v1/charges", self.base_url);

        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_lowercase()),
            ("source", instrument.to_string()),
            ("description", description.to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Idempotency-Key", idempotency_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("Payment gateway unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            // 상세 응답 본문은 로그로만 — 호출자에게는 프로바이더 중립 메시지
            let body = response.text().await.unwrap_or_default();
            log::warn!("게이트웨이 청구 거부 - 상태: {}, 본문: {}", status, body);
            return Err(AppError::GatewayError(format!(
                "Payment provider rejected the charge (status {})",
                status.as_u16()
            )));
        }

        response
            .json::<ChargeResult>()
            .await
            .map_err(|e| AppError::InternalError(format!("Malformed gateway response: {}", e)))
    }
}
