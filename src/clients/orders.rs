//! Order Service Client
//!
//! 결제 금액 검증을 위해 권위 있는 주문 서비스를 조회합니다.
//! 모든 비정상 응답은 거부로 처리합니다 (fail closed).

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use crate::core::errors::{AppError, AppResult};

/// 주문 서비스가 기록한 주문 정보
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// 주문의 권위 있는 금액
    pub amount: Decimal,
}

/// 주문 서비스 추상 인터페이스
#[async_trait]
pub trait OrderClient: Send + Sync {
    /// 주문을 조회합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::OrderNotFound` - 주문 서비스가 비정상 상태 코드로 응답
    /// * `AppError::UpstreamUnavailable` - 주문 서비스에 도달할 수 없음
    async fn fetch_order(&self, order_id: &str) -> AppResult<Order>;
}

/// HTTP 기반 주문 서비스 클라이언트
pub struct HttpOrderClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpOrderClient {
    /// 바운디드 타임아웃(5초)을 가진 클라이언트를 생성합니다.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self { base_url, client }
    }
}

#[async_trait]
impl OrderClient for HttpOrderClient {
    async fn fetch_order(&self, order_id: &str) -> AppResult<Order> {
        let url = format!("{}/orders/{}", self.base_url, order_id);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Order service unreachable: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::OrderNotFound(format!("Order {} not found", order_id)));
        }

        response
            .json::<Order>()
            .await
            .map_err(|e| AppError::InternalError(format!("Malformed order response: {}", e)))
    }
}
