//! # 결제 제출 서비스 구현
//!
//! 단일 청구의 전체 흐름을 조율합니다: 프로바이더 판별 → 주문 금액 검증 →
//! 결제 수단 복호화 → 멱등성 키 기반 청구 제출 → 비동기 성공 알림.
//!
//! ## 순서 계약
//!
//! 주문 검증이 성공하기 전에는 볼트나 게이트웨이에 절대 접근하지 않으며,
//! 지원하지 않는 프로바이더는 어떤 협력 서비스에도 접근하기 전에
//! 거부됩니다 (fail fast).
//!
//! ## 멱등성
//!
//! 멱등성 키는 주문 id만으로 유도되는 SHA-256 해시입니다. 타임스탬프가
//! 포함되지 않으므로 동일 주문의 재시도는 게이트웨이에서 동일한 청구로
//! 중복 제거됩니다. 서비스 자체는 상태를 갖지 않습니다.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sha2::{Digest, Sha256};

use crate::clients::{ChargeResult, MetricsSink, Notifier, OrderClient, PaymentGateway, SecretVault};
use crate::config::PaymentProvider;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::payment::{PaymentRequest, PaymentResponse};

/// 결제 제출 비즈니스 로직 서비스
///
/// 모든 협력 서비스 핸들은 생성 시 명시적으로 주입됩니다.
pub struct PaymentService {
    orders: Arc<dyn OrderClient>,
    vault: Arc<dyn SecretVault>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<MetricsSink>,
}

impl PaymentService {
    /// 새 결제 서비스를 생성합니다.
    pub fn new(
        orders: Arc<dyn OrderClient>,
        vault: Arc<dyn SecretVault>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<MetricsSink>,
    ) -> Self {
        Self {
            orders,
            vault,
            gateway,
            notifier,
            metrics,
        }
    }

    /// 결제 요청을 처리합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::UnsupportedProvider` - 지원하지 않는 프로바이더 (즉시 거부)
    /// * `AppError::OrderNotFound` / `AppError::AmountMismatch` - 주문 검증 실패
    /// * `AppError::DecryptionError` - 결제 수단 복호화 실패
    /// * `AppError::GatewayError` - 게이트웨이 청구 거부
    /// * `AppError::UpstreamUnavailable` - 협력 서비스 도달 불가
    pub async fn process(&self, request: PaymentRequest) -> AppResult<PaymentResponse> {
        match self.process_inner(request).await {
            Ok(response) => {
                self.metrics.emit("payment.succeeded");
                Ok(response)
            }
            Err(e) => {
                self.metrics.emit("payment.failed");
                Err(e)
            }
        }
    }

    async fn process_inner(&self, request: PaymentRequest) -> AppResult<PaymentResponse> {
        // 1. 프로바이더 판별 — 협력 서비스 접근 전에 수행
        let provider = PaymentProvider::from_str(&request.provider)?;
        match provider {
            PaymentProvider::Stripe => {}
            PaymentProvider::Paypal => {
                return Err(AppError::UnsupportedProvider(
                    "PayPal support is not yet implemented".to_string(),
                ));
            }
        }

        // 2. 권위 있는 주문 금액 검증
        self.validate_order(&request.order_id, request.amount).await?;

        // 3. 결제 수단 복호화 — 주문 검증 이후에만
        let instrument = self.decrypt_instrument(&request.encrypted_token).await?;

        // 4. 멱등성 키와 함께 청구 제출
        let charge = self
            .submit_charge(&request.order_id, request.amount, &request.currency, &instrument)
            .await?;

        log::info!(
            "결제 성공 - 주문: {}, 청구: {}, 상태: {}",
            request.order_id,
            charge.id,
            charge.status
        );

        // 5. 비동기 성공 알림 — 실패해도 완료된 청구는 되돌리지 않음
        self.notify_success(&request.user_email, request.amount);

        Ok(PaymentResponse {
            status: "success".to_string(),
            provider: provider.as_str().to_string(),
            payment_id: charge.id,
        })
    }

    /// 요청 금액을 주문 서비스의 기록과 정확히 비교합니다.
    ///
    /// 반올림/허용 오차 없이 Decimal 동등 비교입니다.
    async fn validate_order(&self, order_id: &str, claimed_amount: Decimal) -> AppResult<()> {
        let order = self.orders.fetch_order(order_id).await?;

        if order.amount != claimed_amount {
            log::warn!(
                "금액 불일치 - 주문: {}, 기록: {}, 요청: {}",
                order_id,
                order.amount,
                claimed_amount
            );
            return Err(AppError::AmountMismatch("Amount mismatch with order".to_string()));
        }

        Ok(())
    }

    /// 암호화된 결제 수단 토큰을 복호화합니다.
    ///
    /// base64 디코딩은 로컬에서 수행되며, 실패 시 볼트에 접근하지 않습니다.
    /// 복호화된 평문은 반환값 외 어디에도 저장/로깅되지 않습니다.
    async fn decrypt_instrument(&self, encrypted_token: &str) -> AppResult<String> {
        let ciphertext = BASE64.decode(encrypted_token).map_err(|_| {
            AppError::DecryptionError("Payment token could not be decrypted".to_string())
        })?;

        self.vault.decrypt(&ciphertext).await
    }

    /// 최소 화폐 단위로 변환하여 청구를 제출합니다.
    async fn submit_charge(
        &self,
        order_id: &str,
        amount: Decimal,
        currency: &str,
        instrument: &str,
    ) -> AppResult<ChargeResult> {
        let amount_minor = to_minor_units(amount)?;
        let key = idempotency_key(order_id);

        self.gateway
            .create_charge(
                amount_minor,
                currency,
                instrument,
                &key,
                &format!("Payment for order {}", order_id),
            )
            .await
    }

    /// 결제 성공 알림을 분리된 태스크에서 전송합니다.
    fn notify_success(&self, email: &str, amount: Decimal) {
        let notifier = self.notifier.clone();
        let email = email.to_string();
        let body = format!("Your payment of ${} was successful.", amount.round_dp(2));

        actix_web::rt::spawn(async move {
            if let Err(e) = notifier.send(&email, "Payment Confirmation", &body).await {
                log::warn!("결제 알림 전송 실패 - 수신자: {}, 에러: {}", email, e);
            }
        });
    }
}

/// 주문 id에서 결정적 멱등성 키를 유도합니다.
///
/// 타임스탬프나 난수가 포함되지 않으므로 같은 주문의 재제출은 항상
/// 같은 키를 생성합니다.
pub fn idempotency_key(order_id: &str) -> String {
    let digest = Sha256::digest(format!("order:{}", order_id).as_bytes());
    format!("{:x}", digest)
}

/// 주 단위 금액을 최소 화폐 단위(센트)로 변환합니다.
///
/// # Errors
///
/// * `AppError::ValidationError` - 센트 미만의 정밀도를 가진 금액
fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    let minor = amount * Decimal::from(100);

    if !minor.fract().is_zero() {
        return Err(AppError::ValidationError(
            "Amount has more precision than the currency minor unit".to_string(),
        ));
    }

    minor
        .to_i64()
        .ok_or_else(|| AppError::ValidationError("Amount out of range".to_string()))
}
