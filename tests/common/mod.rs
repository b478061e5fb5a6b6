//! 통합 테스트 공용 헬퍼
//!
//! 인메모리 저장소와 협력 서비스 가짜 구현으로 서비스를 구성합니다.
//! 가짜들은 받은 호출을 기록하므로 "게이트웨이에 접근하지 않았다" 같은
//! 비상호작용 속성을 단언할 수 있습니다.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use rust_decimal::Decimal;

use identity_payment_backend::clients::{
    ChargeResult, MetricsSink, Notifier, Order, OrderClient, PaymentGateway, SecretVault,
};
use identity_payment_backend::core::errors::{AppError, AppResult};
use identity_payment_backend::domain::entities::CodePurpose;
use identity_payment_backend::repositories::{CredentialStore, InMemoryCredentialStore};
use identity_payment_backend::services::{CodeService, PaymentService, TokenService, UserService};

pub const TEST_SIGNING_KEY: &str = "test-signing-key";

/// 전송된 알림 한 건
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// 알림을 기록만 하는 가짜 Notifier
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentMessage>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// 항상 실패하는 Notifier — 전달 실패가 요청을 실패시키지 않음을 검증
#[derive(Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> AppResult<()> {
        Err(AppError::UpstreamUnavailable(
            "Notification service failed (status 503)".to_string(),
        ))
    }
}

/// 고정된 주문 목록을 제공하는 가짜 주문 서비스
#[derive(Default)]
pub struct FakeOrderClient {
    orders: HashMap<String, Decimal>,
    pub calls: AtomicUsize,
}

impl FakeOrderClient {
    pub fn with_order(order_id: &str, amount: Decimal) -> Self {
        let mut orders = HashMap::new();
        orders.insert(order_id.to_string(), amount);
        Self {
            orders,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderClient for FakeOrderClient {
    async fn fetch_order(&self, order_id: &str) -> AppResult<Order> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.orders.get(order_id) {
            Some(amount) => Ok(Order { amount: *amount }),
            None => Err(AppError::OrderNotFound(format!("Order {} not found", order_id))),
        }
    }
}

/// 복호화 호출을 기록하는 가짜 볼트
#[derive(Default)]
pub struct FakeVault {
    pub reject: bool,
    pub decrypt_calls: AtomicUsize,
}

impl FakeVault {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            decrypt_calls: AtomicUsize::new(0),
        }
    }

    pub fn decrypt_call_count(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretVault for FakeVault {
    async fn get_secret(&self, _name: &str) -> AppResult<String> {
        Ok(TEST_SIGNING_KEY.to_string())
    }

    async fn decrypt(&self, ciphertext: &[u8]) -> AppResult<String> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(AppError::DecryptionError(
                "Payment token could not be decrypted".to_string(),
            ));
        }
        Ok(format!("tok_{}", ciphertext.len()))
    }
}

/// 기록된 청구 한 건
#[derive(Debug, Clone)]
pub struct ChargeCall {
    pub charge_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub instrument: String,
    pub idempotency_key: String,
    pub description: String,
}

/// 멱등성 키로 중복 제거하는 가짜 게이트웨이
///
/// 실제 게이트웨이의 Idempotency-Key 계약을 흉내냅니다: 같은 키로 들어온
/// 청구는 새 청구를 만들지 않고 기존 청구 id를 반환합니다.
#[derive(Default)]
pub struct RecordingGateway {
    pub charges: Mutex<Vec<ChargeCall>>,
}

impl RecordingGateway {
    pub fn call_count(&self) -> usize {
        self.charges.lock().unwrap().len()
    }

    /// 서로 다른 청구 id의 개수 (멱등성 검증용)
    pub fn distinct_charge_ids(&self) -> usize {
        let charges = self.charges.lock().unwrap();
        let mut ids: Vec<&String> = charges.iter().map(|c| &c.charge_id).collect();
        ids.sort();
        ids.dedup();
        ids.len()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_charge(
        &self,
        amount_minor: i64,
        currency: &str,
        instrument: &str,
        idempotency_key: &str,
        description: &str,
    ) -> AppResult<ChargeResult> {
        let mut charges = self.charges.lock().unwrap();

        let charge_id = charges
            .iter()
            .find(|c| c.idempotency_key == idempotency_key)
            .map(|c| c.charge_id.clone())
            .unwrap_or_else(|| format!("ch_{}", charges.len() + 1));

        charges.push(ChargeCall {
            charge_id: charge_id.clone(),
            amount_minor,
            currency: currency.to_string(),
            instrument: instrument.to_string(),
            idempotency_key: idempotency_key.to_string(),
            description: description.to_string(),
        });

        Ok(ChargeResult {
            id: charge_id,
            status: "succeeded".to_string(),
        })
    }
}

/// 테스트용 사용자 서비스를 구성합니다 (빠른 bcrypt cost, 15분 TTL).
pub fn test_user_service(
    store: Arc<InMemoryCredentialStore>,
    notifier: Arc<dyn Notifier>,
) -> Arc<UserService> {
    test_user_service_with_ttl(store, notifier, Duration::minutes(15))
}

/// 코드 TTL을 지정하여 테스트용 사용자 서비스를 구성합니다.
pub fn test_user_service_with_ttl(
    store: Arc<InMemoryCredentialStore>,
    notifier: Arc<dyn Notifier>,
    code_ttl: Duration,
) -> Arc<UserService> {
    let store_dyn: Arc<dyn CredentialStore> = store;
    let tokens = Arc::new(TokenService::new(TEST_SIGNING_KEY.to_string(), 60));
    let codes = CodeService::new(store_dyn.clone(), notifier, code_ttl);

    Arc::new(UserService::new(
        store_dyn,
        codes,
        tokens,
        Arc::new(MetricsSink::disabled()),
        4,
    ))
}

/// 테스트용 결제 서비스를 구성합니다.
pub fn test_payment_service(
    orders: Arc<FakeOrderClient>,
    vault: Arc<FakeVault>,
    gateway: Arc<RecordingGateway>,
    notifier: Arc<dyn Notifier>,
) -> Arc<PaymentService> {
    Arc::new(PaymentService::new(
        orders,
        vault,
        gateway,
        notifier,
        Arc::new(MetricsSink::disabled()),
    ))
}

/// 저장소에서 현재 활성 코드 값을 꺼냅니다 (테스트 전용 백도어).
pub async fn stored_code(
    store: &InMemoryCredentialStore,
    email: &str,
    purpose: CodePurpose,
) -> Option<String> {
    let user = store.find_by_email(email).await.unwrap()?;
    let slot = match purpose {
        CodePurpose::EmailVerification => user.verification_code,
        CodePurpose::PasswordReset => user.reset_code,
    };
    slot.active_code().map(|code| code.value.clone())
}
