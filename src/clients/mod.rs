//! # Outbound Collaborator Clients
//!
//! 두 서비스가 호출하는 외부 협력 서비스들의 좁은 인터페이스입니다.
//! 모든 클라이언트는 바운디드 타임아웃을 적용하며, 자동 재시도는 하지
//! 않습니다 (멱등성 키가 재시도를 안전하게 만드는 결제 제출만 예외적으로
//! 호출자 재시도가 허용됩니다).
//!
//! | 인터페이스 | 역할 |
//! |---|---|
//! | [`SecretVault`] | 서명 키 조회, 결제 토큰 복호화 |
//! | [`OrderClient`] | 권위 있는 주문 금액 조회 |
//! | [`PaymentGateway`] | 멱등성 키 기반 청구 제출 |
//! | [`Notifier`] | best-effort 메시지 전송 |
//! | [`MetricsSink`] | best-effort 이벤트 카운터 |

pub mod gateway;
pub mod metrics;
pub mod notifier;
pub mod orders;
pub mod vault;

pub use gateway::{ChargeResult, PaymentGateway, StripeGateway};
pub use metrics::MetricsSink;
pub use notifier::{HttpNotifier, Notifier};
pub use orders::{HttpOrderClient, Order, OrderClient};
pub use vault::{HttpSecretVault, SecretVault};
