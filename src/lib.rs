//! 인증/결제 마이크로서비스 백엔드
//!
//! 하나의 개념적 코어를 공유하는 두 개의 독립 서비스입니다:
//!
//! - **인증 서비스** (`identity_service`): 가입, 이메일 인증, 로그인,
//!   비밀번호 재설정. 단기 일회용 코드의 발급/검증/폐기와 상태 없는
//!   JWT 세션 토큰을 담당합니다.
//! - **결제 서비스** (`payment_service`): 주문 금액 검증, 결제 토큰 복호화,
//!   멱등성 키 기반의 단일 청구 제출을 담당합니다.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 스키마 검증, 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직 (명시적 의존성 주입)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────────────┐
//! │ Repositories / Clients       │ ← 저장소, 볼트, 주문, 게이트웨이, 알림
//! └──────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use identity_payment_backend::repositories::InMemoryCredentialStore;
//! use identity_payment_backend::services::{CodeService, TokenService, UserService};
//!
//! let store = Arc::new(InMemoryCredentialStore::new());
//! let tokens = Arc::new(TokenService::new(secret, 60));
//! let users = UserService::new(store, codes, tokens, metrics, 12);
//! ```

pub mod clients;
pub mod config;
pub mod core;
pub mod domain;
pub mod handlers;
pub mod repositories;
pub mod routes;
pub mod services;
