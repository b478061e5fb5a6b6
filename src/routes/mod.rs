//! # API 라우트 설정 모듈
//!
//! 서비스별 REST 엔드포인트를 그룹화하여 등록합니다.
//! 인증 서비스와 결제 서비스는 독립된 프로세스로 실행되므로
//! 각 바이너리가 자신의 설정 함수만 사용합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{App, web};
//!
//! let app = App::new()
//!     .app_data(web::Data::from(user_service))
//!     .configure(configure_identity_routes);
//! ```

use actix_web::web;
use serde_json::json;

use crate::handlers;

/// 인증 서비스의 라우트를 설정합니다
///
/// # Available Routes
///
/// - `POST /api/v1/auth/register` - 회원가입
/// - `POST /api/v1/auth/token` - 로그인 (form-encoded)
/// - `GET /api/v1/auth/me` - 현재 사용자 조회 (Bearer 토큰)
/// - `POST /api/v1/auth/verify-email` - 이메일 인증
/// - `POST /api/v1/auth/resend-verification` - 인증 코드 재전송
/// - `POST /api/v1/auth/forgot-password` - 재설정 코드 요청
/// - `POST /api/v1/auth/reset-password` - 비밀번호 재설정
/// - `GET /health` - 헬스체크
pub fn configure_identity_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(identity_health_check);

    cfg.service(
        web::scope("/api/v1/auth")
            .service(handlers::identity::register)
            .service(handlers::identity::login)
            .service(handlers::identity::current_user)
            .service(handlers::identity::verify_email)
            .service(handlers::identity::resend_verification)
            .service(handlers::identity::forgot_password)
            .service(handlers::identity::reset_password),
    );
}

/// 결제 서비스의 라우트를 설정합니다
///
/// # Available Routes
///
/// - `POST /api/v1/payments` - 결제 요청
/// - `GET /health` - 헬스체크
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(payment_health_check);

    cfg.service(
        web::scope("/api/v1/payments").service(handlers::payments::create_payment),
    );
}

/// 인증 서비스 헬스체크 엔드포인트
#[actix_web::get("/health")]
async fn identity_health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "identity_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// 결제 서비스 헬스체크 엔드포인트
#[actix_web::get("/health")]
async fn payment_health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "payment_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
