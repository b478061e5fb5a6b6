//! # Application Error Handling System
//!
//! 인증/결제 서비스를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`로 에러 타입을 정의하고 `actix_web::ResponseError`를 구현하여
//! 모든 에러가 일관된 JSON 응답으로 자동 변환됩니다.
//!
//! ## 설계 원칙
//!
//! - **도메인별 분류**: 검증, 인증, 코드 소비, 주문 검증, 게이트웨이 등
//!   각 실패 모드를 별도 변형으로 표현합니다
//! - **Fail Closed**: 모호한 상황은 항상 거부로 처리합니다
//! - **정보 최소화**: 응답 본문에 내부 비밀 정보나 업스트림 스택 트레이스를
//!   절대 노출하지 않습니다
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status |
//! |----------|-------------|
//! | `ValidationError` | 400 Bad Request |
//! | `ConflictError` | 400 Bad Request |
//! | `InvalidCode` | 400 Bad Request |
//! | `AuthenticationError` | 401 Unauthorized |
//! | `NotFound` | 404 Not Found |
//! | `OrderNotFound` / `AmountMismatch` | 400 Bad Request |
//! | `DecryptionError` / `GatewayError` | 400 Bad Request |
//! | `UnsupportedProvider` | 501 Not Implemented |
//! | `UpstreamUnavailable` | 502 Bad Gateway |
//! | `DatabaseError` / `InternalError` | 500 Internal Server Error |

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 인증 서비스와 결제 서비스에서 발생할 수 있는 모든 에러를 포괄합니다.
/// 핸들러가 `Result<HttpResponse, AppError>`를 반환하면 Actix-Web이
/// `error_response()`를 통해 적절한 상태 코드와 JSON 본문을 생성합니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 입력값 검증 실패 (필수 필드 누락, 형식 오류, 비밀번호 강도 미달 등)
    #[error("{0}")]
    ValidationError(String),

    /// 리소스 중복 (이메일/사용자명 중복 가입 시도)
    ///
    /// 엔드포인트 계약상 409가 아닌 400으로 응답합니다.
    #[error("{0}")]
    ConflictError(String),

    /// 크리덴셜 코드 소비 실패
    ///
    /// 코드 불일치, 만료, 이미 소비됨, 대체됨을 구분하지 않고
    /// 동일한 메시지로 응답합니다 (정보 노출 방지).
    #[error("{0}")]
    InvalidCode(String),

    /// 인증 실패 (잘못된 로그인 정보, 유효하지 않은 토큰, 미인증 이메일)
    #[error("{0}")]
    AuthenticationError(String),

    /// 요청된 리소스가 존재하지 않음
    #[error("{0}")]
    NotFound(String),

    /// 주문 서비스가 주문을 찾지 못했거나 거부함
    #[error("{0}")]
    OrderNotFound(String),

    /// 요청 금액이 주문 서비스의 기록과 일치하지 않음
    #[error("{0}")]
    AmountMismatch(String),

    /// 결제 토큰 복호화 실패 (볼트 거부, 손상된 암호문)
    #[error("{0}")]
    DecryptionError(String),

    /// 지원하지 않는 결제 프로바이더
    #[error("{0}")]
    UnsupportedProvider(String),

    /// 결제 게이트웨이 오류
    ///
    /// 프로바이더의 상태/코드만 전달하며 상세 응답 본문은 로그로만 남깁니다.
    #[error("{0}")]
    GatewayError(String),

    /// 협력 서비스(주문/볼트/알림)에 도달할 수 없음
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// 데이터베이스 연산 오류
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 예상하지 못한 시스템 오류
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl actix_web::ResponseError for AppError {
    /// 각 `AppError` 변형을 HTTP 상태 코드와 표준 JSON 응답으로 변환합니다.
    ///
    /// 모든 에러 응답은 `{"error": "..."}` 형식을 따릅니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::http::StatusCode;

        let status = match self {
            AppError::ValidationError(_)
            | AppError::ConflictError(_)
            | AppError::InvalidCode(_)
            | AppError::OrderNotFound(_)
            | AppError::AmountMismatch(_)
            | AppError::DecryptionError(_)
            | AppError::GatewayError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnsupportedProvider(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("서버 에러 응답: {}", self);
        }

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "error": self.to_string()
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
///
/// # 예제
///
/// ```rust,ignore
/// use crate::core::errors::ErrorContext;
///
/// let secret = std::env::var("JWT_SECRET").context("JWT 시크릿 로드 실패")?;
/// ```
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
