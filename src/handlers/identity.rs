//! Identity HTTP Handlers
//!
//! 가입, 로그인, 이메일 인증, 비밀번호 재설정과 관련된 HTTP 엔드포인트를
//! 처리하는 핸들러 함수들입니다. 모든 요청 본문은 엔드포인트별 스키마로
//! 역직렬화되고 `validator`로 필드 검증을 거친 뒤 서비스 계층에 위임됩니다.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::identity::{
    ForgotPasswordRequest, LoginForm, RegisterRequest, ResendVerificationRequest,
    ResetPasswordRequest, VerifyEmailRequest,
};
use crate::services::users::UserService;

/// 회원가입 핸들러
///
/// # Endpoint
/// `POST /register`
#[post("/register")]
pub async fn register(
    users: web::Data<UserService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = users.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

/// 로그인 핸들러 (form-encoded)
///
/// OAuth2 password flow 관례에 따라 `username` 필드에 이메일을 받습니다.
///
/// # Endpoint
/// `POST /token`
#[post("/token")]
pub async fn login(
    users: web::Data<UserService>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    form.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = users.login(&form.username, &form.password).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 현재 인증된 사용자 정보 조회 핸들러
///
/// # Endpoint
/// `GET /me`
#[get("/me")]
pub async fn current_user(
    users: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Missing authorization header".to_string()))?;

    let response = users.current_user(auth_header).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 이메일 인증 핸들러
///
/// # Endpoint
/// `POST /verify-email`
#[post("/verify-email")]
pub async fn verify_email(
    users: web::Data<UserService>,
    payload: web::Json<VerifyEmailRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = users.verify_email(&payload.email, &payload.code).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 인증 코드 재전송 핸들러
///
/// # Endpoint
/// `POST /resend-verification`
#[post("/resend-verification")]
pub async fn resend_verification(
    users: web::Data<UserService>,
    payload: web::Json<ResendVerificationRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = users.resend_verification(&payload.email).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 비밀번호 재설정 코드 요청 핸들러
///
/// 계정 존재 여부와 무관하게 항상 같은 응답을 반환합니다.
///
/// # Endpoint
/// `POST /forgot-password`
#[post("/forgot-password")]
pub async fn forgot_password(
    users: web::Data<UserService>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = users.forgot_password(&payload.email).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 비밀번호 재설정 실행 핸들러
///
/// # Endpoint
/// `POST /reset-password`
#[post("/reset-password")]
pub async fn reset_password(
    users: web::Data<UserService>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = users
        .reset_password(&payload.email, &payload.code, &payload.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
