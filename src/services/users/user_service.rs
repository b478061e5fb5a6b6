//! # 사용자 관리 서비스 구현
//!
//! 사용자 계정의 전체 생명주기를 관리하는 핵심 비즈니스 로직입니다.
//! 가입, 로그인, 이메일 인증, 인증 코드 재전송, 비밀번호 재설정 흐름을
//! 조율하며, 모든 외부 의존(저장소, 코드 서비스, 토큰 서비스, 메트릭)은
//! 생성 시 명시적으로 주입됩니다.
//!
//! ## 보안 설계 원칙
//!
//! - **bcrypt 해싱**: 환경별 cost 설정, 솔트 자동 생성
//! - **균일한 실패 응답**: 로그인 실패는 "사용자 없음"과 "비밀번호 불일치"를
//!   구분하지 않고, 비밀번호 재설정 요청은 계정 존재 여부를 노출하지 않음
//! - **일회용 코드**: 검증 성공 즉시 소비, 재사용/만료/대체된 코드는
//!   모두 동일한 메시지로 거부
//! - **민감 정보 제거**: 응답 DTO에 비밀번호 해시와 코드 값 미포함

use std::sync::Arc;

use bcrypt::{hash, verify};

use crate::clients::MetricsSink;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::identity::{
    MessageResponse, RegisterRequest, RegisterResponse, TokenResponse, UserResponse,
};
use crate::domain::entities::{CodePurpose, User};
use crate::repositories::CredentialStore;
use crate::services::auth::TokenService;
use crate::services::codes::CodeService;

/// 사용자 관리 비즈니스 로직 서비스
pub struct UserService {
    store: Arc<dyn CredentialStore>,
    codes: CodeService,
    tokens: Arc<TokenService>,
    metrics: Arc<MetricsSink>,
    bcrypt_cost: u32,
}

impl UserService {
    /// 새 사용자 서비스를 생성합니다.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        codes: CodeService,
        tokens: Arc<TokenService>,
        metrics: Arc<MetricsSink>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            store,
            codes,
            tokens,
            metrics,
            bcrypt_cost,
        }
    }

    /// 새 사용자 계정 생성
    ///
    /// 비밀번호를 해싱하여 미인증 상태의 사용자를 저장하고, 이메일 인증
    /// 코드를 정확히 한 번 발급한 뒤 비동기로 전달합니다. 알림 전달 실패는
    /// 가입을 실패시키지 않습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이메일 또는 사용자명 중복
    /// * `AppError::InternalError` - 비밀번호 해싱 실패
    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        let password_hash = hash(&request.password, self.bcrypt_cost)
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        let user = User::new(request.email, request.username, password_hash);
        let created = self.store.insert_user(user).await?;

        let code = self
            .codes
            .issue(&created.email, CodePurpose::EmailVerification)
            .await?;
        self.codes.deliver(
            &created.email,
            "Verify Your Email",
            format!("Your code is: {}", code),
        );

        log::info!("사용자 가입됨: {}", created.email);
        self.metrics.emit("user.registered");

        Ok(RegisterResponse {
            user: UserResponse::from(created),
            message: "User registered. Check your email for verification code.".to_string(),
        })
    }

    /// 이메일/비밀번호 로그인
    ///
    /// 성공 시 상태 없는 세션 토큰을 발급합니다. 존재하지 않는 계정과
    /// 잘못된 비밀번호는 동일한 응답으로 거부되며, 이메일 미인증 계정은
    /// 로그인할 수 없습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 잘못된 로그인 정보 또는 미인증 이메일
    pub async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("Invalid email or password".to_string()))?;

        let password_matches = verify(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        if !password_matches {
            return Err(AppError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        if !user.is_email_verified {
            return Err(AppError::AuthenticationError("Email not verified".to_string()));
        }

        let access_token = self.tokens.issue_token(&user.email)?;

        log::info!("로그인 성공: {}", user.email);
        self.metrics.emit("user.logged_in");

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Bearer 토큰으로 현재 사용자 조회
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 토큰 무효/만료 또는 주체 없음
    pub async fn current_user(&self, auth_header: &str) -> AppResult<UserResponse> {
        let token = self.tokens.extract_bearer_token(auth_header)?;
        let claims = self.tokens.validate_token(token)?;

        let user = self
            .store
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("User not found".to_string()))?;

        Ok(UserResponse::from(user))
    }

    /// 이메일 인증 코드 검증
    ///
    /// 성공 시 코드를 소비하고 사용자를 인증 상태로 전이한 뒤 슬롯을
    /// 비웁니다. 같은 코드로 두 번째 호출은 반드시 실패합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidCode` - 모든 검증 실패 (사유 구분 없음)
    pub async fn verify_email(&self, email: &str, code: &str) -> AppResult<MessageResponse> {
        let consumed = self
            .codes
            .verify(email, CodePurpose::EmailVerification, code)
            .await?;
        if !consumed {
            return Err(AppError::InvalidCode("Invalid verification code".to_string()));
        }

        self.store.mark_email_verified(email).await?;
        self.codes.retire(email, CodePurpose::EmailVerification).await?;

        log::info!("이메일 인증 완료: {}", email);
        self.metrics.emit("user.verified");

        Ok(MessageResponse::new("Email verified successfully"))
    }

    /// 인증 코드 재전송
    ///
    /// 새 코드를 발급하여 기존 활성 코드를 대체합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 해당 이메일의 사용자가 없음
    /// * `AppError::ValidationError` - 이미 인증된 사용자
    pub async fn resend_verification(&self, email: &str) -> AppResult<MessageResponse> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_email_verified {
            return Err(AppError::ValidationError("User already verified".to_string()));
        }

        let code = self
            .codes
            .issue(email, CodePurpose::EmailVerification)
            .await?;
        self.codes.deliver(
            email,
            "Resend Verification",
            format!("Your new code is: {}", code),
        );

        log::info!("인증 코드 재전송: {}", email);
        self.metrics.emit("verification.resent");

        Ok(MessageResponse::new("Verification code resent"))
    }

    /// 비밀번호 재설정 코드 요청
    ///
    /// 계정 존재 여부와 무관하게 항상 동일한 응답을 반환합니다
    /// (사용자 열거 방지). 계정이 존재하면 재설정 코드를 발급하고
    /// 비동기로 전달합니다.
    pub async fn forgot_password(&self, email: &str) -> AppResult<MessageResponse> {
        match self.store.find_by_email(email).await? {
            Some(user) => {
                let code = self
                    .codes
                    .issue(&user.email, CodePurpose::PasswordReset)
                    .await?;
                self.codes
                    .deliver(&user.email, "Reset Password", format!("Reset code: {}", code));

                log::info!("재설정 코드 발급: {}", user.email);
                self.metrics.emit("password.reset.requested");
            }
            None => {
                // 응답은 계정이 존재하는 경우와 동일해야 함
                log::info!("존재하지 않는 계정의 재설정 요청");
            }
        }

        Ok(MessageResponse::new(
            "If the account exists, a reset code has been sent",
        ))
    }

    /// 비밀번호 재설정 실행
    ///
    /// 재설정 코드를 소비하고 새 비밀번호 해시로 교체합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidCode` - 모든 코드 검증 실패 (사유 구분 없음)
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> AppResult<MessageResponse> {
        let consumed = self
            .codes
            .verify(email, CodePurpose::PasswordReset, code)
            .await?;
        if !consumed {
            return Err(AppError::InvalidCode("Invalid reset code".to_string()));
        }

        let password_hash = hash(new_password, self.bcrypt_cost)
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        self.store.update_password_hash(email, &password_hash).await?;
        self.codes.retire(email, CodePurpose::PasswordReset).await?;

        log::info!("비밀번호 변경됨: {}", email);
        self.metrics.emit("password.reset.success");

        Ok(MessageResponse::new("Password updated successfully"))
    }
}
