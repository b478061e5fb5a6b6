//! # Data Transfer Objects
//!
//! 엔드포인트별 요청/응답 스키마를 정의합니다. 요청 구조체는 모두
//! `validator` derive를 사용하여 필드 단위 검증을 수행하며,
//! 응답 구조체는 민감 정보(비밀번호 해시, 코드 값, 복호화된 결제 수단)를
//! 절대 포함하지 않습니다.

pub mod identity;
pub mod payment;

pub use identity::{
    ForgotPasswordRequest, LoginForm, MessageResponse, RegisterRequest, RegisterResponse,
    ResendVerificationRequest, ResetPasswordRequest, TokenResponse, UserResponse,
    VerifyEmailRequest,
};
pub use payment::{PaymentRequest, PaymentResponse};
