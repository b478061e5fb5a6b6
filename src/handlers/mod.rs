//! # HTTP Handlers Module
//!
//! 요청/응답 처리 계층입니다. 핸들러는 스키마 검증 후 서비스 계층에
//! 위임하며, 에러는 `AppError`의 `ResponseError` 구현이 자동으로
//! HTTP 응답으로 변환합니다.

pub mod identity;
pub mod payments;
