//! # Domain Module
//!
//! 도메인 계층: 엔티티, 크리덴셜 코드 상태 머신, 토큰 클레임, DTO.
//!
//! ```text
//! domain/
//! ├── entities/  ← User, CodeSlot 상태 머신
//! ├── dto/       ← 엔드포인트별 요청/응답 스키마
//! └── token      ← JWT 클레임
//! ```

pub mod dto;
pub mod entities;
pub mod token;

pub use entities::{CodePurpose, CodeSlot, CredentialCode, User};
pub use token::TokenClaims;
