//! 크리덴셜 코드 생명주기 서비스 모듈

pub mod code_service;

pub use code_service::CodeService;
