//! JWT 토큰 클레임 정의

use serde::{Deserialize, Serialize};

/// 세션 토큰의 클레임
///
/// 토큰은 상태를 갖지 않으며 유효성은 서명과 만료 시각만으로 결정됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 토큰 주체 (사용자 이메일)
    pub sub: String,
    /// 발급 시각 (Unix timestamp)
    pub iat: i64,
    /// 만료 시각 (Unix timestamp)
    pub exp: i64,
}
