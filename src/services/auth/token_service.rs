//! JWT 토큰 관리 서비스 구현
//!
//! HMAC-SHA256 서명 기반의 상태 없는 세션 토큰을 생성하고 검증합니다.
//! 서명 키는 기동 시 Secret Vault에서 가져와 주입되며, 토큰 유효성은
//! 서명과 만료 시각만으로 결정됩니다 (세션 영속화/폐기 없음).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::core::errors::{AppError, AppResult};
use crate::domain::token::TokenClaims;

/// JWT 토큰 관리 서비스
pub struct TokenService {
    secret: String,
    ttl_minutes: i64,
}

impl TokenService {
    /// 새 토큰 서비스를 생성합니다.
    ///
    /// # 인자
    ///
    /// * `secret` - 볼트에서 가져온 HMAC 서명 키
    /// * `ttl_minutes` - 토큰 유효 시간 (분)
    pub fn new(secret: String, ttl_minutes: i64) -> Self {
        Self {
            secret,
            ttl_minutes,
        }
    }

    /// 주체(사용자 이메일)에 대한 세션 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 토큰 인코딩 실패
    pub fn issue_token(&self, subject: &str) -> AppResult<String> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.ttl_minutes);

        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        encode(&header, &claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// 토큰을 검증하고 클레임을 추출합니다.
    ///
    /// 알고리즘은 HS256으로 고정하고 만료 여유 시간(leeway)은 0입니다.
    /// 서명 불일치, 알고리즘 불일치, 만료, 형식 오류 등 모든 실패는
    /// 구분 없이 하나의 인증 에러로 처리합니다 (fail closed).
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 유효하지 않거나 만료된 토큰
    pub fn validate_token(&self, token: &str) -> AppResult<TokenClaims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<TokenClaims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|_| AppError::AuthenticationError("Invalid or expired token".to_string()))
    }

    /// Bearer 토큰에서 실제 토큰 부분을 추출합니다.
    ///
    /// HTTP Authorization 헤더의 "Bearer {token}" 형식에서 토큰만 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 잘못된 헤더 형식
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> AppResult<&'a str> {
        if auth_header.starts_with("Bearer ") {
            Ok(&auth_header[7..])
        } else {
            Err(AppError::AuthenticationError(
                "Invalid authorization header format".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-signing-key".to_string(), 60)
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let tokens = service();
        let token = tokens.issue_token("alice@example.com").unwrap();

        let claims = tokens.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "alice@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = TokenService::new("test-signing-key".to_string(), -5);
        let token = tokens.issue_token("alice@example.com").unwrap();

        let result = tokens.validate_token(&token);
        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service().issue_token("alice@example.com").unwrap();
        let other = TokenService::new("different-key".to_string(), 60);

        let result = other.validate_token(&token);
        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let tokens = service();
        let token = tokens.issue_token("alice@example.com").unwrap();
        let tampered = format!("{}x", token);

        let result = tokens.validate_token(&tampered);
        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let result = service().validate_token("not-a-jwt");
        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_extract_bearer_token() {
        let tokens = service();

        assert_eq!(tokens.extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(tokens.extract_bearer_token("Basic abc").is_err());
        assert!(tokens.extract_bearer_token("abc.def.ghi").is_err());
    }
}
