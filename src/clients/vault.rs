//! Secret Vault Client
//!
//! 서명 키 자료와 결제 토큰 복호화를 담당하는 볼트 서비스 연동입니다.
//! 키 자료는 서비스 프로세스에 저장되지 않으며, 복호화된 평문은
//! 요청 스코프를 벗어나지 않습니다.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use std::time::Duration;

use crate::core::errors::{AppError, AppResult};

/// Secret Vault 추상 인터페이스
#[async_trait]
pub trait SecretVault: Send + Sync {
    /// 이름으로 비밀 값(서명 키, API 키 등)을 조회합니다.
    async fn get_secret(&self, name: &str) -> AppResult<String>;

    /// 암호문을 복호화하여 평문 결제 수단 토큰을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::DecryptionError` - 볼트가 암호문을 거부함
    ///   (잘못된 키, 손상된 페이로드, 권한 없음)
    /// * `AppError::UpstreamUnavailable` - 볼트에 도달할 수 없음
    async fn decrypt(&self, ciphertext: &[u8]) -> AppResult<String>;
}

#[derive(Deserialize)]
struct SecretResponse {
    value: String,
}

#[derive(Deserialize)]
struct DecryptResponse {
    plaintext: String,
}

/// HTTP 기반 볼트 클라이언트
pub struct HttpSecretVault {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSecretVault {
    /// 바운디드 타임아웃(5초)을 가진 클라이언트를 생성합니다.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self { base_url, client }
    }
}

#[async_trait]
impl SecretVault for HttpSecretVault {
    async fn get_secret(&self, name: &str) -> AppResult<String> {
        let url = format!("{}/secrets/{}", self.base_url, name);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Secret vault unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::InternalError(format!(
                "Secret '{}' could not be retrieved (status {})",
                name,
                response.status()
            )));
        }

        let secret: SecretResponse = response
            .json()
            .await
            .map_err(|e| AppError::InternalError(format!("Malformed vault response: {}", e)))?;

        Ok(secret.value)
    }

    async fn decrypt(&self, ciphertext: &[u8]) -> AppResult<String> {
        let url = format!("{}/decrypt", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "ciphertext": BASE64.encode(ciphertext)
            }))
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Secret vault unreachable: {}", e)))?;

        if !response.status().is_success() {
            // 볼트의 상세 거부 사유는 로그로만 남기고 응답에는 노출하지 않음
            log::warn!("볼트 복호화 거부 - 상태: {}", response.status());
            return Err(AppError::DecryptionError(
                "Payment token could not be decrypted".to_string(),
            ));
        }

        let decrypted: DecryptResponse = response
            .json()
            .await
            .map_err(|e| AppError::InternalError(format!("Malformed vault response: {}", e)))?;

        Ok(decrypted.plaintext)
    }
}
