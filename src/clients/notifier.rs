//! Notification Service Client
//!
//! 단방향 메시지 전송 인터페이스입니다. 전송 실패는 호출자의 요청 경로를
//! 실패시키지 않습니다 — 서비스 계층이 분리된 태스크에서 호출하고
//! 에러를 로그로만 남깁니다.

use async_trait::async_trait;
use std::time::Duration;

use crate::core::errors::{AppError, AppResult};

/// 알림 전송 추상 인터페이스
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 수신자에게 메시지를 전송합니다.
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// HTTP 기반 알림 서비스 클라이언트
pub struct HttpNotifier {
    url: String,
    client: reqwest::Client,
}

impl HttpNotifier {
    /// 바운디드 타임아웃을 가진 클라이언트를 생성합니다.
    pub fn new(url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self { url, client }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({
                "to": to,
                "subject": subject,
                "message": body,
            }))
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("Notification service unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "Notification service failed (status {})",
                response.status()
            )));
        }

        Ok(())
    }
}
