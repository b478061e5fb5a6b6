//! Metrics Sink
//!
//! 구조화된 비즈니스 이벤트를 모니터링 수집기로 전송합니다.
//! 전송은 항상 best-effort입니다: 분리된 태스크에서 실행되고, 실패는
//! 디버그 로그로만 남으며, 요청 경로를 절대 차단하지 않습니다.

use chrono::Utc;
use std::time::Duration;

use crate::config::MetricsConfig;

/// Best-effort 메트릭 전송기
///
/// 엔드포인트가 설정되지 않으면 카운터는 로컬 로그로만 남습니다.
pub struct MetricsSink {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl MetricsSink {
    /// 환경 변수(`METRICS_ENDPOINT`)에서 설정을 읽어 생성합니다.
    pub fn from_env() -> Self {
        Self::new(MetricsConfig::endpoint())
    }

    /// 지정된 엔드포인트로 전송하는 sink를 생성합니다.
    pub fn new(endpoint: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self { endpoint, client }
    }

    /// 전송이 비활성화된 sink를 생성합니다 (테스트용).
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// 카운터 이벤트를 1 증가로 기록합니다.
    ///
    /// 엔드포인트가 설정된 경우 분리된 태스크에서 전송하며,
    /// 호출자는 결과를 기다리지 않습니다.
    pub fn emit(&self, name: &str) {
        log::info!("metric: {}", name);

        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };

        let client = self.client.clone();
        let name = name.to_string();
        let payload = serde_json::json!({
            "name": name,
            "value": 1,
            "timestamp": Utc::now().to_rfc3339(),
        });

        actix_web::rt::spawn(async move {
            if let Err(e) = client.post(&endpoint).json(&payload).send().await {
                // best-effort: 실패는 기록만 하고 무시
                log::debug!("메트릭 전송 실패 - {}: {}", name, e);
            }
        });
    }
}
