//! # Collaborator Client Configuration
//!
//! 두 서비스가 공통으로 사용하는 외부 협력 서비스(Secret Vault, 알림,
//! 메트릭 수집)의 연결 설정을 관리합니다.

use std::env;
use std::time::Duration;

/// Secret Vault 연동 설정
///
/// 서명 키와 결제 토큰 복호화 키는 모두 볼트가 보관합니다.
/// 서비스는 키 자료를 직접 저장하지 않습니다.
pub struct VaultConfig;

impl VaultConfig {
    /// 볼트 서비스의 기본 URL을 반환합니다.
    ///
    /// # Panics
    ///
    /// `VAULT_SERVICE_URL` 환경 변수가 설정되지 않은 경우 패닉이 발생합니다.
    pub fn base_url() -> String {
        env::var("VAULT_SERVICE_URL").expect("VAULT_SERVICE_URL must be set")
    }
}

/// 알림 서비스 연동 설정
pub struct NotifierConfig;

impl NotifierConfig {
    /// 알림 서비스의 전송 엔드포인트 URL을 반환합니다.
    ///
    /// # Panics
    ///
    /// `NOTIFICATION_SERVICE_URL` 환경 변수가 설정되지 않은 경우 패닉이 발생합니다.
    pub fn url() -> String {
        env::var("NOTIFICATION_SERVICE_URL").expect("NOTIFICATION_SERVICE_URL must be set")
    }

    /// 알림 전송 요청의 타임아웃을 반환합니다.
    ///
    /// 알림은 best-effort이므로 타임아웃이 요청 경로를 지연시키지 않습니다.
    ///
    /// # 기본값
    ///
    /// 5초
    pub fn timeout() -> Duration {
        let seconds = env::var("NOTIFICATION_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        Duration::from_secs(seconds)
    }
}

/// 메트릭 수집 설정
pub struct MetricsConfig;

impl MetricsConfig {
    /// 메트릭 수집 엔드포인트를 반환합니다.
    ///
    /// 설정되지 않은 경우 메트릭 전송은 비활성화됩니다 (로컬 로그만 남김).
    pub fn endpoint() -> Option<String> {
        env::var("METRICS_ENDPOINT").ok()
    }
}
