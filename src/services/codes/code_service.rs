//! Credential Code Lifecycle Service
//!
//! (사용자, 목적) 쌍에 바인딩된 단기 일회용 코드의 발급, 검증, 폐기를
//! 담당합니다. 검증의 원자성은 저장소의 compare-and-set 계약에 위임하고,
//! 이 서비스는 코드 생성과 만료 정책, 알림 전달을 조율합니다.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;

use crate::clients::Notifier;
use crate::core::errors::AppResult;
use crate::domain::entities::{CodePurpose, CredentialCode};
use crate::repositories::CredentialStore;

/// 코드 생명주기 서비스
///
/// 명시적으로 주입된 저장소/알림 핸들로 구성됩니다.
pub struct CodeService {
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    ttl: Duration,
}

impl CodeService {
    /// 새 코드 서비스를 생성합니다.
    ///
    /// # 인자
    ///
    /// * `store` - 크리덴셜 저장소
    /// * `notifier` - 코드 전달용 알림 클라이언트
    /// * `ttl` - 발급되는 코드의 유효 시간
    pub fn new(store: Arc<dyn CredentialStore>, notifier: Arc<dyn Notifier>, ttl: Duration) -> Self {
        Self {
            store,
            notifier,
            ttl,
        }
    }

    /// 새 코드를 발급합니다.
    ///
    /// 동일 (사용자, 목적)의 기존 활성 코드는 대체되어 즉시 무효화됩니다.
    /// 만료 시각은 `now + ttl`이며 반환값은 사용자에게 전달할 코드 값입니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 해당 이메일의 사용자가 없음
    pub async fn issue(&self, email: &str, purpose: CodePurpose) -> AppResult<String> {
        let value = generate_code();
        let code = CredentialCode::new(value.clone(), purpose, self.ttl, Utc::now());

        self.store.store_code(email, purpose, code).await?;

        log::info!("코드 발급됨 - 사용자: {}, 목적: {}", email, purpose.as_str());
        Ok(value)
    }

    /// 제시된 코드를 검증하고 소비합니다.
    ///
    /// 성공 시 코드는 소비 상태가 되어 같은 값으로 다시 검증할 수 없습니다.
    /// 실패 사유(불일치/만료/소비됨/사용자 없음)는 반환값에서 구분되지
    /// 않습니다.
    pub async fn verify(&self, email: &str, purpose: CodePurpose, presented: &str) -> AppResult<bool> {
        let consumed = self
            .store
            .consume_code(email, purpose, presented, Utc::now())
            .await?;

        if consumed {
            log::info!("코드 검증 성공 - 사용자: {}, 목적: {}", email, purpose.as_str());
        } else {
            log::info!("코드 검증 실패 - 사용자: {}, 목적: {}", email, purpose.as_str());
        }
        Ok(consumed)
    }

    /// 소비가 끝난 슬롯을 비웁니다.
    pub async fn retire(&self, email: &str, purpose: CodePurpose) -> AppResult<()> {
        self.store.clear_code(email, purpose).await
    }

    /// 코드를 수신자에게 비동기로 전달합니다.
    ///
    /// 분리된 태스크에서 실행되며 전달 실패는 발급을 실패시키지 않습니다.
    /// 실패는 경고 로그로 관측 가능합니다.
    pub fn deliver(&self, to: &str, subject: &str, body: String) {
        let notifier = self.notifier.clone();
        let to = to.to_string();
        let subject = subject.to_string();

        actix_web::rt::spawn(async move {
            if let Err(e) = notifier.send(&to, &subject, &body).await {
                log::warn!("알림 전송 실패 - 수신자: {}, 제목: {}, 에러: {}", to, subject, e);
            }
        });
    }
}

/// 6자리 숫자 코드를 생성합니다 (0 패딩).
fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", n)
}
