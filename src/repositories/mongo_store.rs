//! MongoDB Credential Store
//!
//! 프로덕션 저장소 구현입니다. 크리덴셜 코드 슬롯은 사용자 문서에 내장되어
//! 있으므로, 코드 소비는 `find_one_and_update` 한 번으로 수행되는
//! 단일 문서 원자 연산입니다. 동일 코드에 대한 동시 소비 시도 중
//! 정확히 하나만 필터에 매칭됩니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, to_bson};
use mongodb::{Client, Collection, options::ClientOptions};
use std::env;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::{CodePurpose, CodeSlot, CredentialCode, User};

use super::credential_store::CredentialStore;

/// MongoDB 기반 사용자/코드 저장소
pub struct MongoCredentialStore {
    users: Collection<User>,
}

impl MongoCredentialStore {
    /// 환경 변수에서 연결 정보를 읽어 저장소를 초기화합니다.
    ///
    /// ## 환경 변수
    /// - `MONGODB_URI`: MongoDB 연결 URI (기본값: "mongodb://localhost:27017")
    /// - `DATABASE_NAME`: 데이터베이스 이름 (기본값: "identity_dev")
    ///
    /// 연결 직후 `ping`으로 상태를 검증합니다.
    pub async fn connect() -> AppResult<Self> {
        let mongodb_uri =
            env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name =
            env::var("DATABASE_NAME").unwrap_or_else(|_| "identity_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        client_options.app_name = Some("identity_service".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let database = client.database(&database_name);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        log::info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            users: database.collection::<User>("users"),
        })
    }
}

#[async_trait]
impl CredentialStore for MongoCredentialStore {
    async fn insert_user(&self, user: User) -> AppResult<User> {
        // 유니크 제약 검사 후 삽입
        let email_taken = self
            .users
            .find_one(doc! { "email": &user.email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .is_some();
        if email_taken {
            return Err(AppError::ConflictError("Email already registered".to_string()));
        }

        let username_taken = self
            .users
            .find_one(doc! { "username": &user.username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .is_some();
        if username_taken {
            return Err(AppError::ConflictError("Username already taken".to_string()));
        }

        self.users
            .insert_one(&user)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn mark_email_verified(&self, email: &str) -> AppResult<()> {
        let result = self
            .users
            .update_one(
                doc! { "email": email },
                doc! { "$set": {
                    "is_email_verified": true,
                    "updated_at": Utc::now().timestamp(),
                }},
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn update_password_hash(&self, email: &str, password_hash: &str) -> AppResult<()> {
        let result = self
            .users
            .update_one(
                doc! { "email": email },
                doc! { "$set": {
                    "password_hash": password_hash,
                    "updated_at": Utc::now().timestamp(),
                }},
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn store_code(
        &self,
        email: &str,
        purpose: CodePurpose,
        code: CredentialCode,
    ) -> AppResult<()> {
        let slot = to_bson(&CodeSlot::Active(code))
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 슬롯 전체를 덮어써 기존 활성 코드를 대체
        let mut fields = doc! { "updated_at": Utc::now().timestamp() };
        fields.insert(purpose.field_name(), slot);

        let result = self
            .users
            .update_one(doc! { "email": email }, doc! { "$set": fields })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn consume_code(
        &self,
        email: &str,
        purpose: CodePurpose,
        presented: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let field = purpose.field_name();

        // 활성 상태, 값 일치, 만료 전(경계 포함)인 경우에만 매칭되는
        // 단일 문서 compare-and-set. 매칭 실패 사유는 구분하지 않습니다.
        let mut filter = doc! { "email": email };
        filter.insert(format!("{}.state", field), "active");
        filter.insert(format!("{}.value", field), presented);
        filter.insert(
            format!("{}.expires_at", field),
            doc! { "$gte": now.timestamp() },
        );

        let mut fields = doc! { "updated_at": now.timestamp() };
        fields.insert(format!("{}.state", field), "consumed");

        let matched = self
            .users
            .find_one_and_update(filter, doc! { "$set": fields })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(matched.is_some())
    }

    async fn clear_code(&self, email: &str, purpose: CodePurpose) -> AppResult<()> {
        let empty = to_bson(&CodeSlot::None)
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut fields = doc! { "updated_at": Utc::now().timestamp() };
        fields.insert(purpose.field_name(), empty);

        self.users
            .update_one(doc! { "email": email }, doc! { "$set": fields })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
