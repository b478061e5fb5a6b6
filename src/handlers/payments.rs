//! Payment HTTP Handlers

use actix_web::{HttpResponse, post, web};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::payment::PaymentRequest;
use crate::services::payments::PaymentService;

/// 결제 요청 핸들러
///
/// # Endpoint
/// `POST /api/v1/payments`
#[post("")]
pub async fn create_payment(
    payments: web::Data<PaymentService>,
    payload: web::Json<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = payments.process(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}
