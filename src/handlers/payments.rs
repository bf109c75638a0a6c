use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{AppointmentForm, PaymentMode, PaymentStatus};
use crate::services::{availability, booking, payments};
use crate::state::AppState;

// POST /appointments/create-order
//
// The availability check here is advisory; the authoritative one runs at
// verify time, inside the insert transaction.
#[derive(Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub amount: i64,
    pub currency: Option<String>,
    #[serde(default)]
    pub slots: Vec<String>,
    pub date: Option<String>,
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(date) = body.date.as_deref() {
        if !body.slots.is_empty() {
            let db = state.db.lock().unwrap();
            if !availability::is_available(&db, date, &body.slots, None)? {
                return Err(AppError::Conflict(booking::SLOT_TAKEN.to_string()));
            }
        }
    }

    let amount = payments::clamp_order_amount(body.amount);
    let currency = body.currency.unwrap_or_else(|| "INR".to_string());
    let receipt = format!("receipt_{}", Utc::now().timestamp_millis());

    let order_id = state
        .payments
        .create_order(amount, &currency, &receipt)
        .await
        .map_err(|e| AppError::Provider(e.to_string()))?;

    tracing::info!(%order_id, amount, "payment order created");

    Ok(Json(serde_json::json!({
        "orderId": order_id,
        "amount": amount,
        "currency": currency,
    })))
}

// POST /appointments/verify-payment
//
// The booking row is created only after the signature checks out and the
// slot survives the authoritative re-check; any failure leaves no record.
#[derive(Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
    #[serde(rename = "formData", default)]
    pub form_data: AppointmentForm,
}

pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let mut missing = vec![];
    if body.razorpay_order_id.is_empty() {
        missing.push("razorpay_order_id".to_string());
    }
    if body.razorpay_payment_id.is_empty() {
        missing.push("razorpay_payment_id".to_string());
    }
    if body.razorpay_signature.is_empty() {
        missing.push("razorpay_signature".to_string());
    }
    if !missing.is_empty() {
        return Err(AppError::Validation(missing));
    }

    if !payments::verify_signature(
        &state.config.razorpay_key_secret,
        &body.razorpay_order_id,
        &body.razorpay_payment_id,
        &body.razorpay_signature,
    ) {
        tracing::warn!(order_id = %body.razorpay_order_id, "payment signature mismatch");
        return Err(AppError::SignatureMismatch);
    }

    let mut form = body.form_data;
    form.payment_mode = Some(PaymentMode::Online);

    let (mut appt, total) =
        booking::prepare(form, &state.rates, &state.pricing, PaymentStatus::Completed)?;
    appt.razorpay_order_id = Some(body.razorpay_order_id.clone());
    appt.razorpay_payment_id = Some(body.razorpay_payment_id.clone());

    booking::enrich_location(&mut appt, state.pincode.as_ref()).await;

    {
        let mut db = state.db.lock().unwrap();
        booking::insert_completed(&mut db, &appt)?;
    }

    tracing::info!(id = %appt.id, order_id = %body.razorpay_order_id, "online appointment confirmed");
    booking::notify_confirmation(state.notifier.as_ref(), &appt, total).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "payment verified and appointment created",
            "appointment": appt,
            "totalPrice": total,
        })),
    ))
}
