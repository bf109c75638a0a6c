use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::auth;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{is_valid_id, AppointmentForm, PaymentMode, PaymentStatus};
use crate::services::{availability, booking, validation};
use crate::state::AppState;

fn check_id(id: &str) -> Result<(), AppError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(AppError::Validation(vec!["id".to_string()]))
    }
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Json<serde_json::Value>, AppError> {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| AppError::Internal(e.to_string()))
}

// GET /appointments?date=D
//
// Unauthenticated callers get the booked-slot view for availability display;
// a valid admin token gets full records.
#[derive(Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    if auth::is_admin(&headers, &state.config.jwt_secret) {
        let db = state.db.lock().unwrap();
        let appointments = queries::list_appointments(&db, query.date.as_deref())?;
        return to_json(appointments);
    }

    let date = query
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::Validation(vec!["date".to_string()]))?;

    let slots = {
        let db = state.db.lock().unwrap();
        availability::booked_slots(&db, &date)?
    };

    Ok(Json(serde_json::json!({
        "date": date,
        "bookedSlots": slots,
    })))
}

// POST /appointments — cash booking; goes in as pending and does not
// reserve its slot.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(mut form): Json<AppointmentForm>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    form.payment_mode = Some(form.payment_mode.unwrap_or(PaymentMode::Cash));

    let (mut appt, total) =
        booking::prepare(form, &state.rates, &state.pricing, PaymentStatus::Pending)?;

    booking::enrich_location(&mut appt, state.pincode.as_ref()).await;

    {
        let db = state.db.lock().unwrap();
        booking::insert_pending(&db, &appt)?;
    }

    tracing::info!(id = %appt.id, date = %appt.date, "cash appointment created");
    booking::notify_confirmation(state.notifier.as_ref(), &appt, total).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "appointment created successfully",
            "appointment": appt,
            "totalPrice": total,
        })),
    ))
}

// GET /appointments/:id
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_admin(&headers, &state.config.jwt_secret)?;
    check_id(&id)?;

    let appt = {
        let db = state.db.lock().unwrap();
        queries::get_appointment(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound("appointment".to_string()))?;

    to_json(appt)
}

// PUT /appointments/:id — full admin edit; re-validated and, when the record
// is completed, re-checked against the slot excluding itself.
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(form): Json<AppointmentForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_admin(&headers, &state.config.jwt_secret)?;
    check_id(&id)?;

    let existing = {
        let db = state.db.lock().unwrap();
        queries::get_appointment(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound("appointment".to_string()))?;

    let status = form.payment_status.unwrap_or(existing.payment_status);
    let merged = AppointmentForm {
        payment_mode: Some(form.payment_mode.unwrap_or(existing.payment_mode)),
        attempted: Some(form.attempted.unwrap_or(existing.attempted)),
        ..form
    };

    let mut appt = merged.into_appointment(existing.id.clone(), status, existing.created_at);
    appt.razorpay_order_id = existing.razorpay_order_id.clone();
    appt.razorpay_payment_id = existing.razorpay_payment_id.clone();
    appt.updated_at = Utc::now().naive_utc();

    validation::validate(&appt, &state.rates).map_err(AppError::Validation)?;
    if let Some(entry) = state.rates.lookup(&appt.work_category) {
        validation::canonicalize_area(&mut appt, entry.kind);
    }

    let updated = {
        let mut db = state.db.lock().unwrap();
        booking::apply_update(&mut db, &appt)?;
        queries::get_appointment(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound("appointment".to_string()))?;

    to_json(updated)
}

// PATCH /appointments/:id/attempted
#[derive(Deserialize)]
pub struct AttemptedRequest {
    pub attempted: bool,
}

pub async fn set_attempted(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<AttemptedRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_admin(&headers, &state.config.jwt_secret)?;
    check_id(&id)?;

    let updated = {
        let db = state.db.lock().unwrap();
        if !queries::set_attempted(&db, &id, body.attempted)? {
            return Err(AppError::NotFound("appointment".to_string()));
        }
        queries::get_appointment(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound("appointment".to_string()))?;

    to_json(updated)
}

// DELETE /appointments/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_admin(&headers, &state.config.jwt_secret)?;
    check_id(&id)?;

    let removed = {
        let db = state.db.lock().unwrap();
        queries::delete_appointment(&db, &id)?
    };

    if removed {
        Ok(Json(serde_json::json!({ "message": "appointment deleted" })))
    } else {
        Err(AppError::NotFound("appointment".to_string()))
    }
}

// POST /appointments/mark-attended and /appointments/mark-not-attended
//
// Plain iterate-and-update over an explicit id list; no cross-record
// transaction, partial outcomes reported in aggregate.
#[derive(Deserialize)]
pub struct BulkAttemptedRequest {
    #[serde(rename = "appointmentIds", default)]
    pub appointment_ids: Vec<String>,
}

pub async fn mark_attended(
    state: State<Arc<AppState>>,
    headers: HeaderMap,
    body: Json<BulkAttemptedRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    bulk_set_attempted(state, headers, body, true).await
}

pub async fn mark_not_attended(
    state: State<Arc<AppState>>,
    headers: HeaderMap,
    body: Json<BulkAttemptedRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    bulk_set_attempted(state, headers, body, false).await
}

async fn bulk_set_attempted(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<BulkAttemptedRequest>,
    attempted: bool,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_admin(&headers, &state.config.jwt_secret)?;

    let db = state.db.lock().unwrap();
    let mut updated = 0;
    let mut missing = 0;
    for id in &body.appointment_ids {
        if !is_valid_id(id) {
            missing += 1;
            continue;
        }
        if queries::set_attempted(&db, id, attempted)? {
            updated += 1;
        } else {
            missing += 1;
        }
    }

    Ok(Json(serde_json::json!({
        "updated": updated,
        "missing": missing,
    })))
}
