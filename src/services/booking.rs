use chrono::Utc;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{new_id, Appointment, AppointmentForm, PaymentStatus, RateTable};
use crate::services::notify::NotificationProvider;
use crate::services::pincode::PincodeLookup;
use crate::services::{availability, pricing, validation};
use crate::services::pricing::PricingConfig;

pub const SLOT_TAKEN: &str = "selected time slot is already booked";

/// Validates the submitted form, prices it, and produces the appointment
/// row to persist. Nothing is written here; failure leaves no trace.
pub fn prepare(
    form: AppointmentForm,
    table: &RateTable,
    pricing_cfg: &PricingConfig,
    status: PaymentStatus,
) -> Result<(Appointment, f64), AppError> {
    let mut appt = form.into_appointment(new_id(), status, Utc::now().naive_utc());

    validation::validate(&appt, table).map_err(AppError::Validation)?;

    let total = pricing::price(
        table,
        pricing_cfg,
        &appt.work_category,
        appt.gunta,
        appt.acre,
        appt.kilometers,
    )
    .map_err(|e| AppError::Validation(vec![e.to_string()]))?;

    // lookup succeeded during validation
    if let Some(entry) = table.lookup(&appt.work_category) {
        validation::canonicalize_area(&mut appt, entry.kind);
    }

    Ok((appt, total))
}

/// Best-effort district/state enrichment from the pincode. Lookup failures
/// only log; the booking proceeds with whatever the form carried.
pub async fn enrich_location(appt: &mut Appointment, lookup: &dyn PincodeLookup) {
    if !appt.district.trim().is_empty() && !appt.state.trim().is_empty() {
        return;
    }
    match lookup.lookup(&appt.pincode).await {
        Ok(Some(info)) => {
            if appt.district.trim().is_empty() {
                appt.district = info.district;
            }
            if appt.state.trim().is_empty() {
                appt.state = info.state;
            }
        }
        Ok(None) => {
            tracing::debug!(pincode = %appt.pincode, "pincode not resolvable");
        }
        Err(e) => {
            tracing::warn!(pincode = %appt.pincode, error = %e, "pincode lookup failed");
        }
    }
}

/// Cash path: the row goes in as pending and does not reserve its slot.
/// Two cash customers may legally hold the same (date, slot) until an admin
/// promotes one of them to completed.
pub fn insert_pending(conn: &Connection, appt: &Appointment) -> Result<(), AppError> {
    queries::create_appointment(conn, appt)?;
    Ok(())
}

/// Online path: availability re-check and insert run in one transaction so
/// two concurrent payment verifications cannot both claim a slot.
pub fn insert_completed(conn: &mut Connection, appt: &Appointment) -> Result<(), AppError> {
    let tx = conn.transaction().map_err(AppError::from)?;

    let available = availability::is_available(&tx, &appt.date, &appt.time, None)?;
    if !available {
        return Err(AppError::Conflict(SLOT_TAKEN.to_string()));
    }

    queries::create_appointment(&tx, appt)?;
    tx.commit().map_err(AppError::from)?;
    Ok(())
}

/// Admin edit: when the updated record is (or becomes) completed, its slot
/// must still be free among other completed bookings.
pub fn apply_update(conn: &mut Connection, appt: &Appointment) -> Result<(), AppError> {
    let tx = conn.transaction().map_err(AppError::from)?;

    if appt.payment_status == PaymentStatus::Completed {
        let available = availability::is_available(&tx, &appt.date, &appt.time, Some(&appt.id))?;
        if !available {
            return Err(AppError::Conflict(SLOT_TAKEN.to_string()));
        }
    }

    let updated = queries::update_appointment(&tx, appt)?;
    if !updated {
        return Err(AppError::NotFound("appointment".to_string()));
    }
    tx.commit().map_err(AppError::from)?;
    Ok(())
}

/// Booking confirmations are a courtesy; delivery failure never fails the
/// booking itself.
pub async fn notify_confirmation(
    notifier: &dyn NotificationProvider,
    appt: &Appointment,
    total: f64,
) {
    let slots = appt.time.join(", ");
    let body = format!(
        "Hi {}, your {} booking for {} at {} is recorded ({} payment, total \u{20b9}{:.2}).",
        appt.name,
        appt.work_category,
        appt.date,
        slots,
        appt.payment_mode.as_str(),
        total,
    );
    if let Err(e) = notifier.send_message(&appt.contact_number, &body).await {
        tracing::warn!(appointment = %appt.id, error = %e, "confirmation message failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{PaymentMode, RateTable};

    fn table() -> RateTable {
        RateTable::from_json(
            r#"[{"name":"Wheat","rate":25},{"name":"Transport","rate":14}]"#,
        )
        .unwrap()
    }

    fn cfg() -> PricingConfig {
        PricingConfig {
            transport_minimum_fare: 500.0,
            custom_km_rate: 14.0,
            custom_minimum: 500.0,
        }
    }

    fn wheat_form(date: &str, slot: &str) -> AppointmentForm {
        AppointmentForm {
            name: "Ravi".to_string(),
            contact_number: "9876543210".to_string(),
            address: "Main Road".to_string(),
            village: "Shirol".to_string(),
            pincode: "416103".to_string(),
            work_category: "Wheat".to_string(),
            acre: Some(4.0),
            seven_twelve_number: Some("712/4".to_string()),
            date: date.to_string(),
            time: vec![slot.to_string()],
            payment_mode: Some(PaymentMode::Cash),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_prices_and_canonicalizes() {
        let (appt, total) =
            prepare(wheat_form("2025-06-01", "10:00"), &table(), &cfg(), PaymentStatus::Pending)
                .unwrap();
        assert_eq!(total, 100.0);
        assert_eq!(appt.gunta, Some(160.0));
        assert_eq!(appt.payment_status, PaymentStatus::Pending);
        assert!(crate::models::appointment::is_valid_id(&appt.id));
    }

    #[test]
    fn test_prepare_rejects_invalid_form() {
        let mut form = wheat_form("2025-06-01", "10:00");
        form.acre = None;
        form.gunta = None;
        let err = prepare(form, &table(), &cfg(), PaymentStatus::Pending).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_two_pending_cash_bookings_share_a_slot() {
        let conn = db::init_db(":memory:").unwrap();
        let (a, _) =
            prepare(wheat_form("2025-06-01", "10:00"), &table(), &cfg(), PaymentStatus::Pending)
                .unwrap();
        let (b, _) =
            prepare(wheat_form("2025-06-01", "10:00"), &table(), &cfg(), PaymentStatus::Pending)
                .unwrap();
        insert_pending(&conn, &a).unwrap();
        insert_pending(&conn, &b).unwrap();
        assert!(availability::is_available(&conn, "2025-06-01", &a.time, None).unwrap());
    }

    #[test]
    fn test_insert_completed_rejects_taken_slot() {
        let mut conn = db::init_db(":memory:").unwrap();
        let (a, _) = prepare(
            wheat_form("2025-06-01", "10:00"),
            &table(),
            &cfg(),
            PaymentStatus::Completed,
        )
        .unwrap();
        insert_completed(&mut conn, &a).unwrap();

        let (b, _) = prepare(
            wheat_form("2025-06-01", "10:00"),
            &table(),
            &cfg(),
            PaymentStatus::Completed,
        )
        .unwrap();
        let err = insert_completed(&mut conn, &b).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_only_one_pending_promotable() {
        let mut conn = db::init_db(":memory:").unwrap();
        let (mut a, _) =
            prepare(wheat_form("2025-06-01", "10:00"), &table(), &cfg(), PaymentStatus::Pending)
                .unwrap();
        let (mut b, _) =
            prepare(wheat_form("2025-06-01", "10:00"), &table(), &cfg(), PaymentStatus::Pending)
                .unwrap();
        insert_pending(&conn, &a).unwrap();
        insert_pending(&conn, &b).unwrap();

        a.payment_status = PaymentStatus::Completed;
        apply_update(&mut conn, &a).unwrap();

        b.payment_status = PaymentStatus::Completed;
        let err = apply_update(&mut conn, &b).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    struct FixedLookup;

    #[async_trait::async_trait]
    impl PincodeLookup for FixedLookup {
        async fn lookup(&self, _pincode: &str) -> anyhow::Result<Option<crate::services::pincode::PincodeInfo>> {
            Ok(Some(crate::services::pincode::PincodeInfo {
                district: "Kolhapur".to_string(),
                state: "Maharashtra".to_string(),
            }))
        }
    }

    struct FailingLookup;

    #[async_trait::async_trait]
    impl PincodeLookup for FailingLookup {
        async fn lookup(&self, _pincode: &str) -> anyhow::Result<Option<crate::services::pincode::PincodeInfo>> {
            anyhow::bail!("lookup service timed out")
        }
    }

    #[tokio::test]
    async fn test_enrich_fills_blank_location() {
        let (mut appt, _) =
            prepare(wheat_form("2025-06-01", "10:00"), &table(), &cfg(), PaymentStatus::Pending)
                .unwrap();
        enrich_location(&mut appt, &FixedLookup).await;
        assert_eq!(appt.district, "Kolhapur");
        assert_eq!(appt.state, "Maharashtra");
    }

    #[tokio::test]
    async fn test_enrich_keeps_submitted_location() {
        let mut form = wheat_form("2025-06-01", "10:00");
        form.district = "Sangli".to_string();
        form.state = "Maharashtra".to_string();
        let (mut appt, _) = prepare(form, &table(), &cfg(), PaymentStatus::Pending).unwrap();
        enrich_location(&mut appt, &FixedLookup).await;
        assert_eq!(appt.district, "Sangli");
    }

    #[tokio::test]
    async fn test_enrich_failure_leaves_fields_untouched() {
        let (mut appt, _) =
            prepare(wheat_form("2025-06-01", "10:00"), &table(), &cfg(), PaymentStatus::Pending)
                .unwrap();
        enrich_location(&mut appt, &FailingLookup).await;
        assert_eq!(appt.district, "");
        assert_eq!(appt.state, "");
    }

    #[test]
    fn test_update_keeps_own_slot() {
        let mut conn = db::init_db(":memory:").unwrap();
        let (mut a, _) = prepare(
            wheat_form("2025-06-01", "10:00"),
            &table(),
            &cfg(),
            PaymentStatus::Completed,
        )
        .unwrap();
        insert_completed(&mut conn, &a).unwrap();

        a.name = "Ravi Patil".to_string();
        apply_update(&mut conn, &a).unwrap();
    }
}
