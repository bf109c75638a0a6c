use rusqlite::Connection;

use crate::db::queries;

/// Slots held by completed bookings on the given date, deduplicated and
/// sorted. Pending cash bookings deliberately do not appear here.
pub fn booked_slots(conn: &Connection, date: &str) -> anyhow::Result<Vec<String>> {
    let mut slots: Vec<String> = queries::completed_for_date(conn, date)?
        .into_iter()
        .flat_map(|a| a.time)
        .collect();
    slots.sort();
    slots.dedup();
    Ok(slots)
}

/// True when none of the requested slots is held by a completed booking.
/// `exclude` skips a record's own id so an admin edit can keep its slot.
pub fn is_available(
    conn: &Connection,
    date: &str,
    slots: &[String],
    exclude: Option<&str>,
) -> anyhow::Result<bool> {
    let booked = queries::completed_for_date(conn, date)?;
    for appt in &booked {
        if exclude == Some(appt.id.as_str()) {
            continue;
        }
        if appt.time.iter().any(|t| slots.contains(t)) {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{AppointmentForm, PaymentMode, PaymentStatus};
    use chrono::Utc;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn insert(conn: &Connection, id: &str, date: &str, slots: &[&str], status: PaymentStatus) {
        let form = AppointmentForm {
            name: "Test".to_string(),
            contact_number: "9876543210".to_string(),
            address: "Road".to_string(),
            village: "Village".to_string(),
            pincode: "416103".to_string(),
            work_category: "Wheat".to_string(),
            acre: Some(1.0),
            seven_twelve_number: Some("1/1".to_string()),
            date: date.to_string(),
            time: slots.iter().map(|s| s.to_string()).collect(),
            payment_mode: Some(PaymentMode::Cash),
            ..Default::default()
        };
        let appt = form.into_appointment(id.to_string(), status, Utc::now().naive_utc());
        queries::create_appointment(conn, &appt).unwrap();
    }

    fn slots(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_date_is_available() {
        let conn = setup_db();
        assert!(is_available(&conn, "2025-06-01", &slots(&["10:00"]), None).unwrap());
    }

    #[test]
    fn test_completed_booking_blocks_slot() {
        let conn = setup_db();
        insert(&conn, "aaaaaaaaaaaaaaaaaaaaaaaa", "2025-06-01", &["10:00"], PaymentStatus::Completed);
        assert!(!is_available(&conn, "2025-06-01", &slots(&["10:00"]), None).unwrap());
        assert!(is_available(&conn, "2025-06-01", &slots(&["11:00"]), None).unwrap());
    }

    #[test]
    fn test_pending_booking_does_not_block() {
        let conn = setup_db();
        insert(&conn, "bbbbbbbbbbbbbbbbbbbbbbbb", "2025-06-01", &["10:00"], PaymentStatus::Pending);
        assert!(is_available(&conn, "2025-06-01", &slots(&["10:00"]), None).unwrap());
    }

    #[test]
    fn test_failed_booking_does_not_block() {
        let conn = setup_db();
        insert(&conn, "cccccccccccccccccccccccc", "2025-06-01", &["10:00"], PaymentStatus::Failed);
        assert!(is_available(&conn, "2025-06-01", &slots(&["10:00"]), None).unwrap());
    }

    #[test]
    fn test_other_date_does_not_block() {
        let conn = setup_db();
        insert(&conn, "dddddddddddddddddddddddd", "2025-06-02", &["10:00"], PaymentStatus::Completed);
        assert!(is_available(&conn, "2025-06-01", &slots(&["10:00"]), None).unwrap());
    }

    #[test]
    fn test_partial_overlap_blocks() {
        let conn = setup_db();
        insert(
            &conn,
            "eeeeeeeeeeeeeeeeeeeeeeee",
            "2025-06-01",
            &["10:00", "11:00"],
            PaymentStatus::Completed,
        );
        assert!(!is_available(&conn, "2025-06-01", &slots(&["11:00", "12:00"]), None).unwrap());
    }

    #[test]
    fn test_exclude_own_id() {
        let conn = setup_db();
        insert(&conn, "ffffffffffffffffffffffff", "2025-06-01", &["10:00"], PaymentStatus::Completed);
        assert!(is_available(
            &conn,
            "2025-06-01",
            &slots(&["10:00"]),
            Some("ffffffffffffffffffffffff")
        )
        .unwrap());
    }

    #[test]
    fn test_booked_slots_listing() {
        let conn = setup_db();
        insert(&conn, "111111111111111111111111", "2025-06-01", &["11:00"], PaymentStatus::Completed);
        insert(
            &conn,
            "222222222222222222222222",
            "2025-06-01",
            &["10:00", "11:00"],
            PaymentStatus::Completed,
        );
        insert(&conn, "333333333333333333333333", "2025-06-01", &["12:00"], PaymentStatus::Pending);
        let booked = booked_slots(&conn, "2025-06-01").unwrap();
        assert_eq!(booked, slots(&["10:00", "11:00"]));
    }
}
