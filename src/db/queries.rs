use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Appointment, PaymentMode, PaymentStatus};

const COLUMNS: &str = "id, name, email, contact_number, address, village, pincode, district, state, \
     work_category, gunta, acre, area, seven_twelve_number, khata_number, \
     pickup_location, delivery_location, kilometers, date, time, remark, \
     payment_mode, payment_status, razorpay_order_id, razorpay_payment_id, \
     attempted, created_at, updated_at";

pub fn create_appointment(conn: &Connection, appt: &Appointment) -> anyhow::Result<()> {
    let time_json = serde_json::to_string(&appt.time)?;
    let created_at = appt.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let updated_at = appt.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO appointments (id, name, email, contact_number, address, village, pincode, \
         district, state, work_category, gunta, acre, area, seven_twelve_number, khata_number, \
         pickup_location, delivery_location, kilometers, date, time, remark, payment_mode, \
         payment_status, razorpay_order_id, razorpay_payment_id, attempted, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, \
         ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28)",
        params![
            appt.id,
            appt.name,
            appt.email,
            appt.contact_number,
            appt.address,
            appt.village,
            appt.pincode,
            appt.district,
            appt.state,
            appt.work_category,
            appt.gunta,
            appt.acre,
            appt.area,
            appt.seven_twelve_number,
            appt.khata_number,
            appt.pickup_location,
            appt.delivery_location,
            appt.kilometers,
            appt.date,
            time_json,
            appt.remark,
            appt.payment_mode.as_str(),
            appt.payment_status.as_str(),
            appt.razorpay_order_id,
            appt.razorpay_payment_id,
            appt.attempted as i32,
            created_at,
            updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let sql = format!("SELECT {COLUMNS} FROM appointments WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_appointment_row(row)));

    match result {
        Ok(appt) => Ok(Some(appt?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replaces all editable fields of an existing appointment. Payment
/// identifiers are preserved from the stored row, not the caller.
pub fn update_appointment(conn: &Connection, appt: &Appointment) -> anyhow::Result<bool> {
    let time_json = serde_json::to_string(&appt.time)?;
    let updated_at = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    let count = conn.execute(
        "UPDATE appointments SET name = ?1, email = ?2, contact_number = ?3, address = ?4, \
         village = ?5, pincode = ?6, district = ?7, state = ?8, work_category = ?9, gunta = ?10, \
         acre = ?11, area = ?12, seven_twelve_number = ?13, khata_number = ?14, \
         pickup_location = ?15, delivery_location = ?16, kilometers = ?17, date = ?18, \
         time = ?19, remark = ?20, payment_mode = ?21, payment_status = ?22, attempted = ?23, \
         updated_at = ?24
         WHERE id = ?25",
        params![
            appt.name,
            appt.email,
            appt.contact_number,
            appt.address,
            appt.village,
            appt.pincode,
            appt.district,
            appt.state,
            appt.work_category,
            appt.gunta,
            appt.acre,
            appt.area,
            appt.seven_twelve_number,
            appt.khata_number,
            appt.pickup_location,
            appt.delivery_location,
            appt.kilometers,
            appt.date,
            time_json,
            appt.remark,
            appt.payment_mode.as_str(),
            appt.payment_status.as_str(),
            appt.attempted as i32,
            updated_at,
            appt.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_appointment(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn list_appointments(conn: &Connection, date: Option<&str>) -> anyhow::Result<Vec<Appointment>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match date {
        Some(d) => (
            format!("SELECT {COLUMNS} FROM appointments WHERE date = ?1 ORDER BY created_at DESC"),
            vec![Box::new(d.to_string()) as Box<dyn rusqlite::types::ToSql>],
        ),
        None => (
            format!("SELECT {COLUMNS} FROM appointments ORDER BY created_at DESC"),
            vec![],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

/// Completed bookings only; pending and failed rows never hold a slot.
pub fn completed_for_date(conn: &Connection, date: &str) -> anyhow::Result<Vec<Appointment>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM appointments WHERE date = ?1 AND payment_status = 'completed'"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![date], |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn set_attempted(conn: &Connection, id: &str, attempted: bool) -> anyhow::Result<bool> {
    let updated_at = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE appointments SET attempted = ?1, updated_at = ?2 WHERE id = ?3",
        params![attempted as i32, updated_at, id],
    )?;
    Ok(count > 0)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let time_json: String = row.get(19)?;
    let payment_mode: String = row.get(21)?;
    let payment_status: String = row.get(22)?;
    let created_at_str: String = row.get(26)?;
    let updated_at_str: String = row.get(27)?;

    let time: Vec<String> = serde_json::from_str(&time_json).unwrap_or_default();
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Appointment {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        contact_number: row.get(3)?,
        address: row.get(4)?,
        village: row.get(5)?,
        pincode: row.get(6)?,
        district: row.get(7)?,
        state: row.get(8)?,
        work_category: row.get(9)?,
        gunta: row.get(10)?,
        acre: row.get(11)?,
        area: row.get(12)?,
        seven_twelve_number: row.get(13)?,
        khata_number: row.get(14)?,
        pickup_location: row.get(15)?,
        delivery_location: row.get(16)?,
        kilometers: row.get(17)?,
        date: row.get(18)?,
        time,
        remark: row.get(20)?,
        payment_mode: PaymentMode::parse(&payment_mode),
        payment_status: PaymentStatus::parse(&payment_status),
        razorpay_order_id: row.get(23)?,
        razorpay_payment_id: row.get(24)?,
        attempted: row.get::<_, i32>(25)? != 0,
        created_at,
        updated_at,
    })
}
