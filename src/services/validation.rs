use crate::models::{Appointment, CategoryKind, RateTable};

/// Field rules for the whole appointment, keyed by the work category's kind.
/// This is the single authoritative rule set; the client form mirrors it but
/// is advisory only. Returns the camelCase names of offending fields.
pub fn validate(appt: &Appointment, table: &RateTable) -> Result<(), Vec<String>> {
    let mut fields = vec![];

    if appt.name.trim().is_empty() {
        fields.push("name".to_string());
    }
    if let Some(email) = &appt.email {
        if !email.trim().is_empty() && !valid_email(email.trim()) {
            fields.push("email".to_string());
        }
    }
    if !valid_contact_number(appt.contact_number.trim()) {
        fields.push("contactNumber".to_string());
    }
    if appt.address.trim().is_empty() {
        fields.push("address".to_string());
    }
    if appt.village.trim().is_empty() {
        fields.push("village".to_string());
    }
    if !valid_pincode(appt.pincode.trim()) {
        fields.push("pincode".to_string());
    }
    if appt.date.trim().is_empty() {
        fields.push("date".to_string());
    }
    if appt.time.is_empty() || appt.time.iter().any(|t| t.trim().is_empty()) {
        fields.push("time".to_string());
    }

    match table.lookup(&appt.work_category) {
        None => fields.push("workCategory".to_string()),
        Some(entry) if entry.kind.is_distance() => {
            if is_blank(&appt.pickup_location) {
                fields.push("pickupLocation".to_string());
            }
            if is_blank(&appt.delivery_location) {
                fields.push("deliveryLocation".to_string());
            }
            if !matches!(appt.kilometers, Some(km) if km > 0.0) {
                fields.push("kilometers".to_string());
            }
        }
        Some(_) => {
            if is_blank(&appt.seven_twelve_number) {
                fields.push("sevenTwelveNumber".to_string());
            }
            let has_gunta = matches!(appt.gunta, Some(g) if g > 0.0);
            let has_acre = matches!(appt.acre, Some(a) if a > 0.0);
            if !has_gunta && !has_acre {
                fields.push("gunta or acre".to_string());
            }
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(fields)
    }
}

/// Keeps the redundant gunta/acre pair consistent by deriving one from the
/// other (40 gunta = 1 acre), with acre taken as canonical when both arrive.
/// Distance categories carry no land parcel and get the area fields cleared.
pub fn canonicalize_area(appt: &mut Appointment, kind: CategoryKind) {
    if kind.is_distance() {
        appt.gunta = None;
        appt.acre = None;
        appt.area = None;
        appt.seven_twelve_number = None;
        appt.khata_number = None;
        return;
    }

    appt.pickup_location = None;
    appt.delivery_location = None;
    appt.kilometers = None;

    if let Some(acre) = appt.acre.filter(|a| *a > 0.0) {
        appt.gunta = Some(round2(acre * 40.0));
        appt.area = Some(format!("{acre} acres"));
    } else if let Some(gunta) = appt.gunta.filter(|g| *g > 0.0) {
        appt.acre = Some(round3(gunta / 40.0));
        appt.area = Some(format!("{gunta} gunta"));
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

/// 10-13 digits, optional leading `+`.
fn valid_contact_number(s: &str) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    (10..=13).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

fn valid_pincode(s: &str) -> bool {
    s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Deliberately permissive: one `@` with non-empty, whitespace-free sides.
fn valid_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !s.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
