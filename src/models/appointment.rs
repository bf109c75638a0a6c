use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A booked (or pending) land-work visit. Wire format is camelCase to match
/// the form clients submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub contact_number: String,
    pub address: String,
    pub village: String,
    pub pincode: String,
    pub district: String,
    pub state: String,
    pub work_category: String,
    pub gunta: Option<f64>,
    pub acre: Option<f64>,
    pub area: Option<String>,
    pub seven_twelve_number: Option<String>,
    pub khata_number: Option<String>,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    pub kilometers: Option<f64>,
    pub date: String,
    pub time: Vec<String>,
    pub remark: Option<String>,
    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub attempted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Client-submitted form body. Every field is defaulted so that missing
/// fields surface as a validation error listing the field names rather than
/// a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentForm {
    pub name: String,
    pub email: Option<String>,
    pub contact_number: String,
    pub address: String,
    pub village: String,
    pub pincode: String,
    pub district: String,
    pub state: String,
    pub work_category: String,
    pub gunta: Option<f64>,
    pub acre: Option<f64>,
    pub area: Option<String>,
    pub seven_twelve_number: Option<String>,
    pub khata_number: Option<String>,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    pub kilometers: Option<f64>,
    pub date: String,
    pub time: Vec<String>,
    pub remark: Option<String>,
    pub payment_mode: Option<PaymentMode>,
    pub payment_status: Option<PaymentStatus>,
    pub attempted: Option<bool>,
}

impl AppointmentForm {
    pub fn into_appointment(
        self,
        id: String,
        payment_status: PaymentStatus,
        now: NaiveDateTime,
    ) -> Appointment {
        Appointment {
            id,
            name: self.name,
            email: self.email,
            contact_number: self.contact_number,
            address: self.address,
            village: self.village,
            pincode: self.pincode,
            district: self.district,
            state: self.state,
            work_category: self.work_category,
            gunta: self.gunta,
            acre: self.acre,
            area: self.area,
            seven_twelve_number: self.seven_twelve_number,
            khata_number: self.khata_number,
            pickup_location: self.pickup_location,
            delivery_location: self.delivery_location,
            kilometers: self.kilometers,
            date: self.date,
            time: self.time,
            remark: self.remark,
            payment_mode: self.payment_mode.unwrap_or(PaymentMode::Online),
            payment_status,
            razorpay_order_id: None,
            razorpay_payment_id: None,
            attempted: self.attempted.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => PaymentStatus::Completed,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    Online,
    Cash,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Online => "online",
            PaymentMode::Cash => "cash",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "cash" => PaymentMode::Cash,
            _ => PaymentMode::Online,
        }
    }
}

/// Appointment ids are 24 lowercase hex characters.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..24].to_string()
}

pub fn is_valid_id(s: &str) -> bool {
    s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_shape() {
        let id = new_id();
        assert!(is_valid_id(&id), "generated id not valid: {id}");
    }

    #[test]
    fn test_id_validation() {
        assert!(is_valid_id("0123456789abcdef01234567"));
        assert!(!is_valid_id("0123456789abcdef0123456")); // too short
        assert!(!is_valid_id("0123456789abcdef0123456z")); // non-hex
        assert!(!is_valid_id(""));
    }

    #[test]
    fn test_form_tolerates_missing_fields() {
        let form: AppointmentForm = serde_json::from_str(r#"{"name":"Ravi"}"#).unwrap();
        assert_eq!(form.name, "Ravi");
        assert!(form.contact_number.is_empty());
        assert!(form.time.is_empty());
    }
}
