pub mod appointment;
pub mod rates;

pub use appointment::{is_valid_id, new_id, Appointment, AppointmentForm, PaymentMode, PaymentStatus};
pub use rates::{CategoryKind, RateEntry, RateTable};
