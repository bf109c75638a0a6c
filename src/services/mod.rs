pub mod availability;
pub mod booking;
pub mod notify;
pub mod payments;
pub mod pincode;
pub mod pricing;
pub mod validation;
