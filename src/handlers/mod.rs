pub mod admin;
pub mod appointments;
pub mod health;
pub mod payments;
