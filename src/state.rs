use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::models::RateTable;
use crate::services::notify::NotificationProvider;
use crate::services::payments::PaymentProvider;
use crate::services::pincode::PincodeLookup;
use crate::services::pricing::PricingConfig;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub rates: RateTable,
    pub pricing: PricingConfig,
    pub payments: Box<dyn PaymentProvider>,
    pub notifier: Box<dyn NotificationProvider>,
    pub pincode: Box<dyn PincodeLookup>,
}
