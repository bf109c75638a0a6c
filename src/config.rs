use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub allowed_origin: String,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub work_categories: String,
    pub transport_minimum_fare: f64,
    pub custom_km_rate: f64,
    pub custom_minimum: f64,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_whatsapp_number: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "landbook.db".to_string()),
            allowed_origin: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "changeme".to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_default(),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_default(),
            razorpay_key_id: env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
            razorpay_key_secret: env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            work_categories: env::var("WORK_CATEGORIES").unwrap_or_default(),
            transport_minimum_fare: env::var("TRANSPORT_MINIMUM_FARE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500.0),
            custom_km_rate: env::var("CUSTOM_KM_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(14.0),
            custom_minimum: env::var("CUSTOM_MINIMUM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500.0),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_whatsapp_number: env::var("TWILIO_WHATSAPP_NUMBER").unwrap_or_default(),
        }
    }
}
