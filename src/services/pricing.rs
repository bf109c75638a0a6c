use crate::config::AppConfig;
use crate::models::{CategoryKind, RateTable};

/// Constants that sit outside the rate table: the transport minimum fare and
/// the fixed rate/floor used by the "Customize" category.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub transport_minimum_fare: f64,
    pub custom_km_rate: f64,
    pub custom_minimum: f64,
}

impl PricingConfig {
    pub fn from_app(cfg: &AppConfig) -> Self {
        Self {
            transport_minimum_fare: cfg.transport_minimum_fare,
            custom_km_rate: cfg.custom_km_rate,
            custom_minimum: cfg.custom_minimum,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("unknown work category: {0}")]
    UnknownCategory(String),

    #[error("either gunta or acre is required")]
    MissingArea,

    #[error("kilometers is required")]
    MissingDistance,
}

/// Deterministic price for a booking, rounded to 2 decimal places.
///
/// Area categories charge per acre (`acre` wins over `gunta / 40`).
/// Transport charges the round trip per km, floored at the minimum fare.
/// Customize charges a fixed per-km rate with a flat floor.
pub fn price(
    table: &RateTable,
    cfg: &PricingConfig,
    category: &str,
    gunta: Option<f64>,
    acre: Option<f64>,
    kilometers: Option<f64>,
) -> Result<f64, PricingError> {
    let entry = table
        .lookup(category)
        .ok_or_else(|| PricingError::UnknownCategory(category.to_string()))?;

    let amount = match entry.kind {
        CategoryKind::Area => {
            let acres = match (acre, gunta) {
                (Some(a), _) if a > 0.0 => a,
                (_, Some(g)) if g > 0.0 => g / 40.0,
                _ => return Err(PricingError::MissingArea),
            };
            entry.rate * acres
        }
        CategoryKind::DistanceTransport => {
            let km = kilometers.filter(|k| *k > 0.0).ok_or(PricingError::MissingDistance)?;
            (km * 2.0 * entry.rate).max(cfg.transport_minimum_fare)
        }
        CategoryKind::DistanceCustom => {
            let km = kilometers.filter(|k| *k > 0.0).ok_or(PricingError::MissingDistance)?;
            let calculated = km * cfg.custom_km_rate;
            if calculated > cfg.custom_minimum {
                calculated
            } else {
                cfg.custom_minimum
            }
        }
    };

    Ok(round2(amount))
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Provider minor units (paise), computed from the already-rounded display
/// amount so the charged total can never drift from the shown one.
pub fn to_minor_units(amount: f64) -> i64 {
    (round2(amount) * 100.0).round() as i64
}
