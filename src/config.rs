use std::{env, time::Duration};

use crate::checkout::models::CheckoutSettings;
use crate::payment::{LoadBehaviour, Simulation};

/// Script the hosted payment widget is served from
pub const DEFAULT_WIDGET_SRC: &str = "https://checkout.razorpay.com/v1/checkout.js";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub widget_src: String,
    pub simulation: Simulation,
    pub widget_load: LoadBehaviour,
    pub checkout: CheckoutSettings,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = CheckoutSettings::default();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("APP_PORT").unwrap_or(8000);
        let widget_src = env::var("WIDGET_SCRIPT_SRC").unwrap_or_else(|_| DEFAULT_WIDGET_SRC.to_string());
        let simulation = match env::var("PAYMENT_SIMULATION") {
            Ok(value) => value.parse::<Simulation>().map_err(anyhow::Error::msg)?,
            Err(_) => Simulation::Approve,
        };

        let widget_load = match parse_var::<u64>("WIDGET_LOAD_DELAY_MS") {
            Some(ms) if ms > 0 => LoadBehaviour::Delayed(Duration::from_millis(ms)),
            _ => LoadBehaviour::Ready,
        };

        let checkout = CheckoutSettings {
            merchant_key: env::var("MERCHANT_KEY_ID").unwrap_or(defaults.merchant_key),
            merchant_name: env::var("MERCHANT_NAME").unwrap_or(defaults.merchant_name),
            currency: env::var("PAYMENT_CURRENCY").unwrap_or(defaults.currency),
            description: env::var("PAYMENT_DESCRIPTION").unwrap_or(defaults.description),
            theme_color: env::var("PAYMENT_THEME_COLOR").ok().or(defaults.theme_color),
            payment_timeout: parse_var("PAYMENT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.payment_timeout),
            widget_load_timeout: parse_var("WIDGET_LOAD_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.widget_load_timeout),
        };

        Ok(Self {
            host,
            port,
            widget_src,
            simulation,
            widget_load,
            checkout,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}
