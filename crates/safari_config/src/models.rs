// --- File: crates/safari_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: default_static_dir(),
        }
    }
}

// --- Remote REST API ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the safari REST API, without trailing slash (e.g. `https://api.example.com/api`)
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

// --- Session Cookies ---
// The secret may be given as "secret_from_env" and is then read from
// SAFARI_SECRET_SESSION_SECRET (or SESSION_SECRET).
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub secret: Option<String>,
    pub secure_cookies: bool,
    pub max_age_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: None,
            secure_cookies: false,
            max_age_hours: 24 * 7,
        }
    }
}

// --- Site Identity ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub tagline: String,
    pub contact_email: String,
    pub contact_phone: String,
    /// IANA timezone used to decide what "today" is for booking dates.
    pub timezone: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Savanna Trails Safaris".to_string(),
            tagline: "Guided safaris across East Africa".to_string(),
            contact_email: "hello@savannatrails.example".to_string(),
            contact_phone: "+254 700 000 000".to_string(),
            timezone: "Africa/Nairobi".to_string(),
        }
    }
}

// --- Booking Rules ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BookingConfig {
    pub currency: String,
    /// Children pay this share of the adult price.
    pub child_rate_percent: u32,
    /// Earliest start date is today + this many days.
    pub min_lead_days: i64,
    pub max_travellers: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            child_rate_percent: 50,
            min_lead_days: 14,
            max_travellers: 12,
        }
    }
}

// --- Admin Dashboard ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AdminConfig {
    pub page_size: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

// --- Logging ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// When set, logs are additionally written to a daily rolling file in this directory.
    pub directory: Option<String>,
    pub journald: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            journald: false,
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    /// Serve from the built-in demo data instead of the remote API.
    #[serde(default)]
    pub use_demo_data: bool,

    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
