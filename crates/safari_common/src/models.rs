// --- File: crates/safari_common/src/models.rs ---

//! Data structures exchanged with the remote safari API.
//!
//! Field names follow the API's JSON. Ids are accepted as `id` or `_id`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_true() -> bool {
    true
}

/// Role of an account on the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A safari tour from the catalogue. Prices are in minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub destination: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub duration_days: u32,
    pub price_per_person: i64,
    pub currency: String,
    pub max_group_size: u32,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Payload for creating or replacing a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourInput {
    pub title: String,
    pub destination: String,
    pub summary: String,
    pub description: String,
    pub duration_days: u32,
    pub price_per_person: i64,
    pub currency: String,
    pub max_group_size: u32,
    pub highlights: Vec<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl TourInput {
    pub fn into_tour(self, id: String) -> Tour {
        Tour {
            id,
            title: self.title,
            destination: self.destination,
            summary: self.summary,
            description: self.description,
            duration_days: self.duration_days,
            price_per_person: self.price_per_person,
            currency: self.currency,
            max_group_size: self.max_group_size,
            highlights: self.highlights,
            image_url: self.image_url,
            is_active: self.is_active,
        }
    }
}

impl From<&Tour> for TourInput {
    fn from(tour: &Tour) -> Self {
        TourInput {
            title: tour.title.clone(),
            destination: tour.destination.clone(),
            summary: tour.summary.clone(),
            description: tour.description.clone(),
            duration_days: tour.duration_days,
            price_per_person: tour.price_per_person,
            currency: tour.currency.clone(),
            max_group_size: tour.max_group_size,
            highlights: tour.highlights.clone(),
            image_url: tour.image_url.clone(),
            is_active: tour.is_active,
        }
    }
}

/// Lifecycle of a booking. Transitions are owned by the API; the frontend
/// only offers the ones listed in [`BookingStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }

    pub fn parse(value: &str) -> Option<BookingStatus> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    pub fn next_statuses(&self) -> Vec<BookingStatus> {
        BookingStatus::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }

    /// Customers may cancel until the trip is completed.
    pub fn is_cancellable(&self) -> bool {
        self.can_transition_to(BookingStatus::Cancelled)
    }

    /// Bookings that count towards revenue.
    pub fn is_billable(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A booking as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: String,
    pub tour_id: String,
    #[serde(default)]
    pub tour_title: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub lead_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(with = "api_date")]
    pub start_date: NaiveDate,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    pub total_price: i64,
    pub currency: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn travellers(&self) -> u32 {
        self.adults + self.children
    }

    pub fn display_title(&self) -> String {
        self.tour_title.clone().unwrap_or_else(|| format!("Tour {}", self.tour_id))
    }
}

/// Payload of `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub tour_id: String,
    #[serde(with = "api_date")]
    pub start_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub lead_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: Option<String>,
    pub total_price: i64,
    pub currency: String,
}

/// Payload of `PATCH /admin/users/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.is_active.is_none()
    }
}

/// Payload of `PATCH /admin/bookings/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}

/// Payload of `POST /contact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Dates travel as `YYYY-MM-DD`; full RFC 3339 timestamps are accepted on input.
pub mod api_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let day = raw.get(..10).unwrap_or(&raw);
        NaiveDate::parse_from_str(day, FORMAT).map_err(serde::de::Error::custom)
    }
}
