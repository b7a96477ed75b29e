// --- File: crates/safari_booking/src/logic.rs ---
//! Booking draft, step validation and pricing.

use chrono::{Duration, NaiveDate};
use safari_common::models::{Booking, NewBooking, Tour};
use safari_common::session::SessionUser;
use safari_common::validation::{
    validate_email, validate_max_len, validate_name, validate_phone, FormErrors,
};
use safari_config::BookingConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_SPECIAL_REQUESTS_LENGTH: usize = 1000;

/// The booking in progress, carried between steps in the booking cookie.
///
/// `id` is sent as the idempotency key when the booking is confirmed, so a
/// double submit cannot create two bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub id: String,
    pub tour_id: String,
    pub tour_title: String,
    pub start_date: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub lead_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: Option<String>,
}

impl BookingDraft {
    pub fn new(tour: &Tour) -> Self {
        BookingDraft {
            id: Uuid::new_v4().to_string(),
            tour_id: tour.id.clone(),
            tour_title: tour.title.clone(),
            start_date: None,
            adults: 0,
            children: 0,
            lead_name: String::new(),
            email: String::new(),
            phone: String::new(),
            special_requests: None,
        }
    }

    /// Keeps `existing` when it belongs to `tour`, otherwise starts over.
    pub fn resume_or_new(existing: Option<BookingDraft>, tour: &Tour) -> Self {
        match existing {
            Some(draft) if draft.tour_id == tour.id => draft,
            _ => BookingDraft::new(tour),
        }
    }

    pub fn trip_complete(&self) -> bool {
        self.start_date.is_some() && self.adults >= 1
    }

    pub fn travellers_complete(&self) -> bool {
        !self.lead_name.trim().is_empty() && !self.email.trim().is_empty() && !self.phone.trim().is_empty()
    }

    pub fn travellers(&self) -> u32 {
        self.adults + self.children
    }

    /// Fills empty contact fields from the signed-in account.
    pub fn prefill_contact(&mut self, user: &SessionUser) {
        if self.lead_name.trim().is_empty() {
            self.lead_name = user.name.clone();
        }
        if self.email.trim().is_empty() {
            self.email = user.email.clone();
        }
    }

    pub fn apply_trip(&mut self, trip: TripDetails) {
        self.start_date = Some(trip.start_date);
        self.adults = trip.adults;
        self.children = trip.children;
    }

    pub fn apply_travellers(&mut self, travellers: TravellerDetails) {
        self.lead_name = travellers.lead_name;
        self.email = travellers.email;
        self.phone = travellers.phone;
        self.special_requests = travellers.special_requests;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    Trip,
    Travellers,
    Review,
}

impl BookingStep {
    pub const ALL: [BookingStep; 3] = [BookingStep::Trip, BookingStep::Travellers, BookingStep::Review];

    pub fn label(&self) -> &'static str {
        match self {
            BookingStep::Trip => "Trip details",
            BookingStep::Travellers => "Lead traveller",
            BookingStep::Review => "Review and confirm",
        }
    }

    pub fn path(&self, tour_id: &str) -> String {
        match self {
            BookingStep::Trip => format!("/book/{}", tour_id),
            BookingStep::Travellers => format!("/book/{}/travellers", tour_id),
            BookingStep::Review => format!("/book/{}/review", tour_id),
        }
    }

    pub fn number(&self) -> usize {
        match self {
            BookingStep::Trip => 1,
            BookingStep::Travellers => 2,
            BookingStep::Review => 3,
        }
    }
}

/// The earliest step `draft` has not completed, or `None` when it is ready
/// for review. A missing draft starts at the trip step.
pub fn first_incomplete_step(draft: Option<&BookingDraft>) -> Option<BookingStep> {
    match draft {
        None => Some(BookingStep::Trip),
        Some(draft) if !draft.trip_complete() => Some(BookingStep::Trip),
        Some(draft) if !draft.travellers_complete() => Some(BookingStep::Travellers),
        Some(_) => None,
    }
}

/// Booking limits that apply to every tour.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRules {
    pub child_rate_percent: u32,
    pub min_lead_days: i64,
    pub max_travellers: u32,
}

impl BookingRules {
    pub fn from_config(config: &BookingConfig) -> Self {
        BookingRules {
            child_rate_percent: config.child_rate_percent,
            min_lead_days: config.min_lead_days.max(0),
            max_travellers: config.max_travellers.max(1),
        }
    }

    /// Group limit for one tour: the stricter of the tour's and ours.
    pub fn max_travellers_for(&self, tour: &Tour) -> u32 {
        tour.max_group_size.min(self.max_travellers).max(1)
    }

    pub fn earliest_start(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(self.min_lead_days)
    }
}

/// Step 1 as submitted. Numbers stay strings until validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripForm {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub adults: String,
    #[serde(default)]
    pub children: String,
}

/// Adults suggested on a fresh trip form.
pub const DEFAULT_ADULTS: u32 = 2;

impl TripForm {
    /// Pre-fills the form; a fresh draft suggests [`DEFAULT_ADULTS`] capped
    /// at the group limit.
    pub fn from_draft(draft: &BookingDraft, max_travellers: u32) -> Self {
        let adults = if draft.adults == 0 {
            DEFAULT_ADULTS.min(max_travellers.max(1))
        } else {
            draft.adults
        };
        TripForm {
            start_date: draft.start_date.map(|d| d.to_string()).unwrap_or_default(),
            adults: adults.to_string(),
            children: draft.children.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripDetails {
    pub start_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
}

fn parse_count(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    raw.parse::<u32>().ok()
}

pub fn validate_trip(
    form: &TripForm,
    tour: &Tour,
    rules: &BookingRules,
    today: NaiveDate,
) -> Result<TripDetails, FormErrors> {
    let mut errors = FormErrors::new();

    let earliest = rules.earliest_start(today);
    let start_date = match NaiveDate::parse_from_str(form.start_date.trim(), "%Y-%m-%d") {
        Ok(date) if date < earliest => {
            errors.add(
                "start_date",
                format!(
                    "Start date must be at least {} days from today (on or after {})",
                    rules.min_lead_days, earliest
                ),
            );
            None
        }
        Ok(date) => Some(date),
        Err(_) if form.start_date.trim().is_empty() => {
            errors.add("start_date", "Start date is required");
            None
        }
        Err(_) => {
            errors.add("start_date", "Please enter a valid start date");
            None
        }
    };

    let adults = parse_count(&form.adults);
    match adults {
        Some(0) => errors.add("adults", "At least one adult is required"),
        None => errors.add("adults", "Please enter the number of adults"),
        Some(_) => {}
    }
    let children = parse_count(&form.children);
    if children.is_none() {
        errors.add("children", "Please enter the number of children");
    }

    let limit = rules.max_travellers_for(tour);
    if let (Some(adults), Some(children)) = (adults, children) {
        if adults.saturating_add(children) > limit {
            errors.add(
                "adults",
                format!("This tour takes at most {} travellers per booking", limit),
            );
        }
    }

    errors.into_result()?;
    match (start_date, adults, children) {
        (Some(start_date), Some(adults), Some(children)) => Ok(TripDetails {
            start_date,
            adults,
            children,
        }),
        _ => {
            let mut errors = FormErrors::new();
            errors.add("start_date", "Please check your trip details");
            Err(errors)
        }
    }
}

/// Step 2 as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TravellerForm {
    #[serde(default)]
    pub lead_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub special_requests: String,
}

impl TravellerForm {
    pub fn from_draft(draft: &BookingDraft) -> Self {
        TravellerForm {
            lead_name: draft.lead_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            special_requests: draft.special_requests.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravellerDetails {
    pub lead_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: Option<String>,
}

pub fn validate_travellers(form: &TravellerForm) -> Result<TravellerDetails, FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_name("lead_name", &form.lead_name));
    errors.check(validate_email(&form.email));
    errors.check(validate_phone(&form.phone));
    errors.check(validate_max_len(
        "special_requests",
        "Special requests",
        &form.special_requests,
        MAX_SPECIAL_REQUESTS_LENGTH,
    ));
    errors.into_result()?;

    let special_requests = form.special_requests.trim();
    Ok(TravellerDetails {
        lead_name: form.lead_name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        special_requests: (!special_requests.is_empty()).then(|| special_requests.to_string()),
    })
}

/// Price breakdown in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub adults: u32,
    pub children: u32,
    pub adult_price: i64,
    pub child_rate_percent: u32,
    pub adult_total: i64,
    pub child_total: i64,
    pub total: i64,
    pub currency: String,
}

/// `amount * percent / 100` rounded half-up, for non-negative inputs.
fn percent_of(amount: i128, percent: i128) -> i128 {
    (amount * percent + 50).div_euclid(100)
}

/// adults × price + children × price × rate / 100, rounded half-up once on
/// the children's total.
pub fn quote(price_per_person: i64, currency: &str, adults: u32, children: u32, child_rate_percent: u32) -> Quote {
    let price = i128::from(price_per_person.max(0));
    let adult_total = price * i128::from(adults);
    let child_total = percent_of(price * i128::from(children), i128::from(child_rate_percent));
    let clamp = |value: i128| i64::try_from(value).unwrap_or(i64::MAX);

    Quote {
        adults,
        children,
        adult_price: price_per_person,
        child_rate_percent,
        adult_total: clamp(adult_total),
        child_total: clamp(child_total),
        total: clamp(adult_total + child_total),
        currency: currency.to_string(),
    }
}

pub fn quote_for(draft: &BookingDraft, tour: &Tour, rules: &BookingRules) -> Quote {
    quote(
        tour.price_per_person,
        &tour.currency,
        draft.adults,
        draft.children,
        rules.child_rate_percent,
    )
}

/// The `POST /bookings` payload for a complete draft.
pub fn to_new_booking(draft: &BookingDraft, quote: &Quote) -> Option<NewBooking> {
    if first_incomplete_step(Some(draft)).is_some() {
        return None;
    }
    Some(NewBooking {
        tour_id: draft.tour_id.clone(),
        start_date: draft.start_date?,
        adults: draft.adults,
        children: draft.children,
        lead_name: draft.lead_name.clone(),
        email: draft.email.clone(),
        phone: draft.phone.clone(),
        special_requests: draft.special_requests.clone(),
        total_price: quote.total,
        currency: quote.currency.clone(),
    })
}

/// Newest start date first.
pub fn sort_bookings(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| b.start_date.cmp(&a.start_date).then_with(|| a.id.cmp(&b.id)));
}
