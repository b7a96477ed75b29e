// --- File: crates/safari_admin/src/logic.rs ---
//! Filtering, pagination, statistics and form parsing for the admin pages.

use std::collections::BTreeMap;

use safari_common::error::{forbidden, validation_error, SafariError};
use safari_common::models::{Booking, BookingStatus, Role, Tour, TourInput, User, UserUpdate};
use safari_common::validation::{validate_max_len, validate_required, FormErrors};
use serde::Deserialize;

/// Bookings listed on the dashboard.
pub const RECENT_BOOKINGS: usize = 5;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, always within `1..=total_pages`.
    pub page: usize,
    /// At least 1, even for an empty list.
    pub total_pages: usize,
    pub total_items: usize,
}

/// Cuts `items` into pages of `page_size` and returns the requested one.
/// Out-of-range page numbers are clamped.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let items = items.into_iter().skip((page - 1) * page_size).take(page_size).collect();
    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
    Unverified,
}

impl UserStatus {
    pub const ALL: [UserStatus; 3] = [UserStatus::Active, UserStatus::Inactive, UserStatus::Unverified];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Unverified => "unverified",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Unverified => "Unverified",
        }
    }

    pub fn parse(value: &str) -> Option<UserStatus> {
        UserStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserStatus::Active => user.is_active,
            UserStatus::Inactive => !user.is_active,
            UserStatus::Unverified => !user.is_verified,
        }
    }
}

/// Query string of `/admin/users`. Unknown values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub q: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
}

impl UserFilter {
    pub fn text(&self) -> Option<&str> {
        non_empty(self.q.as_deref())
    }

    pub fn role(&self) -> Option<Role> {
        non_empty(self.role.as_deref()).and_then(Role::parse)
    }

    pub fn status(&self) -> Option<UserStatus> {
        non_empty(self.status.as_deref()).and_then(UserStatus::parse)
    }

    /// Requested page, 1-based. Clamping happens in [`paginate`].
    pub fn page(&self) -> usize {
        parse_page(self.page.as_deref())
    }

    pub fn matches(&self, user: &User) -> bool {
        if let Some(text) = self.text() {
            let text = text.to_lowercase();
            if !user.name.to_lowercase().contains(&text) && !user.email.to_lowercase().contains(&text) {
                return false;
            }
        }
        if let Some(role) = self.role() {
            if user.role != role {
                return false;
            }
        }
        if let Some(status) = self.status() {
            if !status.matches(user) {
                return false;
            }
        }
        true
    }

    /// Active filters as query pairs, for pagination links.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(text) = self.text() {
            pairs.push(("q".to_string(), text.to_string()));
        }
        if let Some(role) = self.role() {
            pairs.push(("role".to_string(), role.as_str().to_string()));
        }
        if let Some(status) = self.status() {
            pairs.push(("status".to_string(), status.as_str().to_string()));
        }
        pairs
    }
}

fn parse_page(raw: Option<&str>) -> usize {
    non_empty(raw)
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(1)
}

pub fn filter_users(users: &[User], filter: &UserFilter) -> Vec<User> {
    users.iter().filter(|user| filter.matches(user)).cloned().collect()
}

/// Query string of `/admin/bookings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<String>,
    pub page: Option<String>,
}

impl BookingFilter {
    pub fn status(&self) -> Option<BookingStatus> {
        non_empty(self.status.as_deref()).and_then(BookingStatus::parse)
    }

    pub fn page(&self) -> usize {
        parse_page(self.page.as_deref())
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.status()
            .map(|status| vec![("status".to_string(), status.as_str().to_string())])
            .unwrap_or_default()
    }
}

/// Newest first: by creation time when known, then by start date.
pub fn sort_bookings_recent_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.start_date.cmp(&a.start_date))
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub fn filter_bookings(bookings: &[Booking], filter: &BookingFilter) -> Vec<Booking> {
    let mut matching: Vec<Booking> = bookings
        .iter()
        .filter(|booking| filter.status().map_or(true, |status| booking.status == status))
        .cloned()
        .collect();
    sort_bookings_recent_first(&mut matching);
    matching
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub users: usize,
    pub active_users: usize,
    pub admins: usize,
    pub tours: usize,
    pub active_tours: usize,
    pub bookings: usize,
    pub bookings_by_status: Vec<(BookingStatus, usize)>,
    /// Confirmed and completed bookings, per currency, in minor units.
    pub revenue: BTreeMap<String, i64>,
    pub recent_bookings: Vec<Booking>,
}

impl DashboardStats {
    pub fn compute(users: &[User], tours: &[Tour], bookings: &[Booking]) -> Self {
        let bookings_by_status = BookingStatus::ALL
            .into_iter()
            .map(|status| (status, bookings.iter().filter(|b| b.status == status).count()))
            .collect();

        let mut revenue = BTreeMap::new();
        for booking in bookings.iter().filter(|b| b.status.is_billable()) {
            *revenue.entry(booking.currency.to_ascii_uppercase()).or_insert(0i64) += booking.total_price;
        }

        let mut recent_bookings = bookings.to_vec();
        sort_bookings_recent_first(&mut recent_bookings);
        recent_bookings.truncate(RECENT_BOOKINGS);

        DashboardStats {
            users: users.len(),
            active_users: users.iter().filter(|u| u.is_active).count(),
            admins: users.iter().filter(|u| u.role == Role::Admin).count(),
            tours: tours.len(),
            active_tours: tours.iter().filter(|t| t.is_active).count(),
            bookings: bookings.len(),
            bookings_by_status,
            revenue,
            recent_bookings,
        }
    }
}

/// Form posted to `/admin/users/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdateForm {
    pub role: Option<String>,
    pub is_active: Option<String>,
    /// Users page to return to, with its filters.
    pub return_to: Option<String>,
}

/// Form posted to `/admin/users/:id/delete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserForm {
    pub return_to: Option<String>,
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

pub fn parse_user_update(form: &UserUpdateForm) -> Result<UserUpdate, SafariError> {
    let role = match non_empty(form.role.as_deref()) {
        Some(raw) => Some(Role::parse(raw).ok_or_else(|| validation_error(format!("Unknown role {}", raw)))?),
        None => None,
    };
    let is_active = match non_empty(form.is_active.as_deref()) {
        Some(raw) => Some(parse_bool(raw).ok_or_else(|| validation_error("Invalid account state"))?),
        None => None,
    };
    let update = UserUpdate { role, is_active };
    if update.is_empty() {
        return Err(validation_error("Nothing to update"));
    }
    Ok(update)
}

/// Admins cannot lock themselves out.
pub fn check_self_update(current_user_id: &str, target_id: &str, update: &UserUpdate) -> Result<(), SafariError> {
    if current_user_id != target_id {
        return Ok(());
    }
    if update.role.is_some_and(|role| role != Role::Admin) {
        return Err(forbidden("You cannot remove your own admin role"));
    }
    if update.is_active == Some(false) {
        return Err(forbidden("You cannot deactivate your own account"));
    }
    Ok(())
}

pub fn check_self_delete(current_user_id: &str, target_id: &str) -> Result<(), SafariError> {
    if current_user_id == target_id {
        return Err(forbidden("You cannot delete your own account"));
    }
    Ok(())
}

/// The users page to go back to after an action. Only `/admin/users` pages qualify.
pub fn users_return_path(return_to: Option<&str>) -> String {
    match non_empty(return_to) {
        Some(path) if path == "/admin/users" || path.starts_with("/admin/users?") => path.to_string(),
        _ => "/admin/users".to_string(),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

/// The requested status, if `current` may move there.
pub fn parse_status_change(current: BookingStatus, form: &StatusForm) -> Result<BookingStatus, SafariError> {
    let next = BookingStatus::parse(&form.status)
        .ok_or_else(|| validation_error(format!("Unknown booking status {}", form.status.trim())))?;
    if !current.can_transition_to(next) {
        return Err(SafariError::ConflictError(format!(
            "A {} booking cannot be marked {}",
            current.as_str(),
            next.as_str()
        )));
    }
    Ok(next)
}

pub const MAX_TOUR_DAYS: u32 = 60;
pub const MAX_GROUP_SIZE: u32 = 100;

/// Tour editor as submitted. Numbers stay strings until validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TourForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_days: String,
    /// Major units, e.g. `1250` or `1250.50`.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub max_group_size: String,
    /// One highlight per line.
    #[serde(default)]
    pub highlights: String,
    #[serde(default)]
    pub image_url: String,
    pub is_active: Option<String>,
}

impl TourForm {
    pub fn blank(currency: &str) -> Self {
        TourForm {
            currency: currency.to_string(),
            is_active: Some("on".to_string()),
            ..TourForm::default()
        }
    }

    pub fn from_tour(tour: &Tour) -> Self {
        TourForm {
            title: tour.title.clone(),
            destination: tour.destination.clone(),
            summary: tour.summary.clone(),
            description: tour.description.clone(),
            duration_days: tour.duration_days.to_string(),
            price: safari_common::format::format_major_units(tour.price_per_person),
            currency: tour.currency.clone(),
            max_group_size: tour.max_group_size.to_string(),
            highlights: tour.highlights.join("\n"),
            image_url: tour.image_url.clone().unwrap_or_default(),
            is_active: tour.is_active.then(|| "on".to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active.as_deref().and_then(parse_bool).unwrap_or(false)
    }
}

/// `"1250"` → `125000`, `"1250.5"` → `125050`, `"1250.50"` → `125050`.
///
/// At most two decimals; negative amounts and separators are rejected.
pub fn parse_price_minor(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if raw.ends_with('.') {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(cents)
}

fn parse_in_range(raw: &str, min: u32, max: u32) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| (min..=max).contains(value))
}

pub fn validate_tour_form(form: &TourForm) -> Result<TourInput, FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_required("title", "Title", &form.title));
    errors.check(validate_max_len("title", "Title", form.title.trim(), 120));
    errors.check(validate_required("destination", "Destination", &form.destination));
    errors.check(validate_required("summary", "Summary", &form.summary));
    errors.check(validate_max_len("summary", "Summary", form.summary.trim(), 300));

    let duration_days = parse_in_range(&form.duration_days, 1, MAX_TOUR_DAYS);
    if duration_days.is_none() {
        errors.add("duration_days", format!("Duration must be between 1 and {} days", MAX_TOUR_DAYS));
    }
    let max_group_size = parse_in_range(&form.max_group_size, 1, MAX_GROUP_SIZE);
    if max_group_size.is_none() {
        errors.add("max_group_size", format!("Group size must be between 1 and {}", MAX_GROUP_SIZE));
    }
    let price = parse_price_minor(&form.price).filter(|price| *price > 0);
    if price.is_none() {
        errors.add("price", "Price must be a positive amount like 1250 or 1250.50");
    }
    let currency = form.currency.trim().to_ascii_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.add("currency", "Currency must be a three-letter code such as USD");
    }
    let image_url = form.image_url.trim();
    if !image_url.is_empty() && !(image_url.starts_with("https://") || image_url.starts_with('/')) {
        errors.add("image_url", "Image URL must start with https:// or /");
    }

    let (Some(duration_days), Some(max_group_size), Some(price_per_person)) = (duration_days, max_group_size, price)
    else {
        return Err(errors);
    };
    errors.into_result()?;

    Ok(TourInput {
        title: form.title.trim().to_string(),
        destination: form.destination.trim().to_string(),
        summary: form.summary.trim().to_string(),
        description: form.description.trim().to_string(),
        duration_days,
        price_per_person,
        currency,
        max_group_size,
        highlights: form
            .highlights
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        is_active: form.is_active(),
    })
}
