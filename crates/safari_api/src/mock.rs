// --- File: crates/safari_api/src/mock.rs ---
//! In-memory implementation of every service trait.
//!
//! Backs the router tests and the `use_demo_data` mode. It mimics the remote
//! API's observable rules: bearer tokens, admin-only routes, allowed status
//! transitions and idempotent booking creation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use safari_common::error::{conflict, forbidden, internal_error, not_found, validation_error, SafariError};
use safari_common::models::{
    AuthSession, Booking, BookingStatus, ContactMessage, LoginRequest, NewBooking,
    RegisterRequest, Role, Tour, TourInput, User, UserUpdate,
};
use safari_common::services::{
    AdminService, AuthService, BookingService, BoxFuture, ContactService, TourService,
};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

const DEMO_DATA: &str = include_str!("../data/demo.json");

pub const DEMO_ADMIN_EMAIL: &str = "admin@savannatrails.example";
pub const DEMO_ADMIN_PASSWORD: &str = "Savanna2026";
pub const DEMO_USER_EMAIL: &str = "guest@savannatrails.example";
pub const DEMO_USER_PASSWORD: &str = "Safari2026";

#[derive(Debug, Clone, Deserialize)]
pub struct DemoAccount {
    pub password: String,
    pub user: User,
}

/// Seed data for [`InMemorySafariService`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoData {
    #[serde(default)]
    pub accounts: Vec<DemoAccount>,
    #[serde(default)]
    pub tours: Vec<Tour>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl DemoData {
    /// The bundled demo catalogue and accounts.
    pub fn bundled() -> Result<Self, SafariError> {
        Ok(serde_json::from_str(DEMO_DATA)?)
    }
}

#[derive(Default)]
struct State {
    accounts: Vec<DemoAccount>,
    tours: Vec<Tour>,
    bookings: Vec<Booking>,
    /// bearer token -> user id
    sessions: HashMap<String, String>,
    /// idempotency key -> booking id
    idempotency: HashMap<String, String>,
    /// verification token -> user id
    verifications: HashMap<String, String>,
    /// reset token -> user id
    resets: HashMap<String, String>,
    enquiries: Vec<ContactMessage>,
}

impl State {
    fn user_for_token(&self, token: &str) -> Result<User, SafariError> {
        let user_id = self
            .sessions
            .get(token)
            .ok_or_else(|| SafariError::AuthError("invalid or expired token".to_string()))?;
        self.accounts
            .iter()
            .map(|account| &account.user)
            .find(|user| &user.id == user_id && user.is_active)
            .cloned()
            .ok_or_else(|| SafariError::AuthError("account no longer active".to_string()))
    }

    fn admin_for_token(&self, token: &str) -> Result<User, SafariError> {
        let user = self.user_for_token(token)?;
        if user.role != Role::Admin {
            return Err(forbidden("admin role required"));
        }
        Ok(user)
    }

    fn account_mut(&mut self, id: &str) -> Result<&mut DemoAccount, SafariError> {
        self.accounts
            .iter_mut()
            .find(|account| account.user.id == id)
            .ok_or_else(|| not_found(format!("user {}", id)))
    }

    fn booking_mut(&mut self, id: &str) -> Result<&mut Booking, SafariError> {
        self.bookings
            .iter_mut()
            .find(|booking| booking.id == id)
            .ok_or_else(|| not_found(format!("booking {}", id)))
    }
}

/// Service factory friendly in-memory backend.
pub struct InMemorySafariService {
    state: Mutex<State>,
}

impl InMemorySafariService {
    pub fn new(data: DemoData) -> Self {
        Self {
            state: Mutex::new(State {
                accounts: data.accounts,
                tours: data.tours,
                bookings: data.bookings,
                ..State::default()
            }),
        }
    }

    /// Backend seeded with the bundled demo data.
    pub fn demo() -> Result<Self, SafariError> {
        Ok(Self::new(DemoData::bundled()?))
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, SafariError> {
        self.state
            .lock()
            .map_err(|_| internal_error("in-memory state lock poisoned"))
    }

    /// Pending email verification token for `email`, as the email would carry it.
    pub fn verification_token_for(&self, email: &str) -> Option<String> {
        let state = self.state().ok()?;
        let user_id = find_by_email(&state.accounts, email)?.user.id.clone();
        state
            .verifications
            .iter()
            .find(|(_, id)| **id == user_id)
            .map(|(token, _)| token.clone())
    }

    /// Pending password reset token for `email`.
    pub fn reset_token_for(&self, email: &str) -> Option<String> {
        let state = self.state().ok()?;
        let user_id = find_by_email(&state.accounts, email)?.user.id.clone();
        state
            .resets
            .iter()
            .find(|(_, id)| **id == user_id)
            .map(|(token, _)| token.clone())
    }

    /// Enquiries received through the contact form.
    pub fn enquiries(&self) -> Vec<ContactMessage> {
        self.state().map(|state| state.enquiries.clone()).unwrap_or_default()
    }

    pub fn bookings_snapshot(&self) -> Vec<Booking> {
        self.state().map(|state| state.bookings.clone()).unwrap_or_default()
    }

    pub fn users_snapshot(&self) -> Vec<User> {
        self.state()
            .map(|state| state.accounts.iter().map(|account| account.user.clone()).collect())
            .unwrap_or_default()
    }
}

fn find_by_email<'a>(accounts: &'a [DemoAccount], email: &str) -> Option<&'a DemoAccount> {
    let email = email.trim();
    accounts
        .iter()
        .find(|account| account.user.email.eq_ignore_ascii_case(email))
}

fn new_token(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

impl AuthService for InMemorySafariService {
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, AuthSession> {
        Box::pin(async move {
            let mut state = self.state()?;
            let account = find_by_email(&state.accounts, &request.email)
                .filter(|account| account.password == request.password)
                .cloned()
                .ok_or_else(|| SafariError::AuthError("Invalid email or password".to_string()))?;

            if !account.user.is_active {
                return Err(forbidden("This account has been deactivated"));
            }
            if !account.user.is_verified {
                return Err(forbidden("Please verify your email address before signing in"));
            }

            let token = new_token("demo");
            state.sessions.insert(token.clone(), account.user.id.clone());
            info!("demo login for {}", account.user.email);
            Ok(AuthSession {
                token,
                user: account.user,
            })
        })
    }

    fn register(&self, request: RegisterRequest) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state()?;
            if find_by_email(&state.accounts, &request.email).is_some() {
                return Err(conflict("An account with this email already exists"));
            }

            let user = User {
                id: format!("u-{}", Uuid::new_v4().simple()),
                name: request.name.trim().to_string(),
                email: request.email.trim().to_ascii_lowercase(),
                role: Role::User,
                is_verified: false,
                is_active: true,
                created_at: Some(Utc::now()),
            };
            let token = new_token("verify");
            debug!("verification token for {}: {}", user.email, token);
            state.verifications.insert(token, user.id.clone());
            state.accounts.push(DemoAccount {
                password: request.password,
                user,
            });
            Ok(())
        })
    }

    fn verify_email(&self, token: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            let user_id = state
                .verifications
                .remove(&token)
                .ok_or_else(|| validation_error("This verification link is invalid or has already been used"))?;
            state.account_mut(&user_id)?.user.is_verified = true;
            Ok(())
        })
    }

    fn forgot_password(&self, email: &str) -> BoxFuture<'_, ()> {
        let email = email.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            let user_id = find_by_email(&state.accounts, &email).map(|account| account.user.id.clone());
            if let Some(user_id) = user_id {
                state.resets.insert(new_token("reset"), user_id);
            }
            Ok(())
        })
    }

    fn reset_password(&self, token: &str, password: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        let password = password.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            let user_id = state
                .resets
                .remove(&token)
                .ok_or_else(|| validation_error("This reset link is invalid or has expired"))?;
            state.account_mut(&user_id)?.password = password;
            state.sessions.retain(|_, id| *id != user_id);
            Ok(())
        })
    }
}

impl TourService for InMemorySafariService {
    fn list_tours(&self) -> BoxFuture<'_, Vec<Tour>> {
        Box::pin(async move { Ok(self.state()?.tours.clone()) })
    }

    fn get_tour(&self, id: &str) -> BoxFuture<'_, Tour> {
        let id = id.to_string();
        Box::pin(async move {
            self.state()?
                .tours
                .iter()
                .find(|tour| tour.id == id)
                .cloned()
                .ok_or_else(|| not_found(format!("tour {}", id)))
        })
    }
}

impl BookingService for InMemorySafariService {
    fn my_bookings(&self, token: &str) -> BoxFuture<'_, Vec<Booking>> {
        let token = token.to_string();
        Box::pin(async move {
            let state = self.state()?;
            let user = state.user_for_token(&token)?;
            Ok(state
                .bookings
                .iter()
                .filter(|booking| booking.user_id.as_deref() == Some(user.id.as_str()))
                .cloned()
                .collect())
        })
    }

    fn create_booking(
        &self,
        token: &str,
        booking: NewBooking,
        idempotency_key: &str,
    ) -> BoxFuture<'_, Booking> {
        let token = token.to_string();
        let idempotency_key = idempotency_key.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            let user = state.user_for_token(&token)?;

            if let Some(existing_id) = state.idempotency.get(&idempotency_key) {
                if let Some(existing) = state.bookings.iter().find(|b| &b.id == existing_id) {
                    debug!("replaying booking {} for idempotency key", existing.id);
                    return Ok(existing.clone());
                }
            }

            let tour = state
                .tours
                .iter()
                .find(|tour| tour.id == booking.tour_id && tour.is_active)
                .cloned()
                .ok_or_else(|| not_found(format!("tour {}", booking.tour_id)))?;
            if booking.adults == 0 {
                return Err(validation_error("At least one adult is required"));
            }
            if booking.adults + booking.children > tour.max_group_size {
                return Err(validation_error(format!(
                    "This tour takes at most {} travellers",
                    tour.max_group_size
                )));
            }

            let created = Booking {
                id: format!("bk-{}", Uuid::new_v4().simple()),
                tour_id: tour.id.clone(),
                tour_title: Some(tour.title.clone()),
                user_id: Some(user.id.clone()),
                lead_name: booking.lead_name,
                email: booking.email,
                phone: booking.phone,
                start_date: booking.start_date,
                adults: booking.adults,
                children: booking.children,
                total_price: booking.total_price,
                currency: booking.currency,
                status: BookingStatus::Pending,
                special_requests: booking.special_requests,
                created_at: Some(Utc::now()),
            };
            state.idempotency.insert(idempotency_key, created.id.clone());
            state.bookings.push(created.clone());
            Ok(created)
        })
    }

    fn cancel_booking(&self, token: &str, id: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            let user = state.user_for_token(&token)?;
            let booking = state.booking_mut(&id)?;
            if booking.user_id.as_deref() != Some(user.id.as_str()) {
                return Err(not_found(format!("booking {}", id)));
            }
            if !booking.status.is_cancellable() {
                return Err(conflict("This booking can no longer be cancelled"));
            }
            booking.status = BookingStatus::Cancelled;
            Ok(())
        })
    }
}

impl AdminService for InMemorySafariService {
    fn list_users(&self, token: &str) -> BoxFuture<'_, Vec<User>> {
        let token = token.to_string();
        Box::pin(async move {
            let state = self.state()?;
            state.admin_for_token(&token)?;
            Ok(state.accounts.iter().map(|account| account.user.clone()).collect())
        })
    }

    fn update_user(&self, token: &str, id: &str, update: UserUpdate) -> BoxFuture<'_, User> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            state.admin_for_token(&token)?;
            let account = state.account_mut(&id)?;
            if let Some(role) = update.role {
                account.user.role = role;
            }
            if let Some(is_active) = update.is_active {
                account.user.is_active = is_active;
            }
            Ok(account.user.clone())
        })
    }

    fn delete_user(&self, token: &str, id: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            state.admin_for_token(&token)?;
            let before = state.accounts.len();
            state.accounts.retain(|account| account.user.id != id);
            if state.accounts.len() == before {
                return Err(not_found(format!("user {}", id)));
            }
            state.sessions.retain(|_, user_id| *user_id != id);
            Ok(())
        })
    }

    fn list_bookings(&self, token: &str) -> BoxFuture<'_, Vec<Booking>> {
        let token = token.to_string();
        Box::pin(async move {
            let state = self.state()?;
            state.admin_for_token(&token)?;
            Ok(state.bookings.clone())
        })
    }

    fn update_booking_status(
        &self,
        token: &str,
        id: &str,
        status: BookingStatus,
    ) -> BoxFuture<'_, Booking> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            state.admin_for_token(&token)?;
            let booking = state.booking_mut(&id)?;
            if !booking.status.can_transition_to(status) {
                return Err(conflict(format!(
                    "Cannot change a {} booking to {}",
                    booking.status.as_str(),
                    status.as_str()
                )));
            }
            booking.status = status;
            Ok(booking.clone())
        })
    }

    fn create_tour(&self, token: &str, tour: TourInput) -> BoxFuture<'_, Tour> {
        let token = token.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            state.admin_for_token(&token)?;
            let created = tour.into_tour(format!("tour-{}", Uuid::new_v4().simple()));
            state.tours.push(created.clone());
            Ok(created)
        })
    }

    fn update_tour(&self, token: &str, id: &str, tour: TourInput) -> BoxFuture<'_, Tour> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            state.admin_for_token(&token)?;
            let existing = state
                .tours
                .iter_mut()
                .find(|existing| existing.id == id)
                .ok_or_else(|| not_found(format!("tour {}", id)))?;
            *existing = tour.into_tour(id);
            Ok(existing.clone())
        })
    }

    fn delete_tour(&self, token: &str, id: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            let mut state = self.state()?;
            state.admin_for_token(&token)?;
            let has_open_bookings = state.bookings.iter().any(|booking| {
                booking.tour_id == id
                    && matches!(booking.status, BookingStatus::Pending | BookingStatus::Confirmed)
            });
            if has_open_bookings {
                return Err(conflict("This tour still has open bookings"));
            }
            let before = state.tours.len();
            state.tours.retain(|tour| tour.id != id);
            if state.tours.len() == before {
                return Err(not_found(format!("tour {}", id)));
            }
            Ok(())
        })
    }
}

impl ContactService for InMemorySafariService {
    fn send_enquiry(&self, message: ContactMessage) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.state()?.enquiries.push(message);
            Ok(())
        })
    }
}
