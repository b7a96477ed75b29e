// --- File: crates/safari_common/src/services.rs ---
//! Service abstractions for the remote safari API.
//!
//! Handlers only talk to these traits. The production implementation lives in
//! `safari_api` (HTTP), and an in-memory implementation backs the tests and
//! the demo mode.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::SafariError;
use crate::models::{
    AuthSession, Booking, BookingStatus, ContactMessage, LoginRequest, NewBooking,
    RegisterRequest, Tour, TourInput, User, UserUpdate,
};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E = SafariError> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Account operations that do not need a session.
pub trait AuthService: Send + Sync {
    /// `POST /auth/login`
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, AuthSession>;

    /// `POST /auth/register`
    fn register(&self, request: RegisterRequest) -> BoxFuture<'_, ()>;

    /// `POST /auth/verify-email/:token`
    fn verify_email(&self, token: &str) -> BoxFuture<'_, ()>;

    /// `POST /auth/forgot-password`
    fn forgot_password(&self, email: &str) -> BoxFuture<'_, ()>;

    /// `POST /auth/reset-password/:token`
    fn reset_password(&self, token: &str, password: &str) -> BoxFuture<'_, ()>;
}

/// Public tour catalogue.
pub trait TourService: Send + Sync {
    /// `GET /tours`
    fn list_tours(&self) -> BoxFuture<'_, Vec<Tour>>;

    /// `GET /tours/:id`
    fn get_tour(&self, id: &str) -> BoxFuture<'_, Tour>;
}

/// Bookings of the signed-in customer. `token` is the API bearer token.
pub trait BookingService: Send + Sync {
    /// `GET /bookings/my-bookings`
    fn my_bookings(&self, token: &str) -> BoxFuture<'_, Vec<Booking>>;

    /// `POST /bookings`; `idempotency_key` is sent as the `Idempotency-Key` header.
    fn create_booking(
        &self,
        token: &str,
        booking: NewBooking,
        idempotency_key: &str,
    ) -> BoxFuture<'_, Booking>;

    /// `DELETE /bookings/:id`
    fn cancel_booking(&self, token: &str, id: &str) -> BoxFuture<'_, ()>;
}

/// Admin-only operations.
pub trait AdminService: Send + Sync {
    fn list_users(&self, token: &str) -> BoxFuture<'_, Vec<User>>;

    /// `PATCH /admin/users/:id`
    fn update_user(&self, token: &str, id: &str, update: UserUpdate) -> BoxFuture<'_, User>;

    fn delete_user(&self, token: &str, id: &str) -> BoxFuture<'_, ()>;

    fn list_bookings(&self, token: &str) -> BoxFuture<'_, Vec<Booking>>;

    fn update_booking_status(
        &self,
        token: &str,
        id: &str,
        status: BookingStatus,
    ) -> BoxFuture<'_, Booking>;

    fn create_tour(&self, token: &str, tour: TourInput) -> BoxFuture<'_, Tour>;

    fn update_tour(&self, token: &str, id: &str, tour: TourInput) -> BoxFuture<'_, Tour>;

    fn delete_tour(&self, token: &str, id: &str) -> BoxFuture<'_, ()>;
}

/// Enquiries from the contact page.
pub trait ContactService: Send + Sync {
    /// `POST /contact`
    fn send_enquiry(&self, message: ContactMessage) -> BoxFuture<'_, ()>;
}

/// A factory for creating service instances.
///
/// The service binary builds one factory at startup (remote API or demo
/// data) and hands it to every feature router.
pub trait ServiceFactory: Send + Sync {
    fn auth_service(&self) -> Arc<dyn AuthService>;

    fn tour_service(&self) -> Arc<dyn TourService>;

    fn booking_service(&self) -> Arc<dyn BookingService>;

    fn admin_service(&self) -> Arc<dyn AdminService>;

    fn contact_service(&self) -> Arc<dyn ContactService>;
}
