// --- File: crates/safari_api/src/service.rs ---
//! Service traits implemented on top of the remote REST API.

use reqwest::Method;
use safari_common::models::{
    AuthSession, Booking, BookingStatus, BookingStatusUpdate, ContactMessage, LoginRequest,
    NewBooking, RegisterRequest, Tour, TourInput, User, UserUpdate,
};
use safari_common::services::{
    AdminService, AuthService, BookingService, BoxFuture, ContactService, TourService,
};
use serde::Serialize;
use tracing::info;

use crate::client::ApiClient;

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct PasswordBody<'a> {
    password: &'a str,
}

/// Every service trait, backed by [`ApiClient`].
#[derive(Clone, Debug)]
pub struct RemoteSafariService {
    api: ApiClient,
}

impl RemoteSafariService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl AuthService for RemoteSafariService {
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, AuthSession> {
        Box::pin(async move {
            let session: AuthSession = self
                .api
                .send(Method::POST, &["auth", "login"], None, &request)
                .await?;
            info!("user {} signed in", session.user.id);
            Ok(session)
        })
    }

    fn register(&self, request: RegisterRequest) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.api
                .send_unit(Method::POST, &["auth", "register"], None, &request)
                .await?;
            Ok(())
        })
    }

    fn verify_email(&self, token: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        Box::pin(async move {
            self.api
                .call(Method::POST, &["auth", "verify-email", &token], None)
                .await?;
            Ok(())
        })
    }

    fn forgot_password(&self, email: &str) -> BoxFuture<'_, ()> {
        let email = email.to_string();
        Box::pin(async move {
            self.api
                .send_unit(Method::POST, &["auth", "forgot-password"], None, &EmailBody { email: &email })
                .await?;
            Ok(())
        })
    }

    fn reset_password(&self, token: &str, password: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        let password = password.to_string();
        Box::pin(async move {
            self.api
                .send_unit(
                    Method::POST,
                    &["auth", "reset-password", &token],
                    None,
                    &PasswordBody { password: &password },
                )
                .await?;
            Ok(())
        })
    }
}

impl TourService for RemoteSafariService {
    fn list_tours(&self) -> BoxFuture<'_, Vec<Tour>> {
        Box::pin(async move { Ok(self.api.get(&["tours"], None).await?) })
    }

    fn get_tour(&self, id: &str) -> BoxFuture<'_, Tour> {
        let id = id.to_string();
        Box::pin(async move { Ok(self.api.get(&["tours", &id], None).await?) })
    }
}

impl BookingService for RemoteSafariService {
    fn my_bookings(&self, token: &str) -> BoxFuture<'_, Vec<Booking>> {
        let token = token.to_string();
        Box::pin(async move { Ok(self.api.get(&["bookings", "my-bookings"], Some(&token)).await?) })
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
            let created: Booking = self
                .api
                .post_idempotent(&["bookings"], Some(&token), &booking, &idempotency_key)
                .await?;
            info!("booking {} created for tour {}", created.id, created.tour_id);
            Ok(created)
        })
    }

    fn cancel_booking(&self, token: &str, id: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            self.api
                .call(Method::DELETE, &["bookings", &id], Some(&token))
                .await?;
            info!("booking {} cancelled", id);
            Ok(())
        })
    }
}

impl AdminService for RemoteSafariService {
    fn list_users(&self, token: &str) -> BoxFuture<'_, Vec<User>> {
        let token = token.to_string();
        Box::pin(async move { Ok(self.api.get(&["admin", "users"], Some(&token)).await?) })
    }

    fn update_user(&self, token: &str, id: &str, update: UserUpdate) -> BoxFuture<'_, User> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            Ok(self
                .api
                .send(Method::PATCH, &["admin", "users", &id], Some(&token), &update)
                .await?)
        })
    }

    fn delete_user(&self, token: &str, id: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            self.api
                .call(Method::DELETE, &["admin", "users", &id], Some(&token))
                .await?;
            Ok(())
        })
    }

    fn list_bookings(&self, token: &str) -> BoxFuture<'_, Vec<Booking>> {
        let token = token.to_string();
        Box::pin(async move { Ok(self.api.get(&["admin", "bookings"], Some(&token)).await?) })
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
            Ok(self
                .api
                .send(
                    Method::PATCH,
                    &["admin", "bookings", &id],
                    Some(&token),
                    &BookingStatusUpdate { status },
                )
                .await?)
        })
    }

    fn create_tour(&self, token: &str, tour: TourInput) -> BoxFuture<'_, Tour> {
        let token = token.to_string();
        Box::pin(async move { Ok(self.api.send(Method::POST, &["tours"], Some(&token), &tour).await?) })
    }

    fn update_tour(&self, token: &str, id: &str, tour: TourInput) -> BoxFuture<'_, Tour> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            Ok(self
                .api
                .send(Method::PUT, &["tours", &id], Some(&token), &tour)
                .await?)
        })
    }

    fn delete_tour(&self, token: &str, id: &str) -> BoxFuture<'_, ()> {
        let token = token.to_string();
        let id = id.to_string();
        Box::pin(async move {
            self.api
                .call(Method::DELETE, &["tours", &id], Some(&token))
                .await?;
            Ok(())
        })
    }
}

impl ContactService for RemoteSafariService {
    fn send_enquiry(&self, message: ContactMessage) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.api
                .send_unit(Method::POST, &["contact"], None, &message)
                .await?;
            Ok(())
        })
    }
}
