// --- File: crates/safari_api/src/factory.rs ---
//! [`ServiceFactory`] over a single backend that implements every trait.

use std::sync::Arc;

use safari_common::services::{
    AdminService, AuthService, BookingService, ContactService, ServiceFactory, TourService,
};

/// Hands out one shared backend as each of the service traits.
///
/// Used with [`crate::RemoteSafariService`] in production and with
/// [`crate::InMemorySafariService`] in demo mode and tests.
pub struct SharedServiceFactory<T> {
    backend: Arc<T>,
}

impl<T> SharedServiceFactory<T> {
    pub fn new(backend: Arc<T>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> Arc<T> {
        self.backend.clone()
    }
}

impl<T> ServiceFactory for SharedServiceFactory<T>
where
    T: AuthService + TourService + BookingService + AdminService + ContactService + 'static,
{
    fn auth_service(&self) -> Arc<dyn AuthService> {
        self.backend.clone()
    }

    fn tour_service(&self) -> Arc<dyn TourService> {
        self.backend.clone()
    }

    fn booking_service(&self) -> Arc<dyn BookingService> {
        self.backend.clone()
    }

    fn admin_service(&self) -> Arc<dyn AdminService> {
        self.backend.clone()
    }

    fn contact_service(&self) -> Arc<dyn ContactService> {
        self.backend.clone()
    }
}
