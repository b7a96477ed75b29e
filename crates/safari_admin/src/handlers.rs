// File: crates/safari_admin/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Extension, Form,
};
use leptos::prelude::*;
use safari_common::http::{error_response, html_response, redirect_response};
use safari_common::logging::log_error;
use safari_common::services::ServiceFactory;
use safari_common::session::{Flash, RequestContext, Session, SessionManager};
use safari_common::ui::render_document;
use safari_common::SafariError;
use safari_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

use crate::logic::{
    check_self_delete, check_self_update, filter_bookings, filter_users, paginate, parse_status_change,
    parse_user_update, users_return_path, validate_tour_form, BookingFilter, DashboardStats, DeleteUserForm,
    StatusForm, TourForm, UserFilter, UserUpdateForm,
};
use crate::views::{BookingsPage, DashboardPage, TourEditorPage, ToursPage, UsersPage};

// Define shared state needed by the admin handlers
#[derive(Clone)]
pub struct AdminState {
    pub config: Arc<AppConfig>,
    pub services: Arc<dyn ServiceFactory>,
    pub sessions: SessionManager,
}

impl AdminState {
    fn set_flash(&self, ctx: &mut RequestContext, flash: Flash) {
        if let Err(err) = self.sessions.flash(&mut ctx.changes, flash) {
            log_error(&err, "Failed to set flash cookie");
        }
    }

    fn page_size(&self) -> usize {
        self.config.admin.page_size
    }

    /// Flashes the outcome of a POSTed action and redirects to `location`.
    ///
    /// A rejected token still ends the session.
    fn finish_action(
        &self,
        ctx: &mut RequestContext,
        result: Result<String, SafariError>,
        action: &str,
        location: &str,
    ) -> Response {
        match result {
            Ok(message) => self.set_flash(ctx, Flash::success(message)),
            Err(err @ SafariError::AuthError(_)) => return error_response(ctx, &self.config.site, err),
            Err(err) => {
                if is_refusal(&err) {
                    warn!("{} refused: {}", action, err);
                } else {
                    log_error(&err, action);
                }
                self.set_flash(ctx, Flash::error(action_message(&err)));
            }
        }
        redirect_response(location, ctx.take_changes())
    }
}

/// Errors caused by the request rather than by the backend.
fn is_refusal(err: &SafariError) -> bool {
    matches!(
        err,
        SafariError::ForbiddenError(_)
            | SafariError::ValidationError(_)
            | SafariError::ConflictError(_)
            | SafariError::NotFoundError(_)
    )
}

/// Admins see why an action was refused.
fn action_message(err: &SafariError) -> String {
    match err {
        SafariError::ForbiddenError(message)
        | SafariError::ValidationError(message)
        | SafariError::ConflictError(message) => message.clone(),
        SafariError::NotFoundError(_) => "That record no longer exists.".to_string(),
        other => other.user_message(),
    }
}

pub async fn dashboard_handler(
    State(state): State<Arc<AdminState>>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let admin = state.services.admin_service();
    let tours = state.services.tour_service();

    let loaded = tokio::try_join!(
        admin.list_users(&session.token),
        tours.list_tours(),
        admin.list_bookings(&session.token),
    );
    let (users, tours, bookings) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };
    let stats = DashboardStats::compute(&users, &tours, &bookings);

    let page = ctx.page(&state.config.site);
    let body = render_document("Admin dashboard", &page, move || view! { <DashboardPage stats=stats/> });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn users_handler(
    State(state): State<Arc<AdminState>>,
    Extension(session): Extension<Session>,
    Query(filter): Query<UserFilter>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let users = match state.services.admin_service().list_users(&session.token).await {
        Ok(users) => users,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };
    let users = paginate(filter_users(&users, &filter), filter.page(), state.page_size());
    let current_user_id = session.user.id.clone();

    let page = ctx.page(&state.config.site);
    let body = render_document("Users", &page, move || {
        view! { <UsersPage users=users filter=filter current_user_id=current_user_id/> }
    });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn update_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<UserUpdateForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let location = users_return_path(form.return_to.as_deref());

    let result = async {
        let update = parse_user_update(&form)?;
        check_self_update(&session.user.id, &user_id, &update)?;
        let user = state
            .services
            .admin_service()
            .update_user(&session.token, &user_id, update)
            .await?;
        info!("admin {} updated user {}", session.user.id, user.id);
        Ok::<_, SafariError>(format!("Updated {}.", user.name))
    }
    .await;
    state.finish_action(&mut ctx, result, "Failed to update user", &location)
}

pub async fn delete_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<DeleteUserForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let location = users_return_path(form.return_to.as_deref());

    let result = async {
        check_self_delete(&session.user.id, &user_id)?;
        state
            .services
            .admin_service()
            .delete_user(&session.token, &user_id)
            .await?;
        info!("admin {} deleted user {}", session.user.id, user_id);
        Ok::<_, SafariError>("The account has been deleted.".to_string())
    }
    .await;
    state.finish_action(&mut ctx, result, "Failed to delete user", &location)
}

pub async fn bookings_handler(
    State(state): State<Arc<AdminState>>,
    Extension(session): Extension<Session>,
    Query(filter): Query<BookingFilter>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let bookings = match state.services.admin_service().list_bookings(&session.token).await {
        Ok(bookings) => bookings,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };
    let bookings = paginate(filter_bookings(&bookings, &filter), filter.page(), state.page_size());

    let page = ctx.page(&state.config.site);
    let body = render_document("Bookings", &page, move || {
        view! { <BookingsPage bookings=bookings filter=filter/> }
    });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn booking_status_handler(
    State(state): State<Arc<AdminState>>,
    Extension(session): Extension<Session>,
    Path(booking_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<StatusForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let admin = state.services.admin_service();

    let result = async {
        let bookings = admin.list_bookings(&session.token).await?;
        let current = bookings
            .iter()
            .find(|booking| booking.id == booking_id)
            .map(|booking| booking.status)
            .ok_or_else(|| SafariError::NotFoundError(format!("booking {}", booking_id)))?;
        let next = parse_status_change(current, &form)?;
        let booking = admin.update_booking_status(&session.token, &booking_id, next).await?;
        info!(
            "admin {} moved booking {} from {} to {}",
            session.user.id,
            booking.id,
            current.as_str(),
            booking.status.as_str()
        );
        Ok::<_, SafariError>(format!("Booking {} is now {}.", booking.id, booking.status.label().to_lowercase()))
    }
    .await;
    state.finish_action(&mut ctx, result, "Failed to change booking status", "/admin/bookings")
}

pub async fn tours_handler(
    State(state): State<Arc<AdminState>>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let tours = match state.services.tour_service().list_tours().await {
        Ok(tours) => tours,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };

    let page = ctx.page(&state.config.site);
    let body = render_document("Manage tours", &page, move || view! { <ToursPage tours=tours/> });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

fn render_editor(
    state: &AdminState,
    ctx: &mut RequestContext,
    status: StatusCode,
    tour_id: Option<String>,
    form: TourForm,
    errors: Vec<String>,
) -> Response {
    let title = if tour_id.is_some() { "Edit tour" } else { "New tour" };
    let page = ctx.page(&state.config.site);
    let body = render_document(title, &page, move || {
        view! { <TourEditorPage tour_id=tour_id form=form errors=errors/> }
    });
    html_response(status, body, ctx.take_changes())
}

pub async fn new_tour_handler(
    State(state): State<Arc<AdminState>>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let form = TourForm::blank(&state.config.booking.currency);
    render_editor(&state, &mut ctx, StatusCode::OK, None, form, Vec::new())
}

pub async fn create_tour_handler(
    State(state): State<Arc<AdminState>>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    Form(form): Form<TourForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let input = match validate_tour_form(&form) {
        Ok(input) => input,
        Err(errors) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            return render_editor(&state, &mut ctx, status, None, form, errors.messages());
        }
    };

    match state.services.admin_service().create_tour(&session.token, input).await {
        Ok(tour) => {
            info!("admin {} created tour {}", session.user.id, tour.id);
            state.set_flash(&mut ctx, Flash::success(format!("Created {}.", tour.title)));
            redirect_response("/admin/tours", ctx.take_changes())
        }
        Err(SafariError::ValidationError(message)) | Err(SafariError::ConflictError(message)) => {
            warn!("tour rejected by API: {}", message);
            render_editor(&state, &mut ctx, StatusCode::UNPROCESSABLE_ENTITY, None, form, vec![message])
        }
        Err(err) => error_response(&mut ctx, &state.config.site, err),
    }
}

pub async fn edit_tour_handler(
    State(state): State<Arc<AdminState>>,
    Path(tour_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let tour = match state.services.tour_service().get_tour(&tour_id).await {
        Ok(tour) => tour,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };
    let form = TourForm::from_tour(&tour);
    render_editor(&state, &mut ctx, StatusCode::OK, Some(tour.id), form, Vec::new())
}

pub async fn update_tour_handler(
    State(state): State<Arc<AdminState>>,
    Extension(session): Extension<Session>,
    Path(tour_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<TourForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let input = match validate_tour_form(&form) {
        Ok(input) => input,
        Err(errors) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            return render_editor(&state, &mut ctx, status, Some(tour_id), form, errors.messages());
        }
    };

    match state
        .services
        .admin_service()
        .update_tour(&session.token, &tour_id, input)
        .await
    {
        Ok(tour) => {
            info!("admin {} updated tour {}", session.user.id, tour.id);
            state.set_flash(&mut ctx, Flash::success(format!("Saved {}.", tour.title)));
            redirect_response("/admin/tours", ctx.take_changes())
        }
        Err(SafariError::ValidationError(message)) | Err(SafariError::ConflictError(message)) => {
            warn!("tour {} rejected by API: {}", tour_id, message);
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            render_editor(&state, &mut ctx, status, Some(tour_id), form, vec![message])
        }
        Err(err) => error_response(&mut ctx, &state.config.site, err),
    }
}

pub async fn delete_tour_handler(
    State(state): State<Arc<AdminState>>,
    Extension(session): Extension<Session>,
    Path(tour_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let result = state
        .services
        .admin_service()
        .delete_tour(&session.token, &tour_id)
        .await
        .map(|()| {
            info!("admin {} deleted tour {}", session.user.id, tour_id);
            "The tour has been deleted.".to_string()
        });
    state.finish_action(&mut ctx, result, "Failed to delete tour", "/admin/tours")
}
