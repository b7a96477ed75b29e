// File: crates/safari_booking/src/handlers.rs
use axum::{
    extract::{OriginalUri, Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Form,
};
use chrono::NaiveDate;
use leptos::prelude::*;
use safari_common::format::{site_timezone, today_in};
use safari_common::http::{error_response, html_response, login_redirect, redirect_response, request_target};
use safari_common::logging::log_error;
use safari_common::models::Tour;
use safari_common::services::ServiceFactory;
use safari_common::session::{Flash, RequestContext, Session, SessionManager, BOOKING_COOKIE};
use safari_common::ui::render_document;
use safari_common::SafariError;
use safari_config::AppConfig;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::logic::{
    first_incomplete_step, quote_for, sort_bookings, to_new_booking, validate_travellers,
    validate_trip, BookingDraft, BookingRules, BookingStep, TravellerForm, TripForm,
};
use crate::views::{MyBookingsPage, ReviewStepPage, TravellersStepPage, TripStepPage};

const DRAFT_TOO_LARGE: &str =
    "Your special requests are too long for us to keep between steps. Please shorten them.";

// Define shared state needed by the booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub services: Arc<dyn ServiceFactory>,
    pub sessions: SessionManager,
    pub rules: BookingRules,
}

impl BookingState {
    fn today(&self) -> NaiveDate {
        today_in(site_timezone(&self.config.site.timezone))
    }

    fn draft(&self, headers: &HeaderMap) -> Option<BookingDraft> {
        self.sessions.read::<BookingDraft>(headers, BOOKING_COOKIE)
    }

    fn save_draft(&self, ctx: &mut RequestContext, draft: &BookingDraft) -> Result<(), SafariError> {
        self.sessions.write(&mut ctx.changes, BOOKING_COOKIE, draft, false)
    }

    fn set_flash(&self, ctx: &mut RequestContext, flash: Flash) {
        if let Err(err) = self.sessions.flash(&mut ctx.changes, flash) {
            log_error(&err, "Failed to set flash cookie");
        }
    }

    /// The tour being booked; inactive tours cannot be booked.
    async fn bookable_tour(&self, tour_id: &str) -> Result<Tour, SafariError> {
        let tour = self.services.tour_service().get_tour(tour_id).await?;
        if !tour.is_active {
            return Err(SafariError::NotFoundError(format!("tour {} is not bookable", tour_id)));
        }
        Ok(tour)
    }
}

/// The signed-in session, or a redirect to the login page that returns here.
fn require_session(ctx: &mut RequestContext, uri: &OriginalUri) -> Result<Session, Response> {
    require_session_or(ctx, &request_target(&uri.0))
}

/// Like [`require_session`] for form posts: after signing in the browser
/// follows `next` with a GET, so it must name a page, not the POST target.
fn require_session_or(ctx: &mut RequestContext, next: &str) -> Result<Session, Response> {
    match ctx.session.clone() {
        Some(session) => Ok(session),
        None => Err(login_redirect(next, ctx.take_changes())),
    }
}

/// The draft for `tour_id` if one is stored.
fn draft_for_tour(state: &BookingState, headers: &HeaderMap, tour_id: &str) -> Option<BookingDraft> {
    state.draft(headers).filter(|draft| draft.tour_id == tour_id)
}

fn render_trip(
    state: &BookingState,
    ctx: &mut RequestContext,
    status: StatusCode,
    tour: Tour,
    form: TripForm,
    errors: Vec<String>,
) -> Response {
    let earliest = state.rules.earliest_start(state.today());
    let max_travellers = state.rules.max_travellers_for(&tour);
    let child_rate_percent = state.rules.child_rate_percent;
    let title = format!("Book {}", tour.title);

    let page = ctx.page(&state.config.site);
    let body = render_document(&title, &page, move || {
        view! {
            <TripStepPage
                tour=tour
                form=form
                errors=errors
                earliest=earliest
                max_travellers=max_travellers
                child_rate_percent=child_rate_percent
            />
        }
    });
    html_response(status, body, ctx.take_changes())
}

pub async fn trip_form_handler(
    State(state): State<Arc<BookingState>>,
    Path(tour_id): Path<String>,
    uri: OriginalUri,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    if let Err(redirect) = require_session(&mut ctx, &uri) {
        return redirect;
    }
    let tour = match state.bookable_tour(&tour_id).await {
        Ok(tour) => tour,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };

    let existing = state.draft(&headers);
    if existing.as_ref().is_some_and(|draft| draft.tour_id != tour.id) {
        debug!("discarding booking draft for another tour");
    }
    let draft = BookingDraft::resume_or_new(existing, &tour);
    let form = TripForm::from_draft(&draft, state.rules.max_travellers_for(&tour));
    render_trip(&state, &mut ctx, StatusCode::OK, tour, form, Vec::new())
}

pub async fn trip_submit_handler(
    State(state): State<Arc<BookingState>>,
    Path(tour_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<TripForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    if let Err(redirect) = require_session_or(&mut ctx, &BookingStep::Trip.path(&tour_id)) {
        return redirect;
    }
    let tour = match state.bookable_tour(&tour_id).await {
        Ok(tour) => tour,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };

    let trip = match validate_trip(&form, &tour, &state.rules, state.today()) {
        Ok(trip) => trip,
        Err(errors) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            return render_trip(&state, &mut ctx, status, tour, form, errors.messages());
        }
    };

    let mut draft = BookingDraft::resume_or_new(state.draft(&headers), &tour);
    draft.apply_trip(trip);
    if let Err(err) = state.save_draft(&mut ctx, &draft) {
        return error_response(&mut ctx, &state.config.site, err);
    }
    redirect_response(&BookingStep::Travellers.path(&tour.id), ctx.take_changes())
}

fn render_travellers(
    state: &BookingState,
    ctx: &mut RequestContext,
    status: StatusCode,
    draft: &BookingDraft,
    form: TravellerForm,
    errors: Vec<String>,
) -> Response {
    let tour_id = draft.tour_id.clone();
    let tour_title = draft.tour_title.clone();
    let page = ctx.page(&state.config.site);
    let body = render_document("Lead traveller", &page, move || {
        view! { <TravellersStepPage tour_id=tour_id tour_title=tour_title form=form errors=errors/> }
    });
    html_response(status, body, ctx.take_changes())
}

/// Sends the visitor back to the first step they have not completed.
fn redirect_to_step(ctx: &mut RequestContext, tour_id: &str, step: BookingStep) -> Response {
    redirect_response(&step.path(tour_id), ctx.take_changes())
}

pub async fn travellers_form_handler(
    State(state): State<Arc<BookingState>>,
    Path(tour_id): Path<String>,
    uri: OriginalUri,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let session = match require_session(&mut ctx, &uri) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };

    let Some(mut draft) = draft_for_tour(&state, &headers, &tour_id).filter(BookingDraft::trip_complete) else {
        return redirect_to_step(&mut ctx, &tour_id, BookingStep::Trip);
    };
    draft.prefill_contact(&session.user);
    let form = TravellerForm::from_draft(&draft);
    render_travellers(&state, &mut ctx, StatusCode::OK, &draft, form, Vec::new())
}

pub async fn travellers_submit_handler(
    State(state): State<Arc<BookingState>>,
    Path(tour_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<TravellerForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    if let Err(redirect) = require_session_or(&mut ctx, &BookingStep::Travellers.path(&tour_id)) {
        return redirect;
    }

    let Some(mut draft) = draft_for_tour(&state, &headers, &tour_id).filter(BookingDraft::trip_complete) else {
        return redirect_to_step(&mut ctx, &tour_id, BookingStep::Trip);
    };

    let travellers = match validate_travellers(&form) {
        Ok(travellers) => travellers,
        Err(errors) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            return render_travellers(&state, &mut ctx, status, &draft, form, errors.messages());
        }
    };

    draft.apply_travellers(travellers);
    match state.save_draft(&mut ctx, &draft) {
        Ok(()) => {}
        Err(SafariError::ValidationError(_)) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            let errors = vec![DRAFT_TOO_LARGE.to_string()];
            return render_travellers(&state, &mut ctx, status, &draft, form, errors);
        }
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    }
    redirect_response(&BookingStep::Review.path(&tour_id), ctx.take_changes())
}

async fn render_review(
    state: &BookingState,
    ctx: &mut RequestContext,
    status: StatusCode,
    draft: BookingDraft,
    errors: Vec<String>,
) -> Response {
    let tour = match state.bookable_tour(&draft.tour_id).await {
        Ok(tour) => tour,
        Err(err) => return error_response(ctx, &state.config.site, err),
    };
    let quote = quote_for(&draft, &tour, &state.rules);
    let page = ctx.page(&state.config.site);
    let body = render_document("Review your booking", &page, move || {
        view! { <ReviewStepPage draft=draft quote=quote errors=errors/> }
    });
    html_response(status, body, ctx.take_changes())
}

pub async fn review_handler(
    State(state): State<Arc<BookingState>>,
    Path(tour_id): Path<String>,
    uri: OriginalUri,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    if let Err(redirect) = require_session(&mut ctx, &uri) {
        return redirect;
    }

    let draft = draft_for_tour(&state, &headers, &tour_id);
    if let Some(step) = first_incomplete_step(draft.as_ref()) {
        return redirect_to_step(&mut ctx, &tour_id, step);
    }
    let Some(draft) = draft else {
        return redirect_to_step(&mut ctx, &tour_id, BookingStep::Trip);
    };
    render_review(&state, &mut ctx, StatusCode::OK, draft, Vec::new()).await
}

pub async fn confirm_handler(
    State(state): State<Arc<BookingState>>,
    Path(tour_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let session = match require_session_or(&mut ctx, &BookingStep::Review.path(&tour_id)) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };

    let draft = draft_for_tour(&state, &headers, &tour_id);
    if let Some(step) = first_incomplete_step(draft.as_ref()) {
        return redirect_to_step(&mut ctx, &tour_id, step);
    }
    let Some(draft) = draft else {
        return redirect_to_step(&mut ctx, &tour_id, BookingStep::Trip);
    };

    let tour = match state.bookable_tour(&tour_id).await {
        Ok(tour) => tour,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };

    // The draft may have been sitting in the cookie for a while.
    let trip_form = TripForm::from_draft(&draft, state.rules.max_travellers_for(&tour));
    if let Err(errors) = validate_trip(&trip_form, &tour, &state.rules, state.today()) {
        state.set_flash(&mut ctx, Flash::error(errors.messages().join(" ")));
        return redirect_to_step(&mut ctx, &tour_id, BookingStep::Trip);
    }

    let quote = quote_for(&draft, &tour, &state.rules);
    let Some(new_booking) = to_new_booking(&draft, &quote) else {
        return redirect_to_step(&mut ctx, &tour_id, BookingStep::Trip);
    };

    let result = state
        .services
        .booking_service()
        .create_booking(&session.token, new_booking, &draft.id)
        .await;
    match result {
        Ok(booking) => {
            info!("booking {} created for tour {}", booking.id, booking.tour_id);
            state.sessions.remove(&mut ctx.changes, BOOKING_COOKIE);
            state.set_flash(
                &mut ctx,
                Flash::success("Thank you! Your booking has been received and is awaiting confirmation."),
            );
            redirect_response("/my-bookings", ctx.take_changes())
        }
        Err(SafariError::ValidationError(message)) | Err(SafariError::ConflictError(message)) => {
            warn!("booking rejected by API: {}", message);
            render_review(&state, &mut ctx, StatusCode::UNPROCESSABLE_ENTITY, draft, vec![message]).await
        }
        Err(err) => error_response(&mut ctx, &state.config.site, err),
    }
}

pub async fn my_bookings_handler(
    State(state): State<Arc<BookingState>>,
    uri: OriginalUri,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let session = match require_session(&mut ctx, &uri) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };

    let mut bookings = match state.services.booking_service().my_bookings(&session.token).await {
        Ok(bookings) => bookings,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };
    sort_bookings(&mut bookings);

    let page = ctx.page(&state.config.site);
    let body = render_document("My bookings", &page, move || view! { <MyBookingsPage bookings=bookings/> });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn cancel_booking_handler(
    State(state): State<Arc<BookingState>>,
    Path(booking_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let Some(session) = ctx.session.clone() else {
        return login_redirect("/my-bookings", ctx.take_changes());
    };

    match state
        .services
        .booking_service()
        .cancel_booking(&session.token, &booking_id)
        .await
    {
        Ok(()) => {
            info!("booking {} cancelled by user {}", booking_id, session.user.id);
            state.set_flash(&mut ctx, Flash::success("Your booking has been cancelled."));
        }
        Err(err @ SafariError::AuthError(_)) => {
            return error_response(&mut ctx, &state.config.site, err);
        }
        Err(SafariError::ConflictError(message)) => {
            warn!("cancellation of booking {} refused: {}", booking_id, message);
            state.set_flash(&mut ctx, Flash::error(message));
        }
        Err(SafariError::NotFoundError(_)) => {
            state.set_flash(&mut ctx, Flash::error("We could not find that booking."));
        }
        Err(err) => {
            log_error(&err, "Failed to cancel booking");
            state.set_flash(&mut ctx, Flash::error(err.user_message()));
        }
    }
    redirect_response("/my-bookings", ctx.take_changes())
}
