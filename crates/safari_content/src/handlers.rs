// File: crates/safari_content/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Form,
};
use leptos::prelude::*;
use safari_common::http::{error_response, html_response, redirect_response};
use safari_common::logging::log_error;
use safari_common::services::ServiceFactory;
use safari_common::session::{Flash, SessionManager};
use safari_common::ui::render_document;
use safari_common::SafariError;
use safari_config::AppConfig;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::content::SiteContent;
use crate::logic::{
    destination_options, featured_tours, filter_tours, find_visa, packing_list, search_faq,
    validate_enquiry, EnquiryForm, TourFilter, FEATURED_TOUR_COUNT,
};
use crate::views::{
    AboutPage, ContactPage, FaqPage, HomePage, PackingListPage, TourDetailPage, TourListPage,
    VisaDetailPage, VisaIndexPage,
};

// Define shared state needed by the content handlers
#[derive(Clone)]
pub struct ContentState {
    pub config: Arc<AppConfig>,
    pub services: Arc<dyn ServiceFactory>,
    pub sessions: SessionManager,
    pub content: Arc<SiteContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FaqQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PackingQuery {
    pub essentials: Option<String>,
}

impl PackingQuery {
    pub fn essentials_only(&self) -> bool {
        matches!(
            self.essentials.as_deref().map(str::trim),
            Some("true") | Some("1") | Some("on") | Some("yes")
        )
    }
}

pub async fn home_handler(State(state): State<Arc<ContentState>>, headers: HeaderMap) -> Response {
    let mut ctx = state.sessions.context(&headers);
    // The homepage still renders when the API is down, just without tours.
    let tours = match state.services.tour_service().list_tours().await {
        Ok(tours) => tours,
        Err(err) => {
            log_error(&err, "Failed to load tours for the homepage");
            Vec::new()
        }
    };
    let featured = featured_tours(&tours, FEATURED_TOUR_COUNT);
    let home = state.content.home.clone();

    let page = ctx.page(&state.config.site);
    let body = render_document("", &page, move || view! { <HomePage content=home featured=featured/> });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn tours_handler(
    State(state): State<Arc<ContentState>>,
    Query(filter): Query<TourFilter>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let tours = match state.services.tour_service().list_tours().await {
        Ok(tours) => tours,
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };
    let destinations = destination_options(&tours);
    let matching = filter_tours(&tours, &filter);

    let page = ctx.page(&state.config.site);
    let body = render_document("Tours", &page, move || {
        view! { <TourListPage tours=matching filter=filter destinations=destinations/> }
    });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn tour_detail_handler(
    State(state): State<Arc<ContentState>>,
    Path(tour_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let tour = match state.services.tour_service().get_tour(&tour_id).await {
        Ok(tour) if tour.is_active => tour,
        Ok(_) => {
            let err = SafariError::NotFoundError(format!("tour {} is not bookable", tour_id));
            return error_response(&mut ctx, &state.config.site, err);
        }
        Err(err) => return error_response(&mut ctx, &state.config.site, err),
    };

    let page = ctx.page(&state.config.site);
    let title = tour.title.clone();
    let body = render_document(&title, &page, move || view! { <TourDetailPage tour=tour/> });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn about_handler(State(state): State<Arc<ContentState>>, headers: HeaderMap) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let about = state.content.about.clone();
    let page = ctx.page(&state.config.site);
    let body = render_document("About us", &page, move || view! { <AboutPage content=about/> });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn faq_handler(
    State(state): State<Arc<ContentState>>,
    Query(query): Query<FaqQuery>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let categories = search_faq(&state.content.faq, query.q.as_deref());
    let text = query.q.unwrap_or_default();
    let page = ctx.page(&state.config.site);
    let body = render_document("FAQ", &page, move || view! { <FaqPage categories=categories query=text/> });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn visa_index_handler(State(state): State<Arc<ContentState>>, headers: HeaderMap) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let visas = state.content.visas.clone();
    let page = ctx.page(&state.config.site);
    let body = render_document("Visa information", &page, move || view! { <VisaIndexPage visas=visas/> });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn visa_detail_handler(
    State(state): State<Arc<ContentState>>,
    Path(country): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let Some(visa) = find_visa(&state.content.visas, &country).cloned() else {
        let err = SafariError::NotFoundError(format!("no visa information for {}", country));
        return error_response(&mut ctx, &state.config.site, err);
    };

    let page = ctx.page(&state.config.site);
    let title = format!("Visa information: {}", visa.country);
    let body = render_document(&title, &page, move || view! { <VisaDetailPage visa=visa/> });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn packing_list_handler(
    State(state): State<Arc<ContentState>>,
    Query(query): Query<PackingQuery>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let essentials_only = query.essentials_only();
    let categories = packing_list(&state.content.packing, essentials_only);
    let page = ctx.page(&state.config.site);
    let body = render_document("Packing list", &page, move || {
        view! { <PackingListPage categories=categories essentials_only=essentials_only/> }
    });
    html_response(StatusCode::OK, body, ctx.take_changes())
}

fn render_contact(
    state: &ContentState,
    page: &safari_common::PageContext,
    form: EnquiryForm,
    errors: Vec<String>,
) -> String {
    let email = state.config.site.contact_email.clone();
    let phone = state.config.site.contact_phone.clone();
    render_document("Contact", page, move || {
        view! { <ContactPage form=form errors=errors email=email phone=phone/> }
    })
}

pub async fn contact_form_handler(State(state): State<Arc<ContentState>>, headers: HeaderMap) -> Response {
    let mut ctx = state.sessions.context(&headers);
    // Signed-in visitors get their details pre-filled.
    let form = ctx
        .user()
        .map(|user| EnquiryForm {
            name: user.name.clone(),
            email: user.email.clone(),
            ..EnquiryForm::default()
        })
        .unwrap_or_default();
    let page = ctx.page(&state.config.site);
    let body = render_contact(&state, &page, form, Vec::new());
    html_response(StatusCode::OK, body, ctx.take_changes())
}

pub async fn contact_submit_handler(
    State(state): State<Arc<ContentState>>,
    headers: HeaderMap,
    Form(form): Form<EnquiryForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);

    let message = match validate_enquiry(&form) {
        Ok(message) => message,
        Err(errors) => {
            let page = ctx.page(&state.config.site);
            let body = render_contact(&state, &page, form, errors.messages());
            return html_response(StatusCode::UNPROCESSABLE_ENTITY, body, ctx.take_changes());
        }
    };

    match state.services.contact_service().send_enquiry(message).await {
        Ok(()) => {
            info!("contact enquiry received");
            let flash = Flash::success("Thank you! We have received your message and will reply shortly.");
            if let Err(err) = state.sessions.flash(&mut ctx.changes, flash) {
                log_error(&err, "Failed to set flash cookie");
            }
            redirect_response("/contact", ctx.take_changes())
        }
        Err(SafariError::ValidationError(message)) => {
            let page = ctx.page(&state.config.site);
            let body = render_contact(&state, &page, form, vec![message]);
            html_response(StatusCode::UNPROCESSABLE_ENTITY, body, ctx.take_changes())
        }
        Err(err) => {
            log_error(&err, "Failed to send contact enquiry");
            let page = ctx.page(&state.config.site);
            let errors = vec![err.user_message()];
            let body = render_contact(&state, &page, form, errors);
            html_response(StatusCode::BAD_GATEWAY, body, ctx.take_changes())
        }
    }
}
