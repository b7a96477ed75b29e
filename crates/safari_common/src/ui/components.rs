// --- File: crates/safari_common/src/ui/components.rs ---
use leptos::prelude::*;

use crate::models::BookingStatus;
use crate::session::Flash;
use super::status_title;

#[component]
pub fn Toast(flash: Flash) -> impl IntoView {
    view! {
        <div class=flash.kind.css_class() role="status">
            <div class="container">{flash.message}</div>
        </div>
    }
}

/// Validation messages shown above a form.
#[component]
pub fn FormError(errors: Vec<String>) -> impl IntoView {
    (!errors.is_empty()).then(|| {
        view! {
            <div class="form-errors" role="alert">
                <ul>
                    {errors.into_iter().map(|error| view! { <li>{error}</li> }).collect_view()}
                </ul>
            </div>
        }
    })
}

#[component]
pub fn StatusBadge(status: BookingStatus) -> impl IntoView {
    let class = format!("badge badge-{}", status.as_str());
    view! { <span class=class>{status.label()}</span> }
}

#[component]
pub fn EmptyState(
    title: String,
    message: String,
    /// Optional `(href, label)` call to action.
    action: Option<(String, String)>,
) -> impl IntoView {
    view! {
        <div class="empty-state">
            <h3>{title}</h3>
            <p class="muted">{message}</p>
            {action.map(|(href, label)| view! { <a href=href class="button">{label}</a> })}
        </div>
    }
}

/// Builds the link to `page`, keeping the other query parameters.
pub fn page_href(base_path: &str, query: &[(String, String)], page: usize) -> String {
    let mut pairs: Vec<(&str, String)> = query
        .iter()
        .filter(|(key, value)| key != "page" && !value.is_empty())
        .map(|(key, value)| (key.as_str(), value.clone()))
        .collect();
    pairs.push(("page", page.to_string()));
    let encoded = serde_urlencoded::to_string(&pairs).unwrap_or_default();
    format!("{}?{}", base_path, encoded)
}

/// Previous / numbered / next links. Renders nothing for a single page.
#[component]
pub fn Pagination(
    base_path: String,
    query: Vec<(String, String)>,
    page: usize,
    total_pages: usize,
) -> impl IntoView {
    (total_pages > 1).then(move || {
        let previous = (page > 1).then(|| {
            let href = page_href(&base_path, &query, page - 1);
            view! { <a href=href class="page-link" rel="prev">"Previous"</a> }
        });
        let next = (page < total_pages).then(|| {
            let href = page_href(&base_path, &query, page + 1);
            view! { <a href=href class="page-link" rel="next">"Next"</a> }
        });
        let numbers = (1..=total_pages)
            .map(|number| {
                if number == page {
                    view! { <span class="page-link current" aria-current="page">{number.to_string()}</span> }
                        .into_any()
                } else {
                    let href = page_href(&base_path, &query, number);
                    view! { <a href=href class="page-link">{number.to_string()}</a> }.into_any()
                }
            })
            .collect_view();

        view! {
            <nav class="pagination" aria-label="Pagination">
                {previous}
                {numbers}
                {next}
            </nav>
        }
    })
}

#[component]
pub fn ErrorPage(status: u16, message: String) -> impl IntoView {
    view! {
        <section class="error-page">
            <p class="error-code">{status.to_string()}</p>
            <h1>{status_title(status)}</h1>
            <p>{message}</p>
            <a href="/" class="button">"Back to the homepage"</a>
        </section>
    }
}

#[component]
pub fn NotFoundPage(message: String) -> impl IntoView {
    view! {
        <section class="error-page">
            <p class="error-code">"404"</p>
            <h1>"Page not found"</h1>
            <p>{message}</p>
            <p>
                <a href="/tours" class="button">"Browse our tours"</a>
                " "
                <a href="/" class="button button-secondary">"Homepage"</a>
            </p>
        </section>
    }
}
