// --- File: crates/safari_common/src/ui/mod.rs ---
//! Server-side rendered page shell shared by every feature crate.
//!
//! Pages are Leptos views rendered to a `String` inside a fresh root
//! [`Owner`]; nothing is hydrated in the browser.

pub mod components;
pub mod layout;

use leptos::prelude::*;
use once_cell::sync::OnceCell;
use safari_config::SiteConfig;

use crate::session::Flash;
use components::{ErrorPage, NotFoundPage};
use layout::Layout;

static SITE_BRAND: OnceCell<SiteBrand> = OnceCell::new();

/// Operator details shown in the header and footer.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteBrand {
    pub name: String,
    pub tagline: String,
    pub contact_email: String,
    pub contact_phone: String,
}

impl SiteBrand {
    pub fn from_config(site: &SiteConfig) -> Self {
        SiteBrand {
            name: site.name.clone(),
            tagline: site.tagline.clone(),
            contact_email: site.contact_email.clone(),
            contact_phone: site.contact_phone.clone(),
        }
    }

    /// Remembers the configured brand for pages rendered without a request
    /// context (error responses). Only the first call has an effect.
    pub fn install(site: &SiteConfig) {
        let _ = SITE_BRAND.set(Self::from_config(site));
    }

    pub fn current() -> SiteBrand {
        SITE_BRAND
            .get()
            .cloned()
            .unwrap_or_else(|| Self::from_config(&SiteConfig::default()))
    }
}

/// The signed-in visitor as the navigation bar sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct NavUser {
    pub name: String,
    pub is_admin: bool,
}

/// Per-request data needed by the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub site: SiteBrand,
    pub user: Option<NavUser>,
    pub flash: Option<Flash>,
}

impl PageContext {
    pub fn anonymous() -> Self {
        PageContext {
            site: SiteBrand::current(),
            user: None,
            flash: None,
        }
    }
}

/// Renders `body` inside the site layout and returns the full HTML document.
pub fn render_document<F, V>(title: &str, page: &PageContext, body: F) -> String
where
    F: FnOnce() -> V,
    V: IntoView + 'static,
{
    let full_title = if title.is_empty() {
        page.site.name.clone()
    } else {
        format!("{} | {}", title, page.site.name)
    };
    let page = page.clone();

    let owner = Owner::new_root(None);
    owner.with(|| {
        let content = body().into_any();
        view! {
            <Layout title=full_title page=page>
                {content}
            </Layout>
        }
        .to_html()
    })
}

/// Full error page for `status`. Without a page context the visitor is shown
/// as signed out.
pub fn render_error_document(page: Option<&PageContext>, status: u16, message: &str) -> String {
    let page = page.cloned().unwrap_or_else(PageContext::anonymous);
    let message = message.to_string();
    render_document(status_title(status), &page, move || {
        if status == 404 {
            view! { <NotFoundPage message=message/> }.into_any()
        } else {
            view! { <ErrorPage status=status message=message/> }.into_any()
        }
    })
}

pub fn status_title(status: u16) -> &'static str {
    match status {
        400 => "Invalid request",
        401 => "Please sign in",
        403 => "Access denied",
        404 => "Page not found",
        409 => "Conflict",
        429 => "Too many requests",
        502 | 503 => "Service unavailable",
        504 => "Request timed out",
        _ => "Something went wrong",
    }
}
