// --- File: crates/safari_common/src/ui/layout.rs ---
use leptos::prelude::*;

use super::components::Toast;
use super::{NavUser, PageContext, SiteBrand};

#[component]
pub fn Layout(title: String, page: PageContext, children: Children) -> impl IntoView {
    let PageContext { site, user, flash } = page;
    let site_name = site.name.clone();

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>{title}</title>
                <link rel="stylesheet" href="/static/css/site.css"/>
            </head>
            <body>
                <SiteHeader site_name=site_name user=user/>
                {flash.map(|flash| view! { <Toast flash=flash/> })}
                <main class="container">{children()}</main>
                <SiteFooter site=site/>
            </body>
        </html>
    }
}

/// Top navigation. Account links depend on who is signed in.
#[component]
pub fn SiteHeader(site_name: String, user: Option<NavUser>) -> impl IntoView {
    let account = match user {
        Some(user) => {
            let admin_link = user
                .is_admin
                .then(|| view! { <a href="/admin" class="nav-link">"Admin"</a> });
            view! {
                <a href="/my-bookings" class="nav-link">"My bookings"</a>
                {admin_link}
                <span class="nav-user">{user.name}</span>
                <form method="post" action="/logout" class="nav-logout">
                    <button type="submit" class="link-button">"Log out"</button>
                </form>
            }
            .into_any()
        }
        None => view! {
            <a href="/login" class="nav-link">"Log in"</a>
            <a href="/register" class="button button-small">"Register"</a>
        }
        .into_any(),
    };

    view! {
        <header class="site-header">
            <div class="container header-inner">
                <a href="/" class="brand">{site_name}</a>
                <nav class="main-nav">
                    <a href="/tours" class="nav-link">"Tours"</a>
                    <a href="/about" class="nav-link">"About"</a>
                    <a href="/faq" class="nav-link">"FAQ"</a>
                    <a href="/visa-info" class="nav-link">"Visas"</a>
                    <a href="/packing-list" class="nav-link">"Packing list"</a>
                    <a href="/contact" class="nav-link">"Contact"</a>
                </nav>
                <div class="account-nav">{account}</div>
            </div>
        </header>
    }
}

#[component]
pub fn SiteFooter(site: SiteBrand) -> impl IntoView {
    let mailto = format!("mailto:{}", site.contact_email);
    let tel = format!("tel:{}", site.contact_phone.replace(' ', ""));

    view! {
        <footer class="site-footer">
            <div class="container footer-inner">
                <div>
                    <strong>{site.name}</strong>
                    <p class="muted">{site.tagline}</p>
                </div>
                <div>
                    <a href=mailto>{site.contact_email}</a>
                    <br/>
                    <a href=tel>{site.contact_phone}</a>
                </div>
            </div>
        </footer>
    }
}
