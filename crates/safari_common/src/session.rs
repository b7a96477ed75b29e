// --- File: crates/safari_common/src/session.rs ---
//! Browser-side state kept in encrypted cookies.
//!
//! Three cookies are used, all private (encrypted + authenticated with the
//! server key), `HttpOnly` and `SameSite=Lax`:
//!
//! - `safari_session`: API token and a summary of the signed-in user
//! - `safari_flash`: a one-shot toast shown on the next rendered page
//! - `safari_booking`: the draft of an in-progress booking
//!
//! A cookie that cannot be decrypted or parsed is treated as absent.

use axum::http::{header, HeaderMap};
use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, CookieJar, Key, SameSite};
use safari_config::{SessionConfig, SiteConfig};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{config_error, SafariError};
use crate::models::{AuthSession, Role};
use crate::ui::{NavUser, PageContext, SiteBrand};

pub const SESSION_COOKIE: &str = "safari_session";
pub const FLASH_COOKIE: &str = "safari_flash";
pub const BOOKING_COOKIE: &str = "safari_booking";

/// Largest `Set-Cookie` value we emit. Browsers drop cookies over 4096 bytes
/// without telling anyone.
pub const MAX_COOKIE_BYTES: usize = 4000;

/// Minimal user data kept in the session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// A signed-in visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token issued by `POST /auth/login`.
    pub token: String,
    pub user: SessionUser,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}

impl From<AuthSession> for Session {
    fn from(auth: AuthSession) -> Self {
        Session {
            token: auth.token,
            user: SessionUser {
                id: auth.user.id,
                name: auth.user.name,
                email: auth.user.email,
                role: auth.user.role,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Error,
}

impl FlashKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashKind::Success => "toast toast-success",
            FlashKind::Info => "toast toast-info",
            FlashKind::Error => "toast toast-error",
        }
    }
}

/// One-shot toast notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Error, message: message.into() }
    }
}

/// `Set-Cookie` values to attach to the response.
///
/// Later changes to a cookie replace earlier ones with the same name.
#[derive(Debug, Default, Clone)]
pub struct CookieChanges {
    cookies: Vec<Cookie<'static>>,
}

impl CookieChanges {
    pub fn push(&mut self, cookie: Cookie<'static>) {
        self.cookies.retain(|existing| existing.name() != cookie.name());
        self.cookies.push(cookie);
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.iter().find(|cookie| cookie.name() == name)
    }

    pub fn into_cookies(self) -> Vec<Cookie<'static>> {
        self.cookies
    }
}

/// Everything a handler needs to know about the visitor.
#[derive(Debug, Default)]
pub struct RequestContext {
    pub session: Option<Session>,
    pub flash: Option<Flash>,
    pub changes: CookieChanges,
    flash_cookie_present: bool,
    secure_cookies: bool,
}

impl RequestContext {
    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// Data for the page layout. Rendering a page consumes the flash.
    pub fn page(&mut self, site: &SiteConfig) -> PageContext {
        if self.flash_cookie_present && self.changes.get(FLASH_COOKIE).is_none() {
            self.changes.push(removal_cookie(FLASH_COOKIE, self.secure_cookies));
        }
        PageContext {
            site: SiteBrand::from_config(site),
            user: self.user().map(|user| NavUser {
                name: user.name.clone(),
                is_admin: user.role == Role::Admin,
            }),
            flash: self.flash.take(),
        }
    }

    /// Forgets the session and any booking draft, e.g. after the API
    /// rejected the token.
    pub fn clear_session(&mut self) {
        self.session = None;
        self.changes.push(removal_cookie(SESSION_COOKIE, self.secure_cookies));
        self.changes.push(removal_cookie(BOOKING_COOKIE, self.secure_cookies));
    }

    /// Cookie changes accumulated while handling the request.
    pub fn take_changes(&mut self) -> CookieChanges {
        std::mem::take(&mut self.changes)
    }
}

/// Reads and writes the private cookies.
#[derive(Clone)]
pub struct SessionManager {
    key: Key,
    secure: bool,
    max_age: CookieDuration,
}

impl SessionManager {
    pub fn new(key: Key, secure: bool, max_age_hours: i64) -> Self {
        Self {
            key,
            secure,
            max_age: CookieDuration::hours(max_age_hours.max(1)),
        }
    }

    /// Builds the manager from config.
    ///
    /// Without a configured secret a random key is generated, so sessions do
    /// not survive a restart.
    pub fn from_config(config: &SessionConfig) -> Result<Self, SafariError> {
        let key = match config.secret.as_deref() {
            Some(secret) if !secret.is_empty() && secret != "secret_from_env" => {
                Key::try_from(secret.as_bytes())
                    .map_err(|_| config_error("session.secret must be at least 64 bytes long"))?
            }
            _ => {
                warn!("no session.secret configured, generating a random cookie key");
                Key::generate()
            }
        };
        Ok(Self::new(key, config.secure_cookies, config.max_age_hours))
    }

    /// Decodes session and flash from the request's `Cookie` header.
    pub fn context(&self, headers: &HeaderMap) -> RequestContext {
        let jar = jar_from_headers(headers);
        let session = self.read_from_jar::<Session>(&jar, SESSION_COOKIE);
        let flash_cookie_present = jar.get(FLASH_COOKIE).is_some();
        let flash = self.read_from_jar::<Flash>(&jar, FLASH_COOKIE);
        RequestContext {
            session,
            flash,
            changes: CookieChanges::default(),
            flash_cookie_present,
            secure_cookies: self.secure,
        }
    }

    /// Decrypts and deserializes a private cookie.
    pub fn read<T: DeserializeOwned>(&self, headers: &HeaderMap, name: &str) -> Option<T> {
        self.read_from_jar(&jar_from_headers(headers), name)
    }

    fn read_from_jar<T: DeserializeOwned>(&self, jar: &CookieJar, name: &str) -> Option<T> {
        let cookie = jar.private(&self.key).get(name)?;
        match serde_json::from_str(cookie.value()) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!("ignoring unreadable {} cookie: {}", name, err);
                None
            }
        }
    }

    /// Serializes `value` into an encrypted cookie.
    ///
    /// Fails with a validation error when the encoded cookie would be larger
    /// than [`MAX_COOKIE_BYTES`], since the browser would discard it.
    pub fn write<T: Serialize>(
        &self,
        changes: &mut CookieChanges,
        name: &'static str,
        value: &T,
        persistent: bool,
    ) -> Result<(), SafariError> {
        let json = serde_json::to_string(value)?;
        let mut builder = Cookie::build((name, json))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax);
        if persistent {
            builder = builder.max_age(self.max_age);
        }

        let mut jar = CookieJar::new();
        jar.private_mut(&self.key).add(builder.build());
        let encrypted: Vec<Cookie<'static>> = jar.delta().cloned().collect();
        for cookie in &encrypted {
            let size = cookie.to_string().len();
            if size > MAX_COOKIE_BYTES {
                warn!("{} cookie would be {} bytes, not sending it", name, size);
                return Err(SafariError::ValidationError(format!(
                    "{} cookie is too large ({} bytes)",
                    name, size
                )));
            }
        }
        for cookie in encrypted {
            changes.push(cookie);
        }
        Ok(())
    }

    pub fn remove(&self, changes: &mut CookieChanges, name: &'static str) {
        changes.push(removal_cookie(name, self.secure));
    }

    pub fn start_session(&self, changes: &mut CookieChanges, session: &Session) -> Result<(), SafariError> {
        self.write(changes, SESSION_COOKIE, session, true)
    }

    /// Signs out and forgets any booking draft.
    pub fn end_session(&self, changes: &mut CookieChanges) {
        self.remove(changes, SESSION_COOKIE);
        self.remove(changes, BOOKING_COOKIE);
    }

    pub fn flash(&self, changes: &mut CookieChanges, flash: Flash) -> Result<(), SafariError> {
        self.write(changes, FLASH_COOKIE, &flash, false)
    }
}

/// Expires `name` with the same attributes it was set with.
fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .build()
}

fn jar_from_headers(headers: &HeaderMap) -> CookieJar {
    let mut jar = CookieJar::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            if let Ok(cookie) = Cookie::parse(pair.trim().to_string()) {
                jar.add_original(cookie);
            }
        }
    }
    jar
}
