// --- File: crates/safari_content/src/logic.rs ---

use safari_common::models::{ContactMessage, Tour};
use safari_common::validation::{
    validate_email, validate_max_len, validate_name, validate_required, FormErrors,
};
use serde::Deserialize;

use crate::content::{FaqCategory, PackingCategory, VisaInfo};

/// Number of tours shown on the homepage.
pub const FEATURED_TOUR_COUNT: usize = 3;

pub const MAX_ENQUIRY_LENGTH: usize = 2000;

/// Query string of `/tours`. Values arrive as raw strings so that an empty
/// or malformed field is ignored rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TourFilter {
    pub destination: Option<String>,
    pub q: Option<String>,
    pub duration: Option<String>,
}

impl TourFilter {
    pub fn destination(&self) -> Option<&str> {
        non_empty(self.destination.as_deref())
    }

    pub fn text(&self) -> Option<&str> {
        non_empty(self.q.as_deref())
    }

    /// Maximum trip length in days.
    pub fn max_duration(&self) -> Option<u32> {
        non_empty(self.duration.as_deref()).and_then(|raw| raw.parse::<u32>().ok())
    }

    pub fn is_active(&self) -> bool {
        self.destination().is_some() || self.text().is_some() || self.max_duration().is_some()
    }

    pub fn matches(&self, tour: &Tour) -> bool {
        if !tour.is_active {
            return false;
        }
        if let Some(destination) = self.destination() {
            if !contains_ignore_case(&tour.destination, destination) {
                return false;
            }
        }
        if let Some(max_days) = self.max_duration() {
            if tour.duration_days > max_days {
                return false;
            }
        }
        if let Some(text) = self.text() {
            let in_highlights = tour
                .highlights
                .iter()
                .any(|highlight| contains_ignore_case(highlight, text));
            if !(contains_ignore_case(&tour.title, text)
                || contains_ignore_case(&tour.destination, text)
                || contains_ignore_case(&tour.summary, text)
                || in_highlights)
            {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Active tours matching the filter, in catalogue order.
pub fn filter_tours(tours: &[Tour], filter: &TourFilter) -> Vec<Tour> {
    tours.iter().filter(|tour| filter.matches(tour)).cloned().collect()
}

/// The first `count` active tours.
pub fn featured_tours(tours: &[Tour], count: usize) -> Vec<Tour> {
    tours
        .iter()
        .filter(|tour| tour.is_active)
        .take(count)
        .cloned()
        .collect()
}

/// Distinct countries of active tours, for the destination filter.
///
/// Destinations read "Park, Country"; the part after the last comma is used.
pub fn destination_options(tours: &[Tour]) -> Vec<String> {
    let mut countries: Vec<String> = tours
        .iter()
        .filter(|tour| tour.is_active)
        .map(|tour| {
            tour.destination
                .rsplit(',')
                .next()
                .unwrap_or(&tour.destination)
                .trim()
                .to_string()
        })
        .filter(|country| !country.is_empty())
        .collect();
    countries.sort();
    countries.dedup();
    countries
}

/// FAQ categories restricted to entries whose question or answer mentions `query`.
/// Categories without a match are dropped.
pub fn search_faq(categories: &[FaqCategory], query: Option<&str>) -> Vec<FaqCategory> {
    let Some(query) = non_empty(query) else {
        return categories.to_vec();
    };
    categories
        .iter()
        .filter_map(|category| {
            let items: Vec<_> = category
                .items
                .iter()
                .filter(|item| {
                    contains_ignore_case(&item.question, query) || contains_ignore_case(&item.answer, query)
                })
                .cloned()
                .collect();
            (!items.is_empty()).then(|| FaqCategory {
                name: category.name.clone(),
                items,
            })
        })
        .collect()
}

pub fn find_visa<'a>(visas: &'a [VisaInfo], slug: &str) -> Option<&'a VisaInfo> {
    visas.iter().find(|visa| visa.slug.eq_ignore_ascii_case(slug.trim()))
}

/// Packing list, optionally reduced to essential items.
pub fn packing_list(categories: &[PackingCategory], essentials_only: bool) -> Vec<PackingCategory> {
    if !essentials_only {
        return categories.to_vec();
    }
    categories
        .iter()
        .map(|category| PackingCategory {
            name: category.name.clone(),
            items: category.items.iter().filter(|item| item.essential).cloned().collect(),
        })
        .filter(|category| !category.items.is_empty())
        .collect()
}

/// Fields of the contact form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnquiryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

pub fn validate_enquiry(form: &EnquiryForm) -> Result<ContactMessage, FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_name("name", &form.name));
    errors.check(validate_email(&form.email));
    errors.check(validate_required("subject", "Subject", &form.subject));
    errors.check(validate_max_len("subject", "Subject", &form.subject, 150));
    errors.check(validate_required("message", "Message", &form.message));
    errors.check(validate_max_len("message", "Message", &form.message, MAX_ENQUIRY_LENGTH));
    errors.into_result()?;

    Ok(ContactMessage {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        subject: form.subject.trim().to_string(),
        message: form.message.trim().to_string(),
    })
}
