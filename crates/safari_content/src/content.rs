// --- File: crates/safari_content/src/content.rs ---
//! Editorial content compiled into the binary.

use safari_common::error::{Context, SafariError};
use serde::Deserialize;

const HOME_JSON: &str = include_str!("../content/home.json");
const ABOUT_JSON: &str = include_str!("../content/about.json");
const FAQ_JSON: &str = include_str!("../content/faq.json");
const VISAS_JSON: &str = include_str!("../content/visas.json");
const PACKING_JSON: &str = include_str!("../content/packing.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Highlight {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HomeContent {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AboutContent {
    pub headline: String,
    pub paragraphs: Vec<String>,
    pub values: Vec<Highlight>,
    #[serde(default)]
    pub team: Vec<TeamMember>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FaqCategory {
    pub name: String,
    pub items: Vec<FaqItem>,
}

/// Entry requirements for one destination country.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VisaInfo {
    pub country: String,
    /// URL segment under `/visa-info/`.
    pub slug: String,
    pub requirement: String,
    pub how_to_apply: String,
    pub fee: String,
    pub validity: String,
    #[serde(default)]
    pub apply_url: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackingItem {
    pub name: String,
    pub essential: bool,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackingCategory {
    pub name: String,
    pub items: Vec<PackingItem>,
}

/// All static pages' content, parsed once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteContent {
    pub home: HomeContent,
    pub about: AboutContent,
    pub faq: Vec<FaqCategory>,
    pub visas: Vec<VisaInfo>,
    pub packing: Vec<PackingCategory>,
}

impl SiteContent {
    pub fn load() -> Result<Self, SafariError> {
        Ok(SiteContent {
            home: parse(HOME_JSON, "home.json")?,
            about: parse(ABOUT_JSON, "about.json")?,
            faq: parse(FAQ_JSON, "faq.json")?,
            visas: parse(VISAS_JSON, "visas.json")?,
            packing: parse(PACKING_JSON, "packing.json")?,
        })
    }
}

fn parse<T: for<'de> Deserialize<'de>>(raw: &str, name: &str) -> Result<T, SafariError> {
    serde_json::from_str(raw).with_context(|| format!("invalid content file {}", name))
}
