// --- File: crates/safari_content/src/views.rs ---
use leptos::prelude::*;
use safari_common::format::{format_duration_days, format_money};
use safari_common::models::Tour;
use safari_common::ui::components::{EmptyState, FormError};

use crate::content::{AboutContent, FaqCategory, HomeContent, PackingCategory, VisaInfo};
use crate::logic::{EnquiryForm, TourFilter};

#[component]
pub fn TourCard(tour: Tour) -> impl IntoView {
    let href = format!("/tours/{}", tour.id);
    let price = format_money(tour.price_per_person, &tour.currency);
    let image = tour
        .image_url
        .clone()
        .map(|src| view! { <img src=src alt=tour.title.clone() class="tour-image" loading="lazy"/> });

    view! {
        <article class="card tour-card">
            {image}
            <div class="card-body">
                <p class="eyebrow">{tour.destination}</p>
                <h3><a href=href>{tour.title}</a></h3>
                <p>{tour.summary}</p>
                <p class="tour-meta">
                    <span>{format_duration_days(tour.duration_days)}</span>
                    <span class="price">"From " {price} " per person"</span>
                </p>
            </div>
        </article>
    }
}

#[component]
pub fn HomePage(content: HomeContent, featured: Vec<Tour>) -> impl IntoView {
    let featured_view = if featured.is_empty() {
        view! {
            <EmptyState
                title="Our tours are loading".to_string()
                message="Please check back in a moment or browse the full catalogue.".to_string()
                action=Some(("/tours".to_string(), "Browse tours".to_string()))
            />
        }
        .into_any()
    } else {
        view! {
            <div class="grid">
                {featured.into_iter().map(|tour| view! { <TourCard tour=tour/> }).collect_view()}
            </div>
        }
        .into_any()
    };

    view! {
        <section class="hero">
            <h1>{content.hero_title}</h1>
            <p class="lead">{content.hero_subtitle}</p>
            <a href="/tours" class="button button-large">"Find your safari"</a>
        </section>
        <section class="highlights grid">
            {content
                .highlights
                .into_iter()
                .map(|highlight| view! {
                    <div class="highlight">
                        <h3>{highlight.title}</h3>
                        <p>{highlight.text}</p>
                    </div>
                })
                .collect_view()}
        </section>
        <section>
            <h2>"Featured tours"</h2>
            {featured_view}
        </section>
        <section class="testimonials">
            {content
                .testimonials
                .into_iter()
                .map(|testimonial| view! {
                    <blockquote>
                        <p>{testimonial.quote}</p>
                        <cite>{testimonial.author}</cite>
                    </blockquote>
                })
                .collect_view()}
        </section>
    }
}

#[component]
pub fn TourListPage(tours: Vec<Tour>, filter: TourFilter, destinations: Vec<String>) -> impl IntoView {
    let selected_destination = filter.destination().unwrap_or_default().to_string();
    let text = filter.text().unwrap_or_default().to_string();
    let duration = filter.max_duration().map(|days| days.to_string()).unwrap_or_default();
    let filtered = filter.is_active();

    let results = if tours.is_empty() {
        let message = if filtered {
            "No tours match your filters. Try widening your search."
        } else {
            "There are no tours available right now."
        };
        view! {
            <EmptyState
                title="No tours found".to_string()
                message=message.to_string()
                action=filtered.then(|| ("/tours".to_string(), "Clear filters".to_string()))
            />
        }
        .into_any()
    } else {
        view! {
            <div class="grid">
                {tours.into_iter().map(|tour| view! { <TourCard tour=tour/> }).collect_view()}
            </div>
        }
        .into_any()
    };

    view! {
        <h1>"Our safaris"</h1>
        <form method="get" action="/tours" class="filters">
            <label for="destination">"Destination"</label>
            <select id="destination" name="destination">
                <option value="">"Anywhere"</option>
                {destinations
                    .into_iter()
                    .map(|destination| {
                        let selected = destination.eq_ignore_ascii_case(&selected_destination);
                        let value = destination.clone();
                        view! { <option value=value selected=selected>{destination}</option> }
                    })
                    .collect_view()}
            </select>
            <label for="q">"Search"</label>
            <input id="q" type="search" name="q" value=text placeholder="Gorillas, migration..."/>
            <label for="duration">"Max days"</label>
            <input id="duration" type="number" name="duration" min="1" max="60" value=duration/>
            <button type="submit" class="button">"Filter"</button>
        </form>
        {results}
    }
}

#[component]
pub fn TourDetailPage(tour: Tour) -> impl IntoView {
    let price = format_money(tour.price_per_person, &tour.currency);
    let book_href = format!("/book/{}", tour.id);
    let image = tour
        .image_url
        .clone()
        .map(|src| view! { <img src=src alt=tour.title.clone() class="hero-image"/> });

    view! {
        <article class="tour-detail">
            {image}
            <p class="eyebrow">{tour.destination}</p>
            <h1>{tour.title}</h1>
            <p class="lead">{tour.summary}</p>
            <ul class="facts">
                <li><strong>"Duration: "</strong>{format_duration_days(tour.duration_days)}</li>
                <li><strong>"Price: "</strong>{price}" per adult"</li>
                <li><strong>"Group size: "</strong>"up to "{tour.max_group_size.to_string()}" travellers"</li>
            </ul>
            <p>{tour.description}</p>
            <h2>"Highlights"</h2>
            <ul>
                {tour.highlights.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}
            </ul>
            <a href=book_href class="button button-large">"Book this tour"</a>
        </article>
    }
}

#[component]
pub fn AboutPage(content: AboutContent) -> impl IntoView {
    view! {
        <h1>{content.headline}</h1>
        {content.paragraphs.into_iter().map(|text| view! { <p>{text}</p> }).collect_view()}
        <h2>"What we stand for"</h2>
        <div class="grid">
            {content
                .values
                .into_iter()
                .map(|value| view! {
                    <div class="highlight">
                        <h3>{value.title}</h3>
                        <p>{value.text}</p>
                    </div>
                })
                .collect_view()}
        </div>
        <h2>"Our team"</h2>
        <ul class="team">
            {content
                .team
                .into_iter()
                .map(|member| view! { <li><strong>{member.name}</strong>" · "{member.role}</li> })
                .collect_view()}
        </ul>
    }
}

#[component]
pub fn FaqPage(categories: Vec<FaqCategory>, query: String) -> impl IntoView {
    let results = if categories.is_empty() {
        view! {
            <EmptyState
                title="No matching questions".to_string()
                message="Try a different word or ask us directly.".to_string()
                action=Some(("/contact".to_string(), "Contact us".to_string()))
            />
        }
        .into_any()
    } else {
        categories
            .into_iter()
            .map(|category| view! {
                <section class="faq-category">
                    <h2>{category.name}</h2>
                    {category
                        .items
                        .into_iter()
                        .map(|item| view! {
                            <details class="faq-item">
                                <summary>{item.question}</summary>
                                <p>{item.answer}</p>
                            </details>
                        })
                        .collect_view()}
                </section>
            })
            .collect_view()
            .into_any()
    };

    view! {
        <h1>"Frequently asked questions"</h1>
        <form method="get" action="/faq" class="filters">
            <label for="q">"Search the FAQ"</label>
            <input id="q" type="search" name="q" value=query/>
            <button type="submit" class="button">"Search"</button>
        </form>
        {results}
    }
}

#[component]
pub fn VisaIndexPage(visas: Vec<VisaInfo>) -> impl IntoView {
    view! {
        <h1>"Visa information"</h1>
        <p class="muted">
            "Requirements change often. Always confirm with the official immigration portal before you travel."
        </p>
        <div class="grid">
            {visas
                .into_iter()
                .map(|visa| {
                    let href = format!("/visa-info/{}", visa.slug);
                    view! {
                        <article class="card">
                            <div class="card-body">
                                <h3><a href=href>{visa.country}</a></h3>
                                <p>{visa.requirement}</p>
                                <p class="muted">{visa.fee}</p>
                            </div>
                        </article>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn VisaDetailPage(visa: VisaInfo) -> impl IntoView {
    let apply = visa.apply_url.map(|url| {
        view! { <p><a href=url.clone() rel="noopener noreferrer" target="_blank">"Official application portal"</a></p> }
    });

    view! {
        <p><a href="/visa-info">"All countries"</a></p>
        <h1>{format!("Visiting {}", visa.country)}</h1>
        <dl class="facts">
            <dt>"Requirement"</dt>
            <dd>{visa.requirement}</dd>
            <dt>"How to apply"</dt>
            <dd>{visa.how_to_apply}</dd>
            <dt>"Fee"</dt>
            <dd>{visa.fee}</dd>
            <dt>"Validity"</dt>
            <dd>{visa.validity}</dd>
        </dl>
        <ul>{visa.notes.into_iter().map(|note| view! { <li>{note}</li> }).collect_view()}</ul>
        {apply}
    }
}

#[component]
pub fn PackingListPage(categories: Vec<PackingCategory>, essentials_only: bool) -> impl IntoView {
    let toggle = if essentials_only {
        view! { <a href="/packing-list">"Show the full list"</a> }.into_any()
    } else {
        view! { <a href="/packing-list?essentials=true">"Show essentials only"</a> }.into_any()
    };

    view! {
        <h1>"What to pack"</h1>
        <p>{toggle}</p>
        {categories
            .into_iter()
            .map(|category| view! {
                <section class="packing-category">
                    <h2>{category.name}</h2>
                    <ul class="checklist">
                        {category
                            .items
                            .into_iter()
                            .map(|item| {
                                let class = if item.essential { "essential" } else { "optional" };
                                view! {
                                    <li class=class>
                                        <strong>{item.name}</strong>
                                        {item.note.map(|note| view! { <span class="muted">" · "{note}</span> })}
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </section>
            })
            .collect_view()}
    }
}

#[component]
pub fn ContactPage(form: EnquiryForm, errors: Vec<String>, email: String, phone: String) -> impl IntoView {
    let mailto = format!("mailto:{}", email);
    view! {
        <h1>"Contact us"</h1>
        <p>
            "Write to "<a href=mailto>{email}</a>" or call "{phone}
            ". We reply within one working day."
        </p>
        <FormError errors=errors/>
        <form method="post" action="/contact" class="stacked-form">
            <label for="name">"Your name"</label>
            <input id="name" name="name" type="text" value=form.name required=true/>
            <label for="email">"Email"</label>
            <input id="email" name="email" type="email" value=form.email required=true/>
            <label for="subject">"Subject"</label>
            <input id="subject" name="subject" type="text" value=form.subject required=true/>
            <label for="message">"Message"</label>
            <textarea id="message" name="message" rows="6" required=true>{form.message}</textarea>
            <button type="submit" class="button">"Send enquiry"</button>
        </form>
    }
}
