// --- File: crates/safari_booking/src/views.rs ---
use chrono::NaiveDate;
use leptos::prelude::*;
use safari_common::format::{format_date, format_duration_days, format_money};
use safari_common::models::{Booking, Tour};
use safari_common::ui::components::{EmptyState, FormError, StatusBadge};

use crate::logic::{BookingDraft, BookingStep, Quote, TravellerForm, TripForm};

/// Step indicator above every booking step.
#[component]
pub fn BookingProgress(current: BookingStep, tour_title: String) -> impl IntoView {
    view! {
        <p class="eyebrow">{format!("Booking: {}", tour_title)}</p>
        <ol class="steps">
            {BookingStep::ALL
                .into_iter()
                .map(|step| {
                    let class = if step == current {
                        "step current"
                    } else if step.number() < current.number() {
                        "step done"
                    } else {
                        "step"
                    };
                    view! { <li class=class>{format!("{}. {}", step.number(), step.label())}</li> }
                })
                .collect_view()}
        </ol>
    }
}

#[component]
pub fn TripStepPage(
    tour: Tour,
    form: TripForm,
    errors: Vec<String>,
    earliest: NaiveDate,
    max_travellers: u32,
    child_rate_percent: u32,
) -> impl IntoView {
    let action = BookingStep::Trip.path(&tour.id);
    let price = format_money(tour.price_per_person, &tour.currency);
    let max_adults = max_travellers.to_string();
    let max_children = max_travellers.to_string();
    let limits = format!(
        "Up to {} travellers. Children under 12 pay {}% of the adult price.",
        max_travellers, child_rate_percent
    );

    view! {
        <BookingProgress current=BookingStep::Trip tour_title=tour.title.clone()/>
        <h1>"When would you like to travel?"</h1>
        <p class="muted">
            {format_duration_days(tour.duration_days)}" · "{price}" per adult"
        </p>
        <FormError errors=errors/>
        <form method="post" action=action class="stacked-form">
            <label for="start_date">"Start date"</label>
            <input
                id="start_date"
                name="start_date"
                type="date"
                min=earliest.to_string()
                value=form.start_date
                required=true
            />
            <label for="adults">"Adults"</label>
            <input id="adults" name="adults" type="number" min="1" max=max_adults value=form.adults required=true/>
            <label for="children">"Children"</label>
            <input id="children" name="children" type="number" min="0" max=max_children value=form.children/>
            <p class="hint">{limits}</p>
            <button type="submit" class="button">"Continue"</button>
        </form>
    }
}

#[component]
pub fn TravellersStepPage(tour_id: String, tour_title: String, form: TravellerForm, errors: Vec<String>) -> impl IntoView {
    let action = BookingStep::Travellers.path(&tour_id);
    let back = BookingStep::Trip.path(&tour_id);

    view! {
        <BookingProgress current=BookingStep::Travellers tour_title=tour_title/>
        <h1>"Who is the lead traveller?"</h1>
        <FormError errors=errors/>
        <form method="post" action=action class="stacked-form">
            <label for="lead_name">"Full name"</label>
            <input id="lead_name" name="lead_name" type="text" value=form.lead_name required=true/>
            <label for="email">"Email"</label>
            <input id="email" name="email" type="email" value=form.email required=true/>
            <label for="phone">"Phone"</label>
            <input id="phone" name="phone" type="tel" value=form.phone placeholder="+254 700 000 000" required=true/>
            <label for="special_requests">"Special requests (optional)"</label>
            <textarea id="special_requests" name="special_requests" rows="4" maxlength="1000">
                {form.special_requests}
            </textarea>
            <div class="form-actions">
                <a href=back class="button button-secondary">"Back"</a>
                <button type="submit" class="button">"Continue"</button>
            </div>
        </form>
    }
}

#[component]
pub fn ReviewStepPage(draft: BookingDraft, quote: Quote, errors: Vec<String>) -> impl IntoView {
    let action = format!("/book/{}/confirm", draft.tour_id);
    let edit_trip = BookingStep::Trip.path(&draft.tour_id);
    let edit_travellers = BookingStep::Travellers.path(&draft.tour_id);
    let start = draft.start_date.map(format_date).unwrap_or_default();
    let progress_title = draft.tour_title.clone();
    let adult_line = format!(
        "{} × adult at {}",
        quote.adults,
        format_money(quote.adult_price, &quote.currency)
    );
    let child_line = (quote.children > 0).then(|| {
        let label = format!("{} × child at {}%", quote.children, quote.child_rate_percent);
        let amount = format_money(quote.child_total, &quote.currency);
        view! { <tr><td>{label}</td><td class="amount">{amount}</td></tr> }
    });
    let requests = draft
        .special_requests
        .map(|text| view! { <dt>"Special requests"</dt><dd>{text}</dd> });

    view! {
        <BookingProgress current=BookingStep::Review tour_title=progress_title/>
        <h1>"Review your booking"</h1>
        <FormError errors=errors/>
        <div class="grid">
            <section class="card">
                <div class="card-body">
                    <h2>"Trip"</h2>
                    <dl class="facts">
                        <dt>"Tour"</dt>
                        <dd>{draft.tour_title}</dd>
                        <dt>"Start date"</dt>
                        <dd>{start}</dd>
                        <dt>"Travellers"</dt>
                        <dd>{format!("{} adults, {} children", draft.adults, draft.children)}</dd>
                    </dl>
                    <a href=edit_trip>"Change trip details"</a>
                </div>
            </section>
            <section class="card">
                <div class="card-body">
                    <h2>"Lead traveller"</h2>
                    <dl class="facts">
                        <dt>"Name"</dt>
                        <dd>{draft.lead_name}</dd>
                        <dt>"Email"</dt>
                        <dd>{draft.email}</dd>
                        <dt>"Phone"</dt>
                        <dd>{draft.phone}</dd>
                        {requests}
                    </dl>
                    <a href=edit_travellers>"Change contact details"</a>
                </div>
            </section>
        </div>
        <table class="quote">
            <tbody>
                <tr><td>{adult_line}</td><td class="amount">{format_money(quote.adult_total, &quote.currency)}</td></tr>
                {child_line}
            </tbody>
            <tfoot>
                <tr><th>"Total"</th><th class="amount">{format_money(quote.total, &quote.currency)}</th></tr>
            </tfoot>
        </table>
        <p class="muted">"Your booking is confirmed by our team once payment has been arranged."</p>
        <form method="post" action=action>
            <button type="submit" class="button button-large">"Confirm booking"</button>
        </form>
    }
}

#[component]
pub fn BookingRow(booking: Booking) -> impl IntoView {
    let cancel = booking.status.is_cancellable().then(|| {
        let action = format!("/my-bookings/{}/cancel", booking.id);
        view! {
            <form method="post" action=action class="inline-form">
                <button type="submit" class="button button-small button-danger">"Cancel"</button>
            </form>
        }
    });
    let title = booking.display_title();
    let tour_href = format!("/tours/{}", booking.tour_id);
    let travellers = booking.travellers().to_string();

    view! {
        <tr>
            <td><a href=tour_href>{title}</a></td>
            <td>{format_date(booking.start_date)}</td>
            <td>{travellers}</td>
            <td class="amount">{format_money(booking.total_price, &booking.currency)}</td>
            <td><StatusBadge status=booking.status/></td>
            <td>{cancel}</td>
        </tr>
    }
}

#[component]
pub fn MyBookingsPage(bookings: Vec<Booking>) -> impl IntoView {
    if bookings.is_empty() {
        return view! {
            <h1>"My bookings"</h1>
            <EmptyState
                title="No bookings yet".to_string()
                message="When you book a safari it will appear here.".to_string()
                action=Some(("/tours".to_string(), "Find a tour".to_string()))
            />
        }
        .into_any();
    }

    view! {
        <h1>"My bookings"</h1>
        <table class="data-table">
            <thead>
                <tr>
                    <th>"Tour"</th>
                    <th>"Start"</th>
                    <th>"Travellers"</th>
                    <th>"Total"</th>
                    <th>"Status"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                {bookings.into_iter().map(|booking| view! { <BookingRow booking=booking/> }).collect_view()}
            </tbody>
        </table>
    }
    .into_any()
}
