// --- File: crates/safari_admin/src/views.rs ---
use leptos::prelude::*;
use safari_common::format::{format_date, format_duration_days, format_money};
use safari_common::models::{Booking, BookingStatus, Role, Tour, User};
use safari_common::ui::components::{page_href, EmptyState, FormError, Pagination, StatusBadge};

use crate::logic::{BookingFilter, DashboardStats, Page, TourForm, UserFilter, UserStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Dashboard,
    Users,
    Bookings,
    Tours,
}

impl AdminSection {
    const ALL: [AdminSection; 4] = [
        AdminSection::Dashboard,
        AdminSection::Users,
        AdminSection::Bookings,
        AdminSection::Tours,
    ];

    fn href(&self) -> &'static str {
        match self {
            AdminSection::Dashboard => "/admin",
            AdminSection::Users => "/admin/users",
            AdminSection::Bookings => "/admin/bookings",
            AdminSection::Tours => "/admin/tours",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AdminSection::Dashboard => "Dashboard",
            AdminSection::Users => "Users",
            AdminSection::Bookings => "Bookings",
            AdminSection::Tours => "Tours",
        }
    }
}

#[component]
pub fn AdminNav(current: AdminSection) -> impl IntoView {
    view! {
        <nav class="admin-nav" aria-label="Admin">
            {AdminSection::ALL
                .into_iter()
                .map(|section| {
                    let class = if section == current { "admin-link current" } else { "admin-link" };
                    view! { <a href=section.href() class=class>{section.label()}</a> }
                })
                .collect_view()}
        </nav>
    }
}

#[component]
fn StatCard(label: &'static str, value: String, detail: Option<String>) -> impl IntoView {
    view! {
        <div class="stat-card">
            <p class="stat-label">{label}</p>
            <p class="stat-value">{value}</p>
            {detail.map(|detail| view! { <p class="muted">{detail}</p> })}
        </div>
    }
}

#[component]
pub fn DashboardPage(stats: DashboardStats) -> impl IntoView {
    let revenue = if stats.revenue.is_empty() {
        format_money(0, "USD")
    } else {
        stats
            .revenue
            .iter()
            .map(|(currency, amount)| format_money(*amount, currency))
            .collect::<Vec<_>>()
            .join(" + ")
    };
    let by_status = stats
        .bookings_by_status
        .iter()
        .map(|(status, count)| format!("{} {}", count, status.label().to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ");

    let recent = if stats.recent_bookings.is_empty() {
        view! { <p class="muted">"No bookings yet."</p> }.into_any()
    } else {
        view! {
            <table class="admin-table">
                <thead>
                    <tr><th>"Booking"</th><th>"Tour"</th><th>"Lead traveller"</th><th>"Start"</th><th>"Status"</th></tr>
                </thead>
                <tbody>
                    {stats
                        .recent_bookings
                        .into_iter()
                        .map(|booking| {
                            view! {
                                <tr>
                                    <td>{booking.id.clone()}</td>
                                    <td>{booking.display_title()}</td>
                                    <td>{booking.lead_name}</td>
                                    <td>{format_date(booking.start_date)}</td>
                                    <td><StatusBadge status=booking.status/></td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    view! {
        <AdminNav current=AdminSection::Dashboard/>
        <h1>"Dashboard"</h1>
        <div class="stats">
            <StatCard
                label="Users"
                value=stats.users.to_string()
                detail=Some(format!("{} active, {} admins", stats.active_users, stats.admins))
            />
            <StatCard
                label="Tours"
                value=stats.tours.to_string()
                detail=Some(format!("{} on sale", stats.active_tours))
            />
            <StatCard label="Bookings" value=stats.bookings.to_string() detail=Some(by_status)/>
            <StatCard label="Revenue" value=revenue detail=Some("Confirmed and completed bookings".to_string())/>
        </div>
        <h2>"Recent bookings"</h2>
        {recent}
        <p><a href="/admin/bookings">"All bookings"</a></p>
    }
}

fn user_status(user: &User) -> UserStatus {
    if !user.is_active {
        UserStatus::Inactive
    } else if !user.is_verified {
        UserStatus::Unverified
    } else {
        UserStatus::Active
    }
}

#[component]
fn UserRow(user: User, current_user_id: String, return_to: String) -> impl IntoView {
    let status = user_status(&user);
    let badge_class = format!("badge badge-{}", status.as_str());
    let actions = if user.id == current_user_id {
        view! { <span class="muted">"This is you"</span> }.into_any()
    } else {
        let update = format!("/admin/users/{}", user.id);
        let delete = format!("/admin/users/{}/delete", user.id);
        let (new_role, role_label) = match user.role {
            Role::Admin => ("user", "Make user"),
            Role::User => ("admin", "Make admin"),
        };
        let (new_active, active_label) = if user.is_active {
            ("false", "Deactivate")
        } else {
            ("true", "Activate")
        };
        let (role_action, role_return) = (update.clone(), return_to.clone());
        let active_return = return_to.clone();
        view! {
            <form method="post" action=role_action class="inline-form">
                <input type="hidden" name="role" value=new_role/>
                <input type="hidden" name="return_to" value=role_return/>
                <button type="submit" class="button button-small">{role_label}</button>
            </form>
            <form method="post" action=update class="inline-form">
                <input type="hidden" name="is_active" value=new_active/>
                <input type="hidden" name="return_to" value=active_return/>
                <button type="submit" class="button button-small button-secondary">{active_label}</button>
            </form>
            <form method="post" action=delete class="inline-form">
                <input type="hidden" name="return_to" value=return_to/>
                <button type="submit" class="button button-small button-danger">"Delete"</button>
            </form>
        }
        .into_any()
    };

    view! {
        <tr>
            <td>{user.name}</td>
            <td>{user.email}</td>
            <td>{user.role.as_str()}</td>
            <td><span class=badge_class>{status.label()}</span></td>
            <td class="actions">{actions}</td>
        </tr>
    }
}

#[component]
pub fn UsersPage(users: Page<User>, filter: UserFilter, current_user_id: String) -> impl IntoView {
    let query = filter.query_pairs();
    let return_to = page_href("/admin/users", &query, users.page);
    let text = filter.text().unwrap_or_default().to_string();
    let role = filter.role();
    let status = filter.status();
    let summary = format!("{} matching accounts", users.total_items);

    let table = if users.items.is_empty() {
        view! {
            <EmptyState
                title="No users found".to_string()
                message="Try a different search or clear the filters.".to_string()
                action=Some(("/admin/users".to_string(), "Clear filters".to_string()))
            />
        }
        .into_any()
    } else {
        view! {
            <table class="admin-table">
                <thead>
                    <tr><th>"Name"</th><th>"Email"</th><th>"Role"</th><th>"Status"</th><th>"Actions"</th></tr>
                </thead>
                <tbody>
                    {users
                        .items
                        .into_iter()
                        .map(|user| {
                            view! {
                                <UserRow
                                    user=user
                                    current_user_id=current_user_id.clone()
                                    return_to=return_to.clone()
                                />
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    view! {
        <AdminNav current=AdminSection::Users/>
        <h1>"Users"</h1>
        <form method="get" action="/admin/users" class="filter-bar">
            <label for="q">"Search"</label>
            <input id="q" type="search" name="q" value=text placeholder="Name or email"/>
            <label for="role">"Role"</label>
            <select id="role" name="role">
                <option value="">"Any role"</option>
                {[Role::User, Role::Admin]
                    .into_iter()
                    .map(|option| {
                        let selected = role == Some(option);
                        view! { <option value=option.as_str() selected=selected>{option.as_str()}</option> }
                    })
                    .collect_view()}
            </select>
            <label for="status">"Status"</label>
            <select id="status" name="status">
                <option value="">"Any status"</option>
                {UserStatus::ALL
                    .into_iter()
                    .map(|option| {
                        let selected = status == Some(option);
                        view! { <option value=option.as_str() selected=selected>{option.label()}</option> }
                    })
                    .collect_view()}
            </select>
            <button type="submit" class="button">"Filter"</button>
        </form>
        <p class="muted">{summary}</p>
        {table}
        <Pagination base_path="/admin/users".to_string() query=query page=users.page total_pages=users.total_pages/>
    }
}

#[component]
fn AdminBookingRow(booking: Booking) -> impl IntoView {
    let next = booking.status.next_statuses();
    let change = (!next.is_empty()).then(|| {
        let action = format!("/admin/bookings/{}/status", booking.id);
        view! {
            <form method="post" action=action class="inline-form">
                <select name="status" aria-label="New status">
                    {next
                        .into_iter()
                        .map(|status| view! { <option value=status.as_str()>{status.label()}</option> })
                        .collect_view()}
                </select>
                <button type="submit" class="button button-small">"Update"</button>
            </form>
        }
    });
    let travellers = format!("{} adults, {} children", booking.adults, booking.children);

    view! {
        <tr>
            <td>{booking.id.clone()}</td>
            <td>{booking.display_title()}</td>
            <td>{booking.lead_name}<br/><span class="muted">{booking.email}</span></td>
            <td>{format_date(booking.start_date)}</td>
            <td>{travellers}</td>
            <td class="amount">{format_money(booking.total_price, &booking.currency)}</td>
            <td><StatusBadge status=booking.status/></td>
            <td>{change}</td>
        </tr>
    }
}

#[component]
pub fn BookingsPage(bookings: Page<Booking>, filter: BookingFilter) -> impl IntoView {
    let query = filter.query_pairs();
    let current = filter.status();

    let table = if bookings.items.is_empty() {
        view! {
            <EmptyState
                title="No bookings found".to_string()
                message="There are no bookings with this status.".to_string()
                action=None
            />
        }
        .into_any()
    } else {
        view! {
            <table class="admin-table">
                <thead>
                    <tr>
                        <th>"Booking"</th><th>"Tour"</th><th>"Lead traveller"</th><th>"Start"</th>
                        <th>"Travellers"</th><th>"Total"</th><th>"Status"</th><th>"Change"</th>
                    </tr>
                </thead>
                <tbody>
                    {bookings
                        .items
                        .into_iter()
                        .map(|booking| view! { <AdminBookingRow booking=booking/> })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    view! {
        <AdminNav current=AdminSection::Bookings/>
        <h1>"Bookings"</h1>
        <form method="get" action="/admin/bookings" class="filter-bar">
            <label for="status">"Status"</label>
            <select id="status" name="status">
                <option value="">"All"</option>
                {BookingStatus::ALL
                    .into_iter()
                    .map(|status| {
                        let selected = current == Some(status);
                        view! { <option value=status.as_str() selected=selected>{status.label()}</option> }
                    })
                    .collect_view()}
            </select>
            <button type="submit" class="button">"Filter"</button>
        </form>
        <p class="muted">{format!("{} bookings", bookings.total_items)}</p>
        {table}
        <Pagination
            base_path="/admin/bookings".to_string()
            query=query
            page=bookings.page
            total_pages=bookings.total_pages
        />
    }
}

#[component]
pub fn ToursPage(tours: Vec<Tour>) -> impl IntoView {
    let rows = tours
        .into_iter()
        .map(|tour| {
            let edit = format!("/admin/tours/{}/edit", tour.id);
            let delete = format!("/admin/tours/{}/delete", tour.id);
            let public = format!("/tours/{}", tour.id);
            let state = if tour.is_active { "On sale" } else { "Hidden" };
            view! {
                <tr>
                    <td><a href=public>{tour.title}</a></td>
                    <td>{tour.destination}</td>
                    <td>{format_duration_days(tour.duration_days)}</td>
                    <td class="amount">{format_money(tour.price_per_person, &tour.currency)}</td>
                    <td>{tour.max_group_size.to_string()}</td>
                    <td>{state}</td>
                    <td class="actions">
                        <a href=edit class="button button-small">"Edit"</a>
                        <form method="post" action=delete class="inline-form">
                            <button type="submit" class="button button-small button-danger">"Delete"</button>
                        </form>
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <AdminNav current=AdminSection::Tours/>
        <h1>"Tours"</h1>
        <p><a href="/admin/tours/new" class="button">"Add a tour"</a></p>
        <table class="admin-table">
            <thead>
                <tr>
                    <th>"Title"</th><th>"Destination"</th><th>"Duration"</th><th>"Price"</th>
                    <th>"Group"</th><th>"State"</th><th>"Actions"</th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
}

/// Create form when `tour_id` is `None`, edit form otherwise.
#[component]
pub fn TourEditorPage(tour_id: Option<String>, form: TourForm, errors: Vec<String>) -> impl IntoView {
    let (heading, action) = match &tour_id {
        Some(id) => ("Edit tour", format!("/admin/tours/{}", id)),
        None => ("New tour", "/admin/tours".to_string()),
    };
    let active = form.is_active();

    view! {
        <AdminNav current=AdminSection::Tours/>
        <h1>{heading}</h1>
        <FormError errors=errors/>
        <form method="post" action=action class="stacked-form">
            <label for="title">"Title"</label>
            <input id="title" name="title" type="text" value=form.title maxlength="120" required=true/>
            <label for="destination">"Destination"</label>
            <input id="destination" name="destination" type="text" value=form.destination required=true/>
            <label for="summary">"Summary"</label>
            <input id="summary" name="summary" type="text" value=form.summary maxlength="300" required=true/>
            <label for="description">"Description"</label>
            <textarea id="description" name="description" rows="6">{form.description}</textarea>
            <label for="duration_days">"Duration (days)"</label>
            <input id="duration_days" name="duration_days" type="number" min="1" max="60" value=form.duration_days required=true/>
            <label for="price">"Price per adult"</label>
            <input id="price" name="price" type="text" inputmode="decimal" value=form.price placeholder="1250.00" required=true/>
            <label for="currency">"Currency"</label>
            <input id="currency" name="currency" type="text" maxlength="3" value=form.currency required=true/>
            <label for="max_group_size">"Maximum group size"</label>
            <input id="max_group_size" name="max_group_size" type="number" min="1" max="100" value=form.max_group_size required=true/>
            <label for="highlights">"Highlights (one per line)"</label>
            <textarea id="highlights" name="highlights" rows="5">{form.highlights}</textarea>
            <label for="image_url">"Image URL"</label>
            <input id="image_url" name="image_url" type="text" value=form.image_url placeholder="https://"/>
            <label class="checkbox">
                <input type="checkbox" name="is_active" value="on" checked=active/>
                " On sale"
            </label>
            <div class="form-actions">
                <a href="/admin/tours" class="button button-secondary">"Cancel"</a>
                <button type="submit" class="button">"Save tour"</button>
            </div>
        </form>
    }
}
