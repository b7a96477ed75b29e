#[cfg(test)]
mod tests {
    use crate::logic::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use safari_common::models::{Booking, BookingStatus, Role, Tour, User, UserUpdate};
    use safari_common::SafariError;

    fn user(id: &str, name: &str, role: Role, is_verified: bool, is_active: bool) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", id),
            role,
            is_verified,
            is_active,
            created_at: None,
        }
    }

    fn users() -> Vec<User> {
        vec![
            user("amani", "Amani Otieno", Role::Admin, true, true),
            user("grace", "Grace Wanjiku", Role::User, true, true),
            user("tom", "Tom Hargreaves", Role::User, false, true),
            user("priya", "Priya Raman", Role::User, true, false),
        ]
    }

    fn booking(id: &str, status: BookingStatus, total: i64, currency: &str, created_day: u32) -> Booking {
        Booking {
            id: id.to_string(),
            tour_id: "masai-mara-migration".to_string(),
            tour_title: None,
            user_id: None,
            lead_name: "Lead".to_string(),
            email: "lead@example.com".to_string(),
            phone: String::new(),
            start_date: NaiveDate::from_ymd_opt(2027, 1, 10).unwrap(),
            adults: 1,
            children: 0,
            total_price: total,
            currency: currency.to_string(),
            status,
            special_requests: None,
            created_at: Some(Utc.with_ymd_and_hms(2026, 1, created_day, 9, 0, 0).unwrap()),
        }
    }

    fn tour(is_active: bool) -> Tour {
        Tour {
            id: "okavango-delta".to_string(),
            title: "Okavango Delta by Mokoro".to_string(),
            destination: "Okavango Delta, Botswana".to_string(),
            summary: "Glide through the channels".to_string(),
            description: String::new(),
            duration_days: 7,
            price_per_person: 410_050,
            currency: "USD".to_string(),
            max_group_size: 6,
            highlights: vec!["Mokoro trips".to_string(), "Walking safaris".to_string()],
            image_url: None,
            is_active,
        }
    }

    fn filter(q: &str, role: &str, status: &str) -> UserFilter {
        UserFilter {
            q: Some(q.to_string()),
            role: Some(role.to_string()),
            status: Some(status.to_string()),
            page: None,
        }
    }

    fn ids(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_user_filters_combine() {
        let all = users();
        assert_eq!(filter_users(&all, &UserFilter::default()).len(), 4);
        assert_eq!(ids(&filter_users(&all, &filter("WANJ", "", ""))), vec!["grace"]);
        assert_eq!(ids(&filter_users(&all, &filter("tom@", "", ""))), vec!["tom"]);
        assert_eq!(ids(&filter_users(&all, &filter("", "admin", ""))), vec!["amani"]);
        assert_eq!(ids(&filter_users(&all, &filter("", "", "unverified"))), vec!["tom"]);
        assert_eq!(ids(&filter_users(&all, &filter("", "", "inactive"))), vec!["priya"]);
        assert_eq!(ids(&filter_users(&all, &filter("", "user", "active"))), vec!["grace", "tom"]);
        assert!(filter_users(&all, &filter("nobody", "", "")).is_empty());
    }

    #[test]
    fn test_unknown_filter_values_are_ignored() {
        let f = filter("  ", "superuser", "banned");
        assert_eq!(f.text(), None);
        assert_eq!(f.role(), None);
        assert_eq!(f.status(), None);
        assert!(f.query_pairs().is_empty());
        assert_eq!(filter_users(&users(), &f).len(), 4);
    }

    #[test]
    fn test_page_parameter_parsing() {
        let mut f = UserFilter::default();
        assert_eq!(f.page(), 1);
        f.page = Some("3".to_string());
        assert_eq!(f.page(), 3);
        f.page = Some("three".to_string());
        assert_eq!(f.page(), 1);
    }

    #[test]
    fn test_paginate_clamps_page() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(items.clone(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 23);

        assert_eq!(paginate(items.clone(), 0, 10).page, 1);
        let last = paginate(items, 99, 10);
        assert_eq!(last.page, 3);
        assert_eq!(last.items.len(), 3);

        let empty = paginate(Vec::<u32>::new(), 5, 10);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 1);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_booking_filter_sorts_recent_first() {
        let bookings = vec![
            booking("a", BookingStatus::Pending, 100, "USD", 1),
            booking("b", BookingStatus::Confirmed, 100, "USD", 3),
            booking("c", BookingStatus::Pending, 100, "USD", 2),
        ];
        let all = filter_bookings(&bookings, &BookingFilter::default());
        let ids: Vec<_> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        let pending = BookingFilter {
            status: Some("pending".to_string()),
            page: None,
        };
        let ids: Vec<_> = filter_bookings(&bookings, &pending).iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(pending.query_pairs(), vec![("status".to_string(), "pending".to_string())]);
    }

    #[test]
    fn test_dashboard_stats() {
        let bookings = vec![
            booking("b1", BookingStatus::Confirmed, 712_500, "USD", 1),
            booking("b2", BookingStatus::Completed, 790_000, "usd", 2),
            booking("b3", BookingStatus::Pending, 290_000, "USD", 3),
            booking("b4", BookingStatus::Cancelled, 320_000, "USD", 4),
            booking("b5", BookingStatus::Confirmed, 50_000, "EUR", 5),
            booking("b6", BookingStatus::Pending, 10_000, "USD", 6),
        ];
        let stats = DashboardStats::compute(&users(), &[tour(true), tour(false)], &bookings);

        assert_eq!(stats.users, 4);
        assert_eq!(stats.active_users, 3);
        assert_eq!(stats.admins, 1);
        assert_eq!(stats.tours, 2);
        assert_eq!(stats.active_tours, 1);
        assert_eq!(stats.bookings, 6);
        assert!(stats.bookings_by_status.contains(&(BookingStatus::Pending, 2)));
        assert!(stats.bookings_by_status.contains(&(BookingStatus::Cancelled, 1)));
        assert_eq!(stats.revenue.get("USD"), Some(&1_502_500));
        assert_eq!(stats.revenue.get("EUR"), Some(&50_000));

        let recent: Vec<_> = stats.recent_bookings.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(recent, vec!["b6", "b5", "b4", "b3", "b2"]);
    }

    #[test]
    fn test_dashboard_stats_empty() {
        let stats = DashboardStats::compute(&[], &[], &[]);
        assert_eq!(stats.bookings, 0);
        assert!(stats.revenue.is_empty());
        assert!(stats.recent_bookings.is_empty());
        assert!(stats.bookings_by_status.iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn test_parse_user_update() {
        let form = |role: Option<&str>, active: Option<&str>| UserUpdateForm {
            role: role.map(str::to_string),
            is_active: active.map(str::to_string),
            return_to: None,
        };
        assert_eq!(
            parse_user_update(&form(Some("admin"), None)).unwrap(),
            UserUpdate {
                role: Some(Role::Admin),
                is_active: None
            }
        );
        assert_eq!(
            parse_user_update(&form(None, Some("false"))).unwrap().is_active,
            Some(false)
        );
        assert!(matches!(
            parse_user_update(&form(Some("root"), None)),
            Err(SafariError::ValidationError(_))
        ));
        assert!(matches!(
            parse_user_update(&form(None, Some("maybe"))),
            Err(SafariError::ValidationError(_))
        ));
        assert!(parse_user_update(&form(Some(""), None)).is_err());
    }

    #[test]
    fn test_admins_cannot_lock_themselves_out() {
        let demote = UserUpdate {
            role: Some(Role::User),
            is_active: None,
        };
        let deactivate = UserUpdate {
            role: None,
            is_active: Some(false),
        };
        assert!(matches!(
            check_self_update("amani", "amani", &demote),
            Err(SafariError::ForbiddenError(_))
        ));
        assert!(check_self_update("amani", "amani", &deactivate).is_err());
        assert!(check_self_update("amani", "grace", &demote).is_ok());
        assert!(check_self_update("amani", "grace", &deactivate).is_ok());

        assert!(check_self_delete("amani", "amani").is_err());
        assert!(check_self_delete("amani", "grace").is_ok());
    }

    #[test]
    fn test_return_path_stays_on_users_page() {
        assert_eq!(users_return_path(None), "/admin/users");
        assert_eq!(
            users_return_path(Some("/admin/users?role=admin&page=2")),
            "/admin/users?role=admin&page=2"
        );
        assert_eq!(users_return_path(Some("https://evil.example")), "/admin/users");
        assert_eq!(users_return_path(Some("/admin/users-export")), "/admin/users");
    }

    #[test]
    fn test_status_change_follows_lifecycle() {
        let form = |status: &str| StatusForm {
            status: status.to_string(),
        };
        assert_eq!(
            parse_status_change(BookingStatus::Pending, &form("confirmed")).unwrap(),
            BookingStatus::Confirmed
        );
        assert!(matches!(
            parse_status_change(BookingStatus::Cancelled, &form("confirmed")),
            Err(SafariError::ConflictError(_))
        ));
        assert!(matches!(
            parse_status_change(BookingStatus::Pending, &form("archived")),
            Err(SafariError::ValidationError(_))
        ));
    }

    #[test]
    fn test_parse_price_minor() {
        assert_eq!(parse_price_minor("1250"), Some(125_000));
        assert_eq!(parse_price_minor(" 1250.50 "), Some(125_050));
        assert_eq!(parse_price_minor("1250.5"), Some(125_050));
        assert_eq!(parse_price_minor("0.99"), Some(99));
        assert_eq!(parse_price_minor("1,250"), None);
        assert_eq!(parse_price_minor("-5"), None);
        assert_eq!(parse_price_minor("12.345"), None);
        assert_eq!(parse_price_minor("12."), None);
        assert_eq!(parse_price_minor(".5"), None);
        assert_eq!(parse_price_minor(""), None);
    }

    #[test]
    fn test_tour_form_round_trips_existing_tour() {
        let original = tour(true);
        let form = TourForm::from_tour(&original);
        assert_eq!(form.price, "4100.50");
        assert_eq!(form.highlights, "Mokoro trips\nWalking safaris");
        let input = validate_tour_form(&form).unwrap();
        assert_eq!(input.into_tour(original.id.clone()), original);
    }

    #[test]
    fn test_tour_form_validation() {
        let form = TourForm {
            title: "  ".to_string(),
            destination: "Kenya".to_string(),
            summary: "Short".to_string(),
            duration_days: "61".to_string(),
            price: "free".to_string(),
            currency: "dollars".to_string(),
            max_group_size: "0".to_string(),
            image_url: "ftp://images".to_string(),
            ..TourForm::blank("USD")
        };
        let errors = validate_tour_form(&form).unwrap_err();
        for field in ["title", "duration_days", "price", "currency", "max_group_size", "image_url"] {
            assert!(errors.has(field), "expected an error for {}", field);
        }
        assert!(!errors.has("destination"));
    }

    #[test]
    fn test_new_tour_defaults() {
        let form = TourForm {
            title: "Ruaha Wilderness".to_string(),
            destination: "Ruaha, Tanzania".to_string(),
            summary: "Remote lion country".to_string(),
            duration_days: "5".to_string(),
            price: "2100".to_string(),
            max_group_size: "6".to_string(),
            highlights: "\nLions\n  \nBaobabs  \n".to_string(),
            ..TourForm::blank("usd")
        };
        let input = validate_tour_form(&form).unwrap();
        assert_eq!(input.currency, "USD");
        assert_eq!(input.price_per_person, 210_000);
        assert_eq!(input.highlights, vec!["Lions", "Baobabs"]);
        assert_eq!(input.image_url, None);
        assert!(input.is_active);

        let hidden = TourForm {
            is_active: None,
            ..form
        };
        assert!(!validate_tour_form(&hidden).unwrap().is_active);
    }
}
