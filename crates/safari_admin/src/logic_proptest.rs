#[cfg(test)]
mod tests {
    use crate::logic::{paginate, parse_price_minor};
    use proptest::prelude::*;

    proptest! {
        // Every item lands on exactly one page, in order
        #[test]
        fn test_pages_partition_items(len in 0usize..200, page_size in 1usize..30) {
            let items: Vec<usize> = (0..len).collect();
            let first = paginate(items.clone(), 1, page_size);
            let mut seen = Vec::new();
            for number in 1..=first.total_pages {
                let page = paginate(items.clone(), number, page_size);
                prop_assert_eq!(page.page, number);
                prop_assert!(page.items.len() <= page_size);
                seen.extend(page.items);
            }
            prop_assert_eq!(seen, items);
        }

        // Any requested page number yields a page within range
        #[test]
        fn test_page_is_clamped(len in 0usize..100, page_size in 1usize..20, requested in 0usize..1000) {
            let page = paginate((0..len).collect::<Vec<_>>(), requested, page_size);
            prop_assert!(page.total_pages >= 1);
            prop_assert!(page.page >= 1 && page.page <= page.total_pages);
            prop_assert_eq!(page.total_items, len);
            if len > 0 {
                prop_assert!(!page.items.is_empty());
            }
        }

        // Prices formatted with two decimals parse back to the same minor units
        #[test]
        fn test_price_parses_major_units(minor in 0i64..100_000_000) {
            let text = format!("{}.{:02}", minor / 100, minor % 100);
            prop_assert_eq!(parse_price_minor(&text), Some(minor));
        }
    }
}
