#[cfg(test)]
mod tests {
    use crate::logic::quote;
    use proptest::prelude::*;

    proptest! {
        // The total is always the sum of its parts
        #[test]
        fn test_quote_total_is_sum_of_parts(
            price in 0i64..10_000_000,
            adults in 0u32..20,
            children in 0u32..20,
            rate in 0u32..=100,
        ) {
            let q = quote(price, "USD", adults, children, rate);
            prop_assert_eq!(q.adult_total, price * i64::from(adults));
            prop_assert_eq!(q.total, q.adult_total + q.child_total);
        }

        // Rounding moves the children's total by at most half a minor unit
        #[test]
        fn test_child_total_rounds_half_up(
            price in 0i64..10_000_000,
            children in 0u32..20,
            rate in 0u32..=100,
        ) {
            let q = quote(price, "USD", 1, children, rate);
            let exact_hundredths = price as i128 * i128::from(children) * i128::from(rate);
            let rounded = i128::from(q.child_total) * 100;
            prop_assert!(rounded - exact_hundredths <= 50);
            prop_assert!(exact_hundredths - rounded < 50);
        }

        // Children never cost more than adults, and full rate means adult price
        #[test]
        fn test_child_rate_bounds(
            price in 0i64..10_000_000,
            children in 1u32..20,
            rate in 0u32..=100,
        ) {
            let discounted = quote(price, "USD", 0, children, rate);
            let full = quote(price, "USD", 0, children, 100);
            prop_assert!(discounted.child_total <= full.child_total);
            prop_assert_eq!(full.child_total, price * i64::from(children));
        }

        // Adding a traveller never lowers the price
        #[test]
        fn test_quote_is_monotonic(
            price in 0i64..10_000_000,
            adults in 1u32..20,
            children in 0u32..20,
            rate in 0u32..=100,
        ) {
            let base = quote(price, "USD", adults, children, rate);
            prop_assert!(quote(price, "USD", adults + 1, children, rate).total >= base.total);
            prop_assert!(quote(price, "USD", adults, children + 1, rate).total >= base.total);
        }
    }
}
