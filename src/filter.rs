use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::Item;

/// Maximum number of entries in the latest panel.
pub const LATEST_LIMIT: usize = 8;

static YEAR_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("valid regex"));

/// True for genre entries that are really a release-year tag.
pub fn is_year_tag(s: &str) -> bool {
    YEAR_TAG.is_match(s)
}

/// Current calendar year in local time, as four digits.
pub fn current_year() -> String {
    chrono::Local::now().format("%Y").to_string()
}

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn haystack(item: &Item) -> String {
    format!(
        "{} {} {}",
        item.title(),
        item.description.as_deref().unwrap_or(""),
        item.genres.join(" ")
    )
    .to_lowercase()
}

/// Text match against an already normalized query.
pub fn matches_query(item: &Item, normalized: &str) -> bool {
    normalized.is_empty() || haystack(item).contains(normalized)
}

/// Selector match: a genre (any casing) or a release-date prefix.
pub fn matches_selector(item: &Item, selector: &str) -> bool {
    if selector.trim().is_empty() {
        return true;
    }
    let needle = selector.to_lowercase();
    item.genres.iter().any(|g| g.to_lowercase() == needle)
        || item
            .release_date
            .as_deref()
            .is_some_and(|date| date.starts_with(selector))
}

/// Indices of the visible items, in catalog order.
pub fn filter_items(items: &[Item], query: &str, selector: &str) -> Vec<usize> {
    let normalized = normalize_query(query);
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches_selector(item, selector) && matches_query(item, &normalized))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of the first items tagged with or released in `year`.
pub fn latest(items: &[Item], year: &str) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.genres.iter().any(|g| g == year)
                || item
                    .release_date
                    .as_deref()
                    .is_some_and(|date| date.starts_with(year))
        })
        .map(|(i, _)| i)
        .take(LATEST_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(title: &str, genres: &[&str], release: Option<&str>) -> Item {
        Item {
            title: Some(title.to_string()),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            release_date: release.map(str::to_string),
            ..Default::default()
        }
    }

    fn scenario() -> Vec<Item> {
        vec![
            Item {
                kind: Some("series".to_string()),
                episode_links: vec![Some("u1".to_string()), Some("u2".to_string())],
                ..item("A", &["2024"], None)
            },
            item("B", &["Action"], Some("2023-01-01")),
        ]
    }

    #[test]
    fn test_scenario_selectors() {
        let items = scenario();
        assert_eq!(filter_items(&items, "", "2024"), vec![0]);
        assert_eq!(filter_items(&items, "", "Action"), vec![1]);
        assert_eq!(filter_items(&items, "", "action"), vec![1]);
        assert_eq!(filter_items(&items, "", "2023"), vec![1]);
    }

    #[test]
    fn test_scenario_query_a() {
        // "a" appears in title "A" and in genre "Action".
        let items = scenario();
        assert_eq!(filter_items(&items, "a", ""), vec![0, 1]);
        assert_eq!(filter_items(&items, "  B ", ""), vec![1]);
        assert_eq!(filter_items(&items, "2024", ""), vec![0]);
    }

    #[test]
    fn test_missing_description_is_not_undefined() {
        let items = vec![item("Plain", &[], None)];
        assert!(filter_items(&items, "undefined", "").is_empty());
    }

    #[test]
    fn test_query_searches_description() {
        let items = vec![Item {
            description: Some("A heist in Mumbai".to_string()),
            ..item("Untitled Project", &[], None)
        }];
        assert_eq!(filter_items(&items, "MUMBAI", ""), vec![0]);
    }

    #[test]
    fn test_release_prefix_is_case_sensitive_genre_is_not() {
        let items = vec![item("x", &["Drama"], Some("Soon"))];
        assert_eq!(filter_items(&items, "", "DRAMA"), vec![0]);
        assert_eq!(filter_items(&items, "", "Soon"), vec![0]);
        assert!(filter_items(&items, "", "soon").is_empty());
    }

    #[test]
    fn test_whitespace_selector_matches_all() {
        let items = scenario();
        assert_eq!(filter_items(&items, "", "  "), vec![0, 1]);
    }

    #[test]
    fn test_latest_uses_year_tag_or_release_prefix() {
        let items = vec![
            item("tagged", &["2024"], None),
            item("dated", &[], Some("2024-05-01")),
            item("old", &["2023"], Some("2023-02-02")),
            item("lowercase tag is exact", &["Drama"], None),
        ];
        assert_eq!(latest(&items, "2024"), vec![0, 1]);
    }

    #[test]
    fn test_latest_is_truncated_in_order() {
        let items: Vec<Item> = (0..12)
            .map(|i| item(&format!("t{i}"), &["2025"], None))
            .collect();
        assert_eq!(latest(&items, "2025"), (0..LATEST_LIMIT).collect::<Vec<_>>());
    }

    #[test]
    fn test_is_year_tag() {
        assert!(is_year_tag("2024"));
        assert!(!is_year_tag("Action"));
        assert!(!is_year_tag("20245"));
        assert!(!is_year_tag("202"));
        assert_eq!(current_year().len(), 4);
        assert!(is_year_tag(&current_year()));
    }

    fn arb_item() -> impl Strategy<Value = Item> {
        (
            "[a-cA-C ]{0,6}",
            prop::option::of("[a-c ]{0,8}"),
            prop::collection::vec(
                prop_oneof![Just("Action"), Just("drama"), Just("2024"), Just("Comedy")],
                0..3,
            ),
            prop::option::of(prop_oneof![Just("2024-05-01"), Just("2023-01-01"), Just("2024")]),
        )
            .prop_map(|(title, description, genres, release)| Item {
                title: Some(title),
                description,
                genres: genres.into_iter().map(str::to_string).collect(),
                release_date: release.map(str::to_string),
                ..Default::default()
            })
    }

    fn arb_selector() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("Action".to_string()),
            Just("DRAMA".to_string()),
            Just("2024".to_string()),
            Just("2023".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn prop_filter_is_ordered_subsequence(
            items in prop::collection::vec(arb_item(), 0..30),
            query in "[a-c]{0,2}",
            selector in arb_selector(),
        ) {
            let visible = filter_items(&items, &query, &selector);
            prop_assert!(visible.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(visible.iter().all(|&i| i < items.len()));
        }

        #[test]
        fn prop_longer_query_never_widens(
            items in prop::collection::vec(arb_item(), 0..30),
            q1 in "[a-c]{0,2}",
            prefix in "[a-c ]{0,2}",
            suffix in "[a-c ]{0,2}",
        ) {
            let q2 = format!("{prefix}{q1}{suffix}");
            prop_assert!(filter_items(&items, &q2, "").len() <= filter_items(&items, &q1, "").len());
        }

        #[test]
        fn prop_empty_selector_only_applies_query(
            items in prop::collection::vec(arb_item(), 0..30),
            query in "[a-c]{0,2}",
        ) {
            let expected: Vec<usize> = items
                .iter()
                .enumerate()
                .filter(|(_, it)| matches_query(it, &normalize_query(&query)))
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(filter_items(&items, &query, ""), expected);
            prop_assert_eq!(filter_items(&items, "", "").len(), items.len());
        }

        #[test]
        fn prop_exact_genre_selects_regardless_of_release(
            items in prop::collection::vec(arb_item(), 1..20),
        ) {
            for (i, it) in items.iter().enumerate() {
                for genre in &it.genres {
                    prop_assert!(filter_items(&items, "", genre).contains(&i));
                    prop_assert!(filter_items(&items, "", &genre.to_uppercase()).contains(&i));
                }
            }
        }

        #[test]
        fn prop_year_selector_includes_release_prefix(
            items in prop::collection::vec(arb_item(), 1..20),
        ) {
            let visible = filter_items(&items, "", "2024");
            for (i, it) in items.iter().enumerate() {
                if it.release_date.as_deref().is_some_and(|d| d.starts_with("2024")) {
                    prop_assert!(visible.contains(&i));
                }
            }
        }
    }
}
