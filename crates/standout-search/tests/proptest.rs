//! Property-based tests for standout-search using proptest.

use proptest::prelude::*;
use standout_search::{levenshtein, read, FieldRead, ReadFn, Search, SearchExt, Searchable};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
struct Item {
    id: usize,
    title: String,
    body: String,
}

fn item_title(item: &Item) -> FieldRead<'_> {
    read::text(&item.title)
}

fn item_body(item: &Item) -> FieldRead<'_> {
    read::text(&item.body)
}

impl Searchable for Item {
    fn search_field(name: &str) -> Option<ReadFn<Self>> {
        match name {
            "title" => Some(item_title),
            "body" => Some(item_body),
            _ => None,
        }
    }
}

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(("[a-c ]{0,12}", "[a-c ]{0,12}"), 0..40).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(id, (title, body))| Item { id, title, body })
            .collect()
    })
}

fn terms_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]{1,3}", 1..5)
}

fn ids(found: Vec<&Item>) -> Vec<usize> {
    found.into_iter().map(|i| i.id).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Adding a term to ContainingAll never adds matches.
    #[test]
    fn containing_all_is_monotone_non_increasing(
        items in items_strategy(),
        terms in terms_strategy(),
        extra in "[a-c]{1,3}",
    ) {
        let base = items.search(["title", "body"]).unwrap();
        let fewer = ids(base.containing_all(&terms).unwrap().to_vec().unwrap());
        let mut more_terms = terms.clone();
        more_terms.push(extra);
        let more = ids(base.containing_all(&more_terms).unwrap().to_vec().unwrap());

        prop_assert!(more.iter().all(|id| fewer.contains(id)));
    }

    /// Adding a term to ContainingAny never removes matches.
    #[test]
    fn containing_any_is_monotone_non_decreasing(
        items in items_strategy(),
        terms in terms_strategy(),
        extra in "[a-c]{1,3}",
    ) {
        let base = items.search(["title", "body"]).unwrap();
        let fewer = ids(base.containing_any(&terms).unwrap().to_vec().unwrap());
        let mut more_terms = terms.clone();
        more_terms.push(extra);
        let more = ids(base.containing_any(&more_terms).unwrap().to_vec().unwrap());

        prop_assert!(fewer.iter().all(|id| more.contains(id)));
    }

    /// Equals ignores case unless asked not to.
    #[test]
    fn equals_ignores_case(
        items in items_strategy(),
        term in "[a-cA-C]{1,4}",
    ) {
        let base = items.search(["title"]).unwrap();
        let as_given = ids(base.equal_to([term.as_str()]).unwrap().to_vec().unwrap());
        let upper = ids(base.equal_to([term.to_uppercase()]).unwrap().to_vec().unwrap());
        let expected: Vec<usize> = items
            .iter()
            .filter(|i| i.title.to_lowercase() == term.to_lowercase())
            .map(|i| i.id)
            .collect();

        prop_assert_eq!(&as_given, &upper);
        prop_assert_eq!(as_given, expected);
    }

    /// OR-combining two criteria gives the same set in either order.
    #[test]
    fn or_is_commutative(
        items in items_strategy(),
        a in "[a-c]{1,2}",
        b in "[a-c]{1,2}",
    ) {
        let left = Search::records(&items)
            .fields(["title"]).unwrap()
            .containing([a.as_str()]).unwrap()
            .or_fields(["body"]).unwrap()
            .starting_with([b.as_str()]).unwrap();
        let right = Search::records(&items)
            .fields(["body"]).unwrap()
            .starting_with([b.as_str()]).unwrap()
            .or_fields(["title"]).unwrap()
            .containing([a.as_str()]).unwrap();

        prop_assert_eq!(ids(left.to_vec().unwrap()), ids(right.to_vec().unwrap()));
    }

    /// A later AND stage only ever narrows the result.
    #[test]
    fn and_stages_narrow(
        items in items_strategy(),
        a in "[a-c]{1,2}",
        b in "[a-c]{1,2}",
    ) {
        let first = items.search(["title"]).unwrap().containing([a.as_str()]).unwrap();
        let second = first.fields(["body"]).unwrap().containing([b.as_str()]).unwrap();

        let wide = ids(first.to_vec().unwrap());
        let narrow = ids(second.to_vec().unwrap());
        prop_assert!(narrow.iter().all(|id| wide.contains(id)));
        prop_assert!(narrow.len() <= wide.len());
    }

    /// A larger maximum distance never loses fuzzy matches.
    #[test]
    fn fuzzy_is_monotone_in_distance(
        items in items_strategy(),
        term in "[a-c]{1,4}",
        distance in 0usize..3,
    ) {
        let base = items.search(["title"]).unwrap();
        let near = ids(base.fuzzy([term.as_str()], distance).unwrap().to_vec().unwrap());
        let far = ids(base.fuzzy([term.as_str()], distance + 1).unwrap().to_vec().unwrap());

        prop_assert!(near.iter().all(|id| far.contains(id)));
    }

    /// Filtering never grows the collection and keeps source order.
    #[test]
    fn results_are_an_ordered_subset(
        items in items_strategy(),
        terms in terms_strategy(),
    ) {
        let found = ids(items.search(["title", "body"]).unwrap().containing(&terms).unwrap().to_vec().unwrap());
        prop_assert!(found.len() <= items.len());
        prop_assert!(found.windows(2).all(|w| w[0] < w[1]));
    }

    /// Levenshtein distance is symmetric and zero only for equal strings.
    #[test]
    fn levenshtein_is_symmetric(a in "\\PC{0,8}", b in "\\PC{0,8}") {
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
        prop_assert_eq!(levenshtein(&a, &b) == 0, a == b);
        prop_assert!(levenshtein(&a, &b) <= a.chars().count().max(b.chars().count()));
    }
}
