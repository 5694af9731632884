//! Tag filtering over gallery items.
//!
//! Selection is multi-select within a dimension: toggling a tag adds or
//! removes only that tag. Within a dimension an item matches when it carries
//! any selected tag; across dimensions both must match. A dimension with no
//! selected tags matches everything.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Anything carrying the two tag dimensions.
pub trait Tagged {
    fn categories(&self) -> &[String];
    fn providers(&self) -> &[String];

    fn tags(&self, dimension: TagDimension) -> &[String] {
        match dimension {
            TagDimension::Categories => self.categories(),
            TagDimension::Providers => self.providers(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagDimension {
    Categories,
    Providers,
}

impl TagDimension {
    pub const ALL: [TagDimension; 2] = [TagDimension::Categories, TagDimension::Providers];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagDimension::Categories => "categories",
            TagDimension::Providers => "providers",
        }
    }
}

impl fmt::Display for TagDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub categories: BTreeSet<String>,
    pub providers: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self, dimension: TagDimension) -> &BTreeSet<String> {
        match dimension {
            TagDimension::Categories => &self.categories,
            TagDimension::Providers => &self.providers,
        }
    }

    fn selected_mut(&mut self, dimension: TagDimension) -> &mut BTreeSet<String> {
        match dimension {
            TagDimension::Categories => &mut self.categories,
            TagDimension::Providers => &mut self.providers,
        }
    }

    pub fn is_active(&self, dimension: TagDimension, tag: &str) -> bool {
        self.selected(dimension).contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.providers.is_empty()
    }

    /// Flips membership of `tag`; returns whether it is now selected.
    pub fn toggle(&mut self, dimension: TagDimension, tag: &str) -> bool {
        let set = self.selected_mut(dimension);
        if set.remove(tag) {
            false
        } else {
            set.insert(tag.to_string());
            true
        }
    }

    /// The state one toggle away, leaving `self` untouched.
    pub fn toggled(&self, dimension: TagDimension, tag: &str) -> FilterState {
        let mut next = self.clone();
        next.toggle(dimension, tag);
        next
    }

    pub fn matches<T: Tagged + ?Sized>(&self, item: &T) -> bool {
        TagDimension::ALL.iter().all(|&dimension| {
            let selected = self.selected(dimension);
            selected.is_empty() || item.tags(dimension).iter().any(|t| selected.contains(t))
        })
    }

    /// Parses `categories=a,b&providers=c` style values; blanks are ignored.
    pub fn from_query(categories: Option<&str>, providers: Option<&str>) -> FilterState {
        FilterState {
            categories: split_tags(categories),
            providers: split_tags(providers),
        }
    }

    /// Renders the state as a query string (no leading `?`); empty for no filters.
    pub fn to_query(&self) -> String {
        TagDimension::ALL
            .iter()
            .filter(|d| !self.selected(**d).is_empty())
            .map(|d| {
                let joined = self.selected(*d).iter().cloned().collect::<Vec<_>>().join(",");
                format!("{}={}", d.as_str(), urlencoding::encode(&joined))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn split_tags(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Visible subset of `items` under `filters`, in original order.
pub fn filter_items<'a, T: Tagged>(items: &'a [T], filters: &FilterState) -> Vec<&'a T> {
    items.iter().filter(|item| filters.matches(*item)).collect()
}

/// Owned variant of [`filter_items`] for values already moved out of storage.
pub fn retain_matching<T: Tagged>(items: Vec<T>, filters: &FilterState) -> Vec<T> {
    if filters.is_empty() {
        return items;
    }
    items.into_iter().filter(|item| filters.matches(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        name: &'static str,
        categories: Vec<String>,
        providers: Vec<String>,
    }

    impl Tagged for Item {
        fn categories(&self) -> &[String] {
            &self.categories
        }
        fn providers(&self) -> &[String] {
            &self.providers
        }
    }

    fn item(name: &'static str, categories: &[&str], providers: &[&str]) -> Item {
        Item {
            name,
            categories: categories.iter().map(|s| s.to_string()).collect(),
            providers: providers.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn names(items: Vec<&Item>) -> Vec<&'static str> {
        items.into_iter().map(|i| i.name).collect()
    }

    fn sample() -> Vec<Item> {
        vec![
            item("A", &["HR"], &["Slack"]),
            item("B", &["IT"], &["Slack"]),
        ]
    }

    #[test]
    fn no_filters_returns_everything_in_order() {
        let items = vec![
            item("C", &["Ops"], &[]),
            item("A", &["HR"], &["Slack"]),
            item("B", &[], &["Teams"]),
        ];
        assert_eq!(names(filter_items(&items, &FilterState::new())), vec!["C", "A", "B"]);
    }

    #[test]
    fn category_filter_selects_matching_items() {
        let items = sample();
        let mut filters = FilterState::new();
        filters.toggle(TagDimension::Categories, "HR");
        assert_eq!(names(filter_items(&items, &filters)), vec!["A"]);
    }

    #[test]
    fn provider_filter_alone_keeps_all_providers_matches() {
        let items = sample();
        let mut filters = FilterState::new();
        filters.toggle(TagDimension::Providers, "Slack");
        assert_eq!(names(filter_items(&items, &filters)), vec!["A", "B"]);
    }

    #[test]
    fn dimensions_are_anded() {
        let items = sample();
        let mut filters = FilterState::new();
        filters.toggle(TagDimension::Categories, "HR");
        filters.toggle(TagDimension::Providers, "Slack");
        assert_eq!(names(filter_items(&items, &filters)), vec!["A"]);
    }

    #[test]
    fn values_within_a_dimension_are_ored() {
        let items = sample();
        let mut filters = FilterState::new();
        filters.toggle(TagDimension::Categories, "HR");
        filters.toggle(TagDimension::Categories, "IT");
        assert_eq!(names(filter_items(&items, &filters)), vec!["A", "B"]);
    }

    #[test]
    fn category_mismatch_excludes_regardless_of_provider() {
        let items = sample();
        let mut filters = FilterState::new();
        filters.toggle(TagDimension::Categories, "Finance");
        filters.toggle(TagDimension::Providers, "Slack");
        assert!(filter_items(&items, &filters).is_empty());
    }

    #[test]
    fn untagged_items_only_pass_inactive_dimensions() {
        let items = vec![item("bare", &[], &[])];

        assert_eq!(filter_items(&items, &FilterState::new()).len(), 1);

        let mut filters = FilterState::new();
        filters.toggle(TagDimension::Providers, "Slack");
        assert!(filter_items(&items, &filters).is_empty());
    }

    #[test]
    fn double_toggle_restores_state_and_result() {
        let items = sample();
        let mut filters = FilterState::new();
        filters.toggle(TagDimension::Categories, "IT");
        let before = filters.clone();
        let visible_before = names(filter_items(&items, &filters));

        assert!(filters.toggle(TagDimension::Providers, "Teams"));
        assert!(!filters.toggle(TagDimension::Providers, "Teams"));

        assert_eq!(filters, before);
        assert_eq!(names(filter_items(&items, &filters)), visible_before);
    }

    #[test]
    fn toggled_does_not_mutate_original() {
        let filters = FilterState::new();
        let next = filters.toggled(TagDimension::Categories, "HR");
        assert!(filters.is_empty());
        assert!(next.is_active(TagDimension::Categories, "HR"));
    }

    #[test]
    fn filtering_is_repeatable() {
        let items = sample();
        let filters = FilterState::from_query(Some("IT"), None);
        assert_eq!(filter_items(&items, &filters), filter_items(&items, &filters));
    }

    #[test]
    fn query_round_trip_preserves_selection() {
        let filters = FilterState::from_query(Some("HR, IT,,"), Some("Google Workspace"));
        assert_eq!(filters.categories.len(), 2);

        let query = filters.to_query();
        assert_eq!(query, "categories=HR%2CIT&providers=Google%20Workspace");
        assert_eq!(FilterState::from_query(Some("HR,IT"), Some("Google Workspace")), filters);
    }

    #[test]
    fn empty_state_has_empty_query() {
        assert_eq!(FilterState::new().to_query(), "");
    }

    #[test]
    fn retain_matching_keeps_owned_order() {
        let filters = FilterState::from_query(None, Some("Slack"));
        let kept = retain_matching(sample(), &filters);
        assert_eq!(kept.iter().map(|i| i.name).collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
