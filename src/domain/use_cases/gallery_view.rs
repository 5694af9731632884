//! Client-side state for one gallery page.
//!
//! `GalleryView` is the single owner of the loaded items, the chip
//! vocabularies and the active filters. Every reload or filter change issues a
//! [`RequestTicket`]; a response is applied only when its ticket is still the
//! latest one issued, so a slow response can never overwrite a newer one.
//! Upvotes are sequenced the same way, per item.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{
    filter::{filter_items, FilterState, TagDimension},
    gallery_item::{GalleryItemSummary, GalleryKind},
};

/// Sequence number handed out with each outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Everything a page load fetches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GallerySnapshot {
    pub items: Vec<GalleryItemSummary>,
    pub categories: Vec<String>,
    pub providers: Vec<String>,
}

#[derive(Debug, Default)]
pub struct GalleryView {
    kind: GalleryKind,
    items: Vec<GalleryItemSummary>,
    categories: Vec<String>,
    providers: Vec<String>,
    filters: FilterState,
    next_sequence: u64,
    latest_list: Option<RequestTicket>,
    latest_upvotes: HashMap<Uuid, RequestTicket>,
}

impl GalleryView {
    pub fn new(kind: GalleryKind) -> Self {
        GalleryView { kind, ..Self::default() }
    }

    pub fn kind(&self) -> GalleryKind {
        self.kind
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn items(&self) -> &[GalleryItemSummary] {
        &self.items
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    /// The items currently shown: the loaded list narrowed by the active filters.
    pub fn visible(&self) -> Vec<&GalleryItemSummary> {
        filter_items(&self.items, &self.filters)
    }

    fn issue(&mut self) -> RequestTicket {
        self.next_sequence += 1;
        RequestTicket(self.next_sequence)
    }

    /// Starts a page (re)load; only the returned ticket's snapshot will be applied.
    pub fn reload(&mut self) -> RequestTicket {
        let ticket = self.issue();
        self.latest_list = Some(ticket);
        ticket
    }

    /// Flips a filter chip. The visible set changes immediately; the ticket
    /// covers a server-side refetch under the new filters.
    pub fn toggle(&mut self, dimension: TagDimension, tag: &str) -> RequestTicket {
        self.filters.toggle(dimension, tag);
        self.reload()
    }

    pub fn clear_filters(&mut self) -> RequestTicket {
        self.filters = FilterState::new();
        self.reload()
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest_list == Some(ticket)
    }

    /// Applies a full page load. Returns `false` (and changes nothing) for a stale ticket.
    pub fn apply_snapshot(&mut self, ticket: RequestTicket, snapshot: GallerySnapshot) -> bool {
        if !self.is_latest(ticket) {
            tracing::debug!(sequence = ticket.sequence(), "Discarding stale gallery snapshot");
            return false;
        }
        self.items = snapshot.items;
        self.categories = snapshot.categories;
        self.providers = snapshot.providers;
        true
    }

    /// Applies a refreshed item list, keeping the vocabularies.
    pub fn apply_items(&mut self, ticket: RequestTicket, items: Vec<GalleryItemSummary>) -> bool {
        if !self.is_latest(ticket) {
            tracing::debug!(sequence = ticket.sequence(), "Discarding stale item list");
            return false;
        }
        self.items = items;
        true
    }

    pub fn begin_upvote(&mut self, id: Uuid) -> RequestTicket {
        let ticket = self.issue();
        self.latest_upvotes.insert(id, ticket);
        ticket
    }

    /// Records the server's count for `id` unless a newer upvote for it is in flight.
    pub fn apply_upvote(&mut self, id: Uuid, ticket: RequestTicket, upvotes: u64) -> bool {
        if self.latest_upvotes.get(&id) != Some(&ticket) {
            return false;
        }
        self.latest_upvotes.remove(&id);

        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.upvotes = upvotes;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary(title: &str, categories: &[&str], providers: &[&str]) -> GalleryItemSummary {
        GalleryItemSummary {
            id: Uuid::new_v4(),
            kind: GalleryKind::MicroApp,
            title: title.into(),
            description: String::new(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            providers: providers.iter().map(|s| s.to_string()).collect(),
            upvotes: 0,
            created_at: Utc::now(),
        }
    }

    fn snapshot() -> GallerySnapshot {
        GallerySnapshot {
            items: vec![
                summary("A", &["HR"], &["Google Workspace"]),
                summary("B", &["HR", "IT"], &["Microsoft 365"]),
            ],
            categories: vec!["HR".into(), "IT".into()],
            providers: vec!["Google Workspace".into(), "Microsoft 365".into()],
        }
    }

    fn titles(view: &GalleryView) -> Vec<&str> {
        view.visible().iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn tickets_increase_strictly() {
        let mut view = GalleryView::new(GalleryKind::MicroApp);
        let first = view.reload();
        let second = view.toggle(TagDimension::Categories, "HR");
        let third = view.begin_upvote(Uuid::new_v4());
        assert!(first < second && second < third);
    }

    #[test]
    fn toggles_recompute_visible_items() {
        let mut view = GalleryView::new(GalleryKind::MicroApp);
        let ticket = view.reload();
        assert!(view.apply_snapshot(ticket, snapshot()));
        assert_eq!(titles(&view), vec!["A", "B"]);

        view.toggle(TagDimension::Categories, "IT");
        assert_eq!(titles(&view), vec!["B"]);

        view.toggle(TagDimension::Categories, "IT");
        view.toggle(TagDimension::Providers, "Google Workspace");
        assert_eq!(titles(&view), vec!["A"]);

        view.clear_filters();
        assert_eq!(titles(&view), vec!["A", "B"]);
    }

    #[test]
    fn stale_snapshot_is_discarded() {
        let mut view = GalleryView::new(GalleryKind::MicroApp);
        let slow = view.reload();
        let fast = view.reload();

        let mut newer = snapshot();
        newer.items.truncate(1);
        assert!(view.apply_snapshot(fast, newer));
        assert!(!view.apply_snapshot(slow, snapshot()));
        assert_eq!(view.items().len(), 1);
    }

    #[test]
    fn filter_change_invalidates_earlier_list_request() {
        let mut view = GalleryView::new(GalleryKind::MicroApp);
        let load = view.reload();
        let refetch = view.toggle(TagDimension::Categories, "HR");

        assert!(!view.apply_items(load, snapshot().items));
        assert!(view.apply_items(refetch, snapshot().items));
    }

    #[test]
    fn only_latest_upvote_per_item_is_applied() {
        let mut view = GalleryView::new(GalleryKind::MicroApp);
        let ticket = view.reload();
        view.apply_snapshot(ticket, snapshot());
        let id = view.items()[0].id;
        let other = view.items()[1].id;

        let first = view.begin_upvote(id);
        let second = view.begin_upvote(id);
        let unrelated = view.begin_upvote(other);

        assert!(view.apply_upvote(id, second, 2));
        assert!(!view.apply_upvote(id, first, 1));
        assert_eq!(view.items()[0].upvotes, 2);

        assert!(view.apply_upvote(other, unrelated, 7));
        assert_eq!(view.items()[1].upvotes, 7);
    }
}
