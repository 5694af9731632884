use crate::entities::{
    filter::{FilterState, TagDimension},
    gallery_item::{GalleryItemSummary, GalleryKind},
};

use super::{escape, escape_href, page_shell};

/// Everything the gallery page shows: the filtered items plus the chip vocabularies.
pub struct GalleryPage<'a> {
    pub kind: GalleryKind,
    pub items: Vec<&'a GalleryItemSummary>,
    pub categories: &'a [String],
    pub providers: &'a [String],
    pub filters: &'a FilterState,
}

impl GalleryPage<'_> {
    pub fn render(&self) -> String {
        let heading = match self.kind {
            GalleryKind::Card => "Card Gallery",
            GalleryKind::MicroApp => "Micro-app Gallery",
        };

        let body = format!(
            r#"    <main class="gallery">
        <h1>{heading}</h1>
        <section class="filters">
            <h2>Categories</h2>
            <div id="category-filters">{category_chips}</div>
            <h2>Providers</h2>
            <div id="provider-filters">{provider_chips}</div>
        </section>
        <section id="microAppCards" class="cards">
{cards}
        </section>
    </main>"#,
            category_chips = self.chips(TagDimension::Categories, self.categories),
            provider_chips = self.chips(TagDimension::Providers, self.providers),
            cards = self.cards(),
        );

        page_shell(heading, "", &body)
    }

    fn chips(&self, dimension: TagDimension, vocabulary: &[String]) -> String {
        vocabulary
            .iter()
            .map(|tag| {
                let active = if self.filters.is_active(dimension, tag) { " active" } else { "" };
                format!(
                    r#"<a class="filter-tag{active}" data-type="{dimension}" data-value="{value}" href="{href}">{value}</a>"#,
                    value = escape(tag),
                    href = escape_href(&self.href(&self.filters.toggled(dimension, tag))),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn href(&self, filters: &FilterState) -> String {
        let mut query = format!("kind={}", self.kind);
        let filter_query = filters.to_query();
        if !filter_query.is_empty() {
            query.push('&');
            query.push_str(&filter_query);
        }
        format!("/gallery?{query}")
    }

    fn cards(&self) -> String {
        if self.items.is_empty() {
            let noun = match self.kind {
                GalleryKind::Card => "cards",
                GalleryKind::MicroApp => "micro-apps",
            };
            return format!(r#"            <p class="no-results">No {noun} found matching your filters.</p>"#);
        }

        let detail_base = match self.kind {
            GalleryKind::Card => "/api/card",
            GalleryKind::MicroApp => "/api/micro-app",
        };

        self.items
            .iter()
            .map(|item| {
                let tags = item
                    .categories
                    .iter()
                    .map(|c| format!(r#"<span class="tag category-tag">{}</span>"#, escape(c)))
                    .chain(
                        item.providers
                            .iter()
                            .map(|p| format!(r#"<span class="tag provider-tag">{}</span>"#, escape(p))),
                    )
                    .collect::<String>();

                format!(
                    r#"            <article class="micro-app-card" data-id="{id}">
                <div class="card-content">
                    <h3><a href="{detail_base}/{id}">{title}</a></h3>
                    <p>{description}</p>
                    <div class="card-tags">{tags}</div>
                    <div class="card-actions">
                        <span class="upvote-count"><i class="fas fa-thumbs-up"></i> {upvotes}</span>
                    </div>
                </div>
            </article>"#,
                    id = item.id,
                    title = escape(&item.title),
                    description = escape(&item.description),
                    upvotes = item.upvotes,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn summary(title: &str, categories: &[&str], providers: &[&str]) -> GalleryItemSummary {
        GalleryItemSummary {
            id: Uuid::new_v4(),
            kind: GalleryKind::MicroApp,
            title: title.into(),
            description: "desc".into(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            providers: providers.iter().map(|s| s.to_string()).collect(),
            upvotes: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn active_chip_links_back_to_unfiltered_view() {
        let item = summary("Leave", &["HR"], &["Slack"]);
        let filters = FilterState::from_query(Some("HR"), None);
        let categories = vec!["HR".to_string(), "IT".to_string()];
        let providers = vec!["Slack".to_string()];

        let html = GalleryPage {
            kind: GalleryKind::MicroApp,
            items: vec![&item],
            categories: &categories,
            providers: &providers,
            filters: &filters,
        }
        .render();

        assert!(html.contains(r#"class="filter-tag active" data-type="categories" data-value="HR" href="/gallery?kind=micro-app""#));
        assert!(html.contains(r#"href="/gallery?kind=micro-app&amp;categories=HR%2CIT""#));
        assert!(html.contains("Leave"));
    }

    #[test]
    fn empty_result_shows_message() {
        let filters = FilterState::from_query(Some("Finance"), None);
        let html = GalleryPage {
            kind: GalleryKind::Card,
            items: vec![],
            categories: &[],
            providers: &[],
            filters: &filters,
        }
        .render();

        assert!(html.contains("No cards found matching your filters."));
    }

    #[test]
    fn item_text_is_escaped() {
        let item = summary("<img src=x onerror=alert(1)>", &["HR"], &[]);
        let filters = FilterState::new();
        let html = GalleryPage {
            kind: GalleryKind::MicroApp,
            items: vec![&item],
            categories: &[],
            providers: &[],
            filters: &filters,
        }
        .render();

        assert!(!html.contains("<img src=x"));
    }
}
