//! The listing pipeline: filter, sort and paginate the full candidate set
//! of projects on the application side.
//!
//! Visibility depends on the viewer, the subcategory filter falls back to a
//! profile attribute and the search spans several denormalized fields, so
//! the stages compose over an in-memory candidate set (bounded by the
//! repository fetch ceiling) instead of being pushed into SQL. Everything
//! here is a pure function of its inputs.

use serde::Serialize;

use crate::domain::auth::ViewerContext;
use crate::domain::profile::Profile;
use crate::domain::project::Project;
use crate::domain::types::{Category, Subcategory};

/// A project enriched for display: author data and counts recomputed from
/// the authoritative comment/like tables at read time.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectCard {
    pub project: Project,
    pub author_name: Option<String>,
    pub author_subcategory: Option<Subcategory>,
    pub comment_count: usize,
    pub like_count: usize,
}

impl ProjectCard {
    pub fn new(project: Project, author: Option<&Profile>) -> Self {
        Self {
            project,
            author_name: author.map(|p| p.display_name.to_string()),
            author_subcategory: author.and_then(|p| p.subcategory.clone()),
            comment_count: 0,
            like_count: 0,
        }
    }
}

/// Top-level category selection. `All` and `Best` are sentinels: they scope
/// the coarse fetch and disable the subcategory stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Best,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a query-string value. Unknown categories fall back to `All`
    /// rather than erroring, so stale links keep working.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => CategoryFilter::All,
            "best" => CategoryFilter::Best,
            other => other
                .parse::<Category>()
                .map(CategoryFilter::Only)
                .unwrap_or(CategoryFilter::All),
        }
    }
}

/// Filter state of a listing request.
#[derive(Debug, Clone, Default)]
pub struct ListingFilters {
    pub category: CategoryFilter,
    /// `None` means "all subcategories".
    pub subcategory: Option<Subcategory>,
    pub search: Option<String>,
}

/// One page of listing results plus the total over the filtered set.
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub items: Vec<ProjectCard>,
    /// Length of the filtered set, not of the raw fetch.
    pub total: usize,
}

/// Run the full pipeline: search -> subcategory -> visibility -> sort ->
/// paginate. Stage order is normative; each stage narrows the candidate
/// set. `page` is 1-based.
pub fn paginate_projects(
    cards: Vec<ProjectCard>,
    filters: &ListingFilters,
    viewer: &ViewerContext,
    page: usize,
    per_page: usize,
) -> ListingPage {
    let mut cards = cards;

    if let Some(needle) = normalized_query(filters.search.as_deref()) {
        cards.retain(|card| matches_search(card, &needle));
    }

    if let (CategoryFilter::Only(_), Some(subcategory)) = (filters.category, &filters.subcategory) {
        cards.retain(|card| matches_subcategory(card, subcategory));
    }

    cards.retain(|card| viewer.can_view(&card.project));

    // Promoted projects first, newest first within each partition. The sort
    // is stable so equal keys preserve fetch order.
    cards.sort_by(|a, b| {
        b.project
            .is_best
            .cmp(&a.project.is_best)
            .then(b.project.created_at.cmp(&a.project.created_at))
    });

    let total = cards.len();
    let start = (page.max(1) - 1) * per_page;
    let items = if start >= total {
        Vec::new()
    } else {
        cards.into_iter().skip(start).take(per_page).collect()
    };

    ListingPage { items, total }
}

fn normalized_query(search: Option<&str>) -> Option<String> {
    let trimmed = search?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Case-insensitive substring match against title, tag values, owner id,
/// owner display name and the tag-stripped description.
fn matches_search(card: &ProjectCard, needle: &str) -> bool {
    let project = &card.project;
    if project.title.as_str().to_lowercase().contains(needle) {
        return true;
    }
    if project
        .tags
        .iter()
        .any(|tag| tag.as_str().to_lowercase().contains(needle))
    {
        return true;
    }
    if project.owner_id.as_str().to_lowercase().contains(needle) {
        return true;
    }
    if let Some(author) = &card.author_name
        && author.to_lowercase().contains(needle)
    {
        return true;
    }
    strip_tags(&project.description).to_lowercase().contains(needle)
}

/// The record subcategory wins; the author's profile subcategory is the
/// fallback when the record has none.
fn matches_subcategory(card: &ProjectCard, subcategory: &Subcategory) -> bool {
    match (&card.project.subcategory, &card.author_subcategory) {
        (Some(own), _) => own == subcategory,
        (None, Some(profile)) => profile == subcategory,
        (None, None) => false,
    }
}

/// Drop HTML tags from a rich-text description so search sees plain text.
/// Not a sanitizer: output is only compared against the query, never
/// rendered.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Keep a separator so adjacent elements do not merge words.
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ProjectId, ProjectTitle, Tag, UserId};
    use chrono::{DateTime, NaiveDateTime};

    fn ts(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    fn project(id: i32, created: i64) -> Project {
        Project {
            id: ProjectId::new(id).unwrap(),
            owner_id: UserId::new(format!("user-{id}")).unwrap(),
            title: ProjectTitle::new(format!("Project {id}")).unwrap(),
            description: String::new(),
            category: Some(Category::Web),
            subcategory: None,
            tags: vec![],
            is_hidden: false,
            is_best: false,
            views: 0,
            created_at: ts(created),
            updated_at: ts(created),
        }
    }

    fn card(project: Project) -> ProjectCard {
        ProjectCard::new(project, None)
    }

    fn run(
        cards: Vec<ProjectCard>,
        filters: &ListingFilters,
        viewer: &ViewerContext,
        page: usize,
    ) -> ListingPage {
        paginate_projects(cards, filters, viewer, page, 10)
    }

    #[test]
    fn empty_query_matches_everything() {
        let cards = vec![card(project(1, 10)), card(project(2, 20))];
        let filters = ListingFilters {
            search: Some("   ".into()),
            ..Default::default()
        };
        let result = run(cards, &filters, &ViewerContext::anonymous(), 1);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn search_spans_title_tags_owner_and_stripped_description() {
        let mut by_title = project(1, 10);
        by_title.title = ProjectTitle::new("Chess Engine").unwrap();
        let mut by_tag = project(2, 10);
        by_tag.tags = vec![Tag::new("chess").unwrap()];
        let mut by_owner = project(3, 10);
        by_owner.owner_id = UserId::new("chess-master").unwrap();
        let mut by_description = project(4, 10);
        by_description.description = "<p>A <b>chess</b> trainer</p>".into();
        let other = project(5, 10);

        let cards = vec![
            card(by_title),
            card(by_tag),
            card(by_owner),
            card(by_description),
            card(other),
        ];
        let filters = ListingFilters {
            search: Some("CHESS".into()),
            ..Default::default()
        };
        let result = run(cards, &filters, &ViewerContext::anonymous(), 1);
        assert_eq!(result.total, 4);
    }

    #[test]
    fn search_matches_author_display_name() {
        let mut card = card(project(1, 10));
        card.author_name = Some("Мария Иванова".into());
        let filters = ListingFilters {
            search: Some("иванова".into()),
            ..Default::default()
        };
        let result = run(vec![card], &filters, &ViewerContext::anonymous(), 1);
        assert_eq!(result.total, 1);
    }

    #[test]
    fn description_markup_is_not_searchable() {
        let mut with_markup = project(1, 10);
        with_markup.description = "<div class=\"hero\">plain words</div>".into();
        let filters = ListingFilters {
            search: Some("hero".into()),
            ..Default::default()
        };
        let result = run(vec![card(with_markup)], &filters, &ViewerContext::anonymous(), 1);
        assert_eq!(result.total, 0);
    }

    #[test]
    fn subcategory_filter_requires_concrete_category() {
        let mut matching = project(1, 10);
        matching.subcategory = Some(Subcategory::new("frontend").unwrap());
        let mut other = project(2, 10);
        other.subcategory = Some(Subcategory::new("backend").unwrap());

        let concrete = ListingFilters {
            category: CategoryFilter::Only(Category::Web),
            subcategory: Some(Subcategory::new("frontend").unwrap()),
            search: None,
        };
        let result = run(
            vec![card(matching.clone()), card(other.clone())],
            &concrete,
            &ViewerContext::anonymous(),
            1,
        );
        assert_eq!(result.total, 1);

        // Under the `all`/`best` sentinels the subcategory stage is skipped.
        for sentinel in [CategoryFilter::All, CategoryFilter::Best] {
            let filters = ListingFilters {
                category: sentinel,
                subcategory: Some(Subcategory::new("frontend").unwrap()),
                search: None,
            };
            let mut best = matching.clone();
            best.is_best = true;
            let mut other_best = other.clone();
            other_best.is_best = true;
            let result = run(
                vec![card(best), card(other_best)],
                &filters,
                &ViewerContext::anonymous(),
                1,
            );
            assert_eq!(result.total, 2);
        }
    }

    #[test]
    fn subcategory_falls_back_to_profile_attribute() {
        let mut without_own = card(project(1, 10));
        without_own.author_subcategory = Some(Subcategory::new("frontend").unwrap());
        let without_any = card(project(2, 10));

        let filters = ListingFilters {
            category: CategoryFilter::Only(Category::Web),
            subcategory: Some(Subcategory::new("frontend").unwrap()),
            search: None,
        };
        let result = run(
            vec![without_own, without_any],
            &filters,
            &ViewerContext::anonymous(),
            1,
        );
        assert_eq!(result.total, 1);
    }

    #[test]
    fn hidden_projects_are_excluded_for_strangers() {
        let mut hidden = project(1, 10);
        hidden.is_hidden = true;
        let owner = hidden.owner_id.clone();

        let filters = ListingFilters::default();

        let stranger = ViewerContext {
            user_id: Some(UserId::new("someone-else").unwrap()),
            is_admin: false,
        };
        assert_eq!(run(vec![card(hidden.clone())], &filters, &stranger, 1).total, 0);

        let as_owner = ViewerContext {
            user_id: Some(owner),
            is_admin: false,
        };
        assert_eq!(run(vec![card(hidden.clone())], &filters, &as_owner, 1).total, 1);

        let admin = ViewerContext {
            user_id: Some(UserId::new("moderator").unwrap()),
            is_admin: true,
        };
        assert_eq!(run(vec![card(hidden)], &filters, &admin, 1).total, 1);
    }

    #[test]
    fn promoted_projects_sort_first_then_newest() {
        let mut old_best = project(1, 10);
        old_best.is_best = true;
        let new_plain = project(2, 40);
        let mut new_best = project(3, 30);
        new_best.is_best = true;
        let old_plain = project(4, 20);

        let cards = vec![
            card(old_best),
            card(new_plain),
            card(new_best),
            card(old_plain),
        ];
        let result = run(cards, &ListingFilters::default(), &ViewerContext::anonymous(), 1);
        let ids: Vec<i32> = result.items.iter().map(|c| c.project.id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2, 4]);
    }

    #[test]
    fn pages_concatenate_without_gaps_or_duplicates() {
        let cards: Vec<ProjectCard> = (1..=23).map(|i| card(project(i, i as i64))).collect();
        let filters = ListingFilters::default();
        let viewer = ViewerContext::anonymous();

        let first = run(cards.clone(), &filters, &viewer, 1);
        assert_eq!(first.total, 23);
        assert_eq!(first.items.len(), 10);

        let mut seen = Vec::new();
        for page in 1..=3 {
            let result = run(cards.clone(), &filters, &viewer, page);
            assert!(result.items.len() <= 10);
            seen.extend(result.items.iter().map(|c| c.project.id.get()));
        }
        assert_eq!(seen.len(), 23);
        let mut deduped = seen.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), 23);

        let third = run(cards.clone(), &filters, &viewer, 3);
        assert_eq!(third.items.len(), 3);
        let beyond = run(cards, &filters, &viewer, 4);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 23);
    }

    #[test]
    fn total_reflects_filtered_set_not_fetch_size() {
        let mut visible = project(1, 10);
        visible.title = ProjectTitle::new("match me").unwrap();
        let other = project(2, 20);
        let filters = ListingFilters {
            search: Some("match".into()),
            ..Default::default()
        };
        let result = run(
            vec![card(visible), card(other)],
            &filters,
            &ViewerContext::anonymous(),
            1,
        );
        assert_eq!(result.total, 1);
    }

    #[test]
    fn category_filter_parses_sentinels() {
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("Best"), CategoryFilter::Best);
        assert_eq!(
            CategoryFilter::parse("web"),
            CategoryFilter::Only(Category::Web)
        );
        assert_eq!(CategoryFilter::parse("robotics"), CategoryFilter::All);
    }
}
