//! Global search suggestions.

use serde::Serialize;

use crate::lookup::{self, find_by_id};
use crate::models::{Apartment, Block, Category, Project, Reserve};
use crate::types::EntityId;

/// Suggestions returned for one query.
pub const SUGGESTION_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Project,
    Block,
    Apartment,
    Category,
    Reserve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuggestion {
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub id: EntityId,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub projects: &'a [Project],
    pub blocks: &'a [Block],
    pub apartments: &'a [Apartment],
    pub categories: &'a [Category],
    pub reserves: &'a [Reserve],
}

/// Case-insensitive substring search, grouped by kind in the order
/// projects, blocks, apartments, categories, reserves, capped at
/// [`SUGGESTION_LIMIT`]. A blank query yields nothing.
pub fn suggestions(ctx: &SearchContext<'_>, query: &str) -> Vec<SearchSuggestion> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let hit = |s: &str| s.to_lowercase().contains(&needle);
    let mut out = Vec::new();

    for p in ctx.projects.iter().filter(|p| hit(&p.name)) {
        out.push(SearchSuggestion {
            kind: SearchKind::Project,
            id: p.id.clone(),
            title: p.name.clone(),
            subtitle: "Projet".to_string(),
        });
    }
    for b in ctx.blocks.iter().filter(|b| hit(&b.name)) {
        out.push(SearchSuggestion {
            kind: SearchKind::Block,
            id: b.id.clone(),
            title: b.name.clone(),
            subtitle: format!("Bloc - {}", lookup::project_name(ctx.projects, &b.project_id)),
        });
    }
    for a in ctx.apartments.iter().filter(|a| hit(&a.number)) {
        let project = find_by_id(ctx.projects, &a.project_id).map_or("Projet", |p| p.name.as_str());
        let block = find_by_id(ctx.blocks, &a.block_id).map_or("Bloc", |b| b.name.as_str());
        out.push(SearchSuggestion {
            kind: SearchKind::Apartment,
            id: a.id.clone(),
            title: a.number.clone(),
            subtitle: format!("{project} / {block}"),
        });
    }
    for c in ctx.categories.iter().filter(|c| hit(&c.name)) {
        out.push(SearchSuggestion {
            kind: SearchKind::Category,
            id: c.id.clone(),
            title: c.name.clone(),
            subtitle: "Catégorie".to_string(),
        });
    }
    for r in ctx
        .reserves
        .iter()
        .filter(|r| hit(&r.title) || hit(&r.description))
    {
        out.push(SearchSuggestion {
            kind: SearchKind::Reserve,
            id: r.id.clone(),
            title: r.title.clone(),
            subtitle: format!(
                "Réserve - {}",
                lookup::project_name(ctx.projects, &r.project_id)
            ),
        });
    }

    out.truncate(SUGGESTION_LIMIT);
    out
}
