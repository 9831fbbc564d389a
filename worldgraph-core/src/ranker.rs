//! Ranked name search across every entity kind.

use crate::catalog::Catalog;
use crate::collector::fetch_kind;
use crate::graph::SearchResult;
use crate::record::WorldId;
use crate::store::{RecordQuery, WorldStore};
use futures::future::join_all;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// How well a name matches a query. Better tiers sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    /// Name equals the query, ignoring case.
    Exact,
    /// Name starts with the query.
    Prefix,
    /// Name contains the query elsewhere, or the query is empty.
    Contains,
}

impl MatchTier {
    /// Classify `name` against an already lowercased query.
    pub fn classify(name_lower: &str, query_lower: &str) -> Self {
        if query_lower.is_empty() {
            MatchTier::Contains
        } else if name_lower == query_lower {
            MatchTier::Exact
        } else if name_lower.starts_with(query_lower) {
            MatchTier::Prefix
        } else {
            MatchTier::Contains
        }
    }
}

/// Per-kind share of `limit`, rounded up.
///
/// Unused shares are not handed to other kinds.
pub fn per_kind_cap(limit: usize, kinds: usize) -> usize {
    if kinds == 0 {
        return 0;
    }
    limit.div_ceil(kinds)
}

/// Order results by tier, then alphabetically, and truncate to `limit`.
///
/// A whitespace-only query ranks like an empty one. Any other query is
/// compared as given, surrounding spaces included.
pub fn rank(results: Vec<SearchResult>, query: &str, limit: usize) -> Vec<SearchResult> {
    let query_lower = if query.trim().is_empty() {
        String::new()
    } else {
        query.to_lowercase()
    };
    let mut keyed: Vec<(MatchTier, SearchResult)> = results
        .into_iter()
        .map(|result| {
            let tier = MatchTier::classify(&result.name.to_lowercase(), &query_lower);
            (tier, result)
        })
        .collect();

    keyed.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| compare_names(&a.1.name, &b.1.name))
            .then_with(|| a.1.id.cmp(&b.1.id))
    });

    keyed
        .into_iter()
        .take(limit)
        .map(|(_, result)| result)
        .collect()
}

/// Searches names across all kinds in a catalog.
pub struct Ranker<'a, S: ?Sized> {
    catalog: &'a Catalog,
    store: &'a S,
}

impl<'a, S: WorldStore + ?Sized> Ranker<'a, S> {
    pub fn new(catalog: &'a Catalog, store: &'a S) -> Self {
        Self { catalog, store }
    }

    /// Find up to `limit` entities of `world` whose name contains `query`.
    ///
    /// Each kind contributes at most [`per_kind_cap`] candidates, so fewer than
    /// `limit` results can come back even when more matches exist. An empty or
    /// whitespace-only query matches everything; any other query is used
    /// verbatim as the substring.
    pub async fn search(&self, world: &WorldId, query: &str, limit: usize) -> Vec<SearchResult> {
        if limit == 0 || self.catalog.is_empty() {
            return Vec::new();
        }

        let query = if query.trim().is_empty() { "" } else { query };
        let cap = per_kind_cap(limit, self.catalog.len());
        let record_query = if query.is_empty() {
            RecordQuery::all().with_limit(cap)
        } else {
            RecordQuery::name_contains(query).with_limit(cap)
        };

        let fetches = self
            .catalog
            .entries()
            .iter()
            .map(|config| fetch_kind(self.store, config, world, &record_query));
        let results = join_all(fetches).await;

        let mut candidates = Vec::new();
        for (config, result) in self.catalog.entries().iter().zip(results) {
            let Some((records, _)) = result else {
                continue;
            };
            let mut seen = HashSet::new();
            candidates.extend(
                records
                    .into_iter()
                    .filter(|r| record_query.matches(&r.name))
                    .filter(|r| {
                        let first = seen.insert(r.id.clone());
                        if !first {
                            debug!(kind = %config.kind, id = %r.id, "skipping duplicate id");
                        }
                        first
                    })
                    .take(cap)
                    .map(|r| SearchResult {
                        id: r.id,
                        name: r.name,
                        kind: config.kind,
                        description: r.description,
                    }),
            );
        }

        let ranked = rank(candidates, query, limit);
        debug!(world = %world, query, results = ranked.len(), "search complete");
        ranked
    }
}

/// Compare two names the way search results are ordered within a tier.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
