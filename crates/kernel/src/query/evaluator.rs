//! Specification evaluation against an abstract data source.
//!
//! A [`DataSource`] hands out composable [`EntityQuery`] values. The
//! [`SpecificationEvaluator`] applies a [`Specification`] to such a query in a
//! fixed order (filter, order, include, page) and runs one of the terminals.

use async_trait::async_trait;
use serde::Serialize;

use crate::query::entity::{Entity, Relation};
use crate::query::predicate::Predicate;
use crate::query::specification::{SortKey, Specification};

/// Something that can produce queries over entity `E`.
pub trait DataSource<E: Entity>: Send + Sync {
    /// Failure raised by the underlying store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The composable query type this source produces.
    type Query: EntityQuery<E, Error = Self::Error>;

    /// Start a query over every entity in the set.
    fn query(&self) -> Self::Query;
}

/// A composable, lazily executed query over entity `E`.
///
/// Builder methods only record intent; nothing touches the store until
/// [`fetch`](EntityQuery::fetch) or [`count`](EntityQuery::count) runs.
#[async_trait]
pub trait EntityQuery<E: Entity>: Send + Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Keep only entities matching `predicate`. Repeated calls AND together.
    fn filter(self, predicate: &Predicate<E>) -> Self;

    /// Replace any ordering with `key` as the primary sort key.
    fn order_by(self, key: SortKey<E>) -> Self;

    /// Add `key` as a tie-breaker after the existing keys.
    fn then_by(self, key: SortKey<E>) -> Self;

    /// Eagerly load `relation` into every returned entity.
    fn include(self, relation: Relation<E>) -> Self;

    fn skip(self, count: u64) -> Self;

    fn take(self, count: u64) -> Self;

    /// Materialize the matching entities.
    async fn fetch(self) -> Result<Vec<E>, Self::Error>;

    /// Count the matching entities.
    async fn count(self) -> Result<u64, Self::Error>;
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedResult<E> {
    /// Entities on this page.
    pub items: Vec<E>,

    /// Total count (before paging).
    pub total: u64,

    /// Current page number (1-indexed).
    pub page: u64,

    /// Items per page.
    pub per_page: u64,

    /// Total number of pages.
    pub total_pages: u64,

    /// Whether there's a next page.
    pub has_next: bool,

    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl<E> PagedResult<E> {
    /// Create a new result with paging calculations.
    pub fn new(items: Vec<E>, total: u64, page: u64, per_page: u64) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            1
        };

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Applies specifications to data-source queries.
pub struct SpecificationEvaluator;

impl SpecificationEvaluator {
    /// Apply `spec` to `query`: filter, then sort keys (identity ascending
    /// when there are none), then includes, then skip/take when paging is
    /// enabled.
    pub fn apply<E, Q>(query: Q, spec: &Specification<E>) -> Q
    where
        E: Entity,
        Q: EntityQuery<E>,
    {
        tracing::debug!(
            entity = E::SET_NAME,
            filtered = spec.predicate().is_some(),
            sort_keys = spec.sort_keys().len(),
            includes = spec.includes().len(),
            paged = spec.paging_enabled(),
            skip = spec.skip(),
            take = spec.take(),
            "applying specification"
        );

        let mut query = match spec.predicate() {
            Some(predicate) => query.filter(predicate),
            None => query,
        };

        query = match spec.sort_keys().split_first() {
            Some((primary, rest)) => rest
                .iter()
                .fold(query.order_by(*primary), |query, key| query.then_by(*key)),
            None => query.order_by(SortKey::asc(E::IDENTITY)),
        };

        for relation in spec.includes() {
            query = query.include(*relation);
        }

        if spec.paging_enabled() {
            query = query.skip(spec.skip()).take(spec.take());
        }

        query
    }

    /// Materialize every entity `spec` selects.
    pub async fn list<E, S>(source: &S, spec: &Specification<E>) -> Result<Vec<E>, S::Error>
    where
        E: Entity,
        S: DataSource<E>,
    {
        Self::apply(source.query(), spec).fetch().await
    }

    /// Count the entities matching `spec`'s predicate. Sort keys, includes
    /// and paging do not affect the count.
    pub async fn count<E, S>(source: &S, spec: &Specification<E>) -> Result<u64, S::Error>
    where
        E: Entity,
        S: DataSource<E>,
    {
        let query = match spec.predicate() {
            Some(predicate) => source.query().filter(predicate),
            None => source.query(),
        };
        query.count().await
    }

    /// Count plus list, packaged with pagination metadata. An unpaged
    /// specification yields a single page holding every row.
    pub async fn page<E, S>(source: &S, spec: &Specification<E>) -> Result<PagedResult<E>, S::Error>
    where
        E: Entity,
        S: DataSource<E>,
    {
        let total = Self::count(source, spec).await?;
        let items = Self::list(source, spec).await?;

        let (page, per_page) = if spec.paging_enabled() {
            (spec.skip() / spec.take() + 1, spec.take())
        } else {
            (1, total)
        };

        Ok(PagedResult::new(items, total, page, per_page))
    }

    /// First entity `spec` selects, if any.
    pub async fn find<E, S>(source: &S, spec: &Specification<E>) -> Result<Option<E>, S::Error>
    where
        E: Entity,
        S: DataSource<E>,
    {
        let rows = Self::apply(source.query(), spec).take(1).fetch().await?;
        Ok(rows.into_iter().next())
    }
}
