//! In-memory data source.
//!
//! Evaluates queries directly over a vector of entities using the predicate
//! evaluator. Used for fixtures, tests and small cached sets.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::query::entity::{Entity, Relation};
use crate::query::evaluator::{DataSource, EntityQuery};
use crate::query::predicate::Predicate;
use crate::query::specification::SortKey;

/// Populates one relation on an entity.
pub type Loader<E> = Arc<dyn Fn(&mut E) + Send + Sync>;

/// A data source over an in-memory set of entities.
pub struct MemorySource<E> {
    rows: Arc<Vec<E>>,
    loaders: HashMap<&'static str, Loader<E>>,
}

impl<E: Entity> MemorySource<E> {
    pub fn new(rows: impl IntoIterator<Item = E>) -> Self {
        Self {
            rows: Arc::new(rows.into_iter().collect()),
            loaders: HashMap::new(),
        }
    }

    /// Register the loader run when `relation` is included.
    pub fn with_loader<F>(mut self, relation: Relation<E>, loader: F) -> Self
    where
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        self.loaders.insert(relation.name(), Arc::new(loader));
        self
    }
}

impl<E> fmt::Debug for MemorySource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("rows", &self.rows.len())
            .field("loaders", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<E: Entity> DataSource<E> for MemorySource<E> {
    type Error = Infallible;
    type Query = MemoryQuery<E>;

    fn query(&self) -> MemoryQuery<E> {
        MemoryQuery {
            rows: Arc::clone(&self.rows),
            loaders: self.loaders.clone(),
            predicates: Vec::new(),
            sort_keys: Vec::new(),
            includes: Vec::new(),
            skip: 0,
            take: None,
        }
    }
}

/// Query over a [`MemorySource`].
pub struct MemoryQuery<E> {
    rows: Arc<Vec<E>>,
    loaders: HashMap<&'static str, Loader<E>>,
    predicates: Vec<Predicate<E>>,
    sort_keys: Vec<SortKey<E>>,
    includes: Vec<Relation<E>>,
    skip: u64,
    take: Option<u64>,
}

impl<E: Entity> MemoryQuery<E> {
    fn matching(&self) -> impl Iterator<Item = &E> {
        self.rows
            .iter()
            .filter(|row| self.predicates.iter().all(|predicate| predicate.matches(row)))
    }

    fn compare(&self, a: &E, b: &E) -> Ordering {
        self.sort_keys
            .iter()
            .fold(Ordering::Equal, |ordering, key| {
                ordering.then_with(|| key.compare(a, b))
            })
    }
}

#[async_trait]
impl<E: Entity> EntityQuery<E> for MemoryQuery<E> {
    type Error = Infallible;

    fn filter(mut self, predicate: &Predicate<E>) -> Self {
        self.predicates.push(predicate.clone());
        self
    }

    fn order_by(mut self, key: SortKey<E>) -> Self {
        self.sort_keys.clear();
        self.sort_keys.push(key);
        self
    }

    fn then_by(mut self, key: SortKey<E>) -> Self {
        self.sort_keys.push(key);
        self
    }

    fn include(mut self, relation: Relation<E>) -> Self {
        if !self.includes.contains(&relation) {
            self.includes.push(relation);
        }
        self
    }

    fn skip(mut self, count: u64) -> Self {
        self.skip = count;
        self
    }

    fn take(mut self, count: u64) -> Self {
        self.take = Some(count);
        self
    }

    async fn fetch(self) -> Result<Vec<E>, Infallible> {
        let mut rows: Vec<E> = self.matching().cloned().collect();

        // Stable, so rows tied on every key keep insertion order.
        rows.sort_by(|a, b| self.compare(a, b));

        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let take = self
            .take
            .map_or(usize::MAX, |take| usize::try_from(take).unwrap_or(usize::MAX));
        let mut rows: Vec<E> = rows.into_iter().skip(skip).take(take).collect();

        for relation in &self.includes {
            let Some(loader) = self.loaders.get(relation.name()) else {
                tracing::warn!(
                    entity = E::SET_NAME,
                    relation = relation.name(),
                    "no loader registered for included relation"
                );
                continue;
            };
            rows.iter_mut().for_each(|row| loader(row));
        }

        Ok(rows)
    }

    async fn count(self) -> Result<u64, Infallible> {
        Ok(self.matching().count() as u64)
    }
}
