//! Specification types.
//!
//! A [`Specification`] describes which entities, in what order, and how much
//! of the result to return:
//! - Predicate: optional filter, absent means "match all"
//! - Sort keys: primary key first, later keys break ties
//! - Paging: skip/take, only applied when enabled
//! - Includes: relations to load alongside each row

use std::cmp::Ordering;
use std::fmt;
use std::ops::BitAnd;

use serde::{Deserialize, Serialize};

use crate::query::entity::{Entity, Field, Relation};
use crate::query::predicate::Predicate;

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a query-string direction. Only "desc" (any case) is descending.
    pub fn parse(text: Option<&str>) -> Self {
        match text {
            Some(text) if text.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// One sort key: a field and a direction.
pub struct SortKey<E> {
    field: Field<E>,
    direction: SortDirection,
}

impl<E> SortKey<E> {
    pub const fn new(field: Field<E>, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub const fn asc(field: Field<E>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub const fn desc(field: Field<E>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    pub const fn field(&self) -> Field<E> {
        self.field
    }

    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl<E: Entity> SortKey<E> {
    /// Compare two entities on this key.
    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        let name = self.field.name();
        let ordering = a.field(name).sort_cmp(&b.field(name));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl<E> Clone for SortKey<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for SortKey<E> {}

impl<E> PartialEq for SortKey<E> {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.direction == other.direction
    }
}

impl<E> fmt::Debug for SortKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("field", &self.field.name())
            .field("direction", &self.direction)
            .finish()
    }
}

/// A filtered, ordered, optionally paged view over entity `E`.
pub struct Specification<E> {
    predicate: Option<Predicate<E>>,
    sort_keys: Vec<SortKey<E>>,
    skip: u64,
    take: u64,
    paging_enabled: bool,
    includes: Vec<Relation<E>>,
}

impl<E: Entity> Specification<E> {
    /// Match every entity, unordered, unpaged.
    pub fn new() -> Self {
        Self {
            predicate: None,
            sort_keys: Vec::new(),
            skip: 0,
            take: 0,
            paging_enabled: false,
            includes: Vec::new(),
        }
    }

    /// Match entities satisfying `predicate`.
    pub fn filtered(predicate: Predicate<E>) -> Self {
        Self {
            predicate: Some(predicate),
            ..Self::new()
        }
    }

    /// Single-record lookup: identity equals `id`, no sort, no paging.
    pub fn by_id(id: E::Id) -> Self {
        Self::filtered(Predicate::equals(E::IDENTITY, id))
    }

    /// Append a sort key.
    pub fn order_by(mut self, key: SortKey<E>) -> Self {
        self.sort_keys.push(key);
        self
    }

    /// Enable paging. Page numbers start at 1; page 0 is read as page 1.
    /// A zero page size leaves paging disabled.
    pub fn paged(mut self, page_number: u64, page_size: u64) -> Self {
        if page_size == 0 {
            return self;
        }
        self.skip = page_number.saturating_sub(1).saturating_mul(page_size);
        self.take = page_size;
        self.paging_enabled = true;
        self
    }

    /// Eagerly load `relation`. Adding a relation twice has no effect.
    pub fn include(mut self, relation: Relation<E>) -> Self {
        if !self.includes.contains(&relation) {
            self.includes.push(relation);
        }
        self
    }

    /// Combine with `other`: the predicates are AND'ed, everything else is
    /// kept from `self`.
    pub fn and(self, other: Self) -> Self {
        let predicate = match (self.predicate, other.predicate) {
            (Some(left), Some(right)) => Some(left.and(right)),
            (Some(left), None) => Some(left),
            (None, right) => right,
        };
        Self { predicate, ..self }
    }

    pub fn predicate(&self) -> Option<&Predicate<E>> {
        self.predicate.as_ref()
    }

    pub fn sort_keys(&self) -> &[SortKey<E>] {
        &self.sort_keys
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn take(&self) -> u64 {
        self.take
    }

    pub fn paging_enabled(&self) -> bool {
        self.paging_enabled
    }

    pub fn includes(&self) -> &[Relation<E>] {
        &self.includes
    }

    /// Test a single entity against the predicate.
    pub fn is_satisfied_by(&self, entity: &E) -> bool {
        self.predicate
            .as_ref()
            .is_none_or(|predicate| predicate.matches(entity))
    }
}

/// Combine two specifications. See [`Specification::and`].
pub fn combine<E: Entity>(left: Specification<E>, right: Specification<E>) -> Specification<E> {
    left.and(right)
}

impl<E: Entity> Default for Specification<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> BitAnd for Specification<E> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl<E: Entity> From<Predicate<E>> for Specification<E> {
    fn from(predicate: Predicate<E>) -> Self {
        Self::filtered(predicate)
    }
}

impl<E> Clone for Specification<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            sort_keys: self.sort_keys.clone(),
            skip: self.skip,
            take: self.take,
            paging_enabled: self.paging_enabled,
            includes: self.includes.clone(),
        }
    }
}

impl<E> fmt::Debug for Specification<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("predicate", &self.predicate)
            .field("sort_keys", &self.sort_keys)
            .field("skip", &self.skip)
            .field("take", &self.take)
            .field("paging_enabled", &self.paging_enabled)
            .field("includes", &self.includes)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn sort_direction_parse() {
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some(" desc ")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("down")), SortDirection::Asc);
    }

    #[test]
    fn sort_direction_serialization() {
        let json = serde_json::to_string(&SortDirection::Desc).unwrap();
        assert_eq!(json, "\"desc\"");
    }
}
