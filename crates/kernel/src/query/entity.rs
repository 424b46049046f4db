//! The seam between the specification engine and the entity layer.
//!
//! An [`Entity`] names its storage set and identity field and exposes its
//! fields by name. [`Field`] and [`Relation`] descriptors are typed by the
//! entity they belong to, so a predicate or include built for one entity
//! cannot be attached to another.

use std::fmt;
use std::marker::PhantomData;

use crate::models::id::TypedId;
use crate::query::value::Value;

/// An entity type the specification engine can filter, sort and page.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Strongly typed identity.
    type Id: TypedId;

    /// Storage set name (the table name for relational sources).
    const SET_NAME: &'static str;

    /// Identity field. Unique per instance, used as the default sort key.
    const IDENTITY: Field<Self>;

    /// Relations that can be eagerly loaded.
    const RELATIONS: &'static [Relation<Self>] = &[];

    /// Read a field by name. Unknown names read as [`Value::Null`].
    fn field(&self, name: &str) -> Value;

    /// Look up a relation by name (case-insensitive).
    fn relation(name: &str) -> Option<Relation<Self>> {
        Self::RELATIONS
            .iter()
            .find(|relation| relation.name().eq_ignore_ascii_case(name.trim()))
            .copied()
    }
}

/// A named field of entity `E`.
pub struct Field<E> {
    name: &'static str,
    _entity: PhantomData<fn(&E)>,
}

impl<E> Field<E> {
    /// Describe the field stored under `name`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _entity: PhantomData,
        }
    }

    /// Storage name of the field.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<E> Clone for Field<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Field<E> {}

impl<E> PartialEq for Field<E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<E> Eq for Field<E> {}

impl<E> fmt::Debug for Field<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Whether a relation yields a single related row or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// A relation of entity `E` that can be eagerly loaded.
///
/// A related row matches when its `foreign_field` equals the parent's
/// `local_field`.
pub struct Relation<E> {
    name: &'static str,
    target: &'static str,
    target_identity: &'static str,
    local_field: &'static str,
    foreign_field: &'static str,
    cardinality: Cardinality,
    _entity: PhantomData<fn(&E)>,
}

impl<E> Relation<E> {
    /// A relation to at most one row of `T`.
    pub const fn one<T: Entity>(
        name: &'static str,
        local_field: &'static str,
        foreign_field: &'static str,
    ) -> Self {
        Self::to::<T>(name, local_field, foreign_field, Cardinality::One)
    }

    /// A relation to any number of rows of `T`.
    pub const fn many<T: Entity>(
        name: &'static str,
        local_field: &'static str,
        foreign_field: &'static str,
    ) -> Self {
        Self::to::<T>(name, local_field, foreign_field, Cardinality::Many)
    }

    const fn to<T: Entity>(
        name: &'static str,
        local_field: &'static str,
        foreign_field: &'static str,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name,
            target: T::SET_NAME,
            target_identity: T::IDENTITY.name(),
            local_field,
            foreign_field,
            cardinality,
            _entity: PhantomData,
        }
    }

    /// Relation name; also the key the related rows are attached under.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Storage set of the related entity.
    pub const fn target(&self) -> &'static str {
        self.target
    }

    /// Identity field of the related entity.
    pub const fn target_identity(&self) -> &'static str {
        self.target_identity
    }

    pub const fn local_field(&self) -> &'static str {
        self.local_field
    }

    pub const fn foreign_field(&self) -> &'static str {
        self.foreign_field
    }

    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

impl<E> Clone for Relation<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Relation<E> {}

impl<E> PartialEq for Relation<E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<E> Eq for Relation<E> {}

impl<E> fmt::Debug for Relation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("cardinality", &self.cardinality)
            .finish()
    }
}
