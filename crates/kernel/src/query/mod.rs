//! Composable query specifications.
//!
//! This module provides:
//! - Predicate: boolean expression trees over one entity type
//! - Specification: predicate, sort keys, paging and includes as one value
//! - Builders: declarative filter tables turning request arguments into specifications
//! - SpecificationEvaluator: applies specifications to a DataSource
//! - MemorySource / PgSource: in-memory and PostgreSQL data sources

pub mod builder;
pub mod entity;
pub mod evaluator;
pub mod memory;
pub mod postgres;
pub mod predicate;
pub mod specification;
pub mod sql;
pub mod value;

pub use builder::{Criterion, FilterSet, ListParams};
pub use entity::{Cardinality, Entity, Field, Relation};
pub use evaluator::{DataSource, EntityQuery, PagedResult, SpecificationEvaluator};
pub use memory::MemorySource;
pub use postgres::PgSource;
pub use predicate::{Expr, Predicate, Var};
pub use specification::{SortDirection, SortKey, Specification, combine};
pub use sql::SqlQuery;
pub use value::Value;
