//! PostgreSQL data source.
//!
//! Queries are compiled by [`SqlQuery`] and run inside a short transaction so
//! that `SET LOCAL statement_timeout` applies to them and resets afterwards.
//! Rows come back as JSON (`row_to_json`), included relations are loaded with
//! one batched `IN (...)` query each and merged into the parent rows, and the
//! result is deserialized into entities.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{SourceError, SourceResult};
use crate::query::entity::{Cardinality, Entity, Relation};
use crate::query::evaluator::{DataSource, EntityQuery};
use crate::query::predicate::Predicate;
use crate::query::specification::SortKey;
use crate::query::sql::{SqlQuery, build_include};
use crate::query::value::Value;

/// Default per-statement timeout.
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// A data source over one PostgreSQL table.
pub struct PgSource<E> {
    pool: PgPool,
    statement_timeout: Duration,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> PgSource<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
            _entity: PhantomData,
        }
    }

    /// Source using the pool and statement timeout from `config`.
    pub fn from_config(pool: PgPool, config: &Config) -> Self {
        Self::new(pool).with_statement_timeout(config.statement_timeout)
    }

    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }
}

impl<E: Entity> Clone for PgSource<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            statement_timeout: self.statement_timeout,
            _entity: PhantomData,
        }
    }
}

impl<E> DataSource<E> for PgSource<E>
where
    E: Entity + DeserializeOwned,
{
    type Error = SourceError;
    type Query = PgQuery<E>;

    fn query(&self) -> PgQuery<E> {
        PgQuery {
            pool: self.pool.clone(),
            statement_timeout: self.statement_timeout,
            sql: SqlQuery::new(),
        }
    }
}

/// Query over a [`PgSource`].
pub struct PgQuery<E> {
    pool: PgPool,
    statement_timeout: Duration,
    sql: SqlQuery<E>,
}

impl<E: Entity> PgQuery<E> {
    /// The compiled query so far.
    pub fn sql(&self) -> &SqlQuery<E> {
        &self.sql
    }

    async fn begin(&self) -> SourceResult<sqlx::Transaction<'static, sqlx::Postgres>> {
        let mut tx = self.pool.begin().await?;

        let millis = self.statement_timeout.as_millis();
        sqlx::query(&format!("SET LOCAL statement_timeout = '{millis}ms'"))
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

#[async_trait]
impl<E> EntityQuery<E> for PgQuery<E>
where
    E: Entity + DeserializeOwned,
{
    type Error = SourceError;

    fn filter(mut self, predicate: &Predicate<E>) -> Self {
        self.sql.filter(predicate);
        self
    }

    fn order_by(mut self, key: SortKey<E>) -> Self {
        self.sql.order_by(key);
        self
    }

    fn then_by(mut self, key: SortKey<E>) -> Self {
        self.sql.then_by(key);
        self
    }

    fn include(mut self, relation: Relation<E>) -> Self {
        self.sql.include(relation);
        self
    }

    fn skip(mut self, count: u64) -> Self {
        self.sql.skip(count);
        self
    }

    fn take(mut self, count: u64) -> Self {
        self.sql.take(count);
        self
    }

    async fn fetch(self) -> SourceResult<Vec<E>> {
        let mut tx = self.begin().await?;

        let main_sql = self.sql.build();
        tracing::debug!(entity = E::SET_NAME, sql = %main_sql, "fetching rows");
        let mut rows: Vec<serde_json::Value> =
            sqlx::query_scalar(&format!("SELECT row_to_json(t) FROM ({main_sql}) t"))
                .fetch_all(&mut *tx)
                .await?;

        for relation in self.sql.includes() {
            load_include(&mut *tx, relation, &mut rows).await?;
        }

        tx.commit().await?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|source| SourceError::Decode {
                    entity: E::SET_NAME,
                    source,
                })
            })
            .collect()
    }

    async fn count(self) -> SourceResult<u64> {
        let mut tx = self.begin().await?;

        let count_sql = self.sql.build_count();
        tracing::debug!(entity = E::SET_NAME, sql = %count_sql, "counting rows");
        let total: i64 = sqlx::query_scalar(&count_sql).fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}

/// Batch-load `relation` for every row and attach the related rows under the
/// relation's name: an object (or null) for a singular relation, an array
/// for a plural one.
async fn load_include<E>(
    conn: &mut PgConnection,
    relation: &Relation<E>,
    rows: &mut [serde_json::Value],
) -> SourceResult<()> {
    let mut seen = HashSet::new();
    let keys: Vec<Value> = rows
        .iter()
        .filter_map(|row| key_of(row, relation.local_field()))
        .filter(|key| seen.insert(key.to_string()))
        .filter_map(json_to_value)
        .collect();

    let children: Vec<serde_json::Value> = if keys.is_empty() {
        Vec::new()
    } else {
        let include_sql = build_include(relation, &keys);
        sqlx::query_scalar(&format!("SELECT row_to_json(t) FROM ({include_sql}) t"))
            .fetch_all(&mut *conn)
            .await?
    };

    tracing::debug!(
        relation = relation.name(),
        parents = rows.len(),
        keys = keys.len(),
        children = children.len(),
        "loaded include"
    );

    for row in rows.iter_mut() {
        let parent_key = key_of(row, relation.local_field()).cloned();
        let mut matching = children.iter().filter(|child| {
            parent_key.is_some() && key_of(child, relation.foreign_field()) == parent_key.as_ref()
        });

        let attached = match relation.cardinality() {
            Cardinality::One => matching.next().cloned().unwrap_or(serde_json::Value::Null),
            Cardinality::Many => serde_json::Value::Array(matching.cloned().collect()),
        };

        if let Some(object) = row.as_object_mut() {
            object.insert(relation.name().to_string(), attached);
        }
    }

    Ok(())
}

/// A row's value for `field`. Missing and null values yield `None` so they
/// never match.
pub fn key_of<'a>(row: &'a serde_json::Value, field: &str) -> Option<&'a serde_json::Value> {
    row.get(field).filter(|value| !value.is_null())
}

/// Convert a JSON key into a predicate value for the batch query.
fn json_to_value(json: &serde_json::Value) -> Option<Value> {
    match json {
        serde_json::Value::String(text) => Some(match Uuid::parse_str(text) {
            Ok(uuid) => Value::Uuid(uuid),
            Err(_) => Value::Text(text.clone()),
        }),
        serde_json::Value::Number(number) => number.as_i64().map(Value::Integer),
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        _ => None,
    }
}
