//! SQL compilation using SeaQuery.
//!
//! [`SqlQuery`] accumulates the pipeline the evaluator applies (predicates,
//! sort keys, includes, window) and renders it as PostgreSQL. Every column is
//! qualified with the entity's set name.

use sea_query::{
    Alias, Asterisk, Cond, Condition, Expr, Func, Order, PostgresQueryBuilder, Query,
    SelectStatement, SimpleExpr,
};

use crate::query::entity::{Entity, Relation};
use crate::query::predicate::{Expr as PredicateExpr, Predicate};
use crate::query::specification::{SortDirection, SortKey};
use crate::query::value::Value;

/// A SELECT over one entity set, built up step by step.
pub struct SqlQuery<E> {
    predicates: Vec<Predicate<E>>,
    sort_keys: Vec<SortKey<E>>,
    includes: Vec<Relation<E>>,
    skip: u64,
    take: Option<u64>,
}

impl<E: Entity> SqlQuery<E> {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            sort_keys: Vec::new(),
            includes: Vec::new(),
            skip: 0,
            take: None,
        }
    }

    pub fn filter(&mut self, predicate: &Predicate<E>) {
        self.predicates.push(predicate.clone());
    }

    pub fn order_by(&mut self, key: SortKey<E>) {
        self.sort_keys.clear();
        self.sort_keys.push(key);
    }

    pub fn then_by(&mut self, key: SortKey<E>) {
        self.sort_keys.push(key);
    }

    pub fn include(&mut self, relation: Relation<E>) {
        if !self.includes.contains(&relation) {
            self.includes.push(relation);
        }
    }

    pub fn skip(&mut self, count: u64) {
        self.skip = count;
    }

    pub fn take(&mut self, count: u64) {
        self.take = Some(count);
    }

    /// Relations to batch-load after the main query.
    pub fn includes(&self) -> &[Relation<E>] {
        &self.includes
    }

    /// Build the main SELECT with ordering and window.
    pub fn build(&self) -> String {
        let mut query = Query::select();

        query.column((Alias::new(E::SET_NAME), Asterisk));
        query.from(Alias::new(E::SET_NAME));

        self.add_filters(&mut query);
        self.add_sorts(&mut query);

        if let Some(take) = self.take {
            query.limit(take);
        }
        if self.skip > 0 {
            query.offset(self.skip);
        }

        query.to_string(PostgresQueryBuilder)
    }

    /// Build a COUNT query over the filtered set.
    pub fn build_count(&self) -> String {
        let mut query = Query::select();

        query.expr(Expr::col(Asterisk).count());
        query.from(Alias::new(E::SET_NAME));

        self.add_filters(&mut query);

        query.to_string(PostgresQueryBuilder)
    }

    fn add_filters(&self, query: &mut SelectStatement) {
        for predicate in &self.predicates {
            query.cond_where(compile::<E>(predicate.body()));
        }
    }

    fn add_sorts(&self, query: &mut SelectStatement) {
        for key in &self.sort_keys {
            let order = match key.direction() {
                SortDirection::Asc => Order::Asc,
                SortDirection::Desc => Order::Desc,
            };
            query.order_by((Alias::new(E::SET_NAME), Alias::new(key.field().name())), order);
        }
    }
}

impl<E: Entity> Default for SqlQuery<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the batch query loading `relation`'s rows whose foreign field is in
/// `keys`, ordered by the related set's identity.
pub fn build_include<E>(relation: &Relation<E>, keys: &[Value]) -> String {
    let target = relation.target();
    let mut query = Query::select();

    query.column((Alias::new(target), Asterisk));
    query.from(Alias::new(target));
    query.cond_where(in_list(
        Expr::col((Alias::new(target), Alias::new(relation.foreign_field()))).into(),
        keys,
    ));
    query.order_by(
        (Alias::new(target), Alias::new(relation.target_identity())),
        Order::Asc,
    );

    query.to_string(PostgresQueryBuilder)
}

/// Compile a predicate body over entity `E` into a SeaQuery condition.
///
/// Mirrors [`PredicateExpr::eval`]: comparisons touching a null column are
/// unknown, and `NOT`, `AND` and `OR` follow SQL's three-valued logic.
fn compile<E: Entity>(expr: &PredicateExpr) -> Condition {
    match expr {
        PredicateExpr::Field { .. } => match operand::<E>(expr) {
            Some(column) => Cond::all().add(Expr::expr(column).eq(true)),
            None => never(),
        },
        PredicateExpr::Literal(Value::Bool(true)) => Cond::all().add(Expr::cust("TRUE")),
        PredicateExpr::Literal(Value::Null) => Cond::all().add(Expr::cust("NULL")),
        PredicateExpr::Literal(_) => never(),
        PredicateExpr::Eq(left, right) => {
            if is_null_literal(left) || is_null_literal(right) {
                return never();
            }
            match (operand::<E>(left), operand::<E>(right)) {
                (Some(left), Some(right)) => Cond::all().add(Expr::expr(left).eq(right)),
                _ => never(),
            }
        }
        PredicateExpr::Contains { haystack, needle } => match operand::<E>(haystack) {
            Some(haystack) => {
                let pattern = format!("%{}%", escape_like_wildcards(&needle.to_lowercase()));
                Cond::all().add(Expr::expr(Func::lower(haystack)).like(pattern))
            }
            None => never(),
        },
        PredicateExpr::In { item, set } => match operand::<E>(item) {
            Some(item) => in_list(item, set),
            None => never(),
        },
        PredicateExpr::IsNull(inner) => match operand::<E>(inner) {
            Some(inner) => Cond::all().add(Expr::expr(inner).is_null()),
            None => never(),
        },
        PredicateExpr::Not(inner) => Cond::all().not().add(compile::<E>(inner)),
        PredicateExpr::And(left, right) => Cond::all()
            .add(compile::<E>(left))
            .add(compile::<E>(right)),
        PredicateExpr::Or(left, right) => Cond::any()
            .add(compile::<E>(left))
            .add(compile::<E>(right)),
    }
}

/// A column or constant; boolean sub-trees are not valid operands.
fn operand<E: Entity>(expr: &PredicateExpr) -> Option<SimpleExpr> {
    match expr {
        PredicateExpr::Field { name, .. } => {
            Some(Expr::col((Alias::new(E::SET_NAME), Alias::new(*name))).into())
        }
        PredicateExpr::Literal(value) => Some(sql_value(value).into()),
        _ => None,
    }
}

fn never() -> Condition {
    Cond::all().add(Expr::cust("FALSE"))
}

/// `item IN (set)`; nulls in the set never match and an empty set is FALSE.
fn in_list(item: SimpleExpr, set: &[Value]) -> Condition {
    let values: Vec<sea_query::Value> = set
        .iter()
        .filter(|value| !value.is_null())
        .map(sql_value)
        .collect();
    if values.is_empty() {
        return never();
    }
    Cond::all().add(Expr::expr(item).is_in(values))
}

fn is_null_literal(expr: &PredicateExpr) -> bool {
    matches!(expr, PredicateExpr::Literal(Value::Null))
}

/// Convert a predicate value into a SeaQuery value.
fn sql_value(value: &Value) -> sea_query::Value {
    match value {
        Value::Null => sea_query::Value::String(None),
        Value::Bool(b) => (*b).into(),
        Value::Integer(i) => (*i).into(),
        Value::Text(s) => s.clone().into(),
        Value::Uuid(u) => (*u).into(),
        Value::Date(d) => (*d).into(),
    }
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in user input.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, EmployeeStatus, Establishment};
    use crate::models::id::EstablishmentId;
    use uuid::Uuid;

    #[test]
    fn plain_select() {
        let sql = SqlQuery::<Employee>::new().build();
        assert_eq!(sql, r#"SELECT "employees".* FROM "employees""#);
    }

    #[test]
    fn filtered_sorted_paged_select() {
        let mut query = SqlQuery::<Employee>::new();
        query.filter(
            &Predicate::contains(Employee::FIRST_NAME, "Ali")
                .and(Predicate::equals(Employee::EMPLOYEE_STATUS, EmployeeStatus::Active)),
        );
        query.order_by(SortKey::desc(Employee::LAST_NAME));
        query.then_by(SortKey::asc(Employee::ID));
        query.skip(10);
        query.take(10);

        let sql = query.build();

        assert!(sql.contains(r#"LOWER("employees"."first_name") LIKE '%ali%'"#));
        assert!(sql.contains(r#""employees"."employee_status" = 0"#));
        assert!(sql.contains(" AND "));
        assert!(sql.contains(r#"ORDER BY "employees"."last_name" DESC, "employees"."id" ASC"#));
        assert!(sql.contains("LIMIT 10"));
        assert!(sql.contains("OFFSET 10"));
    }

    #[test]
    fn or_and_not_compile_to_conditions() {
        let mut query = SqlQuery::<Employee>::new();
        query.filter(
            &Predicate::contains(Employee::FIRST_NAME, "a")
                .or(Predicate::contains(Employee::LAST_NAME, "b"))
                .negate(),
        );

        let sql = query.build();

        assert!(sql.contains("NOT"));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn count_ignores_window_and_order() {
        let mut query = SqlQuery::<Employee>::new();
        query.filter(&Predicate::contains(Employee::EMAIL, "example"));
        query.order_by(SortKey::asc(Employee::ID));
        query.take(5);

        let sql = query.build_count();

        assert!(sql.contains("COUNT(*)"));
        assert!(sql.contains(r#"FROM "employees""#));
        assert!(sql.contains("LIKE"));
        assert!(!sql.contains("ORDER BY"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like_wildcards("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn empty_in_is_false() {
        let mut query = SqlQuery::<Employee>::new();
        query.filter(&Predicate::is_in(Employee::LAST_NAME, Vec::<String>::new()));
        assert!(query.build().contains("FALSE"));
    }

    #[test]
    fn null_equality_is_false() {
        let mut query = SqlQuery::<Employee>::new();
        query.filter(&Predicate::equals(Employee::MIDDLE_NAME, Value::Null));
        assert!(query.build().contains("FALSE"));
    }

    #[test]
    fn negation_wraps_the_comparison_without_coalescing() {
        let mut query = SqlQuery::<Employee>::new();
        query.filter(&Predicate::contains(Employee::MIDDLE_NAME, "x").negate());

        let sql = query.build();

        assert!(sql.contains("NOT"));
        assert!(sql.contains(r#"LOWER("employees"."middle_name") LIKE '%x%'"#));
        assert!(!sql.contains("COALESCE"));
    }

    #[test]
    fn boolean_literals_compile_to_keywords() {
        let unknown = Predicate::<Employee>::new(|_| PredicateExpr::Literal(Value::Null));
        let always = Predicate::<Employee>::new(|_| PredicateExpr::literal(true));

        let mut query = SqlQuery::<Employee>::new();
        query.filter(&unknown);
        assert!(query.build().contains("WHERE NULL"));

        let mut query = SqlQuery::<Employee>::new();
        query.filter(&always);
        assert!(query.build().contains("WHERE TRUE"));
    }

    #[test]
    fn include_query_batches_keys() {
        let keys = [
            Value::from(EstablishmentId::new(Uuid::from_u128(1))),
            Value::from(EstablishmentId::new(Uuid::from_u128(2))),
        ];

        let sql = build_include(&Employee::ESTABLISHMENT, &keys);

        assert!(sql.contains(r#"FROM "establishments""#));
        assert!(sql.contains(r#""establishments"."id" IN ("#));
        assert!(sql.contains("00000000-0000-0000-0000-000000000002"));
        assert!(sql.contains(r#"ORDER BY "establishments"."id" ASC"#));

        let sql = build_include(&Establishment::PHONES, &keys);
        assert!(sql.contains(r#""establishment_phones"."establishment_id" IN ("#));
    }
}
