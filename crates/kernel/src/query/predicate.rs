//! Predicate expression trees.
//!
//! A [`Predicate`] is a boolean [`Expr`] over one bound variable that stands
//! for "the entity being tested". Every predicate is created with a fresh
//! variable, so two predicates built independently never share one. Combining
//! them rewrites the right-hand tree onto the left-hand variable
//! ([`Expr::rebind`]) before building the `And`/`Or` node, which keeps the
//! merged tree a single well-formed expression over one variable.

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::query::entity::{Entity, Field};
use crate::query::value::Value;

static NEXT_VAR: AtomicU32 = AtomicU32::new(0);

/// A bound entity variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

impl Var {
    fn fresh() -> Self {
        Self(NEXT_VAR.fetch_add(1, Ordering::Relaxed))
    }

    /// Reference `field` of the entity bound to this variable.
    pub fn field<E>(self, field: Field<E>) -> Expr {
        Expr::Field {
            var: self,
            name: field.name(),
        }
    }
}

/// Predicate expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A field of the entity bound to `var`.
    Field { var: Var, name: &'static str },
    /// A constant.
    Literal(Value),
    /// Equality (never true when either side is null).
    Eq(Box<Expr>, Box<Expr>),
    /// Case-insensitive substring match.
    Contains { haystack: Box<Expr>, needle: String },
    /// Membership in a set of constants.
    In { item: Box<Expr>, set: Vec<Value> },
    /// Null check.
    IsNull(Box<Expr>),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// A constant expression.
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// `self = value`.
    pub fn equals(self, value: impl Into<Value>) -> Self {
        Expr::Eq(Box::new(self), Box::new(Expr::literal(value)))
    }

    /// Case-insensitive `self CONTAINS needle`.
    pub fn contains(self, needle: impl Into<String>) -> Self {
        Expr::Contains {
            haystack: Box::new(self),
            needle: needle.into(),
        }
    }

    /// `self IN (values)`.
    pub fn is_in<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Expr::In {
            item: Box::new(self),
            set: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(self) -> Self {
        Expr::IsNull(Box::new(self))
    }

    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn and(self, other: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(other))
    }

    /// Replace every reference to `from` with `to`.
    pub fn rebind(self, from: Var, to: Var) -> Self {
        if from == to {
            return self;
        }
        let rebind = |expr: Box<Expr>| Box::new(expr.rebind(from, to));
        match self {
            Expr::Field { var, name } => Expr::Field {
                var: if var == from { to } else { var },
                name,
            },
            Expr::Literal(value) => Expr::Literal(value),
            Expr::Eq(left, right) => Expr::Eq(rebind(left), rebind(right)),
            Expr::Contains { haystack, needle } => Expr::Contains {
                haystack: rebind(haystack),
                needle,
            },
            Expr::In { item, set } => Expr::In {
                item: rebind(item),
                set,
            },
            Expr::IsNull(inner) => Expr::IsNull(rebind(inner)),
            Expr::Not(inner) => Expr::Not(rebind(inner)),
            Expr::And(left, right) => Expr::And(rebind(left), rebind(right)),
            Expr::Or(left, right) => Expr::Or(rebind(left), rebind(right)),
        }
    }

    /// Collect the variables this expression references.
    pub fn collect_vars(&self, vars: &mut BTreeSet<Var>) {
        match self {
            Expr::Field { var, .. } => {
                vars.insert(*var);
            }
            Expr::Literal(_) => {}
            Expr::Contains { haystack: inner, .. }
            | Expr::In { item: inner, .. }
            | Expr::IsNull(inner)
            | Expr::Not(inner) => inner.collect_vars(vars),
            Expr::Eq(left, right) | Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_vars(vars);
                right.collect_vars(vars);
            }
        }
    }

    /// Evaluate against `entity` bound to `var`.
    ///
    /// Boolean nodes follow SQL's three-valued logic: they yield
    /// [`Value::Bool`], or [`Value::Null`] when the outcome is unknown because
    /// a compared field is null. A field of any other variable reads as null.
    /// Comparisons whose operands are not fields or constants are false, as
    /// they are in compiled SQL.
    pub fn eval<E: Entity>(&self, var: Var, entity: &E) -> Value {
        match self {
            Expr::Field { var: bound, name } => {
                if *bound == var {
                    entity.field(name)
                } else {
                    Value::Null
                }
            }
            Expr::Literal(value) => value.clone(),
            Expr::Eq(left, right) => {
                if !left.is_operand() || !right.is_operand() {
                    return Value::Bool(false);
                }
                if left.is_null_literal() || right.is_null_literal() {
                    return Value::Bool(false);
                }
                let (left, right) = (left.eval(var, entity), right.eval(var, entity));
                if left.is_null() || right.is_null() {
                    Value::Null
                } else {
                    Value::Bool(left == right)
                }
            }
            Expr::Contains { haystack, needle } => {
                if !haystack.is_operand() {
                    return Value::Bool(false);
                }
                match haystack.eval(var, entity) {
                    Value::Null => Value::Null,
                    value => Value::Bool(value.contains_ci(needle)),
                }
            }
            Expr::In { item, set } => {
                if !item.is_operand() || set.iter().all(Value::is_null) {
                    return Value::Bool(false);
                }
                match item.eval(var, entity) {
                    Value::Null => Value::Null,
                    value => Value::Bool(set.iter().any(|candidate| value.matches(candidate))),
                }
            }
            Expr::IsNull(inner) => {
                Value::Bool(inner.is_operand() && inner.eval(var, entity).is_null())
            }
            Expr::Not(inner) => inner.truth(var, entity).map(|b| !b).into(),
            Expr::And(left, right) => {
                match (left.truth(var, entity), right.truth(var, entity)) {
                    (Some(false), _) | (_, Some(false)) => Value::Bool(false),
                    (Some(true), Some(true)) => Value::Bool(true),
                    _ => Value::Null,
                }
            }
            Expr::Or(left, right) => {
                match (left.truth(var, entity), right.truth(var, entity)) {
                    (Some(true), _) | (_, Some(true)) => Value::Bool(true),
                    (Some(false), Some(false)) => Value::Bool(false),
                    _ => Value::Null,
                }
            }
        }
    }

    /// Truth value in a boolean position; `None` is unknown. Non-boolean
    /// values are false.
    fn truth<E: Entity>(&self, var: Var, entity: &E) -> Option<bool> {
        match self.eval(var, entity) {
            Value::Bool(b) => Some(b),
            Value::Null => None,
            _ => Some(false),
        }
    }

    fn test<E: Entity>(&self, var: Var, entity: &E) -> bool {
        self.truth(var, entity) == Some(true)
    }

    fn is_operand(&self) -> bool {
        matches!(self, Expr::Field { .. } | Expr::Literal(_))
    }

    fn is_null_literal(&self) -> bool {
        matches!(self, Expr::Literal(Value::Null))
    }
}

/// A boolean condition over entity `E`.
pub struct Predicate<E> {
    param: Var,
    body: Expr,
    _entity: PhantomData<fn(&E) -> bool>,
}

impl<E: Entity> Predicate<E> {
    /// Build a predicate from a body over a freshly allocated variable.
    pub fn new(build: impl FnOnce(Var) -> Expr) -> Self {
        let param = Var::fresh();
        Self {
            param,
            body: build(param),
            _entity: PhantomData,
        }
    }

    /// `field = value`.
    pub fn equals(field: Field<E>, value: impl Into<Value>) -> Self {
        Self::new(|var| var.field(field).equals(value))
    }

    /// Case-insensitive substring match on `field`.
    pub fn contains(field: Field<E>, needle: impl Into<String>) -> Self {
        Self::new(|var| var.field(field).contains(needle))
    }

    /// `field IN (values)`.
    pub fn is_in<I, V>(field: Field<E>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(|var| var.field(field).is_in(values))
    }

    /// The variable the body is bound to.
    pub fn param(&self) -> Var {
        self.param
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    /// Logical AND over `self`'s variable.
    pub fn and(self, other: Self) -> Self {
        let right = other.body.rebind(other.param, self.param);
        Self {
            param: self.param,
            body: self.body.and(right),
            _entity: PhantomData,
        }
    }

    /// Logical OR over `self`'s variable.
    pub fn or(self, other: Self) -> Self {
        let right = other.body.rebind(other.param, self.param);
        Self {
            param: self.param,
            body: self.body.or(right),
            _entity: PhantomData,
        }
    }

    /// Logical NOT.
    pub fn negate(self) -> Self {
        Self {
            param: self.param,
            body: self.body.negate(),
            _entity: PhantomData,
        }
    }

    /// Whether the body references no variable other than its own.
    pub fn is_closed(&self) -> bool {
        let mut vars = BTreeSet::new();
        self.body.collect_vars(&mut vars);
        vars.iter().all(|var| *var == self.param)
    }

    /// Test `entity` against this predicate.
    pub fn matches(&self, entity: &E) -> bool {
        debug_assert!(self.is_closed(), "predicate references a foreign variable");
        self.body.test(self.param, entity)
    }
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Self {
            param: self.param,
            body: self.body.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> PartialEq for Predicate<E> {
    fn eq(&self, other: &Self) -> bool {
        self.param == other.param && self.body == other.body
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("param", &self.param)
            .field("body", &self.body)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::id::{EmployeeId, EmployeeRoleId, EstablishmentId};
    use crate::models::{Employee, EmployeeStatus};
    use chrono::NaiveDate;
    use uuid::Uuid;

    struct Row;

    const NAME: Field<Row> = Field::new("name");
    const CITY: Field<Row> = Field::new("city");

    fn vars_of(expr: &Expr) -> BTreeSet<Var> {
        let mut vars = BTreeSet::new();
        expr.collect_vars(&mut vars);
        vars
    }

    #[test]
    fn fresh_vars_are_distinct() {
        assert_ne!(Var::fresh(), Var::fresh());
    }

    #[test]
    fn rebind_rewrites_every_reference() {
        let a = Var::fresh();
        let b = Var::fresh();
        let expr = b
            .field(NAME)
            .contains("ali")
            .and(b.field(CITY).is_in(["Oslo", "Bergen"]).negate());

        let rebound = expr.rebind(b, a);

        assert_eq!(vars_of(&rebound), BTreeSet::from([a]));
    }

    #[test]
    fn rebind_leaves_other_vars_alone() {
        let a = Var::fresh();
        let b = Var::fresh();
        let c = Var::fresh();
        let expr = b.field(NAME).equals("x").or(c.field(CITY).is_null());

        let rebound = expr.rebind(b, a);

        assert_eq!(vars_of(&rebound), BTreeSet::from([a, c]));
    }

    #[test]
    fn rebind_same_var_is_identity() {
        let a = Var::fresh();
        let expr = a.field(NAME).equals("x");
        assert_eq!(expr.clone().rebind(a, a), expr);
    }

    // ---------------------------------------------------------------------
    // Three-valued evaluation
    // ---------------------------------------------------------------------

    fn employee(middle_name: Option<&str>) -> Employee {
        Employee {
            id: EmployeeId::new(Uuid::from_u128(1)),
            employee_number: "E-001".to_string(),
            first_name: "Ada".to_string(),
            middle_name: middle_name.map(str::to_string),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            employee_status: EmployeeStatus::Active,
            employee_role_id: EmployeeRoleId::new(Uuid::from_u128(10)),
            establishment_id: EstablishmentId::new(Uuid::from_u128(20)),
            hire_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            employee_role: None,
            establishment: None,
        }
    }

    fn eval(predicate: &Predicate<Employee>, entity: &Employee) -> Value {
        predicate.body().eval(predicate.param(), entity)
    }

    #[test]
    fn comparisons_on_null_are_unknown() {
        let row = employee(None);

        let contains = Predicate::contains(Employee::MIDDLE_NAME, "x");
        let equals = Predicate::equals(Employee::MIDDLE_NAME, "x");
        let member = Predicate::is_in(Employee::MIDDLE_NAME, ["x", "y"]);

        assert_eq!(eval(&contains, &row), Value::Null);
        assert_eq!(eval(&equals, &row), Value::Null);
        assert_eq!(eval(&member, &row), Value::Null);
        assert!(!contains.matches(&row));
    }

    #[test]
    fn negation_of_unknown_stays_unknown() {
        let null_middle = employee(None);
        let other_middle = employee(Some("King"));
        let not_x = Predicate::contains(Employee::MIDDLE_NAME, "x").negate();

        assert_eq!(eval(&not_x, &null_middle), Value::Null);
        assert!(!not_x.matches(&null_middle));
        assert!(not_x.matches(&other_middle));
    }

    #[test]
    fn and_or_follow_kleene_logic() {
        let row = employee(None);
        let unknown = || Predicate::contains(Employee::MIDDLE_NAME, "x");
        let yes = || Predicate::contains(Employee::FIRST_NAME, "ada");
        let no = || Predicate::contains(Employee::FIRST_NAME, "bob");

        assert_eq!(eval(&unknown().and(no()), &row), Value::Bool(false));
        assert_eq!(eval(&unknown().and(yes()), &row), Value::Null);
        assert_eq!(eval(&unknown().or(yes()), &row), Value::Bool(true));
        assert_eq!(eval(&unknown().or(no()), &row), Value::Null);
        assert!(unknown().and(no()).negate().matches(&row));
        assert!(!unknown().or(no()).negate().matches(&row));
    }

    #[test]
    fn null_literal_equality_and_empty_sets_are_false() {
        let row = employee(None);

        let null_eq = Predicate::equals(Employee::MIDDLE_NAME, Value::Null);
        let empty = Predicate::is_in(Employee::MIDDLE_NAME, Vec::<String>::new());

        assert_eq!(eval(&null_eq, &row), Value::Bool(false));
        assert_eq!(eval(&empty, &row), Value::Bool(false));
        assert!(null_eq.negate().matches(&row));
        assert!(empty.negate().matches(&row));
    }

    #[test]
    fn null_checks_are_never_unknown() {
        let is_null =
            Predicate::<Employee>::new(|var| var.field(Employee::MIDDLE_NAME).is_null());

        assert!(is_null.matches(&employee(None)));
        assert!(is_null.clone().negate().matches(&employee(Some("King"))));
    }
}
