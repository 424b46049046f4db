#![allow(clippy::unwrap_used, clippy::expect_used)]
//! PostgreSQL source tests.
//!
//! Each test runs the same specification through the in-memory source and
//! the PostgreSQL source over identical rows and compares the results. The
//! rows live in a temporary `employees` table on a single-connection pool, so
//! nothing outside the test session is touched.
//!
//! Requires `DATABASE_URL`; the tests return early when it is unset.

mod common;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use roster_kernel::models::{Employee, EmployeeStatus, TypedId};
use roster_kernel::query::{
    MemorySource, PgSource, Predicate, Specification, SpecificationEvaluator,
};

use common::{employee, ranks};

/// Single-connection pool with a temporary `employees` table holding `rows`.
async fn seeded_pool(rows: &[Employee]) -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");

    sqlx::query(
        "CREATE TEMP TABLE employees (
            id UUID PRIMARY KEY,
            employee_number TEXT NOT NULL,
            first_name TEXT NOT NULL,
            middle_name TEXT,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            employee_status SMALLINT NOT NULL,
            employee_role_id UUID NOT NULL,
            establishment_id UUID NOT NULL,
            hire_date DATE NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    for row in rows {
        sqlx::query(
            "INSERT INTO employees (id, employee_number, first_name, middle_name, last_name,
                email, employee_status, employee_role_id, establishment_id, hire_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(row.id.as_uuid())
        .bind(&row.employee_number)
        .bind(&row.first_name)
        .bind(row.middle_name.as_deref())
        .bind(&row.last_name)
        .bind(&row.email)
        .bind(row.employee_status.id())
        .bind(row.employee_role_id.as_uuid())
        .bind(row.establishment_id.as_uuid())
        .bind(row.hire_date)
        .execute(&pool)
        .await
        .unwrap();
    }

    Some(pool)
}

fn fixture() -> Vec<Employee> {
    let mut with_middle = employee(2, "Bob", EmployeeStatus::Active);
    with_middle.middle_name = Some("Xavier".to_string());
    let mut other_middle = employee(3, "Carol", EmployeeStatus::Suspended);
    other_middle.middle_name = Some("Ann".to_string());

    vec![
        employee(1, "Alice", EmployeeStatus::Active),
        with_middle,
        other_middle,
        employee(4, "Dan", EmployeeStatus::Inactive),
    ]
}

/// Ranks selected by `spec` from the in-memory and the PostgreSQL source.
async fn both_sources(spec: &Specification<Employee>) -> Option<(Vec<u128>, Vec<u128>)> {
    let rows = fixture();
    let pool = seeded_pool(&rows).await?;

    let memory = MemorySource::new(rows);
    let postgres = PgSource::<Employee>::new(pool);

    let in_memory = SpecificationEvaluator::list(&memory, spec).await.unwrap();
    let in_postgres = SpecificationEvaluator::list(&postgres, spec).await.unwrap();

    Some((ranks(&in_memory), ranks(&in_postgres)))
}

// -------------------------------------------------------------------------
// Null handling agrees across sources
// -------------------------------------------------------------------------

#[tokio::test]
async fn negated_contains_skips_null_columns_in_both_sources() {
    let spec =
        Specification::filtered(Predicate::contains(Employee::MIDDLE_NAME, "x").negate());

    let Some((memory, postgres)) = both_sources(&spec).await else {
        return;
    };

    assert_eq!(memory, vec![3]);
    assert_eq!(memory, postgres);
}

#[tokio::test]
async fn negated_or_with_unknown_branch_agrees() {
    let spec = Specification::filtered(
        Predicate::contains(Employee::MIDDLE_NAME, "x")
            .or(Predicate::equals(Employee::EMPLOYEE_STATUS, EmployeeStatus::Inactive))
            .negate(),
    );

    let Some((memory, postgres)) = both_sources(&spec).await else {
        return;
    };

    assert_eq!(memory, vec![3]);
    assert_eq!(memory, postgres);
}

#[tokio::test]
async fn negated_and_with_false_branch_agrees() {
    let spec = Specification::filtered(
        Predicate::contains(Employee::MIDDLE_NAME, "x")
            .and(Predicate::contains(Employee::FIRST_NAME, "zz"))
            .negate(),
    );

    let Some((memory, postgres)) = both_sources(&spec).await else {
        return;
    };

    assert_eq!(memory, vec![1, 2, 3, 4]);
    assert_eq!(memory, postgres);
}

#[tokio::test]
async fn null_checks_and_membership_agree() {
    let spec = Specification::filtered(
        Predicate::<Employee>::new(|var| var.field(Employee::MIDDLE_NAME).is_null())
            .or(Predicate::is_in(Employee::MIDDLE_NAME, ["Ann"])),
    );

    let Some((memory, postgres)) = both_sources(&spec).await else {
        return;
    };

    assert_eq!(memory, vec![1, 3, 4]);
    assert_eq!(memory, postgres);
}
