//! Roster command-line tool.
//!
//! Lists, counts and fetches records through the specification engine.
//!
//! Usage:
//!   roster list employee --filter firstName=ali --filter employeeStatusId=0 --page-number 1 --page-size 10
//!   roster count establishment --filter name=cafe
//!   roster get employee 6f1c2a7e-3b4d-4e5f-8a9b-0c1d2e3f4a5b --include establishment

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use roster_kernel::config::Config;
use roster_kernel::db;
use roster_kernel::filters::{
    EmployeeFilter, EmployeeRoleFilter, EstablishmentAddressFilter, EstablishmentContactFilter,
    EstablishmentFilter, EstablishmentMemberFilter, EstablishmentPhoneFilter,
    SocialMediaPlatformFilter,
};
use roster_kernel::models::TypedId;
use roster_kernel::query::{
    DataSource, Entity, FilterSet, PgSource, Specification, SpecificationEvaluator,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print the SQL that would run instead of executing it.
    #[arg(long, global = true)]
    sql: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of records.
    List {
        entity: EntityKind,

        #[command(flatten)]
        query: QueryArgs,
    },
    /// Count records matching the filters.
    Count {
        entity: EntityKind,

        #[command(flatten)]
        query: QueryArgs,
    },
    /// Fetch a single record by id.
    Get {
        entity: EntityKind,

        id: String,

        /// Relation to load alongside the record (repeatable).
        #[arg(long = "include")]
        includes: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EntityKind {
    Employee,
    EmployeeRole,
    Establishment,
    EstablishmentAddress,
    EstablishmentContact,
    EstablishmentMember,
    EstablishmentPhone,
    SocialMediaPlatform,
}

#[derive(Args, Debug, Default)]
struct QueryArgs {
    /// Filter argument as `name=value` using query-string names (repeatable).
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    #[arg(long)]
    sort_by: Option<String>,

    /// "asc" or "desc".
    #[arg(long)]
    sort_direction: Option<String>,

    #[arg(long)]
    page_number: Option<u64>,

    #[arg(long)]
    page_size: Option<u64>,

    /// Relation to load alongside each record (repeatable).
    #[arg(long = "include")]
    includes: Vec<String>,
}

impl QueryArgs {
    /// Collect every argument into the JSON object a filter struct
    /// deserializes from.
    fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.filters {
            map.insert(name.clone(), serde_json::Value::String(value.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            map.insert("sortBy".into(), sort_by.clone().into());
        }
        if let Some(direction) = &self.sort_direction {
            map.insert("sortDirection".into(), direction.clone().into());
        }
        if let Some(page_number) = self.page_number {
            map.insert("pageNumber".into(), page_number.into());
        }
        if let Some(page_size) = self.page_size {
            map.insert("pageSize".into(), page_size.into());
        }
        serde_json::Value::Object(map)
    }
}

fn parse_filter(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {arg:?}"))?;
    Ok((name.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    let config = Config::from_env().context("failed to load configuration")?;
    let pool = if cli.sql {
        db::lazy_pool(&config)?
    } else {
        db::create_pool(&config).await?
    };
    info!(
        max_connections = config.database_max_connections,
        statement_timeout = ?config.statement_timeout,
        "Configuration loaded"
    );

    let (entity, action) = match &cli.command {
        Command::List { entity, query } => (*entity, Action::List(query)),
        Command::Count { entity, query } => (*entity, Action::Count(query)),
        Command::Get {
            entity,
            id,
            includes,
        } => (*entity, Action::Get { id, includes }),
    };

    let output = dispatch(entity, &pool, &config, action, cli.sql).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[derive(Clone, Copy)]
enum Action<'a> {
    List(&'a QueryArgs),
    Count(&'a QueryArgs),
    Get { id: &'a str, includes: &'a [String] },
}

async fn dispatch(
    entity: EntityKind,
    pool: &PgPool,
    config: &Config,
    action: Action<'_>,
    sql_only: bool,
) -> Result<serde_json::Value> {
    match entity {
        EntityKind::Employee => run::<EmployeeFilter>(pool, config, action, sql_only).await,
        EntityKind::EmployeeRole => {
            run::<EmployeeRoleFilter>(pool, config, action, sql_only).await
        }
        EntityKind::Establishment => {
            run::<EstablishmentFilter>(pool, config, action, sql_only).await
        }
        EntityKind::EstablishmentAddress => {
            run::<EstablishmentAddressFilter>(pool, config, action, sql_only).await
        }
        EntityKind::EstablishmentContact => {
            run::<EstablishmentContactFilter>(pool, config, action, sql_only).await
        }
        EntityKind::EstablishmentMember => {
            run::<EstablishmentMemberFilter>(pool, config, action, sql_only).await
        }
        EntityKind::EstablishmentPhone => {
            run::<EstablishmentPhoneFilter>(pool, config, action, sql_only).await
        }
        EntityKind::SocialMediaPlatform => {
            run::<SocialMediaPlatformFilter>(pool, config, action, sql_only).await
        }
    }
}

async fn run<F>(
    pool: &PgPool,
    config: &Config,
    action: Action<'_>,
    sql_only: bool,
) -> Result<serde_json::Value>
where
    F: FilterSet + DeserializeOwned,
    F::Entity: DeserializeOwned + Serialize,
{
    let source = PgSource::<F::Entity>::from_config(pool.clone(), config);

    let (spec, counting) = match action {
        Action::List(args) | Action::Count(args) => {
            let filters: F =
                serde_json::from_value(args.to_json()).context("invalid filter arguments")?;
            let spec = with_includes(filters.to_specification(), &args.includes)?;
            (spec, matches!(action, Action::Count(_)))
        }
        Action::Get { id, includes } => {
            let id = <<F::Entity as Entity>::Id as TypedId>::parse(id)
                .with_context(|| format!("invalid {} id", <F::Entity as Entity>::SET_NAME))?;
            (with_includes(Specification::<F::Entity>::by_id(id), includes)?, false)
        }
    };

    if sql_only {
        let query = SpecificationEvaluator::apply(source.query(), &spec);
        let sql = if counting {
            query.sql().build_count()
        } else {
            query.sql().build()
        };
        return Ok(serde_json::Value::String(sql));
    }

    let output = match action {
        Action::List(_) => {
            let page = SpecificationEvaluator::page(&source, &spec).await?;
            serde_json::to_value(page)?
        }
        Action::Count(_) => {
            let total = SpecificationEvaluator::count(&source, &spec).await?;
            serde_json::json!({ "total": total })
        }
        Action::Get { .. } => {
            let record = SpecificationEvaluator::find(&source, &spec).await?;
            serde_json::to_value(record)?
        }
    };

    Ok(output)
}

/// Add the named relations to `spec`, rejecting names the entity lacks.
fn with_includes<E: Entity>(
    spec: Specification<E>,
    names: &[String],
) -> Result<Specification<E>> {
    names.iter().try_fold(spec, |spec, name| {
        let relation = E::relation(name)
            .with_context(|| format!("{} has no relation named {name:?}", E::SET_NAME))?;
        Ok(spec.include(relation))
    })
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
