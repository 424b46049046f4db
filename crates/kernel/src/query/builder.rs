//! Declarative specification builders.
//!
//! Each entity's filter struct implements [`FilterSet`]: an ordered table of
//! [`Criterion`]s plus a table of sortable fields. [`build`] walks the table
//! and turns whichever arguments are present into one [`Specification`].
//!
//! Building never fails. A blank text argument, an id that does not parse and
//! an enum id with no matching variant are all treated as "not supplied".

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::id::IdError;
use crate::query::entity::{Entity, Field};
use crate::query::predicate::Predicate;
use crate::query::specification::{SortDirection, SortKey, Specification};
use crate::query::value::Value;

/// Sort and paging arguments shared by every filter struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    /// Public name of the field to sort by (case-insensitive).
    pub sort_by: Option<String>,

    /// "asc" (default) or "desc".
    pub sort_direction: Option<String>,

    /// 1-based page number.
    #[serde(deserialize_with = "lenient::optional_u64")]
    pub page_number: Option<u64>,

    /// Rows per page.
    #[serde(deserialize_with = "lenient::optional_u64")]
    pub page_size: Option<u64>,
}

/// One optional filter argument and how it becomes a predicate.
pub enum Criterion<E, A> {
    /// Case-insensitive substring match on a text field.
    Contains {
        field: Field<E>,
        arg: fn(&A) -> Option<&str>,
    },
    /// Equality on an id field; the argument is parsed into a typed id first.
    Id {
        field: Field<E>,
        arg: fn(&A) -> Option<&str>,
        parse: fn(&str) -> Result<Value, IdError>,
    },
    /// Equality on an enum field; the numeric argument is resolved through
    /// the enum's own lookup first.
    Enum {
        field: Field<E>,
        arg: fn(&A) -> Option<i64>,
        resolve: fn(i64) -> Option<Value>,
    },
}

impl<E: Entity, A> Criterion<E, A> {
    /// The field this criterion filters on.
    pub fn field(&self) -> Field<E> {
        match self {
            Criterion::Contains { field, .. }
            | Criterion::Id { field, .. }
            | Criterion::Enum { field, .. } => *field,
        }
    }

    /// Single-field predicate for `args`, or `None` when the argument is
    /// absent or cannot be resolved.
    pub fn predicate(&self, args: &A) -> Option<Predicate<E>> {
        match self {
            Criterion::Contains { field, arg } => {
                let text = arg(args).filter(|text| !text.trim().is_empty())?;
                Some(Predicate::contains(*field, text))
            }
            Criterion::Id { field, arg, parse } => {
                let text = arg(args).filter(|text| !text.trim().is_empty())?;
                match parse(text) {
                    Ok(id) => Some(Predicate::equals(*field, id)),
                    Err(error) => {
                        tracing::debug!(
                            entity = E::SET_NAME,
                            field = field.name(),
                            error = %error,
                            "ignoring unparseable id filter"
                        );
                        None
                    }
                }
            }
            Criterion::Enum {
                field,
                arg,
                resolve,
            } => {
                let raw = arg(args)?;
                match resolve(raw) {
                    Some(value) => Some(Predicate::equals(*field, value)),
                    None => {
                        tracing::debug!(
                            entity = E::SET_NAME,
                            field = field.name(),
                            value = raw,
                            "ignoring unknown enum filter"
                        );
                        None
                    }
                }
            }
        }
    }
}

/// A filter struct that knows how to become a [`Specification`].
pub trait FilterSet: Sized + 'static {
    type Entity: Entity;

    /// Filter criteria, applied in this order.
    const CRITERIA: &'static [Criterion<Self::Entity, Self>];

    /// Sortable fields keyed by public name.
    const SORTABLE: &'static [(&'static str, Field<Self::Entity>)];

    fn list_params(&self) -> &ListParams;

    fn to_specification(&self) -> Specification<Self::Entity> {
        build(self)
    }
}

/// Build the specification described by `filters`.
pub fn build<F: FilterSet>(filters: &F) -> Specification<F::Entity> {
    let mut spec = Specification::new();

    for criterion in F::CRITERIA {
        if let Some(predicate) = criterion.predicate(filters) {
            spec = spec.and(Specification::filtered(predicate));
        }
    }

    let params = filters.list_params();
    let sort_key = match sort_field(F::SORTABLE, params.sort_by.as_deref()) {
        Some(field) => SortKey::new(
            field,
            SortDirection::parse(params.sort_direction.as_deref()),
        ),
        None => SortKey::asc(<F::Entity as Entity>::IDENTITY),
    };
    spec = spec.order_by(sort_key);

    if let (Some(page_number), Some(page_size)) = (params.page_number, params.page_size) {
        spec = spec.paged(page_number, page_size);
    }

    spec
}

/// Look up `sort_by` (case-insensitive) in a sortable-field table.
pub fn sort_field<E>(
    sortable: &[(&'static str, Field<E>)],
    sort_by: Option<&str>,
) -> Option<Field<E>> {
    let sort_by = sort_by?.trim();
    sortable
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(sort_by))
        .map(|(_, field)| *field)
}

/// Deserializers for numeric query parameters.
///
/// Query strings carry every value as text, so these accept a JSON number or
/// a numeric string. Anything else reads as absent.
pub mod lenient {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let raw = Option::<Raw>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Raw::Number(n)) => Some(n),
            Some(Raw::Text(text)) => text.trim().parse().ok(),
            Some(Raw::Other(_)) | None => None,
        })
    }

    pub fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        raw(deserializer)
    }

    pub fn optional_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(raw(deserializer)?.and_then(|n| u64::try_from(n).ok()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn list_params_accept_numeric_strings() {
        let params: ListParams = serde_json::from_value(serde_json::json!({
            "sortBy": "lastName",
            "sortDirection": "desc",
            "pageNumber": "2",
            "pageSize": 10
        }))
        .unwrap();

        assert_eq!(params.sort_by.as_deref(), Some("lastName"));
        assert_eq!(params.page_number, Some(2));
        assert_eq!(params.page_size, Some(10));
    }

    #[test]
    fn list_params_ignore_garbage_numbers() {
        let params: ListParams = serde_json::from_value(serde_json::json!({
            "pageNumber": "two",
            "pageSize": -5
        }))
        .unwrap();

        assert_eq!(params.page_number, None);
        assert_eq!(params.page_size, None);
    }
}
