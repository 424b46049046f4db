//! Strongly typed entity identifiers.
//!
//! Every entity id is a UUID newtype, so an `EmployeeId` cannot be passed
//! where an `EstablishmentId` is expected. Ids arrive from callers as text and
//! are parsed with [`parse_typed_id`].

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::query::value::Value;

/// Why a textual id was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("id is empty")]
    Empty,

    #[error("id must not be the nil UUID")]
    Nil,

    #[error("malformed id {input:?}: {reason}")]
    Malformed { input: String, reason: String },
}

/// A UUID-backed identifier type.
pub trait TypedId:
    Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Send + Sync + Into<Value> + 'static
{
    fn from_uuid(uuid: Uuid) -> Self;

    fn as_uuid(&self) -> Uuid;

    /// Parse trimmed text into an id. Blank text, malformed UUIDs and the nil
    /// UUID are rejected.
    fn parse(text: &str) -> Result<Self, IdError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(IdError::Empty);
        }
        let uuid = Uuid::parse_str(text).map_err(|e| IdError::Malformed {
            input: text.to_string(),
            reason: e.to_string(),
        })?;
        if uuid.is_nil() {
            return Err(IdError::Nil);
        }
        Ok(Self::from_uuid(uuid))
    }
}

/// Parse `text` as an id of type `I`.
pub fn parse_typed_id<I: TypedId>(text: &str) -> Result<I, IdError> {
    I::parse(text)
}

/// Parse `text` as an id of type `I` and return it as a predicate value.
pub fn parse_id_value<I: TypedId>(text: &str) -> Result<Value, IdError> {
    I::parse(text).map(Into::into)
}

macro_rules! typed_id {
    ($($(#[$meta:meta])* $name:ident;)+) => {$(
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl TypedId for $name {
            fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                <Self as TypedId>::parse(text)
            }
        }

        impl From<$name> for Value {
            fn from(id: $name) -> Self {
                Value::Uuid(id.0)
            }
        }
    )+};
}

typed_id! {
    /// Employee identifier.
    EmployeeId;
    /// Employee role identifier.
    EmployeeRoleId;
    /// Establishment identifier.
    EstablishmentId;
    EstablishmentAddressId;
    EstablishmentContactId;
    EstablishmentMemberId;
    EstablishmentPhoneId;
    SocialMediaPlatformId;
    /// Identifier of a user account in the identity provider.
    UserId;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_uuid() {
        let id: EmployeeId = parse_typed_id(" 6f1c2a7e-3b4d-4e5f-8a9b-0c1d2e3f4a5b ").unwrap();
        assert_eq!(id.to_string(), "6f1c2a7e-3b4d-4e5f-8a9b-0c1d2e3f4a5b");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(parse_typed_id::<EmployeeId>("   "), Err(IdError::Empty));
    }

    #[test]
    fn rejects_nil() {
        assert_eq!(
            parse_typed_id::<EstablishmentId>("00000000-0000-0000-0000-000000000000"),
            Err(IdError::Nil)
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_typed_id::<EstablishmentId>("not-a-guid").unwrap_err();
        assert!(matches!(err, IdError::Malformed { ref input, .. } if input == "not-a-guid"));
    }

    #[test]
    fn serializes_as_plain_uuid() {
        let id = UserId::new(Uuid::from_u128(7));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000007\"");
    }
}
