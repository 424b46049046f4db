//! Per-entity filter arguments.
//!
//! Each struct deserializes from query-string style arguments (camelCase, all
//! optional) and implements [`FilterSet`](crate::query::FilterSet), so
//! `filters.to_specification()` yields the entity's [`Specification`].
//!
//! [`Specification`]: crate::query::Specification

pub mod employee;
pub mod establishment;
pub mod social_media;

pub use employee::{EmployeeFilter, EmployeeRoleFilter};
pub use establishment::{
    EstablishmentAddressFilter, EstablishmentContactFilter, EstablishmentFilter,
    EstablishmentMemberFilter, EstablishmentPhoneFilter,
};
pub use social_media::SocialMediaPlatformFilter;
