//! Entity models.

pub mod employee;
pub mod enums;
pub mod establishment;
pub mod id;
pub mod social_media;

pub use employee::{Employee, EmployeeRole};
pub use enums::{EmployeeStatus, MemberRole, PhoneType};
pub use establishment::{
    Establishment, EstablishmentAddress, EstablishmentContact, EstablishmentMember,
    EstablishmentPhone,
};
pub use id::{IdError, TypedId, parse_typed_id};
pub use social_media::SocialMediaPlatform;
