#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Fixture builders shared by the integration tests.
//!
//! Ids are derived from small integers (`Uuid::from_u128(n)`) so that
//! identity order matches the numbers used to build the fixtures.

#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;

use roster_kernel::models::id::{
    EmployeeId, EmployeeRoleId, EstablishmentAddressId, EstablishmentContactId, EstablishmentId,
    EstablishmentMemberId, EstablishmentPhoneId, SocialMediaPlatformId, UserId,
};
use roster_kernel::models::{
    Employee, EmployeeRole, EmployeeStatus, Establishment, EstablishmentAddress,
    EstablishmentContact, EstablishmentMember, EstablishmentPhone, MemberRole, PhoneType,
    SocialMediaPlatform, TypedId,
};

/// Establishment every fixture employee belongs to unless overridden.
pub const DEFAULT_ESTABLISHMENT: u128 = 900;

/// Role every fixture employee holds unless overridden.
pub const DEFAULT_ROLE: u128 = 800;

pub fn employee(n: u128, first_name: &str, status: EmployeeStatus) -> Employee {
    Employee {
        id: EmployeeId::new(Uuid::from_u128(n)),
        employee_number: format!("E-{n:04}"),
        first_name: first_name.to_string(),
        middle_name: None,
        last_name: format!("Last{n}"),
        email: format!("{}.{n}@example.com", first_name.to_lowercase()),
        employee_status: status,
        employee_role_id: EmployeeRoleId::new(Uuid::from_u128(DEFAULT_ROLE)),
        establishment_id: EstablishmentId::new(Uuid::from_u128(DEFAULT_ESTABLISHMENT)),
        hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        employee_role: None,
        establishment: None,
    }
}

/// Active employees numbered `1..=count`, inserted in reverse order so that
/// insertion order never happens to match identity order.
pub fn numbered_employees(count: u128) -> Vec<Employee> {
    (1..=count)
        .rev()
        .map(|n| employee(n, &format!("Worker{n}"), EmployeeStatus::Active))
        .collect()
}

pub fn role(n: u128, name: &str) -> EmployeeRole {
    EmployeeRole {
        id: EmployeeRoleId::new(Uuid::from_u128(n)),
        name: name.to_string(),
        description: None,
    }
}

pub fn establishment(n: u128, name: &str) -> Establishment {
    Establishment {
        id: EstablishmentId::new(Uuid::from_u128(n)),
        name: name.to_string(),
        description: None,
        website: None,
        addresses: Vec::new(),
        contacts: Vec::new(),
        phones: Vec::new(),
        members: Vec::new(),
    }
}

pub fn address(n: u128, establishment: u128, city: &str) -> EstablishmentAddress {
    EstablishmentAddress {
        id: EstablishmentAddressId::new(Uuid::from_u128(n)),
        establishment_id: EstablishmentId::new(Uuid::from_u128(establishment)),
        address_line1: format!("{n} Main Street"),
        address_line2: None,
        city: city.to_string(),
        state_province: "Province".to_string(),
        postal_code: format!("{n:05}"),
        country: "NO".to_string(),
        establishment: None,
    }
}

pub fn contact(
    n: u128,
    establishment: u128,
    first_name: &str,
    last_name: &str,
) -> EstablishmentContact {
    EstablishmentContact {
        id: EstablishmentContactId::new(Uuid::from_u128(n)),
        establishment_id: EstablishmentId::new(Uuid::from_u128(establishment)),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        job_title: None,
        establishment: None,
    }
}

pub fn member(n: u128, establishment: u128, user: u128, role: MemberRole) -> EstablishmentMember {
    EstablishmentMember {
        id: EstablishmentMemberId::new(Uuid::from_u128(n)),
        establishment_id: EstablishmentId::new(Uuid::from_u128(establishment)),
        user_id: UserId::new(Uuid::from_u128(user)),
        member_role: role,
        establishment: None,
    }
}

pub fn phone(n: u128, establishment: u128, phone_type: PhoneType) -> EstablishmentPhone {
    EstablishmentPhone {
        id: EstablishmentPhoneId::new(Uuid::from_u128(n)),
        establishment_id: EstablishmentId::new(Uuid::from_u128(establishment)),
        phone_type,
        country_code: "+47".to_string(),
        phone_number: format!("555{n:04}"),
        extension: None,
        establishment: None,
    }
}

pub fn platform(n: u128, name: &str, base_url: &str) -> SocialMediaPlatform {
    SocialMediaPlatform {
        id: SocialMediaPlatformId::new(Uuid::from_u128(n)),
        name: name.to_string(),
        base_url: base_url.to_string(),
    }
}

/// Numeric part of an entity id, for readable assertions.
pub fn rank<I: TypedId>(id: I) -> u128 {
    id.as_uuid().as_u128()
}

/// Numeric parts of a slice of ids.
pub fn id_ranks<I: TypedId>(ids: impl IntoIterator<Item = I>) -> Vec<u128> {
    ids.into_iter().map(rank).collect()
}

pub fn ranks(employees: &[Employee]) -> Vec<u128> {
    employees.iter().map(|e| rank(e.id)).collect()
}
