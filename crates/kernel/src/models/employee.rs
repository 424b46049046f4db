//! Employee and employee role models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::enums::EmployeeStatus;
use crate::models::establishment::Establishment;
use crate::models::id::{EmployeeId, EmployeeRoleId, EstablishmentId};
use crate::query::entity::{Entity, Field, Relation};
use crate::query::value::Value;

/// Employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub employee_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub employee_status: EmployeeStatus,
    pub employee_role_id: EmployeeRoleId,
    pub establishment_id: EstablishmentId,
    pub hire_date: NaiveDate,

    /// Loaded only when the `employee_role` relation is included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_role: Option<EmployeeRole>,

    /// Loaded only when the `establishment` relation is included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub establishment: Option<Establishment>,
}

impl Employee {
    pub const ID: Field<Self> = Field::new("id");
    pub const EMPLOYEE_NUMBER: Field<Self> = Field::new("employee_number");
    pub const FIRST_NAME: Field<Self> = Field::new("first_name");
    pub const MIDDLE_NAME: Field<Self> = Field::new("middle_name");
    pub const LAST_NAME: Field<Self> = Field::new("last_name");
    pub const EMAIL: Field<Self> = Field::new("email");
    pub const EMPLOYEE_STATUS: Field<Self> = Field::new("employee_status");
    pub const EMPLOYEE_ROLE_ID: Field<Self> = Field::new("employee_role_id");
    pub const ESTABLISHMENT_ID: Field<Self> = Field::new("establishment_id");
    pub const HIRE_DATE: Field<Self> = Field::new("hire_date");

    pub const EMPLOYEE_ROLE: Relation<Self> =
        Relation::one::<EmployeeRole>("employee_role", "employee_role_id", "id");
    pub const ESTABLISHMENT: Relation<Self> =
        Relation::one::<Establishment>("establishment", "establishment_id", "id");
}

impl Entity for Employee {
    type Id = EmployeeId;

    const SET_NAME: &'static str = "employees";
    const IDENTITY: Field<Self> = Self::ID;
    const RELATIONS: &'static [Relation<Self>] = &[Self::EMPLOYEE_ROLE, Self::ESTABLISHMENT];

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "employee_number" => (&self.employee_number).into(),
            "first_name" => (&self.first_name).into(),
            "middle_name" => self.middle_name.as_ref().into(),
            "last_name" => (&self.last_name).into(),
            "email" => (&self.email).into(),
            "employee_status" => self.employee_status.into(),
            "employee_role_id" => self.employee_role_id.into(),
            "establishment_id" => self.establishment_id.into(),
            "hire_date" => self.hire_date.into(),
            _ => Value::Null,
        }
    }
}

/// Job role an employee can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRole {
    pub id: EmployeeRoleId,
    pub name: String,
    pub description: Option<String>,
}

impl EmployeeRole {
    pub const ID: Field<Self> = Field::new("id");
    pub const NAME: Field<Self> = Field::new("name");
    pub const DESCRIPTION: Field<Self> = Field::new("description");
}

impl Entity for EmployeeRole {
    type Id = EmployeeRoleId;

    const SET_NAME: &'static str = "employee_roles";
    const IDENTITY: Field<Self> = Self::ID;

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "description" => self.description.as_ref().into(),
            _ => Value::Null,
        }
    }
}
