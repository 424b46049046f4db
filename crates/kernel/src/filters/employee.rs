//! Employee and employee role filters.

use serde::{Deserialize, Serialize};

use crate::models::id::{EmployeeRoleId, EstablishmentId, parse_id_value};
use crate::models::{Employee, EmployeeRole, EmployeeStatus};
use crate::query::builder::{Criterion, FilterSet, ListParams, lenient};
use crate::query::entity::Field;

/// Employee list arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeFilter {
    pub employee_number: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,

    /// Numeric [`EmployeeStatus`] id.
    #[serde(deserialize_with = "lenient::optional_i64")]
    pub employee_status_id: Option<i64>,

    pub employee_role_id: Option<String>,
    pub establishment_id: Option<String>,

    #[serde(flatten)]
    pub list: ListParams,
}

impl FilterSet for EmployeeFilter {
    type Entity = Employee;

    const CRITERIA: &'static [Criterion<Employee, Self>] = &[
        Criterion::Contains {
            field: Employee::EMPLOYEE_NUMBER,
            arg: |f| f.employee_number.as_deref(),
        },
        Criterion::Contains {
            field: Employee::FIRST_NAME,
            arg: |f| f.first_name.as_deref(),
        },
        Criterion::Contains {
            field: Employee::MIDDLE_NAME,
            arg: |f| f.middle_name.as_deref(),
        },
        Criterion::Contains {
            field: Employee::LAST_NAME,
            arg: |f| f.last_name.as_deref(),
        },
        Criterion::Contains {
            field: Employee::EMAIL,
            arg: |f| f.email.as_deref(),
        },
        Criterion::Enum {
            field: Employee::EMPLOYEE_STATUS,
            arg: |f| f.employee_status_id,
            resolve: EmployeeStatus::resolve,
        },
        Criterion::Id {
            field: Employee::EMPLOYEE_ROLE_ID,
            arg: |f| f.employee_role_id.as_deref(),
            parse: parse_id_value::<EmployeeRoleId>,
        },
        Criterion::Id {
            field: Employee::ESTABLISHMENT_ID,
            arg: |f| f.establishment_id.as_deref(),
            parse: parse_id_value::<EstablishmentId>,
        },
    ];

    const SORTABLE: &'static [(&'static str, Field<Employee>)] = &[
        ("id", Employee::ID),
        ("employeeNumber", Employee::EMPLOYEE_NUMBER),
        ("firstName", Employee::FIRST_NAME),
        ("middleName", Employee::MIDDLE_NAME),
        ("lastName", Employee::LAST_NAME),
        ("email", Employee::EMAIL),
        ("employeeStatus", Employee::EMPLOYEE_STATUS),
        ("hireDate", Employee::HIRE_DATE),
    ];

    fn list_params(&self) -> &ListParams {
        &self.list
    }
}

/// Employee role list arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeRoleFilter {
    pub name: Option<String>,
    pub description: Option<String>,

    #[serde(flatten)]
    pub list: ListParams,
}

impl FilterSet for EmployeeRoleFilter {
    type Entity = EmployeeRole;

    const CRITERIA: &'static [Criterion<EmployeeRole, Self>] = &[
        Criterion::Contains {
            field: EmployeeRole::NAME,
            arg: |f| f.name.as_deref(),
        },
        Criterion::Contains {
            field: EmployeeRole::DESCRIPTION,
            arg: |f| f.description.as_deref(),
        },
    ];

    const SORTABLE: &'static [(&'static str, Field<EmployeeRole>)] = &[
        ("id", EmployeeRole::ID),
        ("name", EmployeeRole::NAME),
    ];

    fn list_params(&self) -> &ListParams {
        &self.list
    }
}
