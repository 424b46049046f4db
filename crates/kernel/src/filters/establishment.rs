//! Establishment filters.

use serde::{Deserialize, Serialize};

use crate::models::id::{EstablishmentId, UserId, parse_id_value};
use crate::models::{
    Establishment, EstablishmentAddress, EstablishmentContact, EstablishmentMember,
    EstablishmentPhone, MemberRole, PhoneType,
};
use crate::query::builder::{Criterion, FilterSet, ListParams, lenient};
use crate::query::entity::Field;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstablishmentFilter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,

    #[serde(flatten)]
    pub list: ListParams,
}

impl FilterSet for EstablishmentFilter {
    type Entity = Establishment;

    const CRITERIA: &'static [Criterion<Establishment, Self>] = &[
        Criterion::Contains {
            field: Establishment::NAME,
            arg: |f| f.name.as_deref(),
        },
        Criterion::Contains {
            field: Establishment::DESCRIPTION,
            arg: |f| f.description.as_deref(),
        },
        Criterion::Contains {
            field: Establishment::WEBSITE,
            arg: |f| f.website.as_deref(),
        },
    ];

    const SORTABLE: &'static [(&'static str, Field<Establishment>)] = &[
        ("id", Establishment::ID),
        ("name", Establishment::NAME),
        ("website", Establishment::WEBSITE),
    ];

    fn list_params(&self) -> &ListParams {
        &self.list
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstablishmentAddressFilter {
    pub establishment_id: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,

    #[serde(flatten)]
    pub list: ListParams,
}

impl FilterSet for EstablishmentAddressFilter {
    type Entity = EstablishmentAddress;

    const CRITERIA: &'static [Criterion<EstablishmentAddress, Self>] = &[
        Criterion::Id {
            field: EstablishmentAddress::ESTABLISHMENT_ID,
            arg: |f| f.establishment_id.as_deref(),
            parse: parse_id_value::<EstablishmentId>,
        },
        Criterion::Contains {
            field: EstablishmentAddress::ADDRESS_LINE1,
            arg: |f| f.address_line1.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentAddress::ADDRESS_LINE2,
            arg: |f| f.address_line2.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentAddress::CITY,
            arg: |f| f.city.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentAddress::STATE_PROVINCE,
            arg: |f| f.state_province.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentAddress::POSTAL_CODE,
            arg: |f| f.postal_code.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentAddress::COUNTRY,
            arg: |f| f.country.as_deref(),
        },
    ];

    const SORTABLE: &'static [(&'static str, Field<EstablishmentAddress>)] = &[
        ("id", EstablishmentAddress::ID),
        ("addressLine1", EstablishmentAddress::ADDRESS_LINE1),
        ("city", EstablishmentAddress::CITY),
        ("stateProvince", EstablishmentAddress::STATE_PROVINCE),
        ("postalCode", EstablishmentAddress::POSTAL_CODE),
        ("country", EstablishmentAddress::COUNTRY),
    ];

    fn list_params(&self) -> &ListParams {
        &self.list
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstablishmentContactFilter {
    pub establishment_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub job_title: Option<String>,

    #[serde(flatten)]
    pub list: ListParams,
}

impl FilterSet for EstablishmentContactFilter {
    type Entity = EstablishmentContact;

    const CRITERIA: &'static [Criterion<EstablishmentContact, Self>] = &[
        Criterion::Id {
            field: EstablishmentContact::ESTABLISHMENT_ID,
            arg: |f| f.establishment_id.as_deref(),
            parse: parse_id_value::<EstablishmentId>,
        },
        Criterion::Contains {
            field: EstablishmentContact::FIRST_NAME,
            arg: |f| f.first_name.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentContact::LAST_NAME,
            arg: |f| f.last_name.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentContact::EMAIL,
            arg: |f| f.email.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentContact::JOB_TITLE,
            arg: |f| f.job_title.as_deref(),
        },
    ];

    const SORTABLE: &'static [(&'static str, Field<EstablishmentContact>)] = &[
        ("id", EstablishmentContact::ID),
        ("firstName", EstablishmentContact::FIRST_NAME),
        ("lastName", EstablishmentContact::LAST_NAME),
        ("email", EstablishmentContact::EMAIL),
        ("jobTitle", EstablishmentContact::JOB_TITLE),
    ];

    fn list_params(&self) -> &ListParams {
        &self.list
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstablishmentMemberFilter {
    pub establishment_id: Option<String>,
    pub user_id: Option<String>,

    /// Numeric [`MemberRole`] id.
    #[serde(deserialize_with = "lenient::optional_i64")]
    pub member_role_id: Option<i64>,

    #[serde(flatten)]
    pub list: ListParams,
}

impl FilterSet for EstablishmentMemberFilter {
    type Entity = EstablishmentMember;

    const CRITERIA: &'static [Criterion<EstablishmentMember, Self>] = &[
        Criterion::Id {
            field: EstablishmentMember::ESTABLISHMENT_ID,
            arg: |f| f.establishment_id.as_deref(),
            parse: parse_id_value::<EstablishmentId>,
        },
        Criterion::Id {
            field: EstablishmentMember::USER_ID,
            arg: |f| f.user_id.as_deref(),
            parse: parse_id_value::<UserId>,
        },
        Criterion::Enum {
            field: EstablishmentMember::MEMBER_ROLE,
            arg: |f| f.member_role_id,
            resolve: MemberRole::resolve,
        },
    ];

    const SORTABLE: &'static [(&'static str, Field<EstablishmentMember>)] = &[
        ("id", EstablishmentMember::ID),
        ("memberRole", EstablishmentMember::MEMBER_ROLE),
    ];

    fn list_params(&self) -> &ListParams {
        &self.list
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstablishmentPhoneFilter {
    pub establishment_id: Option<String>,

    /// Numeric [`PhoneType`] id.
    #[serde(deserialize_with = "lenient::optional_i64")]
    pub phone_type_id: Option<i64>,

    pub country_code: Option<String>,
    pub phone_number: Option<String>,
    pub extension: Option<String>,

    #[serde(flatten)]
    pub list: ListParams,
}

impl FilterSet for EstablishmentPhoneFilter {
    type Entity = EstablishmentPhone;

    const CRITERIA: &'static [Criterion<EstablishmentPhone, Self>] = &[
        Criterion::Id {
            field: EstablishmentPhone::ESTABLISHMENT_ID,
            arg: |f| f.establishment_id.as_deref(),
            parse: parse_id_value::<EstablishmentId>,
        },
        Criterion::Enum {
            field: EstablishmentPhone::PHONE_TYPE,
            arg: |f| f.phone_type_id,
            resolve: PhoneType::resolve,
        },
        Criterion::Contains {
            field: EstablishmentPhone::COUNTRY_CODE,
            arg: |f| f.country_code.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentPhone::PHONE_NUMBER,
            arg: |f| f.phone_number.as_deref(),
        },
        Criterion::Contains {
            field: EstablishmentPhone::EXTENSION,
            arg: |f| f.extension.as_deref(),
        },
    ];

    const SORTABLE: &'static [(&'static str, Field<EstablishmentPhone>)] = &[
        ("id", EstablishmentPhone::ID),
        ("phoneType", EstablishmentPhone::PHONE_TYPE),
        ("countryCode", EstablishmentPhone::COUNTRY_CODE),
        ("phoneNumber", EstablishmentPhone::PHONE_NUMBER),
    ];

    fn list_params(&self) -> &ListParams {
        &self.list
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::query::specification::SortKey;

    #[test]
    fn member_filters_combine() {
        let filter = EstablishmentMemberFilter {
            establishment_id: Some("6f1c2a7e-3b4d-4e5f-8a9b-0c1d2e3f4a5b".to_string()),
            user_id: Some("garbage".to_string()),
            member_role_id: Some(1),
            ..Default::default()
        };

        let spec = filter.to_specification();

        let predicate = spec.predicate().unwrap();
        assert!(predicate.is_closed());
        assert!(matches!(predicate.body(), crate::query::Expr::And(_, _)));
    }

    #[test]
    fn address_sort_by_postal_code() {
        let filter = EstablishmentAddressFilter {
            list: ListParams {
                sort_by: Some("postalcode".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            filter.to_specification().sort_keys(),
            &[SortKey::asc(EstablishmentAddress::POSTAL_CODE)]
        );
    }
}
