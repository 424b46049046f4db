//! Establishment model and its owned child records.

use serde::{Deserialize, Serialize};

use crate::models::enums::{MemberRole, PhoneType};
use crate::models::id::{
    EstablishmentAddressId, EstablishmentContactId, EstablishmentId, EstablishmentMemberId,
    EstablishmentPhoneId, UserId,
};
use crate::query::entity::{Entity, Field, Relation};
use crate::query::value::Value;

/// A business that employs people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Establishment {
    pub id: EstablishmentId,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<EstablishmentAddress>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<EstablishmentContact>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<EstablishmentPhone>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<EstablishmentMember>,
}

impl Establishment {
    pub const ID: Field<Self> = Field::new("id");
    pub const NAME: Field<Self> = Field::new("name");
    pub const DESCRIPTION: Field<Self> = Field::new("description");
    pub const WEBSITE: Field<Self> = Field::new("website");

    pub const ADDRESSES: Relation<Self> =
        Relation::many::<EstablishmentAddress>("addresses", "id", "establishment_id");
    pub const CONTACTS: Relation<Self> =
        Relation::many::<EstablishmentContact>("contacts", "id", "establishment_id");
    pub const PHONES: Relation<Self> =
        Relation::many::<EstablishmentPhone>("phones", "id", "establishment_id");
    pub const MEMBERS: Relation<Self> =
        Relation::many::<EstablishmentMember>("members", "id", "establishment_id");
}

impl Entity for Establishment {
    type Id = EstablishmentId;

    const SET_NAME: &'static str = "establishments";
    const IDENTITY: Field<Self> = Self::ID;
    const RELATIONS: &'static [Relation<Self>] =
        &[Self::ADDRESSES, Self::CONTACTS, Self::PHONES, Self::MEMBERS];

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "description" => self.description.as_ref().into(),
            "website" => self.website.as_ref().into(),
            _ => Value::Null,
        }
    }
}

/// Postal address of an establishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentAddress {
    pub id: EstablishmentAddressId,
    pub establishment_id: EstablishmentId,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub establishment: Option<Establishment>,
}

impl EstablishmentAddress {
    pub const ID: Field<Self> = Field::new("id");
    pub const ESTABLISHMENT_ID: Field<Self> = Field::new("establishment_id");
    pub const ADDRESS_LINE1: Field<Self> = Field::new("address_line1");
    pub const ADDRESS_LINE2: Field<Self> = Field::new("address_line2");
    pub const CITY: Field<Self> = Field::new("city");
    pub const STATE_PROVINCE: Field<Self> = Field::new("state_province");
    pub const POSTAL_CODE: Field<Self> = Field::new("postal_code");
    pub const COUNTRY: Field<Self> = Field::new("country");

    pub const ESTABLISHMENT: Relation<Self> =
        Relation::one::<Establishment>("establishment", "establishment_id", "id");
}

impl Entity for EstablishmentAddress {
    type Id = EstablishmentAddressId;

    const SET_NAME: &'static str = "establishment_addresses";
    const IDENTITY: Field<Self> = Self::ID;
    const RELATIONS: &'static [Relation<Self>] = &[Self::ESTABLISHMENT];

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "establishment_id" => self.establishment_id.into(),
            "address_line1" => (&self.address_line1).into(),
            "address_line2" => self.address_line2.as_ref().into(),
            "city" => (&self.city).into(),
            "state_province" => (&self.state_province).into(),
            "postal_code" => (&self.postal_code).into(),
            "country" => (&self.country).into(),
            _ => Value::Null,
        }
    }
}

/// A person to contact at an establishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentContact {
    pub id: EstablishmentContactId,
    pub establishment_id: EstablishmentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub establishment: Option<Establishment>,
}

impl EstablishmentContact {
    pub const ID: Field<Self> = Field::new("id");
    pub const ESTABLISHMENT_ID: Field<Self> = Field::new("establishment_id");
    pub const FIRST_NAME: Field<Self> = Field::new("first_name");
    pub const LAST_NAME: Field<Self> = Field::new("last_name");
    pub const EMAIL: Field<Self> = Field::new("email");
    pub const JOB_TITLE: Field<Self> = Field::new("job_title");

    pub const ESTABLISHMENT: Relation<Self> =
        Relation::one::<Establishment>("establishment", "establishment_id", "id");
}

impl Entity for EstablishmentContact {
    type Id = EstablishmentContactId;

    const SET_NAME: &'static str = "establishment_contacts";
    const IDENTITY: Field<Self> = Self::ID;
    const RELATIONS: &'static [Relation<Self>] = &[Self::ESTABLISHMENT];

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "establishment_id" => self.establishment_id.into(),
            "first_name" => (&self.first_name).into(),
            "last_name" => (&self.last_name).into(),
            "email" => (&self.email).into(),
            "job_title" => self.job_title.as_ref().into(),
            _ => Value::Null,
        }
    }
}

/// A user's membership in an establishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentMember {
    pub id: EstablishmentMemberId,
    pub establishment_id: EstablishmentId,
    pub user_id: UserId,
    pub member_role: MemberRole,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub establishment: Option<Establishment>,
}

impl EstablishmentMember {
    pub const ID: Field<Self> = Field::new("id");
    pub const ESTABLISHMENT_ID: Field<Self> = Field::new("establishment_id");
    pub const USER_ID: Field<Self> = Field::new("user_id");
    pub const MEMBER_ROLE: Field<Self> = Field::new("member_role");

    pub const ESTABLISHMENT: Relation<Self> =
        Relation::one::<Establishment>("establishment", "establishment_id", "id");
}

impl Entity for EstablishmentMember {
    type Id = EstablishmentMemberId;

    const SET_NAME: &'static str = "establishment_members";
    const IDENTITY: Field<Self> = Self::ID;
    const RELATIONS: &'static [Relation<Self>] = &[Self::ESTABLISHMENT];

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "establishment_id" => self.establishment_id.into(),
            "user_id" => self.user_id.into(),
            "member_role" => self.member_role.into(),
            _ => Value::Null,
        }
    }
}

/// Phone number of an establishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentPhone {
    pub id: EstablishmentPhoneId,
    pub establishment_id: EstablishmentId,
    pub phone_type: PhoneType,
    pub country_code: String,
    pub phone_number: String,
    pub extension: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub establishment: Option<Establishment>,
}

impl EstablishmentPhone {
    pub const ID: Field<Self> = Field::new("id");
    pub const ESTABLISHMENT_ID: Field<Self> = Field::new("establishment_id");
    pub const PHONE_TYPE: Field<Self> = Field::new("phone_type");
    pub const COUNTRY_CODE: Field<Self> = Field::new("country_code");
    pub const PHONE_NUMBER: Field<Self> = Field::new("phone_number");
    pub const EXTENSION: Field<Self> = Field::new("extension");

    pub const ESTABLISHMENT: Relation<Self> =
        Relation::one::<Establishment>("establishment", "establishment_id", "id");
}

impl Entity for EstablishmentPhone {
    type Id = EstablishmentPhoneId;

    const SET_NAME: &'static str = "establishment_phones";
    const IDENTITY: Field<Self> = Self::ID;
    const RELATIONS: &'static [Relation<Self>] = &[Self::ESTABLISHMENT];

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "establishment_id" => self.establishment_id.into(),
            "phone_type" => self.phone_type.into(),
            "country_code" => (&self.country_code).into(),
            "phone_number" => (&self.phone_number).into(),
            "extension" => self.extension.as_ref().into(),
            _ => Value::Null,
        }
    }
}
