//! Social media platform model.

use serde::{Deserialize, Serialize};

use crate::models::id::SocialMediaPlatformId;
use crate::query::entity::{Entity, Field};
use crate::query::value::Value;

/// A social network an establishment can link to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMediaPlatform {
    pub id: SocialMediaPlatformId,
    pub name: String,
    pub base_url: String,
}

impl SocialMediaPlatform {
    pub const ID: Field<Self> = Field::new("id");
    pub const NAME: Field<Self> = Field::new("name");
    pub const BASE_URL: Field<Self> = Field::new("base_url");
}

impl Entity for SocialMediaPlatform {
    type Id = SocialMediaPlatformId;

    const SET_NAME: &'static str = "social_media_platforms";
    const IDENTITY: Field<Self> = Self::ID;

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "base_url" => (&self.base_url).into(),
            _ => Value::Null,
        }
    }
}
