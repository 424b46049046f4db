//! Social media platform filter.

use serde::{Deserialize, Serialize};

use crate::models::SocialMediaPlatform;
use crate::query::builder::{Criterion, FilterSet, ListParams};
use crate::query::entity::Field;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialMediaPlatformFilter {
    pub name: Option<String>,
    pub base_url: Option<String>,

    #[serde(flatten)]
    pub list: ListParams,
}

impl FilterSet for SocialMediaPlatformFilter {
    type Entity = SocialMediaPlatform;

    const CRITERIA: &'static [Criterion<SocialMediaPlatform, Self>] = &[
        Criterion::Contains {
            field: SocialMediaPlatform::NAME,
            arg: |f| f.name.as_deref(),
        },
        Criterion::Contains {
            field: SocialMediaPlatform::BASE_URL,
            arg: |f| f.base_url.as_deref(),
        },
    ];

    const SORTABLE: &'static [(&'static str, Field<SocialMediaPlatform>)] = &[
        ("id", SocialMediaPlatform::ID),
        ("name", SocialMediaPlatform::NAME),
        ("baseUrl", SocialMediaPlatform::BASE_URL),
    ];

    fn list_params(&self) -> &ListParams {
        &self.list
    }
}
