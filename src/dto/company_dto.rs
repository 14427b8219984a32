use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::company::Company;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub website: Option<String>,
    #[validate(length(max = 255))]
    pub youtube_video: Option<String>,
    #[validate(length(max = 255))]
    pub twitter_handle: Option<String>,
    #[validate(length(max = 255))]
    pub instagram_handle: Option<String>,
    #[validate(length(max = 255))]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub website: Option<String>,
    #[validate(length(max = 255))]
    pub youtube_video: Option<String>,
    #[validate(length(max = 255))]
    pub twitter_handle: Option<String>,
    #[validate(length(max = 255))]
    pub instagram_handle: Option<String>,
    #[validate(length(max = 255))]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub youtube_video: Option<String>,
    pub twitter_handle: Option<String>,
    pub instagram_handle: Option<String>,
    pub logo_url: Option<String>,
}

impl From<Company> for CompanyResponse {
    fn from(value: Company) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            website: value.website,
            youtube_video: value.youtube_video,
            twitter_handle: value.twitter_handle,
            instagram_handle: value.instagram_handle,
            logo_url: value.logo_url,
        }
    }
}
