use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::companies::models::Company;
use crate::shared::validation::{
    deserialize_trimmed, deserialize_trimmed_option, validate_not_blank,
};

/// Request DTO for creating or replacing a company
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
}

/// Request DTO for partially updating a company
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyDto {
    #[serde(default, deserialize_with = "deserialize_trimmed_option")]
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
}

impl From<CreateCompanyDto> for UpdateCompanyDto {
    fn from(dto: CreateCompanyDto) -> Self {
        Self {
            name: Some(dto.name),
        }
    }
}

/// Response DTO for company
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyResponseDto {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponseDto {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
