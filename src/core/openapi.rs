use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::companies::{dtos as companies_dtos, handlers as companies_handlers};
use crate::shared::types::{ErrorDetail, FieldErrors};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Companies
        companies_handlers::list_companies,
        companies_handlers::get_company,
        companies_handlers::create_company,
        companies_handlers::replace_company,
        companies_handlers::patch_company,
        companies_handlers::delete_company,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::replace_category,
        categories_handlers::patch_category,
        categories_handlers::delete_category,
    ),
    components(
        schemas(
            // Shared
            FieldErrors,
            ErrorDetail,
            // Companies
            companies_dtos::CreateCompanyDto,
            companies_dtos::UpdateCompanyDto,
            companies_dtos::CompanyResponseDto,
            // Categories
            categories_dtos::CategoryRequestDto,
            categories_dtos::PatchCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
        )
    ),
    tags(
        (name = "companies", description = "Tenants owning categories"),
        (name = "categories", description = "Per-company category trees"),
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
