use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath, AppQuery};
use crate::features::categories::dtos::{
    CategoryRequestDto, CategoryResponseDto, CategoryTreeDto, ListCategoriesQuery,
    PatchCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::features::categories::validation::CategoryChanges;
use crate::shared::types::{ErrorDetail, FieldErrors};

/// List categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories/",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories (tree=true returns CategoryTreeDto nodes)", body = Vec<CategoryResponseDto>),
        (status = 400, description = "Invalid query string", body = ErrorDetail)
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    AppQuery(query): AppQuery<ListCategoriesQuery>,
) -> Result<Response> {
    if query.tree {
        let tree: Vec<CategoryTreeDto> = service.list_tree(&query).await?;
        Ok(Json(tree).into_response())
    } else {
        let categories = service.list(&query).await?;
        Ok(Json(categories).into_response())
    }
}

/// Get category by ID
#[utoipa::path(
    get,
    path = "/api/categories/{id}/",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponseDto),
        (status = 404, description = "Category not found", body = ErrorDetail)
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CategoryResponseDto>> {
    let category = service.get_by_id(id).await?;
    Ok(Json(category))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/categories/",
    request_body = CategoryRequestDto,
    responses(
        (status = 201, description = "Category created", body = CategoryResponseDto),
        (status = 400, description = "Validation error", body = FieldErrors)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CategoryRequestDto>,
) -> Result<(StatusCode, Json<CategoryResponseDto>)> {
    dto.validate()?;

    let category = service.create(dto.into()).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace a category (company, name and parent_category)
#[utoipa::path(
    put,
    path = "/api/categories/{id}/",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = CategoryRequestDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponseDto),
        (status = 400, description = "Validation error", body = FieldErrors),
        (status = 404, description = "Category not found", body = ErrorDetail)
    ),
    tag = "categories"
)]
pub async fn replace_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<CategoryRequestDto>,
) -> Result<Json<CategoryResponseDto>> {
    dto.validate()?;

    let category = service.update(id, dto.into()).await?;
    Ok(Json(category))
}

/// Partially update a category
#[utoipa::path(
    patch,
    path = "/api/categories/{id}/",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = PatchCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponseDto),
        (status = 400, description = "Validation error", body = FieldErrors),
        (status = 404, description = "Category not found", body = ErrorDetail)
    ),
    tag = "categories"
)]
pub async fn patch_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<PatchCategoryDto>,
) -> Result<Json<CategoryResponseDto>> {
    dto.validate()?;

    let category = service.update(id, CategoryChanges::try_from(dto)?).await?;
    Ok(Json(category))
}

/// Delete a category
///
/// Children of the deleted category are kept with their parent cleared.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}/",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = ErrorDetail)
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
