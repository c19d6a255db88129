use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::companies::dtos::{CompanyResponseDto, CreateCompanyDto, UpdateCompanyDto};
use crate::features::companies::services::CompanyService;
use crate::shared::types::{ErrorDetail, FieldErrors};

/// List all companies
#[utoipa::path(
    get,
    path = "/api/companies/",
    responses(
        (status = 200, description = "List of companies", body = Vec<CompanyResponseDto>),
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(service): State<Arc<CompanyService>>,
) -> Result<Json<Vec<CompanyResponseDto>>> {
    let companies = service.list().await?;
    Ok(Json(companies))
}

/// Get company by ID
#[utoipa::path(
    get,
    path = "/api/companies/{id}/",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company found", body = CompanyResponseDto),
        (status = 404, description = "Company not found", body = ErrorDetail)
    ),
    tag = "companies"
)]
pub async fn get_company(
    State(service): State<Arc<CompanyService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CompanyResponseDto>> {
    let company = service.get_by_id(id).await?;
    Ok(Json(company))
}

/// Create a new company
#[utoipa::path(
    post,
    path = "/api/companies/",
    request_body = CreateCompanyDto,
    responses(
        (status = 201, description = "Company created", body = CompanyResponseDto),
        (status = 400, description = "Validation error", body = FieldErrors)
    ),
    tag = "companies"
)]
pub async fn create_company(
    State(service): State<Arc<CompanyService>>,
    AppJson(dto): AppJson<CreateCompanyDto>,
) -> Result<(StatusCode, Json<CompanyResponseDto>)> {
    dto.validate()?;

    let company = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// Replace a company
#[utoipa::path(
    put,
    path = "/api/companies/{id}/",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    request_body = CreateCompanyDto,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponseDto),
        (status = 400, description = "Validation error", body = FieldErrors),
        (status = 404, description = "Company not found", body = ErrorDetail)
    ),
    tag = "companies"
)]
pub async fn replace_company(
    State(service): State<Arc<CompanyService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<CreateCompanyDto>,
) -> Result<Json<CompanyResponseDto>> {
    dto.validate()?;

    let company = service.update(id, dto.into()).await?;
    Ok(Json(company))
}

/// Partially update a company
#[utoipa::path(
    patch,
    path = "/api/companies/{id}/",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    request_body = UpdateCompanyDto,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponseDto),
        (status = 400, description = "Validation error", body = FieldErrors),
        (status = 404, description = "Company not found", body = ErrorDetail)
    ),
    tag = "companies"
)]
pub async fn patch_company(
    State(service): State<Arc<CompanyService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<UpdateCompanyDto>,
) -> Result<Json<CompanyResponseDto>> {
    dto.validate()?;

    let company = service.update(id, dto).await?;
    Ok(Json(company))
}

/// Delete a company and all of its categories
#[utoipa::path(
    delete,
    path = "/api/companies/{id}/",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found", body = ErrorDetail)
    ),
    tag = "companies"
)]
pub async fn delete_company(
    State(service): State<Arc<CompanyService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
