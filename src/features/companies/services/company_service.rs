use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::companies::dtos::{CompanyResponseDto, CreateCompanyDto, UpdateCompanyDto};
use crate::features::companies::models::Company;

/// Column list for companies queries
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Service for company (tenant) operations
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all companies, oldest first
    pub async fn list(&self) -> Result<Vec<CompanyResponseDto>> {
        let query = format!("SELECT {COLUMNS} FROM companies ORDER BY created_at, id");
        let companies = sqlx::query_as::<_, Company>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list companies: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(companies.into_iter().map(CompanyResponseDto::from).collect())
    }

    /// Get company by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<CompanyResponseDto> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get company: {:?}", e);
                AppError::Database(e)
            })?
            .map(CompanyResponseDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Company with id {} not found", id)))
    }

    /// Create a new company
    pub async fn create(&self, dto: CreateCompanyDto) -> Result<CompanyResponseDto> {
        let query = format!("INSERT INTO companies (name) VALUES ($1) RETURNING {COLUMNS}");
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(dto.name.trim())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create company: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Company created: id={}", company.id);

        Ok(company.into())
    }

    /// Update company fields; absent fields keep their current value
    pub async fn update(&self, id: Uuid, dto: UpdateCompanyDto) -> Result<CompanyResponseDto> {
        let query = format!(
            r#"
            UPDATE companies
            SET name = COALESCE($1, name),
                updated_at = NOW()
            WHERE id = $2
            RETURNING {COLUMNS}
            "#
        );
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(dto.name.as_deref().map(str::trim))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update company: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Company with id {} not found", id)))?;

        tracing::info!("Company updated: id={}", company.id);

        Ok(company.into())
    }

    /// Delete a company together with all of its categories
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let category_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE company_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        // categories go with the company via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete company: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Company with id {} not found",
                id
            )));
        }

        tx.commit().await?;

        tracing::info!(
            "Company deleted: id={}, cascaded_categories={}",
            id,
            category_count
        );

        Ok(())
    }
}
