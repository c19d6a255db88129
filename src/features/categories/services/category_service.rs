use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryTreeDto, ListCategoriesQuery,
};
use crate::features::categories::models::Category;
use crate::features::categories::validation::{
    self, does_not_exist_message, CategoryChanges, ValidatedCategory, ValidationContext,
    COMPANY_HAS_CHILDREN_MESSAGE, CROSS_COMPANY_PARENT_MESSAGE, DUPLICATE_NAME_MESSAGE,
    SELF_PARENT_MESSAGE,
};

/// Column list for categories queries
const COLUMNS: &str = "id, company_id, name, parent_category_id, created_at, updated_at";

/// Convert database error to field errors where a constraint backs a business rule
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.code().as_deref() {
            // unique_company_category_combination
            Some("23505") => return AppError::field("name", DUPLICATE_NAME_MESSAGE),
            // foreign key: the referenced company or parent vanished
            Some("23503") => {
                let field = match db_err.constraint() {
                    Some(c) if c.contains("parent_category") => "parent_category",
                    _ => "company",
                };
                return AppError::field(field, "Referenced record does not exist.");
            }
            Some("23514") => match db_err.constraint() {
                Some("categories_parent_same_company") => {
                    return AppError::field("parent_category", CROSS_COMPANY_PARENT_MESSAGE)
                }
                Some("categories_children_same_company") => {
                    return AppError::field("company", COMPANY_HAS_CHILDREN_MESSAGE)
                }
                Some("categories_parent_not_self") => {
                    return AppError::field("parent_category", SELF_PARENT_MESSAGE)
                }
                _ => {}
            },
            _ => {}
        }
    }

    tracing::error!("Category write failed: {:?}", e);
    AppError::Database(e)
}

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_filtered(&self, query: &ListCategoriesQuery) -> Result<Vec<Category>> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM categories
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::uuid IS NULL OR parent_category_id = $2)
            ORDER BY created_at, id
            "#
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(query.company)
            .bind(query.parent_category)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    /// List categories (flat list), optionally filtered by company or parent
    pub async fn list(&self, query: &ListCategoriesQuery) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.fetch_filtered(query).await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// List categories as tree structure
    pub async fn list_tree(&self, query: &ListCategoriesQuery) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.fetch_filtered(query).await?;
        Ok(CategoryTreeDto::build_tree(categories))
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponseDto> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category: {:?}", e);
                AppError::Database(e)
            })?
            .map(CategoryResponseDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    /// Create a new category
    pub async fn create(&self, changes: CategoryChanges) -> Result<CategoryResponseDto> {
        let mut tx = self.pool.begin().await?;

        let validated =
            Self::resolve_and_validate(&mut tx, &changes, &ValidationContext::Create).await?;

        let sql = format!(
            r#"
            INSERT INTO categories (company_id, name, parent_category_id)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        );
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(validated.company_id)
            .bind(&validated.name)
            .bind(validated.parent_category_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        tx.commit().await?;

        tracing::info!(
            "Category created: id={}, company_id={}, parent_category_id={:?}",
            category.id,
            category.company_id,
            category.parent_category_id
        );

        Ok(category.into())
    }

    /// Update a category. Fields absent from `changes` keep their current value.
    pub async fn update(&self, id: Uuid, changes: CategoryChanges) -> Result<CategoryResponseDto> {
        let mut tx = self.pool.begin().await?;

        let existing = Self::find_locked(&mut tx, id, "FOR UPDATE")
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;

        let validated =
            Self::resolve_and_validate(&mut tx, &changes, &ValidationContext::Update(&existing))
                .await?;

        // children keep pointing at this row, so it cannot leave their company
        if validated.company_id != existing.company_id && Self::has_children(&mut tx, id).await? {
            return Err(AppError::field("company", COMPANY_HAS_CHILDREN_MESSAGE));
        }

        let sql = format!(
            r#"
            UPDATE categories
            SET company_id = $1,
                name = $2,
                parent_category_id = $3,
                updated_at = NOW()
            WHERE id = $4
            RETURNING {COLUMNS}
            "#
        );
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(validated.company_id)
            .bind(&validated.name)
            .bind(validated.parent_category_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        tx.commit().await?;

        tracing::info!(
            "Category updated: id={}, company_id={}, parent_category_id={:?}",
            category.id,
            category.company_id,
            category.parent_category_id
        );

        Ok(category.into())
    }

    /// Delete a category. Children keep existing with their parent cleared.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        tracing::info!("Category deleted: id={}", id);

        Ok(())
    }

    /// Resolve the referenced company and parent, then run the category rules.
    ///
    /// Referenced rows are locked `FOR SHARE` until the transaction ends so the
    /// checked state holds at write time.
    async fn resolve_and_validate(
        conn: &mut PgConnection,
        changes: &CategoryChanges,
        ctx: &ValidationContext<'_>,
    ) -> Result<ValidatedCategory> {
        if let Some(company_id) = changes.company {
            let exists = sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM companies WHERE id = $1 FOR SHARE",
            )
            .bind(company_id)
            .fetch_optional(&mut *conn)
            .await?
            .is_some();

            if !exists {
                return Err(AppError::field(
                    "company",
                    does_not_exist_message(company_id),
                ));
            }
        }

        let parent = match changes.effective_parent(ctx) {
            Some(parent_id) => Self::find_locked(&mut *conn, parent_id, "FOR SHARE").await?,
            None => None,
        };

        validation::validate(changes, ctx, parent.as_ref()).map_err(AppError::Validation)
    }

    async fn has_children(conn: &mut PgConnection, id: Uuid) -> Result<bool> {
        let child = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM categories WHERE parent_category_id = $1 LIMIT 1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(child.is_some())
    }

    async fn find_locked(
        conn: &mut PgConnection,
        id: Uuid,
        lock: &'static str,
    ) -> Result<Option<Category>> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 {lock}");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(category)
    }
}
