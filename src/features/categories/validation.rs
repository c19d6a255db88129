//! Business rules shared by category create and update.
//!
//! The service resolves references through the store and hands the resolved
//! parent row to [`validate`]; the rules themselves never touch the database.

use uuid::Uuid;

use crate::features::categories::dtos::{CategoryRequestDto, PatchCategoryDto};
use crate::features::categories::models::Category;
use crate::shared::types::FieldErrors;

pub const SELF_PARENT_MESSAGE: &str = "A category cannot be its own parent.";
pub const CROSS_COMPANY_PARENT_MESSAGE: &str = "Parent category must belong to the same company.";
pub const DUPLICATE_NAME_MESSAGE: &str =
    "A category with this name already exists for this company.";
pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NULL_MESSAGE: &str = "This field may not be null.";
pub const COMPANY_HAS_CHILDREN_MESSAGE: &str =
    "A category with child categories cannot be moved to another company.";

/// Message for a reference that does not resolve to an existing row
pub fn does_not_exist_message(id: Uuid) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

/// Field values supplied by a create or update request.
///
/// `None` means "not supplied": on update the existing value is kept. For
/// `parent_category`, `Some(None)` explicitly clears the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub company: Option<Uuid>,
    pub name: Option<String>,
    pub parent_category: Option<Option<Uuid>>,
}

impl From<CategoryRequestDto> for CategoryChanges {
    fn from(dto: CategoryRequestDto) -> Self {
        Self {
            company: Some(dto.company),
            name: Some(dto.name.trim().to_string()),
            parent_category: Some(dto.parent_category),
        }
    }
}

impl TryFrom<PatchCategoryDto> for CategoryChanges {
    type Error = FieldErrors;

    fn try_from(dto: PatchCategoryDto) -> Result<Self, Self::Error> {
        let company = match dto.company {
            Some(None) => return Err(FieldErrors::single("company", NULL_MESSAGE)),
            Some(Some(company)) => Some(company),
            None => None,
        };

        Ok(Self {
            company,
            name: dto.name.map(|n| n.trim().to_string()),
            parent_category: dto.parent_category,
        })
    }
}

/// Whether the changes describe a new category or modify an existing one
#[derive(Debug, Clone, Copy)]
pub enum ValidationContext<'a> {
    Create,
    Update(&'a Category),
}

impl<'a> ValidationContext<'a> {
    pub fn existing(&self) -> Option<&'a Category> {
        match *self {
            ValidationContext::Create => None,
            ValidationContext::Update(existing) => Some(existing),
        }
    }
}

impl CategoryChanges {
    /// Company the category will belong to once the changes are applied
    pub fn effective_company(&self, ctx: &ValidationContext<'_>) -> Option<Uuid> {
        self.company
            .or_else(|| ctx.existing().map(|existing| existing.company_id))
    }

    /// Parent the category will point at once the changes are applied
    pub fn effective_parent(&self, ctx: &ValidationContext<'_>) -> Option<Uuid> {
        match self.parent_category {
            Some(parent) => parent,
            None => ctx
                .existing()
                .and_then(|existing| existing.parent_category_id),
        }
    }

    pub fn effective_name(&self, ctx: &ValidationContext<'_>) -> Option<String> {
        self.name
            .clone()
            .or_else(|| ctx.existing().map(|existing| existing.name.clone()))
    }
}

/// Field set that passed validation and is ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCategory {
    pub company_id: Uuid,
    pub name: String,
    pub parent_category_id: Option<Uuid>,
}

/// Apply the category rules to `changes`.
///
/// `parent` is the row the effective parent id resolved to, or `None` when
/// there is no parent or it does not exist. Rules short-circuit on the first
/// failure:
///
/// 1. the parent must exist
/// 2. on update, the parent must not be the category itself
/// 3. the parent must belong to the same company
///
/// Name uniqueness within a company is left to the storage constraint.
pub fn validate(
    changes: &CategoryChanges,
    ctx: &ValidationContext<'_>,
    parent: Option<&Category>,
) -> Result<ValidatedCategory, FieldErrors> {
    let company_id = changes
        .effective_company(ctx)
        .ok_or_else(|| FieldErrors::single("company", REQUIRED_MESSAGE))?;
    let name = changes
        .effective_name(ctx)
        .ok_or_else(|| FieldErrors::single("name", REQUIRED_MESSAGE))?;
    let parent_category_id = changes.effective_parent(ctx);

    if let Some(parent_id) = parent_category_id {
        let parent = parent
            .filter(|p| p.id == parent_id)
            .ok_or_else(|| {
                FieldErrors::single("parent_category", does_not_exist_message(parent_id))
            })?;

        if let ValidationContext::Update(existing) = ctx {
            if parent_id == existing.id {
                return Err(FieldErrors::single("parent_category", SELF_PARENT_MESSAGE));
            }
        }

        if parent.company_id != company_id {
            return Err(FieldErrors::single(
                "parent_category",
                CROSS_COMPANY_PARENT_MESSAGE,
            ));
        }
    }

    Ok(ValidatedCategory {
        company_id,
        name,
        parent_category_id,
    })
}
