use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::validation::{
    deserialize_present, deserialize_trimmed, deserialize_trimmed_option, validate_not_blank,
};

/// Query params for listing categories
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// Only categories owned by this company
    pub company: Option<Uuid>,

    /// Only direct children of this category
    pub parent_category: Option<Uuid>,

    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// Request DTO for creating (POST) or fully replacing (PUT) a category
///
/// On PUT an omitted `parent_category` clears the parent.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CategoryRequestDto {
    pub company: Uuid,

    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    pub parent_category: Option<Uuid>,
}

/// Request DTO for partially updating (PATCH) a category
///
/// Absent fields keep their current value; `"parent_category": null` clears
/// the parent. `company` is kept as present-or-absent so that an explicit
/// `null` can be rejected instead of ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PatchCategoryDto {
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<Uuid>)]
    pub company: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "deserialize_trimmed_option")]
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_category: Option<Option<Uuid>>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub company: Uuid,
    pub name: String,
    pub parent_category: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            company: c.company_id,
            name: c.name,
            parent_category: c.parent_category_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub company: Uuid,
    pub name: String,
    pub parent_category: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build tree from flat list of categories
    ///
    /// A category whose parent is not part of `categories` becomes a root.
    /// Categories that only reach each other through a parent cycle have no
    /// root and are left out.
    pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryTreeDto> {
        let is_root = |c: &Category| match c.parent_category_id {
            None => true,
            Some(parent_id) => !categories.iter().any(|p| p.id == parent_id),
        };

        let tree: Vec<CategoryTreeDto> = categories
            .iter()
            .filter(|&c| is_root(c))
            .map(|root| Self::build_node(root, &categories))
            .collect();

        let placed: usize = tree.iter().map(Self::node_count).sum();
        if placed < categories.len() {
            tracing::warn!(
                "Category tree left out {} of {} categories: parent cycle without a root",
                categories.len() - placed,
                categories.len()
            );
        }

        tree
    }

    fn node_count(node: &CategoryTreeDto) -> usize {
        1 + node.children.iter().map(Self::node_count).sum::<usize>()
    }

    fn build_node(category: &Category, all_categories: &[Category]) -> CategoryTreeDto {
        let children: Vec<CategoryTreeDto> = all_categories
            .iter()
            .filter(|c| c.parent_category_id == Some(category.id))
            .map(|child| Self::build_node(child, all_categories))
            .collect();

        CategoryTreeDto {
            id: category.id,
            company: category.company_id,
            name: category.name.clone(),
            parent_category: category.parent_category_id,
            created_at: category.created_at,
            updated_at: category.updated_at,
            children,
        }
    }
}
