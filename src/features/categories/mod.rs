//! Categories feature.
//!
//! Categories are named nodes owned by a company. A category may point at a
//! parent category of the same company, forming a tree per company.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories/` | List categories (flat, or tree with `?tree=true`) |
//! | POST | `/api/categories/` | Create category |
//! | GET | `/api/categories/{id}/` | Get category |
//! | PUT | `/api/categories/{id}/` | Replace category |
//! | PATCH | `/api/categories/{id}/` | Partially update category |
//! | DELETE | `/api/categories/{id}/` | Delete category, detaching its children |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validation;

pub use services::CategoryService;
