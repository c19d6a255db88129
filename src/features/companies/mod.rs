//! Companies (tenants) feature.
//!
//! Every category belongs to exactly one company. Deleting a company removes
//! all of its categories in the same statement.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/companies/` | List companies |
//! | POST | `/api/companies/` | Create company |
//! | GET | `/api/companies/{id}/` | Get company |
//! | PUT | `/api/companies/{id}/` | Replace company |
//! | PATCH | `/api/companies/{id}/` | Partially update company |
//! | DELETE | `/api/companies/{id}/` | Delete company and its categories |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CompanyService;
