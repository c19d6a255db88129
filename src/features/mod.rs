pub mod categories;
pub mod companies;
