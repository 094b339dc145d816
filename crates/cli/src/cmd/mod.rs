pub mod common;
pub mod doctor;
pub mod list;
pub mod routes;
pub mod schema;
pub mod validate;
