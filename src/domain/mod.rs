pub mod error;
pub mod note;
pub mod repository;
pub mod user;
pub mod validation;
