//! Data Transfer Objects for REST request/response serialization.

pub mod health_dto;
pub mod write_dto;

pub use health_dto::*;
pub use write_dto::*;
