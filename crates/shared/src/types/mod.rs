//! Small types shared by the API and repository layers.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
