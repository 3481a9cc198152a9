//! Spatial indexing and distance utilities.

pub mod index;
pub mod queries;
