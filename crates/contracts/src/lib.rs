//! Types and pure logic shared by the transformer dashboard backend and frontend

pub mod domain;
pub mod projections;
pub mod shared;
pub mod system;
