//! Static catalog of inspection categories

pub mod catalog;

pub use catalog::{all, find, CategoryKind, CONDITION_FIELDS, NORMAL_VALUE, OIL_AGING_ID};
