pub mod aggregate;

pub use aggregate::{InspectionItem, InspectionItemDto, InspectionQuery};
