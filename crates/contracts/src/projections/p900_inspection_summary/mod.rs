pub mod dto;

pub use dto::{InspectionSummaryResponse, TransformerSummaryDto};
