pub mod a001_transformer;
pub mod a002_inspection_item;
pub mod a003_inspection_category;
