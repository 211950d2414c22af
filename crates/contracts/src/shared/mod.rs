pub mod api_error;
pub mod calculation;
pub mod form_schema;
