pub mod aggregate;

pub use aggregate::{serial_key, Importance, Transformer, TransformerDto};
