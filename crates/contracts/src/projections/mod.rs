pub mod p900_inspection_summary;
