// src/extractors/mod.rs
pub mod header;
pub mod locale;
pub mod pipeline;
pub mod rows;
pub mod segment;
pub mod totals;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use pipeline::ContractExtractor;
#[allow(unused_imports)]
pub use segment::{DateAnchor, Segment};
