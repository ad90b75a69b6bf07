// src/contract/mod.rs
pub mod models;
pub mod report;

#[allow(unused_imports)]
pub use models::{Beneficiary, Block, ContractData, ContractInfo, Totals, SENTINEL_DATE, UNKNOWN};
