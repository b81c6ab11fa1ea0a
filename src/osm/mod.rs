pub mod conversion;
pub mod entity;
pub mod filter;
pub mod pbf_source;
