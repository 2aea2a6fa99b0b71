pub mod filter;
pub mod media;
pub mod placement;
