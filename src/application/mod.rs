pub mod ask;
pub mod retrieval;
