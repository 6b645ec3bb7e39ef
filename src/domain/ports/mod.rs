pub mod embedding_port;
pub mod generation_port;
