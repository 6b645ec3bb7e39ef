pub mod extractive;
pub mod huggingface;
