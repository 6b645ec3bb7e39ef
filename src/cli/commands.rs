use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ragcore", about = "Retrieval-augmented question answering over a flat vector index")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Insert a single document
    Insert {
        /// Document text
        text: String,
        /// Optional JSON object with extra metadata
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Bulk-load documents from a JSON file (array of {"data": "...", ...})
    LoadDocs {
        /// Path to the JSON file
        path: String,
    },
    /// Semantic search without generation
    Search {
        query: String,
        #[arg(long, default_value = "5")]
        k: usize,
    },
    /// Full RAG query: retrieve context, then generate an answer
    Ask {
        question: String,
        #[arg(long, default_value = "3")]
        k: usize,
        /// Token budget for the generated answer
        #[arg(long, default_value = "150")]
        max_length: usize,
    },
    /// Show store statistics
    Stats,
}
