use clap::Parser;
use ragcore::cli::commands::{Cli, Commands};
use ragcore::domain::entities::document::Metadata;
use ragcore::RagCore;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let db_path = std::env::var("RAGCORE_DB").unwrap_or_else(|_| "./ragcore.json".into());

    let engine = match RagCore::new(&db_path) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error initializing ragcore: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(engine, &db_path, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(
    engine: RagCore,
    db_path: &str,
    cmd: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Insert { text, metadata } => {
            let metadata = match metadata {
                Some(json) => parse_metadata(&json)?,
                None => Metadata::new(),
            };
            let id = engine.insert_document(text, metadata).await?;
            engine.save_db(db_path)?;
            println!("{}", serde_json::json!({ "id": id }));
        }
        Commands::LoadDocs { path } => {
            let raw = std::fs::read_to_string(&path)?;
            let docs: Vec<serde_json::Value> = serde_json::from_str(&raw)?;

            let mut texts = Vec::with_capacity(docs.len());
            let mut metadatas = Vec::with_capacity(docs.len());
            for doc in docs {
                let obj = doc
                    .as_object()
                    .ok_or("Each document must be a JSON object")?;
                let text = obj
                    .get("data")
                    .or_else(|| obj.get("text"))
                    .and_then(|v| v.as_str())
                    .ok_or("Each document needs a \"data\" or \"text\" field")?
                    .to_string();
                let metadata: Metadata = obj
                    .iter()
                    .filter(|(key, _)| key.as_str() != "data" && key.as_str() != "text")
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                texts.push(text);
                metadatas.push(metadata);
            }

            let ids = engine.insert_documents(texts, metadatas).await?;
            engine.save_db(db_path)?;
            println!("{}", serde_json::json!({ "inserted": ids.len() }));
        }
        Commands::Search { query, k } => {
            let hits = engine.search(&query, k).await?;
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Commands::Ask {
            question,
            k,
            max_length,
        } => {
            let answer = engine.query(&question, k, max_length).await?;
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
        Commands::Stats => {
            let stats = engine.stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

fn parse_metadata(json: &str) -> Result<Metadata, Box<dyn std::error::Error>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    value
        .as_object()
        .cloned()
        .ok_or_else(|| "Metadata must be a JSON object".into())
}
