//! CSV RAG Server binary
//!
//! Run with: cargo run -p csv-rag --bin csv-rag-server

use csv_rag::{config::RagConfig, server::CsvRagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csv_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                      CSV RAG Service                      ║
║          Upload CSV files and ask questions               ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Upload dir: {}", config.storage.upload_dir.display());
    tracing::info!("  - Database: {}", config.storage.database_path.display());
    tracing::info!("  - LLM provider: {:?}", config.llm.provider);
    tracing::info!("  - LLM model: {}", config.llm.model);

    // Create server
    let server = CsvRagServer::new(config).await?;

    // Check completion provider
    let completion = server.state().service().completion();
    tracing::info!("Checking {} ({})...", completion.name(), completion.model());
    match completion.health_check().await {
        Ok(true) => tracing::info!("{} is reachable", completion.name()),
        Ok(false) => tracing::warn!("{} responded but is not healthy", completion.name()),
        Err(e) => {
            tracing::warn!("{} not available: {}", completion.name(), e);
            tracing::warn!("Queries will fail until the provider is reachable");
        }
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/info", server.address());
    println!("\nEndpoints:");
    println!("  POST   /upload            - Upload a CSV file");
    println!("  GET    /files             - List files");
    println!("  GET    /preview/:file_id  - Preview first rows");
    println!("  POST   /query             - Ask a question");
    println!("  DELETE /file/:file_id     - Delete a file");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
