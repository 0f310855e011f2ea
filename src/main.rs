use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use doc_translator::agents::delegate_from_config;
use doc_translator::queue::TranslationWorker;
use doc_translator::supabase::SupabaseClient;
use doc_translator::{config::Config, entry, routes::create_router, utils::init_logger, AppState};

#[derive(Parser)]
#[command(name = "doc-translator", version, about = "Run document translation jobs stored in Supabase")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the translate endpoint over HTTP
    Serve,
    /// Process one job using the configured Supabase credentials
    Process {
        /// Translation job id
        document_id: String,
    },
    /// Process one job from serialized arguments and print the JSON result
    Run {
        /// JSON object with documentId, supabaseUrl and supabaseKey
        #[arg(long)]
        args: String,
    },
}

fn build_worker(config: &Config) -> anyhow::Result<TranslationWorker> {
    let (url, key) = config.supabase.credentials()?;
    let client = SupabaseClient::new(url, key)?;
    let translator = delegate_from_config(&config.llm)?;

    Ok(TranslationWorker::new(
        Arc::new(doc_translator::db::TranslationRecords::with_table(
            client.clone(),
            &config.supabase.table,
        )),
        Arc::new(doc_translator::storage::SupabaseStorage::with_bucket(
            client,
            &config.supabase.bucket,
        )),
        translator,
    )
    .with_temp_dir(config.translation.temp_dir.clone()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let config = Config::from_env()?;
            let worker = build_worker(&config)?;
            let state = AppState {
                config: config.clone(),
                worker: Arc::new(worker),
            };
            let app = create_router(state);

            let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
            info!("Server listening on {}", addr);

            let listener = TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .await
                .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;
        }
        Command::Process { document_id } => {
            let config = Config::from_env()?;
            let worker = build_worker(&config)?;
            let outcome = worker.process_job(&document_id).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Run { args } => {
            let result = entry::run_translation_with_config(&args, Config::from_env()).await;
            println!("{}", result);
        }
    }

    Ok(())
}
