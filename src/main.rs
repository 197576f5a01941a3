//! Vista entrypoint: HTTP server, terminal chat, dataset ingestion and health probe.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::signal;

use vista::assistant::{AssistantConfig, HybridAssistant};
use vista::cache::EmbeddingCacheHandle;
use vista::config::{Config, VectorBackend};
use vista::constants::DEFAULT_NEIGHBORS_PER_NODE;
use vista::embedding::{CachedEmbedder, EmbeddingProvider, HashingEmbedder, HttpEmbedder};
use vista::gateway::{AppState, create_router_with_state};
use vista::graph::{GraphProvider, InMemoryGraph, Neo4jGraph};
use vista::ingest::{BatchUploader, TravelNode, UploadConfig, load_dataset, prepare_items};
use vista::llm::{
    ChatProvider, ChatService, CompletionOptions, EchoChatProvider, GenaiChatProvider,
};
use vista::retrieval::RetrievalFilter;
use vista::vectordb::{
    InMemoryVectorStore, PineconeStore, QdrantStore, VectorSearchProvider,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "vista", version, about = "Hybrid vector + graph travel assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Interactive chat in the terminal.
    Chat,
    /// Embed a dataset and upload it to the configured vector store.
    Ingest {
        #[arg(long, env = "VISTA_DATASET_PATH")]
        dataset: PathBuf,
        #[arg(long, default_value_t = 32)]
        batch_size: usize,
    },
    /// Probe the local server's `/healthz`; exits 0 when healthy.
    HealthCheck,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::HealthCheck) = cli.command {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Chat => chat(config).await,
        Command::Ingest {
            dataset,
            batch_size,
        } => ingest(config, &dataset, batch_size).await,
        Command::HealthCheck => Ok(()),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    println!(
        r#"
██╗   ██╗██╗███████╗████████╗ █████╗
██║   ██║██║██╔════╝╚══██╔══╝██╔══██╗
██║   ██║██║███████╗   ██║   ███████║
╚██╗ ██╔╝██║╚════██║   ██║   ██╔══██║
 ╚████╔╝ ██║███████║   ██║   ██║  ██║
  ╚═══╝  ╚═╝╚══════╝   ╚═╝   ╚═╝  ╚═╝

        EMBED. RETRIEVE. TRAVEL.
"#
    );

    let addr: SocketAddr = config.socket_addr().parse()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        backend = %config.vector_backend,
        "Vista starting"
    );

    let assistant = build_assistant(&config).await?;
    let app = create_router_with_state(AppState::new(assistant));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Vista shutdown complete");
    Ok(())
}

async fn chat(config: Config) -> anyhow::Result<()> {
    let assistant = build_assistant(&config).await?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Vista travel assistant. Type 'exit' or 'quit' to leave.\n")
        .await?;

    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }
        if query.is_empty() {
            continue;
        }

        match assistant.answer(query).await {
            Ok(reply) => {
                let text = format!("\nVista [{}]: {}\n", reply.status, reply.response);
                stdout.write_all(text.as_bytes()).await?;
            }
            Err(e) => tracing::warn!(error = %e, "Query rejected"),
        }
    }

    Ok(())
}

async fn ingest(config: Config, dataset: &Path, batch_size: usize) -> anyhow::Result<()> {
    let nodes = load_dataset(dataset)?;
    let items = prepare_items(&nodes);
    tracing::info!(
        nodes = nodes.len(),
        items = items.len(),
        backend = %config.vector_backend,
        "Ingesting dataset"
    );

    if config.vector_backend == VectorBackend::Memory {
        tracing::warn!("Memory backend selected; ingested vectors are discarded on exit");
    }

    let embedder = build_embedder(&config)?;
    let store = build_vector_store(&config)?;
    let upload_config = UploadConfig {
        batch_size,
        ..UploadConfig::default()
    };

    let uploader = BatchUploader::new(embedder.provider().clone(), store, upload_config)?;
    let report = uploader.upload(&items).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.failed > 0 {
        anyhow::bail!("{} items failed to upload", report.failed);
    }
    Ok(())
}

async fn build_assistant(config: &Config) -> anyhow::Result<HybridAssistant> {
    let embedder = build_embedder(config)?;
    let vectors = build_vector_store(config)?;

    let dataset: Vec<TravelNode> = match &config.dataset_path {
        Some(path) => load_dataset(path)?,
        None => Vec::new(),
    };

    if config.vector_backend == VectorBackend::Memory {
        preload_vectors(&embedder, vectors.clone(), &dataset).await?;
    }

    let graph: Arc<dyn GraphProvider> = match &config.neo4j {
        Some(settings) => Arc::new(Neo4jGraph::new(settings.client_config())?),
        None => {
            if dataset.is_empty() {
                tracing::warn!("No NEO4J_URI or VISTA_DATASET_PATH configured, graph is empty");
            }
            Arc::new(InMemoryGraph::from_dataset(&dataset))
        }
    };

    let provider: Arc<dyn ChatProvider> = if config.mock_provider {
        tracing::warn!("VISTA_MOCK_PROVIDER set, answering with the offline echo provider");
        Arc::new(EchoChatProvider)
    } else {
        Arc::new(GenaiChatProvider::new())
    };
    let chat = ChatService::new(
        provider,
        config.chat_models.clone(),
        CompletionOptions::default(),
    )?;

    let assistant_config = AssistantConfig {
        top_k: config.top_k,
        neighbors_per_node: DEFAULT_NEIGHBORS_PER_NODE,
        filter: RetrievalFilter::new(config.score_threshold)?,
    };

    let assistant = HybridAssistant::new(embedder, vectors, graph, chat, assistant_config);
    tracing::info!(assistant = ?assistant, "Assistant ready");
    Ok(assistant)
}

fn build_embedder(config: &Config) -> anyhow::Result<CachedEmbedder> {
    let provider: Arc<dyn EmbeddingProvider> = match config.embedding.http_config() {
        Some(http) => Arc::new(HttpEmbedder::new(http)?),
        None => {
            tracing::warn!("No VISTA_EMBEDDING_URL configured, running embedder in stub mode");
            Arc::new(HashingEmbedder::new(config.embedding.dimension)?)
        }
    };

    let cache = EmbeddingCacheHandle::new(config.cache_max_size, config.embedding.dimension)?;
    Ok(CachedEmbedder::new(provider, cache)?)
}

fn build_vector_store(config: &Config) -> anyhow::Result<Arc<dyn VectorSearchProvider>> {
    let store: Arc<dyn VectorSearchProvider> = match config.vector_backend {
        VectorBackend::Pinecone => Arc::new(PineconeStore::new(config.pinecone.client_config()?)?),
        VectorBackend::Qdrant => Arc::new(QdrantStore::new(
            &config.qdrant.url,
            &config.qdrant.collection,
        )?),
        VectorBackend::Memory => Arc::new(InMemoryVectorStore::new()),
    };
    Ok(store)
}

/// Fills the in-memory store from the dataset so offline runs have vector context.
async fn preload_vectors(
    embedder: &CachedEmbedder,
    store: Arc<dyn VectorSearchProvider>,
    dataset: &[TravelNode],
) -> anyhow::Result<()> {
    if dataset.is_empty() {
        store.ensure_index(embedder.dimension()).await?;
        return Ok(());
    }

    let upload_config = UploadConfig {
        batch_pause: Duration::ZERO,
        ..UploadConfig::default()
    };
    let uploader = BatchUploader::new(embedder.provider().clone(), store, upload_config)?;
    let report = uploader
        .upload(&prepare_items(dataset))
        .await
        .context("preloading in-memory vector store")?;

    tracing::info!(upserted = report.upserted, "Preloaded in-memory vector store");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("VISTA_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    {
        Ok(client) => client,
        Err(_) => return 1,
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
