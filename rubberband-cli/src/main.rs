use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rubberband::{Client, ClientConfig, Query, RequestOptions};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rubberband")]
#[command(about = "Elasticsearch client - index, fetch and search documents")]
#[command(version)]
struct Cli {
    /// Elasticsearch URL
    #[arg(long, global = true, env = "ELASTICSEARCH_URL")]
    url: Option<String>,

    /// Default index
    #[arg(short, long, global = true)]
    index: Option<String>,

    /// Default document type
    #[arg(short = 't', long = "type", global = true)]
    doc_type: Option<String>,

    /// TOML client configuration; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// A query argument: Lucene syntax, or Query DSL JSON with `--dsl`
#[derive(Args, Debug)]
struct QueryArgs {
    /// Query string, or a JSON body when --dsl is set
    query: String,

    /// Treat the query as Query DSL JSON
    #[arg(long)]
    dsl: bool,
}

impl QueryArgs {
    fn into_query(self) -> Result<Query> {
        if self.dsl {
            let value: Value =
                serde_json::from_str(&self.query).context("Query is not valid JSON")?;
            Ok(Query::Dsl(value))
        } else {
            Ok(Query::QueryString(self.query))
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index a JSON document
    Index {
        /// Document body as a JSON object
        document: String,

        /// Document id; the server assigns one if omitted
        #[arg(long)]
        id: Option<String>,

        /// Make the document searchable immediately
        #[arg(long)]
        refresh: bool,
    },

    /// Fetch a document by id
    Get { id: String },

    /// Delete a document by id
    Delete {
        id: String,

        #[arg(long)]
        refresh: bool,
    },

    /// Search and print the hits
    Search {
        #[command(flatten)]
        query: QueryArgs,

        /// Maximum number of hits, sent as the `size` URL parameter
        #[arg(long)]
        size: Option<usize>,

        /// Print only the matching ids
        #[arg(long)]
        ids_only: bool,
    },

    /// Count matching documents
    Count {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Delete every matching document
    DeleteByQuery {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Fetch several documents by id
    Mget {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Refresh the index (or every index when none is set)
    Refresh,

    /// Show cluster health
    Health,

    /// List the HTTP addresses of all nodes
    Nodes,
}

fn client_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(index) = &cli.index {
        config.index = Some(index.clone());
    }
    if let Some(doc_type) = &cli.doc_type {
        config.doc_type = Some(doc_type.clone());
    }
    Ok(config)
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,rubberband=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = client_config(&cli)?;
    tracing::debug!("Connecting to {}", config.url);
    let client = Client::new(config)?;

    match cli.command {
        Commands::Index {
            document,
            id,
            refresh,
        } => {
            let document: Value =
                serde_json::from_str(&document).context("Document is not valid JSON")?;
            let resp = client
                .index(&document, id.as_deref(), RequestOptions::new().refresh(refresh))
                .await?;
            print(&resp)?;
        }
        Commands::Get { id } => match client.get(&id, RequestOptions::new()).await? {
            Some(hit) => print(&hit)?,
            None => anyhow::bail!("Document {} not found", id),
        },
        Commands::Delete { id, refresh } => {
            let found = client
                .delete(&id, RequestOptions::new().refresh(refresh))
                .await?;
            print(&json!({ "id": id, "found": found }))?;
        }
        Commands::Search {
            query,
            size,
            ids_only,
        } => {
            let mut opts = RequestOptions::new();
            if let Some(size) = size {
                opts = opts.size(size);
            }
            let query = query.into_query()?;
            if ids_only {
                print(&client.search_ids(query, opts).await?)?;
            } else {
                let hits = client.search(query, opts).await?;
                print(&json!({
                    "total": hits.total,
                    "max_score": hits.max_score,
                    "took": hits.took,
                    "hits": hits.hits,
                }))?;
            }
        }
        Commands::Count { query } => {
            let count = client.count(query.into_query()?, RequestOptions::new()).await?;
            print(&json!({ "count": count }))?;
        }
        Commands::DeleteByQuery { query } => {
            let resp = client
                .delete_by_query(query.into_query()?, RequestOptions::new())
                .await?;
            print(&resp)?;
        }
        Commands::Mget { ids } => {
            let hits = client.multi_get(ids, RequestOptions::new()).await?;
            print(&hits)?;
        }
        Commands::Refresh => {
            client.refresh(RequestOptions::new()).await?;
            tracing::info!("Refreshed");
        }
        Commands::Health => print(&client.cluster_health().await?)?,
        Commands::Nodes => print(&client.all_nodes().await?)?,
    }

    Ok(())
}
