//! packrat - content-addressable storage CLI
//!
//! Subcommands:
//! - `packrat store <file>` / `packrat store --data <text>` - store and print the id
//! - `packrat load <id>` - write an object's payload to stdout
//! - `packrat list` - print every stored id
//! - `packrat contains <id>` - check whether an object exists
//! - `packrat delete <id>` - remove an object
//! - `packrat cache <key> <object-id>` - associate an object id with a key
//! - `packrat lookup-cache <key>` - print the cached object id for a key

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use packrat::{ActionCache, FileActionCache, FileStore, Object, ObjectId, ObjectStore, StoreConfig};

#[derive(Parser)]
#[command(name = "packrat")]
#[command(about = "Content-addressable storage and build-result cache")]
#[command(version)]
struct Cli {
    /// Path to the CAS root directory (default: ~/.packrat/cas)
    #[arg(long, global = true)]
    cas_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file (or literal text) and print its id
    Store {
        /// File to store
        file: Option<PathBuf>,

        /// Store literal text instead of a file
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,
    },

    /// Write an object's payload to stdout
    Load {
        /// Object id
        id: String,
    },

    /// List all stored object ids
    List,

    /// Check whether an object exists
    Contains {
        /// Object id
        id: String,
    },

    /// Delete an object
    Delete {
        /// Object id
        id: String,
    },

    /// Associate an object id with a key
    Cache {
        /// Cache key
        key: String,

        /// Object id to associate
        object_id: String,
    },

    /// Look up the object id cached for a key
    LookupCache {
        /// Cache key
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.cas_path {
        Some(path) => StoreConfig::with_base_path(path),
        None => StoreConfig::from_env(),
    };
    let store = FileStore::new(config.clone());
    let cache = FileActionCache::new(config);

    match cli.command {
        Commands::Store { file, data } => {
            let bytes = match (file, data) {
                (_, Some(text)) => text.into_bytes(),
                (Some(path), None) => std::fs::read(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, None) => bail!("'store' requires either a file path or --data <text>"),
            };
            let id = store.store(&Object::new(bytes)).await?;
            println!("{id}");
        }

        Commands::Load { id } => {
            let id = ObjectId::new(id);
            match store.load(&id).await? {
                Some(object) => std::io::stdout().write_all(&object.data)?,
                None => bail!("object not found: {id}"),
            }
        }

        Commands::List => {
            for id in store.list_objects().await? {
                println!("{id}");
            }
        }

        Commands::Contains { id } => {
            println!("{}", store.contains(&ObjectId::new(id)).await?);
        }

        Commands::Delete { id } => {
            let id = ObjectId::new(id);
            store.delete(&id).await?;
            println!("Deleted: {id}");
        }

        Commands::Cache { key, object_id } => {
            let key = ObjectId::new(key);
            let value = ObjectId::new(object_id);
            cache.put(&key, &value).await?;
            println!("Cached: {value} for key: {key}");
        }

        Commands::LookupCache { key } => match cache.lookup(&ObjectId::new(key)).await? {
            Some(id) => println!("{id}"),
            None => {
                println!("Not found");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
