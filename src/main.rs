//! s3-store command line front-end
//!
//! Thin CLI over the store facade: list buckets, upload, download,
//! delete, and mint object URLs.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use s3_store::{ObjectAcl, PutBody, S3Store, StoreConfig};

#[derive(Parser)]
#[command(name = "s3-store", version, about = "Object storage from the command line")]
struct Cli {
    /// AWS profile, overriding the stored configuration
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Endpoint URL for S3-compatible services (MinIO, R2, ...)
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Region, overriding the stored configuration
    #[arg(long, global = true)]
    region: Option<String>,

    /// Use path-style addressing (most self-hosted services)
    #[arg(long, global = true)]
    force_path_style: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List buckets
    Buckets,

    /// Upload an object and print its URL
    Put {
        bucket: String,
        key: String,

        /// Read the payload from a local file
        #[arg(long, conflicts_with = "data")]
        file: Option<PathBuf>,

        /// Inline payload
        #[arg(long)]
        data: Option<String>,

        /// Canned ACL: private, public-read, public-read-write,
        /// authenticated-read, bucket-owner-read, bucket-owner-full-control
        #[arg(long, default_value = "private")]
        acl: String,
    },

    /// Download an object to stdout or a file
    Get {
        bucket: String,
        key: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete one or more objects
    Rm {
        bucket: String,

        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Print an object URL, presigned when an expiry is given
    Url {
        bucket: String,
        key: String,

        /// Presign expiry in seconds
        #[arg(long)]
        expires_in: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = StoreConfig::load()?.with_env_overrides();
    if cli.profile.is_some() {
        config.profile = cli.profile;
    }
    if cli.endpoint_url.is_some() {
        config.endpoint_url = cli.endpoint_url;
    }
    if cli.region.is_some() {
        config.region = cli.region;
    }
    if cli.force_path_style {
        config.force_path_style = true;
    }

    let store = S3Store::connect(&config).await?;

    match cli.command {
        Command::Buckets => {
            for bucket in store.list_buckets().await? {
                match bucket.creation_date {
                    Some(created) => println!("{}\t{}", bucket.name, created.to_rfc3339()),
                    None => println!("{}", bucket.name),
                }
            }
        }

        Command::Put {
            bucket,
            key,
            file,
            data,
            acl,
        } => {
            let acl: ObjectAcl = acl.parse()?;
            let body = match (file, data) {
                (Some(path), None) => PutBody::file(path),
                (None, Some(data)) => PutBody::inline(data.into_bytes()),
                (None, None) => bail!("either --file or --data is required"),
                (Some(_), Some(_)) => unreachable!("clap rejects --file with --data"),
            };
            let url = store.put_object(acl, &bucket, &key, body).await?;
            println!("{url}");
        }

        Command::Get {
            bucket,
            key,
            output,
        } => {
            let bytes = store.get_object(&bucket, &key).await?;
            match output {
                Some(path) => fs_write(&path, &bytes)?,
                None => std::io::stdout().write_all(&bytes)?,
            }
        }

        Command::Rm { bucket, keys } => {
            if let [key] = keys.as_slice() {
                store.delete_object(&bucket, key).await?;
            } else {
                let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
                let failures = store.delete_objects(&bucket, &refs).await?;
                for failure in &failures {
                    eprintln!(
                        "failed to delete {}: {}",
                        failure.key,
                        failure.message.as_deref().unwrap_or("unknown error")
                    );
                }
                if !failures.is_empty() {
                    bail!("{} of {} keys not deleted", failures.len(), keys.len());
                }
            }
        }

        Command::Url {
            bucket,
            key,
            expires_in,
        } => {
            let expires = expires_in.map(Duration::from_secs);
            let url = store.get_object_url(&bucket, &key, expires).await?;
            println!("{url}");
        }
    }

    Ok(())
}

fn fs_write(path: &PathBuf, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
