//! Inspect cursor tokens and preview paged `find` commands.
//!
//! ```text
//! mik-paging encode --field created_at --value 4
//! mik-paging decode FQAAABBjcmVhdGVkX2F0AAQAAAAA
//! mik-paging explain --collection users --sort -created_at --limit 20 --cursor <TOKEN>
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bson::{Bson, Document};
use clap::{Parser, Subcommand};
use mik_paging::{BsonCursorCodec, CursorCodec, CursorValue, PagingConfig, QueryBuilder};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Keyset pagination cursor tool")]
struct Cli {
    /// TOML file with paging settings (overrides environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Build a cursor token from a field and a JSON value
    Encode {
        #[arg(long)]
        field: String,
        /// Extended JSON, e.g. `4`, `"abc"`, `{"$date":"2024-01-15T10:00:00Z"}`
        #[arg(long)]
        value: String,
    },
    /// Print the field and value inside a cursor token
    Decode { token: String },
    /// Print the find command a query would send
    Explain {
        #[arg(long)]
        collection: String,
        #[arg(long, default_value = "-_id", allow_hyphen_values = true)]
        sort: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Filter as Extended JSON
        #[arg(long)]
        filter: Option<String>,
        /// Projection as Extended JSON
        #[arg(long)]
        select: Option<String>,
        #[arg(long)]
        cursor: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let codec = BsonCursorCodec::from_config(&config);

    match cli.cmd {
        Cmd::Encode { field, value } => {
            let value = parse_bson(&value).context("invalid --value")?;
            let token = codec.encode(&CursorValue::new(field, value))?;
            println!("{token}");
        },
        Cmd::Decode { token } => {
            let cursor = codec.decode(&token)?;
            let json = Bson::Document(cursor.into_document()).into_relaxed_extjson();
            println!("{}", serde_json::to_string_pretty(&json)?);
        },
        Cmd::Explain {
            collection,
            sort,
            limit,
            filter,
            select,
            cursor,
        } => {
            let mut query = QueryBuilder::with_config(collection, &config)
                .sort(&sort)
                .limit(limit)
                .cursor(cursor);
            if let Some(filter) = filter {
                query = query.find(parse_document(&filter).context("invalid --filter")?);
            }
            if let Some(select) = select {
                query = query.select(parse_document(&select).context("invalid --select")?);
            }
            // Surface decode errors as a failing exit code
            query.build()?;
            println!("{}", query.explain());
        },
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<PagingConfig> {
    let Some(path) = path else {
        return Ok(PagingConfig::from_env());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: PagingConfig =
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(path = %path.display(), max_cursor_bytes = config.max_cursor_bytes, "loaded config");
    Ok(config)
}

fn parse_bson(input: &str) -> Result<Bson> {
    let json: serde_json::Value = serde_json::from_str(input)?;
    Ok(Bson::try_from(json)?)
}

fn parse_document(input: &str) -> Result<Document> {
    match parse_bson(input)? {
        Bson::Document(doc) => Ok(doc),
        other => bail!("expected a JSON object, got {:?}", other.element_type()),
    }
}
