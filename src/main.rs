//! Feedstore CLI - drive the data-access layer from the command line

use clap::{Parser, Subcommand};
use feedstore::config;
use feedstore::{InsertOutcome, KindId, ResourceProvider, Store, Value, ValueMap};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "feedstore")]
#[command(version = "0.1.0")]
#[command(about = "URI-addressable data access over embedded SQLite")]
#[command(long_about = r#"
Feedstore stores tags and feed posts behind a stable public contract,
resolving tagged resources to their attached files.

Example usage:
  feedstore init
  feedstore add-tag --link http://example.com/feed --title Example
  feedstore query tags --columns id --columns title
  feedstore attachment tags 1 > icon.png
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Private directory attachment filenames resolve under
    #[arg(short, long, global = true)]
    file_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema for every resource kind
    Init,

    /// Drop and re-create every table
    Reset,

    /// Insert a tag
    AddTag {
        /// Source URI of the tag; duplicates are skipped
        #[arg(long)]
        link: String,

        /// Display title
        #[arg(long)]
        title: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Attachment filename under the file root
        #[arg(long)]
        icon: Option<String>,
    },

    /// Insert a feed post
    AddPost {
        /// Post permalink; duplicates are skipped
        #[arg(long)]
        link: String,

        /// Post title
        #[arg(long)]
        title: String,

        /// Post author
        #[arg(long)]
        author: Option<String>,

        /// Publication time as a unix timestamp
        #[arg(long)]
        pub_date: Option<i64>,

        /// Post body or summary
        #[arg(long)]
        description: Option<String>,

        /// Attachment filename under the file root
        #[arg(long)]
        icon: Option<String>,
    },

    /// Query a resource kind, printing rows as JSON
    Query {
        /// Resource kind ("tags" or "feed")
        resource: String,

        /// Public columns to project (all declared when omitted)
        #[arg(short, long)]
        columns: Vec<String>,

        /// Parameterized WHERE fragment, e.g. "title = ?1"
        #[arg(short, long)]
        r#where: Option<String>,

        /// Arguments bound to the WHERE fragment
        #[arg(short, long)]
        args: Vec<String>,

        /// Order expression over public columns, e.g. "pub_date DESC"
        #[arg(short, long)]
        order: Option<String>,

        /// Restrict to one row by primary key
        #[arg(short, long)]
        id: Option<i64>,
    },

    /// Copy a row's attachment to stdout
    Attachment {
        /// Resource kind ("tags" or "feed")
        resource: String,

        /// Row primary key
        id: i64,
    },

    /// Print the newest ingested post timestamp
    Latest,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = config::load_config(None)?.unwrap_or_default();
    let database = cli
        .database
        .or_else(|| config.database.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| config::default_database_path_in(Path::new(".")));
    let file_root = cli
        .file_root
        .or_else(|| config.file_root.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| config::default_file_root_in(Path::new(".")));

    config::ensure_db_dir(&database)?;
    let store = Store::open(&database)?;
    let provider = ResourceProvider::new(file_root)?;

    match cli.command {
        Commands::Init => {
            provider.create_schema(&store)?;
            println!("schema ready in {}", database.display());
        }

        Commands::Reset => {
            provider.drop_schema(&store)?;
            provider.create_schema(&store)?;
            println!("schema reset in {}", database.display());
        }

        Commands::AddTag { link, title, description, icon } => {
            let mut values = ValueMap::new();
            values.insert("link".to_string(), link.into());
            values.insert("title".to_string(), title.into());
            if let Some(description) = description {
                values.insert("description".to_string(), description.into());
            }
            attach_icon(&provider, KindId::Tags, &mut values, icon);
            report_insert(provider.insert(&store, KindId::Tags, &values)?, &provider, KindId::Tags);
        }

        Commands::AddPost { link, title, author, pub_date, description, icon } => {
            let mut values = ValueMap::new();
            values.insert("link".to_string(), link.into());
            values.insert("title".to_string(), title.into());
            if let Some(author) = author {
                values.insert("author".to_string(), author.into());
            }
            if let Some(pub_date) = pub_date {
                values.insert("pub_date".to_string(), pub_date.into());
            }
            if let Some(description) = description {
                values.insert("description".to_string(), description.into());
            }
            attach_icon(&provider, KindId::Feed, &mut values, icon);
            report_insert(provider.insert(&store, KindId::Feed, &values)?, &provider, KindId::Feed);
        }

        Commands::Query { resource, columns, r#where, args, order, id } => {
            let kind = parse_kind(&provider, &resource)?;
            let args: Vec<Value> = args.into_iter().map(Value::from).collect();
            let rows = provider.query(
                &store,
                kind,
                &columns,
                r#where.as_deref(),
                &args,
                order.as_deref(),
                id,
            )?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }

        Commands::Attachment { resource, id } => {
            let kind = parse_kind(&provider, &resource)?;
            let mut file = provider.open_attachment(&store, kind, id)?;
            io::copy(&mut file, &mut io::stdout())?;
        }

        Commands::Latest => match provider.latest_feed_timestamp(&store)? {
            Some(ts) => println!("{}", ts),
            None => println!("no posts ingested"),
        },
    }

    Ok(())
}

fn parse_kind(provider: &ResourceProvider, resource: &str) -> anyhow::Result<KindId> {
    provider
        .kind_for_path(resource)
        .ok_or_else(|| anyhow::anyhow!("unknown resource kind: {}", resource))
}

fn attach_icon(
    provider: &ResourceProvider,
    kind: KindId,
    values: &mut ValueMap,
    icon: Option<String>,
) {
    if let (Some(icon), Some(column)) = (icon, provider.attachment_column(kind)) {
        values.insert(column.to_string(), icon.into());
    }
}

fn report_insert(outcome: InsertOutcome, provider: &ResourceProvider, kind: KindId) {
    match outcome {
        InsertOutcome::Inserted(pk) => {
            println!("inserted {}", provider.item_uri(kind, pk));
        }
        InsertOutcome::Skipped => {
            println!("already present, skipped");
        }
    }
}
