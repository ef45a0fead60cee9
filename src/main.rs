//! graphkit: command-line host for the GraphQL query session

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use graphkit_lib::commands::{self, GraphqlParams};
use graphkit_lib::models::CreateSavedQuery;
use graphkit_lib::session::prettify;
use graphkit_lib::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "graphkit", version, about = "Run, prettify, save and replay GraphQL queries")]
struct Args {
    /// GraphQL endpoint (overrides the stored setting)
    #[arg(long, env = "GRAPHKIT_ENDPOINT")]
    endpoint: Option<String>,

    /// Directory holding graphkit.db
    #[arg(long, env = "GRAPHKIT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a query and print its data
    Run {
        /// Query text, or @path to read it from a file
        query: String,
        #[arg(long, default_value = "")]
        variables: String,
    },
    /// Print a query in canonical formatting
    Prettify {
        /// Query text, or @path to read it from a file
        query: String,
    },
    /// List executed queries, newest first
    History,
    /// List saved queries by collection
    Collections,
    /// Save a query into a collection
    Save {
        #[arg(long)]
        collection: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "")]
        variables: String,
        /// Query text, or @path to read it from a file
        query: String,
    },
    /// Summarize the endpoint's schema
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let Args {
        endpoint,
        data_dir,
        command,
    } = Args::parse();

    match command {
        // Prettifying needs neither the database nor the endpoint
        Command::Prettify { query } => {
            println!("{}", prettify(&read_query(&query)?)?);
        }
        Command::Run { query, variables } => {
            let state = open_state(data_dir, endpoint).await?;
            let params = GraphqlParams {
                query: read_query(&query)?,
                variables,
            };
            let data = commands::execute_query(&state, params)
                .await
                .map_err(anyhow::Error::msg)?;

            if let Some(failure) = state.session().last_failure().cloned() {
                eprintln!("{}", failure.status);
                println!("{}", serde_json::to_string_pretty(&failure.response)?);
                return Ok(());
            }
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::History => {
            let state = open_state(data_dir, endpoint).await?;
            let props = commands::show_history(&state).await;
            let session = state.session();
            for item in props.history {
                let query = session
                    .history()
                    .get(item.key)
                    .map(|entry| entry.query.replace('\n', " "))
                    .unwrap_or_default();
                println!("{}  {}  {}", item.key, item.label, query);
            }
        }
        Command::Collections => {
            let state = open_state(data_dir, endpoint).await?;
            let props = commands::show_collections(&state).await;
            if props.collections.is_empty() {
                println!("Save queries to create collections.");
            }
            for (collection, queries) in props.collections {
                println!("{}", collection);
                for query in queries {
                    println!("  {}  {}", query.id, query.name);
                }
            }
        }
        Command::Save {
            collection,
            name,
            description,
            variables,
            query,
        } => {
            let state = open_state(data_dir, endpoint).await?;
            commands::edit_query(&state, read_query(&query)?);
            commands::edit_variables(&state, variables);
            commands::change_collection(&state, collection);

            match commands::save_query(&state, CreateSavedQuery { name, description }).await {
                Ok(selected) => println!("{}", selected.id.unwrap_or_default()),
                Err(errors) => bail!("{}", errors),
            }
        }
        Command::Schema => {
            let state = open_state(data_dir, endpoint).await?;
            let Some(schema) = commands::get_schema(&state) else {
                bail!("No schema available from the endpoint");
            };
            println!("query: {}", schema.query_type);
            if let Some(mutation) = &schema.mutation_type {
                println!("mutation: {}", mutation);
            }
            if let Some(subscription) = &schema.subscription_type {
                println!("subscription: {}", subscription);
            }
            println!("types: {}", schema.user_types().count());
            for field in schema.root_fields() {
                println!("  {}: {}", field.name, field.signature);
            }
        }
    }

    Ok(())
}

/// Open the database under `data_dir` (or the platform data directory) and bootstrap
async fn open_state(data_dir: Option<PathBuf>, endpoint: Option<String>) -> anyhow::Result<AppState> {
    let data_dir = match data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("No data directory available; pass --data-dir")?
            .join("graphkit"),
    };
    graphkit_lib::init(&data_dir, endpoint)
        .await
        .with_context(|| format!("Failed to open {}", data_dir.display()))
}

fn read_query(arg: &str) -> anyhow::Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path)),
        None => Ok(arg.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prettify_needs_no_data_dir() {
        let args = Args::try_parse_from(["graphkit", "prettify", "{ a }"]).unwrap();
        assert!(args.data_dir.is_none());
        let Command::Prettify { query } = args.command else {
            panic!("expected prettify");
        };
        assert_eq!(prettify(&read_query(&query).unwrap()).unwrap(), "{\n  a\n}");
    }

    #[test]
    fn query_argument_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.graphql");
        std::fs::write(&path, "{ viewer { id } }").unwrap();

        let arg = format!("@{}", path.display());
        assert_eq!(read_query(&arg).unwrap(), "{ viewer { id } }");
        assert!(read_query("@/no/such/file.graphql").is_err());
    }
}
