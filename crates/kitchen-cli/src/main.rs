//! `kitchen`: command-line access to a Kitchen backend.
//!
//! The session (tokens and active restaurant) is kept in a JSON file so
//! that `kitchen login` once is enough for later commands. Every command
//! prints the backend's answer as pretty JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use kitchen_models::{
    ExportMode, ForecastScope, ImportKind, LoginPayload, MenuItemFilter, PurchaseExport,
    RegisterPayload,
};
use kitchen_sdk::{ClientConfig, FileStore, KitchenClient, SdkError, Session};
use serde::Serialize;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "kitchen")]
#[command(author, version, about = "Kitchen restaurant-management CLI", long_about = None)]
struct Cli {
    /// Backend origin (e.g. https://api.example.com)
    #[arg(long, global = true, env = "KITCHEN_API_URL")]
    api_url: Option<String>,

    /// Session file; defaults to <config dir>/kitchen/session.json
    #[arg(long, global = true, env = "KITCHEN_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account (and a restaurant when --restaurant-name is given)
    Register(RegisterArgs),
    /// Sign in and store the session
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Me,
    /// Inventory items and stock movements
    #[command(subcommand)]
    Inventory(InventoryCommand),
    /// Menu categories and items
    #[command(subcommand)]
    Menu(MenuCommand),
    /// Sales and daily summaries
    #[command(subcommand)]
    Sales(SalesCommand),
    /// Demand forecasts and ingredient plans
    #[command(subcommand)]
    Forecast(ForecastCommand),
    /// Purchase invoices and CSV export
    #[command(subcommand)]
    Purchases(PurchasesCommand),
    /// Restaurant staff
    #[command(subcommand)]
    Team(TeamCommand),
    /// Import a CSV file
    Import(ImportArgs),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "KITCHEN_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    /// Create a restaurant with this name and become its owner
    #[arg(long)]
    restaurant_name: Option<String>,
    #[arg(long)]
    restaurant_slug: Option<String>,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "KITCHEN_PASSWORD", hide_env_values = true)]
    password: String,
    /// Restaurant slug, when the same e-mail exists in several restaurants
    #[arg(long)]
    restaurant: Option<String>,
}

#[derive(Subcommand, Debug)]
enum InventoryCommand {
    /// All items
    List,
    /// Items at or below their reorder level
    LowStock,
    /// Movements of one item
    Movements {
        /// Item id
        item: i64,
    },
}

#[derive(Subcommand, Debug)]
enum MenuCommand {
    /// Active categories
    Categories,
    /// Available items
    Items {
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SalesCommand {
    /// Recent sales
    List,
    /// Count and revenue per day
    Summary {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[derive(Subcommand, Debug)]
enum ForecastCommand {
    /// Predicted demand per menu item
    Demand {
        #[arg(long, default_value_t = 7)]
        horizon: u32,
        #[arg(long, default_value_t = 50)]
        top: u32,
    },
    /// Ingredient requirements (tomorrow | next7)
    Ingredients {
        #[arg(long, default_value = "tomorrow")]
        scope: ForecastScope,
        #[arg(long)]
        horizon: Option<u32>,
        #[arg(long, default_value_t = 50)]
        top: u32,
    },
}

#[derive(Subcommand, Debug)]
enum PurchasesCommand {
    /// Purchase invoices, newest first
    List,
    /// Export purchases as CSV
    Export {
        /// First day (YYYY-MM-DD); defaults to 30 days ago
        #[arg(long)]
        from: Option<String>,
        /// Last day (YYYY-MM-DD); defaults to today
        #[arg(long)]
        to: Option<String>,
        /// invoices | lines
        #[arg(long, default_value = "invoices")]
        mode: ExportMode,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TeamCommand {
    /// Members of the active restaurant
    List,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// categories | menu_items | ingredients | recipes
    kind: ImportKind,
    /// CSV file to upload
    file: PathBuf,
    /// Validate only; write nothing
    #[arg(long)]
    dry_run: bool,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let client = build_client(cli.api_url, cli.session_file)?;

    if let Err(err) = run(&client, cli.command).await {
        if err
            .downcast_ref::<SdkError>()
            .is_some_and(SdkError::is_unauthorized)
        {
            eprintln!("Not signed in or session expired. Please log in: kitchen login --email <email>");
        }
        return Err(err);
    }
    Ok(())
}

fn build_client(
    api_url: Option<String>,
    session_file: Option<PathBuf>,
) -> anyhow::Result<KitchenClient> {
    let env_config = ClientConfig::from_env();
    let config = match api_url {
        Some(url) => ClientConfig {
            timeout: env_config.timeout,
            ..ClientConfig::new(url)
        },
        None => env_config,
    };

    let path = session_file
        .or_else(FileStore::default_path)
        .context("no config directory on this platform; pass --session-file")?;
    debug!(base_url = %config.base_url, session = %path.display(), "client configured");

    let session = Session::new(Arc::new(FileStore::new(path)));
    Ok(KitchenClient::new(config, session)?)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(client: &KitchenClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Register(args) => {
            let payload = RegisterPayload {
                username: args.username,
                email: args.email,
                password2: args.password.clone(),
                password: args.password,
                first_name: args.first_name,
                last_name: args.last_name,
                restaurant_name: args.restaurant_name,
                restaurant_slug: args.restaurant_slug,
            };
            print_json(&client.register(&payload).await?)
        }
        Command::Login(args) => {
            let payload = LoginPayload {
                email: args.email,
                password: args.password,
                restaurant_slug: args.restaurant,
            };
            client.login(&payload).await?;
            print_json(&client.me().await?)
        }
        Command::Logout => {
            client.logout()?;
            eprintln!("Signed out.");
            Ok(())
        }
        Command::Me => print_json(&client.me().await?),
        Command::Inventory(command) => match command {
            InventoryCommand::List => print_json(&client.list_inventory_items().await?),
            InventoryCommand::LowStock => print_json(&client.low_stock_items().await?),
            InventoryCommand::Movements { item } => {
                print_json(&client.list_movements(item).await?)
            }
        },
        Command::Menu(command) => match command {
            MenuCommand::Categories => print_json(&client.list_categories().await?),
            MenuCommand::Items { category, search } => {
                let filter = MenuItemFilter { category, search };
                print_json(&client.list_menu_items(&filter).await?)
            }
        },
        Command::Sales(command) => match command {
            SalesCommand::List => print_json(&client.list_sales().await?),
            SalesCommand::Summary { days } => print_json(&client.sales_summary(days).await?),
        },
        Command::Forecast(command) => match command {
            ForecastCommand::Demand { horizon, top } => {
                print_json(&client.demand_forecast(horizon, top).await?)
            }
            ForecastCommand::Ingredients {
                scope,
                horizon,
                top,
            } => print_json(&client.ingredient_plan(scope, horizon, top).await?),
        },
        Command::Purchases(command) => match command {
            PurchasesCommand::List => print_json(&client.list_purchase_invoices().await?),
            PurchasesCommand::Export {
                from,
                to,
                mode,
                output,
            } => {
                let today = Utc::now().date_naive();
                let export = PurchaseExport {
                    from: from.unwrap_or_else(|| (today - Duration::days(30)).to_string()),
                    to: to.unwrap_or_else(|| today.to_string()),
                    mode,
                };
                let csv = client.export_purchases_csv(&export).await?;
                match output {
                    Some(path) => {
                        std::fs::write(&path, &csv)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        eprintln!("Wrote {} bytes to {}", csv.len(), path.display());
                    }
                    None => print!("{}", String::from_utf8_lossy(&csv)),
                }
                Ok(())
            }
        },
        Command::Team(TeamCommand::List) => print_json(&client.list_team_members().await?),
        Command::Import(args) => {
            let bytes = std::fs::read(&args.file)
                .with_context(|| format!("failed to read {}", args.file.display()))?;
            let file_name = args
                .file
                .file_name()
                .map_or_else(|| "upload.csv".to_string(), |n| n.to_string_lossy().into_owned());
            let report = client
                .import_csv(args.kind, &file_name, bytes, args.dry_run)
                .await?;
            print_json(&report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_import_kind_and_flags() {
        let cli = Cli::try_parse_from([
            "kitchen",
            "--session-file",
            "/tmp/s.json",
            "import",
            "menu_items",
            "items.csv",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.kind, ImportKind::MenuItems);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_forecast_scope() {
        let cli = Cli::try_parse_from(["kitchen", "forecast", "ingredients", "--scope", "next7"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Forecast(ForecastCommand::Ingredients {
                scope: ForecastScope::Next7,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn login_then_inventory_against_mock() {
        let mock = mock_kitchen::MockKitchen::new();
        let (addr, _server) = mock_kitchen::spawn(mock.clone()).await.unwrap();
        let path = std::env::temp_dir()
            .join(format!("kitchen-cli-{}", std::process::id()))
            .join("session.json");

        let client = build_client(Some(format!("http://{addr}")), Some(path.clone())).unwrap();
        let login = Command::Login(LoginArgs {
            email: mock_kitchen::DEMO_EMAIL.into(),
            password: mock_kitchen::DEMO_PASSWORD.into(),
            restaurant: None,
        });
        run(&client, login).await.unwrap();

        let reopened = build_client(Some(format!("http://{addr}")), Some(path.clone())).unwrap();
        run(&reopened, Command::Inventory(InventoryCommand::LowStock))
            .await
            .unwrap();
        assert_eq!(mock.hits("/api/inventory/items/low_stock/"), 1);

        run(&reopened, Command::Logout).await.unwrap();
        let err = run(&reopened, Command::Me).await.unwrap_err();
        assert!(err.downcast_ref::<SdkError>().unwrap().is_unauthorized());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
