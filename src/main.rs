// ==========================================
// 工业固废交换 - 命令行入口
// ==========================================
// 每个子命令对应一个 app::commands 函数，结果以 JSON 输出到 stdout
// 日志输出到 stderr（RUST_LOG 控制）
// ==========================================

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use symbio_exchange::api::dto::{
    FilterClauseRequest, FilterListingsRequest, FindProcessorsRequest, MatchBuyersRequest,
};
use symbio_exchange::app::{self, get_default_db_path, AppState};

#[derive(Parser)]
#[command(name = "symbio-exchange")]
#[command(about = "Industrial waste exchange matching engine", version)]
struct Cli {
    /// SQLite database path
    #[arg(long, env = "SYMBIO_EXCHANGE_DB_PATH")]
    db: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter ACTIVE offers by composition, e.g. `-f SIO2:>=:50 -f S:<:1`
    Filter {
        /// Clause as CHEMICAL:OPERATOR:THRESHOLD
        #[arg(short, long = "filter", required = true)]
        filters: Vec<String>,
    },

    /// Find buyers whose acceptance criteria a supply listing fully satisfies
    MatchBuyers {
        /// Supply (OFFER) listing id
        supply_listing_id: i64,
    },

    /// Find one- and two-hop processing routes between two chemicals
    FindProcessors {
        /// Input chemical id
        input: String,
        /// Output chemical id
        output: String,
    },

    /// List chemical master data
    Chemicals,

    /// List ACTIVE listings
    Listings {
        /// Only listings of this owner
        #[arg(long)]
        owner: Option<i64>,
    },

    /// Report storage health
    Health,

    /// Read or write global settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print all global settings
    Show,
    /// Set one global setting
    Set { key: String, value: String },
}

/// 解析 `CHEMICAL:OPERATOR:THRESHOLD`（运算符合法性交给 API 层校验）
fn parse_clause(raw: &str) -> anyhow::Result<FilterClauseRequest> {
    let parts: Vec<&str> = raw.splitn(3, ':').collect();
    if parts.len() != 3 {
        bail!("筛选条件格式应为 CHEMICAL:OPERATOR:THRESHOLD，实际: {}", raw);
    }
    let threshold: f64 = parts[2]
        .trim()
        .parse()
        .with_context(|| format!("阈值不是数值: {}", parts[2]))?;

    Ok(FilterClauseRequest {
        chemical_id: parts[0].trim().to_string(),
        operator: parts[1].trim().to_string(),
        threshold,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        symbio_exchange::logging::init_json();
    } else {
        symbio_exchange::logging::init();
    }

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!(version = symbio_exchange::VERSION, db_path = %db_path, "启动");

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let result = match cli.command {
        Command::Filter { filters } => {
            let filters = filters
                .iter()
                .map(|raw| parse_clause(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            app::filter_listings(&state, FilterListingsRequest { filters }).await
        }
        Command::MatchBuyers { supply_listing_id } => {
            app::match_buyers(
                &state,
                MatchBuyersRequest {
                    supply_listing_id: Some(supply_listing_id),
                },
            )
            .await
        }
        Command::FindProcessors { input, output } => {
            app::find_processors(
                &state,
                FindProcessorsRequest {
                    input_chemical_id: Some(input),
                    output_chemical_id: Some(output),
                },
            )
            .await
        }
        Command::Chemicals => app::list_chemicals(&state).await,
        Command::Listings { owner: Some(owner_id) } => {
            app::list_listings_by_owner(&state, owner_id).await
        }
        Command::Listings { owner: None } => app::list_active_listings(&state).await,
        Command::Health => app::health(&state).await,
        Command::Config { action: ConfigAction::Show } => app::get_config_snapshot(&state).await,
        Command::Config {
            action: ConfigAction::Set { key, value },
        } => app::set_config_value(&state, key, value).await,
    };

    match result {
        Ok(json) => {
            println!("{}", json);
            Ok(())
        }
        Err(error_json) => {
            eprintln!("{}", error_json);
            std::process::exit(1);
        }
    }
}
