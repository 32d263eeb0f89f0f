//! pairscope CLI - Pairs-trading spread analytics over tick data.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use pairscope_lib::{
    DEFAULT_BIND, DEFAULT_CORS_ORIGIN, DEFAULT_PORT, DEFAULT_SNAPSHOT_LIMIT, DEFAULT_STREAM_URL,
    DEFAULT_WINDOW, Interval, RegressionType, ServerConfig, StoreConfig, StreamConfig,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "pairscope")]
#[command(about = "Pairs-trading spread analytics over tick data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Tick database path. Defaults to the user data directory.
    #[arg(long, env = "PAIRSCOPE_DB", global = true)]
    db: Option<PathBuf>,

    /// Number of most recent ticks read per analysis
    #[arg(long, default_value_t = DEFAULT_SNAPSHOT_LIMIT, global = true)]
    limit: usize,
}

/// Parameters shared by `analyze` and `export`.
#[derive(Args)]
struct PairArgs {
    /// Bucketing interval (e.g. 1min, 1T, 15s, 4h)
    #[arg(short, long, default_value = "1min")]
    interval: Interval,

    /// Rolling window length in bars
    #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// Hedge regression (OLS_I or OLS_NOI)
    #[arg(short, long, default_value = "OLS_I")]
    regression: RegressionType,
}

#[derive(Args)]
struct StreamArgs {
    /// Symbols to subscribe to (comma separated)
    #[arg(long, value_delimiter = ',', default_value = "btcusdt,ethusdt")]
    symbols: Vec<String>,

    /// Combined-stream endpoint
    #[arg(long, default_value = DEFAULT_STREAM_URL)]
    url: String,
}

impl StreamArgs {
    fn config(self) -> StreamConfig {
        StreamConfig::default()
            .with_base_url(self.url)
            .with_symbols(self.symbols)
    }
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "PAIRSCOPE_BIND", default_value = DEFAULT_BIND)]
    bind: String,

    /// Port to bind
    #[arg(short, long, env = "PAIRSCOPE_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Allowed CORS origins (comma separated, `*` for any)
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_CORS_ORIGIN)]
    cors_origin: Vec<String>,
}

impl ServeArgs {
    fn config(self) -> ServerConfig {
        ServerConfig::default()
            .with_bind(self.bind)
            .with_port(self.port)
            .with_cors_origins(self.cors_origin)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List symbols in the current snapshot
    Symbols,

    /// Compute spread analytics for a pair
    Analyze {
        /// First symbol. Prompted for when omitted.
        s1: Option<String>,

        /// Second symbol. Prompted for when omitted.
        s2: Option<String>,

        #[command(flatten)]
        pair: PairArgs,

        /// Run the stationarity (ADF) test on the spread
        #[arg(long)]
        adf: bool,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the annotated table for a pair (ADF always computed)
    Export {
        /// First symbol
        s1: String,

        /// Second symbol
        s2: String,

        #[command(flatten)]
        pair: PairArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file path. Defaults to analytics_export_<s1><s2><interval>.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Bulk load ticks from a CSV file
    Load {
        /// CSV file with timestamp, symbol, price and qty columns
        file: PathBuf,
    },

    /// Ingest live trades into the store
    Stream(StreamArgs),

    /// Serve the HTTP API
    Serve(ServeArgs),

    /// Ingest live trades and serve the HTTP API in one process
    Run {
        #[command(flatten)]
        stream: StreamArgs,

        #[command(flatten)]
        serve: ServeArgs,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let store = cli
        .db
        .map_or_else(StoreConfig::default, StoreConfig::new)
        .with_snapshot_limit(cli.limit);

    match command {
        Commands::Symbols => commands::symbols::list_symbols(&store),
        Commands::Analyze {
            s1,
            s2,
            pair,
            adf,
            json,
        } => commands::analyze::analyze(
            &store,
            s1,
            s2,
            pair.interval,
            pair.window,
            pair.regression,
            adf,
            json,
        ),
        Commands::Export {
            s1,
            s2,
            pair,
            format,
            output,
        } => commands::export::export(
            &store,
            &s1,
            &s2,
            pair.interval,
            pair.window,
            pair.regression,
            format,
            output,
            cli.quiet,
        ),
        Commands::Load { file } => commands::load::load(&store, &file, cli.quiet).await,
        Commands::Stream(args) => commands::stream::stream(&store, &args.config()).await,
        Commands::Serve(args) => commands::serve::serve(&store, &args.config()).await,
        Commands::Run { stream, serve } => {
            commands::run::run(&store, &stream.config(), &serve.config()).await
        }
    }
}
