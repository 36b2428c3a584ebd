//! Argument parsing and command dispatch.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sellerdesk_config::validate::{parse_api_url, parse_timeout};
use sellerdesk_config::{ClientConfig, ConfigError};
use sellerdesk_selection::{MatchFilter, SortKey};
use sellerdesk_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, init_logging};
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::auth::{handle_login, handle_logout, handle_signup, handle_status};
use crate::commands::markets::{
    handle_market_add, handle_market_delete, handle_market_list, handle_market_reverse,
    handle_market_update,
};
use crate::commands::products::{
    handle_collected, handle_export, handle_match_batch, handle_match_image, handle_search,
    handle_seo,
};

/// Parses CLI arguments, executes the requested command and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let trace_id = Uuid::new_v4().to_string();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    let logging = LoggingConfig {
        level: &config.log_level,
        format: LogFormat::from(config.log_format),
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }
    let _context = GlobalContextGuard::new(cli.command.label(), &trace_id);

    let result = match AppContext::new(&config, cli.output) {
        Ok(ctx) => dispatch(&ctx, cli.command).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

pub(crate) async fn dispatch(ctx: &AppContext, command: Command) -> CliResult<()> {
    match command {
        Command::Login(args) => handle_login(ctx, args).await,
        Command::Signup(args) => handle_signup(ctx, args).await,
        Command::Logout => handle_logout(ctx),
        Command::Status => handle_status(ctx).await,
        Command::Search(args) => handle_search(ctx, args).await,
        Command::Collected(args) => handle_collected(ctx, args).await,
        Command::Match(matching) => match matching {
            MatchCommand::Batch(args) => handle_match_batch(ctx, args).await,
            MatchCommand::Image(args) => handle_match_image(ctx, args).await,
        },
        Command::Seo(args) => handle_seo(ctx, args).await,
        Command::Export(args) => handle_export(ctx, args).await,
        Command::Market(market) => match market {
            MarketCommand::List => handle_market_list(ctx).await,
            MarketCommand::Add(args) => handle_market_add(ctx, args).await,
            MarketCommand::Update(args) => handle_market_update(ctx, args).await,
            MarketCommand::Delete(args) => handle_market_delete(ctx, args).await,
            MarketCommand::Reverse(args) => handle_market_reverse(ctx, args).await,
        },
    }
}

fn parse_url_arg(value: &str) -> Result<Url, ConfigError> {
    parse_api_url("--api-url", value)
}

fn parse_timeout_arg(value: &str) -> Result<Duration, ConfigError> {
    parse_timeout("--timeout", value)
}

#[derive(Parser)]
#[command(
    name = "sellerdesk",
    about = "Sourcing dashboard client for the Sellerdesk API"
)]
pub(crate) struct Cli {
    #[arg(long, global = true, value_parser = parse_url_arg)]
    pub(crate) api_url: Option<Url>,
    #[arg(
        long,
        global = true,
        value_parser = parse_timeout_arg,
        help = "Per-request timeout in seconds"
    )]
    pub(crate) timeout: Option<Duration>,
    #[arg(long, global = true, help = "Location of the stored session file")]
    pub(crate) session_path: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub(crate) fn resolve_config(&self) -> CliResult<ClientConfig> {
        let config = ClientConfig::from_env().map_err(|err| CliError::validation(err.to_string()))?;
        Ok(self.apply_overrides(config))
    }

    pub(crate) fn apply_overrides(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(path) = &self.session_path {
            config.session_path = path.clone();
        }
        config
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Log in and store the session.
    Login(LoginArgs),
    /// Register a new account.
    Signup(SignupArgs),
    /// Forget the stored session.
    Logout,
    /// Validate the stored session and show who is logged in.
    Status,
    /// Keyword search, optionally collecting picked results.
    Search(SearchArgs),
    /// List collected products.
    Collected(CollectedArgs),
    #[command(subcommand)]
    Match(MatchCommand),
    /// Generate an SEO title for a collected product.
    Seo(SeoArgs),
    /// Download the spreadsheet export for picked products.
    Export(ExportArgs),
    #[command(subcommand)]
    Market(MarketCommand),
}

impl Command {
    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Signup(_) => "signup",
            Self::Logout => "logout",
            Self::Status => "status",
            Self::Search(_) => "search",
            Self::Collected(_) => "collected",
            Self::Match(MatchCommand::Batch(_)) => "match_batch",
            Self::Match(MatchCommand::Image(_)) => "match_image",
            Self::Seo(_) => "seo",
            Self::Export(_) => "export",
            Self::Market(MarketCommand::List) => "market_list",
            Self::Market(MarketCommand::Add(_)) => "market_add",
            Self::Market(MarketCommand::Update(_)) => "market_update",
            Self::Market(MarketCommand::Delete(_)) => "market_delete",
            Self::Market(MarketCommand::Reverse(_)) => "market_reverse",
        }
    }
}

/// Supplier matching.
#[derive(Subcommand)]
pub(crate) enum MatchCommand {
    /// Match collected products by id and merge the results.
    Batch(MatchBatchArgs),
    /// Find a supplier listing for one product image.
    Image(MatchImageArgs),
}

/// Tracked markets.
#[derive(Subcommand)]
pub(crate) enum MarketCommand {
    /// List tracked markets.
    List,
    /// Start tracking a market.
    Add(MarketDraftArgs),
    /// Rename or re-point a market.
    Update(MarketUpdateArgs),
    /// Stop tracking a market.
    Delete(MarketIdArgs),
    /// Scrape a market storefront, optionally collecting picked listings.
    Reverse(MarketReverseArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, env = "SELLERDESK_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SignupArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long, env = "SELLERDESK_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    pub(crate) keyword: String,
    #[arg(long = "collect", value_name = "ID", help = "Collect these result ids")]
    pub(crate) collect: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CollectedArgs {
    #[arg(long, default_value = "all")]
    pub(crate) filter: MatchFilter,
    #[arg(long, default_value = "date")]
    pub(crate) sort: SortKey,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MatchBatchArgs {
    #[arg(required = true, value_name = "ID")]
    pub(crate) ids: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MatchImageArgs {
    pub(crate) image_url: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SeoArgs {
    pub(crate) product_id: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    #[arg(value_name = "ID")]
    pub(crate) ids: Vec<String>,
    #[arg(long, default_value = ".", help = "Target file or directory")]
    pub(crate) out: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MarketDraftArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) url: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MarketUpdateArgs {
    pub(crate) market_id: String,
    #[command(flatten)]
    pub(crate) draft: MarketDraftArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MarketIdArgs {
    pub(crate) market_id: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MarketReverseArgs {
    pub(crate) market_id: String,
    #[arg(long = "collect", value_name = "ID", help = "Collect these listing ids")]
    pub(crate) collect: Vec<String>,
}

/// Output format for structured results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_override_environment_config() {
        let cli = Cli::try_parse_from([
            "sellerdesk",
            "--api-url",
            "https://api.example.com/v2",
            "--timeout",
            "5",
            "--session-path",
            "/tmp/session.json",
            "status",
        ])
        .expect("parse");

        let config = cli.apply_overrides(ClientConfig::default());
        assert_eq!(config.api_url.as_str(), "https://api.example.com/v2");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.session_path, PathBuf::from("/tmp/session.json"));
        assert_eq!(cli.command.label(), "status");
    }

    #[test]
    fn invalid_flags_are_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["sellerdesk", "--api-url", "ftp://x", "status"]).is_err());
        assert!(Cli::try_parse_from(["sellerdesk", "--timeout", "0", "status"]).is_err());
        assert!(
            Cli::try_parse_from(["sellerdesk", "collected", "--sort", "cheapest"]).is_err()
        );
    }

    #[test]
    fn collected_flags_parse_case_insensitively() {
        let cli = Cli::try_parse_from([
            "sellerdesk",
            "--format",
            "json",
            "collected",
            "--filter",
            "Matched",
            "--sort",
            "PRICE",
        ])
        .expect("parse");
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Command::Collected(args) => {
                assert_eq!(args.filter, MatchFilter::Matched);
                assert_eq!(args.sort, SortKey::Price);
            }
            _ => panic!("expected collected command"),
        }
    }

    #[test]
    fn match_batch_requires_ids() {
        assert!(Cli::try_parse_from(["sellerdesk", "match", "batch"]).is_err());
        let cli = Cli::try_parse_from(["sellerdesk", "match", "batch", "c1", "c2"]).expect("parse");
        assert_eq!(cli.command.label(), "match_batch");
    }
}
