use chrono::NaiveDate;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use ksis_lib::api::BulkKind;

#[derive(Parser, Debug)]
#[command(name = "ksis", version, about = "Browse and manage KSIS dashboard boards")]
pub struct Cli {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the backend lives and who is asking. Read from the environment
/// (or `.env`) unless given on the command line.
#[derive(Args, Debug)]
pub struct BackendArgs {
    /// Backend base URL
    #[arg(long, env = "KSIS_URL", global = true)]
    pub url: Option<String>,

    /// Access token (JWT)
    #[arg(long, env = "KSIS_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Session socket base URL
    #[arg(long, env = "KSIS_WS_URL", global = true)]
    pub ws_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the signed-in user
    Whoami,

    /// List the boards available to the signed-in user
    Boards,

    /// Fetch one page of a board
    List(ListArgs),

    /// Apply a bulk action to rows of a board
    Bulk(BulkArgs),

    /// Wait until the session is ended elsewhere
    Watch {
        /// Give up after this many consecutive reconnect failures
        #[arg(long, default_value_t = 5)]
        max_retries: u32,
    },
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Board name (see `ksis boards`)
    pub board: String,

    /// Search term
    #[arg(long, short)]
    pub search: Option<String>,

    /// Search category key; defaults to the board's first category
    #[arg(long, short)]
    pub category: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Page number, 1-based
    #[arg(long, short, default_value_t = 1)]
    pub page: u32,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args, Debug)]
pub struct BulkArgs {
    /// Action to apply
    #[arg(value_enum)]
    pub action: Action,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Row ids; all rows of the page when omitted
    #[arg(long = "id", num_args = 1..)]
    pub ids: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Action {
    Delete,
    Activate,
    Deactivate,
}

impl From<Action> for BulkKind {
    fn from(action: Action) -> Self {
        match action {
            Action::Delete => BulkKind::Delete,
            Action::Activate => BulkKind::Activate,
            Action::Deactivate => BulkKind::Deactivate,
        }
    }
}
