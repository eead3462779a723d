use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context as _;
use anyhow::Result;
use anyhow::anyhow;
use anyhow::bail;
use ksis_lib::Board;
use ksis_lib::KsisClient;
use ksis_lib::api::BulkKind;
use ksis_lib::auth::AccessToken;
use ksis_lib::auth::StaticTokenProvider;
use ksis_lib::auth::UserContext;
use ksis_lib::boards;
use ksis_lib::boards::BoardSpec;
use ksis_lib::model::AccessLog;
use ksis_lib::model::Account;
use ksis_lib::model::ApiKey;
use ksis_lib::model::Device;
use ksis_lib::model::Keyed;
use ksis_lib::model::MediaFile;
use ksis_lib::model::Notice;
use ksis_lib::model::Resolution;
use ksis_lib::socket::ReconnectPolicy;
use ksis_lib::socket::ResilientSocket;
use ksis_lib::socket::SessionMessage;
use ksis_lib::socket::session_url;
use ksis_lib::socket::watch_session;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::cli::BackendArgs;
use crate::cli::BulkArgs;
use crate::cli::QueryArgs;
use crate::output::print_json;

/// An authenticated client and the user it acts for.
pub struct Session {
    pub client: KsisClient,
    pub user: UserContext,
    ws_url: Option<String>,
}

impl Session {
    pub async fn open(args: &BackendArgs) -> Result<Self> {
        let url = args
            .url
            .clone()
            .context("no backend URL: set KSIS_URL or pass --url")?;
        let token = args
            .token
            .clone()
            .context("no access token: set KSIS_TOKEN or pass --token")?;

        let token = AccessToken::from_jwt(token).context("access token is not a valid JWT")?;
        if token.is_expired() {
            bail!("access token has expired");
        }

        let client = KsisClient::builder()
            .url(url)
            .token_provider(StaticTokenProvider::from_token(token))
            .timeout(Duration::from_secs(args.timeout))
            .build()?;
        let user = client.user_context().await?;
        log::info!("signed in as {}", user.account_id);

        Ok(Self {
            client,
            user,
            ws_url: args.ws_url.clone(),
        })
    }
}

pub fn whoami(session: &Session) -> Result<()> {
    let user = &session.user;
    print_json(&json!({
        "accountId": user.account_id,
        "roles": user.roles,
        "admin": user.is_admin(),
        "expiresAt": user.expires_at.map(|at| at.to_rfc3339()),
    }))
}

pub fn list_boards(session: &Session) -> Result<()> {
    for spec in boards::ALL.iter().filter(|b| b.is_visible_to(&session.user)) {
        let categories: Vec<_> = spec
            .visible_categories(&session.user)
            .iter()
            .map(|c| {
                json!({
                    "key": c.key,
                    "label": c.label,
                    "dateRequired": c.date_required,
                })
            })
            .collect();
        let actions: Vec<_> = spec.actions.iter().map(|a| a.kind.label()).collect();

        print_json(&json!({
            "name": spec.name,
            "endpoint": spec.endpoint,
            "pageSize": spec.page_size,
            "categories": categories,
            "actions": actions,
        }))?;
    }
    Ok(())
}

/// A command that works on one board.
pub enum BoardCommand<'a> {
    List(&'a QueryArgs),
    Bulk(&'a BulkArgs),
}

impl BoardCommand<'_> {
    fn query(&self) -> &QueryArgs {
        match self {
            BoardCommand::List(query) => query,
            BoardCommand::Bulk(args) => &args.query,
        }
    }
}

/// Looks the board up and runs `command` with the board's row type.
pub async fn on_board(session: &Session, command: BoardCommand<'_>) -> Result<()> {
    let name = &command.query().board;
    let spec = boards::find(name).with_context(|| format!("unknown board '{name}', see `ksis boards`"))?;
    if !spec.is_visible_to(&session.user) {
        bail!("board '{name}' is for administrators only");
    }

    match spec.name {
        "accounts" => run::<Account>(session, spec, command).await,
        "pcs" | "signages" => run::<Device>(session, spec, command).await,
        "resolutions" => run::<Resolution>(session, spec, command).await,
        "access-logs" => run::<AccessLog>(session, spec, command).await,
        "notices" => run::<Notice>(session, spec, command).await,
        "media" => run::<MediaFile>(session, spec, command).await,
        "api-keys" => run::<ApiKey>(session, spec, command).await,
        other => bail!("board '{other}' has no row type"),
    }
}

async fn run<T>(session: &Session, spec: &BoardSpec, command: BoardCommand<'_>) -> Result<()>
where
    T: Keyed + DeserializeOwned + Serialize + Clone + Send + Sync + 'static,
    T::Id: FromStr,
    <T::Id as FromStr>::Err: Display,
{
    let mut board = open::<T>(session, spec, command.query()).await?;

    match command {
        BoardCommand::List(_) => print_page(&board),
        BoardCommand::Bulk(args) => {
            if args.ids.is_empty() {
                board.select_all_visible();
            }
            for raw in &args.ids {
                let id = raw
                    .parse::<T::Id>()
                    .map_err(|e| anyhow!("invalid id '{raw}': {e}"))?;
                board.toggle(id);
            }

            let kind = BulkKind::from(args.action);
            let confirmed = board.bulk(kind).await?;
            print_json(&json!({
                "action": kind.label(),
                "confirmed": confirmed.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }))
        }
    }
}

async fn open<T>(session: &Session, spec: &BoardSpec, query: &QueryArgs) -> Result<Board<T>>
where
    T: Keyed + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let mut board = Board::http(*spec, session.client.clone(), &session.user);

    let controller = board.controller_mut();
    if let Some(category) = &query.category {
        controller.set_search_category(category.clone());
    }
    if query.from.is_some() || query.to.is_some() {
        controller.set_date_range(query.from, query.to);
    }
    if let Some(term) = &query.search {
        controller.set_search_term(term.clone());
    }
    controller.set_page_number(query.page);

    board.refresh().await?;
    Ok(board)
}

fn print_page<T>(board: &Board<T>) -> Result<()>
where
    T: Keyed + Serialize + Clone + Send + Sync + 'static,
{
    let page = board.visible_page().unwrap_or_default();
    let pagination = board.pagination();

    print_json(&json!({
        "board": board.spec().name,
        "page": pagination.current(),
        "totalPages": pagination.total_pages(),
        "pages": pagination.pages().collect::<Vec<_>>(),
        "items": page.items(),
    }))
}

pub async fn watch(session: &Session, max_retries: u32) -> Result<()> {
    let base = session
        .ws_url
        .as_deref()
        .context("no socket URL: set KSIS_WS_URL or pass --ws-url")?;
    let socket = ResilientSocket::new(session_url(base, &session.user.account_id))
        .with_policy(ReconnectPolicy::default().max_retries(max_retries));

    let message = watch_session(&socket).await?;
    let reason = match message {
        SessionMessage::Logout => "logout",
        SessionMessage::DuplicateLogin => "duplicateLogin",
        SessionMessage::Other => "other",
    };
    log::info!("session ended: {}", reason);
    print_json(&json!({ "event": "sessionEnded", "reason": reason }))
}
