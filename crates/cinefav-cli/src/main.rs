mod app;
mod commands;
mod poster;
mod toast;
mod view;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use cinefav_api::{http_client, FavoritesClient, SearchClient};
use cinefav_core::config::AppConfig;
use cinefav_core::identity::{FileIdentity, IdentityProvider, StaticIdentity};
use cinefav_core::location::Location;
use cinefav_runtime::{ControllerSettings, SessionSettings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to read instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,
    /// API base URL, overrides the config file and CINEFAV_API_BASE
    #[arg(long)]
    api_base: Option<String>,
    /// Starting location, e.g. "?q=batman&page=2"
    #[arg(long, default_value = "")]
    url: String,
    /// Use this user id instead of the persisted one
    #[arg(long)]
    user_id: Option<String>,
    /// Log filter, e.g. "cinefav=debug" (default: RUST_LOG or cinefav=info)
    #[arg(long)]
    log_level: Option<String>,
    /// Write the effective configuration to the user config file and exit
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    let _log_guard = init_logging(args.log_level.as_deref())?;

    let config = load_config(&args)?;
    if args.save_config {
        config.save().context("writing user config")?;
        println!("wrote {}", AppConfig::config_path().display());
        return Ok(());
    }

    let identity: Arc<dyn IdentityProvider> = match args.user_id {
        Some(id) => Arc::new(StaticIdentity(id)),
        None => Arc::new(FileIdentity::new(AppConfig::identity_path())),
    };
    let user_id = identity.user_id().context("initializing user identity")?;
    tracing::info!(base_url = %config.api.base_url, user_id = %user_id, "starting");

    let http = http_client(config.request_timeout())?;
    let search = SearchClient::new(&config.api.base_url, http.clone())?;
    let favorites = FavoritesClient::new(&config.api.base_url, http.clone(), identity)?;

    let settings = SessionSettings {
        debounce: config.debounce(),
        controller: ControllerSettings {
            favorites_page_size: config.favorites.page_size,
            recent_limit: config.search.recent_limit,
        },
    };
    let (handle, events, session) = cinefav_runtime::spawn(
        settings,
        Location::from_query(&args.url),
        search,
        favorites,
    );

    let (app, posters) = app::App::new(handle, http, config.toast_duration());

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        default_hook(info);
    }));

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal, events, posters).await;
    ratatui::restore();
    result?;

    session.await.context("session task failed")?;
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => AppConfig::load().context("reading user config")?,
    };
    config.apply_env();
    if let Some(base) = &args.api_base {
        config.api.base_url = base.clone();
    }
    Ok(config)
}

/// Log to a daily file so output never interleaves with the screen.
fn init_logging(level: Option<&str>) -> anyhow::Result<WorkerGuard> {
    let dir = AppConfig::log_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, "cinefav.log"));

    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cinefav=info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
