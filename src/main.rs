//! slbnc-admin - Straylight Bouncer admin console
//!
//! Reads raw client lines from stdin on behalf of the configured session and
//! prints the console's replies as IRC lines on stdout.

use futures_util::StreamExt;
use slbnc_admin::config::{self, Config};
use slbnc_admin::console::effect::ConsoleEffect;
use slbnc_admin::console::store::{MemoryStore, NvStore, RedbStore};
use slbnc_admin::state::DEFAULT_STATUS_PREFIX;
use slbnc_admin::telemetry::spans;
use slbnc_admin::{Console, Host, Session};
use tokio::io::{AsyncWriteExt, Stdout};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{Instrument, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Longest accepted input line.
const MAX_LINE_LENGTH: usize = 8192;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries IRC lines
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "console.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        ));
    }

    let host = Host::load(&config.console.bouncer_config).map_err(|e| {
        error!(path = %config.console.bouncer_config.display(), error = %e, "Failed to load bouncer config");
        e
    })?;
    let store: Box<dyn NvStore> = match &config.console.store_path {
        Some(path) => Box::new(RedbStore::open(path)?),
        None => {
            warn!("No store_path configured; console settings will not persist");
            Box::new(MemoryStore::new())
        }
    };

    let session = Session::new(
        config.session.user.clone(),
        config.session.network.as_deref(),
    );
    if host.user(&session.user).is_none() {
        return Err(anyhow::anyhow!(
            "session user '{}' does not exist in {}",
            session.user,
            config.console.bouncer_config.display()
        ));
    }

    info!(
        user = %session.user,
        module = %config.console.module_name,
        users = host.users().count(),
        "Starting slbnc-admin"
    );

    let console = Console::new(config.console.module_name.clone(), store);
    let span = spans::session(&session.user, session.network.as_deref());
    run(console, host, session).instrument(span).await
}

/// Feed stdin through the console until input ends, a terminate effect is
/// emitted, or Ctrl-C.
async fn run(mut console: Console, mut host: Host, session: Session) -> anyhow::Result<()> {
    let mut lines = FramedRead::new(
        tokio::io::stdin(),
        LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
    );
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            next = lines.next() => {
                let Some(line) = next else {
                    info!("End of input");
                    return Ok(());
                };
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Dropping unreadable input line");
                        continue;
                    }
                };
                let Some(effects) = console.on_user_raw(&mut host, &session, &line) else {
                    debug!("Line not addressed to the console");
                    continue;
                };
                if emit(&mut stdout, &console, &host, &session, effects).await? {
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                return Ok(());
            }
        }
    }
}

/// Write effects as IRC lines. Returns true when the console asked to
/// terminate.
async fn emit(
    stdout: &mut Stdout,
    console: &Console,
    host: &Host,
    session: &Session,
    effects: Vec<ConsoleEffect>,
) -> anyhow::Result<bool> {
    let (prefix, nick) = match host.user(&session.user) {
        Some(user) if !user.nick.is_empty() => (user.status_prefix.as_str(), user.nick.as_str()),
        Some(user) => (user.status_prefix.as_str(), user.name.as_str()),
        None => (DEFAULT_STATUS_PREFIX, session.user.as_str()),
    };
    let module = console.module_name();

    let mut terminate = false;
    for effect in effects {
        let line = match effect {
            ConsoleEffect::Reply { target, text } => format!(
                ":{}{}!{}@znc.in PRIVMSG {} :{}\r\n",
                prefix, target, module, nick, text
            ),
            ConsoleEffect::Broadcast { message } => format!(
                ":{}status!status@znc.in NOTICE {} :*** {}\r\n",
                prefix, nick, message
            ),
            ConsoleEffect::Terminate { kind, message } => {
                info!(?kind, %message, "Console requested termination");
                terminate = true;
                continue;
            }
        };
        stdout.write_all(line.as_bytes()).await?;
    }
    stdout.flush().await?;
    Ok(terminate)
}
