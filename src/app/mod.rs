//! Command runners behind the CLI.

use crate::cli::{RegisterOpts, SearchOpts};
use crate::config::{validate_config_object, Config};
use crate::registration::{Field, FormState};
use crate::search::{
    HttpSearchFetcher, SearchController, SearchFetcher, SearchSnapshot, SearchStatus,
};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Longest wait for the final query to settle once input has ended.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Drive a controller from the interactive stdin/stdout pair.
pub async fn run_search(config: &Config, opts: &SearchOpts) -> Result<()> {
    let mut search = config.search.clone();
    if let Some(ref url) = opts.base_url {
        search.base_url = url.clone();
    }
    if let Some(ms) = opts.debounce_ms {
        search.debounce_ms = ms;
    }

    let mut effective = config.clone();
    effective.search = search;
    validate_config_object(&effective)?;

    let fetcher = HttpSearchFetcher::from_config(&effective.search)?;
    info!(endpoint = %fetcher.endpoint(), "search ready; type a query per line");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        res = search_lines(Arc::new(fetcher), effective.search.debounce(), stdin, stdout) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            Ok(())
        }
    }
}

/// Feed every input line to a fresh controller as a query and write each
/// distinct rendering of its state to `output`.
///
/// Returns after input ends and the last query has settled, or after
/// [`SETTLE_TIMEOUT`] if it never does.
pub async fn search_lines<R, W>(
    fetcher: Arc<dyn SearchFetcher>,
    debounce: Duration,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let controller = SearchController::spawn_shared(fetcher, debounce);
    debug!(debounce = ?controller.debounce(), "search controller started");
    let mut state = controller.subscribe();
    let mut lines = input.lines();
    let mut last_rendered = String::new();
    let mut input_open = true;

    while input_open {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    debug!(query = %line, "input");
                    controller.set_query(line).await;
                }
                None => input_open = false,
            },
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = state.borrow_and_update().clone();
                write_if_changed(&mut output, &snap, &mut last_rendered).await?;
            }
        }
    }

    let settled = tokio::time::timeout(SETTLE_TIMEOUT, async {
        while state.borrow().is_loading {
            if state.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    if settled.is_err() {
        warn!("last query still loading after {:?}; giving up", SETTLE_TIMEOUT);
    }
    let snap = state.borrow_and_update().clone();
    write_if_changed(&mut output, &snap, &mut last_rendered).await?;

    controller.shutdown().await;
    output.flush().await?;
    Ok(())
}

async fn write_if_changed<W>(output: &mut W, snap: &SearchSnapshot, last: &mut String) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let rendered = render(snap);
    if rendered.is_empty() || rendered == *last {
        return Ok(());
    }
    output.write_all(rendered.as_bytes()).await?;
    output.flush().await?;
    *last = rendered;
    Ok(())
}

/// Text rendering of a snapshot; empty when there is nothing to show.
pub fn render(snap: &SearchSnapshot) -> String {
    if snap.status() == SearchStatus::Loading {
        return "Loading...\n".to_string();
    }

    let mut out = String::new();
    if let Some(ref error) = snap.error {
        out.push_str(&format!("error: {error}\n"));
    }
    if snap.results.is_empty() {
        if snap.error.is_none() && !snap.query.is_empty() {
            out.push_str("No posts found\n");
        }
        return out;
    }
    for item in &snap.results {
        out.push_str(&format!("{}. {}\n", item.id, item.title));
        for line in item.body.lines() {
            out.push_str(&format!("   {line}\n"));
        }
    }
    out
}

/// Validate a registration from CLI flags and print it as JSON.
pub fn run_register(opts: &RegisterOpts) -> Result<()> {
    let mut form = FormState::new();
    form.handle_change(Field::FirstName, opts.first_name.as_str());
    form.handle_change(Field::LastName, opts.last_name.as_str());
    form.handle_change(Field::Email, opts.email.as_str());
    form.handle_change(Field::Password, opts.password.as_str());
    form.handle_change(Field::ConfirmPassword, opts.confirm_password.as_str());

    let mut submitted = None;
    form.submit(|values| submitted = Some(values))?;
    if let Some(values) = submitted {
        println!("{}", serde_json::to_string_pretty(&values)?);
    }
    Ok(())
}
