//! Terminal front end.
//!
//! Each input line stands for the full current text of the search box. Lines
//! go through the debouncer; settled terms are dispatched; every new search or
//! trending snapshot is rendered to the output.

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::constants::commands;
use crate::services::Debouncer;
use crate::state::AppState;

pub async fn run_interactive<R, W>(state: &AppState, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let delay = Duration::from_millis(state.config.search.debounce_ms);
    let (mut debouncer, mut settled) = Debouncer::new(delay);
    let mut lines = input.lines();
    let mut results = state.controller.subscribe();
    let mut trending = state.trending.subscribe();

    debug!(delay_ms = debouncer.delay().as_millis(), "Debouncing search input");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut input_open = true;

    // An empty search box lists popular movies.
    state.controller.spawn_dispatch(String::new());

    loop {
        if !input_open
            && !debouncer.is_pending()
            && settled.is_empty()
            && !state.controller.snapshot().is_loading()
            && !results.has_changed().unwrap_or(false)
        {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => match line.trim() {
                    commands::QUIT => break,
                    commands::TRENDING => state.trending.refresh(),
                    _ => debouncer.push(line),
                },
                Ok(None) => {
                    debug!("Input closed");
                    input_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    input_open = false;
                }
            },
            Some(term) = settled.recv() => {
                state.controller.spawn_dispatch(term);
            }
            Ok(()) = results.changed() => {
                let text = state.renderer.render_results(&results.borrow_and_update());
                writeln!(out, "{text}\n")?;
                out.flush()?;
            }
            Ok(()) = trending.changed() => {
                let text = state.renderer.render_trending(&trending.borrow_and_update());
                writeln!(out, "{text}\n")?;
                out.flush()?;
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    debouncer.cancel();
    Ok(())
}

/// Runs one search to completion and prints the results panel.
pub async fn run_search<W: Write>(state: &AppState, term: &str, out: &mut W) -> anyhow::Result<()> {
    state.controller.dispatch(term).await;
    let text = state.renderer.render_results(&state.controller.snapshot());
    writeln!(out, "{text}")?;
    Ok(())
}

pub async fn run_trending<W: Write>(
    state: &AppState,
    limit: usize,
    out: &mut W,
) -> anyhow::Result<()> {
    let entries = state.trending_service.fetch_trending(limit).await;
    writeln!(out, "{}", state.renderer.render_trending(&entries))?;
    Ok(())
}
