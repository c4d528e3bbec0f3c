use std::sync::Arc;

use crate::app::{AppContext, Result};
use crate::fetcher::FeedSource;
use crate::store::DedupStore;
use crate::telegram::UpdateListener;

/// Relay until SIGINT/SIGTERM.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let telegram = ctx.telegram()?;

    match telegram.get_me().await {
        Ok(me) => tracing::info!(
            "Authorized as @{}",
            me.username.as_deref().unwrap_or(&me.first_name)
        ),
        Err(e) => tracing::warn!("Could not verify bot token: {}", e),
    }

    let mut engine = ctx.engine(Arc::new(telegram.clone()))?;
    let listener = tokio::spawn(UpdateListener::new(telegram).run());

    tracing::info!(
        "feedrelay started (PID: {}, {} links recorded)",
        std::process::id(),
        ctx.store.count()?
    );

    tokio::select! {
        _ = engine.run() => {},
        _ = shutdown_signal() => tracing::info!("Shutting down..."),
    }

    listener.abort();
    Ok(())
}

/// Fetch the feed once and print what a steady cycle would post.
pub async fn check(ctx: &AppContext) -> Result<()> {
    let source = ctx.feed_source()?;
    let items = source.fetch().await?;
    let placeholder = &ctx.config.message.title_placeholder;

    println!("{} items in {}", items.len(), source.url());

    let mut new = 0;
    for item in &items {
        let (marker, link) = match item.link() {
            Some(link) if ctx.store.exists(link)? => (" ", link),
            Some(link) => {
                new += 1;
                ("+", link)
            }
            None => ("!", "(no link)"),
        };

        println!("{} {}\n    {}", marker, item.display_title(placeholder), link);
    }

    println!("{} new", new);
    Ok(())
}

pub fn status(ctx: &AppContext, limit: usize) -> Result<()> {
    let count = ctx.store.count()?;

    if count == 0 {
        println!("No links recorded");
        return Ok(());
    }

    println!("{} links recorded", count);

    for record in ctx.store.recent(limit)? {
        println!(
            "{} {}",
            record.seen_at.format("%Y-%m-%d %H:%M:%S"),
            record.link
        );
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
            }
            _ => {
                tracing::warn!("Failed to set up signal handlers, falling back to Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
