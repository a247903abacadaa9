use console::style;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::errors::ReviewError;
use crate::reporting::write_reports;
use crate::session::{AnalysisSession, SessionOutcome, SessionState};
use crate::transport::ChunkSource;
use crate::utils::formatting::{format_duration, pluralize};
use super::commands::OutputArgs;
use super::context::Context;
use super::progress::SessionProgress;

/// Runs one session over `source`, with a live spinner unless quiet and
/// Ctrl-C wired to cancellation.
pub async fn run_session<S: ChunkSource>(source: S, ctx: &Context) -> SessionOutcome {
    let token = CancellationToken::new();
    let session = AnalysisSession::new().with_cancel_token(token.clone());

    let progress = if ctx.quiet {
        None
    } else {
        let follower = SessionProgress::new(&source.describe());
        Some(tokio::spawn(follower.follow(session.subscribe())))
    };

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling analysis");
            token.cancel();
        }
    });

    let outcome = session.run(source).await;
    interrupt.abort();
    if let Some(handle) = progress {
        if let Err(e) = handle.await {
            warn!(error = %e, "Progress display task failed");
        }
    }
    outcome
}

/// Writes the (possibly partial) report and maps the terminal state to the
/// command result.
pub async fn finish_session(outcome: SessionOutcome, output: &OutputArgs, ctx: &Context) -> Result<(), ReviewError> {
    let (dir, formats) = ctx.output_target(output);
    let counts = outcome.counts();
    let paths = write_reports(&outcome.report, &counts, &dir, &formats).await?;

    let headline = match &outcome.state {
        SessionState::Complete => style("Analysis complete").green().bold(),
        SessionState::Cancelled => style("Analysis cancelled, partial report").yellow().bold(),
        _ => style("Analysis failed, partial report").red().bold(),
    };
    println!("{} in {}", headline, format_duration(outcome.elapsed_ms));
    println!(
        "  {} | {} static | {} security",
        pluralize(outcome.stats.files_analyzed(), "file"),
        counts.static_issues,
        counts.security_issues
    );
    if counts.warnings > 0 {
        println!("  {}", style(pluralize(counts.warnings, "warning")).yellow());
    }
    if outcome.stats.parse_failures > 0 {
        println!("  {}", style(format!("{} skipped", pluralize(outcome.stats.parse_failures, "malformed line"))).dim());
    }
    for path in &paths {
        println!("  {}", style(path.display()).cyan());
    }

    match outcome.state {
        SessionState::Failed { error } => Err(ReviewError::Transport(error)),
        _ => Ok(()),
    }
}
