use tracing::info;

use crate::cli::commands::StreamArgs;
use crate::errors::ReviewError;
use super::context::Context;
use super::run::{finish_session, run_session};

pub async fn handle_stream(args: StreamArgs, ctx: &Context) -> Result<(), ReviewError> {
    if args.repo.trim().is_empty() {
        return Err(ReviewError::InvalidInput("Repository URL must not be empty".into()));
    }
    let client = ctx.client(args.no_rag)?;
    info!(repo = %args.repo, server = %client.base_url(), "Starting repository analysis");

    let outcome = run_session(client.stream_repository(&args.repo), ctx).await;
    finish_session(outcome, &args.output, ctx).await
}
