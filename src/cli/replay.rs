use std::path::PathBuf;

use tracing::info;

use crate::cli::commands::ReplayArgs;
use crate::errors::ReviewError;
use crate::transport::FileChunkSource;
use super::context::Context;
use super::run::{finish_session, run_session};

pub async fn handle_replay(args: ReplayArgs, ctx: &Context) -> Result<(), ReviewError> {
    let path = PathBuf::from(&args.input);
    if !path.is_file() {
        return Err(ReviewError::InvalidInput(format!("Stream file not found: {}", args.input)));
    }
    info!(input = %path.display(), chunk_size = args.chunk_size, "Replaying saved analysis stream");

    let source = FileChunkSource::open(&path, args.chunk_size).await?;
    let outcome = run_session(source, ctx).await;
    finish_session(outcome, &args.output, ctx).await
}
