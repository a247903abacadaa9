use console::style;

use crate::cli::commands::QueueArgs;
use crate::errors::ReviewError;
use super::context::Context;

pub async fn handle_queue(args: QueueArgs, ctx: &Context) -> Result<(), ReviewError> {
    if !args.email.contains('@') {
        return Err(ReviewError::InvalidInput(format!("Not an email address: {}", args.email)));
    }
    let client = ctx.client(args.no_rag)?;
    let message = client.queue_repository(&args.repo, &args.email).await?;
    println!("{} {}", style("Queued").green().bold(), message);
    Ok(())
}
