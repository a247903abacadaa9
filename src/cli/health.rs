use console::style;

use crate::errors::ReviewError;
use super::context::Context;

pub async fn handle_health(ctx: &Context) -> Result<(), ReviewError> {
    let client = ctx.client(false)?;
    client.health().await?;
    println!("{} {}", style("Service is up:").green(), client.base_url());
    Ok(())
}
