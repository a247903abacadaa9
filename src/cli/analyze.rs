use std::path::PathBuf;

use console::style;
use tracing::info;

use crate::cli::commands::AnalyzeArgs;
use crate::errors::ReviewError;
use crate::models::CumulativeReport;
use crate::reporting::{write_reports, ReportCounts};
use super::context::Context;

pub async fn handle_analyze(args: AnalyzeArgs, ctx: &Context) -> Result<(), ReviewError> {
    let path = PathBuf::from(&args.file);
    if !path.is_file() {
        return Err(ReviewError::InvalidInput(format!("Source file not found: {}", args.file)));
    }
    let code = tokio::fs::read_to_string(&path).await?;
    if code.trim().is_empty() {
        return Err(ReviewError::InvalidInput(format!("Source file is empty: {}", args.file)));
    }
    let filename = args
        .filename
        .clone()
        .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| args.file.clone());

    let client = ctx.client(args.no_rag)?;
    info!(%filename, server = %client.base_url(), "Analyzing source file");
    let record = client.analyze_code(&code, &filename).await?;

    let report = CumulativeReport::from_single_record(record);
    let counts = ReportCounts::from_report(&report).with_files(1);
    let (dir, formats) = ctx.output_target(&args.output);
    let paths = write_reports(&report, &counts, &dir, &formats).await?;

    println!(
        "{} {}: {} static | {} security",
        style("Analyzed").green().bold(),
        filename,
        counts.static_issues,
        counts.security_issues
    );
    for warning in &report.warnings {
        println!("  {}", style(warning).yellow());
    }
    for path in &paths {
        println!("  {}", style(path.display()).cyan());
    }
    Ok(())
}
