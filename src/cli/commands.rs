use clap::{Args, Parser, Subcommand};

use crate::reporting::ReportFormat;
use crate::transport::DEFAULT_REPLAY_CHUNK_SIZE;

#[derive(Parser)]
#[command(name = "reviewlens", version, about = "Streaming client for the AI code review service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Analysis service base URL (overrides config and REVIEWLENS_SERVER_URL)
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream a repository analysis and aggregate results live
    Stream(StreamArgs),
    /// Re-aggregate a saved NDJSON analysis stream offline
    Replay(ReplayArgs),
    /// Analyze a single source file (non-streaming)
    Analyze(AnalyzeArgs),
    /// Queue a repository analysis delivered by email
    Queue(QueueArgs),
    /// Check that the analysis service is reachable
    Health,
    /// Validate the file given with --config
    Validate,
}

#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Output directory for reports
    #[arg(short, long)]
    pub output: Option<String>,

    /// Report formats to write (repeatable)
    #[arg(short = 'f', long = "format", value_enum)]
    pub formats: Vec<ReportFormat>,
}

#[derive(Args, Clone)]
pub struct StreamArgs {
    /// Repository URL to analyze
    #[arg(short, long)]
    pub repo: String,

    /// Disable retrieval-augmented AI feedback
    #[arg(long)]
    pub no_rag: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Clone)]
pub struct ReplayArgs {
    /// Saved NDJSON stream
    #[arg(short, long)]
    pub input: String,

    /// Bytes per simulated transport chunk
    #[arg(long, default_value_t = DEFAULT_REPLAY_CHUNK_SIZE)]
    pub chunk_size: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Source file to analyze
    #[arg(short = 'i', long)]
    pub file: String,

    /// Name reported to the service (defaults to the file name)
    #[arg(long)]
    pub filename: Option<String>,

    /// Disable retrieval-augmented AI feedback
    #[arg(long)]
    pub no_rag: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Clone)]
pub struct QueueArgs {
    /// Repository URL to analyze
    #[arg(short, long)]
    pub repo: String,

    /// Address the finished report is sent to
    #[arg(short, long)]
    pub email: String,

    /// Disable retrieval-augmented AI feedback
    #[arg(long)]
    pub no_rag: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_stream_with_formats() {
        let cli = Cli::try_parse_from([
            "reviewlens", "stream", "--repo", "https://github.com/a/b", "-f", "html", "-f", "json", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Stream(args) => {
                assert_eq!(args.repo, "https://github.com/a/b");
                assert_eq!(args.output.formats, vec![ReportFormat::Html, ReportFormat::Json]);
                assert!(!args.no_rag);
            }
            _ => panic!("expected stream command"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["reviewlens", "validate", "--config", "review.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate));
        assert_eq!(cli.config.as_deref(), Some("review.yaml"));
    }

    #[test]
    fn test_replay_default_chunk_size() {
        let cli = Cli::try_parse_from(["reviewlens", "replay", "--input", "run.ndjson"]).unwrap();
        match cli.command {
            Commands::Replay(args) => assert_eq!(args.chunk_size, DEFAULT_REPLAY_CHUNK_SIZE),
            _ => panic!("expected replay command"),
        }
    }
}
