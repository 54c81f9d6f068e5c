use crate::demo::{run_demo, DemoArgs};
use crate::infra::write_json;
use crate::score::{run_score, ScoreArgs};
use clap::{Args, Parser, Subcommand};
use harmony::assessment::baseline_form_draft;
use harmony::config::AppConfig;
use harmony::error::AppError;
use harmony::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "harmony",
    about = "Score wellness assessments and explore the harmony-score engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a response set against a form definition without persisting it
    Score(ScoreArgs),
    /// Print the baseline assessment definition as JSON
    Baseline(BaselineArgs),
    /// Run an in-memory walkthrough: seed the baseline form, submit, and report history
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct BaselineArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Score(args) => run_score(args),
        Command::Baseline(args) => write_json(&baseline_form_draft(), args.pretty),
        Command::Demo(args) => run_demo(args, config.assessment),
    }
}
