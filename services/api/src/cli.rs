use crate::demo::{
    run_assessment, run_demo, run_roster_report, AssessArgs, DemoArgs, RosterReportArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sentence_watch::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Sentence Watch",
    about = "Track suspended-sentence and probation caseloads from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute lifecycle and risk for a single case without storing it
    Offender {
        #[command(subcommand)]
        command: OffenderCommand,
    },
    /// Load a roster CSV and print the caseload summary
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
    /// Walk through registration, reduction, and reporting on sample offenders
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum OffenderCommand {
    /// Print the lifecycle and risk assessment for the given case facts
    Assess(AssessArgs),
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Summarize a roster CSV and list upcoming completions
    Report(RosterReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Offender {
            command: OffenderCommand::Assess(args),
        } => run_assessment(args),
        Command::Roster {
            command: RosterCommand::Report(args),
        } => run_roster_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
