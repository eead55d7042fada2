use crate::demo::{run_company_check, run_demo, CompanyCheckArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_board::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Job Board",
    about = "Run the role-gated job board service or inspect its workflows from the command line",
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
    /// Inspect recruiter company records
    Company {
        #[command(subcommand)]
        command: CompanyCommand,
    },
    /// Walk through company approval, job posting, and an application against the in-memory backend
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CompanyCommand {
    /// Print the recruiter access verdict for a company record stored as JSON
    Check(CompanyCheckArgs),
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
        Command::Company {
            command: CompanyCommand::Check(args),
        } => run_company_check(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
