use crate::demo::{run_demo, DemoArgs};
use crate::server;
use campus_hire::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "CampusHire",
    about = "Run the campus placement service or walk through a seeded placement season",
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
    /// Seed an in-memory placement season and print the dashboard and an offer letter
    Demo(DemoArgs),
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
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["campus-hire-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn demo_flags_parse_dates_and_amounts() {
        let cli = Cli::try_parse_from([
            "campus-hire-api",
            "demo",
            "--joining-date",
            "2025-01-01",
            "--final-ctc",
            "1000000",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.final_ctc, Some(1_000_000.0));
                let joining = args.joining_date.expect("joining date");
                assert_eq!(joining.format("%Y-%m-%d").to_string(), "2025-01-01");
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }

    #[test]
    fn negative_offer_amount_is_rejected() {
        let err = Cli::try_parse_from(["campus-hire-api", "demo", "--final-ctc=-10"])
            .expect_err("negative amount refused");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("must be a non-negative number"));
    }
}
