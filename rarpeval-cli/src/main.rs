//! rarpeval command-line entry point

use clap::Parser;
use rarpeval_cli::commands::Commands;

/// Score instrument segmentation and action recognition predictions
#[derive(Debug, Parser)]
#[command(name = "rarpeval", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "rarpeval",
            "evaluate",
            "test",
            "pred",
            "-j",
            "2",
            "--class-errors",
        ])
        .unwrap();
        match cli.command {
            Commands::Evaluate(args) => {
                assert_eq!(args.threads, Some(2));
                assert!(args.class_errors);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
