mod clipboard;
mod cmd;
mod config;
mod editor;
mod exit;
mod logging;
mod output;
mod prompt;

use clap::Parser;

use crate::cmd::Command;
use crate::config::Settings;
use crate::exit::CliResult;

#[derive(Parser, Debug)]
#[command(
    name = "qvm-pass",
    about = "Qubes split password-store client",
    disable_help_flag = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn main() {
    logging::init();

    let argv: Vec<String> = std::env::args().collect();
    match run(&argv) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.code);
        }
    }
}

fn run(argv: &[String]) -> CliResult<i32> {
    // pass's help lives in the vault, so `-h` must never reach the local
    // flag parser.
    if matches!(argv.get(1).map(String::as_str), Some("-h" | "--help")) {
        return cmd::run(None, &Settings::load()?, argv);
    }

    let cli = Cli::parse();
    if let Some(Command::ClipboardClear) = cli.command {
        // The clear child carries its own state on stdin; it must not
        // depend on the vault configuration.
        return clipboard::run_deferred_clear();
    }

    cmd::run(cli.command, &Settings::load()?, argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_insert_flags() {
        let cli = Cli::try_parse_from(["qvm-pass", "insert", "-m", "-f", "web/mail"])
            .expect("insert args should parse");

        match cli.command {
            Some(Command::Insert(args)) => {
                assert!(args.multiline);
                assert!(args.force);
                assert!(!args.echo);
                assert_eq!(args.pass_name, "web/mail");
            }
            other => panic!("expected insert, got {other:?}"),
        }
    }

    #[test]
    fn generate_length_defaults_to_25() {
        let cli = Cli::try_parse_from(["qvm-pass", "generate", "web/mail"])
            .expect("generate args should parse");

        match cli.command {
            Some(Command::Generate(args)) => {
                assert_eq!(args.pass_length, 25);
                assert!(!args.clip);
            }
            other => panic!("expected generate, got {other:?}"),
        }
    }

    #[test]
    fn show_arrives_as_external_tokens() {
        let cli = Cli::try_parse_from(["qvm-pass", "show", "-c2", "web/mail"])
            .expect("show should parse as external tokens");

        match cli.command {
            Some(Command::External(tokens)) => {
                assert_eq!(tokens, vec!["show", "-c2", "web/mail"]);
            }
            other => panic!("expected external tokens, got {other:?}"),
        }
    }

    #[test]
    fn unknown_command_arrives_as_external_tokens() {
        let cli = Cli::try_parse_from(["qvm-pass", "web/mail"])
            .expect("bare pass name should parse as external tokens");

        assert!(matches!(cli.command, Some(Command::External(_))));
    }

    #[test]
    fn bare_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["qvm-pass"]).expect("bare invocation should parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn hidden_clear_subcommand_parses() {
        let cli = Cli::try_parse_from(["qvm-pass", "__clipboard-clear"])
            .expect("hidden subcommand should parse");
        assert!(matches!(cli.command, Some(Command::ClipboardClear)));
    }

    #[test]
    fn top_level_flag_is_a_usage_error() {
        assert!(Cli::try_parse_from(["qvm-pass", "-c"]).is_err());
    }
}
