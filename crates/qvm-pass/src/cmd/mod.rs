use clap::{Args, Subcommand};

use qvm_pass_client::PassClient;
use qvm_pass_transport::RpcChannel;

use crate::clipboard;
use crate::config::Settings;
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::prompt;

pub mod edit;
pub mod forward;
pub mod generate;
pub mod insert;
pub mod show;

/// Commands with local behavior. Everything else arrives as raw external
/// tokens and is resolved against the routing tables below, falling back
/// to `show` so `qvm-pass web/mail` works.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Insert a new secret.
    Insert(InsertArgs),
    /// Edit a secret in $VISUAL or $EDITOR.
    Edit(EditArgs),
    /// Have the vault generate a new secret.
    Generate(GenerateArgs),
    #[command(name = "__clipboard-clear", hide = true)]
    ClipboardClear,
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Args, Debug)]
pub struct InsertArgs {
    /// Prompt once with the input echoed.
    #[arg(short, long)]
    pub echo: bool,
    /// Read the secret from stdin until EOF.
    #[arg(short, long)]
    pub multiline: bool,
    /// Overwrite an existing entry without asking.
    #[arg(short, long)]
    pub force: bool,
    pub pass_name: String,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub pass_name: String,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Generate without symbol characters.
    #[arg(short = 'n', long)]
    pub no_symbols: bool,
    /// Have the vault render the secret as a QR code.
    #[arg(short, long)]
    pub qrcode: bool,
    /// Copy the secret to the clipboard instead of printing it.
    #[arg(short, long)]
    pub clip: bool,
    /// Replace only the first line of an existing entry.
    #[arg(short, long)]
    pub in_place: bool,
    /// Overwrite an existing entry without asking.
    #[arg(short, long)]
    pub force: bool,
    pub pass_name: String,
    #[arg(env = "PASSWORD_STORE_GENERATED_LENGTH", default_value_t = 25)]
    pub pass_length: u32,
}

/// Read-only commands relayed verbatim over the read service.
const READ_COMMANDS: &[&str] = &["ls", "find", "grep", "help", "version"];
/// Mutating commands relayed verbatim over the write service.
const WRITE_COMMANDS: &[&str] = &["init", "rm", "mv", "cp", "git"];

pub fn run(command: Option<Command>, settings: &Settings, argv: &[String]) -> CliResult<i32> {
    let client = PassClient::new(settings.vault());
    dispatch(command, &client, settings, argv)
}

fn dispatch<C: RpcChannel>(
    command: Option<Command>,
    client: &PassClient<C>,
    settings: &Settings,
    argv: &[String],
) -> CliResult<i32> {
    match command {
        None => forward::remote_help(client),
        Some(Command::Insert(args)) => insert::run(client, &args),
        Some(Command::Edit(args)) => edit::run(client, &args),
        Some(Command::Generate(args)) => generate::run(client, settings, &args),
        Some(Command::ClipboardClear) => clipboard::run_deferred_clear(),
        Some(Command::External(tokens)) => {
            let name = tokens.first().map(String::as_str).unwrap_or_default();
            match name {
                // `show` consumed its own slot; the fallback did not.
                "show" => show::run(client, settings, argv.get(2..).unwrap_or_default()),
                name if READ_COMMANDS.contains(&name) => forward::read(client, name, argv),
                name if WRITE_COMMANDS.contains(&name) => forward::write(client, name, argv),
                _ => show::run(client, settings, argv.get(1..).unwrap_or_default()),
            }
        }
    }
}

/// Probe the vault before overwriting. A failed probe means the entry does
/// not exist yet, so the write goes ahead unasked.
pub(crate) fn confirm_overwrite<C: RpcChannel>(
    client: &PassClient<C>,
    pass_name: &str,
) -> CliResult<bool> {
    let probe = client
        .read("show", &[pass_name.to_string()])
        .map_err(client_error)?;
    if !probe.success() {
        return Ok(true);
    }

    prompt::confirm(&format!(
        "An entry already exists for {pass_name}. Overwrite it?"
    ))
}

/// Copy the line at `index` (zero-based) of `text` to the clipboard, or
/// report that the line is missing. Either way the command succeeds; the
/// vault's own exit code is not consulted on the clipboard path.
pub(crate) fn copy_line_to_clipboard(
    pass_name: &str,
    text: &str,
    index: usize,
    settings: &Settings,
) -> CliResult<i32> {
    match text.lines().nth(index) {
        Some(line) => clipboard::place_secret(pass_name, line, settings)?,
        None => println!("There is no password to put on the clipboard at line {index}."),
    }
    Ok(SUCCESS)
}
