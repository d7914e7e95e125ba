//! `show` keeps its own tiny argument scanner: clipboard requests are
//! handled locally, everything else is forwarded to the vault untouched,
//! unknown flags included.

use qvm_pass_client::PassClient;
use qvm_pass_transport::RpcChannel;

use crate::cmd::copy_line_to_clipboard;
use crate::config::Settings;
use crate::exit::{client_error, CliResult};
use crate::output;

#[derive(Debug, Default, PartialEq)]
struct ShowRequest {
    /// Requested 1-based line, when a clip flag was seen.
    clip: Option<i64>,
    qrcode: bool,
    /// First bare argument; named in the "Copied ..." report.
    pass_name: Option<String>,
    /// Arguments left after the clip flags are consumed.
    forward: Vec<String>,
}

pub fn run<C: RpcChannel>(
    client: &PassClient<C>,
    settings: &Settings,
    args: &[String],
) -> CliResult<i32> {
    let request = parse_arguments(args);

    match request.clip {
        // A QR code also renders the secret; copying too would be redundant.
        Some(line) if !request.qrcode => {
            let invocation = client
                .read("show", &request.forward)
                .map_err(client_error)?;
            copy_line_to_clipboard(
                request.pass_name.as_deref().unwrap_or_default(),
                &String::from_utf8_lossy(&invocation.stdout),
                clip_index(line),
                settings,
            )
        }
        _ => {
            let invocation = client.read("show", args).map_err(client_error)?;
            Ok(output::emit(&invocation))
        }
    }
}

fn parse_arguments(args: &[String]) -> ShowRequest {
    let mut request = ShowRequest::default();

    for arg in args {
        if arg == "-c" || arg == "--clip" {
            request.clip = Some(1);
        } else if let Some(rest) = arg
            .strip_prefix("--clip=")
            .or_else(|| arg.strip_prefix("-c"))
        {
            // An unparsable suffix still means "clip line 1".
            request.clip = Some(rest.parse().unwrap_or(1));
        } else {
            if !arg.starts_with('-') && request.pass_name.is_none() {
                request.pass_name = Some(arg.clone());
            } else if arg.starts_with("-q") || arg.starts_with("--qrcode") {
                request.qrcode = true;
            }
            request.forward.push(arg.clone());
        }
    }

    request
}

fn clip_index(line: i64) -> usize {
    line.saturating_sub(1).max(0) as usize
}
