use qvm_pass_client::PassClient;
use qvm_pass_transport::RpcChannel;

use crate::cmd::{confirm_overwrite, copy_line_to_clipboard, GenerateArgs};
use crate::config::Settings;
use crate::exit::{client_error, CliResult, FAILURE};
use crate::output;

/// The vault's generate output leads with a banner, a blank line and a
/// label; the secret itself sits on the fourth line.
const SECRET_LINE: usize = 3;

pub fn run<C: RpcChannel>(
    client: &PassClient<C>,
    settings: &Settings,
    args: &GenerateArgs,
) -> CliResult<i32> {
    // In-place replacement keeps the entry, so there is nothing to confirm.
    if !args.in_place && !args.force && !confirm_overwrite(client, &args.pass_name)? {
        return Ok(FAILURE);
    }

    let rpc_args = [
        options_string(args),
        args.pass_name.clone(),
        args.pass_length.to_string(),
    ];
    let invocation = client
        .write("generate", &rpc_args, None)
        .map_err(client_error)?;

    if !invocation.success() || !args.clip {
        return Ok(output::emit(&invocation));
    }

    let plain = strip_sgr(&String::from_utf8_lossy(&invocation.stdout));
    copy_line_to_clipboard(&args.pass_name, &plain, SECRET_LINE, settings)
}

/// Single-dash option cluster for the remote `pass generate`. The clip
/// letter is only passed along with qrcode; a plain `--clip` is handled
/// entirely on this side.
fn options_string(args: &GenerateArgs) -> String {
    let mut options = String::from("-");
    if args.no_symbols {
        options.push('n');
    }
    if args.qrcode {
        options.push('q');
    }
    if args.qrcode && args.clip {
        options.push('c');
    }
    if args.in_place {
        options.push('i');
    }
    if args.force || !args.in_place {
        options.push('f');
    }
    options
}

/// Drops the SGR color sequences `pass` wraps generated secrets in. Only
/// the short `ESC [ <one or two digits> m` form is recognized; anything
/// else passes through untouched.
fn strip_sgr(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut segment = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == 0x1b {
            if let Some(len) = sgr_len(&bytes[i..]) {
                out.push_str(&text[segment..i]);
                i += len;
                segment = i;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&text[segment..]);
    out
}

fn sgr_len(bytes: &[u8]) -> Option<usize> {
    if bytes.get(1) != Some(&b'[') {
        return None;
    }
    let digits = bytes[2..]
        .iter()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if (1..=2).contains(&digits) && bytes.get(2 + digits) == Some(&b'm') {
        Some(digits + 3)
    } else {
        None
    }
}
