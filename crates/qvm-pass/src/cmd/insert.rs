use std::io::Read;

use qvm_pass_client::PassClient;
use qvm_pass_transport::RpcChannel;
use zeroize::Zeroizing;

use crate::cmd::{confirm_overwrite, InsertArgs};
use crate::exit::{client_error, io_error, CliResult, FAILURE};
use crate::output;
use crate::prompt;

/// The vault always receives `insert -f` plus a mode letter; the local side
/// already settled the overwrite question, so the remote must not prompt.
pub fn run<C: RpcChannel>(client: &PassClient<C>, args: &InsertArgs) -> CliResult<i32> {
    if !args.force && !args.multiline && !confirm_overwrite(client, &args.pass_name)? {
        return Ok(FAILURE);
    }

    let mut options = String::from("-f");
    let secret: Zeroizing<String>;

    if args.multiline {
        options.push('m');
        println!(
            "Enter contents of {} and press Ctrl+D when finished:\n",
            args.pass_name
        );
        let mut content = Zeroizing::new(String::new());
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|err| io_error("failed to read input", err))?;
        secret = content;
    } else if args.echo {
        options.push('e');
        let mut line = prompt::read_visible(&format!("Enter password for {}: ", args.pass_name))?;
        line.push('\n');
        secret = line;
    } else {
        // Both entries travel to the vault; it does the matching.
        let mut entered =
            prompt::read_hidden(&format!("Enter password for {}: ", args.pass_name))?;
        entered.push('\n');
        let retyped =
            prompt::read_hidden(&format!("Retype password for {}: ", args.pass_name))?;
        entered.push_str(&retyped);
        entered.push('\n');
        secret = entered;
    }

    let invocation = client
        .write(
            "insert",
            &[options, args.pass_name.clone()],
            Some(secret.as_bytes()),
        )
        .map_err(client_error)?;
    Ok(output::emit(&invocation))
}
