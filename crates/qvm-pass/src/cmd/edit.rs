use qvm_pass_client::PassClient;
use qvm_pass_transport::RpcChannel;
use zeroize::Zeroizing;

use crate::cmd::EditArgs;
use crate::editor;
use crate::exit::{client_error, CliResult};
use crate::output;

/// Fetch, edit, write back. The write happens even when nothing changed;
/// the vault decides whether that leaves a git commit behind.
pub fn run<C: RpcChannel>(client: &PassClient<C>, args: &EditArgs) -> CliResult<i32> {
    let existing = fetch_existing(client, &args.pass_name)?;
    let edited = editor::edit_text(existing.as_deref().map(String::as_str))?;
    let secret = edited.or(existing);

    let invocation = client
        .write(
            "edit",
            &[args.pass_name.clone()],
            secret.as_ref().map(|text| text.as_bytes()),
        )
        .map_err(client_error)?;
    Ok(output::emit(&invocation))
}

/// A failing `show` means the entry does not exist yet; the editor then
/// starts from an empty buffer.
fn fetch_existing<C: RpcChannel>(
    client: &PassClient<C>,
    pass_name: &str,
) -> CliResult<Option<Zeroizing<String>>> {
    let probe = client
        .read("show", &[pass_name.to_string()])
        .map_err(client_error)?;
    if probe.success() {
        Ok(Some(Zeroizing::new(
            String::from_utf8_lossy(&probe.stdout).into_owned(),
        )))
    } else {
        Ok(None)
    }
}
