//! Generic forwarders: commands with no local behavior are relayed to the
//! vault byte for byte, straight from the process argument list.

use qvm_pass_client::PassClient;
use qvm_pass_transport::RpcChannel;

use crate::exit::{client_error, CliError, CliResult};
use crate::output;

/// Relay a read-only command and mirror the vault's exit status.
pub fn read<C: RpcChannel>(client: &PassClient<C>, name: &str, argv: &[String]) -> CliResult<i32> {
    let first = argv.get(1).map(String::as_str).unwrap_or_default();
    if first != name {
        return Err(CliError::failure(format!(
            "Unexpected read command: ({first}, {name})"
        )));
    }

    let invocation = client
        .read(name, argv.get(2..).unwrap_or_default())
        .map_err(client_error)?;
    Ok(output::emit(&invocation))
}

/// Relay a mutating command. No stdin payload travels this path.
pub fn write<C: RpcChannel>(client: &PassClient<C>, name: &str, argv: &[String]) -> CliResult<i32> {
    let first = argv.get(1).map(String::as_str).unwrap_or_default();
    if first != name {
        return Err(CliError::failure("Unexpected write command"));
    }

    let invocation = client
        .write(name, argv.get(2..).unwrap_or_default(), None)
        .map_err(client_error)?;
    Ok(output::emit(&invocation))
}

/// The CLI has no help text of its own; it prints the vault's.
pub fn remote_help<C: RpcChannel>(client: &PassClient<C>) -> CliResult<i32> {
    let invocation = client.read("help", &[]).map_err(client_error)?;
    Ok(output::emit(&invocation))
}
