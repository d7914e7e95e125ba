use std::io::Write;

use qvm_pass_envelope::CompletedInvocation;

/// Project a remote invocation onto this process: stdout bytes to stdout,
/// stderr bytes to stderr, and hand back the remote exit code for the
/// caller to exit with.
pub fn emit(invocation: &CompletedInvocation) -> i32 {
    let mut out = std::io::stdout();
    let _ = out.write_all(&invocation.stdout);
    let _ = out.flush();

    let mut err = std::io::stderr();
    let _ = err.write_all(&invocation.stderr);
    let _ = err.flush();

    invocation.exit_code
}
