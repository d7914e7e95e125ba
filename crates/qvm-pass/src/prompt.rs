use std::io::{self, BufRead, IsTerminal, Write};

use zeroize::Zeroizing;

use crate::exit::{io_error, CliResult};

/// Ask a yes/no question on stdout. Anything but an explicit yes, including
/// end of input, declines.
pub fn confirm(question: &str) -> CliResult<bool> {
    let mut out = io::stdout();
    let _ = write!(out, "{question} [y/N]: ");
    let _ = out.flush();

    let line = read_line()?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Prompt on stdout and read one line with normal echo.
pub fn read_visible(prompt: &str) -> CliResult<Zeroizing<String>> {
    let mut out = io::stdout();
    let _ = write!(out, "{prompt}");
    let _ = out.flush();
    read_line()
}

/// Prompt for one line with echo suppressed. When stdin is not a terminal
/// the prompt goes to stderr and the line is read in the clear, so piped
/// input keeps working.
pub fn read_hidden(prompt: &str) -> CliResult<Zeroizing<String>> {
    if io::stdin().is_terminal() {
        return rpassword::prompt_password(prompt)
            .map(Zeroizing::new)
            .map_err(|err| io_error("failed to read password", err));
    }

    let mut err = io::stderr();
    let _ = write!(err, "{prompt}");
    let _ = err.flush();
    read_line()
}

fn read_line() -> CliResult<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| io_error("failed to read input", err))?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}
