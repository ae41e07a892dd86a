use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use std::io::Write;
use std::process::Command;
use std::process::Stdio;
use std::thread;

/// Pipe `source` through `command`, or keep it as is if formatting fails.
pub(crate) fn format_or_keep(command: &str, source: String) -> String {
    match run_formatter(command, &source) {
        Ok(formatted) => formatted,
        Err(error) => {
            log::warn!("formatting with `{command}` failed, writing unformatted output: {error:#}");
            source
        }
    }
}

/// Run `command` with `source` on stdin and return its stdout.
///
/// The command line is split on whitespace, without any shell quoting rules.
pub(crate) fn run_formatter(command: &str, source: &str) -> Result<String> {
    let mut words = command.split_whitespace();
    let Some(program) = words.next() else {
        bail!("empty formatter command");
    };
    let mut child = Command::new(program)
        .args(words)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("could not start `{program}`"))?;

    // stdin is fed from another thread while stdout is drained here.
    let mut stdin = child.stdin.take().context("formatter stdin is not piped")?;
    let input = source.to_owned();
    let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

    let output = child.wait_with_output()?;
    match writer.join() {
        Ok(written) => written.context("could not write to the formatter")?,
        Err(_) => bail!("formatter input thread panicked"),
    }
    if !output.status.success() {
        bail!(
            "`{command}` exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    let formatted = String::from_utf8(output.stdout).context("formatter output is not UTF-8")?;
    // A formatter that rewrites files in place prints nothing on stdout.
    if formatted.trim().is_empty() && !source.trim().is_empty() {
        bail!("`{command}` printed nothing on stdout");
    }
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "export type NoArgs = Record<string, never>;\n";

    #[test]
    fn it_keeps_the_source_when_the_formatter_is_missing() {
        let command = "apollo-resolver-types-no-such-formatter --write";
        assert!(run_formatter(command, SOURCE).is_err());
        assert_eq!(format_or_keep(command, SOURCE.to_owned()), SOURCE);
        assert_eq!(format_or_keep("  ", SOURCE.to_owned()), SOURCE);
    }

    #[cfg(unix)]
    #[test]
    fn it_pipes_through_the_formatter() {
        assert_eq!(run_formatter("cat", SOURCE).unwrap(), SOURCE);
        assert_eq!(format_or_keep("tr a-z A-Z", SOURCE.to_owned()), SOURCE.to_uppercase());
        assert!(run_formatter("false", SOURCE).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn it_keeps_the_source_when_the_formatter_prints_nothing() {
        assert!(run_formatter("true", SOURCE).is_err());
        assert_eq!(format_or_keep("true", SOURCE.to_owned()), SOURCE);
    }
}
