//! Reading command input from arguments, files and stdin

use std::io::Read;
use std::path::Path;

use crate::error::CliError;

/// Resolve a `--payload` argument.
///
/// `-` reads stdin, `@path` reads a file, anything else is the JSON text itself.
pub fn payload_text(arg: &str) -> Result<String, CliError> {
    match arg {
        "-" => read_stdin(),
        _ => match arg.strip_prefix('@') {
            Some(path) => read_file(Path::new(path)),
            None => Ok(arg.to_string()),
        },
    }
}

/// Resolve the data for `sign`: the positional argument or `--file` (`-` for stdin).
pub fn raw_data(data: Option<String>, file: Option<&Path>) -> Result<Vec<u8>, CliError> {
    match (data, file) {
        (Some(data), None) => Ok(data.into_bytes()),
        (None, Some(path)) if path == Path::new("-") => read_stdin().map(String::into_bytes),
        (None, Some(path)) => std::fs::read(path)
            .map_err(|e| CliError::Input(format!("failed to read {}: {}", path.display(), e))),
        (None, None) => Err(CliError::Input("provide DATA or --file".to_string())),
        (Some(_), Some(_)) => Err(CliError::Input(
            "DATA and --file are mutually exclusive".to_string(),
        )),
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::Input(format!("failed to read {}: {}", path.display(), e)))
}

fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| CliError::Input(format!("failed to read stdin: {e}")))?;
    Ok(buf)
}
