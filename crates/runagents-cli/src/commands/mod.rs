//! Command handlers grouped by resource.

pub(crate) mod agents;
pub(crate) mod analyze;
pub(crate) mod approvals;
pub(crate) mod config;
pub(crate) mod deploy;
pub(crate) mod models;
pub(crate) mod runs;
pub(crate) mod starter_kit;
pub(crate) mod tools;
pub(crate) mod version;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;

use crate::client::{CliError, CliResult};
use crate::output::output_error;

/// Read source files into a map keyed by base file name.
///
/// Later files win when two paths share a base name.
pub(crate) fn read_source_files(paths: &[PathBuf]) -> CliResult<BTreeMap<String, String>> {
    if paths.is_empty() {
        return Err(CliError::validation("at least one --file is required"));
    }

    let mut files = BTreeMap::new();
    for path in paths {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read file \"{}\"", path.display()))
            .map_err(CliError::failure)?;
        files.insert(base_name(path), contents);
    }
    Ok(files)
}

/// Read a JSON resource definition for a `create` command.
pub(crate) fn read_json_file(path: &Path) -> CliResult<Value> {
    let raw = fs::read(path)
        .with_context(|| format!("failed to read file \"{}\"", path.display()))
        .map_err(CliError::failure)?;
    serde_json::from_slice(&raw).map_err(|err| {
        CliError::validation(format!("invalid JSON in \"{}\": {err}", path.display()))
    })
}

/// Percent-encode one user-supplied path segment.
///
/// Empty, `.` and `..` segments are rejected since URL normalisation would
/// fold them into a different resource.
pub(crate) fn path_segment(value: &str) -> CliResult<Cow<'_, str>> {
    if matches!(value, "" | "." | "..") {
        return Err(CliError::validation(format!(
            "invalid resource identifier \"{value}\""
        )));
    }
    Ok(urlencoding::encode(value))
}

pub(crate) fn write_message<W: Write>(out: &mut W, message: &str) -> CliResult<()> {
    writeln!(out, "{message}").map_err(output_error)
}

fn base_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::cli::OutputFormat;
    use crate::client::{AppContext, test_context};
    use httpmock::MockServer;

    pub(crate) fn context(server: &MockServer, output: OutputFormat) -> AppContext {
        test_context(&server.base_url(), Some("test-key"), output)
    }

    pub(crate) fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).expect("utf-8 output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn source_files_are_keyed_by_base_name() -> CliResult<()> {
        let dir = TempDir::new().expect("tempdir");
        let nested = dir.path().join("src");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("agent.py"), "print('hi')\n").expect("write");
        fs::write(dir.path().join("requirements.txt"), "openai\n").expect("write");

        let files = read_source_files(&[
            nested.join("agent.py"),
            dir.path().join("requirements.txt"),
        ])?;
        assert_eq!(files.len(), 2);
        assert_eq!(files["agent.py"], "print('hi')\n");
        assert_eq!(files["requirements.txt"], "openai\n");
        Ok(())
    }

    #[test]
    fn missing_source_file_is_reported_with_its_path() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("absent.py");
        let err = read_source_files(&[missing.clone()]).expect_err("missing file");
        assert_eq!(err.exit_code(), 3);
        assert!(
            err.display_message()
                .contains(&format!("failed to read file \"{}\"", missing.display()))
        );
    }

    #[test]
    fn empty_file_list_is_a_validation_error() {
        let err = read_source_files(&[]).expect_err("no files");
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn path_segments_are_encoded() -> CliResult<()> {
        assert_eq!(path_segment("echo-tool")?, "echo-tool");
        assert_eq!(
            path_segment("../agents/default/helper")?,
            "..%2Fagents%2Fdefault%2Fhelper"
        );
        assert_eq!(path_segment("a?b#c d")?, "a%3Fb%23c%20d");
        Ok(())
    }

    #[test]
    fn dot_segments_are_rejected() {
        for value in ["", ".", ".."] {
            let err = path_segment(value).expect_err("dot segment");
            assert!(matches!(err, CliError::Validation(_)));
        }
    }

    #[test]
    fn json_definition_must_parse() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tool.json");
        fs::write(&path, "{ not json").expect("write");
        let err = read_json_file(&path).expect_err("invalid JSON");
        assert_eq!(err.exit_code(), 2);
        assert!(
            err.display_message()
                .starts_with(&format!("invalid JSON in \"{}\"", path.display()))
        );

        fs::write(&path, r#"{"name":"echo"}"#).expect("write");
        let value = read_json_file(&path).expect("valid JSON");
        assert_eq!(value["name"], "echo");
    }

    #[test]
    fn unreadable_definition_is_a_failure() {
        let dir = TempDir::new().expect("tempdir");
        let err = read_json_file(&dir.path().join("absent.json")).expect_err("missing");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("failed to read file"));
    }
}
