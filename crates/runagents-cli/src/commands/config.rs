use std::io::Write;

use runagents_config::{ConfigRecord, ConfigStore};

use crate::cli::ConfigSetArgs;
use crate::client::CliResult;
use crate::commands::write_message;
use crate::output::output_error;

const NOT_SET: &str = "(not set)";

pub(crate) fn handle_config_set<W: Write>(
    store: &ConfigStore,
    args: &ConfigSetArgs,
    out: &mut W,
) -> CliResult<()> {
    let mut record = store.load()?;
    record.set(args.key, &args.value)?;
    store.save(&record)?;
    tracing::debug!(key = %args.key, path = %store.path().display(), "config updated");
    write_message(out, &format!("Config \"{}\" set successfully.", args.key))
}

pub(crate) fn handle_config_get<W: Write>(store: &ConfigStore, out: &mut W) -> CliResult<()> {
    let record = store.load()?;
    write_config(out, &record)
}

fn write_config<W: Write>(out: &mut W, record: &ConfigRecord) -> CliResult<()> {
    let api_key = record
        .masked_api_key()
        .unwrap_or_else(|| NOT_SET.to_string());
    writeln!(out, "Endpoint: {}", record.endpoint).map_err(output_error)?;
    writeln!(out, "API Key:  {api_key}").map_err(output_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CliError;
    use crate::commands::test_support::text;
    use runagents_config::ConfigKey;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConfigStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = ConfigStore::at(dir.path().join(".runagents").join("config.json"));
        (dir, store)
    }

    fn set_args(key: ConfigKey, value: &str) -> ConfigSetArgs {
        ConfigSetArgs {
            key,
            value: value.to_string(),
        }
    }

    #[test]
    fn get_on_fresh_store_shows_defaults() {
        let (_dir, store) = store();
        let mut out = Vec::new();
        handle_config_get(&store, &mut out).expect("config get");
        assert_eq!(
            text(out),
            "Endpoint: http://localhost:8092\nAPI Key:  (not set)\n"
        );
    }

    #[test]
    fn set_persists_and_get_masks_the_key() {
        let (_dir, store) = store();
        let mut out = Vec::new();
        handle_config_set(&store, &set_args(ConfigKey::Endpoint, "https://x.test"), &mut out)
            .expect("set endpoint");
        handle_config_set(&store, &set_args(ConfigKey::ApiKey, "abcd1234efgh"), &mut out)
            .expect("set key");
        assert_eq!(
            text(out),
            "Config \"endpoint\" set successfully.\nConfig \"api-key\" set successfully.\n"
        );

        let record = store.load().expect("load");
        assert_eq!(record.endpoint, "https://x.test");
        assert_eq!(record.api_key, "abcd1234efgh");

        let mut out = Vec::new();
        handle_config_get(&store, &mut out).expect("config get");
        assert_eq!(text(out), "Endpoint: https://x.test\nAPI Key:  abcd****efgh\n");
    }

    #[test]
    fn invalid_endpoint_is_rejected_without_writing() {
        let (_dir, store) = store();
        let mut out = Vec::new();
        let err = handle_config_set(&store, &set_args(ConfigKey::Endpoint, "localhost"), &mut out)
            .expect_err("relative endpoint");
        assert!(matches!(err, CliError::Validation(_)));
        assert!(!store.path().exists());
        assert!(out.is_empty());
    }

    #[test]
    fn corrupt_file_is_an_operational_failure() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(store.path(), "{").expect("write");
        let mut out = Vec::new();
        let err = handle_config_get(&store, &mut out).expect_err("corrupt config");
        assert_eq!(err.exit_code(), 3);
    }
}
