//! Built-in defaults for the persisted configuration.

/// Endpoint used when no configuration file exists yet.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8092";
/// Directory under the user's home that holds CLI state.
pub const CONFIG_DIR_NAME: &str = ".runagents";
/// File name of the persisted record inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";
