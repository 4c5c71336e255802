use std::io::Write;

use crate::client::CliResult;
use crate::commands::write_message;

/// Release version, overridable at build time through `RUNAGENTS_VERSION`.
pub(crate) const VERSION: &str = match option_env!("RUNAGENTS_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

pub(crate) fn handle_version<W: Write>(out: &mut W) -> CliResult<()> {
    write_message(out, &format!("runagents version {VERSION}"))
}
