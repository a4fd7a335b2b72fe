//! Map validated CLI arguments to the action the binary executes.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_PORT, policy, store};
use anyhow::Result;
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let store_opts = store::Options::parse(matches)?;
    let policy = policy::parse(matches);

    Ok(Action::Server(Args {
        port,
        backend: store_opts.backend,
        dsn: store_opts.dsn.map(SecretString::from),
        db_max_connections: store_opts.max_connections,
        policy,
    }))
}
