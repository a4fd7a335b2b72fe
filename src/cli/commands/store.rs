use clap::{Arg, ArgMatches, Command, builder::PossibleValuesParser};

pub const ARG_STORE: &str = "store";
pub const ARG_DSN: &str = "dsn";
pub const ARG_DB_MAX_CONNECTIONS: &str = "db-max-connections";

/// Where accounts and profiles are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub backend: Backend,
    pub dsn: Option<String>,
    pub max_connections: u32,
}

impl Options {
    /// Parse store arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the postgres backend is selected without a DSN.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let backend = match matches.get_one::<String>(ARG_STORE).map(String::as_str) {
            Some("memory") => Backend::Memory,
            _ => Backend::Postgres,
        };

        let dsn = matches
            .get_one::<String>(ARG_DSN)
            .cloned()
            .filter(|v| !v.trim().is_empty());

        if backend == Backend::Postgres && dsn.is_none() {
            return Err(anyhow::anyhow!("missing required argument: --{ARG_DSN}"));
        }

        Ok(Self {
            backend,
            dsn,
            max_connections: matches
                .get_one::<u32>(ARG_DB_MAX_CONNECTIONS)
                .copied()
                .unwrap_or(5),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_STORE)
                .long(ARG_STORE)
                .help("Account store backend")
                .env("GATEKEEP_STORE")
                .default_value("postgres")
                .value_parser(PossibleValuesParser::new(["postgres", "memory"])),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long(ARG_DSN)
                .help("Database connection string")
                .long_help("Database connection string, required when --store is postgres")
                .env("GATEKEEP_DSN"),
        )
        .arg(
            Arg::new(ARG_DB_MAX_CONNECTIONS)
                .long(ARG_DB_MAX_CONNECTIONS)
                .help("Maximum number of pooled database connections")
                .env("GATEKEEP_DB_MAX_CONNECTIONS")
                .default_value("5")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_from(args: &[&str]) -> ArgMatches {
        with_args(Command::new("gatekeep")).get_matches_from(args)
    }

    #[test]
    fn postgres_requires_dsn() {
        temp_env::with_vars(
            [
                ("GATEKEEP_DSN", None::<&str>),
                ("GATEKEEP_STORE", None::<&str>),
            ],
            || {
                let result = Options::parse(&matches_from(&["gatekeep"]));
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(err.to_string().contains("missing required argument: --dsn"));
                }
            },
        );
    }

    #[test]
    fn memory_needs_no_dsn() {
        temp_env::with_vars(
            [
                ("GATEKEEP_DSN", None::<&str>),
                ("GATEKEEP_STORE", Some("memory")),
            ],
            || {
                let options = Options::parse(&matches_from(&["gatekeep"]));
                assert!(options.is_ok());
                if let Ok(options) = options {
                    assert_eq!(options.backend, Backend::Memory);
                    assert_eq!(options.dsn, None);
                    assert_eq!(options.max_connections, 5);
                }
            },
        );
    }

    #[test]
    fn rejects_unknown_backend() {
        let result = with_args(Command::new("gatekeep")).try_get_matches_from([
            "gatekeep",
            "--store",
            "sqlite",
        ]);
        assert!(result.is_err());
    }
}
