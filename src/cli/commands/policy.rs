use crate::credentials::{PasswordPolicy, policy::DEFAULT_MIN_LENGTH};
use clap::{Arg, ArgAction, ArgMatches, Command};

pub const ARG_PASSWORD_MIN_LENGTH: &str = "password-min-length";
pub const ARG_ALLOW_NUMERIC: &str = "allow-numeric-passwords";
pub const ARG_ALLOW_COMMON: &str = "allow-common-passwords";
pub const ARG_REJECT_SIMILAR: &str = "reject-similar-passwords";

/// Build the password policy from matches.
#[must_use]
pub fn parse(matches: &ArgMatches) -> PasswordPolicy {
    PasswordPolicy::new()
        .with_min_length(
            matches
                .get_one::<usize>(ARG_PASSWORD_MIN_LENGTH)
                .copied()
                .unwrap_or(DEFAULT_MIN_LENGTH),
        )
        .with_reject_numeric(!matches.get_flag(ARG_ALLOW_NUMERIC))
        .with_reject_common(!matches.get_flag(ARG_ALLOW_COMMON))
        .with_reject_similar(matches.get_flag(ARG_REJECT_SIMILAR))
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PASSWORD_MIN_LENGTH)
                .long(ARG_PASSWORD_MIN_LENGTH)
                .help("Minimum password length accepted at registration")
                .env("GATEKEEP_PASSWORD_MIN_LENGTH")
                .default_value("8")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_ALLOW_NUMERIC)
                .long(ARG_ALLOW_NUMERIC)
                .help("Accept passwords made only of digits")
                .env("GATEKEEP_ALLOW_NUMERIC_PASSWORDS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_ALLOW_COMMON)
                .long(ARG_ALLOW_COMMON)
                .help("Accept passwords from the common-password list")
                .env("GATEKEEP_ALLOW_COMMON_PASSWORDS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_REJECT_SIMILAR)
                .long(ARG_REJECT_SIMILAR)
                .help("Reject passwords resembling the username or email")
                .env("GATEKEEP_REJECT_SIMILAR_PASSWORDS")
                .action(ArgAction::SetTrue),
        )
}
