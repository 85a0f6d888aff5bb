//! `--key value` option parsing for command arguments.

use crate::cli::core::CommandError;

/// Positional arguments plus the recognised `--name value` options.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: Vec<(&'static str, &'a str)>,
}

impl<'a> ParsedArgs<'a> {
    /// Splits `args` into positionals and options. `allowed` lists option
    /// names without the leading dashes.
    pub fn parse(args: &[&'a str], allowed: &[&'static str]) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();

        while let Some(token) = iter.next() {
            let Some(name) = token.strip_prefix("--").filter(|name| !name.is_empty()) else {
                parsed.positional.push(token);
                continue;
            };
            let key = allowed
                .iter()
                .copied()
                .find(|candidate| *candidate == name)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!("Unknown option `--{}`", name))
                })?;
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("Option `--{}` requires a value", key))
            })?;
            parsed.options.retain(|(existing, _)| *existing != key);
            parsed.options.push((key, value));
        }

        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.option(name).is_some()
    }

    /// Fails unless exactly `count` positionals were given.
    pub fn expect_positional(&self, count: usize, usage: &str) -> Result<(), CommandError> {
        if self.positional.len() == count {
            Ok(())
        } else {
            Err(CommandError::InvalidArguments(format!(
                "Expected {} argument(s), got {}. Usage: {} (quote names containing spaces)",
                count,
                self.positional.len(),
                usage
            )))
        }
    }
}

pub(crate) fn parse_number(field: &str, raw: &str) -> Result<f64, CommandError> {
    raw.trim().parse::<f64>().map_err(|_| {
        CommandError::InvalidArguments(format!("{} must be a number, got `{}`", field, raw))
    })
}

pub(crate) fn parse_optional_number(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<f64>, CommandError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_number(field, value).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn parse_count(field: &str, raw: &str) -> Result<usize, CommandError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(CommandError::InvalidArguments(format!(
            "{} must be a whole number greater than zero, got `{}`",
            field, raw
        ))),
    }
}
