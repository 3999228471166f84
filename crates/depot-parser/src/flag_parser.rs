//! Flag grammar shared by all directives
//!
//! Every directive declares its flags in a static table of [`FlagSpec`]s.
//! Supported forms:
//! - switches: `--store`, `--store=false`
//! - single values: `--quota 50GB`, `--quota=50GB`, `-q 50GB`
//! - lists: `--allow a --allow b`, `--allow a b`, `--allow=a`

use crate::error::{DirectiveError, Result};
use crate::tokenizer::Token;
use std::collections::HashMap;

/// How a flag consumes its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Boolean, present means true
    Switch,
    /// Exactly one value
    Value,
    /// Zero or more values, accumulated across occurrences
    List,
}

/// Declaration of one flag
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    /// Canonical name, e.g. `--quota`
    pub name: &'static str,
    /// Other accepted spellings, e.g. `-q`
    pub aliases: &'static [&'static str],
    pub kind: FlagKind,
}

impl FlagSpec {
    pub const fn new(name: &'static str, aliases: &'static [&'static str], kind: FlagKind) -> Self {
        Self {
            name,
            aliases,
            kind,
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FlagValue {
    Switch(bool),
    Value(String),
    List(Vec<String>),
}

/// Positional parameters and flags of one directive
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    positionals: Vec<String>,
    flags: HashMap<&'static str, FlagValue>,
}

impl Arguments {
    /// Parse `tokens` against the declared parameters and flags
    ///
    /// Every name in `parameters` is required. Flags are keyed by their
    /// canonical name whichever alias was used.
    pub fn parse(tokens: &[Token], parameters: &[&str], specs: &[FlagSpec]) -> Result<Self> {
        let mut arguments = Arguments::default();
        let mut index = 0;

        while index < tokens.len() {
            let token = &tokens[index];
            index += 1;

            if !token.is_flag() {
                if arguments.positionals.len() >= parameters.len() {
                    return Err(DirectiveError::UnexpectedArgument(token.value.clone()));
                }
                arguments.positionals.push(token.value.clone());
                continue;
            }

            let (name, inline) = match token.value.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (token.value.as_str(), None),
            };

            let spec = specs
                .iter()
                .find(|spec| spec.matches(name))
                .ok_or_else(|| DirectiveError::UnknownFlag(name.to_string()))?;

            match spec.kind {
                FlagKind::Switch => {
                    let enabled = match inline {
                        None | Some("true") => true,
                        Some("false") => false,
                        Some(other) => {
                            return Err(DirectiveError::InvalidFlagValue {
                                flag: spec.name.to_string(),
                                value: other.to_string(),
                                message: "expected true or false".to_string(),
                            })
                        }
                    };
                    arguments.flags.insert(spec.name, FlagValue::Switch(enabled));
                }
                FlagKind::Value => {
                    let value = match inline {
                        Some(value) if !value.is_empty() => value.to_string(),
                        Some(_) => return Err(DirectiveError::MissingFlagValue(spec.name.to_string())),
                        None => match tokens.get(index) {
                            // A following known flag means the value was left out,
                            // anything else (even "-1") is taken as the value
                            Some(next) if !Self::is_declared_flag(next, specs) => {
                                index += 1;
                                next.value.clone()
                            }
                            _ => return Err(DirectiveError::MissingFlagValue(spec.name.to_string())),
                        },
                    };
                    arguments.flags.insert(spec.name, FlagValue::Value(value));
                }
                FlagKind::List => {
                    let mut values = Vec::new();
                    match inline {
                        Some(value) => values.push(value.to_string()),
                        None => {
                            while let Some(next) = tokens.get(index).filter(|next| !next.is_flag()) {
                                values.push(next.value.clone());
                                index += 1;
                            }
                        }
                    }

                    let entry = arguments
                        .flags
                        .entry(spec.name)
                        .or_insert_with(|| FlagValue::List(Vec::new()));
                    if let FlagValue::List(existing) = entry {
                        existing.extend(values);
                    }
                }
            }
        }

        if let Some(missing) = parameters.get(arguments.positionals.len()) {
            return Err(DirectiveError::MissingParameter(missing.to_string()));
        }

        Ok(arguments)
    }

    fn is_declared_flag(token: &Token, specs: &[FlagSpec]) -> bool {
        if !token.is_flag() {
            return false;
        }
        let name = token.value.split_once('=').map_or(token.value.as_str(), |(name, _)| name);
        specs.iter().any(|spec| spec.matches(name))
    }

    /// Positional parameter by index
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    /// Switch value, false when absent
    pub fn switch(&self, name: &str) -> bool {
        matches!(self.flags.get(name), Some(FlagValue::Switch(true)))
    }

    /// Single value, if given
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.flags.get(name) {
            Some(FlagValue::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Single value or `default`
    pub fn value_or(&self, name: &str, default: &str) -> String {
        self.value(name).unwrap_or(default).to_string()
    }

    /// All values of a list flag, in the order given
    pub fn list(&self, name: &str) -> &[String] {
        match self.flags.get(name) {
            Some(FlagValue::List(values)) => values,
            _ => &[],
        }
    }

    /// Value parsed as an integer greater than zero, or `default`
    pub fn positive_integer(&self, name: &str, default: u64) -> Result<u64> {
        let Some(raw) = self.value(name) else {
            return Ok(default);
        };

        // Digits only, `u64::from_str` would also take a leading '+'
        let digits = !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit());
        match raw.parse::<u64>() {
            Ok(value) if digits && value > 0 => Ok(value),
            _ => Err(DirectiveError::InvalidFlagValue {
                flag: name.to_string(),
                value: raw.to_string(),
                message: "expected a positive integer".to_string(),
            }),
        }
    }
}
