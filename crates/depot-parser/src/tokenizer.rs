//! Directive tokenizer
//!
//! Splits a directive on whitespace. Single or double quotes group
//! characters (spaces included) into one token and are removed, so
//! `--auth "user:pass word"` yields `--auth` and `user:pass word`.

use crate::error::{DirectiveError, Result};

/// One word of a directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    /// Token contained quoted text, so it is never read as a flag
    pub quoted: bool,
}

impl Token {
    /// Plain token, mostly for tests
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    /// `-x`, `--name` or `--name=value`
    pub fn is_flag(&self) -> bool {
        !self.quoted && self.value.len() > 1 && self.value.starts_with('-')
    }
}

/// Split a directive into tokens
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                quoted = true;
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(Token {
                        value: std::mem::take(&mut current),
                        quoted,
                    });
                    in_token = false;
                    quoted = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(DirectiveError::UnterminatedQuote(input.to_string()));
    }

    if in_token {
        tokens.push(Token {
            value: current,
            quoted,
        });
    }

    Ok(tokens)
}
