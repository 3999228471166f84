//! Proxied repository entry parser
//!
//! An entry is either a remote host with flags or the bare name of another
//! repository on this instance:
//!
//! ```text
//! https://repo.example.com/releases --store --connectTimeout=3 --readTimeout=15 --auth user:token --allow=com.example --proxy host:port
//! local-repository-name
//! ```
//!
//! An entry is a host when its first token carries a URL scheme
//! (`<scheme>://`), otherwise it is a local alias.

use crate::error::{DirectiveError, Result};
use crate::flag_parser::{Arguments, FlagKind, FlagSpec};
use crate::tokenizer::{tokenize, Token};
use depot_core::directive::{
    HostDirective, ProxyEntry, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT,
};

const HOST_FLAGS: &[FlagSpec] = &[
    FlagSpec::new("--store", &[], FlagKind::Switch),
    FlagSpec::new("--connectTimeout", &[], FlagKind::Value),
    FlagSpec::new("--readTimeout", &[], FlagKind::Value),
    FlagSpec::new("--authorization", &["--auth"], FlagKind::Value),
    FlagSpec::new("--allow", &["--allowGroup"], FlagKind::List),
    FlagSpec::new("--proxy", &[], FlagKind::Value),
];

/// Proxied repository entry parser
pub struct ProxyParser;

impl ProxyParser {
    /// Parse one entry of a repository's proxied list
    pub fn parse(entry: &str) -> Result<ProxyEntry> {
        let tokens = tokenize(entry)?;

        let Some((first, rest)) = tokens.split_first() else {
            return Err(DirectiveError::MissingParameter("url".to_string()));
        };

        let parsed = if has_scheme(&first.value) {
            ProxyEntry::Host(parse_host(&first.value, rest)?)
        } else {
            parse_local_alias(&first.value, rest)?
        };

        log::debug!("Parsed proxied entry '{}' as {:?}", entry, parsed);
        Ok(parsed)
    }
}

/// `<alpha>[alnum + - .]*://`
fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parse_host(url: &str, tokens: &[Token]) -> Result<HostDirective> {
    let args = Arguments::parse(tokens, &[], HOST_FLAGS)?;

    Ok(HostDirective {
        url: url.to_string(),
        store: args.switch("--store"),
        connect_timeout: args.positive_integer("--connectTimeout", DEFAULT_CONNECT_TIMEOUT)?,
        read_timeout: args.positive_integer("--readTimeout", DEFAULT_READ_TIMEOUT)?,
        authorization: args.value("--authorization").map(str::to_string),
        allowed_groups: args
            .list("--allow")
            .iter()
            .filter(|group| !group.is_empty())
            .cloned()
            .collect(),
        proxy: args
            .value("--proxy")
            .filter(|proxy| !proxy.is_empty())
            .map(str::to_string),
    })
}

fn parse_local_alias(name: &str, rest: &[Token]) -> Result<ProxyEntry> {
    if let Some(extra) = rest.first() {
        return Err(if extra.is_flag() {
            let flag = extra.value.split_once('=').map_or(extra.value.as_str(), |(flag, _)| flag);
            DirectiveError::UnknownFlag(flag.to_string())
        } else {
            DirectiveError::UnexpectedArgument(extra.value.clone())
        });
    }

    if name.is_empty() {
        return Err(DirectiveError::MissingParameter("repository".to_string()));
    }

    Ok(ProxyEntry::LocalAlias {
        repository: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_detection() {
        assert!(has_scheme("https://repo.example.com"));
        assert!(has_scheme("http://localhost:8080/releases"));
        assert!(has_scheme("svn+ssh://host/path"));
        assert!(!has_scheme("releases"));
        assert!(!has_scheme("://host"));
        assert!(!has_scheme("1http://host"));
        assert!(!has_scheme("repo.example.com/releases"));
    }

    #[test]
    fn test_alias_rejects_flags() {
        assert_eq!(
            ProxyParser::parse("releases --store").unwrap_err(),
            DirectiveError::UnknownFlag("--store".to_string())
        );
        assert_eq!(
            ProxyParser::parse("releases --readTimeout=5").unwrap_err(),
            DirectiveError::UnknownFlag("--readTimeout".to_string())
        );
    }

    #[test]
    fn test_alias_rejects_extra_arguments() {
        assert_eq!(
            ProxyParser::parse("releases snapshots").unwrap_err(),
            DirectiveError::UnexpectedArgument("snapshots".to_string())
        );
    }

    #[test]
    fn test_empty_entry() {
        assert_eq!(
            ProxyParser::parse("  ").unwrap_err(),
            DirectiveError::MissingParameter("url".to_string())
        );
        assert_eq!(
            ProxyParser::parse(r#""""#).unwrap_err(),
            DirectiveError::MissingParameter("repository".to_string())
        );
    }
}
