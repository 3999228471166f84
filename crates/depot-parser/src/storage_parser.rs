//! Storage directive parser
//!
//! Parses the `storageProvider` setting of a repository:
//!
//! ```text
//! fs [--quota <90%|500MB|10GB>] [--mount <path>]
//! s3 <bucket-name> [--endpoint <url>] [--access-key <key>] [--secret-key <key>] [--region <region>]
//! ```

use crate::error::{DirectiveError, Result};
use crate::flag_parser::{Arguments, FlagKind, FlagSpec};
use crate::tokenizer::{tokenize, Token};
use depot_core::directive::{FileSystemSettings, Quota, S3Settings, StorageDirective, DEFAULT_QUOTA};

type ProviderParser = fn(&[Token]) -> Result<StorageDirective>;

/// Keyword to parser lookup. A new provider needs a variant and an entry here.
const PROVIDERS: &[(&str, ProviderParser)] = &[("fs", parse_file_system), ("s3", parse_s3)];

const FILE_SYSTEM_FLAGS: &[FlagSpec] = &[
    FlagSpec::new("--quota", &["-q"], FlagKind::Value),
    FlagSpec::new("--mount", &["-m"], FlagKind::Value),
];

const S3_PARAMETERS: &[&str] = &["bucket-name"];

const S3_FLAGS: &[FlagSpec] = &[
    FlagSpec::new("--endpoint", &["-e"], FlagKind::Value),
    FlagSpec::new("--access-key", &["-a"], FlagKind::Value),
    FlagSpec::new("--secret-key", &["-s"], FlagKind::Value),
    FlagSpec::new("--region", &["-r"], FlagKind::Value),
];

/// Storage directive parser
pub struct StorageParser;

impl StorageParser {
    /// Parse a storage directive
    pub fn parse(directive: &str) -> Result<StorageDirective> {
        let tokens = tokenize(directive)?;

        let keyword = tokens.first().map(|token| token.value.as_str()).unwrap_or_default();
        let (_, parser) = PROVIDERS
            .iter()
            .find(|(name, _)| *name == keyword)
            .ok_or_else(|| DirectiveError::UnknownStorageProvider(keyword.to_string()))?;

        let storage = parser(&tokens[1..])?;
        log::debug!("Parsed storage directive '{}' as {:?}", directive, storage);
        Ok(storage)
    }

    /// Keywords of all supported providers
    pub fn providers() -> impl Iterator<Item = &'static str> {
        PROVIDERS.iter().map(|(name, _)| *name)
    }
}

fn parse_file_system(tokens: &[Token]) -> Result<StorageDirective> {
    let args = Arguments::parse(tokens, &[], FILE_SYSTEM_FLAGS)?;

    let quota = args.value_or("--quota", DEFAULT_QUOTA);
    if quota.parse::<Quota>().is_err() {
        return Err(DirectiveError::InvalidQuotaFormat(quota));
    }

    Ok(StorageDirective::FileSystem(FileSystemSettings {
        quota,
        mount: args.value_or("--mount", ""),
    }))
}

fn parse_s3(tokens: &[Token]) -> Result<StorageDirective> {
    let args = Arguments::parse(tokens, S3_PARAMETERS, S3_FLAGS)?;

    Ok(StorageDirective::S3(S3Settings {
        bucket: args.positional(0).unwrap_or_default().to_string(),
        endpoint: args.value_or("--endpoint", ""),
        access_key: args.value_or("--access-key", ""),
        secret_key: args.value_or("--secret-key", ""),
        region: args.value_or("--region", ""),
    }))
}
