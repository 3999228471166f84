//! Per-repository settings

use crate::error::{Result, SettingsError};
use crate::schema::{apply_fields, Field};
use crate::yaml::YamlFields;
use depot_core::directive::{ProxyEntry, StorageDirective};
use depot_core::RepositoryVisibility;
use depot_parser::{ProxyParser, StorageParser};
use serde_yaml::{Mapping, Value as YamlValue};

/// Storage directive of repositories that do not declare one
pub const DEFAULT_STORAGE_PROVIDER: &str = "fs --quota 100%";

/// `preserved` value that keeps every snapshot build
pub const PRESERVE_ALL: i64 = -1;

/// Settings of one repository
///
/// Directives are parsed once, when the configuration is built, and kept
/// next to their raw text. There are no setters: use [`to_builder`] and
/// swap the rebuilt configuration into a new document.
///
/// [`to_builder`]: RepositoryConfiguration::to_builder
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryConfiguration {
    visibility: RepositoryVisibility,
    redeployment: bool,
    preserved: i64,
    storage_provider: String,
    storage: StorageDirective,
    proxied_raw: Vec<String>,
    proxied: Vec<ProxyEntry>,
}

impl Default for RepositoryConfiguration {
    fn default() -> Self {
        Self {
            visibility: RepositoryVisibility::Public,
            redeployment: false,
            preserved: PRESERVE_ALL,
            storage_provider: DEFAULT_STORAGE_PROVIDER.to_string(),
            storage: StorageDirective::default(),
            proxied_raw: Vec::new(),
            proxied: Vec::new(),
        }
    }
}

impl RepositoryConfiguration {
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::default()
    }

    /// Builder holding this configuration's raw values
    pub fn to_builder(&self) -> RepositoryBuilder {
        RepositoryBuilder {
            visibility: self.visibility,
            redeployment: self.redeployment,
            preserved: self.preserved,
            storage_provider: self.storage_provider.clone(),
            proxied: self.proxied_raw.clone(),
        }
    }

    pub fn visibility(&self) -> RepositoryVisibility {
        self.visibility
    }

    /// Whether the same artifact version may be deployed again
    pub fn redeployment(&self) -> bool {
        self.redeployment
    }

    /// Raw `preserved` value, -1 keeps every snapshot build
    pub fn preserved(&self) -> i64 {
        self.preserved
    }

    /// How many builds of a snapshot version to keep, `None` keeps all
    pub fn preserved_builds(&self) -> Option<u64> {
        u64::try_from(self.preserved).ok()
    }

    /// Raw storage directive
    pub fn storage_provider(&self) -> &str {
        &self.storage_provider
    }

    pub fn storage(&self) -> &StorageDirective {
        &self.storage
    }

    /// Proxied entries in declaration order, which is lookup precedence
    pub fn proxied(&self) -> &[ProxyEntry] {
        &self.proxied
    }

    /// Raw proxied entries, parallel to [`proxied`](Self::proxied)
    pub fn proxied_raw(&self) -> &[String] {
        &self.proxied_raw
    }

    /// Names of the local repositories this one mirrors
    pub fn local_aliases(&self) -> impl Iterator<Item = &str> {
        self.proxied.iter().filter_map(|entry| match entry {
            ProxyEntry::LocalAlias { repository } => Some(repository.as_str()),
            ProxyEntry::Host(_) => None,
        })
    }

    /// Load from the YAML mapping of one repository
    pub(crate) fn from_yaml(name: &str, value: &YamlValue, context: &str) -> Result<Self> {
        let mut builder = RepositoryBuilder::default();
        apply_fields(&mut builder, value, REPOSITORY_FIELDS, context)?;
        builder.build(name)
    }

    /// Render back to YAML, directives in their raw form
    pub(crate) fn to_yaml(&self) -> YamlValue {
        let mut mapping = Mapping::new();
        mapping.insert("visibility".into(), self.visibility.as_str().into());
        mapping.insert("redeployment".into(), self.redeployment.into());
        mapping.insert("preserved".into(), self.preserved.into());
        mapping.insert("storageProvider".into(), self.storage_provider.clone().into());
        mapping.insert(
            "proxied".into(),
            YamlValue::Sequence(self.proxied_raw.iter().cloned().map(YamlValue::from).collect()),
        );
        YamlValue::Mapping(mapping)
    }
}

/// Raw values of a repository, validated by [`build`](RepositoryBuilder::build)
#[derive(Debug, Clone)]
pub struct RepositoryBuilder {
    visibility: RepositoryVisibility,
    redeployment: bool,
    preserved: i64,
    storage_provider: String,
    proxied: Vec<String>,
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self {
            visibility: RepositoryVisibility::Public,
            redeployment: false,
            preserved: PRESERVE_ALL,
            storage_provider: DEFAULT_STORAGE_PROVIDER.to_string(),
            proxied: Vec::new(),
        }
    }
}

impl RepositoryBuilder {
    pub fn visibility(mut self, visibility: RepositoryVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn redeployment(mut self, redeployment: bool) -> Self {
        self.redeployment = redeployment;
        self
    }

    pub fn preserved(mut self, preserved: i64) -> Self {
        self.preserved = preserved;
        self
    }

    pub fn storage_provider(mut self, directive: impl Into<String>) -> Self {
        self.storage_provider = directive.into();
        self
    }

    pub fn proxied<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxied = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and parse every directive
    ///
    /// `name` is only used to report which repository failed.
    pub fn build(self, name: &str) -> Result<RepositoryConfiguration> {
        if self.preserved < PRESERVE_ALL {
            return Err(SettingsError::invalid(
                format!("repositories.{}.preserved", name),
                format!("expected -1 or a non-negative number, got {}", self.preserved),
            ));
        }

        let directive_error = |directive: &str, source| SettingsError::Directive {
            repository: name.to_string(),
            directive: directive.to_string(),
            source,
        };

        let storage = StorageParser::parse(&self.storage_provider)
            .map_err(|e| directive_error(&self.storage_provider, e))?;

        let proxied = self
            .proxied
            .iter()
            .map(|entry| ProxyParser::parse(entry).map_err(|e| directive_error(entry, e)))
            .collect::<Result<Vec<_>>>()?;

        Ok(RepositoryConfiguration {
            visibility: self.visibility,
            redeployment: self.redeployment,
            preserved: self.preserved,
            storage_provider: self.storage_provider,
            storage,
            proxied_raw: self.proxied,
            proxied,
        })
    }
}

const REPOSITORY_FIELDS: &[Field<RepositoryBuilder>] = &[
    Field::new("visibility", |builder, value, field| {
        builder.visibility = YamlFields::as_parsed(value, field)?;
        Ok(())
    }),
    Field::new("redeployment", |builder, value, field| {
        builder.redeployment = YamlFields::as_bool(value, field)?;
        Ok(())
    }),
    Field::new("preserved", |builder, value, field| {
        builder.preserved = YamlFields::as_i64(value, field)?;
        Ok(())
    }),
    Field::new("storageProvider", |builder, value, field| {
        builder.storage_provider = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("proxied", |builder, value, field| {
        builder.proxied = YamlFields::as_string_list(value, field)?;
        Ok(())
    }),
];

#[cfg(test)]
mod tests {
    use super::*;
    use depot_parser::DirectiveError;

    #[test]
    fn test_default_matches_default_directive() {
        let built = RepositoryConfiguration::builder().build("releases").unwrap();
        assert_eq!(built, RepositoryConfiguration::default());
    }

    #[test]
    fn test_preserved_builds() {
        let all = RepositoryConfiguration::default();
        assert_eq!(all.preserved(), -1);
        assert_eq!(all.preserved_builds(), None);

        let capped = RepositoryConfiguration::builder().preserved(3).build("snapshots").unwrap();
        assert_eq!(capped.preserved_builds(), Some(3));

        let none = RepositoryConfiguration::builder().preserved(0).build("snapshots").unwrap();
        assert_eq!(none.preserved_builds(), Some(0));
    }

    #[test]
    fn test_preserved_below_minus_one_is_rejected() {
        let err = RepositoryConfiguration::builder().preserved(-2).build("snapshots").unwrap_err();
        assert!(err.to_string().contains("repositories.snapshots.preserved"));
    }

    #[test]
    fn test_directive_error_carries_repository_and_text() {
        let err = RepositoryConfiguration::builder()
            .proxied(["https://repo.example.com", "https://other.example.com --connectTimeout=0"])
            .build("releases")
            .unwrap_err();

        match &err {
            SettingsError::Directive {
                repository,
                directive,
                source,
            } => {
                assert_eq!(repository, "releases");
                assert_eq!(directive, "https://other.example.com --connectTimeout=0");
                assert!(matches!(source, DirectiveError::InvalidFlagValue { .. }));
            }
            other => panic!("Expected directive error, got {:?}", other),
        }
    }

    #[test]
    fn test_to_builder_round_trip() {
        let original = RepositoryConfiguration::builder()
            .visibility(RepositoryVisibility::Hidden)
            .redeployment(true)
            .storage_provider("s3 bucket --region eu-west-1")
            .proxied(["releases"])
            .build("mirror")
            .unwrap();

        let rebuilt = original.to_builder().build("mirror").unwrap();
        assert_eq!(rebuilt, original);

        let changed = original.to_builder().redeployment(false).build("mirror").unwrap();
        assert!(!changed.redeployment());
        assert!(original.redeployment());
    }

    #[test]
    fn test_local_aliases() {
        let config = RepositoryConfiguration::builder()
            .proxied(["https://repo.example.com", "releases", "snapshots"])
            .build("group")
            .unwrap();

        assert_eq!(config.local_aliases().collect::<Vec<_>>(), vec!["releases", "snapshots"]);
        assert_eq!(config.proxied().len(), config.proxied_raw().len());
    }
}
