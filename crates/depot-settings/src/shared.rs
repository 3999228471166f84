//! Shared configuration document
//!
//! Top-level settings of a Depot instance: scalar server settings, the map of
//! named repositories, and the statistics and directory-service blocks.
//!
//! ```yaml
//! id: depot-repository
//! title: Depot Repository
//! basePath: /
//! repositories:
//!   releases:
//!     visibility: public
//!     redeployment: false
//!     preserved: -1
//!     storageProvider: fs --quota 100%
//!     proxied:
//!       - https://repo.maven.apache.org/maven2 --store --allow=org.apache
//!   snapshots: {}
//! statistics:
//!   resolvedRequestsInterval: monthly
//! ldap:
//!   enabled: false
//! ```

use crate::error::{Result, SettingsError};
use crate::repository::RepositoryConfiguration;
use crate::schema::{apply_fields, path, Field};
use crate::yaml::YamlFields;
use depot_core::{AccessTokenType, RepositoryVisibility, ResolvedRequestsInterval};
use serde_yaml::{Mapping, Value as YamlValue};
use std::collections::BTreeMap;
use std::path::Path;

/// Statistics block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsConfiguration {
    /// How finely persistent backends split recorded requests
    pub resolved_requests_interval: ResolvedRequestsInterval,
}

/// Directory service (LDAP) authentication block
///
/// Carried as plain settings; nothing in this workspace connects to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapConfiguration {
    pub enabled: bool,
    pub hostname: String,
    pub port: u16,
    /// Base DN with users
    pub base_dn: String,
    /// User allowed to read all entries
    pub search_user_dn: String,
    pub search_user_password: String,
    /// Attribute holding the unique username
    pub user_attribute: String,
    pub user_filter: String,
    /// Type of the access tokens created for directory users
    pub user_type: AccessTokenType,
}

impl Default for LdapConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            hostname: "ldap.domain.com".to_string(),
            port: 389,
            base_dn: "dc=company,dc=com".to_string(),
            search_user_dn: "cn=depot,ou=admins,dc=domain,dc=com".to_string(),
            search_user_password: "depot-admin-secret".to_string(),
            user_attribute: "cn".to_string(),
            user_filter: "(&(objectClass=person)(ou=Maven Users))".to_string(),
            user_type: AccessTokenType::Persistent,
        }
    }
}

/// Shared configuration document
///
/// Built once by [`from_yaml_str`](Self::from_yaml_str), which normalizes it,
/// and then only read. A reload builds a new document.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedConfiguration {
    /// Repository id used in Maven repository configuration
    pub id: String,
    pub title: String,
    pub description: String,
    pub organization_website: String,
    pub organization_logo: String,
    /// Internet Content Provider license number, required to operate in China
    pub icp_license: String,
    /// Serve the default frontend with dashboard
    pub frontend: bool,
    /// Serve Swagger docs and UI
    pub swagger: bool,
    /// Path prefix of every route, `/` delimited on both sides or empty
    pub base_path: String,
    pub repositories: BTreeMap<String, RepositoryConfiguration>,
    pub statistics: StatisticsConfiguration,
    pub ldap: LdapConfiguration,
    /// Header carrying the client address behind a reverse proxy
    pub forwarded_ip: String,
}

impl Default for SharedConfiguration {
    fn default() -> Self {
        Self {
            id: "depot-repository".to_string(),
            title: "Depot Repository".to_string(),
            description: "Public Maven repository hosted through Depot".to_string(),
            organization_website: "https://depot.dev".to_string(),
            organization_logo: "https://depot.dev/logo.png".to_string(),
            icp_license: String::new(),
            frontend: true,
            swagger: false,
            base_path: "/".to_string(),
            repositories: default_repositories(),
            statistics: StatisticsConfiguration::default(),
            ldap: LdapConfiguration::default(),
            forwarded_ip: "X-Forwarded-For".to_string(),
        }
    }
}

/// `releases`, `snapshots` and a private `private`
fn default_repositories() -> BTreeMap<String, RepositoryConfiguration> {
    let private = RepositoryConfiguration::builder()
        .visibility(RepositoryVisibility::Private)
        .build("private")
        .unwrap_or_default();

    BTreeMap::from([
        ("releases".to_string(), RepositoryConfiguration::default()),
        ("snapshots".to_string(), RepositoryConfiguration::default()),
        ("private".to_string(), private),
    ])
}

impl SharedConfiguration {
    /// Load and normalize a document from YAML text
    ///
    /// Fails on the first invalid field or directive; an empty document
    /// yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let value = YamlFields::parse(yaml)?;

        let mut document = SharedConfiguration::default();
        apply_fields(&mut document, &value, DOCUMENT_FIELDS, "")?;
        document.normalize();
        document.check_local_aliases();

        tracing::debug!(
            "Loaded configuration '{}' with {} repositories",
            document.id,
            document.repositories.len()
        );
        Ok(document)
    }

    /// Load and normalize a document from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::info!("Loading configuration from {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Write the document as YAML, directives in their raw form
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_yaml())?)
    }

    pub fn repository(&self, name: &str) -> Option<&RepositoryConfiguration> {
        self.repositories.get(name)
    }

    /// Copy of this document with one repository added or replaced
    pub fn with_repository(&self, name: impl Into<String>, repository: RepositoryConfiguration) -> Self {
        let mut document = self.clone();
        document.repositories.insert(name.into(), repository);
        document.check_local_aliases();
        document
    }

    /// Post-load normalization, idempotent
    ///
    /// Also applied by [`SettingsHandle`](crate::SettingsHandle) to documents
    /// built or edited in code.
    pub(crate) fn normalize(&mut self) {
        self.base_path = normalize_base_path(&self.base_path);
    }

    pub(crate) fn check_local_aliases(&self) {
        for (name, repository) in &self.repositories {
            for alias in repository.local_aliases() {
                if alias == name {
                    tracing::warn!("Repository '{}' proxies itself", name);
                } else if !self.repositories.contains_key(alias) {
                    tracing::warn!(
                        "Repository '{}' proxies unknown local repository '{}'",
                        name,
                        alias
                    );
                }
            }
        }
    }

    fn to_yaml(&self) -> YamlValue {
        let mut repositories = Mapping::new();
        for (name, repository) in &self.repositories {
            repositories.insert(name.as_str().into(), repository.to_yaml());
        }

        let mut statistics = Mapping::new();
        statistics.insert(
            "resolvedRequestsInterval".into(),
            self.statistics.resolved_requests_interval.as_str().into(),
        );

        let ldap = &self.ldap;
        let mut ldap_mapping = Mapping::new();
        ldap_mapping.insert("enabled".into(), ldap.enabled.into());
        ldap_mapping.insert("hostname".into(), ldap.hostname.as_str().into());
        ldap_mapping.insert("port".into(), ldap.port.into());
        ldap_mapping.insert("baseDn".into(), ldap.base_dn.as_str().into());
        ldap_mapping.insert("searchUserDn".into(), ldap.search_user_dn.as_str().into());
        ldap_mapping.insert("searchUserPassword".into(), ldap.search_user_password.as_str().into());
        ldap_mapping.insert("userAttribute".into(), ldap.user_attribute.as_str().into());
        ldap_mapping.insert("userFilter".into(), ldap.user_filter.as_str().into());
        ldap_mapping.insert("userType".into(), ldap.user_type.as_str().into());

        let mut mapping = Mapping::new();
        mapping.insert("id".into(), self.id.as_str().into());
        mapping.insert("title".into(), self.title.as_str().into());
        mapping.insert("description".into(), self.description.as_str().into());
        mapping.insert("organizationWebsite".into(), self.organization_website.as_str().into());
        mapping.insert("organizationLogo".into(), self.organization_logo.as_str().into());
        mapping.insert("icpLicense".into(), self.icp_license.as_str().into());
        mapping.insert("frontend".into(), self.frontend.into());
        mapping.insert("swagger".into(), self.swagger.into());
        mapping.insert("basePath".into(), self.base_path.as_str().into());
        mapping.insert("repositories".into(), YamlValue::Mapping(repositories));
        mapping.insert("statistics".into(), YamlValue::Mapping(statistics));
        mapping.insert("ldap".into(), YamlValue::Mapping(ldap_mapping));
        mapping.insert("forwardedIp".into(), self.forwarded_ip.as_str().into());
        YamlValue::Mapping(mapping)
    }
}

/// Delimit a non-empty base path with `/` on both sides
///
/// An empty path means "no prefix" and stays empty. Idempotent.
pub fn normalize_base_path(base_path: &str) -> String {
    if base_path.is_empty() {
        return String::new();
    }

    let mut normalized = String::with_capacity(base_path.len() + 2);
    if !base_path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(base_path);
    if !base_path.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

fn apply_repositories(
    document: &mut SharedConfiguration,
    value: &YamlValue,
    field: &str,
) -> Result<()> {
    let mapping = value.as_mapping().ok_or_else(|| {
        SettingsError::invalid(field, format!("expected a mapping, got {}", YamlFields::kind(value)))
    })?;

    // A declared map replaces the presets wholesale
    let mut repositories = BTreeMap::new();
    for (key, repository) in mapping {
        let name = key
            .as_str()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SettingsError::invalid(field, "repository names must be non-empty strings"))?;

        let configuration = RepositoryConfiguration::from_yaml(name, repository, &path(field, name))?;
        repositories.insert(name.to_string(), configuration);
    }

    document.repositories = repositories;
    Ok(())
}

const DOCUMENT_FIELDS: &[Field<SharedConfiguration>] = &[
    Field::new("id", |doc, value, field| {
        doc.id = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("title", |doc, value, field| {
        doc.title = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("description", |doc, value, field| {
        doc.description = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("organizationWebsite", |doc, value, field| {
        doc.organization_website = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("organizationLogo", |doc, value, field| {
        doc.organization_logo = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("icpLicense", |doc, value, field| {
        doc.icp_license = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("frontend", |doc, value, field| {
        doc.frontend = YamlFields::as_bool(value, field)?;
        Ok(())
    }),
    Field::new("swagger", |doc, value, field| {
        doc.swagger = YamlFields::as_bool(value, field)?;
        Ok(())
    }),
    Field::new("basePath", |doc, value, field| {
        doc.base_path = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("repositories", apply_repositories),
    Field::new("statistics", |doc, value, field| {
        apply_fields(&mut doc.statistics, value, STATISTICS_FIELDS, field)
    }),
    Field::new("ldap", |doc, value, field| {
        apply_fields(&mut doc.ldap, value, LDAP_FIELDS, field)
    }),
    Field::new("forwardedIp", |doc, value, field| {
        doc.forwarded_ip = YamlFields::as_string(value, field)?;
        Ok(())
    }),
];

const STATISTICS_FIELDS: &[Field<StatisticsConfiguration>] = &[Field::new(
    "resolvedRequestsInterval",
    |statistics, value, field| {
        statistics.resolved_requests_interval = YamlFields::as_parsed(value, field)?;
        Ok(())
    },
)];

const LDAP_FIELDS: &[Field<LdapConfiguration>] = &[
    Field::new("enabled", |ldap, value, field| {
        ldap.enabled = YamlFields::as_bool(value, field)?;
        Ok(())
    }),
    Field::new("hostname", |ldap, value, field| {
        ldap.hostname = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("port", |ldap, value, field| {
        let port = YamlFields::as_i64(value, field)?;
        ldap.port = u16::try_from(port)
            .map_err(|_| SettingsError::invalid(field, format!("port {} is out of range", port)))?;
        Ok(())
    }),
    Field::new("baseDn", |ldap, value, field| {
        ldap.base_dn = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("searchUserDn", |ldap, value, field| {
        ldap.search_user_dn = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("searchUserPassword", |ldap, value, field| {
        ldap.search_user_password = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("userAttribute", |ldap, value, field| {
        ldap.user_attribute = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("userFilter", |ldap, value, field| {
        ldap.user_filter = YamlFields::as_string(value, field)?;
        Ok(())
    }),
    Field::new("userType", |ldap, value, field| {
        ldap.user_type = YamlFields::as_parsed(value, field)?;
        Ok(())
    }),
];
