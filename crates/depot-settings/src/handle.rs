//! Published configuration snapshots
//!
//! Readers take an `Arc` to the whole current document; writers build a
//! complete new document first and then swap the pointer.

use crate::error::Result;
use crate::shared::SharedConfiguration;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// One published version of the configuration document
#[derive(Debug)]
pub struct SettingsSnapshot {
    version: u64,
    document: SharedConfiguration,
}

impl SettingsSnapshot {
    /// Starts at 1 and grows by one with every publish
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn document(&self) -> &SharedConfiguration {
        &self.document
    }
}

/// Current configuration of a running instance
#[derive(Debug)]
pub struct SettingsHandle {
    current: RwLock<Arc<SettingsSnapshot>>,
}

impl SettingsHandle {
    pub fn new(mut document: SharedConfiguration) -> Self {
        document.normalize();
        Self {
            current: RwLock::new(Arc::new(SettingsSnapshot {
                version: 1,
                document,
            })),
        }
    }

    /// The snapshot published last
    ///
    /// Holding the returned `Arc` pins that version; later publishes do not
    /// affect it.
    pub fn current(&self) -> Arc<SettingsSnapshot> {
        self.current.read().clone()
    }

    /// Normalize `document`, install it as the next version and return that
    /// version
    pub fn publish(&self, mut document: SharedConfiguration) -> u64 {
        document.normalize();
        document.check_local_aliases();
        self.install(document)
    }

    /// Parse `yaml` and publish it; on failure the current snapshot stays
    pub fn reload_from_str(&self, yaml: &str) -> Result<u64> {
        let document = SharedConfiguration::from_yaml_str(yaml).map_err(|e| {
            tracing::warn!("Configuration reload failed, keeping current version: {}", e);
            e
        })?;
        // Already normalized and checked by the loader
        Ok(self.install(document))
    }

    fn install(&self, document: SharedConfiguration) -> u64 {
        let mut current = self.current.write();
        let version = current.version + 1;
        *current = Arc::new(SettingsSnapshot { version, document });
        drop(current);

        tracing::info!("Published configuration version {}", version);
        version
    }

    /// Read `path` and publish it; on failure the current snapshot stays
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<u64> {
        let content = std::fs::read_to_string(path)?;
        self.reload_from_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::RepositoryVisibility;

    #[test]
    fn test_new_handle_starts_at_version_one() {
        let handle = SettingsHandle::new(SharedConfiguration::default());
        let snapshot = handle.current();

        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.document(), &SharedConfiguration::default());
    }

    #[test]
    fn test_publish_increments_version() {
        let handle = SettingsHandle::new(SharedConfiguration::default());

        let mut document = SharedConfiguration::default();
        document.title = "Internal".to_string();

        assert_eq!(handle.publish(document.clone()), 2);
        assert_eq!(handle.publish(document), 3);
        assert_eq!(handle.current().document().title, "Internal");
    }

    #[test]
    fn test_documents_built_in_code_are_normalized() {
        let mut document = SharedConfiguration::default();
        document.base_path = "api".to_string();

        let handle = SettingsHandle::new(document.clone());
        assert_eq!(handle.current().document().base_path, "/api/");

        document.base_path = "/v2".to_string();
        handle.publish(document);
        assert_eq!(handle.current().document().base_path, "/v2/");
    }

    #[test]
    fn test_held_snapshot_is_not_affected_by_publish() {
        let handle = SettingsHandle::new(SharedConfiguration::default());
        let before = handle.current();

        handle.reload_from_str("title: Changed").unwrap();

        assert_eq!(before.version(), 1);
        assert_eq!(before.document().title, "Depot Repository");
        assert_eq!(handle.current().document().title, "Changed");
    }

    #[test]
    fn test_failed_reload_keeps_current_snapshot() {
        let handle = SettingsHandle::new(SharedConfiguration::default());

        let result = handle.reload_from_str("repositories:\n  releases:\n    storageProvider: ftp host");
        assert!(result.is_err());

        let snapshot = handle.current();
        assert_eq!(snapshot.version(), 1);
        assert_eq!(
            snapshot.document().repository("private").unwrap().visibility(),
            RepositoryVisibility::Private
        );
    }

    #[test]
    fn test_concurrent_readers_see_whole_documents() {
        let handle = SettingsHandle::new(SharedConfiguration::default());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let snapshot = handle.current();
                        let document = snapshot.document();
                        // Every published document pairs title and id
                        assert_eq!(
                            document.title == "Depot Repository",
                            document.id == "depot-repository"
                        );
                    }
                });
            }

            scope.spawn(|| {
                for round in 0..50 {
                    let yaml = format!("id: depot-{}\ntitle: Round {}", round, round);
                    handle.reload_from_str(&yaml).unwrap();
                }
            });
        });

        assert_eq!(handle.current().version(), 51);
    }
}
