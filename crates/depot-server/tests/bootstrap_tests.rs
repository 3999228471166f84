//! Bootstrap, reload and flush loop tests

use depot_core::{Identifier, ResolvedRequestsInterval};
use depot_server::{Depot, ServerConfig, ServerError};
use depot_settings::SharedConfiguration;
use std::time::Duration;

fn config_for(dir: &tempfile::TempDir) -> ServerConfig {
    ServerConfig {
        settings_path: dir.path().join("depot.yaml"),
        ..ServerConfig::default()
    }
}

// =============================================================================
// Bootstrap Tests
// =============================================================================

#[test]
fn test_bootstrap_writes_default_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);

    let depot = Depot::bootstrap(&config).unwrap();

    assert!(config.settings_path.exists());
    let written = SharedConfiguration::from_file(&config.settings_path).unwrap();
    assert_eq!(&written, depot.settings().current().document());
    assert_eq!(written.repositories.len(), 3);
}

#[test]
fn test_bootstrap_loads_existing_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);
    std::fs::write(
        &config.settings_path,
        "id: company\nstatistics:\n  resolvedRequestsInterval: daily\n",
    )
    .unwrap();

    let depot = Depot::bootstrap(&config).unwrap();

    assert_eq!(depot.settings().current().document().id, "company");
    assert_eq!(depot.statistics().interval(), ResolvedRequestsInterval::Daily);
}

#[test]
fn test_bootstrap_fails_on_invalid_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);
    std::fs::write(
        &config.settings_path,
        "repositories:\n  releases:\n    storageProvider: ftp somewhere\n",
    )
    .unwrap();

    let err = Depot::bootstrap(&config).err().unwrap();
    assert!(matches!(err, ServerError::Settings { .. }));
}

// =============================================================================
// Reload Tests
// =============================================================================

#[test]
fn test_reload_publishes_and_updates_interval() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);
    let depot = Depot::bootstrap(&config).unwrap();

    std::fs::write(&config.settings_path, "statistics:\n  resolvedRequestsInterval: yearly\n").unwrap();

    assert_eq!(depot.reload().unwrap(), 2);
    assert_eq!(depot.statistics().interval(), ResolvedRequestsInterval::Yearly);
}

#[test]
fn test_failed_reload_keeps_running_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);
    let depot = Depot::bootstrap(&config).unwrap();

    std::fs::write(&config.settings_path, "basePath: [not, a, string]\n").unwrap();

    assert!(depot.reload().is_err());
    assert_eq!(depot.settings().current().version(), 1);
    assert_eq!(depot.statistics().interval(), ResolvedRequestsInterval::Monthly);
}

// =============================================================================
// Flush Loop Tests
// =============================================================================

#[tokio::test]
async fn test_run_until_flushes_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let depot = Depot::bootstrap(&config_for(&dir)).unwrap();

    depot.statistics().record_resolved(Identifier::new("releases", "a/1.0"));
    depot.statistics().record_resolved(Identifier::new("releases", "a/1.0"));

    // Period far beyond the test, only the final flush runs
    depot.run_until(Duration::from_secs(3600), async {}).await;

    assert_eq!(depot.statistics().pending_len(), 0);
    assert_eq!(depot.statistics().count_resolved_requests(), 2);
}

#[tokio::test]
async fn test_run_until_flushes_periodically() {
    let dir = tempfile::tempdir().unwrap();
    let depot = Depot::bootstrap(&config_for(&dir)).unwrap();
    let statistics = depot.statistics().clone();

    let shutdown = async move {
        statistics.record_resolved(Identifier::new("releases", "b/1.0"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        // Flushed by a tick before shutdown
        assert_eq!(statistics.pending_len(), 0);
        assert_eq!(statistics.count_resolved_requests(), 1);
    };

    depot.run_until(Duration::from_millis(20), shutdown).await;
    assert_eq!(depot.statistics().count_resolved_requests(), 1);
}
