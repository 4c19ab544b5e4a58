//! Integration tests for the plate registry.
//!
//! Tests cover:
//! - Registering plates and the uniqueness of plate numbers
//! - Authorization lookups
//! - Deleting and renaming plates
//! - Clearing the registry together with the gate logs
//! - Persistence across close and reopen

mod common;

use common::*;

#[tokio::test]
async fn test_register_same_plate_twice() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;

    assert_eq!(registry.register_plate("ABC123").await?, RegisterOutcome::Registered);
    assert_eq!(registry.register_plate("ABC123").await?, RegisterOutcome::AlreadyExists);

    let plates: Vec<RegisteredPlate> = registry.get_plates().await?;
    assert_eq!(plates.len(), 1);
    assert_eq!(plates[0].plate_number, "ABC123");

    Ok(())
}

#[tokio::test]
async fn test_is_authorized() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    registry.register_plate("KA01AB1234").await?;

    assert!(registry.is_authorized("KA01AB1234").await?);
    assert!(!registry.is_authorized("KA01AB1235").await?);
    // Lookups are exact
    assert!(!registry.is_authorized("ka01ab1234").await?);
    assert!(!registry.is_authorized("").await?);

    Ok(())
}

#[tokio::test]
async fn test_get_plates_in_registration_order() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    for plate in ["ZZ999", "AA111", "MM555"] {
        registry.register_plate(plate).await?;
    }

    let plates: Vec<String> = registry
        .get_plates()
        .await?
        .into_iter()
        .map(|p| p.plate_number)
        .collect();
    assert_eq!(plates, vec!["ZZ999", "AA111", "MM555"]);

    Ok(())
}

#[tokio::test]
async fn test_delete_plate() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    registry.register_plate("DEL001").await?;

    assert_eq!(registry.delete_plate("DEL001").await?, DeleteOutcome::Deleted);
    assert!(!registry.is_authorized("DEL001").await?);

    // Second delete finds nothing
    assert_eq!(registry.delete_plate("DEL001").await?, DeleteOutcome::NotFound);
    assert!(registry.get_plates().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_rename_plate() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    registry.register_plate("OLD111").await?;

    assert_eq!(registry.rename_plate("OLD111", "NEW222").await?, RenameOutcome::Renamed);
    assert!(!registry.is_authorized("OLD111").await?);
    assert!(registry.is_authorized("NEW222").await?);

    Ok(())
}

#[tokio::test]
async fn test_rename_unknown_plate() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    registry.register_plate("KEEP01").await?;

    assert_eq!(registry.rename_plate("GHOST1", "NEW222").await?, RenameOutcome::NotFound);
    assert!(!registry.is_authorized("NEW222").await?);

    Ok(())
}

#[tokio::test]
async fn test_rename_onto_existing_plate_conflicts() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    registry.register_plate("FIRST1").await?;
    registry.register_plate("SECOND").await?;

    assert_eq!(registry.rename_plate("FIRST1", "SECOND").await?, RenameOutcome::Conflict);

    // Both rows are untouched
    let plates: Vec<String> = registry
        .get_plates()
        .await?
        .into_iter()
        .map(|p| p.plate_number)
        .collect();
    assert_eq!(plates, vec!["FIRST1", "SECOND"]);

    Ok(())
}

#[tokio::test]
async fn test_clear_all_empties_plates_and_logs() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    registry.register_plate("CLR001").await?;
    registry.register_plate("CLR002").await?;
    registry.log_entry("CLR001").await?;
    registry.log_exit("CLR001").await?;

    registry.clear_all().await?;

    assert!(registry.get_plates().await?.is_empty());
    assert!(registry.get_entry_logs().await?.is_empty());
    assert!(registry.get_exit_logs().await?.is_empty());
    assert!(!registry.is_authorized("CLR001").await?);

    // Registry stays usable
    assert_eq!(registry.register_plate("CLR001").await?, RegisterOutcome::Registered);

    Ok(())
}

#[tokio::test]
async fn test_registry_persists_across_reopen() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("gate.db");

    let registry = PlateRegistry::open(&path).await?;
    registry.register_plate("KEEP42").await?;
    registry.log_entry("KEEP42").await?;
    registry.close().await?;

    let reopened = PlateRegistry::open(&path).await?;
    assert_eq!(reopened.db_file(), path.as_path());
    assert!(reopened.is_authorized("KEEP42").await?);
    assert_eq!(reopened.get_entry_logs().await?.len(), 1);
    reopened.close().await?;

    Ok(())
}
