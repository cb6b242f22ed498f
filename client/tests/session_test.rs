//! Integration tests for the session and the sync protocol.
//!
//! These run against the in-memory remote, which enforces the same
//! replace-if-unchanged semantics as the hosted-file API.

use till_client::{LocalStore, MemoryRemote, Mirror, Session};
use till_engine::{Inventory, LedgerSnapshot, Pesos, PriceTier, RemoveOutcome};

fn local_session(dir: &tempfile::TempDir) -> Session {
    let store = LocalStore::open(dir.path()).unwrap();
    Session::new(store, None).unwrap()
}

fn synced_session(dir: &tempfile::TempDir, remote: &MemoryRemote) -> Session {
    let store = LocalStore::open(dir.path()).unwrap();
    let mirror = Mirror::new(Box::new(remote.clone()));
    Session::new(store, Some(mirror)).unwrap()
}

fn remote_snapshot(remote: &MemoryRemote) -> LedgerSnapshot {
    LedgerSnapshot::from_json(&remote.content().expect("remote has a document")).unwrap()
}

#[tokio::test]
async fn local_state_survives_across_sessions() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut session = local_session(&dir);
        session.add_stock(PriceTier::P69, 10).unwrap();
        session
            .record_sale(PriceTier::P69, 2, Pesos::from_pesos(150))
            .unwrap();
    }

    let session = local_session(&dir);
    assert_eq!(session.ledger().inventory().count(PriceTier::P69), 8);
    assert_eq!(session.ledger().sales().len(), 1);
}

#[tokio::test]
async fn no_credential_mode_works_without_a_remote() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = local_session(&dir);

    assert!(!session.sync_enabled());
    session.startup().await.unwrap();

    session.add_stock(PriceTier::P99, 4).unwrap();
    let outcome = session.remove_stock(PriceTier::P99, 10, true).unwrap();
    assert!(matches!(outcome, RemoveOutcome::Removed { new_count: 0, .. }));

    session.sync_now().await; // no-op, must not error
    session.flush().await;
}

#[tokio::test]
async fn startup_pull_overwrites_local_wholesale() {
    let remote = MemoryRemote::new();

    // Seed the remote with another device's state
    let seeded = LedgerSnapshot::from_parts(&Inventory::with_counts(7, 3), Vec::new());
    let mut seeder = Mirror::new(Box::new(remote.clone()));
    seeder.push(&seeded).await.unwrap();

    // A device with diverged local data starts up
    let dir = tempfile::tempdir().unwrap();
    {
        let mut session = local_session(&dir);
        session.add_stock(PriceTier::P69, 100).unwrap();
    }
    let mut session = synced_session(&dir, &remote);
    session.startup().await.unwrap();

    // Remote won, local pre-pull data is gone
    assert_eq!(session.ledger().inventory().count(PriceTier::P69), 7);
    assert_eq!(session.ledger().inventory().count(PriceTier::P99), 3);

    // And the overwrite reached the local store too
    let reopened = local_session(&dir);
    assert_eq!(reopened.ledger().inventory().count(PriceTier::P69), 7);
}

#[tokio::test]
async fn startup_against_empty_remote_keeps_local_and_seeds_remote() {
    let remote = MemoryRemote::new();
    let dir = tempfile::tempdir().unwrap();

    {
        let mut session = local_session(&dir);
        session.add_stock(PriceTier::P69, 5).unwrap();
    }

    let mut session = synced_session(&dir, &remote);
    session.startup().await.unwrap();

    // Local state untouched by the empty pull, and pushed up to settle
    assert_eq!(session.ledger().inventory().count(PriceTier::P69), 5);
    assert_eq!(remote_snapshot(&remote).inventory69, 5);
}

#[tokio::test]
async fn mutations_mirror_to_the_remote() {
    let remote = MemoryRemote::new();
    let dir = tempfile::tempdir().unwrap();

    let mut session = synced_session(&dir, &remote);
    session.startup().await.unwrap();

    session.add_stock(PriceTier::P69, 5).unwrap();
    session.flush().await;
    assert_eq!(remote_snapshot(&remote).inventory69, 5);

    let receipt = session
        .record_sale(PriceTier::P69, 3, Pesos::from_pesos(250))
        .unwrap();
    assert_eq!(receipt.change, Pesos::from_pesos(43));
    session.flush().await;

    let mirrored = remote_snapshot(&remote);
    assert_eq!(mirrored.inventory69, 2);
    assert_eq!(mirrored.sales_records.len(), 1);
    assert_eq!(mirrored.sales_records[0].id, receipt.record.id);

    session.delete_sale(&receipt.record.id).unwrap();
    session.flush().await;

    let mirrored = remote_snapshot(&remote);
    assert_eq!(mirrored.inventory69, 5);
    assert!(mirrored.sales_records.is_empty());
}

#[tokio::test]
async fn concurrent_client_write_makes_our_push_stale() {
    let remote = MemoryRemote::new();

    let dir_a = tempfile::tempdir().unwrap();
    let mut session_a = synced_session(&dir_a, &remote);
    session_a.startup().await.unwrap();
    session_a.add_stock(PriceTier::P69, 1).unwrap();
    session_a.flush().await;

    // A second device pulls, then writes
    let dir_b = tempfile::tempdir().unwrap();
    let mut session_b = synced_session(&dir_b, &remote);
    session_b.startup().await.unwrap();
    session_b.add_stock(PriceTier::P99, 9).unwrap();
    session_b.flush().await;
    assert_eq!(remote_snapshot(&remote).inventory99, 9);

    // Device A pushes with its now-stale token: the push fails silently,
    // local state keeps the attempted value, remote is unchanged
    session_a.add_stock(PriceTier::P69, 1).unwrap();
    session_a.flush().await;

    assert_eq!(session_a.ledger().inventory().count(PriceTier::P69), 2);
    let current = remote_snapshot(&remote);
    assert_eq!(current.inventory99, 9);
    assert_eq!(current.inventory69, 1);
}

#[tokio::test]
async fn rejected_sale_does_not_sync_or_mutate() {
    let remote = MemoryRemote::new();
    let dir = tempfile::tempdir().unwrap();

    let mut session = synced_session(&dir, &remote);
    session.startup().await.unwrap();
    session.add_stock(PriceTier::P69, 5).unwrap();
    session.flush().await;

    // 3 * 69 = 207 > 200: rejected before any mutation
    let result = session.record_sale(PriceTier::P69, 3, Pesos::from_pesos(200));
    assert!(result.is_err());
    session.flush().await;

    assert_eq!(session.ledger().inventory().count(PriceTier::P69), 5);
    assert_eq!(remote_snapshot(&remote).inventory69, 5);
    assert!(remote_snapshot(&remote).sales_records.is_empty());
}

#[tokio::test]
async fn export_csv_writes_the_contract_columns() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = local_session(&dir);

    session.add_stock(PriceTier::P99, 2).unwrap();
    session
        .record_sale(PriceTier::P99, 1, Pesos::from_pesos(100))
        .unwrap();

    let out = dir.path().join("sales_records.csv");
    session.export_csv(&out).unwrap();

    let csv = std::fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Date/Time,Price,Quantity,Paid,Total,Change"
    );
    let row = lines.next().unwrap();
    assert!(row.contains(",99,1,100.00,99.00,1.00"));
}
