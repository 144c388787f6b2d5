use chrono::NaiveDate;
use planner_core::{
    DailyRecord, DailyRecordRepository, LegacyMigration, MemoryRecordStore, MigrationOutcome,
    MigrationState, RecordStore, LEGACY_DAILY_KEY,
};

fn date(value: &str) -> NaiveDate {
    planner_core::parse_date(value).unwrap()
}

fn legacy(on: &str) -> DailyRecord {
    let mut record = DailyRecord::empty(date(on));
    record.today_goal = "legacy goal".to_string();
    record.schedule[0] = "legacy 9am".to_string();
    record.summary = "legacy summary".to_string();
    record
}

fn store_legacy(store: &MemoryRecordStore, record: &DailyRecord) {
    store
        .set(LEGACY_DAILY_KEY, &serde_json::to_string(record).unwrap())
        .unwrap();
}

#[test]
fn no_legacy_key_loads_today() {
    let store = MemoryRecordStore::new();
    let repo = DailyRecordRepository::new(&store);

    let report = LegacyMigration::new().run(&repo, date("2024-03-15"));
    assert_eq!(report.outcome, MigrationOutcome::NoLegacy);
    assert_eq!(report.record, DailyRecord::empty(date("2024-03-15")));
}

#[test]
fn legacy_from_another_day_moves_under_its_own_date() {
    let store = MemoryRecordStore::new();
    let old = legacy("2024-01-01");
    store_legacy(&store, &old);
    let repo = DailyRecordRepository::new(&store);

    let report = LegacyMigration::new().run(&repo, date("2024-03-15"));

    assert_eq!(
        report.outcome,
        MigrationOutcome::MigratedOtherDate(date("2024-01-01"))
    );
    assert_eq!(report.record, DailyRecord::empty(date("2024-03-15")));
    assert_eq!(store.get(LEGACY_DAILY_KEY).unwrap(), None);
    assert!(store.get("planner_daily_2024-01-01").unwrap().is_some());
    assert_eq!(repo.load(date("2024-01-01")), old);
}

#[test]
fn legacy_from_today_becomes_the_active_record() {
    let store = MemoryRecordStore::new();
    let current = legacy("2024-03-15");
    store_legacy(&store, &current);
    let repo = DailyRecordRepository::new(&store);

    let report = LegacyMigration::new().run(&repo, date("2024-03-15"));

    assert_eq!(report.outcome, MigrationOutcome::MigratedToday);
    assert_eq!(report.record, current);
    assert_eq!(repo.load(date("2024-03-15")), current);
    assert_eq!(store.get(LEGACY_DAILY_KEY).unwrap(), None);
}

#[test]
fn legacy_overwrites_existing_record_for_its_date() {
    let store = MemoryRecordStore::new();
    let repo = DailyRecordRepository::new(&store);
    let mut existing = DailyRecord::empty(date("2024-01-01"));
    existing.memo = "newer but loses".to_string();
    repo.save(&existing).unwrap();
    let old = legacy("2024-01-01");
    store_legacy(&store, &old);

    LegacyMigration::new().run(&repo, date("2024-03-15"));

    assert_eq!(repo.load(date("2024-01-01")), old);
}

#[test]
fn undecodable_legacy_is_deleted_and_today_loads() {
    let store = MemoryRecordStore::new();
    store.set(LEGACY_DAILY_KEY, "not json at all").unwrap();
    let repo = DailyRecordRepository::new(&store);

    let report = LegacyMigration::new().run(&repo, date("2024-03-15"));

    assert_eq!(report.outcome, MigrationOutcome::DiscardedUndecodable);
    assert_eq!(report.record, DailyRecord::empty(date("2024-03-15")));
    assert_eq!(store.get(LEGACY_DAILY_KEY).unwrap(), None);
}

#[test]
fn migration_runs_once_per_process() {
    let store = MemoryRecordStore::new();
    store_legacy(&store, &legacy("2024-01-01"));
    let repo = DailyRecordRepository::new(&store);
    let mut migration = LegacyMigration::new();
    assert_eq!(migration.state(), MigrationState::Pending);

    migration.run(&repo, date("2024-03-15"));
    assert_eq!(migration.state(), MigrationState::Done);

    // A legacy payload appearing later is not picked up again.
    store_legacy(&store, &legacy("2024-02-02"));
    let report = migration.run(&repo, date("2024-03-15"));
    assert_eq!(report.outcome, MigrationOutcome::AlreadyDone);
    assert!(store.get(LEGACY_DAILY_KEY).unwrap().is_some());
    assert_eq!(
        repo.load(date("2024-02-02")),
        DailyRecord::empty(date("2024-02-02"))
    );
}

#[test]
fn repeated_startups_after_migration_never_recreate_legacy_key() {
    let store = MemoryRecordStore::new();
    let old = legacy("2024-01-01");
    store_legacy(&store, &old);
    let repo = DailyRecordRepository::new(&store);

    for _ in 0..3 {
        LegacyMigration::new().run(&repo, date("2024-03-15"));
        assert_eq!(store.get(LEGACY_DAILY_KEY).unwrap(), None);
        assert_eq!(repo.load(date("2024-01-01")), old);
    }
}

#[test]
fn failed_migration_write_keeps_legacy_payload() {
    let raw = serde_json::to_string(&legacy("2024-01-01")).unwrap();
    let store = MemoryRecordStore::with_quota(LEGACY_DAILY_KEY.len() + raw.len());
    store.set(LEGACY_DAILY_KEY, &raw).unwrap();
    let repo = DailyRecordRepository::new(&store);

    let report = LegacyMigration::new().run(&repo, date("2024-03-15"));

    assert_eq!(report.outcome, MigrationOutcome::WriteFailed);
    assert_eq!(store.get(LEGACY_DAILY_KEY).unwrap(), Some(raw));
    assert_eq!(report.record, DailyRecord::empty(date("2024-03-15")));
}
