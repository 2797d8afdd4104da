mod common;

use common::{CenterSink, EPOCH_MS, draw, engine, engine_with, numbered, people};
use raffle_abi::{DisplayMode, Remaining};
use raffle_core::{LoadSource, MemoryStorage, SpinConfig, StorageError};

#[test]
fn reload_reproduces_roster_history_and_counter() {
    let mut first = engine_with(people(&[("A", 1), ("B", 0), ("C", 3)]), 31);
    let mut sink = CenterSink::default();
    for _ in 0..3 {
        draw(&mut first, &mut sink, 2);
    }
    let mut settings = first.store().settings().clone();
    settings.display_mode = DisplayMode::Phone;
    first.update_settings(settings).unwrap();

    let saved = first.store().storage().clone();
    let mut second = engine(MemoryStorage::new(), 99, SpinConfig::default());
    *second.storage_mut() = saved;
    let report = second.load(false);

    assert_eq!(report.source, LoadSource::Restored);
    assert_eq!(report.storage_error, None);
    assert_eq!(second.store().participants(), first.store().participants());
    assert_eq!(second.store().winners(), first.store().winners());
    assert_eq!(second.store().draw_counter(), 3);
    assert_eq!(second.store().settings(), first.store().settings());
    assert_eq!(second.store().participants()[1].remaining, Remaining::Unbounded);
}

#[test]
fn unsaved_draw_is_lost_on_reload_but_kept_in_session() {
    let mut first = engine_with(numbered(4), 41);
    let mut sink = CenterSink::default();
    draw(&mut first, &mut sink, 1);
    first.storage_mut().fail_writes_with(StorageError::QuotaExceeded);
    draw(&mut first, &mut sink, 1);
    assert_eq!(first.store().draw_counter(), 2);

    let mut saved = first.store().storage().clone();
    saved.heal();
    let mut second = engine(saved, 42, SpinConfig::default());
    second.load(false);
    assert_eq!(second.store().draw_counter(), 1);
    assert_eq!(second.store().winners().len(), 1);
}

#[test]
fn demo_roster_seeds_empty_storage_once() {
    let mut first = engine(MemoryStorage::new(), 1, SpinConfig::default());
    let report = first.load(true);
    assert_eq!(report.source, LoadSource::Demo);
    assert!(first.can_draw());

    let saved = first.store().storage().clone();
    let mut second = engine(saved, 2, SpinConfig::default());
    let report = second.load(true);
    assert_eq!(report.source, LoadSource::Restored);
    assert_eq!(second.store().participants(), first.store().participants());
}

#[test]
fn export_lists_history_newest_first() {
    let mut engine = engine_with(people(&[("Cohen, Dana", 1)]), 8);
    let mut sink = CenterSink::default();
    draw(&mut engine, &mut sink, 0);
    let csv = engine.export_csv(false);
    let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines[0], "draw_number,name,phone,timestamp");
    assert_eq!(lines[1], "1,\"Cohen, Dana\",,2023-11-14 22:13:20");
    assert_eq!(engine.store().winners()[0].timestamp_ms, EPOCH_MS);
}
