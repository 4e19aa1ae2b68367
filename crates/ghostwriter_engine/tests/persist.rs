use std::fs;

use ghostwriter_core::{HistorySlot, HistoryStore};
use ghostwriter_engine::{ensure_data_dir, AtomicFileWriter, FileSlot, HISTORY_FILENAME};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("data");
    assert!(!new_dir.exists());
    ensure_data_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("history.json", "[]").unwrap();
    assert_eq!(first.file_name().unwrap(), "history.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), "[]");

    let second = writer.write("history.json", "[1]").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "[1]");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("history.json", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("history.json").exists());
}

#[test]
fn file_slot_reads_none_before_first_write() {
    let temp = TempDir::new().unwrap();
    let slot = FileSlot::new(temp.path().join("data"));
    assert_eq!(slot.read().unwrap(), None);
    assert_eq!(slot.path().file_name().unwrap(), HISTORY_FILENAME);
}

#[test]
fn history_round_trips_through_file_slot() {
    ghost_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");

    let mut store = HistoryStore::new(FileSlot::new(data_dir.clone()));
    store.load_all();
    let first = store.add("First post.", Some("Solar Pro 2 (Reasoning High)".into()));
    let second = store.add("# Second\nPost? yes", None);

    let mut restarted = HistoryStore::new(FileSlot::new(data_dir.clone()));
    let entries = restarted.load_all();
    assert_eq!(entries, vec![second.clone(), first.clone()]);
    assert_eq!(entries[0].summary, "Second Post?");

    assert!(restarted.remove(second.id));
    let mut again = HistoryStore::new(FileSlot::new(data_dir));
    assert_eq!(again.load_all(), vec![first]);
}

#[test]
fn corrupt_history_file_is_discarded_on_load() {
    ghost_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(HISTORY_FILENAME), "[{\"id\": 3").unwrap();

    let mut store = HistoryStore::new(FileSlot::new(temp.path().to_path_buf()));
    assert!(store.load_all().is_empty());

    store.add("Fresh start.", None);
    let mut restarted = HistoryStore::new(FileSlot::new(temp.path().to_path_buf()));
    assert_eq!(restarted.load_all().len(), 1);
}
