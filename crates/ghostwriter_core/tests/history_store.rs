use ghostwriter_core::{
    update, AppState, Effect, HistorySlot, HistoryStore, MemorySlot, Msg, SlotError,
};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn init_logging() {
    ghost_logging::initialize_for_tests();
}

#[test]
fn added_entry_survives_a_reload() {
    init_logging();
    let slot = MemorySlot::new();
    let mut store = HistoryStore::new(slot.clone());
    store.add("Older post.", Some("Solar Pro 2 (Reasoning High)".into()));
    let added = store.add("# Fresh\nNew post! Body", Some("Solar Pro 3 (Powerful MoE 102B)".into()));

    let mut reloaded = HistoryStore::new(slot);
    let entries = reloaded.load_all();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], added);
    assert_eq!(entries[0].summary, "Fresh New post!");
    assert_eq!(entries[1].content, "Older post.");
}

#[test]
fn persisted_layout_uses_model_key() {
    init_logging();
    let slot = MemorySlot::new();
    let mut store = HistoryStore::new(slot.clone());
    store.add("Body.", Some("Solar Mini (Efficient KO/EN)".into()));

    let raw: serde_json::Value =
        serde_json::from_str(&slot.contents().expect("slot written")).unwrap();
    let record = &raw[0];
    assert_eq!(record["model"], "Solar Mini (Efficient KO/EN)");
    assert_eq!(record["summary"], "Body.");
    assert!(record["timestamp"].is_string());
    assert!(record["id"].is_string());
}

#[test]
fn remove_drops_only_the_matching_entry() {
    init_logging();
    let slot = MemorySlot::new();
    let mut store = HistoryStore::new(slot.clone());
    let first = store.add("One.", None);
    let second = store.add("Two.", None);
    let third = store.add("Three.", None);

    assert!(store.remove(second.id));
    let ids: Vec<_> = store.entries().iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![third.id, first.id]);

    let before = slot.contents();
    assert!(!store.remove(Uuid::new_v4()));
    assert_eq!(slot.contents(), before);

    let mut reloaded = HistoryStore::new(slot);
    let ids: Vec<_> = reloaded.load_all().iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![third.id, first.id]);
}

#[test]
fn malformed_slot_starts_empty() {
    init_logging();
    let mut store = HistoryStore::new(MemorySlot::with_contents("{not json"));
    assert!(store.load_all().is_empty());

    store.add("Recovered.", None);
    assert_eq!(store.entries().len(), 1);
}

#[test]
fn missing_slot_starts_empty() {
    init_logging();
    let mut store = HistoryStore::new(MemorySlot::new());
    assert!(store.load_all().is_empty());
}

#[test]
fn records_from_older_layouts_are_tolerated() {
    init_logging();
    let legacy = r#"[
        {"id":"6f1c1f5e-7f43-4c1b-9a0e-0d6c4c3c2b10","timestamp":"2025-01-05T10:00:00.000Z",
         "summary":"Legacy.","content":"Legacy. Post","extra":true},
        {"id":"0b8e3d55-1c54-4b7f-a0a4-8f1d5ad0f2b7","timestamp":"2025-01-04T10:00:00Z",
         "summary":"Old.","content":"Old.","model":"Solar Pro 2 (Reasoning High)"}
    ]"#;
    let mut store = HistoryStore::new(MemorySlot::with_contents(legacy));
    let entries = store.load_all();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].model_label, None);
    assert_eq!(
        entries[1].model_label.as_deref(),
        Some("Solar Pro 2 (Reasoning High)")
    );
}

struct BrokenSlot;

impl HistorySlot for BrokenSlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        Err(SlotError::Unavailable("disk gone".into()))
    }

    fn write(&mut self, _contents: &str) -> Result<(), SlotError> {
        Err(SlotError::Unavailable("disk gone".into()))
    }
}

#[test]
fn slot_failures_are_logged_not_propagated() {
    init_logging();
    let mut store = HistoryStore::new(BrokenSlot);
    assert!(store.load_all().is_empty());

    let entry = store.add("Still shown.", None);
    assert_eq!(store.entries(), &[entry]);
}

#[test]
fn restored_history_can_be_opened_and_deleted() {
    init_logging();
    let mut store = HistoryStore::new(MemorySlot::new());
    let older = store.add("Older.", None);
    let newer = store.add("# Newer\nText.", Some("Solar Pro 3 (Powerful MoE 102B)".into()));

    let (state, _) = update(AppState::new(), Msg::HistoryRestored(store.load_all()));
    let (state, _) = update(state, Msg::HistoryPanelOpened);
    let view = state.view();
    assert!(view.history_open);
    assert_eq!(view.history.len(), 2);
    assert_eq!(view.history[0].model_badge, "Solar Pro 3");
    assert_eq!(view.history[1].model_badge, "AI");

    let (state, effects) = update(state, Msg::HistoryEntryOpened(newer.id));
    assert_eq!(effects, vec![Effect::RevealResult]);
    assert_eq!(state.result(), Some("# Newer\nText."));
    assert!(!state.view().history_open);

    let (state, effects) = update(state, Msg::HistoryEntryDeleted(older.id));
    assert_eq!(effects, vec![Effect::DeleteHistory { id: older.id }]);
    assert_eq!(state.history().len(), 1);

    let (state, effects) = update(state, Msg::HistoryEntryDeleted(older.id));
    assert!(effects.is_empty());
    assert_eq!(state.history().len(), 1);
}
