use ghostwriter_core::{update, AppState, Effect, IncomingFile, Msg, PreviewHandle};

fn init_logging() {
    ghost_logging::initialize_for_tests();
}

fn add_files(state: AppState, names: &[&str]) -> (AppState, Vec<Effect>) {
    let files = names
        .iter()
        .map(|name| IncomingFile::new(*name, name.as_bytes().to_vec()).with_media_type("image/png"))
        .collect();
    update(state, Msg::FilesAdded(files))
}

fn created_handles(effects: &[Effect]) -> Vec<PreviewHandle> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::CreatePreview { handle, .. } => Some(*handle),
            _ => None,
        })
        .collect()
}

fn revoked_handles(effects: &[Effect]) -> Vec<PreviewHandle> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::RevokePreview { handle } => Some(*handle),
            _ => None,
        })
        .collect()
}

#[test]
fn added_files_append_and_create_one_preview_each() {
    init_logging();
    let (state, effects) = add_files(AppState::new(), &["a.png", "b.png"]);
    let (mut state, more) = add_files(state, &["c.png"]);

    let view = state.view();
    let names: Vec<_> = view.queue.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    assert_eq!(created_handles(&effects).len(), 2);
    assert_eq!(created_handles(&more).len(), 1);
    assert!(view.can_generate);
    assert!(state.consume_dirty());
}

#[test]
fn adding_nothing_changes_nothing() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::FilesAdded(Vec::new()));
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn removing_a_file_revokes_its_preview() {
    init_logging();
    let (state, effects) = add_files(AppState::new(), &["a.png", "b.png"]);
    let handles = created_handles(&effects);
    let first_id = state.view().queue[0].file_id;

    let (state, effects) = update(state, Msg::FileRemoved(first_id));

    assert_eq!(effects, vec![Effect::RevokePreview { handle: handles[0] }]);
    assert_eq!(state.queue().len(), 1);
    assert_eq!(state.view().queue[0].name, "b.png");
}

#[test]
fn removing_unknown_file_is_noop() {
    init_logging();
    let (mut state, _) = add_files(AppState::new(), &["a.png"]);
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::FileRemoved(999));
    assert!(effects.is_empty());
    assert_eq!(state.queue().len(), 1);
    assert!(!state.consume_dirty());
}

#[test]
fn removing_the_enlarged_file_clears_the_selection() {
    init_logging();
    let (state, _) = add_files(AppState::new(), &["a.png", "b.png"]);
    let second_id = state.view().queue[1].file_id;
    let (state, _) = update(state, Msg::PreviewOpened(second_id));
    assert_eq!(state.enlarged(), Some(second_id));

    let first_id = state.view().queue[0].file_id;
    let (state, _) = update(state, Msg::FileRemoved(first_id));
    assert_eq!(state.enlarged(), Some(second_id));

    let (state, effects) = update(state, Msg::FileRemoved(second_id));
    assert_eq!(state.enlarged(), None);
    assert_eq!(revoked_handles(&effects).len(), 1);
}

#[test]
fn opening_preview_for_unknown_file_is_ignored() {
    init_logging();
    let (state, _) = add_files(AppState::new(), &["a.png"]);
    let (state, _) = update(state, Msg::PreviewOpened(42));
    assert_eq!(state.enlarged(), None);

    let id = state.view().queue[0].file_id;
    let (state, _) = update(state, Msg::PreviewOpened(id));
    let (state, _) = update(state, Msg::PreviewClosed);
    assert_eq!(state.enlarged(), None);
}

#[test]
fn unknown_model_is_not_selected() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModelSelected("solar-pro2".into()));
    assert_eq!(state.selected_model(), "solar-pro2");
    assert_eq!(state.view().selected_model_label, "Solar Pro 2 (Reasoning High)");

    let (state, _) = update(state, Msg::ModelSelected("not-a-model".into()));
    assert_eq!(state.selected_model(), "solar-pro2");
}
