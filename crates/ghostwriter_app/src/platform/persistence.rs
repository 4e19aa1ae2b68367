use std::path::Path;

use ghost_logging::{ghost_error, ghost_info};
use ghostwriter_core::HistoryStore;
use ghostwriter_engine::{ensure_data_dir, FileSlot};

/// Opens the history store under `data_dir`. A data dir that cannot be
/// created is logged; reads then come back empty and writes fail softly.
pub(crate) fn open_history(data_dir: &Path) -> HistoryStore<FileSlot> {
    if let Err(err) = ensure_data_dir(data_dir) {
        ghost_error!("Failed to ensure data dir {:?}: {}", data_dir, err);
    }
    let slot = FileSlot::new(data_dir.to_path_buf());
    ghost_info!("History file is {:?}", slot.path());
    HistoryStore::new(slot)
}
