use bytes::Bytes;

pub type FileId = u64;

/// Revocable reference to a materialized preview of a queued file.
///
/// Minted by [`FileQueue::add`] and handed back exactly once by either
/// [`FileQueue::remove`] or [`FileQueue::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A file as handed over by the user before it joins the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub name: String,
    pub media_type: Option<String>,
    pub data: Bytes,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            data: data.into(),
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedFile {
    pub id: FileId,
    pub name: String,
    pub media_type: Option<String>,
    pub data: Bytes,
    pub preview: PreviewHandle,
}

/// One file of an outbound generation request, in queue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub name: String,
    pub media_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileQueue {
    files: Vec<QueuedFile>,
    next_file_id: FileId,
    next_handle: u64,
}

impl FileQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends files in input order, minting a fresh id and preview handle for each.
    pub fn add(&mut self, incoming: Vec<IncomingFile>) -> Vec<QueuedFile> {
        let mut added = Vec::with_capacity(incoming.len());
        for file in incoming {
            self.next_file_id += 1;
            self.next_handle += 1;
            let queued = QueuedFile {
                id: self.next_file_id,
                name: file.name,
                media_type: file.media_type,
                data: file.data,
                preview: PreviewHandle(self.next_handle),
            };
            added.push(queued.clone());
            self.files.push(queued);
        }
        added
    }

    /// Removes the file with `id` and returns its handle for revocation.
    pub fn remove(&mut self, id: FileId) -> Option<PreviewHandle> {
        let index = self.files.iter().position(|file| file.id == id)?;
        Some(self.files.remove(index).preview)
    }

    /// Empties the queue, returning every remaining handle in queue order.
    pub fn clear(&mut self) -> Vec<PreviewHandle> {
        self.files.drain(..).map(|file| file.preview).collect()
    }

    pub fn get(&self, id: FileId) -> Option<&QueuedFile> {
        self.files.iter().find(|file| file.id == id)
    }

    pub fn contains(&self, id: FileId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn upload_parts(&self) -> Vec<UploadPart> {
        self.files
            .iter()
            .map(|file| UploadPart {
                name: file.name.clone(),
                media_type: file.media_type.clone(),
                data: file.data.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{FileQueue, IncomingFile, PreviewHandle};

    fn files(names: &[&str]) -> Vec<IncomingFile> {
        names
            .iter()
            .map(|name| IncomingFile::new(*name, name.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn add_appends_in_input_order() {
        let mut queue = FileQueue::new();
        queue.add(files(&["a.png", "b.png"]));
        queue.add(files(&["c.png"]));

        let names: Vec<_> = queue.iter().map(|file| file.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
        let ids: Vec<_> = queue.iter().map(|file| file.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut queue = FileQueue::new();
        queue.add(files(&["a.png"]));
        assert_eq!(queue.remove(42), None);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut queue = FileQueue::new();
        let first = queue.add(files(&["a.png"]));
        queue.remove(first[0].id);
        let second = queue.add(files(&["b.png"]));
        assert_ne!(first[0].id, second[0].id);
        assert_ne!(first[0].preview, second[0].preview);
    }

    #[test]
    fn every_minted_handle_is_released_exactly_once() {
        let mut queue = FileQueue::new();
        let mut ledger: BTreeMap<PreviewHandle, u32> = BTreeMap::new();
        fn release(handles: Vec<PreviewHandle>, ledger: &mut BTreeMap<PreviewHandle, u32>) {
            for handle in handles {
                *ledger.get_mut(&handle).expect("released handle was minted") += 1;
            }
        }

        for added in [
            queue.add(files(&["a", "b", "c"])),
            queue.add(files(&["d"])),
        ] {
            for file in added {
                ledger.insert(file.preview, 0);
            }
        }
        release(queue.remove(2).into_iter().collect(), &mut ledger);
        release(queue.remove(2).into_iter().collect(), &mut ledger);
        release(queue.clear(), &mut ledger);
        for file in queue.add(files(&["e", "f"])) {
            ledger.insert(file.preview, 0);
        }
        release(queue.remove(5).into_iter().collect(), &mut ledger);
        release(queue.clear(), &mut ledger);
        release(queue.clear(), &mut ledger);

        assert_eq!(ledger.len(), 6);
        assert!(ledger.values().all(|count| *count == 1), "{ledger:?}");
    }
}
