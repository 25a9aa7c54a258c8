use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::attachment::Attachment;

/// Named set of attachments, keyed by slot index and attachment name.
#[derive(Debug, Clone, Default)]
pub struct Skin {
    pub name: String,
    /// Slot index → attachment name → attachment.
    attachments: FxHashMap<usize, FxHashMap<String, Arc<Attachment>>>,
}

impl Skin {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attachments: FxHashMap::default(),
        }
    }

    /// Adds or replaces an attachment. Returns the shared handle stored in
    /// the skin.
    pub fn set_attachment(
        &mut self,
        slot_index: usize,
        name: &str,
        attachment: impl Into<Attachment>,
    ) -> Arc<Attachment> {
        let attachment = Arc::new(attachment.into());
        self.attachments
            .entry(slot_index)
            .or_default()
            .insert(name.to_string(), Arc::clone(&attachment));
        attachment
    }

    #[must_use]
    pub fn attachment(&self, slot_index: usize, name: &str) -> Option<&Arc<Attachment>> {
        self.attachments.get(&slot_index)?.get(name)
    }

    /// All `(slot, name, attachment)` entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &Arc<Attachment>)> {
        self.attachments.iter().flat_map(|(&slot, named)| {
            named
                .iter()
                .map(move |(name, attachment)| (slot, name.as_str(), attachment))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attachments.values().map(FxHashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attachments.values().all(FxHashMap::is_empty)
    }
}
