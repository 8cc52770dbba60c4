use crate::clipboard::{ClipboardFingerprints, PayloadKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// Which payload kinds changed since the previous observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<(PayloadKind, ChangeKind)>,
}

impl ChangeSet {
    pub fn changes(&self) -> &[(PayloadKind, ChangeKind)] {
        &self.changes
    }

    pub fn kind_of(&self, kind: PayloadKind) -> Option<ChangeKind> {
        self.changes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, change)| *change)
    }

    /// Highest-priority kind that now has content, if any.
    pub fn primary(&self) -> Option<PayloadKind> {
        self.changes
            .iter()
            .find(|(_, change)| *change != ChangeKind::Removed)
            .map(|(kind, _)| *kind)
    }

    /// True when formats only disappeared; there is nothing to upload.
    pub fn is_removal_only(&self) -> bool {
        self.primary().is_none()
    }
}

/// Last observed local clipboard identity, used by the poll loop.
///
/// [`ClipboardSnapshot::diff`] overwrites the stored identity whenever it reports
/// a change, so the same change is never reported twice.
#[derive(Debug, Clone, Default)]
pub struct ClipboardSnapshot {
    last: ClipboardFingerprints,
}

impl ClipboardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &ClipboardFingerprints {
        &self.last
    }

    /// Formats present at the last observation, highest priority first.
    pub fn last_formats(&self) -> Vec<PayloadKind> {
        PayloadKind::PRIORITY
            .into_iter()
            .filter(|kind| self.last.get(*kind).is_some())
            .collect()
    }

    pub fn diff(&mut self, current: &ClipboardFingerprints) -> Option<ChangeSet> {
        let changes: Vec<_> = PayloadKind::PRIORITY
            .into_iter()
            .filter_map(|kind| {
                let change = match (self.last.get(kind), current.get(kind)) {
                    (None, None) => return None,
                    (None, Some(_)) => ChangeKind::Added,
                    (Some(_), None) => ChangeKind::Removed,
                    (Some(prev), Some(now)) if prev == now => return None,
                    (Some(_), Some(_)) => ChangeKind::Modified,
                };
                Some((kind, change))
            })
            .collect();

        if changes.is_empty() {
            return None;
        }

        self.last = current.clone();
        Some(ChangeSet { changes })
    }

    /// Replace the stored identity without reporting a change.
    pub fn overwrite(&mut self, current: ClipboardFingerprints) {
        self.last = current;
    }
}
