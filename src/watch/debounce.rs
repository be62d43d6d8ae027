//! Pure timing and deduplication for filesystem events.
//!
//! No business logic here: the debouncer turns a noisy notify stream
//! into batches of unique changed paths, ready once the stream has been
//! quiet for the debounce window and the previous rebuild's cooldown
//! has passed.

use crate::utils::normalize_path;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub(super) const DEBOUNCE_MS: u64 = 300;
pub(super) const REBUILD_COOLDOWN_MS: u64 = 800;

pub(super) struct Debouncer {
    changes: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self {
            changes: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    /// Record a notify event. Metadata-only modifications and editor
    /// temp files are dropped here; everything else is deduplicated by
    /// normalized path.
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => {}
            EventKind::Modify(modify) => {
                // mtime/chmod noise would otherwise cause rebuild loops
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
            }
            _ => return,
        }

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            self.changes.insert(normalize_path(path));
            self.last_event = Some(Instant::now());
        }
    }

    /// Take the batch if the debounce window and cooldown both elapsed.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashSet<PathBuf>> {
        if !self.is_ready() {
            return None;
        }

        let changes = std::mem::take(&mut self.changes);
        self.last_event = None;
        self.last_rebuild = Some(Instant::now());
        Some(changes)
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        if last_event.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
            return false;
        }
        if let Some(last_rebuild) = self.last_rebuild
            && last_rebuild.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS)
        {
            return false;
        }
        !self.changes.is_empty()
    }

    /// Precise sleep until the next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86_400);
        };

        let debounce_remaining =
            Duration::from_millis(DEBOUNCE_MS).saturating_sub(last_event.elapsed());
        let cooldown_remaining = self
            .last_rebuild
            .map(|t| Duration::from_millis(REBUILD_COOLDOWN_MS).saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }
}

/// Editor temp/backup artifacts that must never trigger rebuilds.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind};

    fn make_event(path: &str, kind: EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: vec![PathBuf::from(path)],
            attrs: Default::default(),
        }
    }

    fn created(path: &str) -> notify::Event {
        make_event(path, EventKind::Create(CreateKind::File))
    }

    #[test]
    fn test_not_ready_inside_debounce_window() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&created("/site/src/page.md"));
        assert!(!debouncer.is_ready());
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_ready_after_quiet_window() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&created("/site/src/page.md"));
        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS + 50));

        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(changes.len(), 1);
        // Batch was consumed
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_duplicate_paths_collapse() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&created("/site/src/app.js"));
        debouncer.add_event(&make_event(
            "/site/src/app.js",
            EventKind::Modify(ModifyKind::Data(DataChange::Any)),
        ));
        assert_eq!(debouncer.changes.len(), 1);
    }

    #[test]
    fn test_temp_files_ignored() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&created("/site/src/.page.md.swp"));
        debouncer.add_event(&created("/site/src/page.md~"));
        debouncer.add_event(&created("/site/src/page.tmp"));
        assert!(debouncer.changes.is_empty());
    }

    #[test]
    fn test_metadata_changes_ignored() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(
            "/site/src/page.md",
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)),
        ));
        assert!(debouncer.changes.is_empty());
    }

    #[test]
    fn test_idle_sleep_is_long() {
        let debouncer = Debouncer::new();
        assert!(debouncer.sleep_duration() >= Duration::from_secs(3600));
    }
}
