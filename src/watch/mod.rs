//! Watch coordinator: rebuild-on-change for the source tree.
//!
//! Flow: notify events go through a pure [`debounce::Debouncer`], the
//! surviving paths are classified into pipeline categories, the
//! affected tasks run as one parallel plan, and a successful rebuild
//! triggers exactly one reload broadcast no matter how many files
//! changed together.

mod debounce;

use crate::pipeline::{self, BuildContext};
use crate::serve::ReloadHub;
use crate::task::{Registry, STAGE_TASKS, parallel, task};
use crate::utils::to_slash;
use crate::{log, logger};
use anyhow::{Context, Result, bail};
use crossbeam::channel::{self, RecvTimeoutError};
use debounce::Debouncer;
use notify::{RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pipeline category a changed file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Scripts,
    Pages,
    Styles,
    Routes,
    Static,
}

impl Category {
    /// The task to rerun for changes in this category.
    pub fn task_name(self) -> &'static str {
        match self {
            Self::Scripts => "scripts",
            Self::Pages => "pages",
            Self::Styles => "styles",
            Self::Routes => "redirects",
            Self::Static => "static",
        }
    }
}

/// Classify a source-relative path. Layout edits land in `Pages` so the
/// next markup pass (and its fresh template cache) picks them up.
pub fn categorize(rel: &Path) -> Category {
    if to_slash(rel) == "routes.json" {
        return Category::Routes;
    }
    let ext = rel
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "js" => Category::Scripts,
        "html" | "htm" | "md" | "hbs" => Category::Pages,
        "css" => Category::Styles,
        _ => Category::Static,
    }
}

/// Watch the source tree and rerun affected pipelines until the channel
/// closes (in practice: until the process is interrupted).
///
/// Refuses to arm over a missing output folder; watching only makes
/// sense on top of a completed build.
pub fn watch(ctx: &Arc<BuildContext>, reload: Option<Arc<ReloadHub>>) -> Result<()> {
    let output = ctx.config.output_dir();
    if !output.exists() {
        bail!(
            "output folder {} does not exist, run a build before watching",
            output.display()
        );
    }

    let source_dir = ctx.config.source_dir();
    let source_dir = source_dir.canonicalize().unwrap_or(source_dir);

    let mut registry = Registry::new();
    pipeline::register_tasks(&mut registry, ctx);

    let (tx, rx) = channel::unbounded();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })?;
    watcher
        .watch(&source_dir, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", source_dir.display()))?;
    log!("watch"; "watching {} for changes", source_dir.display());

    let mut debouncer = Debouncer::new();
    loop {
        match rx.recv_timeout(debouncer.sleep_duration()) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            Ok(Err(err)) => log!("watch"; "notify error: {err}"),
            Err(RecvTimeoutError::Timeout) => {
                if let Some(changed) = debouncer.take_if_ready() {
                    rebuild(&registry, &source_dir, &changed, reload.as_deref());
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}

/// Rerun the tasks affected by one debounced batch, then broadcast a
/// single reload on success.
fn rebuild(
    registry: &Registry,
    source_dir: &Path,
    changed: &FxHashSet<PathBuf>,
    reload: Option<&ReloadHub>,
) {
    let names = affected_tasks(source_dir, changed);
    if names.is_empty() {
        return;
    }

    crate::debug!("watch"; "rebuilding: {}", names.join(", "));
    let plan = parallel(names.iter().copied().map(task));
    match registry.run(&plan) {
        Ok(()) => {
            logger::status_success(&format!(
                "rebuilt {} ({} file(s) changed)",
                names.join(", "),
                changed.len()
            ));
            if let Some(hub) = reload {
                hub.notify_reload();
            }
        }
        Err(err) => logger::status_error("rebuild failed", &format!("{err:#}")),
    }
}

/// Tasks to rerun for a batch of changed paths, in pipeline order.
fn affected_tasks(source_dir: &Path, changed: &FxHashSet<PathBuf>) -> Vec<&'static str> {
    let affected: FxHashSet<&'static str> = changed
        .iter()
        .filter_map(|path| path.strip_prefix(source_dir).ok())
        .map(|rel| categorize(rel).task_name())
        .collect();

    STAGE_TASKS
        .iter()
        .copied()
        .filter(|name| affected.contains(name))
        .collect()
}
