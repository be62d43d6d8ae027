//! The fixed workflows.
//!
//! Compositions are data so they can be inspected (and tested) without
//! executing anything. There is exactly one site-layout convention and
//! one task vocabulary; arbitrary user-defined graphs are a non-goal.

use super::{Plan, parallel, sequential, task};

/// The per-type pipeline tasks making up one full build stage.
pub const STAGE_TASKS: [&str; 5] = ["scripts", "pages", "styles", "static", "redirects"];

/// The fixed, named workflows exposed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Empty the output folder.
    Clean,
    /// Full development build.
    Dev,
    /// Full production build (minified, cache-busted).
    Build,
    /// Development build, then rebuild-on-change.
    Watch,
    /// Serve the existing output folder.
    Serve,
    /// Development build, then watch and serve together.
    Start,
}

impl Workflow {
    pub fn is_production(self) -> bool {
        self == Self::Build
    }
}

fn build_stage() -> Plan {
    parallel(STAGE_TASKS.map(task))
}

/// The predetermined composition for a workflow.
pub fn workflow_plan(workflow: Workflow) -> Plan {
    match workflow {
        Workflow::Clean => sequential([task("setup"), task("clean")]),
        Workflow::Dev | Workflow::Build => {
            sequential([task("setup"), task("clean"), build_stage()])
        }
        Workflow::Watch => sequential([task("setup"), task("clean"), build_stage(), task("watch")]),
        Workflow::Serve => sequential([task("setup"), task("serve")]),
        Workflow::Start => sequential([
            task("setup"),
            task("clean"),
            build_stage(),
            parallel([task("watch"), task("serve")]),
        ]),
    }
}
