//! Task graph scheduler.
//!
//! Workflows are data, not control flow: a [`Plan`] is a tree of named
//! tasks composed sequentially or in parallel, fixed at definition time
//! and introspectable without execution. A [`Registry`] maps task names
//! to actions; [`Registry::run`] walks the plan.
//!
//! Execution contract:
//! - `Seq` guarantees strict finish-before-start ordering between
//!   successive stages.
//! - `Par` starts all branches together and joins on every branch -
//!   siblings may interleave arbitrarily and must not read each other's
//!   output. A failing branch fails the plan, but already-running
//!   siblings are never force-cancelled; the join still waits for them.
//! - The first error aborts the rest of the plan. No retries, no
//!   rollback of output already written (that is what `clean` is for).

mod workflow;

pub use workflow::{STAGE_TASKS, Workflow, workflow_plan};

use anyhow::{Result, bail};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Build mode, fixed per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Fast, readable output (no minification).
    Development,
    /// Minified output.
    Production,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

// ============================================================================
// Plan
// ============================================================================

/// A composition of named tasks. The graph is acyclic by construction:
/// plans only reference tasks by name, never other plans cyclically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// One named unit of work.
    Task(&'static str),
    /// Strict finish-before-start stages.
    Seq(Vec<Plan>),
    /// Branches started together and joined together.
    Par(Vec<Plan>),
}

/// Compose plans into strictly ordered stages.
pub fn sequential(stages: impl IntoIterator<Item = Plan>) -> Plan {
    Plan::Seq(stages.into_iter().collect())
}

/// Compose plans into parallel branches with a joining barrier.
pub fn parallel(branches: impl IntoIterator<Item = Plan>) -> Plan {
    Plan::Par(branches.into_iter().collect())
}

/// Shorthand for a single named task.
pub fn task(name: &'static str) -> Plan {
    Plan::Task(name)
}

impl Plan {
    /// Every task name reachable from this plan, in definition order.
    pub fn task_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut Vec<&'static str>) {
        match self {
            Self::Task(name) => names.push(name),
            Self::Seq(stages) => stages.iter().for_each(|s| s.collect_names(names)),
            Self::Par(branches) => branches.iter().for_each(|b| b.collect_names(names)),
        }
    }
}

// ============================================================================
// Registry and runner
// ============================================================================

/// A named unit of work. Must be callable from parallel branches.
pub type TaskFn = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Mapping from task name to action.
#[derive(Default)]
pub struct Registry {
    tasks: FxHashMap<&'static str, TaskFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task action under a name. Later registrations replace
    /// earlier ones, which tests use to stub tasks out.
    pub fn register<F>(&mut self, name: &'static str, action: F)
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.tasks.insert(name, Arc::new(action));
    }

    /// Check that every task a plan references is registered.
    pub fn validate(&self, plan: &Plan) -> Result<()> {
        for name in plan.task_names() {
            if !self.tasks.contains_key(name) {
                bail!("plan references unregistered task `{name}`");
            }
        }
        Ok(())
    }

    /// Execute a plan. Returns the first error encountered; parallel
    /// branches are always joined before reporting.
    pub fn run(&self, plan: &Plan) -> Result<()> {
        match plan {
            Plan::Task(name) => {
                let Some(action) = self.tasks.get(name) else {
                    bail!("unknown task `{name}`");
                };
                action()
            }
            Plan::Seq(stages) => {
                for stage in stages {
                    self.run(stage)?;
                }
                Ok(())
            }
            Plan::Par(branches) => {
                use rayon::prelude::*;
                // Collect every branch result before deciding: a failed
                // sibling never cuts a running one short.
                let mut results: Vec<Result<()>> = Vec::new();
                branches
                    .par_iter()
                    .map(|branch| self.run(branch))
                    .collect_into_vec(&mut results);
                results.into_iter().collect()
            }
        }
    }
}
