//! Bibliography and index passes for engines that need them

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::EngineType;
use crate::process::{CommandRunner, Invocation};
use crate::workdir::WorkdirGuard;

pub const BIBTEX: &str = "bibtex";
pub const MAKEINDEX: &str = "makeindex";

/// File names the aux tools work on, relative to the dummy directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcessPlan {
    pub aux_file: String,
    pub index_file: String,
    /// Style for the main index; lives one level above the dummy directory.
    pub index_style: String,
    pub symbol_index: String,
}

impl Default for PostProcessPlan {
    fn default() -> Self {
        Self {
            aux_file: "./kindergarten-vol2.aux".to_string(),
            index_file: "./kindergarten-vol2.idx".to_string(),
            index_style: "../kindergarten.ist".to_string(),
            symbol_index: "./sym.idx".to_string(),
        }
    }
}

impl PostProcessPlan {
    /// The three command lines, in the order they must run.
    pub fn invocations(&self) -> [Invocation; 3] {
        [
            Invocation::new(BIBTEX, [self.aux_file.as_str()]),
            Invocation::new(
                MAKEINDEX,
                ["-s", self.index_style.as_str(), self.index_file.as_str()],
            ),
            Invocation::new(MAKEINDEX, [self.symbol_index.as_str()]),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PostProcessOutcome {
    /// The engine handles bibliographies and indexes itself.
    Skipped { engine: EngineType },
    Ran { invocations: Vec<Invocation> },
}

/// Run the aux-tool passes inside `dummy_dir` unless `engine` makes them
/// unnecessary. `force` runs them regardless of the engine.
///
/// Stops at the first failing tool. The caller's working directory is
/// restored on every path out of this function.
pub fn run_postprocess<R>(
    engine: EngineType,
    dummy_dir: &Path,
    plan: &PostProcessPlan,
    runner: &mut R,
    force: bool,
) -> Result<PostProcessOutcome>
where
    R: CommandRunner + ?Sized,
{
    if !force && engine.runs_aux_tools_internally() {
        info!(%engine, "engine resolves bibliography and index itself; skipping aux tools");
        return Ok(PostProcessOutcome::Skipped { engine });
    }

    info!(%engine, dir = %dummy_dir.display(), "Run bibtex and makeindex");
    let _guard = WorkdirGuard::enter(dummy_dir)?;

    let mut ran = Vec::with_capacity(3);
    for invocation in plan.invocations() {
        runner
            .run(&invocation)
            .with_context(|| format!("post-processing step `{invocation}` failed"))?;
        ran.push(invocation);
    }

    Ok(PostProcessOutcome::Ran { invocations: ran })
}
