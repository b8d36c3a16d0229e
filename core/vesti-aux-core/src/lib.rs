//! vesti-aux-core: the chores that happen around a vesti build
//!
//! A vesti document is compiled inside a dummy directory (`.vesti-dummy`).
//! Two small jobs surround that compilation, and this crate does both:
//!
//! **Aux-tool passes**: engines other than tectonic leave bibliography and
//! index work to external tools. [`postprocess`] steps into the dummy
//! directory, runs `bibtex` and two `makeindex` passes in order, and always
//! steps back out, even when one of the tools fails.
//!
//! **Font fetching**: [`fetch`] downloads each font archive of an ordered
//! list into the dummy directory, unpacks it there, and removes the archive.
//! The first failure stops the whole list.
//!
//! ## A short session
//!
//! ```rust,no_run
//! use vesti_aux_core::engine::EngineType;
//! use vesti_aux_core::postprocess::{run_postprocess, PostProcessPlan};
//! use vesti_aux_core::process::SystemRunner;
//!
//! let engine: EngineType = "pdf".parse()?;
//! let mut runner = SystemRunner;
//! let outcome = run_postprocess(
//!     engine,
//!     ".vesti-dummy".as_ref(),
//!     &PostProcessPlan::default(),
//!     &mut runner,
//!     false,
//! )?;
//! println!("{outcome:?}");
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Pieces
//!
//! - [`engine::EngineType`]: which LaTeX engine drives the build
//! - [`workdir::WorkdirGuard`]: enter a directory, come back on drop
//! - [`process::CommandRunner`]: the seam every external tool goes through
//! - [`download::Downloader`]: the seam every remote archive goes through
//! - [`archive::extract_archive`]: zip extraction with path checks
//! - [`fonts::FontSource`]: one `(name, url)` entry of the font list

pub mod archive;
pub mod download;
pub mod engine;
pub mod fetch;
pub mod fonts;
pub mod output;
pub mod postprocess;
pub mod process;
pub mod workdir;
