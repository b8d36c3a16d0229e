//! LaTeX engine modes reported by the vesti runtime

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error, Result};
use serde::{Deserialize, Serialize};

/// The engine driving the current build.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    Latex,
    Pdf,
    Xe,
    Lua,
    #[serde(rename = "tect")]
    Tectonic,
}

impl EngineType {
    pub const ALL: [EngineType; 5] = [
        EngineType::Latex,
        EngineType::Pdf,
        EngineType::Xe,
        EngineType::Lua,
        EngineType::Tectonic,
    ];

    /// Short tag, as handed to build scripts.
    pub fn tag(self) -> &'static str {
        match self {
            EngineType::Latex => "latex",
            EngineType::Pdf => "pdf",
            EngineType::Xe => "xe",
            EngineType::Lua => "lua",
            EngineType::Tectonic => "tect",
        }
    }

    /// Executable that compiles the document for this mode.
    pub fn program(self) -> &'static str {
        match self {
            EngineType::Latex => "latex",
            EngineType::Pdf => "pdflatex",
            EngineType::Xe => "xelatex",
            EngineType::Lua => "lualatex",
            EngineType::Tectonic => "tectonic",
        }
    }

    /// Whether the engine resolves bibliographies and indexes on its own.
    ///
    /// Only tectonic does; every other engine needs `bibtex` and
    /// `makeindex` run between compilations.
    pub fn runs_aux_tools_internally(self) -> bool {
        match self {
            EngineType::Tectonic => true,
            EngineType::Latex | EngineType::Pdf | EngineType::Xe | EngineType::Lua => false,
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for EngineType {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let tag = raw.trim().to_ascii_lowercase();
        EngineType::ALL
            .into_iter()
            .find(|engine| engine.tag() == tag)
            .ok_or_else(|| {
                let known: Vec<&str> = EngineType::ALL.iter().map(|e| e.tag()).collect();
                anyhow!(
                    "unknown engine tag `{}` (expected one of: {})",
                    raw.trim(),
                    known.join(", ")
                )
            })
    }
}
