use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::config::settings::ToolPaths;

/// Availability of one external tool.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: String,
    pub resolved: Option<PathBuf>,
}

/// Resolves `program` through `PATH` (or as-is when it contains a separator).
pub fn locate(program: &Path) -> Option<PathBuf> {
    which::which(program).ok()
}

pub fn check_all(tools: &ToolPaths) -> Vec<ToolStatus> {
    [&tools.ffmpeg, &tools.ffprobe]
        .into_iter()
        .map(|program| {
            let resolved = locate(program);
            match &resolved {
                Some(path) => info!("Found {} at {}", program.display(), path.display()),
                None => warn!("{} not found on PATH", program.display()),
            }
            ToolStatus {
                name: program.to_string_lossy().to_string(),
                resolved,
            }
        })
        .collect()
}

/// Fails when either the encoder or the inspector is missing.
pub fn require_all(tools: &ToolPaths) -> Result<()> {
    let missing: Vec<String> = check_all(tools)
        .into_iter()
        .filter(|t| t.resolved.is_none())
        .map(|t| t.name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "required tool(s) not installed or not on PATH: {}",
            missing.join(", ")
        ))
    }
}
