//! CLI subcommand implementations.

use std::path::PathBuf;

pub mod check;
pub mod decode;
pub mod families;

pub(crate) fn resolve_config_path(
    config: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = config {
        return Ok(path);
    }

    let home = dirs::home_dir().ok_or("could not determine home directory")?;
    Ok(home.join(".vaultguard").join("guard.yaml"))
}
