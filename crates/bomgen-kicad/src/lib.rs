//! KiCad CLI integration: locating `kicad-cli` and exporting the
//! `python-bom` XML netlist that the BOM pipeline consumes.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

mod paths {
    #[cfg(target_os = "macos")]
    pub(crate) fn kicad_cli() -> String {
        std::env::var("KICAD_CLI").unwrap_or_else(|_| {
            "/Applications/KiCad/KiCad.app/Contents/MacOS/kicad-cli".to_string()
        })
    }

    #[cfg(target_os = "windows")]
    pub(crate) fn kicad_cli() -> String {
        std::env::var("KICAD_CLI")
            .unwrap_or_else(|_| r"C:\Program Files\KiCad\9.0\bin\kicad-cli.exe".to_string())
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    pub(crate) fn kicad_cli() -> String {
        std::env::var("KICAD_CLI").unwrap_or_else(|_| "kicad-cli".to_string())
    }
}

/// Path to `kicad-cli`, honoring the `KICAD_CLI` override.
pub fn kicad_cli() -> String {
    paths::kicad_cli()
}

/// Default schematic for a project: `<cwd>/<cwd-stem>.kicad_sch`.
pub fn default_schematic() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let stem = cwd
        .file_name()
        .context("current directory has no name")?
        .to_owned();
    let mut sch = cwd.join(stem);
    sch.set_extension("kicad_sch");
    Ok(sch)
}

/// A temporary XML BOM exported from a schematic. The file is removed when
/// this is dropped.
pub struct ExportedBom {
    file: NamedTempFile,
}

impl ExportedBom {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Run `kicad-cli sch export python-bom` for the given schematic.
pub fn export_python_bom(schematic: &Path) -> Result<ExportedBom> {
    let file = tempfile::Builder::new()
        .suffix(".xml")
        .tempfile()
        .context("failed to create temporary file")?;
    log::info!("Generating BOM using kicad-cli for {}", schematic.display());

    let output = Command::new(kicad_cli())
        .args(["sch", "export", "python-bom", "-o"])
        .arg(file.path())
        .arg(schematic)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!(
                    "kicad-cli not found. Install KiCad or point KICAD_CLI at the binary"
                )
            } else {
                anyhow::Error::new(e).context("failed to run kicad-cli")
            }
        })?;

    if !output.status.success() {
        bail!(
            "kicad-cli export failed for {}:\n{}",
            schematic.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(ExportedBom { file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schematic_is_named_after_the_project_dir() {
        let sch = default_schematic().unwrap();
        assert_eq!(sch.extension().and_then(|e| e.to_str()), Some("kicad_sch"));
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(sch.parent(), Some(cwd.as_path()));
    }
}
