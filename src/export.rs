/*
 * Packwrap - A packwiz modpack wrapper and exporter
 * Copyright (C) 2024 The Packwrap Developers
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

mod multimc;
mod platform;
mod server;
mod technic;

use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use std::{
    error::Error as StdError, fmt::Display, fs, path::{Path, PathBuf}, str::FromStr
};

use crate::{
    git, java::{self, JavaInstall}, locator::to_slash, pack::Pack, packwiz::Packwiz,
    Error, Progress
};

/// Output directory for finished archives, under the project root
pub const BUILD_DIR: &str = ".build";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    CurseForge,
    Modrinth,
    MultiMC,
    Technic,
    Server
}

impl ExportTarget {
    /// Every target, in the order `all` builds them
    pub const ALL: [ExportTarget; 5] = [
        ExportTarget::CurseForge,
        ExportTarget::Modrinth,
        ExportTarget::MultiMC,
        ExportTarget::Technic,
        ExportTarget::Server
    ];

    /// Lowercase name used on the command line and in archive names
    pub fn name(&self) -> &'static str {
        match self {
            ExportTarget::CurseForge => "curseforge",
            ExportTarget::Modrinth => "modrinth",
            ExportTarget::MultiMC => "multimc",
            ExportTarget::Technic => "technic",
            ExportTarget::Server => "server"
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportTarget::Modrinth => "mrpack",
            _ => "zip"
        }
    }

    /// CurseForge and Modrinth archive names carry a timestamp
    pub fn timestamped(&self) -> bool {
        matches!(self, ExportTarget::CurseForge | ExportTarget::Modrinth)
    }

    fn staging_suffix(&self) -> &'static str {
        match self {
            ExportTarget::CurseForge => "cf-temp",
            ExportTarget::Modrinth => "mr-temp",
            ExportTarget::MultiMC => "mmc-temp",
            ExportTarget::Technic => "technic",
            ExportTarget::Server => "server"
        }
    }

    /// Parse a target name, `all` expands to every target
    pub fn parse_list(s: &str) -> Result<Vec<ExportTarget>, Error> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ExportTarget::ALL.to_vec()),
            other => Ok(vec![other.parse()?])
        }
    }
}

impl FromStr for ExportTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "curseforge" | "cf" => Ok(ExportTarget::CurseForge),
            "modrinth" | "mr" => Ok(ExportTarget::Modrinth),
            "multimc" | "mmc" => Ok(ExportTarget::MultiMC),
            "technic" => Ok(ExportTarget::Technic),
            "server" => Ok(ExportTarget::Server),
            _ => Err(Error::UnknownTarget(s.to_string()))
        }
    }
}

impl Display for ExportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportTarget::CurseForge => "CurseForge",
            ExportTarget::Modrinth => "Modrinth",
            ExportTarget::MultiMC => "MultiMC",
            ExportTarget::Technic => "Technic",
            ExportTarget::Server => "Server"
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Locate,
    Stage,
    Copy,
    Install,
    Manifest,
    Zip
}

impl Display for ExportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            ExportStage::Locate => "locating pack",
            ExportStage::Stage => "preparing staging directory",
            ExportStage::Copy => "copying files",
            ExportStage::Install => "installing mods",
            ExportStage::Manifest => "writing manifest",
            ExportStage::Zip => "writing archive"
        };
        write!(f, "{action}")
    }
}

/// Failure of one export target, tagged with the stage it failed in
#[derive(Debug)]
pub struct ExportError {
    pub target: ExportTarget,
    pub stage: ExportStage,
    pub cause: anyhow::Error
}

impl Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} export failed while {}: {:#}", self.target, self.stage, self.cause)
    }
}

impl StdError for ExportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.cause)
    }
}

impl ExportError {
    /// The domain error behind this failure, if any
    pub fn kind(&self) -> Option<&Error> {
        self.cause.downcast_ref::<Error>()
    }
}

trait StageExt<T> {
    fn stage(self, target: ExportTarget, stage: ExportStage) -> Result<T, ExportError>;
}

impl<T> StageExt<T> for Result<T> {
    fn stage(self, target: ExportTarget, stage: ExportStage) -> Result<T, ExportError> {
        self.map_err(|cause| ExportError { target, stage, cause })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Point MultiMC's pre-launch command at the local pack.toml instead of the git remote
    pub use_local: bool,

    /// Java executable for the installer, skips discovery
    pub java: Option<PathBuf>,

    /// packwiz executable, defaults to `packwiz` in PATH
    pub packwiz: Option<PathBuf>
}

/// Outcome of exporting several targets
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<(ExportTarget, PathBuf)>,
    pub failed: Vec<ExportError>
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Everything a single target export needs
struct ExportContext<'a> {
    target: ExportTarget,
    pack: Pack,
    options: &'a ExportOptions,

    /// Directory owning `.build/` and the staging directories
    root: PathBuf,

    /// Final archive path
    output: PathBuf
}

impl ExportContext<'_> {
    fn stage<T>(&self, result: Result<T>, stage: ExportStage) -> Result<T, ExportError> {
        result.stage(self.target, stage)
    }

    fn packwiz(&self) -> Packwiz {
        let packwiz = Packwiz::new(&self.pack.dir);
        match &self.options.packwiz {
            Some(program) => packwiz.with_program(program),
            None => packwiz
        }
    }

    /// Java for running the installer, the configured override or a compatible install
    async fn java(&self, progress: &mut dyn Progress) -> Result<JavaInstall> {
        let mc_version = self.pack.require_minecraft_version()?;
        java::resolve_java(mc_version, self.options.java.as_deref(), progress).await
    }

    /// Raw git URL of pack.toml, or its absolute local path
    fn pack_url(&self) -> String {
        let local = to_slash(&self.pack.pack_file());

        if self.options.use_local {
            return local;
        }

        match git::detect_remote_pack_url(&self.pack.dir) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Unable to detect git remote, using local path: {e:#}");
                local
            }
        }
    }

    /// `icon.png` from the pack directory or the project root
    fn icon(&self) -> Option<PathBuf> {
        self.pack.icon()
    }
}

/// `<root>/.build/<name>-<target>[_MM-DD_HH-MM-SS].<ext>`
pub fn output_path(root: &Path, name: &str, target: ExportTarget, now: DateTime<Local>) -> PathBuf {
    let file_name = match target.timestamped() {
        true => format!("{name}-{}_{}.{}", target.name(), now.format("%m-%d_%H-%M-%S"), target.extension()),
        false => format!("{name}-{}.{}", target.name(), target.extension())
    };

    root.join(BUILD_DIR).join(file_name)
}

pub struct ExportPipeline {
    start_dir: PathBuf,
    options: ExportOptions
}

impl ExportPipeline {
    pub fn new(start_dir: &Path, options: ExportOptions) -> Self {
        ExportPipeline { start_dir: start_dir.to_path_buf(), options }
    }

    fn context(&self, target: ExportTarget) -> Result<ExportContext<'_>, ExportError> {
        let pack = Pack::load(&self.start_dir)
            .stage(target, ExportStage::Locate)?;

        if target != ExportTarget::CurseForge && target != ExportTarget::Modrinth {
            pack.require_minecraft_version()
                .map(|_| ())
                .stage(target, ExportStage::Locate)?;
        }

        let root = pack.project_root();
        let output = output_path(&root, &pack.project_name(), target, Local::now());

        if output.exists() {
            return Err(ExportError {
                target,
                stage: ExportStage::Zip,
                cause: Error::OutputExists(to_slash(&output)).into()
            });
        }

        let ctx = ExportContext { target, pack, options: &self.options, root, output };

        Ok(ctx)
    }

    /// Export a single target, returning the archive path
    pub async fn export(
        &self,
        target: ExportTarget,
        progress: &mut dyn Progress
    ) -> Result<PathBuf, ExportError> {
        let ctx = self.context(target)?;
        tracing::info!("Exporting {target} pack to {}", to_slash(&ctx.output));

        match target {
            ExportTarget::CurseForge | ExportTarget::Modrinth => platform::export(&ctx),
            ExportTarget::MultiMC => multimc::export(&ctx, progress).await,
            ExportTarget::Technic => technic::export(&ctx, progress).await,
            ExportTarget::Server => server::export(&ctx, progress).await
        }?;

        Ok(ctx.output)
    }

    /// Export each target in turn, a failed target doesn't stop the rest
    pub async fn export_many<F>(
        &self,
        targets: &[ExportTarget],
        progress: &mut dyn Progress,
        mut on_result: F
    ) -> BatchReport
        where F: FnMut(ExportTarget, &Result<PathBuf, ExportError>)
    {
        let mut report = BatchReport::default();

        for &target in targets {
            let result = self.export(target, progress).await;
            on_result(target, &result);

            match result {
                Ok(path) => report.succeeded.push((target, path)),
                Err(e) => {
                    tracing::info!("{e}");
                    report.failed.push(e);
                }
            }
        }

        report
    }

    pub async fn export_all<F>(&self, progress: &mut dyn Progress, on_result: F) -> BatchReport
        where F: FnMut(ExportTarget, &Result<PathBuf, ExportError>)
    {
        self.export_many(&ExportTarget::ALL, progress, on_result).await
    }
}

/// Write a text file inside a staging directory
fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Remove `path` if present, used to strip installer leftovers
fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => bail!("Failed to remove {}: {e}", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_targets_and_aliases() {
        assert_eq!("cf".parse::<ExportTarget>().unwrap(), ExportTarget::CurseForge);
        assert_eq!("MR".parse::<ExportTarget>().unwrap(), ExportTarget::Modrinth);
        assert_eq!("mmc".parse::<ExportTarget>().unwrap(), ExportTarget::MultiMC);
        assert_eq!("server".parse::<ExportTarget>().unwrap(), ExportTarget::Server);
        assert!(matches!("zip".parse::<ExportTarget>(), Err(Error::UnknownTarget(_))));
    }

    #[test]
    fn all_expands_in_build_order() {
        assert_eq!(ExportTarget::parse_list("all").unwrap(), vec![
            ExportTarget::CurseForge,
            ExportTarget::Modrinth,
            ExportTarget::MultiMC,
            ExportTarget::Technic,
            ExportTarget::Server
        ]);
        assert_eq!(ExportTarget::parse_list("technic").unwrap(), vec![ExportTarget::Technic]);
    }

    #[test]
    fn output_names_per_target() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        let root = Path::new("/packs/cool");

        assert_eq!(
            output_path(root, "cool", ExportTarget::Modrinth, now),
            root.join(".build").join("cool-modrinth_03-07_09-05-02.mrpack")
        );
        assert_eq!(
            output_path(root, "cool", ExportTarget::CurseForge, now),
            root.join(".build").join("cool-curseforge_03-07_09-05-02.zip")
        );
        assert_eq!(
            output_path(root, "cool", ExportTarget::Server, now),
            root.join(".build").join("cool-server.zip")
        );
    }

    #[test]
    fn export_error_names_target_and_stage() {
        let err = ExportError {
            target: ExportTarget::Technic,
            stage: ExportStage::Install,
            cause: Error::ToolNotFound(String::from("java")).into()
        };

        assert_eq!(
            err.to_string(),
            "Technic export failed while installing mods: 'java' not found, make sure it is installed and in PATH"
        );
        assert!(matches!(err.kind(), Some(Error::ToolNotFound(_))));
    }
}
