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

use anyhow::{bail, Context, Result};
use std::{
    env, ffi::OsStr, io, path::{Path, PathBuf}, process::{Command, Stdio}, str::FromStr
};

use crate::{locator::to_slash, Error};

const PACKWIZ: &str = "packwiz";

/// How a mod was named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModIdentifier {
    /// `mr:<slug>[:<version-id>]`
    Modrinth { slug: String, version: Option<String> },

    /// `cf:<slug>[:<file-id>]`
    CurseForge { slug: String, file: Option<String> },

    /// A modrinth.com, curseforge.com or other project url
    Url(String),

    /// Bare slug or search term, tried on Modrinth then CurseForge
    Search(String)
}

impl FromStr for ModIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidModIdentifier(s.to_string()));
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(ModIdentifier::Url(s.to_string()));
        }

        let mut parts = s.splitn(3, ':');
        let platform = parts.next().unwrap_or_default();
        let slug = parts.next();
        let version = parts.next().filter(|v| !v.is_empty()).map(String::from);

        match (platform, slug) {
            ("mr" | "modrinth", Some(slug)) if !slug.is_empty() => Ok(ModIdentifier::Modrinth {
                slug: slug.to_string(),
                version
            }),
            ("cf" | "curseforge", Some(slug)) if !slug.is_empty() => Ok(ModIdentifier::CurseForge {
                slug: slug.to_string(),
                file: version
            }),
            (_, None) => Ok(ModIdentifier::Search(s.to_string())),
            _ => Err(Error::InvalidModIdentifier(s.to_string()))
        }
    }
}

impl ModIdentifier {
    /// packwiz argument lists to try in order until one succeeds
    pub fn add_commands(&self) -> Vec<Vec<String>> {
        let args = |parts: &[&str]| parts.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        match self {
            ModIdentifier::Modrinth { slug, version: Some(v) } => {
                vec![args(&["modrinth", "add", slug.as_str(), "--version-id", v.as_str()])]
            },
            ModIdentifier::Modrinth { slug, version: None } => {
                vec![args(&["modrinth", "add", slug.as_str()])]
            },
            ModIdentifier::CurseForge { slug, file: Some(f) } => {
                vec![args(&["curseforge", "add", slug.as_str(), "--file-id", f.as_str()])]
            },
            ModIdentifier::CurseForge { slug, file: None } => {
                vec![args(&["curseforge", "add", slug.as_str()])]
            },
            ModIdentifier::Url(url) if url.contains("modrinth.com") => {
                vec![args(&["modrinth", "add", url.as_str()])]
            },
            ModIdentifier::Url(url) if url.contains("curseforge.com") => {
                vec![args(&["curseforge", "add", url.as_str()])]
            },
            ModIdentifier::Url(term) | ModIdentifier::Search(term) => vec![
                args(&["modrinth", "add", term.as_str()]),
                args(&["curseforge", "add", term.as_str()])
            ]
        }
    }
}

/// Runs packwiz against a single pack directory
pub struct Packwiz {
    pack_dir: PathBuf,
    program: PathBuf
}

impl Packwiz {
    pub fn new(pack_dir: &Path) -> Self {
        Packwiz {
            pack_dir: pack_dir.to_path_buf(),
            program: PathBuf::from(PACKWIZ)
        }
    }

    /// Use a specific packwiz binary instead of the one in PATH
    pub fn with_program(mut self, program: &Path) -> Self {
        self.program = program.to_path_buf();
        self
    }

    /// Whether a packwiz executable exists somewhere in PATH
    pub fn is_installed() -> bool {
        let exe = if cfg!(windows) { "packwiz.exe" } else { PACKWIZ };

        env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).any(|dir| dir.join(exe).is_file()))
            .unwrap_or(false)
    }

    /// Run packwiz with `args` from `dir`, passing through stdio
    pub fn run_in<I, S>(&self, dir: &Path, args: I) -> Result<()>
        where I: IntoIterator<Item = S>, S: AsRef<OsStr>
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        tracing::debug!("Running {cmd:?}");

        let status = match cmd.status() {
            Ok(status) => status,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                bail!(Error::ToolNotFound(to_slash(&self.program)))
            },
            Err(e) => return Err(e).context("Failed to start packwiz")
        };

        if !status.success() {
            bail!(Error::ToolFailed { tool: PACKWIZ.to_string(), status: status.to_string() });
        }

        Ok(())
    }

    pub fn run<I, S>(&self, args: I) -> Result<()>
        where I: IntoIterator<Item = S>, S: AsRef<OsStr>
    {
        self.run_in(&self.pack_dir, args)
    }

    pub fn add(&self, id: &ModIdentifier) -> Result<()> {
        let mut last_err = None;

        for args in id.add_commands() {
            match self.run(&args) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::info!("packwiz {} failed: {e:#}", args.join(" "));
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::InvalidModIdentifier(format!("{id:?}")).into()))
    }

    /// Add a direct download url as `name`, optionally into `meta_folder`
    pub fn add_url(&self, url: &str, name: &str, meta_folder: Option<&str>) -> Result<()> {
        let mut args = vec!["url", "add", name, url];
        if let Some(folder) = meta_folder {
            args.extend(["--meta-folder", folder]);
        }

        self.run(&args)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        self.run(["remove", name])
    }

    pub fn update(&self, name: Option<&str>) -> Result<()> {
        match name {
            Some(name) => self.run(["update", name]),
            None => self.run(["update", "--all"])
        }
    }

    pub fn refresh(&self) -> Result<()> {
        self.run(["refresh"])
    }

    /// `packwiz <platform> export` of the pack in `dir` to `output`
    pub fn export(&self, dir: &Path, platform: &str, output: &Path) -> Result<()> {
        let pack_file = dir.join(crate::pack::PACK_FILE);
        self.run_in(dir, [
            OsStr::new(platform),
            OsStr::new("export"),
            OsStr::new("--pack-file"),
            pack_file.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str()
        ])
    }
}
