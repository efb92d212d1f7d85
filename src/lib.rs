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

mod archive;
pub mod env;
mod export;
mod filter;
mod fs;
mod git;
mod github_client;
mod import;
mod installer;
pub mod java;
mod local_server;
mod locator;
mod manifest;
mod modlist;
mod pack;
mod packwiz;
mod session;
mod staging;

pub use {
    archive::{build_zip, build_zip_from_map, extract_zip},
    export::{BatchReport, ExportError, ExportOptions, ExportPipeline, ExportStage, ExportTarget},
    filter::{Decision, FileFilter},
    git::{detect_remote_pack_url, raw_pack_url},
    github_client::GithubClient,
    import::{import_mods, parse_import_file, parse_import_lines, ImportEntry, ImportSummary, IMPORT_FILE},
    installer::{ensure_installer_jar, install_mods, run_installer, stage_installer, InstallSide, INSTALLER_JAR},
    java::JavaInstall,
    local_server::{LocalServer, ServerStatus, RUN_DIR},
    locator::{locate, project_root, to_slash},
    manifest::{IndexEntry, IndexToml, LoaderKind, ModLoader, ModToml, PackToml, Side},
    modlist::{mod_url, Modlist, ModlistFormat, MODLIST_FILE},
    pack::{Mod, ModSource, Pack, INDEX_FILE, PACK_FILE},
    packwiz::{ModIdentifier, Packwiz},
    session::{Session, SessionEvent},
    staging::StagingArea
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No pack.toml found in '{0}' or any parent directory")]
    PackNotFound(String),
    #[error("Minecraft version is not set in pack.toml, add it under [versions]")]
    MissingMinecraftVersion,
    #[error("'{0}' not found, make sure it is installed and in PATH")]
    ToolNotFound(String),
    #[error("{tool} exited with {status}")]
    ToolFailed { tool: String, status: String },
    #[error("Output file '{0}' already exists")]
    OutputExists(String),
    #[error("Unknown export target '{0}', expected curseforge, modrinth, multimc, technic, server or all")]
    UnknownTarget(String),
    #[error("No compatible Java {0} installation found")]
    JavaNotFound(u32),
    #[error("Java {0} is not a managed runtime version, expected 8, 17 or 21")]
    UnsupportedJavaVersion(u32),
    #[error("Java {0} is not installed, run `pw java install {0}`")]
    JavaNotInstalled(u32),
    #[error("Local server needs a Fabric pack, found {0}")]
    UnsupportedServerLoader(String),
    #[error("Local server is not set up, run `pw server setup`")]
    ServerNotSetUp,
    #[error("Release asset '{0}' not found")]
    AssetNotFound(String),
    #[error("Invalid mod identifier '{0}'")]
    InvalidModIdentifier(String),
    #[error("Unknown pack field '{0}', expected name, author or version")]
    InvalidPackField(String)
}

pub trait Progress {
    fn begin(&mut self, message: &'static str, total: usize);
    fn end(&mut self);
    fn advance(&mut self, current: usize);
}

/// Progress sink that ignores all updates
pub struct NoProgress;

impl Progress for NoProgress {
    fn begin(&mut self, _message: &'static str, _total: usize) { }
    fn end(&mut self) { }
    fn advance(&mut self, _current: usize) { }
}
