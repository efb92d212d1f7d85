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

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::{
    export::{ExportOptions, ExportPipeline}, local_server::LocalServer, locator::{locate, to_slash},
    pack::Pack, packwiz::Packwiz, Error
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A different pack directory was selected
    PackDirChanged(PathBuf),

    /// pack.toml or the mod index was changed through this session
    PackModified
}

type Observer = Box<dyn Fn(&SessionEvent)>;

/// Current pack directory shared by every command handler
pub struct Session {
    pack_dir: Option<PathBuf>,
    start_dir: PathBuf,
    packwiz: Option<PathBuf>,
    observers: Vec<Observer>
}

impl Session {
    /// Session for the pack found at or above `start_dir`, if any
    pub fn new(start_dir: &Path) -> Self {
        Session {
            pack_dir: locate(start_dir),
            start_dir: start_dir.to_path_buf(),
            packwiz: None,
            observers: Vec::new()
        }
    }

    /// Use a specific packwiz binary for every command
    pub fn with_packwiz(mut self, program: Option<PathBuf>) -> Self {
        self.packwiz = program;
        self
    }

    pub fn pack_dir(&self) -> Option<&Path> {
        self.pack_dir.as_deref()
    }

    pub fn has_pack(&self) -> bool {
        self.pack_dir.is_some()
    }

    /// Pack directory or [`Error::PackNotFound`]
    pub fn require_pack_dir(&self) -> Result<&Path> {
        match &self.pack_dir {
            Some(dir) => Ok(dir.as_path()),
            None => Err(Error::PackNotFound(to_slash(&self.start_dir)).into())
        }
    }

    /// Select the pack containing `dir`, notifying observers when it changes
    pub fn set_pack_dir(&mut self, dir: &Path) -> Result<()> {
        let pack_dir = locate(dir)
            .ok_or_else(|| Error::PackNotFound(to_slash(dir)))?;

        self.start_dir = dir.to_path_buf();

        if self.pack_dir.as_ref() != Some(&pack_dir) {
            tracing::debug!("Pack directory changed to {}", to_slash(&pack_dir));
            self.pack_dir = Some(pack_dir.clone());
            self.notify(&SessionEvent::PackDirChanged(pack_dir));
        }

        Ok(())
    }

    pub fn subscribe<F>(&mut self, observer: F)
        where F: Fn(&SessionEvent) + 'static
    {
        self.observers.push(Box::new(observer));
    }

    pub fn notify(&self, event: &SessionEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }

    pub fn load_pack(&self) -> Result<Pack> {
        Pack::load_dir(self.require_pack_dir()?)
    }

    pub fn packwiz(&self) -> Result<Packwiz> {
        let packwiz = Packwiz::new(self.require_pack_dir()?);

        Ok(match &self.packwiz {
            Some(program) => packwiz.with_program(program),
            None => packwiz
        })
    }

    /// Local test server for the session's pack
    pub fn local_server(&self) -> Result<LocalServer> {
        Ok(LocalServer::new(self.load_pack()?))
    }

    /// Pipeline exporting the session's pack
    pub fn export_pipeline(&self, mut options: ExportOptions) -> Result<ExportPipeline> {
        if options.packwiz.is_none() {
            options.packwiz = self.packwiz.clone();
        }

        Ok(ExportPipeline::new(self.require_pack_dir()?, options))
    }
}
