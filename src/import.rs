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

use anyhow::{Context, Result};
use std::{fs, path::Path};
use url::Url;

use crate::packwiz::{ModIdentifier, Packwiz};

pub const IMPORT_FILE: &str = "import.txt";

/// One line of an import list: `URL [PATH] [NAME...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub url: String,

    /// Metafile folder, recognised by containing a path separator
    pub path: Option<String>,

    pub name: Option<String>
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: usize,

    /// Source line and error message of each failed import
    pub failed: Vec<(String, String)>
}

impl ImportEntry {
    /// Parse a line, `None` for blank lines and `#` comments
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let mut parts = line.split_whitespace();
        let url = parts.next()?.to_string();
        let rest: Vec<&str> = parts.collect();

        let (path, name_parts) = match rest.first() {
            Some(p) if p.contains('/') || p.contains('\\') => (Some(p.to_string()), &rest[1..]),
            _ => (None, &rest[..])
        };

        let name = match name_parts.join(" ") {
            n if n.is_empty() => None,
            n => Some(n)
        };

        Some(ImportEntry { url, path, name })
    }

    fn is_platform_url(&self) -> bool {
        self.url.contains("modrinth.com") || self.url.contains("curseforge.com")
    }

    /// Name for a direct download, falling back to the url's file name
    fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        Url::parse(&self.url).ok()
            .and_then(|u| u.path_segments()
                .and_then(|s| s.filter(|s| !s.is_empty()).last().map(String::from)))
            .map(|file| match file.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem.to_string(),
                _ => file
            })
            .unwrap_or_else(|| String::from("mod"))
    }

    fn import(&self, packwiz: &Packwiz) -> Result<()> {
        let is_url = self.url.starts_with("http://") || self.url.starts_with("https://");

        if !is_url || self.is_platform_url() {
            let id: ModIdentifier = self.url.parse()?;
            packwiz.add(&id)
        } else {
            packwiz.add_url(&self.url, &self.display_name(), self.path.as_deref())
        }
    }
}

pub fn parse_import_lines(text: &str) -> Vec<ImportEntry> {
    text.lines().filter_map(ImportEntry::parse).collect()
}

pub fn parse_import_file(path: &Path) -> Result<Vec<ImportEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open import file {}", path.display()))?;

    Ok(parse_import_lines(&text))
}

/// Add every entry with packwiz, continuing past failures
pub fn import_mods<F>(packwiz: &Packwiz, entries: &[ImportEntry], mut on_result: F) -> ImportSummary
    where F: FnMut(usize, &ImportEntry, &Result<()>)
{
    let mut summary = ImportSummary::default();

    for (i, entry) in entries.iter().enumerate() {
        let result = entry.import(packwiz);
        on_result(i, entry, &result);

        match result {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                tracing::warn!("Failed to import {}: {e:#}", entry.url);
                summary.failed.push((entry.url.clone(), format!("{e:#}")));
            }
        }
    }

    summary
}
