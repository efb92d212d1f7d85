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

use anyhow::{bail, Result};
use std::path::Path;

use packwrap::{
    import_mods, parse_import_file, parse_import_lines, ImportEntry, Session, SessionEvent,
    IMPORT_FILE
};
use super::{print_failure, print_success, prompt_confirm};

pub fn import_urls(session: &Session, input: Option<&Path>, yes: bool, urls: &[String]) -> Result<()> {
    let entries: Vec<ImportEntry> = match urls.is_empty() {
        false => parse_import_lines(&urls.join("\n")),
        true => parse_import_file(input.unwrap_or(Path::new(IMPORT_FILE)))?
    };

    if entries.is_empty() {
        println!("Nothing to import");
        return Ok(());
    }

    if !yes && !prompt_confirm(format!("Import {} mods?", entries.len()))? {
        return Ok(());
    }

    let packwiz = session.packwiz()?;
    let total = entries.len();

    let summary = import_mods(&packwiz, &entries, |i, entry, result| match result {
        Ok(()) => print_success(format!("[{}/{total}] {}", i + 1, entry.url)),
        Err(e) => print_failure(format!("[{}/{total}] {}: {e:#}", i + 1, entry.url))
    });

    if summary.imported > 0 {
        session.notify(&SessionEvent::PackModified);
    }

    println!("\nImported {} of {total} mods", summary.imported);

    if !summary.failed.is_empty() {
        for (url, _) in &summary.failed {
            print_failure(url);
        }
        bail!("{} imports failed", summary.failed.len());
    }

    Ok(())
}
