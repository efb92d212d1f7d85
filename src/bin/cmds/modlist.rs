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
use std::fs;

use packwrap::{to_slash, Modlist, ModlistFormat, Session, MODLIST_FILE};
use super::print_success;

pub fn write_modlist(session: &Session, raw: bool, with_versions: bool, print: bool) -> Result<()> {
    let pack = session.load_pack()?;
    let modlist = Modlist::new(pack.mods()?);

    let format = match raw {
        true => ModlistFormat::Raw,
        false => ModlistFormat::Markdown
    };
    let text = modlist.render(format, with_versions);

    if raw || print {
        print!("{text}");
        return Ok(());
    }

    let path = pack.project_root().join(MODLIST_FILE);
    fs::write(&path, text)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    print_success(format!("Wrote {} mods to {}", modlist.len(), to_slash(&path)));
    Ok(())
}
