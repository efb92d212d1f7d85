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
use console::style;

use packwrap::{ModIdentifier, Session, SessionEvent};
use super::print_success;

pub fn add_mod(session: &Session, id: &str) -> Result<()> {
    let id: ModIdentifier = id.parse()?;
    session.packwiz()?.add(&id)?;
    session.notify(&SessionEvent::PackModified);

    print_success("Mod added");
    Ok(())
}

pub fn remove_mod(session: &Session, name: &str) -> Result<()> {
    session.packwiz()?.remove(name)?;
    session.notify(&SessionEvent::PackModified);

    print_success(format!("Removed {name}"));
    Ok(())
}

pub fn update_mods(session: &Session, name: Option<&str>) -> Result<()> {
    session.packwiz()?.update(name)?;
    session.notify(&SessionEvent::PackModified);

    print_success(match name {
        Some(name) => format!("Updated {name}"),
        None => String::from("Updated all mods")
    });
    Ok(())
}

pub fn list_mods(session: &Session) -> Result<()> {
    let pack = session.load_pack()?;
    let mods = pack.mods()?;

    for m in &mods {
        println!("{} {} {}", m.name, style(&m.filename).dim(), style(m.side).cyan());
    }

    println!("\n{} mods", mods.len());
    Ok(())
}
