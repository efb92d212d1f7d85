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

use serde::Deserialize;
use std::fmt::Display;

#[derive(Deserialize, Debug)]
pub struct ModToml {
    pub name: String,

    #[serde(default)]
    pub filename: String,

    #[serde(default)]
    pub side: Side,

    #[serde(default)]
    pub download: ModDownload,

    #[serde(default)]
    pub update: ModUpdate
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Client,
    Server,
    #[default]
    #[serde(other)]
    Both
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Client => write!(f, "client"),
            Side::Server => write!(f, "server"),
            Side::Both => write!(f, "both")
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ModDownload {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub hash_format: String,

    #[serde(default)]
    pub hash: String
}

#[derive(Deserialize, Debug, Default)]
pub struct ModUpdate {
    pub modrinth: Option<ModrinthUpdate>,
    pub curseforge: Option<CurseForgeUpdate>
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct ModrinthUpdate {
    pub mod_id: String,
    pub version: String
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct CurseForgeUpdate {
    pub file_id: u64,
    pub project_id: u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modrinth_metafile() {
        let m: ModToml = toml::from_str(r#"
            name = "Sodium"
            filename = "sodium-fabric-0.5.8.jar"
            side = "client"

            [download]
            url = "https://cdn.modrinth.com/data/AANobbMI/versions/abc/sodium.jar"
            hash-format = "sha1"
            hash = "0123"

            [update.modrinth]
            mod-id = "AANobbMI"
            version = "abc"
        "#).unwrap();

        assert_eq!(m.name, "Sodium");
        assert_eq!(m.side, Side::Client);
        assert_eq!(m.download.hash_format, "sha1");
        assert_eq!(m.update.modrinth.unwrap().mod_id, "AANobbMI");
        assert!(m.update.curseforge.is_none());
    }

    #[test]
    fn parse_curseforge_metafile() {
        let m: ModToml = toml::from_str(r#"
            name = "JEI"
            filename = "jei.jar"
            side = "both"

            [update.curseforge]
            file-id = 4712866
            project-id = 238222
        "#).unwrap();

        let cf = m.update.curseforge.unwrap();
        assert_eq!(cf.project_id, 238222);
        assert_eq!(cf.file_id, 4712866);
        assert_eq!(m.side, Side::Both);
    }

    #[test]
    fn unknown_or_missing_side_is_both() {
        let m: ModToml = toml::from_str("name = \"A\"\nside = \"everywhere\"").unwrap();
        assert_eq!(m.side, Side::Both);

        let m: ModToml = toml::from_str("name = \"A\"").unwrap();
        assert_eq!(m.side, Side::Both);
    }
}
