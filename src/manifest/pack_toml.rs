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

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct PackToml {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub pack_format: String,

    /// Legacy flat minecraft version, superseded by `[versions].minecraft`
    #[serde(default)]
    pub mc_version: String,

    #[serde(default)]
    pub index: PackIndexRef,

    #[serde(default)]
    pub versions: PackVersions
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct PackIndexRef {
    #[serde(default = "default_index_file")]
    pub file: String,

    #[serde(default)]
    pub hash_format: String,

    #[serde(default)]
    pub hash: String
}

impl Default for PackIndexRef {
    fn default() -> Self {
        PackIndexRef {
            file: default_index_file(),
            hash_format: String::new(),
            hash: String::new()
        }
    }
}

fn default_index_file() -> String {
    String::from("index.toml")
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct PackVersions {
    pub minecraft: Option<String>,
    pub fabric: Option<String>,
    pub forge: Option<String>,
    pub quilt: Option<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    Fabric,
    Forge,
    Quilt
}

impl LoaderKind {
    /// Component uid used in MultiMC `mmc-pack.json`
    pub fn mmc_uid(&self) -> &'static str {
        match self {
            LoaderKind::Fabric => "net.fabricmc.fabric-loader",
            LoaderKind::Forge => "net.minecraftforge",
            LoaderKind::Quilt => "org.quiltmc.quilt-loader"
        }
    }
}

impl Display for LoaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderKind::Fabric => write!(f, "fabric"),
            LoaderKind::Forge => write!(f, "forge"),
            LoaderKind::Quilt => write!(f, "quilt")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModLoader {
    pub kind: LoaderKind,
    pub version: String
}

impl PackToml {
    /// Minecraft version from `[versions]`, falling back to the flat `mc-version`
    pub fn minecraft_version(&self) -> &str {
        match self.versions.minecraft.as_deref() {
            Some(v) if !v.trim().is_empty() => v.trim(),
            _ => self.mc_version.trim()
        }
    }

    /// First mod loader present, in fabric, forge, quilt order
    pub fn loader(&self) -> Option<ModLoader> {
        [
            (LoaderKind::Fabric, &self.versions.fabric),
            (LoaderKind::Forge, &self.versions.forge),
            (LoaderKind::Quilt, &self.versions.quilt)
        ]
            .into_iter()
            .find_map(|(kind, version)| match version {
                Some(v) if !v.is_empty() => Some(ModLoader { kind, version: v.clone() }),
                _ => None
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minecraft_version_prefers_versions_table() {
        let pack: PackToml = toml::from_str(r#"
            name = "Test"
            mc-version = "1.19.2"

            [versions]
            minecraft = "1.20.1"
        "#).unwrap();

        assert_eq!(pack.minecraft_version(), "1.20.1");
    }

    #[test]
    fn minecraft_version_falls_back_to_legacy_field() {
        let pack: PackToml = toml::from_str(r#"
            name = "Test"
            mc-version = "1.19.2"
        "#).unwrap();

        assert_eq!(pack.minecraft_version(), "1.19.2");

        let pack: PackToml = toml::from_str("name = \"Test\"").unwrap();
        assert_eq!(pack.minecraft_version(), "");
    }

    #[test]
    fn index_file_defaults_when_missing() {
        let pack: PackToml = toml::from_str("name = \"Test\"").unwrap();
        assert_eq!(pack.index.file, "index.toml");
    }

    #[test]
    fn loader_picks_first_present() {
        let pack: PackToml = toml::from_str(r#"
            [versions]
            minecraft = "1.20.1"
            quilt = "0.21.0"
            forge = "47.2.0"
        "#).unwrap();

        assert_eq!(pack.loader(), Some(ModLoader {
            kind: LoaderKind::Forge,
            version: String::from("47.2.0")
        }));
    }

    #[test]
    fn loader_none_for_vanilla() {
        let pack: PackToml = toml::from_str(r#"
            [versions]
            minecraft = "1.20.4"
        "#).unwrap();

        assert_eq!(pack.loader(), None);
    }
}
