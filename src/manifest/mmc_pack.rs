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

use serde::Serialize;

use super::PackToml;

/// LWJGL version written to every MultiMC instance
pub const LWJGL_VERSION: &str = "3.3.3";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MmcPack {
    pub components: Vec<MmcComponent>,
    pub format_version: u32
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct MmcComponent {
    pub uid: String,
    pub version: String
}

impl MmcComponent {
    fn new(uid: &str, version: &str) -> Self {
        MmcComponent { uid: uid.to_string(), version: version.to_string() }
    }
}

impl MmcPack {
    /// Minecraft first, then LWJGL, then the loader when the pack has one
    pub fn from_pack(pack: &PackToml) -> Self {
        let mut components = vec![
            MmcComponent::new("net.minecraft", pack.minecraft_version()),
            MmcComponent::new("org.lwjgl3", LWJGL_VERSION)
        ];

        if let Some(loader) = pack.loader() {
            components.push(MmcComponent::new(loader.kind.mmc_uid(), &loader.version));
        }

        MmcPack { components, format_version: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_in_order() {
        let pack: PackToml = toml::from_str(r#"
            [versions]
            minecraft = "1.20.1"
            fabric = "0.15.7"
        "#).unwrap();

        let mmc = MmcPack::from_pack(&pack);
        let json = serde_json::to_value(&mmc).unwrap();

        assert_eq!(json["formatVersion"], 1);
        assert_eq!(json["components"][0]["uid"], "net.minecraft");
        assert_eq!(json["components"][0]["version"], "1.20.1");
        assert_eq!(json["components"][1]["uid"], "org.lwjgl3");
        assert_eq!(json["components"][2]["uid"], "net.fabricmc.fabric-loader");
        assert_eq!(json["components"][2]["version"], "0.15.7");
    }

    #[test]
    fn vanilla_has_no_loader_component() {
        let pack: PackToml = toml::from_str("[versions]\nminecraft = \"1.21\"").unwrap();
        assert_eq!(MmcPack::from_pack(&pack).components.len(), 2);
    }
}
