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

#[derive(Deserialize, Debug)]
pub struct GithubRelease {
    #[serde(default)]
    pub tag_name: String,
    pub assets: Vec<GithubAsset>
}

#[derive(Deserialize, Debug)]
pub struct GithubAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64
}

impl GithubRelease {
    pub fn find_asset<P>(&self, predicate: P) -> Option<&GithubAsset>
        where P: Fn(&str) -> bool
    {
        self.assets.iter().find(|a| predicate(&a.name))
    }
}
