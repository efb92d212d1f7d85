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
use futures_util::StreamExt;
use reqwest::Client;
use std::{fs::{self, File}, io, path::{Path, PathBuf}};

use crate::{env, manifest::GithubRelease, Progress};

const GITHUB_API_URL: &str = "https://api.github.com";

pub struct GithubClient {
    client: Client
}

impl GithubClient {
    pub fn new() -> Result<Self> {
        // api.github.com rejects requests without a user agent
        let client = Client::builder()
            .user_agent(format!("{}/{}", env::get_package_name(), env::get_package_version()))
            .build()?;

        Ok(GithubClient { client })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        Ok(self.client.get(url)
            .send().await?
            .error_for_status()?
            .json::<T>().await?)
    }

    /// Latest release of `repo` in `owner/name` form
    pub async fn latest_release(&self, repo: &str) -> Result<GithubRelease> {
        let url = format!("{GITHUB_API_URL}/repos/{repo}/releases/latest");
        self.fetch_json(&url).await
            .with_context(|| format!("Failed to fetch latest release of {repo}"))
    }

    /// Stream `url` to `file_path`.
    ///
    /// The body is written to a `.part` sibling and renamed into place once
    /// complete, so a failed download never leaves a truncated `file_path`.
    pub async fn download_file(
        &self,
        url: &str,
        file_path: &Path,
        progress: &mut dyn Progress
    ) -> Result<()> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let part_path = part_path(file_path);
        let result = self.download_to(url, &part_path, progress).await
            .and_then(|_| Ok(fs::rename(&part_path, file_path)?));

        progress.end();

        if let Err(e) = result {
            if part_path.exists() {
                if let Err(rm) = fs::remove_file(&part_path) {
                    tracing::warn!("Failed to remove {}: {rm}", part_path.display());
                }
            }
            return Err(e).with_context(|| format!("Failed to download {url}"));
        }

        tracing::debug!("Downloaded {url} to {}", file_path.display());

        Ok(())
    }

    async fn download_to(&self, url: &str, path: &Path, progress: &mut dyn Progress) -> Result<()> {
        let response = self.client.get(url)
            .send().await?
            .error_for_status()?;

        let total = response.content_length().unwrap_or(0) as usize;
        let mut stream = response.bytes_stream();

        let mut file = File::create(path)?;
        let mut downloaded = 0;

        progress.begin("Downloading", total);

        while let Some(item) = stream.next().await {
            let chunk = item?;
            io::copy(&mut chunk.as_ref(), &mut file)?;
            downloaded += chunk.len();
            progress.advance(downloaded);
        }

        file.sync_all()?;

        Ok(())
    }
}

/// `<file>.part` next to `file_path`
fn part_path(file_path: &Path) -> PathBuf {
    let mut name = file_path.file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    file_path.with_file_name(name)
}
