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

use anyhow::{anyhow, bail, Context, Result};
use std::{env, fs, io, path::Path, process::{Command, Stdio}};
use url::Url;

use crate::{locator::to_slash, pack::PACK_FILE, Error};

/// Branch name set by GitHub Actions for pull request builds
const HEAD_REF_VAR: &str = "GITHUB_HEAD_REF";

fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = match Command::new("git").args(args).current_dir(dir).stdin(Stdio::null()).output() {
        Ok(output) => output,
        Err(e) if e.kind() == io::ErrorKind::NotFound => bail!(Error::ToolNotFound(String::from("git"))),
        Err(e) => return Err(e).context("Failed to run git")
    };

    if !output.status.success() {
        bail!(Error::ToolFailed {
            tool: format!("git {}", args.join(" ")),
            status: output.status.to_string()
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Raw URL of `pack.toml` on the hosting service of the `origin` remote
pub fn detect_remote_pack_url(pack_dir: &Path) -> Result<String> {
    let remote = git(pack_dir, &["remote", "get-url", "origin"])?;

    let branch = match git(pack_dir, &["branch", "--show-current"])? {
        branch if !branch.is_empty() => branch,
        _ => env::var(HEAD_REF_VAR)
            .ok()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| anyhow!("Unable to determine current git branch"))?
    };

    let top_level = fs::canonicalize(git(pack_dir, &["rev-parse", "--show-toplevel"])?)?;
    let pack_file = fs::canonicalize(pack_dir.join(PACK_FILE))?;
    let rel_path = pack_file.strip_prefix(&top_level)
        .with_context(|| format!("{} is outside the git repository", pack_file.display()))?;

    raw_pack_url(&remote, &branch, &to_slash(rel_path))
}

/// Turn `git@host:owner/repo.git` or `ssh://` remotes into `https://host/owner/repo`
fn normalize_remote(remote: &str) -> Result<Url> {
    let remote = remote.trim().trim_end_matches('/');
    let remote = remote.strip_suffix(".git").unwrap_or(remote);

    let url = match Url::parse(remote) {
        Ok(url) => url,
        Err(_) => {
            // scp-like syntax, user@host:path
            let (host, path) = remote.split_once(':')
                .ok_or_else(|| anyhow!("Unrecognized git remote '{remote}'"))?;
            let host = host.rsplit('@').next().unwrap_or(host);
            Url::parse(&format!("https://{host}/{path}"))?
        }
    };

    let host = url.host_str()
        .ok_or_else(|| anyhow!("Git remote '{remote}' has no host"))?;

    Ok(Url::parse(&format!("https://{host}{}", url.path()))?)
}

/// Build the raw file URL for `rel_path` on `branch`.
///
/// GitHub uses raw.githubusercontent.com, GitLab uses `/-/raw/` and anything
/// else is assumed to be Gitea style `/raw/branch/`.
pub fn raw_pack_url(remote: &str, branch: &str, rel_path: &str) -> Result<String> {
    let url = normalize_remote(remote)?;
    let repo_path = url.path().trim_matches('/');
    let host = url.host_str().unwrap_or_default();

    Ok(match host {
        "github.com" => format!("https://raw.githubusercontent.com/{repo_path}/{branch}/{rel_path}"),
        host if host.contains("gitlab") => format!("https://{host}/{repo_path}/-/raw/{branch}/{rel_path}"),
        host => format!("https://{host}/{repo_path}/raw/branch/{branch}/{rel_path}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_https_remote() {
        assert_eq!(
            raw_pack_url("https://github.com/owner/pack.git", "main", "pack.toml").unwrap(),
            "https://raw.githubusercontent.com/owner/pack/main/pack.toml"
        );
    }

    #[test]
    fn github_ssh_remote() {
        assert_eq!(
            raw_pack_url("git@github.com:owner/pack.git", "dev", ".minecraft/pack.toml").unwrap(),
            "https://raw.githubusercontent.com/owner/pack/dev/.minecraft/pack.toml"
        );
        assert_eq!(
            raw_pack_url("ssh://git@github.com/owner/pack", "dev", "pack.toml").unwrap(),
            "https://raw.githubusercontent.com/owner/pack/dev/pack.toml"
        );
    }

    #[test]
    fn gitlab_remote() {
        assert_eq!(
            raw_pack_url("https://gitlab.com/group/pack", "main", "pack.toml").unwrap(),
            "https://gitlab.com/group/pack/-/raw/main/pack.toml"
        );
    }

    #[test]
    fn gitea_remote() {
        assert_eq!(
            raw_pack_url("https://git.example.org/me/pack.git/", "main", "pack.toml").unwrap(),
            "https://git.example.org/me/pack/raw/branch/main/pack.toml"
        );
    }

    #[test]
    fn detect_fails_outside_repository() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(PACK_FILE), "name = \"x\"").unwrap();

        assert!(detect_remote_pack_url(tmp.path()).is_err());
    }
}
