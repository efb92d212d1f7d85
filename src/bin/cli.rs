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

pub use clap::Parser;
use clap::{ArgAction, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pw", author, version, about, long_about = None)]
pub struct Cli {
    /// Directory of the pack or any directory below it, defaults to "."
    #[arg(short = 'C', long, global = true)]
    pub dir: Option<String>,

    /// Java executable used to run the packwiz installer [default: $PW_JAVA or auto detect]
    #[arg(long, global = true)]
    pub java: Option<PathBuf>,

    /// More log output, repeat for debug logging
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the pack as curseforge, modrinth, multimc, technic, server or all
    #[command(alias = "export")]
    Build {
        /// Export target or "all"
        target: String,

        /// Install the MultiMC instance from the local pack.toml instead of the git remote
        #[arg(long)]
        local: bool
    },

    /// Add, remove, update and list mods
    Mod {
        #[clap(subcommand)]
        command: ModCommands
    },

    /// Generate a list of mods grouped by client, shared and server side
    Modlist {
        /// Plain name and url pairs instead of markdown
        #[arg(long)]
        raw: bool,

        /// Link to the exact mod versions
        #[arg(long)]
        versions: bool,

        /// Print to stdout instead of writing modlist.md
        #[arg(long)]
        print: bool
    },

    /// Add mods from a list of urls, one per line: URL [PATH] [NAME...]
    Import {
        /// File with urls to import [default: import.txt]
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Don't ask for confirmation
        #[arg(short)]
        yes: bool,

        /// Urls or mod identifiers to import instead of the file
        urls: Vec<String>
    },

    /// Print the url MultiMC instances install the pack from
    Detect {
        /// Print the local pack.toml path
        #[arg(long)]
        local: bool
    },

    /// Change name, author or version in pack.toml
    Change {
        /// Field to change
        key: String,

        /// New value, words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        value: Vec<String>
    },

    /// Print information about the pack
    Info,

    /// Manage Java installations used to run the packwiz installer
    Java {
        #[clap(subcommand)]
        command: JavaCommands
    },

    /// Run the pack on a local dedicated server in .run
    #[command(alias = "test-server")]
    Server {
        #[clap(subcommand)]
        command: ServerCommands
    },

    /// Refresh the pack index
    Refresh,

    /// Run a command in the pack directory
    Exec {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>
    },

    /// Run packwiz in the pack directory
    Packwiz {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>
    }
}

#[derive(Subcommand)]
pub enum ModCommands {
    /// Add a mod by url, mr:<slug>[:<version>], cf:<slug>[:<file>] or search term
    Add {
        id: String
    },

    /// Remove a mod
    #[command(alias = "rm")]
    Remove {
        name: String
    },

    /// Update one mod or all mods
    Update {
        name: Option<String>
    },

    /// List mods in the pack
    #[command(alias = "ls")]
    List
}

#[derive(Subcommand)]
pub enum JavaCommands {
    /// List detected Java installations
    List,

    /// Show the Java version required by the pack and the installation that would be used
    Status,

    /// Download a managed Temurin runtime
    Install {
        /// Java major version, 8, 17 or 21
        version: u32
    },

    /// Print the path of a managed runtime
    Path {
        /// Java major version, 8, 17 or 21
        version: u32
    },

    /// Delete a managed runtime
    Remove {
        /// Java major version, 8, 17 or 21
        version: u32
    },

    /// Run a managed runtime: pw java <version> [args...]
    #[command(external_subcommand)]
    Run(Vec<String>)
}

#[derive(Subcommand)]
pub enum ServerCommands {
    /// Accept the EULA, install server side mods and download the server jar
    Setup,

    /// Start the server in the foreground
    Start,

    /// How to stop a running server
    Stop,

    /// Delete and set up the server again
    Reset,

    /// Delete the server directory
    Delete,

    /// Show whether the server is set up and which Java it would use
    Status
}
