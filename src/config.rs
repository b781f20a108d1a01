// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The declarative setup file describing what to install and how to launch.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::pack::PackFormat;
use crate::Error;

/// Well-known location of the setup file, relative to the working directory.
pub const CONFIG_PATH: &str = "server-setup-config.yaml";

/// The whole setup file.
///
/// A missing or malformed file is fatal at startup, no partial defaults are
/// invented for the `install` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub install: InstallConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    /// Directory everything is installed into, empty means the working directory.
    #[serde(default)]
    pub base_install_path: String,
    /// Where the modpack comes from, also the identity recorded in the lock file.
    pub modpack_url: String,
    pub modpack_format: PackFormat,
    /// Explicit Minecraft version, wins over whatever the pack index declares.
    #[serde(default)]
    pub mc_version: String,
    /// Explicit mod loader version, wins over whatever the pack index declares.
    #[serde(default)]
    pub loader_version: String,
    #[serde(default)]
    pub additional_files: Vec<AdditionalFile>,
}

/// An extra file to place into the installation, e.g. server.properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFile {
    pub url: String,
    /// Destination path relative to the base install path.
    pub destination: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LaunchConfig {
    /// Extra arguments placed before `-jar`, e.g. `-Xmx4G`.
    pub java_args: Vec<String>,
    pub auto_restart: bool,
    /// Trailing window over which starts are counted, e.g. "2h", "30min", "45s" or "45".
    pub crash_timer: String,
    /// Once more starts than this fall inside the window, the server stays down.
    pub crash_limit: usize,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            java_args: Vec::new(),
            auto_restart: true,
            crash_timer: "60min".to_string(),
            crash_limit: 3,
        }
    }
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .map_err(|e| format!("could not open {}: {}", path.display(), e))?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// The base install path as a directory, "." when unset.
    pub fn base_dir(&self) -> PathBuf {
        if self.install.base_install_path.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&self.install.base_install_path)
        }
    }
}
