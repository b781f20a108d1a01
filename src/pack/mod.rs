// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

mod modrinth;

pub use modrinth::ModrinthPack;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ConfigFile;
use crate::Error;

/// The version pair a pack install resolves to, everything downstream (the
/// loader installer, the server jar name) is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackVersions {
    pub mc_version: String,
    pub loader_version: String,
}

/// The closed set of supported modpack formats.
///
/// A new format means a new variant plus an arm in [`create_pack_type`], an
/// unrecognized tag in the setup file fails at config parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackFormat {
    Modrinth,
}

/// A format-specific pack installer.
///
/// Rules:
///  - install everything the pack ships into the base path
///  - report the version pair the server runtime must be built for
///  - leave the lock file alone, the orchestrator owns it
#[async_trait]
pub trait PackType: Send {
    /// Install the pack, resolving the version pair it targets.
    async fn install(&mut self) -> Result<PackVersions, Error>;
}

/// Select the installer for the configured format, once at startup.
pub fn create_pack_type(config: &ConfigFile, client: &Client) -> Box<dyn PackType> {
    match config.install.modpack_format {
        PackFormat::Modrinth => Box::new(ModrinthPack::new(config, client.clone())),
    }
}
