// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Modrinth packs, consumed through their index manifest.
//!
//! The index declares the minecraft/loader versions under `dependencies` and
//! every file the pack ships under `files`. Entries marked unsupported on the
//! server side (resource packs, shaders) are skipped.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::Client;
use serde_json::Value;

use crate::config::ConfigFile;
use crate::fetch;
use crate::pack::{PackType, PackVersions};
use crate::Error;

const INDEX_FILE: &str = "modrinth.index.json";

pub struct ModrinthPack {
    base: PathBuf,
    /// Index url, or a local path to an already extracted index.
    source: String,
    mc_version: String,
    loader_version: String,
    client: Client,
}

impl ModrinthPack {
    pub fn new(config: &ConfigFile, client: Client) -> Self {
        Self {
            base: config.base_dir(),
            source: config.install.modpack_url.clone(),
            mc_version: config.install.mc_version.clone(),
            loader_version: config.install.loader_version.clone(),
            client,
        }
    }

    async fn load_index(&self) -> Result<String, Error> {
        if self.source.starts_with("http://") || self.source.starts_with("https://") {
            fetch::fetch_text(&self.client, &self.source).await
        } else {
            fs::read_to_string(&self.source)
                .map_err(|e| format!("could not read pack index {}: {}", self.source, e).into())
        }
    }

    async fn download_mods(&self, mods: &[String]) -> Result<(), Error> {
        let mods_dir = self.base.join("mods");
        let total = mods.len();
        let mut count = 0;
        let mut fallback = Vec::new();

        info!("downloading {} mod(s)", total);
        for url in mods {
            let name = fetch::file_name_of(url);
            match fetch::download_to_file(&self.client, url, &mods_dir.join(name)).await {
                Ok(()) => {
                    count += 1;
                    info!("[{:>3}/{}] downloaded {}", count, total, name);
                }
                Err(e) => {
                    error!("failed to download {}: {}", url, e);
                    fallback.push(url.clone());
                }
            }
        }

        // one more pass for stragglers before giving up on them
        for url in &fallback {
            let name = fetch::file_name_of(url);
            match fetch::download_to_file(&self.client, url, &mods_dir.join(name)).await {
                Ok(()) => {
                    count += 1;
                    info!("[{:>3}/{}] downloaded {}", count, total, name);
                }
                Err(e) => {
                    error!("failed to download {} again: {}", url, e);
                    warn!("giving up on {}, install it by hand if the server needs it", name);
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl PackType for ModrinthPack {
    async fn install(&mut self) -> Result<PackVersions, Error> {
        info!("installing modrinth pack from {}", self.source);

        let text = self.load_index().await?;
        let (versions, mods) = parse_index(&text, &self.mc_version, &self.loader_version)?;

        // keep a copy next to the install, operators expect to find it there
        fs::create_dir_all(&self.base)?;
        fs::write(self.base.join(INDEX_FILE), &text)?;

        self.download_mods(&mods).await?;

        info!(
            "pack targets minecraft {} with loader {}",
            versions.mc_version, versions.loader_version
        );
        Ok(versions)
    }
}

/// Pull the version pair and the server-side download list out of the index.
///
/// Explicit versions from the setup file win over what the index declares.
fn parse_index(
    text: &str,
    mc_override: &str,
    loader_override: &str,
) -> Result<(PackVersions, Vec<String>), Error> {
    let index: Value = serde_json::from_str(text)?;

    let deps = index
        .get("dependencies")
        .and_then(Value::as_object)
        .ok_or("pack index has no dependencies table")?;

    let mc_version = if mc_override.is_empty() {
        deps.get("minecraft")
            .and_then(Value::as_str)
            .ok_or("pack index does not declare a minecraft version")?
            .to_string()
    } else {
        mc_override.to_string()
    };

    let loader_version = if loader_override.is_empty() {
        deps.iter()
            .find(|(key, _)| key.as_str() != "minecraft")
            .and_then(|(_, version)| version.as_str())
            .ok_or("pack index does not declare a mod loader version")?
            .to_string()
    } else {
        loader_override.to_string()
    };

    let mut downloads = Vec::new();
    if let Some(files) = index.get("files").and_then(Value::as_array) {
        for file in files {
            if file.pointer("/env/server").and_then(Value::as_str) == Some("unsupported") {
                continue;
            }
            if let Some(url) = file.pointer("/downloads/0").and_then(Value::as_str) {
                downloads.push(url.to_string());
            }
        }
    }

    Ok((
        PackVersions {
            mc_version,
            loader_version,
        },
        downloads,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"{
        "dependencies": {
            "minecraft": "1.20.1",
            "forge": "47.2.0"
        },
        "files": [
            {
                "env": { "client": "required", "server": "required" },
                "downloads": ["https://cdn.example.org/mods/server-mod-1.0.jar"]
            },
            {
                "env": { "client": "required", "server": "unsupported" },
                "downloads": ["https://cdn.example.org/mods/shader-pack-2.0.jar"]
            },
            {
                "downloads": ["https://cdn.example.org/mods/no-env-mod-3.0.jar"]
            }
        ]
    }"#;

    #[test]
    fn versions_come_from_the_dependencies_table() {
        let (versions, _) = parse_index(INDEX, "", "").expect("parse");

        assert_eq!(versions.mc_version, "1.20.1");
        assert_eq!(versions.loader_version, "47.2.0");
    }

    #[test]
    fn explicit_versions_win_over_the_index() {
        let (versions, _) = parse_index(INDEX, "1.19.4", "45.1.0").expect("parse");

        assert_eq!(versions.mc_version, "1.19.4");
        assert_eq!(versions.loader_version, "45.1.0");
    }

    #[test]
    fn server_unsupported_files_are_skipped() {
        let (_, mods) = parse_index(INDEX, "", "").expect("parse");

        assert_eq!(
            mods,
            vec![
                "https://cdn.example.org/mods/server-mod-1.0.jar".to_string(),
                "https://cdn.example.org/mods/no-env-mod-3.0.jar".to_string(),
            ]
        );
    }

    #[test]
    fn index_without_dependencies_is_rejected() {
        assert!(parse_index(r#"{"files": []}"#, "", "").is_err());
    }
}
