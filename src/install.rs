// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Deciding whether installation work is needed, and running it in order.

use std::path::Path;

use log::info;
use reqwest::Client;

use crate::config::ConfigFile;
use crate::files;
use crate::forge;
use crate::lock::LockFile;
use crate::pack;
use crate::Error;

/// True when the pipeline has to run: nothing installed yet, the pack source
/// changed since the last install, or a forced install was requested.
///
/// Deliberately ignores the loader state, a changed pack source always runs
/// the full pipeline even when the loader versions would come out the same.
pub fn should_install(config: &ConfigFile, lock: &LockFile, force: bool) -> bool {
    force || !lock.pack_installed || lock.pack_url != config.install.modpack_url
}

/// The install pipeline: pack, then loader, then additional files.
///
/// The lock is rewritten right after each completed step, so a failure in a
/// later step never loses the progress of an earlier one and the next run
/// picks up from the recorded state.
pub async fn run_install(
    config: &ConfigFile,
    lock: &mut LockFile,
    lock_path: &Path,
    client: &Client,
) -> Result<(), Error> {
    let mut pack_type = pack::create_pack_type(config, client);
    let versions = pack_type.install().await?;

    lock.pack_installed = true;
    lock.pack_url = config.install.modpack_url.clone();
    lock.save_or_warn(lock_path);

    forge::install(config, &versions, lock, lock_path, client).await?;

    files::install_additional_files(config, client).await?;

    info!("installation finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InstallConfig, LaunchConfig};
    use crate::pack::PackFormat;

    fn config_with_url(url: &str) -> ConfigFile {
        ConfigFile {
            install: InstallConfig {
                base_install_path: String::new(),
                modpack_url: url.to_string(),
                modpack_format: PackFormat::Modrinth,
                mc_version: String::new(),
                loader_version: String::new(),
                additional_files: Vec::new(),
            },
            launch: LaunchConfig::default(),
        }
    }

    fn installed_lock(url: &str) -> LockFile {
        LockFile {
            pack_installed: true,
            pack_url: url.to_string(),
            loader_installed: true,
            loader_version: "47.2.0".to_string(),
            mc_version: "1.20.1".to_string(),
        }
    }

    #[test]
    fn nothing_installed_always_installs() {
        let config = config_with_url("https://example.org/index.json");

        // whatever else the lock claims, a missing pack install decides it
        let mut lock = LockFile::default();
        lock.loader_installed = true;
        lock.loader_version = "47.2.0".to_string();
        lock.mc_version = "1.20.1".to_string();

        assert!(should_install(&config, &lock, false));
        assert!(should_install(&config, &LockFile::default(), false));
    }

    #[test]
    fn fully_installed_matching_source_skips() {
        let config = config_with_url("https://example.org/index.json");
        let lock = installed_lock("https://example.org/index.json");

        assert!(!should_install(&config, &lock, false));
    }

    #[test]
    fn changed_pack_source_installs_again() {
        let config = config_with_url("https://example.org/other-pack.json");
        let lock = installed_lock("https://example.org/index.json");

        assert!(should_install(&config, &lock, false));
    }

    #[test]
    fn force_overrides_a_current_lock() {
        let config = config_with_url("https://example.org/index.json");
        let lock = installed_lock("https://example.org/index.json");

        assert!(should_install(&config, &lock, true));
    }

    #[test]
    fn loader_state_does_not_matter_when_the_pack_is_current() {
        let config = config_with_url("https://example.org/index.json");
        let mut lock = installed_lock("https://example.org/index.json");
        lock.loader_installed = false;

        assert!(!should_install(&config, &lock, false));
    }
}
