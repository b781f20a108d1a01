// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Extra files the setup file asks to place into the installation.

use log::info;
use reqwest::Client;

use crate::config::ConfigFile;
use crate::fetch;
use crate::Error;

/// Download every configured additional file to its destination.
///
/// Runs last in the install pipeline, a failure here aborts the run and the
/// next one will retry because the install decision is unchanged.
pub async fn install_additional_files(config: &ConfigFile, client: &Client) -> Result<(), Error> {
    let files = &config.install.additional_files;
    if files.is_empty() {
        return Ok(());
    }

    info!("installing {} additional file(s)", files.len());
    for file in files {
        let dest = config.base_dir().join(&file.destination);
        fetch::download_to_file(client, &file.url, &dest).await?;
        info!("installed {}", file.destination);
    }

    Ok(())
}
