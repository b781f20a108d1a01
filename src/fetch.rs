// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Downloads over http(s).

use std::fs;
use std::path::Path;

use log::debug;
use reqwest::Client;

use crate::error::ErrorKind;
use crate::Error;

/// GET `url` into `dest`, creating parent directories as needed.
///
/// A non-success status is a download failure, there is no retry here; the
/// callers decide whether a failed download is fatal or worth another pass.
pub async fn download_to_file(client: &Client, url: &str, dest: &Path) -> Result<(), Error> {
    debug!("downloading {} to {}", url, dest.display());

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ErrorKind::DownloadFailed {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let body = response.bytes().await?;

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(dest, &body)?;

    Ok(())
}

/// GET `url` and return the body as text, with the same status handling.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, Error> {
    debug!("fetching {}", url);

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ErrorKind::DownloadFailed {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    Ok(response.text().await?)
}

/// The trailing file name of a download url, query and fragment stripped.
pub fn file_name_of(url: &str) -> &str {
    let no_fragment = url.split('#').next().unwrap_or(url);
    let no_query = no_fragment.split('?').next().unwrap_or(no_fragment);
    no_query.rsplit('/').next().unwrap_or(no_query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_strips_path_and_query() {
        assert_eq!(
            file_name_of("https://cdn.example.org/mods/some-mod-1.2.3.jar?sig=abc"),
            "some-mod-1.2.3.jar"
        );
        assert_eq!(file_name_of("https://cdn.example.org/a/b/c.jar#frag"), "c.jar");
        assert_eq!(file_name_of("plain.jar"), "plain.jar");
    }
}
