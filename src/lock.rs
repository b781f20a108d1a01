// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The lock file records what has been installed so far.
//!
//! It is the only authority for the install decision, the filesystem is never
//! re-scanned to infer it. Deleting the file is the supported way to force a
//! full reinstall.

use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Well-known location of the lock file, next to the setup file.
pub const LOCK_PATH: &str = "packstart.lock";

const LOCK_HEADER: &str = "# Automatically generated, DO NOT EDIT!\n\
                           # Delete this file to force a full reinstall.\n";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LockFile {
    pub pack_installed: bool,
    pub pack_url: String,
    pub loader_installed: bool,
    pub loader_version: String,
    pub mc_version: String,
}

impl LockFile {
    /// Reads the lock file, an absent file simply means nothing is installed yet.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = fs::File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let mut out = String::from(LOCK_HEADER);
        out.push_str(&serde_yaml::to_string(self)?);
        fs::write(path, out)?;
        Ok(())
    }

    /// Persist the lock, carrying on with the in-memory state if that fails.
    pub fn save_or_warn(&self, path: &Path) {
        if let Err(e) = self.save(path) {
            warn!(
                "could not write {}: {}, continuing with in-memory state; \
                 the next run may redo installation work",
                path.display(),
                e
            );
        }
    }
}
