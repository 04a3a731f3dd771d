/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::PlatformRole;

pub const CONFIG_ENV: &str = "SMI_CLI_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/smi-cli/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

// CliConfig is the optional smi-cli configuration file:
//
//   log_level = "debug"
//   platform = "host"
//   inventory = "/etc/smi-cli/inventory.toml"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    // log_level is an EnvFilter directive, e.g. "warn" or "smi_cli=debug".
    #[serde(default)]
    pub log_level: Option<String>,
    // platform pins the platform role instead of detecting it.
    #[serde(default)]
    pub platform: Option<PlatformRole>,
    // inventory switches to a static device inventory file.
    #[serde(default)]
    pub inventory: Option<PathBuf>,
}

impl CliConfig {
    // from_file reads a CliConfig from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    // from_toml parses a CliConfig from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    // load reads the file named by SMI_CLI_CONFIG, else the default
    // path when it exists, else returns the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    // load_from is load with the environment lookup already done.
    pub fn load_from(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
