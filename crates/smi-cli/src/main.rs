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

use std::process::ExitCode;

use anyhow::{Context, Result};
use smi_cli::config::CliConfig;
use smi_cli::dispatch::dispatch;
use smi_cli::parser::{Parser, scan_output_format};
use smi_cli::platform::{PlatformInfo, PlatformDetector};
use smi_cli::render::{CliFailure, ErrorTarget, emit};
use smi_cli::token::tokenize;
use smi_device::{DeviceLibrary, StaticLibrary, SysfsLibrary};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "SMI_CLI_LOG";
const DEFAULT_LOG_LEVEL: &str = "warn";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    if let Err(e) = run(&args) {
        match e.downcast_ref::<CliFailure>() {
            Some(failure) => failure.report(),
            None => eprintln!("Error: {e:#}"),
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(args: &[String]) -> Result<()> {
    let config = CliConfig::load()?;
    init_logging(&config)?;

    let platform = detect_platform(&config);
    let library = open_library(&config)?;
    let parser = Parser::new(library.as_ref(), platform).map_err(|error| {
        let format = scan_output_format(&tokenize(args));
        CliFailure::new(error, ErrorTarget::new(format, None))
    })?;
    let request = parser.parse_reporting(args)?;
    tracing::debug!(?request, "parsed request");

    let target = ErrorTarget::for_request(&request);
    dispatch(
        &request,
        &parser.platform(),
        parser.grammar(),
        parser.resolver(),
    )
    .and_then(|output| emit(&output, request.file()))
    .map_err(|error| CliFailure::new(error, target))?;
    Ok(())
}

// init_logging sends tracing output to stderr, filtered by SMI_CLI_LOG,
// then the config file's log_level, then warn.
fn init_logging(config: &CliConfig) -> Result<()> {
    let directive = std::env::var(LOG_ENV)
        .ok()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let console_env_filter = EnvFilter::builder()
        .parse(&directive)
        .with_context(|| format!("invalid log level '{directive}'"))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(console_env_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()?;
    Ok(())
}

fn detect_platform(config: &CliConfig) -> PlatformInfo {
    let detected = PlatformDetector::new().detect();
    match config.platform {
        Some(role) => {
            tracing::info!(%role, "platform role pinned by configuration");
            detected.with_role(role)
        }
        None => detected,
    }
}

fn open_library(config: &CliConfig) -> Result<Box<dyn DeviceLibrary>> {
    match &config.inventory {
        Some(path) => {
            let library = StaticLibrary::from_file(path)
                .with_context(|| format!("failed to load inventory {}", path.display()))?;
            Ok(Box::new(library))
        }
        None => Ok(Box::new(SysfsLibrary::new())),
    }
}
