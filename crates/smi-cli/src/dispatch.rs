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

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::info;

use crate::command::Command;
use crate::error::{CliError, CliResult};
use crate::grammar::GrammarTable;
use crate::options::ValueOption;
use crate::platform::PlatformCapabilities;
use crate::render::{render_request, to_csv, to_json_pretty};
use crate::request::{CommandRequest, OutputFormat};
use crate::resolver::DeviceResolver;

pub const TOOL_NAME: &str = "smi-cli";

// dispatch checks that the platform can serve the request, resolves a
// --vf identifier and produces the text to print.
pub fn dispatch(
    request: &CommandRequest,
    platform: &impl PlatformCapabilities,
    grammar: &GrammarTable,
    resolver: &DeviceResolver<'_>,
) -> CliResult<String> {
    let command = request.command();
    if !platform.supports_command(command) {
        return Err(CliError::CommandNotSupported(command.to_string()));
    }
    info!(%command, devices = request.devices().len(), "dispatching request");
    match command {
        Command::Help => Ok(usage(request, grammar)),
        Command::Version => version(request.format()),
        _ => {
            let vf = request
                .vf_id()
                .map(|vf_id| resolver.resolve_vf(vf_id))
                .transpose()?;
            render_request(request, vf.as_ref())
        }
    }
}

// VersionInfo is the version report for JSON and CSV output.
#[derive(Debug, Serialize)]
struct VersionInfo {
    tool: &'static str,
    version: &'static str,
}

fn version(format: OutputFormat) -> CliResult<String> {
    let info = VersionInfo {
        tool: TOOL_NAME,
        version: env!("CARGO_PKG_VERSION"),
    };
    match format {
        OutputFormat::Human => Ok(format!("{} version: {}", info.tool, info.version)),
        OutputFormat::Json => {
            to_json_pretty(&info).map_err(|e| CliError::UnknownError(e.to_string()))
        }
        OutputFormat::Csv => to_csv(&info).map_err(|e| CliError::UnknownError(e.to_string())),
    }
}

// usage builds the help text from the grammar table. `help <command>`
// lists that command's options.
pub fn usage(request: &CommandRequest, grammar: &GrammarTable) -> String {
    let topic = request
        .options()
        .first()
        .and_then(|name| name.parse::<Command>().ok())
        .filter(|command| !command.is_informational());

    let mut lines = Vec::new();
    match topic {
        Some(command) => {
            lines.push(format!(
                "Usage: {TOOL_NAME} {command} [--gpu=ID ...] [OPTIONS]"
            ));
            for (row_command, selector, options) in grammar.iter() {
                if row_command != command {
                    continue;
                }
                let listed = if options.is_empty() {
                    "(none)".to_string()
                } else {
                    options.join(" ")
                };
                lines.push(format!("  with {}: {listed}", selector.keyword()));
            }
            let values: Vec<&str> = ValueOption::ALL
                .iter()
                .filter(|option| option.accepts(command))
                .map(|option| option.name())
                .collect();
            if !values.is_empty() {
                lines.push(format!("  value options: {}", values.join(" ")));
            }
        }
        None => {
            lines.push(format!(
                "Usage: {TOOL_NAME} <COMMAND> [--gpu=ID ... | --vf=ID] [OPTIONS] [--json | --csv] [--file=PATH]"
            ));
            lines.push("Commands:".to_string());
            for command in Command::iter() {
                lines.push(format!("  {command}"));
            }
            lines.push(format!("Run '{TOOL_NAME} <COMMAND> --help' for command options."));
        }
    }
    lines.join("\n")
}
