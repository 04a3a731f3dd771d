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

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use smi_device::VfEntry;
use thiserror::Error;
use tracing::warn;

use crate::error::{CliError, CliResult};
use crate::request::{CommandRequest, OutputFormat};

// ErrorDocument is the JSON and CSV shape of a reported error.
#[derive(Debug, Serialize)]
struct ErrorDocument<'a> {
    error_message: &'a str,
    error_code: i32,
}

// RequestDocument is the JSON shape of a parsed request, with the
// resolved VF when --vf was used.
#[derive(Debug, Serialize)]
struct RequestDocument<'a> {
    #[serde(flatten)]
    request: &'a CommandRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    vf: Option<&'a VfEntry>,
}

// RequestSummary is the flat CSV row describing a parsed request.
#[derive(Debug, Serialize)]
struct RequestSummary {
    command: String,
    options: String,
    devices: String,
    selector: String,
    all_arguments: bool,
}

pub(crate) fn to_json_pretty<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub(crate) fn to_csv<T: Serialize>(row: &T) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(row)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
}

// render_error formats an error the way the user asked for output.
pub fn render_error(err: &CliError, format: OutputFormat) -> String {
    let message = err.to_string();
    let human = format!("{message} Error code: {}", err.code());
    let document = ErrorDocument {
        error_message: &message,
        error_code: err.code(),
    };
    let rendered = match format {
        OutputFormat::Human => return human,
        OutputFormat::Json => to_json_pretty(&document).map_err(|e| e.to_string()),
        OutputFormat::Csv => to_csv(&document).map_err(|e| e.to_string()),
    };
    rendered.unwrap_or_else(|e| {
        warn!(error = %e, ?format, "falling back to human error output");
        human
    })
}

// render_request prints a summary of a parsed request. The per-command
// reports are produced elsewhere.
pub fn render_request(request: &CommandRequest, vf: Option<&VfEntry>) -> CliResult<String> {
    match request.format() {
        OutputFormat::Json => {
            let document = RequestDocument { request, vf };
            to_json_pretty(&document).map_err(|e| CliError::UnknownError(e.to_string()))
        }
        OutputFormat::Csv => {
            let devices = match vf {
                Some(entry) => entry.bdf.to_string(),
                None => device_list(request),
            };
            let summary = RequestSummary {
                command: request.command().to_string(),
                options: request.options().join(" "),
                devices,
                selector: request.selector().keyword().to_string(),
                all_arguments: request.all_arguments(),
            };
            to_csv(&summary).map_err(|e| CliError::UnknownError(e.to_string()))
        }
        OutputFormat::Human => {
            let mut lines = vec![format!("COMMAND: {}", request.command())];
            if !request.options().is_empty() {
                lines.push(format!("OPTIONS: {}", request.options().join(", ")));
            }
            if let Some(entry) = vf {
                lines.push(format!("VF: {} ({})", entry.id(), entry.bdf));
            } else if !request.devices().is_empty() {
                lines.push(format!("DEVICES: {}", device_list(request)));
            }
            lines.push(format!("ALL_ARGUMENTS: {}", request.all_arguments()));
            Ok(lines.join("\n"))
        }
    }
}

fn device_list(request: &CommandRequest) -> String {
    request
        .devices()
        .iter()
        .map(|d| d.bdf.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// emit writes content to `file`, truncating it, or to stdout.
pub fn emit(content: &str, file: Option<&Path>) -> CliResult<()> {
    match file {
        Some(path) => std::fs::write(path, format!("{content}\n"))
            .map_err(|_| CliError::InvalidFilePath(path.display().to_string())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

/// ErrorTarget decides where and how a failure is reported: the output
/// format and the --file path known when the failure happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTarget {
    pub format: OutputFormat,
    pub file: Option<PathBuf>,
}

impl ErrorTarget {
    pub fn new(format: OutputFormat, file: Option<PathBuf>) -> Self {
        Self { format, file }
    }

    // for_request reports later failures the way the request asked for
    // its output.
    pub fn for_request(request: &CommandRequest) -> Self {
        Self::new(request.format(), request.file().map(Path::to_path_buf))
    }

    // report renders err and writes it. A bad --file path, or a
    // failure to write the file, goes to stderr instead.
    pub fn report(&self, err: &CliError) {
        let content = render_error(err, self.format);
        match &self.file {
            Some(path) if !matches!(err, CliError::InvalidFilePath(_)) => {
                if let Err(write_err) = emit(&content, Some(path)) {
                    eprintln!("{}", render_error(&write_err, self.format));
                    eprintln!("{content}");
                }
            }
            _ => eprintln!("{content}"),
        }
    }
}

/// CliFailure is a CliError together with the target it must be
/// reported to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct CliFailure {
    pub error: CliError,
    pub target: ErrorTarget,
}

impl CliFailure {
    pub fn new(error: CliError, target: ErrorTarget) -> Self {
        Self { error, target }
    }

    pub fn report(&self) {
        self.target.report(&self.error);
    }
}
