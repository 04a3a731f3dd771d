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

use std::path::PathBuf;

use clap::ValueEnum;
use smi_device::DeviceHandle;
use tracing::debug;

use crate::command::Command;
use crate::error::{CliError, CliResult};
use crate::request::{CommandRequestBuilder, ProcessFilterKind, Severity};
use crate::resolver::DeviceResolver;
use crate::token::Token;

/// ValueOption is an option that carries a value after '='. Each one
/// validates its value, converts it, and stores it on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOption {
    File,
    Watch,
    WatchTime,
    Iterations,
    Name,
    Pid,
    Mode,
    FbSharingMode,
    Group,
    MemoryPartition,
    AcceleratorPartition,
    ProcessIsolation,
    SocPstate,
    PowerCap,
    Severity,
    Folder,
    FileLimit,
}

impl ValueOption {
    pub const ALL: [ValueOption; 17] = [
        ValueOption::File,
        ValueOption::Watch,
        ValueOption::WatchTime,
        ValueOption::Iterations,
        ValueOption::Name,
        ValueOption::Pid,
        ValueOption::Mode,
        ValueOption::FbSharingMode,
        ValueOption::Group,
        ValueOption::MemoryPartition,
        ValueOption::AcceleratorPartition,
        ValueOption::ProcessIsolation,
        ValueOption::SocPstate,
        ValueOption::PowerCap,
        ValueOption::Severity,
        ValueOption::Folder,
        ValueOption::FileLimit,
    ];

    // lookup finds the option a token key names, by long name or alias.
    pub fn lookup(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.name() == key || option.alias() == Some(key))
    }

    // name is the long form, e.g. "--watch_time".
    pub fn name(&self) -> &'static str {
        match self {
            ValueOption::File => "--file",
            ValueOption::Watch => "--watch",
            ValueOption::WatchTime => "--watch_time",
            ValueOption::Iterations => "--iterations",
            ValueOption::Name => "--name",
            ValueOption::Pid => "--pid",
            ValueOption::Mode => "--mode",
            ValueOption::FbSharingMode => "--fb-sharing-mode",
            ValueOption::Group => "--group",
            ValueOption::MemoryPartition => "--memory-partition",
            ValueOption::AcceleratorPartition => "--accelerator-partition",
            ValueOption::ProcessIsolation => "--process-isolation",
            ValueOption::SocPstate => "--soc-pstate",
            ValueOption::PowerCap => "--power-cap",
            ValueOption::Severity => "--severity",
            ValueOption::Folder => "--folder",
            ValueOption::FileLimit => "--file_limit",
        }
    }

    pub fn alias(&self) -> Option<&'static str> {
        match self {
            ValueOption::Watch => Some("-w"),
            ValueOption::WatchTime => Some("-W"),
            ValueOption::Iterations => Some("-i"),
            ValueOption::ProcessIsolation => Some("-R"),
            ValueOption::SocPstate => Some("-ps"),
            ValueOption::PowerCap => Some("-pc"),
            _ => None,
        }
    }

    // accepts reports whether the option is legal for `command`.
    pub fn accepts(&self, command: Command) -> bool {
        match self {
            ValueOption::File => !matches!(command, Command::Reset | Command::Ras),
            ValueOption::Watch | ValueOption::WatchTime | ValueOption::Iterations => {
                command.supports_watch()
            }
            ValueOption::Name | ValueOption::Pid => command == Command::Process,
            ValueOption::Mode => command == Command::Xgmi,
            ValueOption::FbSharingMode
            | ValueOption::Group
            | ValueOption::MemoryPartition
            | ValueOption::AcceleratorPartition
            | ValueOption::ProcessIsolation
            | ValueOption::SocPstate
            | ValueOption::PowerCap => command == Command::Set,
            ValueOption::Severity | ValueOption::Folder | ValueOption::FileLimit => {
                command == Command::Ras
            }
        }
    }

    // tag is the option name recorded on the request alongside the value.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            ValueOption::Name => Some("name"),
            ValueOption::Pid => Some("pid"),
            ValueOption::MemoryPartition => Some("memory-partition"),
            ValueOption::AcceleratorPartition => Some("accelerator-partition"),
            ValueOption::ProcessIsolation => Some("process-isolation"),
            ValueOption::SocPstate => Some("soc-pstate"),
            ValueOption::PowerCap => Some("power-cap"),
            ValueOption::FileLimit => Some("file_limit"),
            _ => None,
        }
    }

    // apply validates the token's value for `command` and stores it.
    pub fn apply(
        &self,
        token: &Token,
        command: Command,
        builder: &mut CommandRequestBuilder,
        resolver: &DeviceResolver<'_>,
    ) -> CliResult<()> {
        let key = token.key.as_str();
        if !self.accepts(command) {
            return Err(CliError::InvalidParameter(key.to_string()));
        }
        self.check_watch_order(key, builder)?;
        let value = match token.value.as_deref() {
            Some(value) if !value.is_empty() => value,
            _ => return Err(CliError::MissingParameterValue(key.to_string())),
        };
        debug!(option = self.name(), value, "applying option");

        match self {
            ValueOption::File => builder.file = Some(PathBuf::from(value)),
            ValueOption::Watch => builder.watch.interval = Some(parse_unsigned(value)?),
            ValueOption::WatchTime => builder.watch.watch_time = Some(parse_unsigned(value)?),
            ValueOption::Iterations => builder.watch.iterations = Some(parse_unsigned(value)?),
            ValueOption::Name => {
                builder
                    .process_filters
                    .insert(value.to_string(), ProcessFilterKind::Name);
            }
            ValueOption::Pid => {
                let _: u32 = parse_unsigned(value)?;
                builder
                    .process_filters
                    .insert(value.to_string(), ProcessFilterKind::Pid);
            }
            ValueOption::Mode => builder.xgmi_mode = Some(value.to_string()),
            ValueOption::FbSharingMode => builder.fb_sharing_mode = Some(value.to_string()),
            ValueOption::Group => builder.groups = parse_groups(value, key, resolver)?,
            ValueOption::MemoryPartition => builder.memory_partition = Some(value.to_string()),
            ValueOption::AcceleratorPartition => {
                builder.accelerator_partition = Some(parse_unsigned(value)?)
            }
            ValueOption::ProcessIsolation => builder.process_isolation = Some(value.to_string()),
            ValueOption::SocPstate => builder.soc_pstate = Some(value.to_string()),
            ValueOption::PowerCap => builder.power_cap = Some(parse_unsigned(value)?),
            ValueOption::Severity => builder.severities.extend(parse_severities(value)?),
            ValueOption::Folder => builder.ras_folder = Some(PathBuf::from(value)),
            ValueOption::FileLimit => {
                let limit: u32 = parse_unsigned(value)?;
                if limit == 0 {
                    return Err(CliError::InvalidParameterValue(value.to_string()));
                }
                builder.file_limit = Some(limit);
            }
        }

        if let Some(tag) = self.tag() {
            builder.push_option(tag);
        }
        Ok(())
    }

    // check_watch_order rejects --watch_time and --iterations when the
    // other one is already set, or when --watch has not been seen yet.
    fn check_watch_order(&self, key: &str, builder: &CommandRequestBuilder) -> CliResult<()> {
        let watch = builder.watch;
        match self {
            ValueOption::WatchTime if watch.iterations.is_some() || watch.interval.is_none() => {
                Err(CliError::InvalidParameter(key.to_string()))
            }
            ValueOption::Iterations if watch.watch_time.is_some() => {
                Err(CliError::InvalidParameter(key.to_string()))
            }
            ValueOption::Iterations if watch.interval.is_none() => {
                Err(CliError::MissingParameterValue(key.to_string()))
            }
            _ => Ok(()),
        }
    }
}

// parse_unsigned accepts only plain decimal digits.
fn parse_unsigned<T: std::str::FromStr>(value: &str) -> CliResult<T> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CliError::InvalidParameterValue(value.to_string()));
    }
    value
        .parse()
        .map_err(|_| CliError::InvalidParameterValue(value.to_string()))
}

// parse_groups reads "0-1 2-3" into two groups of device handles. Every
// index must name an existing device and appear once per group.
fn parse_groups(
    value: &str,
    key: &str,
    resolver: &DeviceResolver<'_>,
) -> CliResult<Vec<Vec<DeviceHandle>>> {
    let mut groups = Vec::new();
    for group in value.split_whitespace() {
        let mut indices = Vec::new();
        let mut handles = Vec::new();
        for part in group.split('-') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CliError::InvalidParameterValue(group.to_string()));
            }
            let index: u32 = part
                .parse()
                .map_err(|_| CliError::InvalidParameterValue(group.to_string()))?;
            if indices.contains(&index) {
                return Err(CliError::InvalidParameterValue(part.to_string()));
            }
            handles.push(resolver.resolve_index(index, part)?);
            indices.push(index);
        }
        groups.push(handles);
    }
    if groups.is_empty() {
        return Err(CliError::MissingParameterValue(key.to_string()));
    }
    Ok(groups)
}

// parse_severities reads a comma separated list, keeping its order.
fn parse_severities(value: &str) -> CliResult<Vec<Severity>> {
    value
        .split(',')
        .map(|item| {
            Severity::from_str(item, false)
                .map_err(|_| CliError::InvalidParameter(item.to_string()))
        })
        .collect()
}
