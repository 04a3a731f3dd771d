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

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use smi_device::DeviceHandle;

use crate::command::Command;
use crate::grammar::Selector;

// OutputFormat are the supported output formats.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Csv,
}

impl OutputFormat {
    // from_flag maps --json / --csv to a format.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "--json" => Some(OutputFormat::Json),
            "--csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

// Severity is one RAS error severity accepted by `ras --severity=`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Fatal,
    NonfatalCorrected,
    NonfatalUncorrected,
    All,
}

// ProcessFilterKind says what a `process` filter value matches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessFilterKind {
    Name,
    Pid,
}

// WatchSettings controls repeated output for metric, process and monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WatchSettings {
    // interval is the delay in seconds between samples.
    pub interval: Option<u32>,
    // watch_time is the total run time in seconds.
    pub watch_time: Option<u32>,
    // iterations is the number of samples to take.
    pub iterations: Option<u32>,
}

/// CommandRequest is the validated result of parsing one command line.
/// It is produced by the parser through CommandRequestBuilder and is
/// read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommandRequest {
    format: OutputFormat,
    file: Option<PathBuf>,
    command: Command,
    options: Vec<String>,
    devices: Vec<DeviceHandle>,
    selector: Selector,
    vf_id: Option<String>,
    watch: WatchSettings,
    process_filters: BTreeMap<String, ProcessFilterKind>,
    xgmi_mode: Option<String>,
    fb_sharing_mode: Option<String>,
    groups: Vec<Vec<DeviceHandle>>,
    memory_partition: Option<String>,
    accelerator_partition: Option<u32>,
    process_isolation: Option<String>,
    soc_pstate: Option<String>,
    power_cap: Option<u64>,
    severities: Vec<Severity>,
    ras_folder: Option<PathBuf>,
    file_limit: Option<u32>,
    follow: bool,
    all_arguments: bool,
}

impl CommandRequest {
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn command(&self) -> Command {
        self.command
    }

    // options are the surviving option names, dashes stripped, in
    // command line order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o == name)
    }

    pub fn devices(&self) -> &[DeviceHandle] {
        &self.devices
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    // vf_id is the raw --vf value; resolution happens downstream.
    pub fn vf_id(&self) -> Option<&str> {
        self.vf_id.as_deref()
    }

    pub fn watch(&self) -> &WatchSettings {
        &self.watch
    }

    pub fn process_filters(&self) -> &BTreeMap<String, ProcessFilterKind> {
        &self.process_filters
    }

    pub fn xgmi_mode(&self) -> Option<&str> {
        self.xgmi_mode.as_deref()
    }

    pub fn fb_sharing_mode(&self) -> Option<&str> {
        self.fb_sharing_mode.as_deref()
    }

    // groups are the GPU groups given with `set --group=`, resolved in
    // the order they were written.
    pub fn groups(&self) -> &[Vec<DeviceHandle>] {
        &self.groups
    }

    pub fn memory_partition(&self) -> Option<&str> {
        self.memory_partition.as_deref()
    }

    pub fn accelerator_partition(&self) -> Option<u32> {
        self.accelerator_partition
    }

    pub fn process_isolation(&self) -> Option<&str> {
        self.process_isolation.as_deref()
    }

    pub fn soc_pstate(&self) -> Option<&str> {
        self.soc_pstate.as_deref()
    }

    pub fn power_cap(&self) -> Option<u64> {
        self.power_cap
    }

    pub fn severities(&self) -> &[Severity] {
        &self.severities
    }

    pub fn ras_folder(&self) -> Option<&Path> {
        self.ras_folder.as_deref()
    }

    pub fn file_limit(&self) -> Option<u32> {
        self.file_limit
    }

    pub fn follow(&self) -> bool {
        self.follow
    }

    // all_arguments is true when no per-feature option narrowed the
    // request, so every field of the command is reported.
    pub fn all_arguments(&self) -> bool {
        self.all_arguments
    }
}

// CommandRequestBuilder accumulates parser output. Only the parser and
// the option parsers in this crate write to it.
#[derive(Clone, Debug)]
pub struct CommandRequestBuilder {
    pub(crate) format: OutputFormat,
    pub(crate) file: Option<PathBuf>,
    pub(crate) command: Command,
    pub(crate) options: Vec<String>,
    pub(crate) devices: Vec<DeviceHandle>,
    pub(crate) selector: Selector,
    pub(crate) vf_id: Option<String>,
    pub(crate) watch: WatchSettings,
    pub(crate) process_filters: BTreeMap<String, ProcessFilterKind>,
    pub(crate) xgmi_mode: Option<String>,
    pub(crate) fb_sharing_mode: Option<String>,
    pub(crate) groups: Vec<Vec<DeviceHandle>>,
    pub(crate) memory_partition: Option<String>,
    pub(crate) accelerator_partition: Option<u32>,
    pub(crate) process_isolation: Option<String>,
    pub(crate) soc_pstate: Option<String>,
    pub(crate) power_cap: Option<u64>,
    pub(crate) severities: Vec<Severity>,
    pub(crate) ras_folder: Option<PathBuf>,
    pub(crate) file_limit: Option<u32>,
    pub(crate) follow: bool,
    pub(crate) all_arguments: bool,
}

impl CommandRequestBuilder {
    pub fn new(command: Command) -> Self {
        Self {
            format: OutputFormat::default(),
            file: None,
            command,
            options: Vec::new(),
            devices: Vec::new(),
            selector: Selector::Gpu,
            vf_id: None,
            watch: WatchSettings::default(),
            process_filters: BTreeMap::new(),
            xgmi_mode: None,
            fb_sharing_mode: None,
            groups: Vec::new(),
            memory_partition: None,
            accelerator_partition: None,
            process_isolation: None,
            soc_pstate: None,
            power_cap: None,
            severities: Vec::new(),
            ras_folder: None,
            file_limit: None,
            follow: false,
            all_arguments: false,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_devices(mut self, devices: Vec<DeviceHandle>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    pub fn with_all_arguments(mut self, all_arguments: bool) -> Self {
        self.all_arguments = all_arguments;
        self
    }

    pub(crate) fn push_option(&mut self, name: &str) {
        self.options.push(name.to_string());
    }

    pub fn build(self) -> CommandRequest {
        CommandRequest {
            format: self.format,
            file: self.file,
            command: self.command,
            options: self.options,
            devices: self.devices,
            selector: self.selector,
            vf_id: self.vf_id,
            watch: self.watch,
            process_filters: self.process_filters,
            xgmi_mode: self.xgmi_mode,
            fb_sharing_mode: self.fb_sharing_mode,
            groups: self.groups,
            memory_partition: self.memory_partition,
            accelerator_partition: self.accelerator_partition,
            process_isolation: self.process_isolation,
            soc_pstate: self.soc_pstate,
            power_cap: self.power_cap,
            severities: self.severities,
            ras_folder: self.ras_folder,
            file_limit: self.file_limit,
            follow: self.follow,
            all_arguments: self.all_arguments,
        }
    }
}
