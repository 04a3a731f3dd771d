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

use serde::Serialize;

use crate::command::Command;

/// Selector is the device selector an option table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selector {
    Gpu,
    Vf,
}

impl Selector {
    // keyword is the long flag that selects this kind of device.
    pub fn keyword(&self) -> &'static str {
        match self {
            Selector::Gpu => "--gpu",
            Selector::Vf => "--vf",
        }
    }
}

const NONE: &[&str] = &[];

const STATIC_GPU: &[&str] = &[
    "--asic",
    "-a",
    "--bus",
    "-b",
    "--vbios",
    "-V",
    "--board",
    "-B",
    "--limit",
    "-l",
    "--driver",
    "-d",
    "--ras",
    "-r",
    "--dfc-ucode",
    "-D",
    "--fb-info",
    "-f",
    "--num-vf",
    "-n",
    "--vram",
    "-v",
    "--cache",
    "-c",
    "--partition",
    "-p",
    "--process-isolation",
    "-R",
    "--soc-pstate",
    "-ps",
];

const FIRMWARE_GPU: &[&str] = &[
    "--ucode-list",
    "--fw-list",
    "-f",
    "--error-records",
    "-e",
];

const FIRMWARE_VF: &[&str] = &["--ucode-list", "--fw-list", "-f"];

const METRIC_GPU: &[&str] = &[
    "--usage",
    "-u",
    "--power",
    "-p",
    "--clock",
    "-c",
    "--temperature",
    "-t",
    "--ecc",
    "-e",
    "--ecc-block",
    "-k",
    "--pcie",
    "-P",
    "--fb-usage",
    "--energy",
    "-E",
];

const METRIC_VF: &[&str] = &["--schedule", "-s", "--guard", "-G", "--guest-data", "-u"];

const TOPOLOGY_GPU: &[&str] = &[
    "--weight",
    "--hops",
    "--fb-sharing",
    "--link-type",
    "--link-status",
];

const XGMI_GPU: &[&str] = &["--caps", "--fb-sharing", "--set", "--mode", "--metric"];

const PROCESS_GPU: &[&str] = &["--general", "--engine"];

const RESET_GPU: &[&str] = &["--clean-local-data", "-l"];

const RESET_VF: &[&str] = &["--vf-fb"];

const SET_GPU: &[&str] = &[
    "--xgmi",
    "--fb-sharing-mode",
    "--group",
    "--memory-partition",
    "--accelerator-partition",
    "--process-isolation",
    "-R",
    "--soc-pstate",
    "-ps",
    "--power-cap",
    "-pc",
];

const MONITOR_GPU: &[&str] = &[
    "-p",
    "--power-usage",
    "-t",
    "--temperature",
    "-u",
    "--gfx",
    "-m",
    "--mem",
    "-n",
    "--encoder",
    "-d",
    "--decoder",
    "-e",
    "--ecc",
    "-v",
    "--vram-usage",
    "-r",
    "--pcie",
    "-q",
    "--process",
];

const PARTITION_GPU: &[&str] = &["--accelerator", "-a", "--memory", "-m", "--current", "-c"];

const RAS_GPU: &[&str] = &["--cper", "--severity", "--folder", "--file_limit", "--follow"];

/// GrammarTable maps each command and selector to the ordered list of
/// option strings legal for that pair. A missing selector entry means the
/// selector itself is illegal for the command.
#[derive(Debug, Clone)]
pub struct GrammarTable {
    table: BTreeMap<Command, BTreeMap<Selector, &'static [&'static str]>>,
}

impl Default for GrammarTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarTable {
    pub fn new() -> Self {
        let rows: &[(Command, &[(Selector, &'static [&'static str])])] = &[
            (Command::List, &[(Selector::Gpu, NONE)]),
            (Command::Discovery, &[(Selector::Gpu, NONE)]),
            (Command::BadPages, &[(Selector::Gpu, NONE)]),
            (Command::Profile, &[(Selector::Gpu, NONE)]),
            (Command::Event, &[(Selector::Gpu, NONE)]),
            (
                Command::Static,
                &[(Selector::Gpu, STATIC_GPU), (Selector::Vf, NONE)],
            ),
            (
                Command::Ucode,
                &[(Selector::Gpu, FIRMWARE_GPU), (Selector::Vf, FIRMWARE_VF)],
            ),
            (
                Command::Firmware,
                &[(Selector::Gpu, FIRMWARE_GPU), (Selector::Vf, FIRMWARE_VF)],
            ),
            (
                Command::Metric,
                &[(Selector::Gpu, METRIC_GPU), (Selector::Vf, METRIC_VF)],
            ),
            (Command::Topology, &[(Selector::Gpu, TOPOLOGY_GPU)]),
            (Command::Xgmi, &[(Selector::Gpu, XGMI_GPU)]),
            (Command::Process, &[(Selector::Gpu, PROCESS_GPU)]),
            (
                Command::Reset,
                &[(Selector::Gpu, RESET_GPU), (Selector::Vf, RESET_VF)],
            ),
            (Command::Set, &[(Selector::Gpu, SET_GPU)]),
            (Command::Monitor, &[(Selector::Gpu, MONITOR_GPU)]),
            (Command::Partition, &[(Selector::Gpu, PARTITION_GPU)]),
            (Command::Ras, &[(Selector::Gpu, RAS_GPU)]),
        ];

        let table = rows
            .iter()
            .map(|(command, selectors)| (*command, selectors.iter().copied().collect()))
            .collect();
        Self { table }
    }

    // legal_options returns the option list for a command and selector,
    // or None when the selector is not accepted by the command.
    pub fn legal_options(
        &self,
        command: Command,
        selector: Selector,
    ) -> Option<&'static [&'static str]> {
        self.table
            .get(&command)
            .and_then(|row| row.get(&selector))
            .copied()
    }

    // accepts_selector reports whether the command has a row for the
    // selector at all.
    pub fn accepts_selector(&self, command: Command, selector: Selector) -> bool {
        self.legal_options(command, selector).is_some()
    }

    // is_legal reports whether `option` verbatim is in the table row.
    pub fn is_legal(&self, command: Command, selector: Selector, option: &str) -> bool {
        self.legal_options(command, selector)
            .is_some_and(|options| options.iter().any(|o| *o == option))
    }

    // iter walks every (command, selector, options) row in command order.
    pub fn iter(&self) -> impl Iterator<Item = (Command, Selector, &'static [&'static str])> + '_ {
        self.table.iter().flat_map(|(command, row)| {
            row.iter()
                .map(move |(selector, options)| (*command, *selector, *options))
        })
    }
}
