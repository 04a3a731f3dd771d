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
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Command is the first word on the command line.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
    Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    Help,
    List,
    Static,
    Discovery,
    Ucode,
    Firmware,
    BadPages,
    Metric,
    Process,
    Profile,
    Version,
    Event,
    Topology,
    Xgmi,
    Reset,
    Set,
    Monitor,
    Partition,
    Ras,
}

impl Command {
    // is_informational is true for help and version, which take no
    // devices and have no option table.
    pub fn is_informational(&self) -> bool {
        matches!(self, Command::Help | Command::Version)
    }

    // accepts_vf_selector is false for commands that can never take --vf.
    pub fn accepts_vf_selector(&self) -> bool {
        !matches!(
            self,
            Command::List | Command::Discovery | Command::Help | Command::Version
        )
    }

    // supports_watch lists the commands that may repeat on an interval.
    pub fn supports_watch(&self) -> bool {
        matches!(self, Command::Metric | Command::Process | Command::Monitor)
    }

    // accepts_output_format is false for commands that only print a
    // confirmation and reject --json / --csv.
    pub fn accepts_output_format(&self) -> bool {
        !matches!(self, Command::Reset | Command::Set)
    }

    // requires_target is true when the bare command has nothing to do.
    pub fn requires_target(&self) -> bool {
        matches!(self, Command::Reset | Command::Set)
    }
}
