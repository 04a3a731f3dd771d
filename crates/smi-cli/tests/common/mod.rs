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

#![allow(dead_code)]

use smi_cli::error::CliResult;
use smi_cli::parser::Parser;
use smi_cli::platform::{AsicFamily, OsKind, PlatformInfo, PlatformRole};
use smi_cli::render::{CliFailure, ErrorTarget};
use smi_cli::request::CommandRequest;
use smi_device::StaticLibrary;

// host is an MI300 virtualization host on Linux.
pub fn host() -> PlatformInfo {
    PlatformInfo::new(PlatformRole::Host, AsicFamily::Mi300, OsKind::Linux)
}

pub fn guest() -> PlatformInfo {
    PlatformInfo::new(PlatformRole::Guest, AsicFamily::Mi300, OsKind::Linux)
}

pub fn baremetal() -> PlatformInfo {
    PlatformInfo::new(PlatformRole::Baremetal, AsicFamily::Nv32, OsKind::Linux)
}

// parse_with parses args against `count` synthetic GPUs, each with two
// virtual functions.
pub fn parse_with(count: u32, platform: PlatformInfo, args: &[&str]) -> CliResult<CommandRequest> {
    let library = StaticLibrary::synthetic(count).with_virtual_functions(2);
    let parser = Parser::new(&library, platform)?;
    parser.parse(args)
}

// parse uses two GPUs on a host.
pub fn parse(args: &[&str]) -> CliResult<CommandRequest> {
    parse_with(2, host(), args)
}

// parse_reporting keeps the error target of a failed parse, with two GPUs
// on a host.
pub fn parse_reporting(args: &[&str]) -> Result<CommandRequest, CliFailure> {
    let library = StaticLibrary::synthetic(2);
    let parser = Parser::new(&library, host()).map_err(|error| {
        CliFailure::new(error, ErrorTarget::default())
    })?;
    parser.parse_reporting(args)
}
