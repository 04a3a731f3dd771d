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

// command module defines the top level commands.
pub mod command;
// config module loads the optional TOML configuration.
pub mod config;
// dispatch module checks platform support and produces output.
pub mod dispatch;
// error module contains the CliError taxonomy.
pub mod error;
// grammar module holds the per-command option whitelist.
pub mod grammar;
// options module parses the value-bearing options.
pub mod options;
// parser module runs the validation phases over a command line.
pub mod parser;
// platform module detects the platform role and its capabilities.
pub mod platform;
// render module formats errors and requests for output.
pub mod render;
// request module defines the parsed CommandRequest and its builder.
pub mod request;
// resolver module maps device tokens to handles.
pub mod resolver;
// token module splits arguments into key/value tokens.
pub mod token;

pub use command::Command;
pub use error::{CliError, CliResult};
pub use grammar::{GrammarTable, Selector};
pub use parser::Parser;
pub use platform::{PlatformCapabilities, PlatformInfo, PlatformRole};
pub use request::{CommandRequest, OutputFormat, Severity};
