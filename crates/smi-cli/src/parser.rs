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

use smi_device::{DeviceHandle, DeviceLibrary};
use tracing::debug;

use crate::command::Command;
use crate::error::{CliError, CliResult};
use crate::grammar::{GrammarTable, Selector};
use crate::options::ValueOption;
use crate::platform::{PlatformCapabilities, PlatformInfo};
use crate::render::{CliFailure, ErrorTarget};
use crate::request::{CommandRequest, CommandRequestBuilder, OutputFormat};
use crate::resolver::DeviceResolver;
use crate::token::{Token, tokenize};

// FB_SHARING_CUSTOM is the only sharing mode that takes explicit groups.
const FB_SHARING_CUSTOM: &str = "CUSTOM";

/// Parser validates a command line against the grammar table and the
/// platform, producing a CommandRequest. It runs in five phases: output
/// format, command, device selector, option whitelist and cross-field
/// checks. The first violation found is returned.
pub struct Parser<'a> {
    resolver: DeviceResolver<'a>,
    grammar: GrammarTable,
    platform: PlatformInfo,
}

impl<'a> Parser<'a> {
    // new reads the device count from the library once.
    pub fn new(library: &'a dyn DeviceLibrary, platform: PlatformInfo) -> CliResult<Self> {
        Ok(Self {
            resolver: DeviceResolver::new(library)?,
            grammar: GrammarTable::new(),
            platform,
        })
    }

    pub fn grammar(&self) -> &GrammarTable {
        &self.grammar
    }

    pub fn platform(&self) -> PlatformInfo {
        self.platform
    }

    pub fn resolver(&self) -> &DeviceResolver<'a> {
        &self.resolver
    }

    // parse takes the arguments after the program name.
    pub fn parse<I, S>(&self, args: I) -> CliResult<CommandRequest>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_reporting(args).map_err(|failure| failure.error)
    }

    // parse_reporting is parse, but a failure also carries the output
    // format and --file path that were parsed before the error.
    pub fn parse_reporting<I, S>(&self, args: I) -> Result<CommandRequest, CliFailure>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokenize(args);
        let mut target = ErrorTarget::default();
        let result = self.run_phases(&tokens, &mut target);
        result.map_err(|error| CliFailure::new(error, target))
    }

    fn run_phases(&self, tokens: &[Token], target: &mut ErrorTarget) -> CliResult<CommandRequest> {
        let Some(first) = tokens.first() else {
            debug!("empty command line, showing help");
            return Ok(CommandRequestBuilder::new(Command::Help).build());
        };

        let format_flag = output_format_flag(tokens, target)?;
        let format = target.format;
        debug!(?format, "output format");

        let command: Command = first
            .raw
            .parse()
            .map_err(|_| CliError::InvalidCommand(first.raw.clone()))?;
        if command == Command::Help
            && let Some(flag) = format_flag
        {
            return Err(CliError::InvalidParameter(flag.raw.clone()));
        }
        debug!(%command, "command identified");

        let rest: Vec<&Token> = tokens[1..]
            .iter()
            .filter(|token| !token.is_output_format())
            .collect();
        let builder = CommandRequestBuilder::new(command).with_format(format);

        if rest.is_empty() {
            return self.lone_command(builder);
        }
        if rest.iter().any(|token| token.is_help()) {
            if let Some(flag) = format_flag {
                return Err(CliError::InvalidParameter(flag.raw.clone()));
            }
            return self.help_for(command, &rest);
        }

        let (mut builder, devices, remaining) = self.extract_selectors(builder, rest)?;
        let checked = self
            .apply_options(&mut builder, devices, remaining)
            .and_then(|()| check_cross_fields(&mut builder));
        if let Err(error) = checked {
            target.file = builder.file.take();
            return Err(error);
        }
        Ok(builder.build())
    }

    // lone_command handles a command with nothing after it.
    fn lone_command(&self, builder: CommandRequestBuilder) -> CliResult<CommandRequest> {
        let command = builder.command;
        if command.requires_target() {
            return Err(CliError::RequiredCommand(command.to_string()));
        }
        if command.is_informational() {
            return Ok(builder.build());
        }
        Ok(builder
            .with_devices(self.all_devices()?)
            .with_all_arguments(true)
            .build())
    }

    // help_for turns `<command> ... --help` into `help <command>`. Only
    // --file is still read from the rest of the line.
    fn help_for(&self, command: Command, rest: &[&Token]) -> CliResult<CommandRequest> {
        debug!(%command, "help requested");
        let mut builder =
            CommandRequestBuilder::new(Command::Help).with_options([command.to_string()]);
        for token in rest.iter().filter(|token| token.key == ValueOption::File.name()) {
            ValueOption::File.apply(token, Command::Help, &mut builder, &self.resolver)?;
        }
        Ok(builder.build())
    }

    // extract_selectors consumes --gpu / -g / --vf tokens and returns
    // the selected devices and the tokens left over.
    fn extract_selectors<'t>(
        &self,
        mut builder: CommandRequestBuilder,
        rest: Vec<&'t Token>,
    ) -> CliResult<(CommandRequestBuilder, Vec<DeviceHandle>, Vec<&'t Token>)> {
        let command = builder.command;
        let mut devices: Vec<DeviceHandle> = Vec::new();
        let mut remaining = Vec::with_capacity(rest.len());
        let mut gpu_selected = false;

        for token in rest {
            match token.key.as_str() {
                "--gpu" | "-g" => {
                    if command.is_informational() {
                        return Err(CliError::InvalidParameter(token.raw.clone()));
                    }
                    let handle = self.resolver.resolve(token.value_str())?;
                    gpu_selected = true;
                    if !devices.contains(&handle) {
                        devices.push(handle);
                    }
                }
                "--vf" => {
                    if !command.accepts_vf_selector() {
                        return Err(CliError::InvalidParameter(token.raw.clone()));
                    }
                    if !self.platform.supports_vf_selector() {
                        return Err(CliError::ParameterNotSupported(
                            Selector::Vf.keyword().to_string(),
                        ));
                    }
                    let value = token.value_str();
                    if value.is_empty() {
                        return Err(CliError::MissingParameterValue(
                            Selector::Vf.keyword().to_string(),
                        ));
                    }
                    builder.vf_id = Some(value.to_string());
                    builder.selector = Selector::Vf;
                }
                _ => remaining.push(token),
            }
        }

        if gpu_selected && builder.vf_id.is_some() {
            return Err(CliError::InvalidParameter(
                Selector::Vf.keyword().to_string(),
            ));
        }
        debug!(
            selector = ?builder.selector,
            devices = devices.len(),
            "device selector extracted"
        );
        Ok((builder, devices, remaining))
    }

    // apply_options checks each remaining token against the grammar
    // table and runs the value parsers.
    fn apply_options(
        &self,
        builder: &mut CommandRequestBuilder,
        mut devices: Vec<DeviceHandle>,
        remaining: Vec<&Token>,
    ) -> CliResult<()> {
        let command = builder.command;
        let legal: &[&str] = if command.is_informational() {
            &[]
        } else {
            let selector = builder.selector;
            let legal = self
                .grammar
                .legal_options(command, selector)
                .ok_or_else(|| CliError::InvalidParameter(selector.keyword().to_string()))?;
            if devices.is_empty() {
                devices = self.all_devices()?;
            }
            legal
        };
        builder.devices = devices;

        for token in remaining {
            let verbatim = legal.iter().any(|option| *option == token.raw);
            let routed = matches!(command, Command::Set | Command::Ras)
                && ValueOption::lookup(&token.key).is_some();
            if verbatim && !routed {
                let name = token.option_name();
                if command == Command::Ras && name == "follow" {
                    builder.follow = true;
                }
                builder.push_option(name);
                continue;
            }
            match ValueOption::lookup(&token.key) {
                Some(option) => option.apply(token, command, builder, &self.resolver)?,
                None => return Err(CliError::InvalidParameter(token.raw.clone())),
            }
        }
        debug!(options = ?builder.options, "options validated");
        Ok(())
    }

    // all_devices expands "no selector" into every GPU.
    fn all_devices(&self) -> CliResult<Vec<DeviceHandle>> {
        let devices = self.resolver.resolve_all()?;
        if devices.is_empty() {
            return Err(CliError::DeviceNotFound("all".to_string()));
        }
        Ok(devices)
    }
}

// check_cross_fields enforces the rules that span several options.
fn check_cross_fields(builder: &mut CommandRequestBuilder) -> CliResult<()> {
    let command = builder.command;

    if command == Command::Set {
        let has_xgmi = builder.options.iter().any(|o| o == "xgmi");
        let has_target = (has_xgmi && builder.fb_sharing_mode.is_some())
            || builder.memory_partition.is_some()
            || builder.accelerator_partition.is_some()
            || builder.process_isolation.is_some()
            || builder.soc_pstate.is_some()
            || builder.power_cap.is_some();
        if !has_target {
            return Err(CliError::RequiredCommand(command.to_string()));
        }
        if builder.fb_sharing_mode.as_deref() == Some(FB_SHARING_CUSTOM) {
            if builder.groups.is_empty() {
                return Err(CliError::RequiredCommand(command.to_string()));
            }
        } else if !builder.groups.is_empty() {
            return Err(CliError::InvalidParameter(
                ValueOption::Group.name().to_string(),
            ));
        }
    }

    if command == Command::Ras {
        let has_cper = builder.options.iter().any(|o| o == "cper");
        if !has_cper || builder.severities.is_empty() {
            return Err(CliError::RequiredCommand(command.to_string()));
        }
    }

    if builder.options.is_empty() {
        if command == Command::Reset {
            return Err(CliError::RequiredCommand(command.to_string()));
        }
        builder.all_arguments = true;
    }

    if command == Command::Monitor
        && builder.options.len() == 1
        && matches!(builder.options[0].as_str(), "process" | "q")
    {
        builder.all_arguments = true;
    }

    Ok(())
}

// output_format_flag finds the --json / --csv token and records its
// format on `target`. More than one, or one on a command that prints no
// report, is an error; the first accepted flag's format stays in effect.
fn output_format_flag<'t>(
    tokens: &'t [Token],
    target: &mut ErrorTarget,
) -> CliResult<Option<&'t Token>> {
    let rejects_format = tokens
        .first()
        .and_then(|token| token.raw.parse::<Command>().ok())
        .is_some_and(|command| !command.accepts_output_format());
    let mut found: Option<&Token> = None;
    for token in tokens.iter().filter(|token| token.is_output_format()) {
        if found.is_some() || rejects_format {
            return Err(CliError::InvalidParameter(token.raw.clone()));
        }
        target.format = OutputFormat::from_flag(&token.raw).unwrap_or_default();
        found = Some(token);
    }
    Ok(found)
}

// scan_output_format runs only the output format phase. It lets the
// caller pick the error format for failures outside the parser.
pub fn scan_output_format(tokens: &[Token]) -> OutputFormat {
    let mut target = ErrorTarget::default();
    let _ = output_format_flag(tokens, &mut target);
    target.format
}
