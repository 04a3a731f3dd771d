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

mod common;

use std::path::{Path, PathBuf};

use common::{baremetal, guest, host, parse, parse_reporting, parse_with};
use smi_cli::command::Command;
use smi_cli::error::CliError;
use smi_cli::grammar::Selector;
use smi_cli::request::{OutputFormat, ProcessFilterKind, Severity};

fn invalid_parameter(name: &str) -> CliError {
    CliError::InvalidParameter(name.to_string())
}

fn indices(request: &smi_cli::CommandRequest) -> Vec<u32> {
    request.devices().iter().map(|d| d.index).collect()
}

#[test]
fn test_empty_command_line_is_help() {
    let request = parse(&[]).unwrap();
    assert_eq!(request.command(), Command::Help);
    assert!(request.devices().is_empty());
}

#[test]
fn test_unknown_command() {
    assert_eq!(
        parse(&["foo"]),
        Err(CliError::InvalidCommand("foo".to_string()))
    );
    assert_eq!(
        parse(&["--json", "metric"]),
        Err(CliError::InvalidCommand("--json".to_string()))
    );
}

#[test]
fn test_end_to_end_metric_power_json() {
    let request = parse(&["metric", "--gpu=0", "--power", "--json"]).unwrap();
    assert_eq!(request.command(), Command::Metric);
    assert_eq!(request.options(), ["power"]);
    assert_eq!(indices(&request), vec![0]);
    assert_eq!(request.format(), OutputFormat::Json);
    assert_eq!(request.selector(), Selector::Gpu);
    assert!(!request.all_arguments());
}

#[test]
fn test_parse_is_repeatable() {
    let args = ["metric", "--gpu=1", "--clock", "-t", "--csv"];
    assert_eq!(parse(&args), parse(&args));
}

#[test]
fn test_gpu_selection() {
    assert_eq!(indices(&parse(&["metric", "--gpu=0"]).unwrap()), vec![0]);
    assert_eq!(indices(&parse(&["metric", "-g=1"]).unwrap()), vec![1]);
    assert_eq!(
        indices(&parse(&["metric", "--gpu=1", "--gpu=0", "--gpu=1"]).unwrap()),
        vec![1, 0]
    );
    assert_eq!(
        indices(&parse(&["metric", "--gpu=0000:01:00.0"]).unwrap()),
        vec![0]
    );
}

#[test]
fn test_gpu_selection_errors() {
    assert_eq!(
        parse(&["metric", "--gpu=2"]),
        Err(CliError::DeviceNotFound("2".to_string()))
    );
    assert_eq!(
        parse(&["metric", "--gpu="]),
        Err(CliError::MissingParameterValue("--gpu=".to_string()))
    );
    assert_eq!(
        parse(&["metric", "--gpu"]),
        Err(CliError::MissingParameterValue("--gpu=".to_string()))
    );
    assert_eq!(
        parse(&["metric", "--gpu=abc"]),
        Err(CliError::InvalidParameterValue("abc".to_string()))
    );
}

#[test]
fn test_no_selector_means_all_devices() {
    let request = parse_with(4, host(), &["metric", "--power"]).unwrap();
    assert_eq!(indices(&request), vec![0, 1, 2, 3]);
    assert!(!request.all_arguments());

    assert_eq!(
        parse_with(0, host(), &["metric"]),
        Err(CliError::DeviceNotFound("all".to_string()))
    );
}

#[test]
fn test_informational_commands_take_no_devices() {
    let request = parse(&["version"]).unwrap();
    assert_eq!(request.command(), Command::Version);
    assert!(request.devices().is_empty());

    assert_eq!(parse(&["version", "--gpu=0"]), Err(invalid_parameter("--gpu=0")));
    assert_eq!(parse(&["help", "--gpu=0"]), Err(invalid_parameter("--gpu=0")));
}

#[test]
fn test_vf_selector() {
    let request = parse(&["metric", "--vf=0:1", "--schedule"]).unwrap();
    assert_eq!(request.selector(), Selector::Vf);
    assert_eq!(request.vf_id(), Some("0:1"));
    assert_eq!(request.options(), ["schedule"]);
    assert_eq!(request.devices().len(), 2);

    let request = parse(&["static", "--vf=0:0"]).unwrap();
    assert_eq!(request.selector(), Selector::Vf);
    assert!(request.all_arguments());
}

#[test]
fn test_vf_selector_rejected_by_command() {
    for platform in [host(), guest(), baremetal()] {
        for command in ["list", "discovery", "help", "version"] {
            assert_eq!(
                parse_with(2, platform, &[command, "--vf=0:0"]),
                Err(invalid_parameter("--vf=0:0")),
                "{command} on {}",
                platform.role
            );
        }
    }
    assert_eq!(parse(&["topology", "--vf=0:0"]), Err(invalid_parameter("--vf")));
    assert_eq!(
        parse(&["metric", "--vf=0:0", "--power"]),
        Err(invalid_parameter("--power"))
    );
}

#[test]
fn test_vf_selector_errors() {
    assert_eq!(
        parse_with(2, guest(), &["metric", "--vf=0:1"]),
        Err(CliError::ParameterNotSupported("--vf".to_string()))
    );
    assert_eq!(
        parse(&["metric", "--vf="]),
        Err(CliError::MissingParameterValue("--vf".to_string()))
    );
    assert_eq!(
        parse(&["metric", "--gpu=0", "--vf=0:1"]),
        Err(invalid_parameter("--vf"))
    );
    assert_eq!(
        parse(&["metric", "--vf=0:1", "--gpu=0"]),
        Err(invalid_parameter("--vf"))
    );
}

#[test]
fn test_output_format_flags() {
    assert_eq!(parse(&["list", "--csv"]).unwrap().format(), OutputFormat::Csv);
    assert_eq!(parse(&["list"]).unwrap().format(), OutputFormat::Human);
    assert_eq!(
        parse(&["metric", "--json", "--csv"]),
        Err(invalid_parameter("--csv"))
    );
    assert_eq!(
        parse(&["metric", "--json", "--json"]),
        Err(invalid_parameter("--json"))
    );
    assert_eq!(parse(&["help", "--json"]), Err(invalid_parameter("--json")));
    assert_eq!(parse(&["reset", "--json"]), Err(invalid_parameter("--json")));
    assert_eq!(
        parse(&["set", "--power-cap=100", "--csv"]),
        Err(invalid_parameter("--csv"))
    );
}

#[test]
fn test_help_redirect() {
    let request = parse(&["metric", "--power", "--help"]).unwrap();
    assert_eq!(request.command(), Command::Help);
    assert_eq!(request.options(), ["metric"]);

    let request = parse(&["static", "-h", "--file=/tmp/static-help.txt"]).unwrap();
    assert_eq!(request.command(), Command::Help);
    assert_eq!(request.file(), Some(Path::new("/tmp/static-help.txt")));

    assert_eq!(
        parse(&["metric", "--help", "--json"]),
        Err(invalid_parameter("--json"))
    );
}

#[test]
fn test_unknown_options() {
    assert_eq!(parse(&["metric", "--bogus"]), Err(invalid_parameter("--bogus")));
    assert_eq!(parse(&["metric", "--power=3"]), Err(invalid_parameter("--power=3")));
    assert_eq!(parse(&["list", "--power"]), Err(invalid_parameter("--power")));
}

#[test]
fn test_option_names_are_recorded_in_order() {
    let request = parse(&["metric", "-t", "--power", "--ecc-block"]).unwrap();
    assert_eq!(request.options(), ["t", "power", "ecc-block"]);
    assert!(request.has_option("power"));
    assert!(!request.has_option("clock"));
}

#[test]
fn test_file_option() {
    let request = parse(&["metric", "--file=/tmp/out.json"]).unwrap();
    assert_eq!(request.file(), Some(Path::new("/tmp/out.json")));
    assert!(request.all_arguments());

    assert_eq!(
        parse(&["metric", "--file="]),
        Err(CliError::MissingParameterValue("--file".to_string()))
    );
}

#[test]
fn test_watch_options() {
    let request = parse(&["metric", "-w=1", "-W=10"]).unwrap();
    assert_eq!(request.watch().interval, Some(1));
    assert_eq!(request.watch().watch_time, Some(10));
    assert_eq!(request.watch().iterations, None);

    let request = parse(&["monitor", "--watch=2", "--iterations=3"]).unwrap();
    assert_eq!(request.watch().interval, Some(2));
    assert_eq!(request.watch().iterations, Some(3));
}

#[test]
fn test_watch_time_and_iterations_conflict() {
    assert_eq!(
        parse(&["metric", "--watch=1", "--watch_time=5", "--iterations=3"]),
        Err(invalid_parameter("--iterations"))
    );
    assert_eq!(
        parse(&["metric", "--watch=1", "-i=3", "-W=5"]),
        Err(invalid_parameter("-W"))
    );
}

#[test]
fn test_watch_must_come_first() {
    assert_eq!(
        parse(&["monitor", "--iterations=3", "--watch=2"]),
        Err(CliError::MissingParameterValue("--iterations".to_string()))
    );
    assert_eq!(
        parse(&["metric", "-W=10", "-w=1"]),
        Err(invalid_parameter("-W"))
    );
    assert_eq!(
        parse(&["metric", "--watch_time", "--watch=1"]),
        Err(invalid_parameter("--watch_time"))
    );
}

#[test]
fn test_watch_modifiers_need_watch() {
    assert_eq!(
        parse(&["metric", "--watch_time=5"]),
        Err(invalid_parameter("--watch_time"))
    );
    assert_eq!(
        parse(&["process", "--iterations=5"]),
        Err(CliError::MissingParameterValue("--iterations".to_string()))
    );
    assert_eq!(parse(&["static", "--watch=1"]), Err(invalid_parameter("--watch")));
    assert_eq!(
        parse(&["metric", "--watch=fast"]),
        Err(CliError::InvalidParameterValue("fast".to_string()))
    );
}

#[test]
fn test_process_filters() {
    let request = parse(&["process", "--name=python", "--pid=1234"]).unwrap();
    assert_eq!(request.options(), ["name", "pid"]);
    assert_eq!(
        request.process_filters().get("python"),
        Some(&ProcessFilterKind::Name)
    );
    assert_eq!(
        request.process_filters().get("1234"),
        Some(&ProcessFilterKind::Pid)
    );

    assert_eq!(
        parse(&["process", "--pid=abc"]),
        Err(CliError::InvalidParameterValue("abc".to_string()))
    );
    assert_eq!(parse(&["metric", "--name=python"]), Err(invalid_parameter("--name")));
}

#[test]
fn test_xgmi_mode() {
    let request = parse(&["xgmi", "--mode=MODE_2"]).unwrap();
    assert_eq!(request.xgmi_mode(), Some("MODE_2"));

    let request = parse(&["xgmi", "--mode", "--caps"]).unwrap();
    assert_eq!(request.options(), ["mode", "caps"]);
}

#[test]
fn test_static_process_isolation_flag() {
    let request = parse(&["static", "-R"]).unwrap();
    assert_eq!(request.options(), ["R"]);
    assert_eq!(parse(&["static", "-R=1"]), Err(invalid_parameter("-R")));
}

#[test]
fn test_all_arguments() {
    let request = parse(&["metric"]).unwrap();
    assert!(request.all_arguments());
    assert_eq!(request.devices().len(), 2);

    assert!(parse(&["metric", "--gpu=0"]).unwrap().all_arguments());
    assert!(!parse(&["metric", "--clock"]).unwrap().all_arguments());
}

#[test]
fn test_monitor_process_only_keeps_all_arguments() {
    let request = parse(&["monitor", "-q"]).unwrap();
    assert_eq!(request.options(), ["q"]);
    assert!(request.all_arguments());

    assert!(parse(&["monitor", "--process"]).unwrap().all_arguments());
    assert!(!parse(&["monitor", "-q", "-p"]).unwrap().all_arguments());
}

#[test]
fn test_set_requires_target() {
    assert_eq!(
        parse(&["set"]),
        Err(CliError::RequiredCommand("set".to_string()))
    );
    assert_eq!(
        parse(&["set", "--xgmi"]),
        Err(CliError::RequiredCommand("set".to_string()))
    );
    assert_eq!(
        parse(&["set", "--gpu=0"]),
        Err(CliError::RequiredCommand("set".to_string()))
    );
}

#[test]
fn test_set_groups() {
    let request = parse_with(
        4,
        host(),
        &["set", "--xgmi", "--fb-sharing-mode=CUSTOM", "--group=0-1 2-3"],
    )
    .unwrap();
    assert_eq!(request.options(), ["xgmi"]);
    assert_eq!(request.fb_sharing_mode(), Some("CUSTOM"));
    let groups: Vec<Vec<u32>> = request
        .groups()
        .iter()
        .map(|group| group.iter().map(|handle| handle.index).collect())
        .collect();
    assert_eq!(groups, vec![vec![0, 1], vec![2, 3]]);
    assert_eq!(request.groups()[1][0].bdf.to_string(), "0000:03:00.0");

    let request = parse_with(
        4,
        host(),
        &["set", "--xgmi", "--fb-sharing-mode=CUSTOM", "--group=3-0"],
    )
    .unwrap();
    let order: Vec<u32> = request.groups()[0].iter().map(|h| h.index).collect();
    assert_eq!(order, vec![3, 0]);
    assert!(!request.all_arguments());
}

#[test]
fn test_set_group_errors() {
    let set = |group: &str| {
        let group = format!("--group={group}");
        parse_with(
            4,
            host(),
            &["set", "--xgmi", "--fb-sharing-mode=CUSTOM", &group],
        )
    };
    assert_eq!(set("0-0"), Err(CliError::InvalidParameterValue("0".to_string())));
    assert_eq!(set("0-x"), Err(CliError::InvalidParameterValue("0-x".to_string())));
    assert_eq!(set("0-5"), Err(CliError::DeviceNotFound("5".to_string())));

    assert_eq!(
        parse(&["set", "--xgmi", "--fb-sharing-mode=CUSTOM"]),
        Err(CliError::RequiredCommand("set".to_string()))
    );
    assert_eq!(
        parse(&["set", "--xgmi", "--fb-sharing-mode=MODE_4", "--group=0-1"]),
        Err(invalid_parameter("--group"))
    );
}

#[test]
fn test_set_power_cap() {
    let request = parse(&["set", "--gpu=1", "--power-cap=300"]).unwrap();
    assert_eq!(request.power_cap(), Some(300));
    assert_eq!(request.options(), ["power-cap"]);
    assert_eq!(indices(&request), vec![1]);

    assert_eq!(parse(&["set", "-pc=250"]).unwrap().power_cap(), Some(250));
    assert_eq!(
        parse(&["set", "--power-cap"]),
        Err(CliError::MissingParameterValue("--power-cap".to_string()))
    );
    assert_eq!(
        parse(&["set", "--power-cap=high"]),
        Err(CliError::InvalidParameterValue("high".to_string()))
    );
}

#[test]
fn test_set_partitions_and_isolation() {
    let request = parse(&["set", "--memory-partition=NPS1"]).unwrap();
    assert_eq!(request.memory_partition(), Some("NPS1"));
    assert_eq!(request.options(), ["memory-partition"]);

    let request = parse(&["set", "--accelerator-partition=2"]).unwrap();
    assert_eq!(request.accelerator_partition(), Some(2));

    let request = parse(&["set", "-R=1", "-ps=0"]).unwrap();
    assert_eq!(request.process_isolation(), Some("1"));
    assert_eq!(request.soc_pstate(), Some("0"));
    assert_eq!(request.options(), ["process-isolation", "soc-pstate"]);
}

#[test]
fn test_ras() {
    let request = parse(&[
        "ras",
        "--cper",
        "--severity=nonfatal-corrected,fatal",
        "--folder=/var/log/cper",
        "--file_limit=5",
        "--follow",
    ])
    .unwrap();
    assert_eq!(request.options(), ["cper", "file_limit", "follow"]);
    assert_eq!(
        request.severities(),
        [Severity::NonfatalCorrected, Severity::Fatal]
    );
    assert_eq!(request.ras_folder(), Some(Path::new("/var/log/cper")));
    assert_eq!(request.file_limit(), Some(5));
    assert!(request.follow());
}

#[test]
fn test_ras_errors() {
    assert_eq!(
        parse(&["ras", "--cper", "--severity=fatal,bogus"]),
        Err(invalid_parameter("bogus"))
    );
    assert_eq!(
        parse(&["ras", "--cper", "--severity=all", "--file_limit=0"]),
        Err(CliError::InvalidParameterValue("0".to_string()))
    );
    assert_eq!(
        parse(&["ras", "--cper", "--severity=all", "--file=/tmp/ras.json"]),
        Err(invalid_parameter("--file"))
    );
    assert_eq!(
        parse(&["ras", "--cper"]),
        Err(CliError::RequiredCommand("ras".to_string()))
    );
    assert_eq!(
        parse(&["ras", "--severity=all"]),
        Err(CliError::RequiredCommand("ras".to_string()))
    );
}

#[test]
fn test_reset() {
    assert_eq!(
        parse(&["reset"]),
        Err(CliError::RequiredCommand("reset".to_string()))
    );
    assert_eq!(
        parse(&["reset", "--gpu=0"]),
        Err(CliError::RequiredCommand("reset".to_string()))
    );
    assert_eq!(
        parse(&["reset", "--gpu=0", "--file=/tmp/reset.txt"]),
        Err(invalid_parameter("--file"))
    );

    let request = parse(&["reset", "--gpu=0", "--clean-local-data"]).unwrap();
    assert_eq!(request.options(), ["clean-local-data"]);
    assert_eq!(indices(&request), vec![0]);

    let request = parse(&["reset", "--vf=1:0", "--vf-fb"]).unwrap();
    assert_eq!(request.selector(), Selector::Vf);
    assert_eq!(request.options(), ["vf-fb"]);
}

#[test]
fn test_error_file_only_after_it_was_parsed() {
    let failure = parse_reporting(&["metric", "--bogus", "--file=/tmp/metric.txt"]).unwrap_err();
    assert_eq!(failure.error, invalid_parameter("--bogus"));
    assert_eq!(failure.target.file, None);

    let failure = parse_reporting(&["metric", "--gpu=9", "--file=/tmp/metric.txt"]).unwrap_err();
    assert_eq!(failure.error, CliError::DeviceNotFound("9".to_string()));
    assert_eq!(failure.target.file, None);

    let failure = parse_reporting(&["metric", "--file=/tmp/metric.txt", "--bogus"]).unwrap_err();
    assert_eq!(failure.target.file, Some(PathBuf::from("/tmp/metric.txt")));

    let failure =
        parse_reporting(&["metric", "--file=/tmp/metric.txt", "--watch_time=5"]).unwrap_err();
    assert_eq!(failure.target.file, Some(PathBuf::from("/tmp/metric.txt")));
}

#[test]
fn test_error_format_is_the_first_accepted_flag() {
    let failure = parse_reporting(&["metric", "--json", "--csv"]).unwrap_err();
    assert_eq!(failure.error, invalid_parameter("--csv"));
    assert_eq!(failure.target.format, OutputFormat::Json);

    let failure = parse_reporting(&["metric", "--csv", "--bogus"]).unwrap_err();
    assert_eq!(failure.target.format, OutputFormat::Csv);

    let failure = parse_reporting(&["reset", "--json"]).unwrap_err();
    assert_eq!(failure.target.format, OutputFormat::Human);
}
