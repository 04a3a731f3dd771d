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

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smi_device::SysfsLibrary;
use smi_device::sysfs::SYSFS_PCI_DEVICES;
use strum_macros::Display;
use tracing::{debug, warn};

use crate::command::Command;

const MI300_DEVICE_IDS: &[u16] = &[
    0x74a0, 0x74a1, 0x74a2, 0x74b6, 0x74a9, 0x74bd, 0x74a5, 0x74b9,
];
const MI200_DEVICE_IDS: &[u16] = &[0x7410];
const NV32_DEVICE_IDS: &[u16] = &[0x73c4, 0x73c5, 0x73c8, 0x7460, 0x7461];

const HOST_DRIVER_MODULE: &str = "gim";
const HOST_USER_MODE_PROCESS: &str = "gim_user_mode";
const GPU_DRIVER_MODULE: &str = "amdgpu";
const HYPERVISOR_CPU_FLAG: &str = "hypervisor";

// PlatformRole is where the tool runs relative to the virtualization
// stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlatformRole {
    // Host runs the GPU virtualization driver and owns the VFs.
    Host,
    // Guest is a virtual machine with a VF passed through.
    Guest,
    // Baremetal has the native GPU driver and no hypervisor.
    Baremetal,
    // Unknown has no recognized driver loaded.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AsicFamily {
    Mi300,
    Mi200,
    Nv32,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OsKind {
    Linux,
    Windows,
    Other,
}

impl OsKind {
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            OsKind::Linux
        } else if cfg!(target_os = "windows") {
            OsKind::Windows
        } else {
            OsKind::Other
        }
    }
}

/// PlatformInfo is computed once at startup and handed to the parser and
/// the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformInfo {
    pub role: PlatformRole,
    pub asic: AsicFamily,
    pub os: OsKind,
}

impl PlatformInfo {
    pub fn new(role: PlatformRole, asic: AsicFamily, os: OsKind) -> Self {
        Self { role, asic, os }
    }

    // with_role pins the role, as the configuration override does.
    pub fn with_role(mut self, role: PlatformRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_host(&self) -> bool {
        self.role == PlatformRole::Host
    }
}

/// PlatformCapabilities answers which parts of the command surface the
/// current platform can serve.
pub trait PlatformCapabilities {
    /// Whether `--vf` can be used at all.
    fn supports_vf_selector(&self) -> bool;

    /// Whether `command` is available.
    fn supports_command(&self, command: Command) -> bool;
}

impl PlatformCapabilities for PlatformInfo {
    fn supports_vf_selector(&self) -> bool {
        self.is_host()
    }

    fn supports_command(&self, command: Command) -> bool {
        let host = self.is_host();
        match command {
            Command::Ras | Command::Partition => host && self.asic == AsicFamily::Mi300,
            Command::Topology | Command::Xgmi => {
                host && matches!(self.asic, AsicFamily::Mi300 | AsicFamily::Mi200)
            }
            Command::BadPages => host,
            Command::Process => !host,
            Command::Firmware | Command::Ucode => self.role != PlatformRole::Guest,
            Command::Profile => host && self.os != OsKind::Linux,
            Command::Help
            | Command::List
            | Command::Static
            | Command::Discovery
            | Command::Metric
            | Command::Version
            | Command::Event
            | Command::Reset
            | Command::Set
            | Command::Monitor => true,
        }
    }
}

// classify_role derives the role from loaded kernel modules, whether the
// host user mode daemon runs, and the CPU hypervisor flag.
pub fn classify_role<S: AsRef<str>>(
    modules: &[S],
    gim_user_mode: bool,
    hypervisor: bool,
) -> PlatformRole {
    let loaded = |name: &str| modules.iter().any(|m| m.as_ref() == name);
    if loaded(HOST_DRIVER_MODULE) || gim_user_mode {
        PlatformRole::Host
    } else if loaded(GPU_DRIVER_MODULE) {
        if hypervisor {
            PlatformRole::Guest
        } else {
            PlatformRole::Baremetal
        }
    } else {
        PlatformRole::Unknown
    }
}

// classify_asic picks the family of the newest recognized part present.
pub fn classify_asic(device_ids: &[u16]) -> AsicFamily {
    let any_of = |family: &[u16]| device_ids.iter().any(|id| family.contains(id));
    if any_of(MI300_DEVICE_IDS) {
        AsicFamily::Mi300
    } else if any_of(MI200_DEVICE_IDS) {
        AsicFamily::Mi200
    } else if any_of(NV32_DEVICE_IDS) {
        AsicFamily::Nv32
    } else {
        AsicFamily::Other
    }
}

// PlatformDetector reads the facts platform detection needs from procfs
// and the PCI tree. Both roots can be redirected for tests.
#[derive(Debug, Clone)]
pub struct PlatformDetector {
    proc_root: PathBuf,
    pci_root: PathBuf,
}

impl Default for PlatformDetector {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            pci_root: PathBuf::from(SYSFS_PCI_DEVICES),
        }
    }
}

impl PlatformDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    pub fn with_pci_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.pci_root = root.into();
        self
    }

    // detect never fails; unreadable sources count as absent.
    pub fn detect(&self) -> PlatformInfo {
        let modules = self.loaded_modules();
        let role = classify_role(
            &modules,
            self.process_running(HOST_USER_MODE_PROCESS),
            self.has_hypervisor_flag(),
        );
        if role == PlatformRole::Unknown {
            warn!("no GPU driver detected, platform role is unknown");
        }
        let asic = classify_asic(&self.gpu_device_ids());
        let info = PlatformInfo::new(role, asic, OsKind::current());
        debug!(role = %info.role, asic = %info.asic, os = %info.os, "platform detected");
        info
    }

    fn loaded_modules(&self) -> Vec<String> {
        read_or_empty(&self.proc_root.join("modules"))
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect()
    }

    fn process_running(&self, name: &str) -> bool {
        let Ok(entries) = fs::read_dir(&self.proc_root) else {
            return false;
        };
        entries.flatten().any(|entry| {
            let pid = entry.file_name();
            pid.to_string_lossy().bytes().all(|b| b.is_ascii_digit())
                && read_or_empty(&entry.path().join("comm")).trim() == name
        })
    }

    fn has_hypervisor_flag(&self) -> bool {
        read_or_empty(&self.proc_root.join("cpuinfo"))
            .lines()
            .filter(|line| line.starts_with("flags"))
            .any(|line| line.split_whitespace().any(|flag| flag == HYPERVISOR_CPU_FLAG))
    }

    fn gpu_device_ids(&self) -> Vec<u16> {
        match SysfsLibrary::new()
            .with_root(&self.pci_root)
            .physical_functions()
        {
            Ok(functions) => functions.iter().map(|f| f.device_id).collect(),
            Err(status) => {
                warn!(%status, "could not enumerate GPUs for ASIC detection");
                Vec::new()
            }
        }
    }
}

fn read_or_empty(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}
