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
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::handle::{DeviceHandle, VfEntry};
use crate::id::{Bdf, DeviceId};
use crate::library::DeviceLibrary;
use crate::status::{LibraryResult, LibraryStatus};

pub const SYSFS_PCI_DEVICES: &str = "/sys/bus/pci/devices";

pub const AMD_VENDOR_ID: u16 = 0x1002;
const CLASS_DISPLAY: u32 = 0x03;
const CLASS_PROCESSING_ACCELERATOR: u32 = 0x12;
const VIRTFN_PREFIX: &str = "virtfn";

// PhysicalFunction is one AMD GPU physical function found in sysfs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalFunction {
    pub bdf: Bdf,
    pub device_id: u16,
    path: PathBuf,
}

/// SysfsLibrary enumerates AMD GPUs straight from the PCI tree. The
/// device order is BDF order, which is also the index order.
#[derive(Debug, Clone)]
pub struct SysfsLibrary {
    root: PathBuf,
}

impl Default for SysfsLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsLibrary {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(SYSFS_PCI_DEVICES),
        }
    }

    // with_root points the library at another PCI devices directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // physical_functions lists AMD display and accelerator functions,
    // skipping virtual functions, sorted by BDF.
    pub fn physical_functions(&self) -> LibraryResult<Vec<PhysicalFunction>> {
        let entries = fs::read_dir(&self.root).map_err(|e| file_error(&self.root, e))?;
        let mut functions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| file_error(&self.root, e))?;
            let name = entry.file_name();
            let Ok(bdf) = name.to_string_lossy().parse::<Bdf>() else {
                continue;
            };
            let path = entry.path();
            if path.join("physfn").exists() {
                continue;
            }
            let Some(vendor) = read_hex(&path.join("vendor")) else {
                continue;
            };
            let Some(class) = read_hex(&path.join("class")) else {
                continue;
            };
            if vendor != u32::from(AMD_VENDOR_ID) {
                continue;
            }
            let base_class = class >> 16;
            if base_class != CLASS_DISPLAY && base_class != CLASS_PROCESSING_ACCELERATOR {
                continue;
            }
            let device_id = read_hex(&path.join("device")).unwrap_or_default() as u16;
            functions.push(PhysicalFunction {
                bdf,
                device_id,
                path,
            });
        }
        functions.sort_by_key(|f| f.bdf);
        debug!(count = functions.len(), root = %self.root.display(), "enumerated GPUs");
        Ok(functions)
    }

    fn virtual_functions(&self, gpu: u32, pf: &PhysicalFunction) -> LibraryResult<Vec<VfEntry>> {
        let entries = fs::read_dir(&pf.path).map_err(|e| file_error(&pf.path, e))?;
        let mut vfs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| file_error(&pf.path, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(Ok(vf)) = name.strip_prefix(VIRTFN_PREFIX).map(str::parse::<u32>) else {
                continue;
            };
            let target = fs::read_link(entry.path()).map_err(|e| file_error(&entry.path(), e))?;
            let Some(Ok(bdf)) = target
                .file_name()
                .map(|n| n.to_string_lossy().parse::<Bdf>())
            else {
                warn!(link = %entry.path().display(), "virtfn link does not name a PCI address");
                continue;
            };
            vfs.push(VfEntry {
                gpu,
                vf,
                bdf,
                uuid: None,
            });
        }
        vfs.sort_by_key(|v| v.vf);
        Ok(vfs)
    }
}

impl DeviceLibrary for SysfsLibrary {
    fn device_count(&self) -> LibraryResult<u32> {
        Ok(self.physical_functions()?.len() as u32)
    }

    fn resolve_device(&self, id: &DeviceId) -> LibraryResult<DeviceHandle> {
        let functions = self.physical_functions()?;
        let found = match id {
            DeviceId::Index(index) => functions.get(*index as usize).map(|f| (*index, f)),
            DeviceId::Bdf(bdf) => functions
                .iter()
                .enumerate()
                .find(|(_, f)| f.bdf == *bdf)
                .map(|(i, f)| (i as u32, f)),
            DeviceId::Uuid(_) => {
                return Err(LibraryStatus::new(LibraryStatus::NOT_SUPPORTED));
            }
        };
        found
            .map(|(index, f)| DeviceHandle::new(index, f.bdf, None))
            .ok_or(LibraryStatus::new(LibraryStatus::NOT_FOUND))
    }

    fn vf_inventory(&self) -> LibraryResult<Vec<VfEntry>> {
        let mut all = Vec::new();
        for (gpu, pf) in self.physical_functions()?.iter().enumerate() {
            all.extend(self.virtual_functions(gpu as u32, pf)?);
        }
        Ok(all)
    }
}

// read_hex reads a sysfs attribute such as "0x1002\n".
fn read_hex(path: &Path) -> Option<u32> {
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).ok()
}

fn file_error(path: &Path, e: io::Error) -> LibraryStatus {
    warn!(path = %path.display(), error = %e, "failed to read sysfs");
    LibraryStatus::new(LibraryStatus::FILE_ERROR)
}
