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

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::handle::{DeviceHandle, VfEntry};
use crate::id::{Bdf, DeviceId};
use crate::library::DeviceLibrary;
use crate::status::{LibraryResult, LibraryStatus};

// MAX_SYNTHETIC_GPUS keeps every synthetic slot inside a 16-bit domain.
const MAX_SYNTHETIC_GPUS: u32 = (1 << 24) - 1;

// InventoryError is returned when an inventory file cannot be loaded.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Failed to read inventory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse inventory: {0}")]
    Parse(#[from] toml::de::Error),
}

// GpuRecord is one GPU in an inventory file. The position in the
// list is the device index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GpuRecord {
    pub bdf: Bdf,
    #[serde(default)]
    pub uuid: Option<Uuid>,
}

// Inventory is the on-disk description of a static device set:
//
//   [[gpus]]
//   bdf = "0000:03:00.0"
//   uuid = "..."
//
//   [[vfs]]
//   gpu = 0
//   vf = 0
//   bdf = "0000:03:02.0"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Inventory {
    #[serde(default)]
    pub gpus: Vec<GpuRecord>,
    #[serde(default)]
    pub vfs: Vec<VfEntry>,
}

impl Inventory {
    // from_file reads an Inventory from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    // from_toml parses an Inventory from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, InventoryError> {
        Ok(toml::from_str(toml_str)?)
    }
}

/// StaticLibrary serves a fixed inventory. It backs simulation runs
/// and tests that need a predictable device set.
#[derive(Debug, Clone, Default)]
pub struct StaticLibrary {
    inventory: Inventory,
}

impl StaticLibrary {
    pub fn new(inventory: Inventory) -> Self {
        Self { inventory }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let inventory = Inventory::from_file(path)?;
        debug!(
            gpus = inventory.gpus.len(),
            vfs = inventory.vfs.len(),
            "loaded static device inventory"
        );
        Ok(Self::new(inventory))
    }

    // synthetic builds `count` GPUs on consecutive buses starting at
    // 0000:01, so every BDF is distinct.
    pub fn synthetic(count: u32) -> Self {
        let gpus = (0..count.min(MAX_SYNTHETIC_GPUS))
            .map(|i| {
                // slot 1 is bus 01; buses wrap into the next domain.
                let slot = i + 1;
                GpuRecord {
                    bdf: Bdf::new((slot >> 8) as u16, (slot & 0xff) as u8, 0, 0),
                    uuid: Some(Uuid::from_u128(0x1000 + u128::from(i))),
                }
            })
            .collect();
        Self::new(Inventory {
            gpus,
            vfs: Vec::new(),
        })
    }

    // with_virtual_functions gives every GPU `per_gpu` VFs at device 2 of
    // its bus.
    pub fn with_virtual_functions(mut self, per_gpu: u8) -> Self {
        let per_gpu = per_gpu.min(8);
        let mut vfs = Vec::new();
        for (gpu, record) in self.inventory.gpus.iter().enumerate() {
            for vf in 0..per_gpu {
                vfs.push(VfEntry {
                    gpu: gpu as u32,
                    vf: u32::from(vf),
                    bdf: Bdf::new(record.bdf.domain, record.bdf.bus, 2, vf),
                    uuid: Some(Uuid::from_u128(
                        0x2000 + ((gpu as u128) << 8) + u128::from(vf),
                    )),
                });
            }
        }
        self.inventory.vfs = vfs;
        self
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn handle(&self, index: usize) -> Option<DeviceHandle> {
        self.inventory
            .gpus
            .get(index)
            .map(|record| DeviceHandle::new(index as u32, record.bdf, record.uuid))
    }
}

impl DeviceLibrary for StaticLibrary {
    fn device_count(&self) -> LibraryResult<u32> {
        Ok(self.inventory.gpus.len() as u32)
    }

    fn resolve_device(&self, id: &DeviceId) -> LibraryResult<DeviceHandle> {
        let position = match id {
            DeviceId::Index(index) => Some(*index as usize),
            DeviceId::Bdf(bdf) => self.inventory.gpus.iter().position(|g| g.bdf == *bdf),
            DeviceId::Uuid(uuid) => self
                .inventory
                .gpus
                .iter()
                .position(|g| g.uuid.as_ref() == Some(uuid)),
        };
        position
            .and_then(|index| self.handle(index))
            .ok_or(LibraryStatus::new(LibraryStatus::NOT_FOUND))
    }

    fn vf_inventory(&self) -> LibraryResult<Vec<VfEntry>> {
        Ok(self.inventory.vfs.clone())
    }
}
