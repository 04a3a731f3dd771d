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

use smi_device::{DeviceHandle, DeviceId, DeviceIdError, DeviceLibrary, VfEntry, VfId};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// DeviceResolver turns GPU and VF tokens into handles. The device count
/// is read from the library once, at construction.
pub struct DeviceResolver<'a> {
    library: &'a dyn DeviceLibrary,
    device_count: u32,
}

impl<'a> DeviceResolver<'a> {
    pub fn new(library: &'a dyn DeviceLibrary) -> CliResult<Self> {
        let device_count = library.device_count()?;
        debug!(device_count, "device resolver ready");
        Ok(Self {
            library,
            device_count,
        })
    }

    pub fn device_count(&self) -> u32 {
        self.device_count
    }

    // resolve handles one --gpu token: an index, a BDF or a UUID.
    pub fn resolve(&self, token: &str) -> CliResult<DeviceHandle> {
        let id = token.parse::<DeviceId>().map_err(|e| match e {
            DeviceIdError::Empty => CliError::MissingParameterValue("--gpu=".to_string()),
            DeviceIdError::Malformed(_) => CliError::InvalidParameterValue(token.to_string()),
        })?;
        if let DeviceId::Index(index) = id
            && index >= self.device_count
        {
            return Err(CliError::DeviceNotFound(token.to_string()));
        }
        self.lookup(&id, token)
    }

    // resolve_index resolves a numeric index that was already validated
    // as a number, reporting `label` when it is out of range.
    pub fn resolve_index(&self, index: u32, label: &str) -> CliResult<DeviceHandle> {
        if index >= self.device_count {
            return Err(CliError::DeviceNotFound(label.to_string()));
        }
        self.lookup(&DeviceId::Index(index), label)
    }

    // resolve_all returns one handle per device, in index order.
    pub fn resolve_all(&self) -> CliResult<Vec<DeviceHandle>> {
        (0..self.device_count)
            .map(|index| self.lookup(&DeviceId::Index(index), &index.to_string()))
            .collect()
    }

    // resolve_vf finds the VF named by a --vf identifier in the
    // library's VF inventory.
    pub fn resolve_vf(&self, vf_id: &str) -> CliResult<VfEntry> {
        let id = vf_id.parse::<VfId>().map_err(|e| match e {
            DeviceIdError::Empty => CliError::MissingParameterValue("--vf".to_string()),
            DeviceIdError::Malformed(_) => CliError::InvalidParameterValue(vf_id.to_string()),
        })?;
        let inventory = self.library.vf_inventory()?;
        if let Some(entry) = inventory.into_iter().find(|entry| entry.matches(&id)) {
            return Ok(entry);
        }
        if let VfId::Pair { gpu, .. } = &id
            && id.gpu_index().is_none_or(|index| index >= self.device_count)
        {
            return Err(CliError::DeviceNotFound(gpu.clone()));
        }
        Err(CliError::DeviceNotFound(vf_id.to_string()))
    }

    fn lookup(&self, id: &DeviceId, label: &str) -> CliResult<DeviceHandle> {
        self.library.resolve_device(id).map_err(|status| {
            if status.is_not_found() {
                CliError::DeviceNotFound(label.to_string())
            } else {
                CliError::VendorLibrary(status)
            }
        })
    }
}
