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

use mockall::automock;

use crate::handle::{DeviceHandle, VfEntry};
use crate::id::DeviceId;
use crate::status::LibraryResult;

/// DeviceLibrary is the slice of the vendor library the command line
/// front end needs: counting GPUs, resolving one identifier, and
/// listing virtual functions.
#[automock]
pub trait DeviceLibrary {
    /// Number of GPUs visible to the library.
    fn device_count(&self) -> LibraryResult<u32>;

    /// Resolves an identifier to a handle. An unknown device reports
    /// the NOT_FOUND status.
    fn resolve_device(&self, id: &DeviceId) -> LibraryResult<DeviceHandle>;

    /// Every virtual function the library knows about.
    fn vf_inventory(&self) -> LibraryResult<Vec<VfEntry>>;
}
