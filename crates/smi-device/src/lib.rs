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

// handle module defines resolved GPU and VF handles.
pub mod handle;
// id module parses the textual device identifiers (index, BDF, UUID, VF pair).
pub mod id;
// inventory module is the in-memory device library, loadable from TOML.
pub mod inventory;
// library module defines the DeviceLibrary collaborator trait.
pub mod library;
// status module holds vendor status codes and their message table.
pub mod status;
// sysfs module is the device library backed by /sys/bus/pci/devices.
pub mod sysfs;

pub use handle::{DeviceHandle, VfEntry};
pub use id::{Bdf, DeviceId, DeviceIdError, VfId};
pub use inventory::{Inventory, InventoryError, StaticLibrary};
pub use library::DeviceLibrary;
pub use status::{LibraryResult, LibraryStatus};
pub use sysfs::{PhysicalFunction, SysfsLibrary};
