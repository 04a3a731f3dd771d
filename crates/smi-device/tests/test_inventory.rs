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

use std::collections::HashSet;
use std::io::Write;

use smi_device::{
    Bdf, DeviceId, DeviceLibrary, Inventory, InventoryError, LibraryStatus, StaticLibrary,
};
use uuid::Uuid;

const INVENTORY: &str = r#"
[[gpus]]
bdf = "0000:03:00.0"
uuid = "3cff74a1-0000-1000-80e9-2d0b1e5a1f33"

[[gpus]]
bdf = "0000:83:00.0"

[[vfs]]
gpu = 0
vf = 0
bdf = "0000:03:02.0"
"#;

#[test]
fn test_inventory_from_toml() {
    let inventory = Inventory::from_toml(INVENTORY).unwrap();
    assert_eq!(inventory.gpus.len(), 2);
    assert_eq!(inventory.gpus[1].bdf, Bdf::new(0, 0x83, 0, 0));
    assert!(inventory.gpus[1].uuid.is_none());
    assert_eq!(inventory.vfs[0].id(), "0:0");
}

#[test]
fn test_inventory_rejects_bad_bdf() {
    let result = Inventory::from_toml("[[gpus]]\nbdf = \"zz\"\n");
    assert!(matches!(result, Err(InventoryError::Parse(_))));
}

#[test]
fn test_inventory_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(INVENTORY.as_bytes()).unwrap();
    let library = StaticLibrary::from_file(file.path()).unwrap();
    assert_eq!(library.device_count().unwrap(), 2);
}

#[test]
fn test_inventory_missing_file() {
    let result = StaticLibrary::from_file("/nonexistent/inventory.toml");
    assert!(matches!(result, Err(InventoryError::Io(_))));
}

#[test]
fn test_resolve_by_each_identifier() {
    let library = StaticLibrary::new(Inventory::from_toml(INVENTORY).unwrap());

    let by_index = library.resolve_device(&DeviceId::Index(1)).unwrap();
    assert_eq!(by_index.bdf, Bdf::new(0, 0x83, 0, 0));

    let by_bdf = library
        .resolve_device(&DeviceId::Bdf(Bdf::new(0, 0x83, 0, 0)))
        .unwrap();
    assert_eq!(by_bdf.index, 1);

    let uuid = Uuid::parse_str("3cff74a1-0000-1000-80e9-2d0b1e5a1f33").unwrap();
    let by_uuid = library.resolve_device(&DeviceId::Uuid(uuid)).unwrap();
    assert_eq!(by_uuid.index, 0);
}

#[test]
fn test_resolve_unknown_is_not_found() {
    let library = StaticLibrary::synthetic(2);
    let status = library
        .resolve_device(&DeviceId::Bdf(Bdf::new(0, 0x40, 0, 0)))
        .unwrap_err();
    assert!(status.is_not_found());
    assert_eq!(status.code(), LibraryStatus::NOT_FOUND);
}

#[test]
fn test_synthetic_with_virtual_functions() {
    let library = StaticLibrary::synthetic(2).with_virtual_functions(3);
    let vfs = library.vf_inventory().unwrap();
    assert_eq!(vfs.len(), 6);
    assert_eq!(vfs[4].id(), "1:1");
    assert_eq!(vfs[4].bdf, Bdf::new(0, 2, 2, 1));
}

#[test]
fn test_synthetic_bdfs_stay_distinct_past_one_bus_range() {
    let library = StaticLibrary::synthetic(300);
    let gpus = &library.inventory().gpus;
    assert_eq!(gpus.len(), 300);
    assert_eq!(gpus[254].bdf, Bdf::new(0, 0xff, 0, 0));
    assert_eq!(gpus[255].bdf, Bdf::new(1, 0, 0, 0));

    let distinct: HashSet<Bdf> = gpus.iter().map(|gpu| gpu.bdf).collect();
    assert_eq!(distinct.len(), 300);
}
