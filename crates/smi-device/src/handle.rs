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

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::{Bdf, VfId};

// DeviceHandle is a GPU resolved by the device library. The index
// is the position in the library's enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceHandle {
    pub index: u32,
    pub bdf: Bdf,
    // uuid is absent when the backend has no way of reading it.
    pub uuid: Option<Uuid>,
}

impl DeviceHandle {
    pub fn new(index: u32, bdf: Bdf, uuid: Option<Uuid>) -> Self {
        Self { index, bdf, uuid }
    }
}

// VfEntry is one virtual function in the library's VF tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VfEntry {
    // gpu is the index of the owning physical GPU.
    pub gpu: u32,
    // vf is the index of the function under that GPU.
    pub vf: u32,
    pub bdf: Bdf,
    #[serde(default)]
    pub uuid: Option<Uuid>,
}

impl VfEntry {
    // id returns the `gpu:vf` identifier of the entry.
    pub fn id(&self) -> String {
        format!("{}:{}", self.gpu, self.vf)
    }

    // matches reports whether a --vf identifier names this entry.
    // BDFs compare with separators ignored.
    pub fn matches(&self, id: &VfId) -> bool {
        match id {
            VfId::Bdf(bdf) => bdf.compact() == self.bdf.compact(),
            VfId::Uuid(uuid) => self.uuid.as_ref() == Some(uuid),
            VfId::Pair { .. } => id.to_string().eq_ignore_ascii_case(&self.id()),
        }
    }
}
