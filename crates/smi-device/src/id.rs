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

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

lazy_static! {
    static ref BDF_RE: Regex =
        Regex::new(r"^([0-9a-fA-F]{4}):([0-9a-fA-F]{2}):([0-9a-fA-F]{2})\.([0-9a-fA-F])$")
            .unwrap();
    static ref UUID_RE: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();
    static ref VF_PAIR_RE: Regex = Regex::new(r"^([0-9a-fA-F]+):([0-9a-fA-F]+)$").unwrap();
}

// DeviceIdError describes why a textual identifier was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceIdError {
    #[error("device identifier is empty")]
    Empty,

    #[error("malformed device identifier: {0}")]
    Malformed(String),
}

// DeviceIdResult is a result type alias for identifier parsing.
pub type DeviceIdResult<T> = Result<T, DeviceIdError>;

/// A PCI bus/device/function address in `DDDD:BB:DD.F` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bdf {
    pub domain: u16,
    pub bus: u8,
    pub device: u8,
    pub function: u8,
}

impl Bdf {
    pub fn new(domain: u16, bus: u8, device: u8, function: u8) -> Self {
        Self {
            domain,
            bus,
            device,
            function,
        }
    }

    // as_u64 packs the address the way the vendor library encodes it.
    pub fn as_u64(&self) -> u64 {
        u64::from(self.function)
            | (u64::from(self.device) << 3)
            | (u64::from(self.bus) << 8)
            | (u64::from(self.domain) << 16)
    }

    // compact returns the address with every separator removed, lowercased.
    pub fn compact(&self) -> String {
        format!(
            "{:04x}{:02x}{:02x}{:x}",
            self.domain, self.bus, self.device, self.function
        )
    }
}

impl fmt::Display for Bdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:02x}:{:02x}.{:x}",
            self.domain, self.bus, self.device, self.function
        )
    }
}

impl FromStr for Bdf {
    type Err = DeviceIdError;

    fn from_str(s: &str) -> DeviceIdResult<Self> {
        if s.is_empty() {
            return Err(DeviceIdError::Empty);
        }
        let malformed = || DeviceIdError::Malformed(s.to_string());
        let caps = BDF_RE.captures(s).ok_or_else(malformed)?;
        let domain = u16::from_str_radix(&caps[1], 16).map_err(|_| malformed())?;
        let bus = u8::from_str_radix(&caps[2], 16).map_err(|_| malformed())?;
        let device = u8::from_str_radix(&caps[3], 16).map_err(|_| malformed())?;
        let function = u8::from_str_radix(&caps[4], 16).map_err(|_| malformed())?;
        if device > 0x1f || function > 7 {
            return Err(malformed());
        }
        Ok(Self::new(domain, bus, device, function))
    }
}

impl TryFrom<String> for Bdf {
    type Error = DeviceIdError;

    fn try_from(value: String) -> DeviceIdResult<Self> {
        value.parse()
    }
}

impl From<Bdf> for String {
    fn from(bdf: Bdf) -> Self {
        bdf.to_string()
    }
}

fn parse_uuid(s: &str) -> Option<Uuid> {
    if !UUID_RE.is_match(s) {
        return None;
    }
    Uuid::parse_str(s).ok()
}

/// DeviceId is one GPU token as typed after `--gpu=` or `-g=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceId {
    /// Zero-based position in the library's device order.
    Index(u32),
    Bdf(Bdf),
    Uuid(Uuid),
}

impl FromStr for DeviceId {
    type Err = DeviceIdError;

    fn from_str(s: &str) -> DeviceIdResult<Self> {
        if s.is_empty() {
            return Err(DeviceIdError::Empty);
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<u32>()
                .map(DeviceId::Index)
                .map_err(|_| DeviceIdError::Malformed(s.to_string()));
        }
        if BDF_RE.is_match(s) {
            return s.parse::<Bdf>().map(DeviceId::Bdf);
        }
        parse_uuid(s)
            .map(DeviceId::Uuid)
            .ok_or_else(|| DeviceIdError::Malformed(s.to_string()))
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceId::Index(index) => write!(f, "{index}"),
            DeviceId::Bdf(bdf) => write!(f, "{bdf}"),
            DeviceId::Uuid(uuid) => write!(f, "{uuid}"),
        }
    }
}

/// VfId is the identifier given to `--vf=`: a VF BDF, a VF UUID, or a
/// `gpu:vf` index pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VfId {
    Bdf(Bdf),
    Uuid(Uuid),
    Pair { gpu: String, vf: String },
}

impl VfId {
    // gpu_index returns the GPU half of a pair identifier as a number.
    pub fn gpu_index(&self) -> Option<u32> {
        match self {
            VfId::Pair { gpu, .. } => gpu.parse().ok(),
            _ => None,
        }
    }
}

impl FromStr for VfId {
    type Err = DeviceIdError;

    fn from_str(s: &str) -> DeviceIdResult<Self> {
        if s.is_empty() {
            return Err(DeviceIdError::Empty);
        }
        if BDF_RE.is_match(s) {
            return s.parse::<Bdf>().map(VfId::Bdf);
        }
        if let Some(uuid) = parse_uuid(s) {
            return Ok(VfId::Uuid(uuid));
        }
        if let Some(caps) = VF_PAIR_RE.captures(s) {
            return Ok(VfId::Pair {
                gpu: caps[1].to_string(),
                vf: caps[2].to_string(),
            });
        }
        Err(DeviceIdError::Malformed(s.to_string()))
    }
}

impl fmt::Display for VfId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfId::Bdf(bdf) => write!(f, "{bdf}"),
            VfId::Uuid(uuid) => write!(f, "{uuid}"),
            VfId::Pair { gpu, vf } => write!(f, "{gpu}:{vf}"),
        }
    }
}
