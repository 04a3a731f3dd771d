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

use thiserror::Error;

// GENERIC_MESSAGE is used for status codes missing from the table.
const GENERIC_MESSAGE: &str = "Unknown SMI-LIB status";

/// LibraryStatus is a non-success status code returned by the vendor
/// library. Success is modeled as `Ok` and never wrapped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[error("SMI-LIB status {code}: {}", self.message_or_generic())]
pub struct LibraryStatus {
    code: i32,
}

impl LibraryStatus {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_PARAMETERS: i32 = 1;
    pub const NOT_SUPPORTED: i32 = 2;
    pub const NOT_YET_IMPLEMENTED: i32 = 3;
    pub const API_FAILED: i32 = 7;
    pub const NO_PERMISSION: i32 = 10;
    pub const IO: i32 = 12;
    pub const FILE_ERROR: i32 = 14;
    pub const OUT_OF_RESOURCES: i32 = 15;
    pub const BUSY: i32 = 30;
    pub const NOT_FOUND: i32 = 31;
    pub const NOT_INITIALIZED: i32 = 32;
    pub const NO_DATA: i32 = 40;
    pub const MAP_ERROR: i32 = -2;
    pub const UNKNOWN_ERROR: i32 = -1;

    pub fn new(code: i32) -> Self {
        Self { code }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    // message returns the table text for the code, if there is one.
    pub fn message(&self) -> Option<&'static str> {
        message_for(self.code)
    }

    pub fn message_or_generic(&self) -> &'static str {
        self.message().unwrap_or(GENERIC_MESSAGE)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Self::NOT_FOUND
    }

    pub fn is_not_supported(&self) -> bool {
        self.code == Self::NOT_SUPPORTED
    }
}

impl From<i32> for LibraryStatus {
    fn from(code: i32) -> Self {
        Self::new(code)
    }
}

// message_for is the vendor status message table.
pub fn message_for(code: i32) -> Option<&'static str> {
    let message = match code {
        0 => "Success",
        1 => "Invalid parameters",
        2 => "Command not supported",
        3 => "Not implemented yet",
        4 => "Fail to load lib",
        5 => "Fail to load symbol",
        6 => "Error when call libdrm",
        7 => "API call failed",
        8 => "Timeout in API call",
        9 => "Retry operation",
        10 => "Permission Denied",
        11 => "An interrupt occurred during execution of function",
        12 => "I/O Error",
        13 => "Bad address",
        14 => "Problem accessing a file",
        15 => "Not enough memory",
        16 => "An internal exception was caught",
        17 => "The provided input is out of allowable or safe range",
        18 => "An error occurred when initializing internal data structures",
        19 => "An internal reference counter exceeded INT32_MAX",
        30 => "Device busy",
        31 => "Device Not found",
        32 => "Device not initialized",
        33 => "No slot available",
        40 => "No data was found for a given input",
        41 => "Not enough resources were available for the operation",
        42 => "An unexpected amount of data was read",
        43 => "The data read or provided to function is not what was expected",
        -2 => "The internal library error did not map to a status code",
        -1 => "An unknown error occurred",
        _ => return None,
    };
    Some(message)
}

// LibraryResult is a result type alias for device library calls.
pub type LibraryResult<T> = Result<T, LibraryStatus>;
