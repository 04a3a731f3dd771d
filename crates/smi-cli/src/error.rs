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

use smi_device::LibraryStatus;
use thiserror::Error;
use tracing::warn;

use crate::request::CommandRequest;

// Vendor statuses with a dedicated translation at the library boundary.
const STATUS_NOT_SUPPORTED: i32 = 2;
const STATUS_PARAMETER_NOT_SUPPORTED: i32 = -101;
const STATUS_COMMAND_NOT_SUPPORTED: i32 = -103;
const STATUS_INVALID_PARAMETER_VALUE: i32 = -104;

// CliError is every failure the command line reports to the user.
// Each variant has a fixed numeric code, see CliError::code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("Command '{0}' is invalid. Run 'help' for more info.")]
    InvalidCommand(String),

    #[error("Parameter '{0}' is invalid. Run 'help' for more info.")]
    InvalidParameter(String),

    #[error("Can not find a device with the corresponding identifier: '{0}'")]
    DeviceNotFound(String),

    #[error("Path '{0}' cannot be found.")]
    InvalidFilePath(String),

    #[error("Value '{0}' is not of valid type or format. Run 'help' for more info.")]
    InvalidParameterValue(String),

    #[error("Parameter '{0}' requires a value. Run 'help' for more info.")]
    MissingParameterValue(String),

    #[error("Command '{0}' is not supported on the system. Run 'help' for more info.")]
    CommandNotSupported(String),

    #[error("Parameter '{0}' is not supported on the system. Run 'help' for more info.")]
    ParameterNotSupported(String),

    #[error("Command '{0}' requires a target argument. Run '--help' for more info.")]
    RequiredCommand(String),

    #[error("An unknown error occurred: '{0}'.")]
    UnknownError(String),

    #[error("Not enough memory.")]
    NotEnoughMemory,

    #[error("SMI-LIB has returned error {} - {}.", -1000 - .0.code(), .0.message_or_generic())]
    VendorLibrary(LibraryStatus),
}

impl CliError {
    // code returns the process-visible error code.
    pub fn code(&self) -> i32 {
        match self {
            CliError::InvalidCommand(_) => -1,
            CliError::InvalidParameter(_) => -2,
            CliError::DeviceNotFound(_) => -3,
            CliError::InvalidFilePath(_) => -4,
            CliError::InvalidParameterValue(_) => -5,
            CliError::MissingParameterValue(_) => -6,
            CliError::CommandNotSupported(_) => -7,
            CliError::ParameterNotSupported(_) => -8,
            CliError::RequiredCommand(_) => -9,
            CliError::UnknownError(_) => -100,
            CliError::NotEnoughMemory => -101,
            CliError::VendorLibrary(status) => -1000 - status.code(),
        }
    }
}

impl From<LibraryStatus> for CliError {
    fn from(status: LibraryStatus) -> Self {
        CliError::VendorLibrary(status)
    }
}

// CliResult is a result type alias for operations that
// can fail with CliError.
pub type CliResult<T> = Result<T, CliError>;

// StatusOutcome is what a non-failing vendor status means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    // Completed means the call succeeded and its data is usable.
    Completed,
    // Unsupported means the feature is missing but the request asked for
    // everything, so the field is skipped instead of failing.
    Unsupported,
}

// check_library_status translates a raw vendor status returned while
// serving `param` for `request`.
pub fn check_library_status(
    status: i32,
    param: &str,
    request: &CommandRequest,
) -> CliResult<StatusOutcome> {
    match status {
        LibraryStatus::SUCCESS => Ok(StatusOutcome::Completed),
        STATUS_PARAMETER_NOT_SUPPORTED | STATUS_NOT_SUPPORTED => {
            if request.all_arguments() {
                Ok(StatusOutcome::Unsupported)
            } else {
                Err(CliError::ParameterNotSupported(param.to_string()))
            }
        }
        STATUS_COMMAND_NOT_SUPPORTED => Err(CliError::CommandNotSupported(param.to_string())),
        STATUS_INVALID_PARAMETER_VALUE => {
            Err(CliError::InvalidParameterValue(param.to_string()))
        }
        other => {
            let status = LibraryStatus::new(other);
            warn!(param, code = other, "vendor library call failed");
            Err(CliError::VendorLibrary(status))
        }
    }
}
