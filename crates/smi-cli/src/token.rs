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

// Token is one command line word split at its first '='.
// "--gpu=0" has key "--gpu" and value Some("0"); "--gpu=" has value
// Some(""); "--power" has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub raw: String,
    pub key: String,
    pub value: Option<String>,
}

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (key, value) = match raw.split_once('=') {
            Some((key, value)) => (key.to_string(), Some(value.to_string())),
            None => (raw.clone(), None),
        };
        Self { raw, key, value }
    }

    // option_name is the key without its leading dashes.
    pub fn option_name(&self) -> &str {
        self.key
            .strip_prefix("--")
            .or_else(|| self.key.strip_prefix('-'))
            .unwrap_or(&self.key)
    }

    // value_str returns the value, treating an absent value as empty.
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    pub fn is_help(&self) -> bool {
        self.raw == "--help" || self.raw == "-h"
    }

    pub fn is_output_format(&self) -> bool {
        self.raw == "--json" || self.raw == "--csv"
    }
}

// tokenize splits every argument into a Token, preserving order.
pub fn tokenize<I, S>(args: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().map(|arg| Token::new(arg.as_ref())).collect()
}
