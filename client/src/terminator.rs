//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Terminators for terminated reads

use crate::Result;
use regex::Regex;
use std::fmt;

/// Condition that ends a terminated read
#[derive(Clone, Debug)]
pub enum Terminator {
    /// Satisfied once the collected text contains this string
    Literal(String),
    /// Satisfied once the collected text matches this pattern
    Pattern(Regex),
}

impl Terminator {
    /// Compile `pattern` into a pattern terminator.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Terminator::Pattern(Regex::new(pattern)?))
    }

    pub fn is_satisfied(&self, text: &str) -> bool {
        match self {
            Terminator::Literal(literal) => text.contains(literal.as_str()),
            Terminator::Pattern(regex) => regex.is_match(text),
        }
    }
}

impl From<&str> for Terminator {
    fn from(literal: &str) -> Self {
        Terminator::Literal(literal.to_string())
    }
}

impl From<String> for Terminator {
    fn from(literal: String) -> Self {
        Terminator::Literal(literal)
    }
}

impl From<Regex> for Terminator {
    fn from(regex: Regex) -> Self {
        Terminator::Pattern(regex)
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Literal(literal) => write!(f, "{literal:?}"),
            Terminator::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}
