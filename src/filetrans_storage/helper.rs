// Copyright 2024 Vincent Chan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Permissive conversions used when translating loosely typed input,
//! e.g. option values that arrive as strings from a query string.
//!
//! None of these functions fail: anything that cannot be converted
//! degrades to a zero value.

use bson::Bson;

/// Render a value as text.
///
/// Doubles are printed in their shortest exact decimal form, so `1.50`
/// becomes `"1.5"` and large values never switch to exponent notation.
/// Strings are returned as is.
pub fn to_string(value: &Bson) -> String {
    match value {
        Bson::Double(f) => f.to_string(),
        Bson::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

/// Convert a value to `i64`, returning 0 when it is not convertible.
///
/// Strings are parsed as base-10 integers, doubles are truncated toward
/// zero (NaN gives 0, out of range values saturate).
pub fn to_int(value: &Bson) -> i64 {
    match value {
        Bson::String(s) => s.parse::<i64>().unwrap_or(0),
        Bson::Double(f) => *f as i64,
        Bson::Int32(i) => *i as i64,
        Bson::Int64(i) => *i,
        _ => 0,
    }
}
