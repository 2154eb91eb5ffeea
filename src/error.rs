// Copyright (c) 2025 Jihoon Kim

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

/*!
Error type for fuel compliance computations
===========================================

A year outside the coverage of a target schedule is *not* an error
(`Schedule::lookup` returns `None` for it), and solver edge cases with zero
or ill-signed denominators resolve locally to a zero tonnage. Everything
else surfaces as a `GfiError`.
*/

use std::fmt;

/// Error raised while parsing, validating or evaluating fuel usage data
#[derive(Debug)]
pub enum GfiError {
    /// Could not parse a data or metadata line
    ParseError(String),
    /// Fuel identifier not part of the recognized fuel list
    FuelUnknown(String),
    /// Invalid user input (negative tonnage or factor, empty usage list)
    WrongInput(String),
    /// Invalid reference configuration (negative slip, bad blend ratio, duplicate fuel)
    BadConfig(String),
    /// No factor available in the reference table for a fuel
    MissingFactor(String),
}

impl fmt::Display for GfiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GfiError::ParseError(data) => write!(f, "Could not parse data: \"{}\"", data),
            GfiError::FuelUnknown(fuel) => write!(f, "Unknown fuel: \"{}\"", fuel),
            GfiError::WrongInput(desc) => write!(f, "Invalid input: {}", desc),
            GfiError::BadConfig(desc) => write!(f, "Invalid configuration: {}", desc),
            GfiError::MissingFactor(fuel) => write!(f, "Missing fuel factor: {}", fuel),
        }
    }
}

impl std::error::Error for GfiError {}

impl From<std::num::ParseFloatError> for GfiError {
    fn from(err: std::num::ParseFloatError) -> Self {
        GfiError::ParseError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for GfiError {
    fn from(err: std::num::ParseIntError) -> Self {
        GfiError::ParseError(err.to_string())
    }
}

/// Result type alias using [`GfiError`]
pub type Result<T> = std::result::Result<T, GfiError>;
