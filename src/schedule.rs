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
Reduction schedules
===================

Year-banded GHG intensity targets expressed as fractional reductions
over a scheme baseline.
*/

use serde::{Deserialize, Serialize};

use crate::error::{GfiError, Result};

/// An inclusive range of years sharing a reduction factor
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// First year of the band
    pub first_year: i32,
    /// Last year of the band (inclusive)
    pub last_year: i32,
    /// Fractional reduction over the baseline, in [0, 1]
    pub reduction: f32,
}

impl Band {
    /// Band constructor
    pub const fn new(first_year: i32, last_year: i32, reduction: f32) -> Self {
        Self {
            first_year,
            last_year,
            reduction,
        }
    }
}

/// A scheme reduction schedule: baseline intensity plus year bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Reference GHG intensity the reductions apply to [gCO2eq/MJ]
    pub baseline: f32,
    /// Year bands, ordered by year
    pub bands: Vec<Band>,
}

impl Schedule {
    /// Target GHG intensity for `year` [gCO2eq/MJ]
    ///
    /// Returns `None` for years not covered by any band. Years before the
    /// scheme starts or past its defined horizon are not an error, they
    /// simply have no target.
    pub fn lookup(&self, year: i32) -> Option<f32> {
        self.bands
            .iter()
            .find(|b| year >= b.first_year && year <= b.last_year)
            .map(|b| self.baseline * (1.0 - b.reduction))
    }

    /// Check that bands are ordered, contiguous and non-overlapping
    pub fn validate(&self) -> Result<()> {
        if self.baseline <= 0.0 {
            return Err(GfiError::BadConfig(format!(
                "non-positive baseline intensity {}",
                self.baseline
            )));
        }
        for band in &self.bands {
            if band.first_year > band.last_year {
                return Err(GfiError::BadConfig(format!(
                    "band {}-{} ends before it starts",
                    band.first_year, band.last_year
                )));
            }
        }
        for pair in self.bands.windows(2) {
            if pair[1].first_year != pair[0].last_year + 1 {
                return Err(GfiError::BadConfig(format!(
                    "gap or overlap between bands {}-{} and {}-{}",
                    pair[0].first_year, pair[0].last_year, pair[1].first_year, pair[1].last_year
                )));
            }
        }
        Ok(())
    }
}
