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
Fuel usage lists
================

A usage list holds the fuel consumption records of a reporting period plus
metadata (`#META SCHEME: ...`, `#META YEAR: ...`).

Normalization expands blended fuels into their pure components and merges
records that share fuel and factors, so the compliance engine only ever
sees pure fuels with one row per (fuel, lcv, wtw) triple.
*/

use std::collections::HashMap;
use std::fmt;
use std::str;

use serde::{Deserialize, Serialize};

use crate::error::{GfiError, Result};
use crate::factors::ReferenceTable;
use crate::types::{FuelId, Meta, MetaVec, UsageRecord};

/// Fuel usage list with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    /// Metadata
    pub umeta: Vec<Meta>,
    /// Usage records
    pub udata: Vec<UsageRecord>,
}

impl Usage {
    /// Check the structural validity of records (no negative tonnages or factors)
    pub fn validate(&self) -> Result<()> {
        for record in &self.udata {
            if record.inside < 0.0 || record.outside < 0.0 {
                return Err(GfiError::WrongInput(format!(
                    "negative tonnage in record: {}",
                    record
                )));
            }
            if record.lcv <= 0.0 {
                return Err(GfiError::WrongInput(format!(
                    "non-positive calorific value in record: {}",
                    record
                )));
            }
            if record.wtw < 0.0 {
                return Err(GfiError::WrongInput(format!(
                    "negative intensity in record: {}",
                    record
                )));
            }
        }
        Ok(())
    }

    /// Expand blended fuels into their pure components
    ///
    /// Each component gets its pure-fuel reference factors and its mass
    /// share of the blend tonnage. Records keep their relative order,
    /// components replacing the blend in place. Pure-fuel records pass
    /// through unchanged, including overridden factors.
    pub fn expand_blends(&mut self, reference: &ReferenceTable) -> Result<()> {
        let mut expanded: Vec<UsageRecord> = Vec::with_capacity(self.udata.len());
        for record in &self.udata {
            match record.fuel.blend() {
                None => expanded.push(record.clone()),
                Some(blend) => {
                    let fossil = reference.get(blend.fossil)?;
                    let bio = reference.get(blend.bio)?;
                    let f = blend.fossil_fraction;
                    let b = blend.bio_fraction();
                    expanded.push(UsageRecord::new(
                        fossil.fuel,
                        fossil.lcv,
                        fossil.wtw,
                        record.inside * f,
                        record.outside * f,
                        record.comment.clone(),
                    ));
                    expanded.push(UsageRecord::new(
                        bio.fuel,
                        bio.lcv,
                        bio.wtw,
                        record.inside * b,
                        record.outside * b,
                        record.comment.clone(),
                    ));
                }
            }
        }
        self.udata = expanded;
        Ok(())
    }

    /// Merge records sharing fuel and factors, summing their tonnages
    ///
    /// First occurrence keeps its position and comment.
    pub fn merge(&mut self) {
        let mut merged: Vec<UsageRecord> = Vec::with_capacity(self.udata.len());
        let mut index: HashMap<(FuelId, u32, u32), usize> = HashMap::new();
        for record in &self.udata {
            let key = (record.fuel, record.lcv.to_bits(), record.wtw.to_bits());
            match index.get(&key) {
                Some(&i) => {
                    merged[i].inside += record.inside;
                    merged[i].outside += record.outside;
                }
                None => {
                    index.insert(key, merged.len());
                    merged.push(record.clone());
                }
            }
        }
        self.udata = merged;
    }

    /// Validate, expand blends and merge duplicates
    pub fn normalize(&mut self, reference: &ReferenceTable) -> Result<()> {
        self.validate()?;
        self.expand_blends(reference)?;
        self.merge();
        Ok(())
    }
}

impl MetaVec for Usage {
    fn get_metavec(&self) -> &Vec<Meta> {
        &self.umeta
    }
    fn get_mut_metavec(&mut self) -> &mut Vec<Meta> {
        &mut self.umeta
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metalines = self
            .umeta
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let datalines = self
            .udata
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        write!(f, "{}\n\n{}", metalines, datalines)
    }
}

impl str::FromStr for Usage {
    type Err = GfiError;

    fn from_str(s: &str) -> Result<Usage> {
        let lines: Vec<&str> = s.lines().map(str::trim).collect();
        let metalines = lines.iter().filter(|l| l.starts_with("#META"));
        let datalines = lines
            .iter()
            .filter(|l| !(l.starts_with('#') || l.is_empty()));
        let umeta = metalines
            .map(|l| l.parse())
            .collect::<Result<Vec<Meta>>>()?;
        let udata = datalines
            .map(|l| l.parse())
            .collect::<Result<Vec<UsageRecord>>>()?;
        Ok(Usage { umeta, udata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feum;
    use crate::types::FuelId;
    use pretty_assertions::assert_eq;

    const USAGEFILE: &str = "#META SCHEME: FEUM
#META YEAR: 2025

# main engine
VLSFO, 40500, 93.31868, 5000.00, 2000.00
B30(VLSFO), 39450, 69.77803, 1000.00, 0.00
LNG, 49100, 76.08074, 300.00, 100.00 # dual fuel
";

    #[test]
    fn parse_and_meta() {
        let usage: Usage = USAGEFILE.parse().unwrap();
        assert_eq!(usage.udata.len(), 3);
        assert_eq!(usage.get_meta("SCHEME").unwrap(), "FEUM");
        assert_eq!(usage.get_meta_i32("YEAR").unwrap(), 2025);
        assert_eq!(usage.udata[2].comment, "dual fuel");
    }

    #[test]
    fn blend_expansion_preserves_mass() {
        let reference = feum::reference_table().unwrap();
        let mut usage: Usage = "B24(HSFO), 39660, 72.66239, 1000.00, 500.00"
            .parse()
            .unwrap();
        usage.expand_blends(&reference).unwrap();
        assert_eq!(usage.udata.len(), 2);
        assert_eq!(usage.udata[0].fuel, FuelId::Hsfo);
        assert_eq!(usage.udata[1].fuel, FuelId::BioFame);
        assert!((usage.udata[0].inside - 760.0).abs() < 1e-3);
        assert!((usage.udata[1].inside - 240.0).abs() < 1e-3);
        let total: f32 = usage.udata.iter().map(|r| r.tonnage()).sum();
        assert!((total - 1500.0).abs() < 1e-3);
    }

    #[test]
    fn merge_sums_tonnages() {
        let mut usage: Usage = "HSFO, 40500, 94.81029, 100.00, 50.00
HSFO, 40500, 94.81029, 25.00, 25.00
HSFO, 40500, 90.00000, 10.00, 0.00"
            .parse()
            .unwrap();
        usage.merge();
        // overridden intensity stays a separate row
        assert_eq!(usage.udata.len(), 2);
        assert_eq!(usage.udata[0].inside, 125.0);
        assert_eq!(usage.udata[0].outside, 75.0);
    }

    #[test]
    fn negative_tonnage_rejected() {
        let usage: Usage = "VLSFO, 40500, 93.31868, -10.00, 0.00".parse().unwrap();
        assert!(usage.validate().is_err());
    }

    #[test]
    fn display_roundtrip() {
        let usage: Usage = USAGEFILE.parse().unwrap();
        let reparsed: Usage = usage.to_string().parse().unwrap();
        assert_eq!(usage, reparsed);
    }
}
