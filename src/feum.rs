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
FuelEU Maritime scheme (Regulation (EU) 2023/1805)
==================================================

Combustion factor tables, well-to-tank intensities and the reduction
schedule of the FuelEU Maritime measure.

LNG and pure biodiesel count their outside-EU energy in full; every other
fuel counts it at 50%.
*/

use crate::balance::PENALTY_EUR_PER_VLSFOEQ_TON;
use crate::error::Result;
use crate::factors::{build_reference_table, ReferenceTable};
use crate::schedule::{Band, Schedule};
use crate::types::{CombustionFactors, FuelId, EMISSION_UNIT_SCALE, GWP100};

/// 2020 fleet average GHG intensity the reductions apply to [gCO2eq/MJ]
pub const BASELINE: f32 = 91.16;

/// Raw combustion factors and WtT intensities of the pure fuels
///
/// Values follow Annex I/II of the regulation. Biodiesel WtT is stated so
/// that its well-to-wake intensity lands on the certified 14.6 gCO2eq/MJ.
pub const RAW_FACTORS: [(FuelId, CombustionFactors, f32); 7] = [
    (
        FuelId::Vlsfo,
        CombustionFactors {
            co2: 3.114,
            ch4: 0.00005,
            n2o: 0.00018,
            lcv: 0.0405,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        },
        13.5,
    ),
    (
        FuelId::Hsfo,
        CombustionFactors {
            co2: 3.114,
            ch4: 0.00005,
            n2o: 0.00018,
            lcv: 0.0405,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        },
        13.5,
    ),
    (
        FuelId::Lsmgo,
        CombustionFactors {
            co2: 3.206,
            ch4: 0.00005,
            n2o: 0.00018,
            lcv: 0.0427,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        },
        14.4,
    ),
    (
        FuelId::Lng,
        CombustionFactors {
            co2: 2.75,
            ch4: 0.0,
            n2o: 0.00011,
            lcv: 0.0491,
            slip: 0.002,
            co2_slip: 0.0,
            ch4_slip: 1.0,
            n2o_slip: 0.0,
        },
        18.5,
    ),
    (
        FuelId::LpgPropane,
        CombustionFactors {
            co2: 3.0,
            ch4: 0.00005,
            n2o: 0.00018,
            lcv: 0.0460,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        },
        7.8,
    ),
    (
        FuelId::LpgButane,
        CombustionFactors {
            co2: 3.03,
            ch4: 0.00005,
            n2o: 0.00018,
            lcv: 0.0460,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        },
        7.8,
    ),
    (
        FuelId::BioFame,
        CombustionFactors {
            co2: 2.834,
            ch4: 0.0,
            n2o: 0.0,
            lcv: 0.0370,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        },
        14.6 - 2.834 / 0.037,
    ),
];

/// Reference factor table of the scheme, blends included
pub fn reference_table() -> Result<ReferenceTable> {
    build_reference_table(&RAW_FACTORS, &GWP100)
}

/// Does the fuel count its outside-EU energy in full?
pub fn is_full_credit(fuel: FuelId) -> bool {
    fuel == FuelId::Lng || fuel == FuelId::BioFame
}

/// Reduction schedule (Article 4), 2025 through 2050
pub fn schedule() -> Schedule {
    Schedule {
        baseline: BASELINE,
        bands: vec![
            Band::new(2025, 2029, 0.02),
            Band::new(2030, 2034, 0.06),
            Band::new(2035, 2039, 0.145),
            Band::new(2040, 2044, 0.31),
            Band::new(2045, 2049, 0.62),
            Band::new(2050, 2050, 0.80),
        ],
    }
}

/// Target GHG intensity for `year`, `None` outside the scheme horizon
pub fn standard_for(year: i32) -> Option<f32> {
    schedule().lookup(year)
}

/// Market value of one ton of VLSFO surplus headroom [EUR]
///
/// Each ton burned above the target emits `(wtw - standard) * lcv` gCO2eq
/// in excess; pooled headroom is priced at the penalty rate per excess
/// tCO2eq. Zero when VLSFO is already below the target or the year has no
/// target.
pub fn vlsfo_surplus_value_per_ton(reference: &ReferenceTable, year: i32) -> Result<f32> {
    let vlsfo = reference.get(FuelId::Vlsfo)?;
    let standard = match standard_for(year) {
        Some(s) => s,
        None => return Ok(0.0),
    };
    if vlsfo.wtw <= standard {
        return Ok(0.0);
    }
    let excess_tco2eq = (vlsfo.wtw - standard) * vlsfo.lcv / EMISSION_UNIT_SCALE;
    Ok(excess_tco2eq * PENALTY_EUR_PER_VLSFOEQ_TON)
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPROX: f32 = 1e-3;

    #[test]
    fn reference_values() {
        let table = reference_table().unwrap();
        let vlsfo = table.get(FuelId::Vlsfo).unwrap();
        assert_eq!(vlsfo.lcv, 40500.0);
        // 13.5 WtT + 78.2442 TtW
        assert!((vlsfo.wtw - 91.7442).abs() < APPROX, "got {}", vlsfo.wtw);
        let bio = table.get(FuelId::BioFame).unwrap();
        assert!((bio.wtw - 14.6).abs() < APPROX, "got {}", bio.wtw);
        let lng = table.get(FuelId::Lng).unwrap();
        // 18.5 WtT + 57.58074 TtW, methane slip included
        assert!((lng.wtw - 76.08074).abs() < APPROX, "got {}", lng.wtw);
        let lpg = table.get(FuelId::LpgPropane).unwrap();
        assert!((lpg.wtw - 74.21065).abs() < APPROX, "got {}", lpg.wtw);
    }

    #[test]
    fn full_credit_fuels() {
        assert!(is_full_credit(FuelId::Lng));
        assert!(is_full_credit(FuelId::BioFame));
        assert!(!is_full_credit(FuelId::B30Vlsfo));
        assert!(!is_full_credit(FuelId::Vlsfo));
    }

    #[test]
    fn schedule_targets() {
        let schedule = schedule();
        schedule.validate().unwrap();
        assert!((schedule.lookup(2025).unwrap() - 89.3368).abs() < APPROX);
        assert!((schedule.lookup(2031).unwrap() - 85.6904).abs() < APPROX);
        assert!((schedule.lookup(2050).unwrap() - 18.232).abs() < APPROX);
        assert_eq!(schedule.lookup(2024), None);
        assert_eq!(schedule.lookup(2051), None);
    }

    #[test]
    fn surplus_value_positive_once_target_bites() {
        let table = reference_table().unwrap();
        // VLSFO 91.74445 is above the 2025 target of 89.3368
        let value = vlsfo_surplus_value_per_ton(&table, 2025).unwrap();
        assert!(value > 0.0);
        // and far below the 2020 pre-scheme era
        assert_eq!(vlsfo_surplus_value_per_ton(&table, 2020).unwrap(), 0.0);
    }
}
