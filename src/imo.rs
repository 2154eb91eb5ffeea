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
IMO GFI scheme (MARPOL Annex VI mid-term measure)
=================================================

Combustion factor tables, the two annual GFI target trajectories (base and
direct compliance), and the two-tier remedial unit pricing.

The IMO measure has no jurisdiction split: every ton counts in full and no
fuel is exempt, so usage records book their whole amount as inside usage.
*/

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::factors::{build_reference_table, ReferenceTable};
use crate::schedule::{Band, Schedule};
use crate::types::{CombustionFactors, FuelFactor, FuelId, EMISSION_UNIT_SCALE, GWP100};

/// 2008 fleet average GHG fuel intensity the reductions apply to [gCO2eq/MJ]
pub const BASELINE: f32 = 93.3;

/// Remedial unit cost of a Tier 1 deficit [USD per tCO2eq]
pub const TIER1_USD_PER_TCO2EQ: f32 = 100.0;

/// Remedial unit cost of a Tier 2 deficit [USD per tCO2eq]
pub const TIER2_USD_PER_TCO2EQ: f32 = 380.0;

/// Raw combustion factors and WtT intensities of the pure fuels
pub const RAW_FACTORS: [(FuelId, CombustionFactors, f32); 7] = [
    (
        FuelId::Vlsfo,
        CombustionFactors {
            co2: 3.114,
            ch4: 0.00005,
            n2o: 0.00018,
            lcv: 0.0402,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        },
        16.8,
    ),
    (
        FuelId::Hsfo,
        CombustionFactors {
            co2: 3.114,
            ch4: 0.00005,
            n2o: 0.00018,
            lcv: 0.0402,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        },
        14.9,
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
        17.7,
    ),
    (
        FuelId::Lng,
        CombustionFactors {
            co2: 2.75,
            ch4: 0.0,
            n2o: 0.00011,
            lcv: 0.0480,
            slip: 0.0015,
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
            lcv: 0.0463,
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
            lcv: 0.0457,
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
            lcv: 0.0372,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        },
        20.8 - 2.834 / 0.0372,
    ),
];

const YEARS: [i32; 8] = [2028, 2029, 2030, 2031, 2032, 2033, 2034, 2035];
const BASE_REDUCTIONS: [f32; 8] = [0.04, 0.06, 0.08, 0.124, 0.168, 0.212, 0.256, 0.30];
const DIRECT_REDUCTIONS: [f32; 8] = [0.17, 0.19, 0.21, 0.254, 0.298, 0.342, 0.386, 0.43];

/// Reference factor table of the scheme, blends included
pub fn reference_table() -> Result<ReferenceTable> {
    build_reference_table(&RAW_FACTORS, &GWP100)
}

fn yearly_schedule(reductions: &[f32; 8]) -> Schedule {
    Schedule {
        baseline: BASELINE,
        bands: YEARS
            .iter()
            .zip(reductions.iter())
            .map(|(&year, &reduction)| Band::new(year, year, reduction))
            .collect(),
    }
}

/// Base GFI trajectory (Tier 2 threshold), 2028 through 2035
pub fn base_schedule() -> Schedule {
    yearly_schedule(&BASE_REDUCTIONS)
}

/// Direct-compliance GFI trajectory (Tier 1 threshold), 2028 through 2035
pub fn direct_schedule() -> Schedule {
    yearly_schedule(&DIRECT_REDUCTIONS)
}

/// Compliance tier against the two trajectories
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// Attained GFI below the direct-compliance target
    Surplus,
    /// Attained GFI between the direct-compliance and base targets
    Tier1,
    /// Attained GFI above the base target
    Tier2,
}

/// Tiered assessment of an attained GFI for one year
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierAssessment {
    /// Assessed year
    pub year: i32,
    /// Compliance tier
    pub tier: Tier,
    /// Base GFI target (Tier 2 threshold) [gCO2eq/MJ]
    pub base_target: f32,
    /// Direct-compliance GFI target (Tier 1 threshold) [gCO2eq/MJ]
    pub direct_target: f32,
    /// Tier 1 deficit [tCO2eq], 0 in surplus
    pub tier1_deficit: f32,
    /// Tier 2 deficit [tCO2eq], 0 unless in Tier 2
    pub tier2_deficit: f32,
    /// Surplus below the direct-compliance target [tCO2eq], 0 in deficit
    pub surplus: f32,
    /// Remedial cost [USD], 0 in surplus
    pub cost_usd: f32,
}

/// Assess an attained GFI against both trajectories for `year`
///
/// In Tier 2 the Tier 1 deficit spans the full band between the two
/// targets and the Tier 2 deficit is the excess above the base target,
/// each priced at its own rate. `None` for years without targets.
pub fn assess(avg_intensity: f32, total_energy: f32, year: i32) -> Option<TierAssessment> {
    let base_target = base_schedule().lookup(year)?;
    let direct_target = direct_schedule().lookup(year)?;
    let to_tco2eq = |delta: f32| delta * total_energy / EMISSION_UNIT_SCALE;

    let assessment = if avg_intensity >= base_target {
        let tier1_deficit = to_tco2eq(base_target - direct_target);
        let tier2_deficit = to_tco2eq(avg_intensity - base_target);
        TierAssessment {
            year,
            tier: Tier::Tier2,
            base_target,
            direct_target,
            tier1_deficit,
            tier2_deficit,
            surplus: 0.0,
            cost_usd: tier1_deficit * TIER1_USD_PER_TCO2EQ + tier2_deficit * TIER2_USD_PER_TCO2EQ,
        }
    } else if avg_intensity >= direct_target {
        let tier1_deficit = to_tco2eq(avg_intensity - direct_target);
        TierAssessment {
            year,
            tier: Tier::Tier1,
            base_target,
            direct_target,
            tier1_deficit,
            tier2_deficit: 0.0,
            surplus: 0.0,
            cost_usd: tier1_deficit * TIER1_USD_PER_TCO2EQ,
        }
    } else {
        TierAssessment {
            year,
            tier: Tier::Surplus,
            base_target,
            direct_target,
            tier1_deficit: 0.0,
            tier2_deficit: 0.0,
            surplus: to_tco2eq(direct_target - avg_intensity),
            cost_usd: 0.0,
        }
    };
    Some(assessment)
}

/// Tonnage of a clean fuel whose headroom under `target` offsets `deficit`
///
/// Zero when the fuel is not below the target.
pub fn offset_tonnage(deficit_tco2eq: f32, target: f32, fuel: &FuelFactor) -> f32 {
    let delta = target - fuel.wtw;
    if deficit_tco2eq > 0.0 && delta > 0.0 {
        deficit_tco2eq * EMISSION_UNIT_SCALE / delta / fuel.lcv
    } else {
        0.0
    }
}

/// Tonnage of a dirty fuel whose Tier 2 excess a `surplus` can absorb
///
/// Zero when the fuel is not above the base target.
pub fn absorb_tonnage(surplus_tco2eq: f32, base_target: f32, fuel: &FuelFactor) -> f32 {
    let delta = fuel.wtw - base_target;
    if surplus_tco2eq > 0.0 && delta > 0.0 {
        surplus_tco2eq * EMISSION_UNIT_SCALE / delta / fuel.lcv
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPROX: f32 = 1e-3;

    #[test]
    fn reference_values() {
        let table = reference_table().unwrap();
        let vlsfo = table.get(FuelId::Vlsfo).unwrap();
        assert_eq!(vlsfo.lcv, 40200.0);
        // 16.8 WtT + 78.82811 TtW
        assert!((vlsfo.wtw - 95.62811).abs() < APPROX, "got {}", vlsfo.wtw);
        let hsfo = table.get(FuelId::Hsfo).unwrap();
        assert!((hsfo.wtw - 93.72811).abs() < APPROX, "got {}", hsfo.wtw);
        let bio = table.get(FuelId::BioFame).unwrap();
        assert!((bio.wtw - 20.8).abs() < APPROX, "got {}", bio.wtw);
        let lng = table.get(FuelId::Lng).unwrap();
        // 18.5 WtT + 58.66887 TtW, methane slip included
        assert!((lng.wtw - 77.16887).abs() < APPROX, "got {}", lng.wtw);
        let lpg = table.get(FuelId::LpgPropane).unwrap();
        assert!((lpg.wtw - 73.78035).abs() < APPROX, "got {}", lpg.wtw);
    }

    #[test]
    fn trajectories() {
        let base = base_schedule();
        let direct = direct_schedule();
        base.validate().unwrap();
        direct.validate().unwrap();
        assert!((base.lookup(2028).unwrap() - 89.568).abs() < APPROX);
        assert!((direct.lookup(2028).unwrap() - 77.439).abs() < APPROX);
        assert!((base.lookup(2035).unwrap() - 65.31).abs() < APPROX);
        for year in 2028..=2035 {
            assert!(direct.lookup(year).unwrap() < base.lookup(year).unwrap());
        }
        assert_eq!(base.lookup(2027), None);
        assert_eq!(direct.lookup(2036), None);
    }

    #[test]
    fn tier_boundaries() {
        let energy = 1e6_f32;
        // above base target in 2028
        let t2 = assess(92.0, energy, 2028).unwrap();
        assert_eq!(t2.tier, Tier::Tier2);
        assert!((t2.tier1_deficit - (89.568 - 77.439)).abs() < APPROX);
        assert!((t2.tier2_deficit - (92.0 - 89.568)).abs() < APPROX);
        assert!(t2.cost_usd > 0.0);

        // between the trajectories
        let t1 = assess(80.0, energy, 2028).unwrap();
        assert_eq!(t1.tier, Tier::Tier1);
        assert!((t1.tier1_deficit - (80.0 - 77.439)).abs() < APPROX);
        assert_eq!(t1.tier2_deficit, 0.0);
        assert!((t1.cost_usd - t1.tier1_deficit * 100.0).abs() < APPROX);

        // below the direct trajectory
        let s = assess(60.0, energy, 2028).unwrap();
        assert_eq!(s.tier, Tier::Surplus);
        assert!((s.surplus - (77.439 - 60.0)).abs() < APPROX);
        assert_eq!(s.cost_usd, 0.0);

        // exactly on the base target counts as Tier 2
        let edge = assess(89.568, energy, 2028).unwrap();
        assert_eq!(edge.tier, Tier::Tier2);
        assert!(edge.tier2_deficit.abs() < APPROX);

        assert!(assess(90.0, energy, 2027).is_none());
    }

    #[test]
    fn offset_and_absorb() {
        let table = reference_table().unwrap();
        let bio = table.get(FuelId::BioFame).unwrap();
        let hsfo = table.get(FuelId::Hsfo).unwrap();
        let base = base_schedule().lookup(2028).unwrap();

        // 1 tCO2eq of deficit, bio headroom = base - 20.8
        let t = offset_tonnage(1.0, base, bio);
        let expected = 1e6 / ((base - bio.wtw) * bio.lcv);
        assert!((t - expected).abs() / expected < 1e-5);
        // a dirty fuel cannot offset
        assert_eq!(offset_tonnage(1.0, base, hsfo), 0.0);

        // surplus absorbs HSFO excess above the base target
        let t = absorb_tonnage(1.0, base, hsfo);
        let expected = 1e6 / ((hsfo.wtw - base) * hsfo.lcv);
        assert!((t - expected).abs() / expected < 1e-5);
        assert_eq!(absorb_tonnage(1.0, base, bio), 0.0);
    }
}
