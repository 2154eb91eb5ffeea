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
Fuel reference factors
======================

Derivation of per-fuel reference factors (calorific value, well-to-wake
intensity) from raw combustion factor tables and well-to-tank intensities.

Intensities are rounded to 5 decimals so that published regulatory values
can be reproduced exactly and the tables round-trip through text formats.
*/

use serde::{Deserialize, Serialize};

use crate::error::{GfiError, Result};
use crate::types::{CombustionFactors, FuelFactor, FuelId, Gwp, EMISSION_UNIT_SCALE};

/// Round an intensity to 5 decimal places
#[inline]
pub(crate) fn round5(value: f32) -> f32 {
    (value * 1e5).round() / 1e5
}

/// Tank-to-wake GHG intensity of burning a fuel [gCO2eq/MJ]
///
/// Accounts for the slipped (unburned) fuel fraction: the slipped mass
/// emits its own gases while the intensity stays referred to the nominal
/// calorific value of the bunkered fuel.
pub fn combustion_intensity(factors: &CombustionFactors, gwp: &Gwp) -> Result<f32> {
    if factors.slip < 0.0 {
        return Err(GfiError::BadConfig(format!(
            "negative slip fraction {}",
            factors.slip
        )));
    }
    if factors.lcv <= 0.0 {
        return Err(GfiError::BadConfig(format!(
            "non-positive calorific value {}",
            factors.lcv
        )));
    }
    let burned = 1.0 - factors.slip;
    let emission = burned * (factors.co2 * gwp.co2 + factors.ch4 * gwp.ch4 + factors.n2o * gwp.n2o)
        + factors.slip
            * (factors.co2_slip * gwp.co2 + factors.ch4_slip * gwp.ch4 + factors.n2o_slip * gwp.n2o);
    Ok(round5(emission / factors.lcv))
}

/// Well-to-wake GHG intensity [gCO2eq/MJ]
pub fn well_to_wake(factors: &CombustionFactors, wtt: f32, gwp: &Gwp) -> Result<f32> {
    Ok(round5(wtt + combustion_intensity(factors, gwp)?))
}

/// Reference factor for a blend, energy-weighted over its components
///
/// The blend calorific value is the mass-weighted mean of the component
/// values; the blend intensity weights each component intensity by its
/// share of delivered energy.
pub fn blend_factor(fuel: FuelId, fossil: &FuelFactor, bio: &FuelFactor) -> Result<FuelFactor> {
    let blend = fuel
        .blend()
        .ok_or_else(|| GfiError::BadConfig(format!("{} is not a blended fuel", fuel)))?;
    if blend.fossil != fossil.fuel || blend.bio != bio.fuel {
        return Err(GfiError::BadConfig(format!(
            "wrong components {}, {} for blend {}",
            fossil.fuel, bio.fuel, fuel
        )));
    }
    let f = blend.fossil_fraction;
    let b = blend.bio_fraction();
    let lcv = f * fossil.lcv + b * bio.lcv;
    if lcv <= 0.0 {
        return Err(GfiError::BadConfig(format!(
            "non-positive calorific value for blend {}",
            fuel
        )));
    }
    let wtw = (f * fossil.lcv * fossil.wtw + b * bio.lcv * bio.wtw) / lcv;
    Ok(FuelFactor {
        fuel,
        lcv: lcv.round(),
        wtw: round5(wtw),
        blend: Some(blend),
    })
}

/// Reference factor table of a compliance scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    /// Fuel factors, pure fuels first
    pub factors: Vec<FuelFactor>,
}

impl ReferenceTable {
    /// Find the factor for a fuel, if present
    pub fn find(&self, fuel: FuelId) -> Option<&FuelFactor> {
        self.factors.iter().find(|f| f.fuel == fuel)
    }

    /// Get the factor for a fuel, failing when missing
    pub fn get(&self, fuel: FuelId) -> Result<&FuelFactor> {
        self.find(fuel)
            .ok_or_else(|| GfiError::MissingFactor(fuel.to_string()))
    }
}

/// Build a reference table from raw combustion factors and WtT intensities
///
/// `raw` lists pure fuels only. Blends are derived afterwards for every
/// blended [`FuelId`] whose components are both present.
pub fn build_reference_table(
    raw: &[(FuelId, CombustionFactors, f32)],
    gwp: &Gwp,
) -> Result<ReferenceTable> {
    let mut factors: Vec<FuelFactor> = Vec::with_capacity(FuelId::ALL.len());
    for (fuel, combustion, wtt) in raw {
        if fuel.is_blend() {
            return Err(GfiError::BadConfig(format!(
                "blend {} given as a raw fuel",
                fuel
            )));
        }
        if factors.iter().any(|f| f.fuel == *fuel) {
            return Err(GfiError::BadConfig(format!("duplicated fuel {}", fuel)));
        }
        factors.push(FuelFactor {
            fuel: *fuel,
            // raw values are MJ/g, table values whole MJ/ton
            lcv: (combustion.lcv * EMISSION_UNIT_SCALE).round(),
            wtw: well_to_wake(combustion, *wtt, gwp)?,
            blend: None,
        });
    }
    let table = ReferenceTable { factors };
    let mut blends = Vec::new();
    for fuel in &FuelId::ALL {
        if let Some(blend) = fuel.blend() {
            if let (Some(fossil), Some(bio)) = (table.find(blend.fossil), table.find(blend.bio)) {
                blends.push(blend_factor(*fuel, fossil, bio)?);
            }
        }
    }
    let mut table = table;
    table.factors.extend(blends);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GWP100;
    use pretty_assertions::assert_eq;

    const APPROX: f32 = 1e-3;

    fn vlsfo_raw() -> CombustionFactors {
        CombustionFactors {
            co2: 3.114,
            ch4: 0.00005,
            n2o: 0.00018,
            lcv: 0.0402,
            slip: 0.0,
            co2_slip: 0.0,
            ch4_slip: 0.0,
            n2o_slip: 0.0,
        }
    }

    #[test]
    fn vlsfo_intensity() {
        let ttw = combustion_intensity(&vlsfo_raw(), &GWP100).unwrap();
        assert!((ttw - 78.82811).abs() < APPROX, "got {}", ttw);
        let wtw = well_to_wake(&vlsfo_raw(), 16.8, &GWP100).unwrap();
        assert!((wtw - 95.62811).abs() < APPROX, "got {}", wtw);
    }

    #[test]
    fn slip_shifts_intensity() {
        let lng = CombustionFactors {
            co2: 2.75,
            ch4: 0.0,
            n2o: 0.00011,
            lcv: 0.048,
            slip: 0.0015,
            co2_slip: 0.0,
            ch4_slip: 1.0,
            n2o_slip: 0.0,
        };
        let with_slip = combustion_intensity(&lng, &GWP100).unwrap();
        // (0.9985 * 2.78278 + 0.0015 * 25) / 0.048
        assert!((with_slip - 58.66887).abs() < APPROX, "got {}", with_slip);
        let without = combustion_intensity(
            &CombustionFactors { slip: 0.0, ..lng },
            &GWP100,
        )
        .unwrap();
        assert!(with_slip > without);

        let bad = CombustionFactors { slip: -0.1, ..lng };
        assert!(combustion_intensity(&bad, &GWP100).is_err());
    }

    #[test]
    fn table_with_blends() {
        let raw = vec![
            (FuelId::Vlsfo, vlsfo_raw(), 16.8),
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
        let table = build_reference_table(&raw, &GWP100).unwrap();
        // two pure fuels plus the two VLSFO blends
        assert_eq!(table.factors.len(), 4);
        let b24 = table.get(FuelId::B24Vlsfo).unwrap();
        let vlsfo = table.get(FuelId::Vlsfo).unwrap();
        let bio = table.get(FuelId::BioFame).unwrap();
        assert!(b24.wtw < vlsfo.wtw && b24.wtw > bio.wtw);
        assert!((b24.lcv - (0.76 * vlsfo.lcv + 0.24 * bio.lcv)).abs() < 1.0);
        assert!(table.get(FuelId::Lng).is_err());
        assert!(table.find(FuelId::B24Hsfo).is_none());
    }

    #[test]
    fn duplicates_rejected() {
        let raw = vec![
            (FuelId::Vlsfo, vlsfo_raw(), 16.8),
            (FuelId::Vlsfo, vlsfo_raw(), 16.8),
        ];
        assert!(build_reference_table(&raw, &GWP100).is_err());
    }
}
