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
Basic data types
================

Fuel identifiers, GWP weights, raw combustion factors, derived fuel factors,
usage records and metadata.

Units:

- raw `lcv` is MJ/g (combustion factor tables)
- derived `lcv` on [`FuelFactor`] and [`UsageRecord`] is MJ/ton
- `wtw` is gCO2eq/MJ
- tonnages are metric tons
*/

use std::fmt;
use std::str;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::GfiError;

/// Scale between gram-based emissions and the reported tCO2eq (g per ton)
pub const EMISSION_UNIT_SCALE: f32 = 1e6;

/// Credit applied to outside-jurisdiction energy of non-exempt fuels
pub const OUTSIDE_DEFAULT_CREDIT: f32 = 0.5;

// ==================== Fuels

/// Recognized marine fuel (pure fuels and bio blends)
///
/// This is a closed enumeration: unknown names are rejected while parsing,
/// so downstream code never sees an unrecognized fuel.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum FuelId {
    /// Very low sulphur fuel oil
    #[strum(serialize = "VLSFO")]
    Vlsfo,
    /// High sulphur fuel oil
    #[strum(serialize = "HSFO")]
    Hsfo,
    /// Low sulphur marine gas oil
    #[strum(serialize = "LSMGO")]
    Lsmgo,
    /// Liquefied natural gas (methane slip in gas engines)
    #[strum(serialize = "LNG")]
    Lng,
    /// Liquefied petroleum gas, propane grade
    #[strum(serialize = "LPG(Propane)")]
    LpgPropane,
    /// Liquefied petroleum gas, butane grade
    #[strum(serialize = "LPG(Butane)")]
    LpgButane,
    /// Pure biodiesel (FAME); `B100` is accepted as an input alias
    #[strum(serialize = "Bio(Fame)", serialize = "B100")]
    BioFame,
    /// 24% FAME blend over HSFO (by mass)
    #[strum(serialize = "B24(HSFO)")]
    B24Hsfo,
    /// 30% FAME blend over HSFO (by mass)
    #[strum(serialize = "B30(HSFO)")]
    B30Hsfo,
    /// 24% FAME blend over VLSFO (by mass)
    #[strum(serialize = "B24(VLSFO)")]
    B24Vlsfo,
    /// 30% FAME blend over VLSFO (by mass)
    #[strum(serialize = "B30(VLSFO)")]
    B30Vlsfo,
}

impl FuelId {
    /// All recognized fuels, pure fuels first
    pub const ALL: [FuelId; 11] = [
        FuelId::Vlsfo,
        FuelId::Hsfo,
        FuelId::Lsmgo,
        FuelId::Lng,
        FuelId::LpgPropane,
        FuelId::LpgButane,
        FuelId::BioFame,
        FuelId::B24Hsfo,
        FuelId::B30Hsfo,
        FuelId::B24Vlsfo,
        FuelId::B30Vlsfo,
    ];

    /// Blend composition for blended fuels, `None` for pure fuels
    pub fn blend(self) -> Option<Blend> {
        match self {
            FuelId::B24Hsfo => Some(Blend::new(FuelId::Hsfo, FuelId::BioFame, 0.76)),
            FuelId::B30Hsfo => Some(Blend::new(FuelId::Hsfo, FuelId::BioFame, 0.70)),
            FuelId::B24Vlsfo => Some(Blend::new(FuelId::Vlsfo, FuelId::BioFame, 0.76)),
            FuelId::B30Vlsfo => Some(Blend::new(FuelId::Vlsfo, FuelId::BioFame, 0.70)),
            _ => None,
        }
    }

    /// Is this a blended fuel?
    pub fn is_blend(self) -> bool {
        self.blend().is_some()
    }
}

/// Composition of a blended fuel (mass fractions)
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blend {
    /// Fossil component
    pub fossil: FuelId,
    /// Bio component
    pub bio: FuelId,
    /// Mass fraction of the fossil component, in [0, 1]
    pub fossil_fraction: f32,
}

impl Blend {
    /// Blend constructor
    pub const fn new(fossil: FuelId, bio: FuelId, fossil_fraction: f32) -> Self {
        Self {
            fossil,
            bio,
            fossil_fraction,
        }
    }

    /// Mass fraction of the bio component
    pub fn bio_fraction(&self) -> f32 {
        1.0 - self.fossil_fraction
    }
}

// ==================== Factors

/// Global warming potential weights converting gas mass to CO2-equivalent
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gwp {
    /// CO2 weight
    pub co2: f32,
    /// CH4 weight
    pub ch4: f32,
    /// N2O weight
    pub n2o: f32,
}

/// GWP-100 weights used by both schemes
pub const GWP100: Gwp = Gwp {
    co2: 1.0,
    ch4: 25.0,
    n2o: 298.0,
};

/// Raw per-fuel combustion factors (emitted gas mass per fuel mass)
///
/// `slip` is the mass fraction of fuel escaping the engine unburned; the
/// `*_slip` factors describe the composition of the escaped fraction.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombustionFactors {
    /// CO2 emitted per unit fuel mass burned
    pub co2: f32,
    /// CH4 emitted per unit fuel mass burned
    pub ch4: f32,
    /// N2O emitted per unit fuel mass burned
    pub n2o: f32,
    /// Low calorific value [MJ/g]
    pub lcv: f32,
    /// Mass fraction of fuel escaping unburned, `>= 0`
    pub slip: f32,
    /// CO2 fraction of the escaped fuel mass
    pub co2_slip: f32,
    /// CH4 fraction of the escaped fuel mass
    pub ch4_slip: f32,
    /// N2O fraction of the escaped fuel mass
    pub n2o_slip: f32,
}

/// Derived reference factor for a fuel: calorific value and lifecycle intensity
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelFactor {
    /// Fuel identifier
    pub fuel: FuelId,
    /// Low calorific value [MJ/ton]
    pub lcv: f32,
    /// Well-to-wake GHG intensity [gCO2eq/MJ]
    pub wtw: f32,
    /// Blend composition, `None` for pure fuels
    pub blend: Option<Blend>,
}

// ==================== Usage records

/// A single fuel usage entry
///
/// The `lcv`/`wtw` values are snapshots: they default to the reference table
/// but may have been overridden by the caller, so they are carried on the
/// record rather than looked up again.
///
/// For schemes without a jurisdiction split (IMO GFI) the whole consumed
/// amount goes to `inside` and `outside` stays 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Fuel identifier
    pub fuel: FuelId,
    /// Low calorific value [MJ/ton]
    pub lcv: f32,
    /// Well-to-wake GHG intensity [gCO2eq/MJ]
    pub wtw: f32,
    /// Tonnage consumed inside the jurisdiction (100% weighted)
    pub inside: f32,
    /// Tonnage consumed outside the jurisdiction (50% weighted by default)
    pub outside: f32,
    /// Descriptive comment
    pub comment: String,
}

impl UsageRecord {
    /// Usage record constructor
    pub fn new<T: Into<String>>(
        fuel: FuelId,
        lcv: f32,
        wtw: f32,
        inside: f32,
        outside: f32,
        comment: T,
    ) -> Self {
        Self {
            fuel,
            lcv,
            wtw,
            inside,
            outside,
            comment: comment.into(),
        }
    }

    /// Usage record with `lcv`/`wtw` snapshots taken from a fuel factor
    pub fn from_factor(factor: &FuelFactor, inside: f32, outside: f32) -> Self {
        UsageRecord::new(factor.fuel, factor.lcv, factor.wtw, inside, outside, "")
    }

    /// Total consumed tonnage
    pub fn tonnage(&self) -> f32 {
        self.inside + self.outside
    }

    /// Energy counted against the penalty basis [MJ]
    ///
    /// Fossil-style weighting (outside at 50%), applied uniformly to every
    /// record regardless of exemptions. This sizes the energy budget.
    pub fn penalty_basis_energy(&self) -> f32 {
        self.inside * self.lcv + self.outside * self.lcv * OUTSIDE_DEFAULT_CREDIT
    }

    /// Energy eligible to be counted for this record [MJ]
    ///
    /// Exempt (full-credit) fuels count their outside energy at 100%.
    pub fn adjusted_energy(&self, full_credit: bool) -> f32 {
        let outside_credit = if full_credit {
            1.0
        } else {
            OUTSIDE_DEFAULT_CREDIT
        };
        self.inside * self.lcv + self.outside * self.lcv * outside_credit
    }
}

impl fmt::Display for UsageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comment = if self.comment.is_empty() {
            "".to_owned()
        } else {
            format!(" # {}", self.comment)
        };
        write!(
            f,
            "{}, {:.0}, {:.5}, {:.2}, {:.2}{}",
            self.fuel, self.lcv, self.wtw, self.inside, self.outside, comment
        )
    }
}

impl str::FromStr for UsageRecord {
    type Err = GfiError;

    /// Parses `FUEL, LCV, WTW, INSIDE, OUTSIDE # comment`.
    ///
    /// A four-field form `FUEL, LCV, WTW, AMOUNT` is accepted for schemes
    /// without a jurisdiction split; the amount is booked as inside usage.
    fn from_str(s: &str) -> Result<UsageRecord, Self::Err> {
        let items: Vec<&str> = s.trim().splitn(2, '#').map(str::trim).collect();
        let comment = items.get(1).unwrap_or(&"").to_string();
        let items: Vec<&str> = items[0].split(',').map(str::trim).collect();
        if items.len() < 4 || items.len() > 5 {
            return Err(GfiError::ParseError(s.into()));
        }
        let fuel: FuelId = items[0]
            .parse()
            .map_err(|_| GfiError::FuelUnknown(items[0].into()))?;
        let lcv: f32 = items[1].parse()?;
        let wtw: f32 = items[2].parse()?;
        let inside: f32 = items[3].parse()?;
        let outside: f32 = if items.len() == 5 {
            items[4].parse()?
        } else {
            0.0
        };
        Ok(UsageRecord {
            fuel,
            lcv,
            wtw,
            inside,
            outside,
            comment,
        })
    }
}

// ==================== Metadata

/// Metadata of a usage file (`#META KEY: value` lines)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Metadata name
    pub key: String,
    /// Metadata value
    pub value: String,
}

impl Meta {
    /// Metadata constructor
    pub fn new<T, U>(key: T, value: U) -> Self
    where
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#META {}: {}", self.key, self.value)
    }
}

impl str::FromStr for Meta {
    type Err = GfiError;

    fn from_str(s: &str) -> Result<Meta, Self::Err> {
        // Drop the "#META" prefix
        let items: Vec<&str> = s.trim()[5..].splitn(2, ':').map(str::trim).collect();
        if items.len() == 2 {
            Ok(Meta::new(items[0], items[1]))
        } else {
            Err(GfiError::ParseError(s.into()))
        }
    }
}

/// Common trait for types carrying a metadata vector
pub trait MetaVec {
    /// Get the metadata vector
    fn get_metavec(&self) -> &Vec<Meta>;
    /// Get the mutable metadata vector
    fn get_mut_metavec(&mut self) -> &mut Vec<Meta>;

    /// Get the value of metadata `key`, if present
    fn get_meta(&self, key: &str) -> Option<String> {
        self.get_metavec()
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.value.clone())
    }

    /// Get the value of metadata `key` as an integer, if present and valid
    fn get_meta_i32(&self, key: &str) -> Option<i32> {
        self.get_meta(key).and_then(|v| v.parse().ok())
    }

    /// Update the value of metadata `key`, inserting it if missing
    fn set_meta(&mut self, key: &str, value: &str) {
        let metavec = self.get_mut_metavec();
        if let Some(meta) = metavec.iter_mut().find(|m| m.key == key) {
            meta.value = value.to_string();
        } else {
            metavec.push(Meta::new(key, value));
        }
    }
}
