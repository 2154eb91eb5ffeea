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
Compliance balance computation
==============================

Evaluates a normalized usage list against a target GHG intensity:

1. the penalty basis (outside energy at 50% for every fuel) sizes the
   total energy budget;
2. each record contributes its adjusted energy (full outside credit for
   exempt fuels), capped by the budget;
3. records are consumed in merit order, cleanest first, truncating the
   boundary record so total counted energy never exceeds the budget;
4. the fleet average intensity, compliance balance and penalty follow.

A positive balance is a surplus (average below target), a negative one a
deficit.
*/

use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{GfiError, Result};
use crate::types::{FuelId, UsageRecord, EMISSION_UNIT_SCALE};

/// FuelEU penalty rate [EUR per VLSFO-equivalent ton of deficit]
pub const PENALTY_EUR_PER_VLSFOEQ_TON: f32 = 2400.0;

/// Energy content of a VLSFO-equivalent ton [MJ]
pub const VLSFOEQ_ENERGY_MJ_PER_TON: f32 = 41_000.0;

/// A record after merit-order selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedRow {
    /// The underlying usage record
    pub record: UsageRecord,
    /// Energy actually counted for this record [MJ]
    pub used_energy: f32,
    /// Emission attributed to the counted energy [tCO2eq]
    pub emission: f32,
}

/// Result of a compliance evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// Total counted energy [MJ]
    pub total_energy: f32,
    /// Total attributed emission [tCO2eq]
    pub total_emission: f32,
    /// Fleet average GHG intensity [gCO2eq/MJ]
    pub avg_intensity: f32,
    /// Target GHG intensity [gCO2eq/MJ]
    pub standard_intensity: f32,
    /// Compliance balance, positive in surplus [tCO2eq]
    pub balance: f32,
    /// Monetary penalty, 0 in surplus [EUR]
    pub penalty_eur: f32,
    /// Records in merit order with their counted energy
    pub selected: Vec<SelectedRow>,
}

impl ComplianceResult {
    /// Is the fleet average above the target?
    pub fn is_deficit(&self) -> bool {
        self.avg_intensity > self.standard_intensity
    }
}

/// Evaluate usage records against a target intensity
///
/// `full_credit` marks the fuels whose outside-jurisdiction energy counts
/// at 100% instead of the default 50%.
pub fn evaluate<F>(records: &[UsageRecord], full_credit: F, standard: f32) -> Result<ComplianceResult>
where
    F: Fn(FuelId) -> bool,
{
    if records.is_empty() {
        return Err(GfiError::WrongInput("no usage records given".into()));
    }
    for record in records {
        if record.inside < 0.0 || record.outside < 0.0 {
            return Err(GfiError::WrongInput(format!(
                "negative tonnage in record: {}",
                record
            )));
        }
    }

    let energy_cap: f32 = records.iter().map(UsageRecord::penalty_basis_energy).sum();

    // Merit order: cleanest fuel first; ties keep input order
    let ordered = records
        .iter()
        .sorted_by(|a, b| a.wtw.partial_cmp(&b.wtw).unwrap_or(Ordering::Equal));

    let mut selected = Vec::with_capacity(records.len());
    let mut cumulative = 0.0_f32;
    for record in ordered {
        let remaining = energy_cap - cumulative;
        if remaining <= 0.0 {
            break;
        }
        let available = record.adjusted_energy(full_credit(record.fuel));
        let used_energy = available.min(remaining);
        // zero-tonnage rows contribute nothing but do not end selection
        if used_energy <= 0.0 {
            continue;
        }
        cumulative += used_energy;
        selected.push(SelectedRow {
            record: record.clone(),
            emission: used_energy * record.wtw / EMISSION_UNIT_SCALE,
            used_energy,
        });
    }

    let total_energy = cumulative;
    let total_emission: f32 = selected.iter().map(|r| r.emission).sum();
    let avg_intensity = if total_energy > 0.0 {
        total_emission * EMISSION_UNIT_SCALE / total_energy
    } else {
        0.0
    };
    let balance = (standard - avg_intensity) * total_energy / EMISSION_UNIT_SCALE;
    let penalty_eur = if avg_intensity > standard {
        (avg_intensity - standard) * total_energy * PENALTY_EUR_PER_VLSFOEQ_TON
            / VLSFOEQ_ENERGY_MJ_PER_TON
            / avg_intensity
    } else {
        0.0
    };

    Ok(ComplianceResult {
        total_energy,
        total_emission,
        avg_intensity,
        standard_intensity: standard,
        balance,
        penalty_eur,
        selected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FuelId;

    const APPROX: f32 = 1e-3;

    fn full_credit(fuel: FuelId) -> bool {
        fuel == FuelId::Lng || fuel == FuelId::BioFame
    }

    #[test]
    fn truncation_at_energy_cap() {
        // LNG inside 10, outside 10, lcv 10 -> basis 150, adjusted 200
        // HSFO inside 10, outside 10, lcv 10 -> basis 150, adjusted 150
        // cap 300, LNG takes 200, HSFO truncated to 100
        let records = vec![
            UsageRecord::new(FuelId::Hsfo, 10.0, 90.0, 10.0, 10.0, ""),
            UsageRecord::new(FuelId::Lng, 10.0, 60.0, 10.0, 10.0, ""),
        ];
        let res = evaluate(&records, full_credit, 89.3368).unwrap();
        assert!((res.total_energy - 300.0).abs() < APPROX);
        assert_eq!(res.selected[0].record.fuel, FuelId::Lng);
        assert!((res.selected[0].used_energy - 200.0).abs() < APPROX);
        assert!((res.selected[1].used_energy - 100.0).abs() < APPROX);
        // avg = (200*60 + 100*90)/300 = 70
        assert!((res.avg_intensity - 70.0).abs() < APPROX);
        assert!(!res.is_deficit());
        assert_eq!(res.penalty_eur, 0.0);
        assert!(res.balance > 0.0);
    }

    #[test]
    fn zero_tonnage_row_does_not_end_selection() {
        // the empty LNG row sorts first; the HSFO row must still be counted
        let records = vec![
            UsageRecord::new(FuelId::Lng, 10.0, 60.0, 0.0, 0.0, ""),
            UsageRecord::new(FuelId::Hsfo, 10.0, 90.0, 10.0, 0.0, ""),
        ];
        let res = evaluate(&records, full_credit, 89.3368).unwrap();
        assert!((res.total_energy - 100.0).abs() < APPROX);
        assert_eq!(res.selected.len(), 1);
        assert_eq!(res.selected[0].record.fuel, FuelId::Hsfo);
        assert!((res.avg_intensity - 90.0).abs() < APPROX);
    }

    #[test]
    fn no_truncation_without_exempt_fuels() {
        let records = vec![
            UsageRecord::new(FuelId::Hsfo, 10.0, 90.0, 10.0, 10.0, ""),
            UsageRecord::new(FuelId::Vlsfo, 10.0, 70.0, 10.0, 10.0, ""),
        ];
        let res = evaluate(&records, full_credit, 89.3368).unwrap();
        // both records fit exactly, avg = (150*70 + 150*90)/300 = 80
        assert!((res.total_energy - 300.0).abs() < APPROX);
        assert!((res.avg_intensity - 80.0).abs() < APPROX);
    }

    #[test]
    fn balance_sign_flips_with_target() {
        let records = vec![UsageRecord::new(FuelId::Vlsfo, 10.0, 80.0, 10.0, 0.0, "")];
        let surplus = evaluate(&records, full_credit, 90.0).unwrap();
        let deficit = evaluate(&records, full_credit, 70.0).unwrap();
        assert!(surplus.balance > 0.0 && surplus.penalty_eur == 0.0);
        assert!(deficit.balance < 0.0 && deficit.penalty_eur > 0.0);
        assert!((surplus.balance - (90.0 - 80.0) * 100.0 / 1e6).abs() < 1e-9);
        assert!((deficit.balance + (80.0 - 70.0) * 100.0 / 1e6).abs() < 1e-9);
    }

    #[test]
    fn deficit_penalty_formula() {
        let records = vec![UsageRecord::new(FuelId::Hsfo, 10.0, 90.0, 10.0, 0.0, "")];
        let res = evaluate(&records, full_credit, 80.0).unwrap();
        let expected = (90.0 - 80.0) * 100.0 * 2400.0 / 41000.0 / 90.0;
        assert!((res.penalty_eur - expected).abs() < APPROX);
    }

    #[test]
    fn empty_and_negative_inputs_rejected() {
        assert!(evaluate(&[], full_credit, 89.0).is_err());
        let records = vec![UsageRecord::new(FuelId::Vlsfo, 10.0, 80.0, -1.0, 0.0, "")];
        assert!(evaluate(&records, full_credit, 89.0).is_err());
    }
}
