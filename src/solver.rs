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
Substitution and pooling solvers
================================

Answers "how much of fuel X would move the balance to zero", in two
directions:

- `Offset`: the fleet is in deficit and burns extra clean fuel to reach
  the target;
- `Pool`: the fleet is in surplus and sells headroom, absorbing dirty
  fuel from a pooled ship until the surplus is consumed.

The single-fuel solver adds or displaces inside-jurisdiction tonnage and
solves the intensity equation in closed form. The stepwise solver walks
the existing records in merit order, displacing one at a time with the
substitute fuel, and reports the per-step caps and requirements.
*/

use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::balance::ComplianceResult;
use crate::error::{GfiError, Result};
use crate::factors::ReferenceTable;
use crate::types::{FuelFactor, FuelId, UsageRecord, EMISSION_UNIT_SCALE, OUTSIDE_DEFAULT_CREDIT};

/// Direction a substitution works in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Deficit side: add clean fuel until the balance reaches zero
    Offset,
    /// Surplus side: absorb dirty fuel until the surplus is consumed
    Pool,
}

/// Tonnage of `fuel` added inside the jurisdiction that zeroes the balance
///
/// Returns 0 when the fleet needs no correction in the given direction or
/// when the fuel cannot provide one (an `Offset` fuel dirtier than the
/// target, a `Pool` fuel cleaner than it).
pub fn solve_single(result: &ComplianceResult, fuel: &FuelFactor, direction: Direction) -> f32 {
    let energy = result.total_energy;
    let emission_g = result.total_emission * EMISSION_UNIT_SCALE;
    let standard = result.standard_intensity;
    match direction {
        Direction::Offset => {
            let numerator = emission_g - standard * energy;
            let denominator = fuel.lcv * (standard - fuel.wtw);
            if numerator > 0.0 && denominator > 0.0 {
                numerator / denominator
            } else {
                0.0
            }
        }
        Direction::Pool => {
            let numerator = standard * energy - emission_g;
            let denominator = fuel.lcv * (fuel.wtw - standard);
            if denominator != 0.0 {
                (numerator / denominator).max(0.0)
            } else {
                0.0
            }
        }
    }
}

/// One displacement step of the stepwise solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionStep {
    /// Fuel displaced at this step
    pub fuel: FuelId,
    /// Substitute tonnage whose (half-weighted) energy equals the displaced energy
    pub theoretical_cap: f32,
    /// Substitute tonnage that exactly zeroes the balance at this step
    pub actual_requirement: f32,
    /// Tonnage chosen: the requirement capped by the step budget
    pub chosen: f32,
    /// Counted energy after this step [MJ]
    pub cumulative_energy: f32,
    /// Attributed emission after this step [g CO2eq]
    pub cumulative_emission: f32,
}

/// Walk records in merit order, displacing each with substitute fuel
///
/// In `Offset` direction the dirtiest record is displaced first; in `Pool`
/// direction the cleanest. Displacing a record removes its counted energy
/// and emission and books substitute tonnage whose energy counts at 50%
/// (the substitution happens outside the jurisdiction). The walk stops at
/// the step where the zero-balance requirement fits within the step budget.
pub fn solve_stepwise(
    result: &ComplianceResult,
    substitute: &FuelFactor,
    direction: Direction,
) -> Result<Vec<SubstitutionStep>> {
    let standard = result.standard_intensity;
    let needed = match direction {
        Direction::Offset => result.penalty_eur > 0.0,
        Direction::Pool => result.balance > 0.0,
    };

    let ordered: Vec<&UsageRecord> = result
        .selected
        .iter()
        .map(|row| &row.record)
        .sorted_by(|a, b| {
            let cmp = a.wtw.partial_cmp(&b.wtw).unwrap_or(Ordering::Equal);
            match direction {
                Direction::Offset => cmp.reverse(),
                Direction::Pool => cmp,
            }
        })
        .collect();

    let mut cum_energy = result.total_energy;
    let mut cum_emission = result.total_emission * EMISSION_UNIT_SCALE;
    let mut steps = Vec::with_capacity(ordered.len());

    for record in ordered {
        let displaced_energy = record.inside * record.lcv
            + record.outside * record.lcv * OUTSIDE_DEFAULT_CREDIT;
        let theoretical_cap = if needed {
            2.0 * displaced_energy / substitute.lcv
        } else {
            0.0
        };

        // Project the balance with the whole record displaced
        let proj_energy =
            cum_energy - displaced_energy + OUTSIDE_DEFAULT_CREDIT * theoretical_cap * substitute.lcv;
        let proj_emission = cum_emission - displaced_energy * record.wtw
            + OUTSIDE_DEFAULT_CREDIT * theoretical_cap * substitute.lcv * substitute.wtw;
        let proj_avg = if proj_energy > 0.0 {
            proj_emission / proj_energy
        } else {
            0.0
        };
        let overshoot = match direction {
            Direction::Offset => proj_avg < standard,
            Direction::Pool => proj_avg > standard,
        };

        let denominator = substitute.lcv
            * (substitute.wtw
                - OUTSIDE_DEFAULT_CREDIT * record.wtw
                - OUTSIDE_DEFAULT_CREDIT * standard);
        let actual_requirement = if overshoot && record.tonnage() > 0.0 && denominator != 0.0 {
            (standard * cum_energy - cum_emission) / denominator
        } else {
            0.0
        };
        let chosen = actual_requirement.min(theoretical_cap).max(0.0);

        cum_energy += OUTSIDE_DEFAULT_CREDIT * chosen * substitute.lcv;
        cum_emission += chosen * substitute.lcv * substitute.wtw
            - OUTSIDE_DEFAULT_CREDIT * chosen * substitute.lcv * record.wtw;

        steps.push(SubstitutionStep {
            fuel: record.fuel,
            theoretical_cap,
            actual_requirement,
            chosen,
            cumulative_energy: cum_energy,
            cumulative_emission: cum_emission,
        });

        if chosen > 0.0 && actual_requirement <= theoretical_cap {
            break;
        }
    }
    if steps.is_empty() {
        return Err(GfiError::WrongInput("no records to substitute from".into()));
    }
    Ok(steps)
}

/// Tonnage of a blended fuel, burned outside the jurisdiction, that zeroes
/// a deficit
///
/// The bio component counts its outside energy in full while the fossil
/// component counts at 50%, so the blend both adds clean energy and dilutes
/// the average. Returns 0 when the fleet has no deficit or the blend cannot
/// close it.
pub fn solve_blend_outside(
    result: &ComplianceResult,
    blend: &FuelFactor,
    reference: &ReferenceTable,
) -> Result<f32> {
    let composition = blend.blend.ok_or_else(|| {
        GfiError::WrongInput(format!("{} is not a blended fuel", blend.fuel))
    })?;
    let fossil = reference.get(composition.fossil)?;
    let bio = reference.get(composition.bio)?;
    let standard = result.standard_intensity;
    let emission_g = result.total_emission * EMISSION_UNIT_SCALE;

    let numerator = emission_g - standard * result.total_energy;
    let f = composition.fossil_fraction;
    let b = composition.bio_fraction();
    let denominator = b * bio.lcv * (standard - bio.wtw)
        - OUTSIDE_DEFAULT_CREDIT * f * fossil.lcv * (fossil.wtw - standard);
    if numerator <= 0.0 || denominator <= 0.0 {
        return Ok(0.0);
    }
    Ok(numerator / denominator)
}

/// Pooled-absorption estimate refined against re-evaluation
///
/// The closed-form `Pool` solution assumes the absorbed tonnage does not
/// change the energy cap, which it does. Two refinement rounds (append the
/// absorbed tonnage as inside usage, re-evaluate, re-solve on the residual
/// surplus) are enough to converge within reporting precision.
pub fn solve_refined<F>(
    records: &[UsageRecord],
    result: &ComplianceResult,
    absorbed: &FuelFactor,
    full_credit: F,
) -> Result<f32>
where
    F: Fn(FuelId) -> bool + Copy,
{
    let mut tonnage = solve_single(result, absorbed, Direction::Pool);
    for _ in 0..2 {
        if tonnage <= 0.0 {
            return Ok(0.0);
        }
        let mut augmented = records.to_vec();
        augmented.push(UsageRecord::from_factor(absorbed, tonnage, 0.0));
        let reeval = crate::balance::evaluate(&augmented, full_credit, result.standard_intensity)?;
        tonnage += solve_single(&reeval, absorbed, Direction::Pool);
    }
    Ok(tonnage.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::evaluate;
    use crate::types::FuelId;

    const APPROX: f32 = 1e-3;

    fn no_credit(_: FuelId) -> bool {
        false
    }

    fn factor(fuel: FuelId, lcv: f32, wtw: f32) -> FuelFactor {
        FuelFactor {
            fuel,
            lcv,
            wtw,
            blend: None,
        }
    }

    #[test]
    fn single_offset_closed_form() {
        // E = 150, em = 12000 g, avg = 80, std = 70
        let records = vec![UsageRecord::new(FuelId::Hsfo, 10.0, 80.0, 10.0, 10.0, "")];
        let res = evaluate(&records, no_credit, 70.0).unwrap();
        let substitute = factor(FuelId::BioFame, 20.0, 20.0);
        let t = solve_single(&res, &substitute, Direction::Offset);
        // (12000 - 70*150) / (20*(70-20)) = 1500/1000 = 1.5
        assert!((t - 1.5).abs() < APPROX, "got {}", t);

        // verify: burning 1.5 t inside zeroes the balance
        let mut augmented = records.clone();
        augmented.push(UsageRecord::from_factor(&substitute, t, 0.0));
        let after = evaluate(&augmented, no_credit, 70.0).unwrap();
        assert!(after.balance.abs() < APPROX);
    }

    #[test]
    fn single_offset_zero_without_deficit() {
        let records = vec![UsageRecord::new(FuelId::Vlsfo, 10.0, 60.0, 10.0, 0.0, "")];
        let res = evaluate(&records, no_credit, 70.0).unwrap();
        let substitute = factor(FuelId::BioFame, 20.0, 20.0);
        assert_eq!(solve_single(&res, &substitute, Direction::Offset), 0.0);
        // a substitute dirtier than the target cannot offset
        let res = evaluate(
            &[UsageRecord::new(FuelId::Hsfo, 10.0, 90.0, 10.0, 0.0, "")],
            no_credit,
            70.0,
        )
        .unwrap();
        assert_eq!(
            solve_single(&res, &factor(FuelId::Hsfo, 10.0, 80.0), Direction::Offset),
            0.0
        );
    }

    #[test]
    fn single_pool_absorbs_surplus() {
        let records = vec![UsageRecord::new(FuelId::Lng, 10.0, 60.0, 15.0, 0.0, "")];
        let res = evaluate(&records, no_credit, 70.0).unwrap();
        let dirty = factor(FuelId::Hsfo, 10.0, 90.0);
        let t = solve_single(&res, &dirty, Direction::Pool);
        // (70*150 - 9000) / (10*(90-70)) = 1500/200 = 7.5
        assert!((t - 7.5).abs() < APPROX, "got {}", t);
    }

    #[test]
    fn refined_pool_converges() {
        let records = vec![UsageRecord::new(FuelId::Lng, 10.0, 60.0, 15.0, 0.0, "")];
        let res = evaluate(&records, no_credit, 70.0).unwrap();
        let dirty = factor(FuelId::Hsfo, 10.0, 90.0);
        let t = solve_refined(&records, &res, &dirty, no_credit).unwrap();
        // absorbing t as inside usage must land on the target
        let mut augmented = records.clone();
        augmented.push(UsageRecord::from_factor(&dirty, t, 0.0));
        let after = evaluate(&augmented, no_credit, 70.0).unwrap();
        assert!(
            (after.avg_intensity - 70.0).abs() / 70.0 < 1e-3,
            "got {}",
            after.avg_intensity
        );
    }

    #[test]
    fn stepwise_stays_within_caps() {
        let records = vec![
            UsageRecord::new(FuelId::Hsfo, 10.0, 90.0, 20.0, 0.0, ""),
            UsageRecord::new(FuelId::Vlsfo, 10.0, 80.0, 20.0, 0.0, ""),
        ];
        let res = evaluate(&records, no_credit, 70.0).unwrap();
        let substitute = factor(FuelId::BioFame, 20.0, 20.0);
        let steps = solve_stepwise(&res, &substitute, Direction::Offset).unwrap();
        // dirtiest record displaced first
        assert_eq!(steps[0].fuel, FuelId::Hsfo);
        for step in &steps {
            assert!(step.chosen >= 0.0);
            assert!(step.chosen <= step.theoretical_cap + APPROX);
        }
    }

    #[test]
    fn stepwise_zero_without_penalty() {
        let records = vec![UsageRecord::new(FuelId::Lng, 10.0, 60.0, 10.0, 0.0, "")];
        let res = evaluate(&records, no_credit, 70.0).unwrap();
        let substitute = factor(FuelId::BioFame, 20.0, 20.0);
        let steps = solve_stepwise(&res, &substitute, Direction::Offset).unwrap();
        assert!(steps.iter().all(|s| s.chosen == 0.0));
    }
}
