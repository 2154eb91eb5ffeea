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
Plain text reporting of compliance results
*/

use crate::balance::ComplianceResult;
use crate::imo::{Tier, TierAssessment};

/// Multiline plain text report of a compliance evaluation
pub fn result_to_plain(result: &ComplianceResult) -> String {
    let mut rows = String::new();
    for row in &result.selected {
        rows.push_str(&format!(
            "  {}: {:.2} MJ, {:.4} tCO2eq\n",
            row.record.fuel, row.used_energy, row.emission
        ));
    }
    let status = if result.is_deficit() {
        "DEFICIT"
    } else {
        "SURPLUS"
    };
    format!(
        "Counted energy by fuel:
{}Total energy [MJ]: {:.2}
Total emission [tCO2eq]: {:.4}
Average GHG intensity [gCO2eq/MJ]: {:.4}
Target GHG intensity [gCO2eq/MJ]: {:.4}
Compliance balance [tCO2eq]: {:.4}
Penalty [EUR]: {:.0}
Status: {}",
        rows,
        result.total_energy,
        result.total_emission,
        result.avg_intensity,
        result.standard_intensity,
        result.balance,
        result.penalty_eur,
        status
    )
}

/// Multiline plain text report of an IMO tier assessment
pub fn tier_to_plain(assessment: &TierAssessment) -> String {
    let tier = match assessment.tier {
        Tier::Surplus => "Surplus",
        Tier::Tier1 => "Tier 1",
        Tier::Tier2 => "Tier 2",
    };
    let mut out = format!(
        "Year: {}
Tier: {}
Base target [gCO2eq/MJ]: {:.4}
Direct target [gCO2eq/MJ]: {:.4}",
        assessment.year, tier, assessment.base_target, assessment.direct_target
    );
    match assessment.tier {
        Tier::Surplus => {
            out.push_str(&format!(
                "\nSurplus [tCO2eq]: {:.4}",
                assessment.surplus
            ));
        }
        Tier::Tier1 => {
            out.push_str(&format!(
                "\nTier 1 deficit [tCO2eq]: {:.4}\nRemedial cost [USD]: {:.0}",
                assessment.tier1_deficit, assessment.cost_usd
            ));
        }
        Tier::Tier2 => {
            out.push_str(&format!(
                "\nTier 1 deficit [tCO2eq]: {:.4}\nTier 2 deficit [tCO2eq]: {:.4}\nRemedial cost [USD]: {:.0}",
                assessment.tier1_deficit, assessment.tier2_deficit, assessment.cost_usd
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::evaluate;
    use crate::imo;
    use crate::types::{FuelId, UsageRecord};

    #[test]
    fn result_report_fields() {
        let records = vec![UsageRecord::new(FuelId::Vlsfo, 10.0, 80.0, 10.0, 0.0, "")];
        let res = evaluate(&records, |_| false, 90.0).unwrap();
        let plain = result_to_plain(&res);
        assert!(plain.contains("Total energy [MJ]: 100.00"));
        assert!(plain.contains("Average GHG intensity [gCO2eq/MJ]: 80.0000"));
        assert!(plain.contains("Penalty [EUR]: 0"));
        assert!(plain.contains("Status: SURPLUS"));
    }

    #[test]
    fn tier_report_fields() {
        let assessment = imo::assess(80.0, 1e6, 2028).unwrap();
        let plain = tier_to_plain(&assessment);
        assert!(plain.contains("Tier: Tier 1"));
        assert!(plain.contains("Tier 1 deficit [tCO2eq]:"));
        assert!(!plain.contains("Tier 2 deficit"));
    }
}
