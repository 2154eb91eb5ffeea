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

#![deny(missing_docs)]

/*!
Marine fuel GHG intensity compliance library
============================================

This library computes the greenhouse-gas fuel intensity of a ship's fuel
mix and evaluates it against two regulatory schemes:

- **FuelEU Maritime** (Regulation (EU) 2023/1805): outside-EU energy counts
  at 50% with full credit for LNG and biodiesel, a banded reduction
  schedule over the 91.16 gCO2eq/MJ baseline, and a monetary penalty in
  EUR per VLSFO-equivalent ton of deficit.
- **IMO GFI** (MARPOL Annex VI mid-term measure): annual base and
  direct-compliance trajectories over the 93.3 gCO2eq/MJ baseline, with
  two-tier remedial unit pricing in USD.

The pipeline is: parse a usage list, normalize it (expand blends, merge
duplicates), evaluate it in merit order against the year's target, then
optionally solve for the substitution or pooling tonnage that zeroes the
balance.

# Example

```rust
use gfifeu::{evaluate, feum, Usage};

let mut usage: Usage = "#META SCHEME: FEUM
#META YEAR: 2025

VLSFO, 40500, 91.74445, 5000.00, 2000.00
B30(VLSFO), 39450, 70.03853, 1000.00, 0.00"
    .parse()
    .unwrap();

let reference = feum::reference_table().unwrap();
usage.normalize(&reference).unwrap();
let standard = feum::standard_for(2025).unwrap();
let result = evaluate(&usage.udata, feum::is_full_credit, standard).unwrap();
assert!(!result.is_deficit());
assert!(result.balance > 0.0);
```
*/

pub mod asplain;
pub mod balance;
pub mod error;
pub mod factors;
pub mod feum;
pub mod imo;
pub mod schedule;
pub mod solver;
pub mod types;
pub mod usage;

pub use balance::{evaluate, ComplianceResult, SelectedRow};
pub use error::{GfiError, Result};
pub use factors::{build_reference_table, ReferenceTable};
pub use schedule::{Band, Schedule};
pub use solver::{
    solve_blend_outside, solve_refined, solve_single, solve_stepwise, Direction, SubstitutionStep,
};
pub use types::{
    Blend, CombustionFactors, FuelFactor, FuelId, Gwp, Meta, MetaVec, UsageRecord, GWP100,
};
pub use usage::Usage;

/// Library version
pub static VERSION: &str = env!("CARGO_PKG_VERSION");
