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

#[test]
fn feum_surplus() {
    assert_cli::Assert::main_binary()
        .with_args(&["test_data/feum_surplus.txt"])
        .stdout()
        .contains("Scheme (metadata): FEUM")
        .stdout()
        .contains("Total energy [MJ]: 150.00")
        .stdout()
        .contains("Total emission [tCO2eq]: 0.0105")
        .stdout()
        .contains("Average GHG intensity [gCO2eq/MJ]: 70.0000")
        .stdout()
        .contains("Target GHG intensity [gCO2eq/MJ]: 89.3368")
        .stdout()
        .contains("Compliance balance [tCO2eq]: 0.0029")
        .stdout()
        .contains("Status: SURPLUS")
        .stdout()
        .contains("Pooling tonnage the surplus can absorb")
        .unwrap();
}

#[test]
fn feum_deficit() {
    assert_cli::Assert::main_binary()
        .with_args(&["test_data/feum_deficit.txt"])
        .stdout()
        .contains("Status: DEFICIT")
        .stdout()
        .contains("Substitution tonnage to reach the target")
        .stdout()
        .contains("Bio(Fame) (inside):")
        .stdout()
        .contains("Stepwise displacement with Bio(Fame)")
        .unwrap();
}

#[test]
fn feum_deficit_year_override() {
    // 2050 target (18.23) puts every fossil mix even deeper in deficit
    assert_cli::Assert::main_binary()
        .with_args(&["test_data/feum_deficit.txt", "--year", "2050"])
        .stdout()
        .contains("Reporting year (user): 2050")
        .stdout()
        .contains("Status: DEFICIT")
        .unwrap();
}

#[test]
fn imo_tier1() {
    assert_cli::Assert::main_binary()
        .with_args(&["test_data/imo_tier1.txt"])
        .stdout()
        .contains("Scheme (metadata): IMO")
        .stdout()
        .contains("Tier: Tier 1")
        .stdout()
        .contains("Offset tonnage to clear the deficits")
        .unwrap();
}

#[test]
fn missing_usage_file() {
    assert_cli::Assert::main_binary()
        .with_args(&["test_data/no_such_file.txt"])
        .fails()
        .stderr()
        .contains("ERROR")
        .unwrap();
}
