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

// Author(s): Jihoon Kim <jhkim.e2e@gmail.com>

#[macro_use]
extern crate clap;

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::process::exit;

use clap::{App, AppSettings, Arg};
use failure::Error;
use failure::Fail;
use failure::ResultExt;

use gfifeu::*;

// Helpers ----------------------------------------------------------------------------------------

fn readfile(path: &Path) -> std::result::Result<String, Error> {
    let mut f = File::open(path).context(format!("File {} not found", path.display()))?;
    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .context("Could not read file")?;
    Ok(contents)
}

fn writefile(path: &Path, content: &[u8]) {
    let mut file = match File::create(&path) {
        Err(err) => panic!(
            "ERROR: could not write to \"{}\": {:?}",
            path.display(),
            err.cause()
        ),
        Ok(file) => file,
    };
    if let Err(err) = file.write_all(content) {
        panic!(
            "Could not write to {}: {:?}",
            path.display(),
            err.cause()
        )
    }
}

/// Load the usage file, failing loudly on IO or format errors
fn get_usage(path_str: &str) -> Usage {
    let path = Path::new(path_str);
    let usagestring = match readfile(path) {
        Ok(usagestring) => {
            println!("Fuel usage: \"{}\"", path.display());
            usagestring
        }
        Err(err) => {
            eprintln!(
                "ERROR: could not read the fuel usage file \"{}\" -> {}",
                path.display(),
                err.as_fail()
            );
            exit(exitcode::IOERR);
        }
    };
    usagestring.parse().unwrap_or_else(|error: GfiError| {
        eprintln!(
            "ERROR: wrong format of the fuel usage file \"{}\" ({})",
            path.display(),
            error
        );
        exit(exitcode::DATAERR);
    })
}

/// Reporting scheme, CLI arguments > usage metadata > default (FEUM)
fn get_scheme(usage: &Usage, matches: &clap::ArgMatches<'_>) -> String {
    if matches.occurrences_of("scheme") != 0 {
        let scheme = matches.value_of("scheme").unwrap().to_string();
        println!("Scheme (user): {}", scheme);
        scheme
    } else if let Some(scheme) = usage.get_meta("SCHEME") {
        if scheme != "FEUM" && scheme != "IMO" {
            eprintln!("ERROR: unknown scheme in usage metadata: {}", scheme);
            exit(exitcode::DATAERR);
        }
        println!("Scheme (metadata): {}", scheme);
        scheme
    } else {
        println!("Scheme (default): FEUM");
        "FEUM".to_string()
    }
}

/// Reporting year, CLI arguments > usage metadata
fn get_year(usage: &Usage, matches: &clap::ArgMatches<'_>) -> i32 {
    if matches.occurrences_of("year") != 0 {
        let year = value_t!(matches, "year", i32).unwrap_or_else(|error| {
            eprintln!("ERROR: the reporting year is not a valid number");
            if matches.occurrences_of("v") > 2 {
                println!("{}", error)
            };
            exit(exitcode::DATAERR);
        });
        println!("Reporting year (user): {}", year);
        year
    } else if let Some(year) = usage.get_meta_i32("YEAR") {
        println!("Reporting year (metadata): {}", year);
        year
    } else {
        eprintln!("ERROR: no reporting year given (use --year or a #META YEAR line)");
        exit(exitcode::USAGE);
    }
}

// FuelEU reporting -------------------------------------------------------------------------------

fn report_feum(usage: &Usage, result: &ComplianceResult, reference: &ReferenceTable, year: i32) {
    println!("\n** FuelEU Maritime result\n");
    println!("{}", asplain::result_to_plain(result));

    if result.is_deficit() {
        println!("\n** Substitution tonnage to reach the target (per fuel)\n");
        for factor in &reference.factors {
            if factor.fuel.is_blend() {
                let tons = solve_blend_outside(result, factor, reference).unwrap_or(0.0);
                if tons > 0.0 {
                    println!("  {} (outside): {:.2} t", factor.fuel, tons);
                }
            } else {
                let tons = solve_single(result, factor, Direction::Offset);
                if tons > 0.0 {
                    println!("  {} (inside): {:.2} t", factor.fuel, tons);
                }
            }
        }
        if let Ok(bio) = reference.get(FuelId::BioFame) {
            if let Ok(steps) = solve_stepwise(result, bio, Direction::Offset) {
                println!("\n** Stepwise displacement with {} (outside)\n", bio.fuel);
                for step in steps {
                    println!(
                        "  displacing {}: cap {:.2} t, required {:.2} t, booked {:.2} t",
                        step.fuel, step.theoretical_cap, step.actual_requirement, step.chosen
                    );
                }
            }
        }
    } else if result.balance > 0.0 {
        println!("\n** Pooling tonnage the surplus can absorb (per fuel)\n");
        for factor in &reference.factors {
            if factor.fuel.is_blend() || factor.wtw <= result.standard_intensity {
                continue;
            }
            let inside =
                solve_refined(&usage.udata, result, factor, feum::is_full_credit)
                    .unwrap_or(0.0);
            if inside > 0.0 {
                println!(
                    "  {}: {:.2} t inside, {:.2} t outside",
                    factor.fuel,
                    inside,
                    2.0 * inside
                );
            }
        }
        match feum::vlsfo_surplus_value_per_ton(reference, year) {
            Ok(value) if value > 0.0 => {
                let vlsfo_inside: f32 = usage
                    .udata
                    .iter()
                    .filter(|r| r.fuel == FuelId::Vlsfo)
                    .map(|r| r.inside)
                    .sum();
                if vlsfo_inside > 0.0 {
                    println!(
                        "\nSurplus value of pooled VLSFO: {:.0} EUR ({:.2} EUR/t over {:.2} t)",
                        value * vlsfo_inside,
                        value,
                        vlsfo_inside
                    );
                }
            }
            _ => {}
        }
    }
}

// IMO reporting ----------------------------------------------------------------------------------

fn report_imo(result: &ComplianceResult, reference: &ReferenceTable, year: i32) {
    println!("\n** IMO GFI result\n");
    println!("{}", asplain::result_to_plain(result));

    let assessment = match imo::assess(result.avg_intensity, result.total_energy, year) {
        Some(assessment) => assessment,
        None => {
            eprintln!("ERROR: no IMO GFI targets for year {}", year);
            exit(exitcode::DATAERR);
        }
    };
    println!("\n{}", asplain::tier_to_plain(&assessment));

    if assessment.tier != imo::Tier::Surplus {
        println!("\n** Offset tonnage to clear the deficits (per fuel)\n");
        for factor in &reference.factors {
            if factor.fuel.is_blend() {
                continue;
            }
            let t1 = imo::offset_tonnage(
                assessment.tier1_deficit,
                assessment.direct_target,
                factor,
            );
            let t2 = imo::offset_tonnage(assessment.tier2_deficit, assessment.base_target, factor);
            if t1 > 0.0 || t2 > 0.0 {
                println!("  {}: Tier 1 {:.2} t, Tier 2 {:.2} t", factor.fuel, t1, t2);
            }
        }
    } else if assessment.surplus > 0.0 {
        println!("\n** Tonnage the surplus can absorb at Tier 2 (per fuel)\n");
        for factor in &reference.factors {
            if factor.fuel.is_blend() {
                continue;
            }
            let tons = imo::absorb_tonnage(assessment.surplus, assessment.base_target, factor);
            if tons > 0.0 {
                println!("  {}: {:.2} t", factor.fuel, tons);
            }
        }
    }
}

// Main -------------------------------------------------------------------------------------------

fn main() {
    let matches = App::new("GfiFeu")
        .bin_name("gfifeu")
        .version(env!("CARGO_PKG_VERSION"))
        .author("
Copyright (c) 2025 Jihoon Kim <jhkim.e2e@gmail.com>

Licensed under the MIT license.

")
        .about("GfiFeu - Marine fuel GHG intensity compliance (IMO GFI / FuelEU Maritime).")
        .setting(AppSettings::NextLineHelp)
        .arg(Arg::with_name("usage_file")
            .value_name("USAGE_FILE")
            .help("Fuel usage definition file")
            .required_unless("showlicense")
            .takes_value(true)
            .display_order(1))
        .arg(Arg::with_name("scheme")
            .short("s")
            .long("scheme")
            .value_name("SCHEME")
            .possible_values(&["FEUM", "IMO"])
            .help("Compliance scheme the usage is evaluated against\n")
            .takes_value(true)
            .display_order(2))
        .arg(Arg::with_name("year")
            .short("y")
            .long("year")
            .value_name("YEAR")
            .help("Reporting year")
            .takes_value(true)
            .display_order(3))
        .arg(Arg::with_name("json_output")
            .long("json")
            .value_name("JSON_OUTPUT")
            .help("Output file for detailed results in JSON format")
            .takes_value(true))
        .arg(Arg::with_name("showlicense")
            .short("L")
            .long("license")
            .help("Show the program license (MIT)"))
        .arg(Arg::with_name("v")
            .short("v")
            .multiple(true)
            .help("Sets the level of verbosity"))
        .get_matches();

    if matches.is_present("showlicense") {
        println!(
            "
Copyright (c) 2025 Jihoon Kim

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the 'Software'), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in
all copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED 'AS IS', WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.

Author(s): Jihoon Kim <jhkim.e2e@gmail.com>"
        );
        exit(exitcode::OK);
    }

    // Prologue -----------------------------------------------------------------------------------

    let verbosity = matches.occurrences_of("v");

    if verbosity > 2 {
        println!("Options: ---------------------");
        println!("{:#?}", matches);
        println!("------------------------------");
    }

    println!("** Input data");

    let mut usage = get_usage(matches.value_of("usage_file").unwrap());

    if verbosity > 1 && !usage.umeta.is_empty() {
        println!("Usage metadata:");
        for meta in &usage.umeta {
            println!("  {}: {}", meta.key, meta.value);
        }
    }

    // Scheme and year, CLI arguments > usage metadata ---------------------------------------------
    let scheme = get_scheme(&usage, &matches);
    let year = get_year(&usage, &matches);
    usage.set_meta("SCHEME", &scheme);
    usage.set_meta("YEAR", &year.to_string());

    // Reference factors and target intensity ------------------------------------------------------
    let is_feum = scheme == "FEUM";
    let reference = if is_feum {
        feum::reference_table()
    } else {
        imo::reference_table()
    }
    .unwrap_or_else(|error| {
        eprintln!("ERROR: could not build the reference factor table ({})", error);
        exit(exitcode::SOFTWARE);
    });

    let standard = if is_feum {
        feum::standard_for(year)
    } else {
        imo::base_schedule().lookup(year)
    }
    .unwrap_or_else(|| {
        eprintln!("ERROR: no {} target intensity for year {}", scheme, year);
        exit(exitcode::DATAERR);
    });

    // Normalization and evaluation ----------------------------------------------------------------
    usage.normalize(&reference).unwrap_or_else(|error| {
        eprintln!("ERROR: could not normalize the fuel usage ({})", error);
        exit(exitcode::DATAERR);
    });

    if verbosity > 1 {
        println!("Normalized usage records:");
        for record in &usage.udata {
            println!("  {}", record);
        }
    }

    // the IMO measure has no exempt fuels
    let full_credit: fn(FuelId) -> bool = if is_feum { feum::is_full_credit } else { |_| false };

    let result = evaluate(&usage.udata, full_credit, standard).unwrap_or_else(|error| {
        eprintln!("ERROR: could not compute the compliance balance ({})", error);
        exit(exitcode::DATAERR);
    });

    // Results ------------------------------------------------------------------------------------
    if is_feum {
        report_feum(&usage, &result, &reference, year);
    } else {
        report_imo(&result, &reference, year);
    }

    // JSON output --------------------------------------------------------------------------------
    if matches.is_present("json_output") {
        let path = Path::new(matches.value_of_os("json_output").unwrap());
        if verbosity > 0 {
            println!("Results in JSON format: {:?}", path.display());
        }
        let json = serde_json::to_string_pretty(&result).unwrap_or_else(|error| {
            eprintln!("ERROR: could not convert the result to JSON");
            if verbosity > 2 {
                println!("{:?}", error)
            };
            exit(exitcode::DATAERR);
        });
        writefile(&path, json.as_bytes());
    }

    exit(exitcode::OK);
}
