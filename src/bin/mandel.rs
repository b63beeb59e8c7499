extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate smoothbrot;

use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error};
use log::debug;
use num::Complex;
use smoothbrot::scheduler::available_threads;
use smoothbrot::{Color, ColorRamp, Mandelbrot, PlaneBounds, RenderConfig};
use std::io::Write;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const DENSITY: &str = "density";
const LEFTUPPER: &str = "leftupper";
const RIGHTLOWER: &str = "rightlower";
const THREADS: &str = "threads";
const SINGLE_CORE: &str = "single-core";
const ITERATIONS: &str = "iterations";
const STOP_NORM: &str = "stop-norm";
const PALETTE: &str = "palette";
const INTERIOR: &str = "interior";
const QUIET: &str = "quiet";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get().max(1);

    App::new("mandel")
        .version("0.1.0")
        .about("Smooth-coloured Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(DENSITY)
                .long(DENSITY)
                .short("d")
                .takes_value(true)
                .default_value("500")
                .validator(|s| {
                    validate_range(
                        &s,
                        0.001_f64,
                        1e6_f64,
                        "Could not parse pixel density",
                        "Pixel density must be between 0.001 and 1000000",
                    )
                })
                .help("Pixels per unit of the complex plane"),
        )
        .arg(
            Arg::with_name(LEFTUPPER)
                .long(LEFTUPPER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.7,1.25")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left upper corner"))
                .help("Left upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTLOWER)
                .long(RIGHTLOWER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.7,-1.25")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right lower corner"))
                .help("Right lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iterations before a point is considered inside the set"),
        )
        .arg(
            Arg::with_name(STOP_NORM)
                .long(STOP_NORM)
                .takes_value(true)
                .default_value("400")
                .validator(|s| {
                    validate_range(
                        &s,
                        1.000_001_f64,
                        1e300_f64,
                        "Could not parse stop norm",
                        "Stop norm must be greater than 1",
                    )
                })
                .help("Squared magnitude at which an orbit has escaped"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver (default: one per core)"),
        )
        .arg(
            Arg::with_name(SINGLE_CORE)
                .long(SINGLE_CORE)
                .conflicts_with(THREADS)
                .help("Render on the calling thread only"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("0,0,40;0,50,100;0,200,0;255,255,100;255,255,255")
                .validator(|s| match ColorRamp::parse_stops(&s) {
                    Ok(ref stops) if stops.len() >= 2 => Ok(()),
                    Ok(_) => Err("The palette needs at least 2 colours".to_string()),
                    Err(e) => Err(e),
                })
                .help("Colour stops as r,g,b;r,g,b;..."),
        )
        .arg(
            Arg::with_name(INTERIOR)
                .long(INTERIOR)
                .takes_value(true)
                .default_value("0,0,0")
                .validator(|s| Color::from_str(&s).map(|_| ()))
                .help("Colour of points inside the set, as r,g,b"),
        )
        .arg(
            Arg::with_name(QUIET)
                .long(QUIET)
                .short("q")
                .help("Do not print progress"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    let raw = matches
        .value_of(name)
        .ok_or_else(|| format_err!("Missing value for --{}", name))?;
    T::from_str(raw).map_err(|_| format_err!("Could not parse --{} '{}'", name, raw))
}

fn corner(matches: &ArgMatches, name: &str) -> Result<Complex<f64>, Error> {
    let raw = matches
        .value_of(name)
        .ok_or_else(|| format_err!("Missing value for --{}", name))?;
    parse_complex(raw).ok_or_else(|| format_err!("Could not parse --{} '{}'", name, raw))
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let leftupper = corner(matches, LEFTUPPER)?;
    let rightlower = corner(matches, RIGHTLOWER)?;
    let config = RenderConfig {
        density: value(matches, DENSITY)?,
        bounds: PlaneBounds {
            left: leftupper.re,
            right: rightlower.re,
            top: leftupper.im,
            bottom: rightlower.im,
        },
        max_iterations: value(matches, ITERATIONS)?,
        stop_norm: value(matches, STOP_NORM)?,
    };
    let stops = ColorRamp::parse_stops(matches.value_of(PALETTE).unwrap_or_default())
        .map_err(|e| format_err!("{}", e))?;
    let interior: Color = value::<String>(matches, INTERIOR)?
        .parse()
        .map_err(|e: String| format_err!("{}", e))?;
    let ramp = ColorRamp::new(stops, interior)?;
    debug!("{:?}", config);

    let mut fractal = Mandelbrot::new(config, ramp)?;
    let quiet = matches.is_present(QUIET);
    let stats = if matches.is_present(SINGLE_CORE) {
        fractal.compute_single_core()
    } else {
        let threads = if matches.is_present(THREADS) {
            value(matches, THREADS)?
        } else {
            available_threads()
        };
        fractal.compute_multi_core(threads, |percent| {
            if !quiet {
                eprint!("\rProcessing... {}%", percent);
                let _ = std::io::stderr().flush();
            }
        })?
    };
    if !quiet {
        eprintln!();
    }

    println!(
        "Fractal produced in {:.3} seconds ({:.1} nsec/pixel)",
        stats.elapsed.as_secs_f64(),
        stats.nanos_per_pixel()
    );

    let output = value::<String>(matches, OUTPUT)?;
    smoothbrot::export::write_png(fractal.raster(), &output)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
