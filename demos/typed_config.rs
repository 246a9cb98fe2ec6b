//! Reading PDL into Rust types through serde.
//!
//! Run with: cargo run --example typed_config

use pdl::{from_args, from_parameters, from_str, parse_str};
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct Config {
    name: String,
    workers: u32,
    #[serde(default)]
    verbose: bool,
    mode: Mode,
    endpoints: Vec<Endpoint>,
}

#[derive(Debug, Deserialize)]
enum Mode {
    Batch,
    Throttled { per_second: u32 },
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    url: String,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct Cli {
    file000: String,
    #[serde(default)]
    dry: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config: Config = from_str(
        r#"{
            name = "ingest";
            workers = 8;
            mode = { Throttled = { per_second = 200; }; };
            endpoints = ({ url = "https://a.example"; weight = 1; },
                         { url = "https://b.example"; weight = 0.5; });
        }"#,
    )?;
    println!("{config:#?}");

    let batch = parse_str(r#"{name="nightly"; workers=2; mode="Batch"; endpoints=();}"#)?;
    let batch: Config = from_parameters(&batch)?;
    println!("{batch:#?}");

    let cli: Cli = from_parameters(&from_args(["-dry", "input.pdl"]))?;
    println!("{cli:?}");

    Ok(())
}
