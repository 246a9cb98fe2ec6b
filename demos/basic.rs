//! Parse, query and write a PDL document.
//!
//! Run with: cargo run --example basic

use pdl::{parse_str, to_string, to_string_cooked, Value};
use std::error::Error;

const DOCUMENT: &str = r#"
// Render farm settings
{
    name = "render farm";
    retries = 3;
    ratio = 0.75;
    secret = #de ad be ef;
    output = @"C:\renders\""nightly""";
    servers = ({ host = "alpha"; port = 80; }, { host = "beta"; port = 0x1F90; });
}
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let params = parse_str(DOCUMENT)?;

    println!("name:    {}", params.get_string("name", "unnamed"));
    println!("retries: {}", params.get_i64("retries", 1));
    println!("timeout: {} (default)", params.get_f64("timeout", 30.0));
    println!("output:  {}", params.get_string("output", ""));
    println!("beta:    {}", params.get_i64("servers[1]/port", 0));

    if let Some(Value::Bytes(secret)) = params.get("secret") {
        println!("secret:  {} bytes", secret.len());
    }

    println!("\nCanonical:\n{}", to_string(&params));
    println!("\nCooked:\n{}", to_string_cooked(&params));
    println!("\nHash: {}", params.structural_hash());

    Ok(())
}
