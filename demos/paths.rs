//! Building a tree with paths, lists and deep merges.
//!
//! Run with: cargo run --example paths

use pdl::{parse_str, to_string_cooked, Parameters};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut params = Parameters::new();
    params.put("db/host", "localhost")?;
    params.put("db/ports[]", 5432)?;
    params.put("db/ports[]", 5433)?;
    params.put("db/replicas[]/host", "replica-1")?;
    params.put("db/replicas[0]/lag", 0.25)?;
    println!("Built:\n{}\n", to_string_cooked(&params));

    // Overrides: `db` gains a plain value next to its children.
    let overrides = parse_str(r#"{db="primary"; cache={size=512;};}"#)?;
    params.merge_deep(&overrides);
    println!("Merged:\n{}\n", to_string_cooked(&params));
    println!("db/$default$ = {:?}", params.get_str("db/$default$"));

    params.remove("db/ports[1]");
    params.remove("cache");
    println!("\nTrimmed:\n{}", to_string_cooked(&params));

    match params.put("db/ports[7]", 1) {
        Ok(()) => println!("unexpected success"),
        Err(err) => println!("\nRejected write: {err}"),
    }

    Ok(())
}
