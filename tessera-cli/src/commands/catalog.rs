use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tessera::AggregationRegistry;

/// Print every registered aggregation type and its parameters
pub fn run_aggregations(verbose: bool) -> Result<()> {
    let registry = AggregationRegistry::global();

    println!();
    println!("Aggregation types ({})", registry.len());
    println!("--------------------------------------------------------------------------------");
    for def in registry.list() {
        println!("  {:<20} {}", def.id, def.display_name);
        if verbose {
            println!("      {}", def.description);
        }
        for param in &def.parameters {
            let required = if param.required { " (required)" } else { "" };
            println!("      - {:<22} {:?}{}", param.id, param.rule, required);
        }
    }
    println!();
    Ok(())
}

/// Validate `values` (a JSON object) against aggregation type `type_id`
pub fn run_validate(type_id: &str, values: &str) -> Result<()> {
    let values: Map<String, Value> = serde_json::from_str(values)
        .with_context(|| format!("--values must be a JSON object, got {}", values))?;

    AggregationRegistry::global().validate(type_id, &values)?;
    println!("OK: {} {}", type_id, Value::Object(values));
    Ok(())
}
