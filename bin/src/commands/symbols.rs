//! Symbols command implementation.

use super::open_store;
use anyhow::Result;
use pairscope_lib::prelude::*;

/// List the distinct symbols in the current snapshot.
pub(crate) fn list_symbols(config: &StoreConfig) -> Result<()> {
    let store = open_store(config)?;
    let symbols = store.symbols(config.snapshot_limit)?;

    if symbols.is_empty() {
        println!("No symbols found.");
        return Ok(());
    }

    for symbol in &symbols {
        println!("{symbol}");
    }
    println!("\nTotal: {} symbols", symbols.len());
    Ok(())
}
