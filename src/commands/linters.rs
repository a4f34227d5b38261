//! Implementation of the `difflint linters` command.

use crate::error::Result;
use crate::exit_codes;
use crate::linters::REGISTRY;

/// Print the linter registry.
pub fn cmd_linters() -> Result<i32> {
    println!("{:<12} {:<8} {:<8} DESCRIPTION", "ID", "LANGUAGE", "STYLE");
    for spec in REGISTRY {
        println!(
            "{:<12} {:<8} {:<8} {}",
            spec.id,
            spec.language.to_string(),
            spec.style.to_string(),
            spec.description
        );
        println!("{:<30} default files: {}", "", spec.default_filefilter.join(", "));
    }
    Ok(exit_codes::SUCCESS)
}
