//! Basic usage example for formgate-validator

use formgate_validator::prelude::*;

fn main() -> Result<(), ConfigError> {
    let config = ValueHostsBuilder::new()
        .input("email")?
        .label("Email")
        .require_text()
        .error_message("{Label} is required")
        .regexp(".+@.+")
        .error_message("{Label} '{Value}' is not an address")
        .build()?;

    let mut manager = ValidationManager::new(config, ValidationServices::new())?;

    for value in ["", "ada", "ada@example.com"] {
        manager.set_value("email", value)?;
        let state = manager.validate("email", ValidateOptions::default())?.state;
        match state.issues_found.first() {
            None => println!("✓ '{value}' is {:?}", state.status),
            Some(issue) => println!("✗ '{value}': {}", issue.error_message),
        }
    }

    Ok(())
}
