//! Loading rules from a JSON document

use formgate_validator::prelude::*;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "valueHosts": [
        { "name": "contact_by" },
        {
            "name": "phone",
            "label": "Phone",
            "validatorConfigs": [{
                "conditionConfig": {
                    "conditionType": "When",
                    "enabler": {
                        "conditionType": "EqualToValue",
                        "valueHostName": "contact_by",
                        "secondValue": "phone"
                    },
                    "child": { "conditionType": "RequireText" }
                },
                "errorMessage": "{Label} is required when contacting by phone"
            }]
        }
    ]
}"#;

fn main() -> Result<(), ConfigError> {
    // RUST_LOG=formgate_validator=debug shows each validator decision.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut manager = ValidationManager::from_json_str(CONFIG, ValidationServices::new())?;
    manager.on_validation_state_changed(|state| {
        println!("→ {} is now {:?}", state.value_host_name, state.status);
    });

    for contact_by in ["email", "phone"] {
        manager.set_value("contact_by", contact_by)?;
        let state = manager.validate("phone", ValidateOptions::default())?.state;
        for issue in &state.issues_found {
            println!("✗ {}", issue.error_message);
        }
    }

    println!("fields reading contact_by: {:?}", manager.dependents_of("contact_by")?);
    Ok(())
}
