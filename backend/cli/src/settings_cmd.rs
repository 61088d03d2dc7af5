//! `chatrelay settings` and `chatrelay config`.

use anyhow::Result;

use chatrelay_config::{redacted_config, validate, JsonFileBackend, RelayConfig, SettingsBackend, SettingsMap};

/// Print the persisted settings file as pretty JSON.
pub async fn print_settings(config: &RelayConfig) -> Result<()> {
    let backend = JsonFileBackend::new(&config.settings_file);
    let settings = backend.load().await?.unwrap_or_default();
    println!("{}", render_settings(&settings)?);
    Ok(())
}

fn render_settings(settings: &SettingsMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(settings)?)
}

/// Print the effective configuration with secrets redacted, then any findings.
pub fn print_config(config: &RelayConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&redacted_config(config))?);

    let report = validate(config);
    for w in &report.warnings {
        println!("warning: {}: {}", w.path, w.message);
    }
    for e in &report.errors {
        println!("error: {}: {}", e.path, e.message);
    }
    if report.is_valid() {
        println!("config ok");
    }
    Ok(())
}
