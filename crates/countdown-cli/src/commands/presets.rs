use countdown_core::render::{active_preset, format_time};
use countdown_core::Config;
use serde_json::json;

/// List presets; the one matching `default_seconds` is marked active.
pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let active = active_preset(&config.presets, config.default_seconds);

    if json {
        let listed: Vec<_> = config
            .presets
            .iter()
            .enumerate()
            .map(|(i, p)| {
                json!({
                    "label": p.label,
                    "seconds": p.seconds,
                    "active": active == Some(i),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    for (i, preset) in config.presets.iter().enumerate() {
        let marker = if active == Some(i) { '*' } else { ' ' };
        println!(
            "{marker}{:>2}. {:<16} {}",
            i + 1,
            preset.label,
            format_time(preset.seconds)
        );
    }
    Ok(())
}
