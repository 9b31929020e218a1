use clap::Subcommand;
use countdown_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dotted path, e.g. `ui.bar_width` or `presets.0.seconds`
        key: String,
    },
    /// Change one setting and write the file
    Set {
        key: String,
        /// Read according to the type of the current value
        value: String,
    },
    /// Dump every setting as JSON
    List,
    /// Overwrite the file with built-in defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("no setting named '{key}'"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            // Echo what was stored, which may differ in form from the input.
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("settings restored to defaults");
        }
    }
    Ok(())
}
