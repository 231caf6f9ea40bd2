use anyhow::{Context, Result};
use std::io::{BufRead, IsTerminal, Write};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config, ServerConfig, ThemeMode, DEFAULT_BIND};
use crate::estimate::{
    validate, Choice, CustomerLocation, DeliveryType, Field, InputSpec, PackageSize,
    PackageWeight, ProductCategory, RawInput, ShippingMethod, ShippingPriority, Weather,
};

/// Line-oriented prompts over any reader/writer pair, so the wizard can be
/// driven by a script in tests.
struct Prompter<R, W> {
    input: R,
    output: W,
    animate: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed before the wizard finished");
        }
        Ok(line.trim().to_string())
    }

    /// Prompt user with a message and a default value. Returns default if input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Prompt user with a yes/no question. Returns bool based on input and default.
    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?;
        let input = input.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Print text with a typewriter effect, one character at a time.
    fn typewriter(&mut self, text: &str) -> Result<()> {
        if !self.animate {
            return self.say(text);
        }
        for c in text.chars() {
            write!(self.output, "{}", c)?;
            self.output.flush().ok();
            std::thread::sleep(std::time::Duration::from_millis(18));
        }
        writeln!(self.output)?;
        Ok(())
    }
}

/// Accepted values for a field, shown next to its prompt.
fn field_hint(field: Field) -> String {
    match field {
        Field::ProductCategory => ProductCategory::labels().join(", "),
        Field::CustomerLocation => CustomerLocation::labels().join(", "),
        Field::ShippingMethod => ShippingMethod::labels().join(", "),
        Field::ShippingPriority => ShippingPriority::labels().join(", "),
        Field::Weather => Weather::labels().join(", "),
        Field::PackageWeight => format!("{} to {}", PackageWeight::MIN, PackageWeight::MAX),
        Field::PackageSize => PackageSize::labels().join(", "),
        Field::Distance => format!(
            "{} to {}",
            crate::estimate::Distance::MIN,
            crate::estimate::Distance::MAX
        ),
        Field::WarehouseProximity => "Yes, No".to_string(),
        Field::DeliveryType => DeliveryType::labels().join(", "),
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `path` is Some, the config is written there; otherwise to the default
/// config path. Returns the path written, or None if the user kept an
/// existing file.
pub fn run_init_wizard(path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };
    let animate = std::io::stdout().is_terminal();
    let mut prompter = Prompter {
        input: std::io::stdin().lock(),
        output: std::io::stdout(),
        animate,
    };

    if config_path.exists() {
        let overwrite = prompter.prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            prompter.say("Aborted.")?;
            return Ok(None);
        }
    }

    let config = collect_config(&mut prompter)?;
    save_config(&config_path, &config)?;

    prompter.say("")?;
    prompter.say(&format!("Config written to {}", config_path.display()))?;
    prompter.say("Run `delivery-eta` to get started.")?;
    Ok(Some(config_path))
}

fn collect_config<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<Config> {
    prompter.say("")?;
    prompter.typewriter("Delivery ETA Configuration Wizard")?;
    prompter.say("=================================")?;
    prompter.say("")?;

    // 1. Theme
    let theme = loop {
        let input = prompter.prompt_with_default("Theme (auto, dark, light)", "auto")?;
        match input.parse::<ThemeMode>() {
            Ok(theme) => break theme,
            Err(e) => prompter.say(&format!("  Invalid: {}. Try again.", e))?,
        }
    };

    // 2. Server bind address
    prompter.say("")?;
    prompter.typewriter("`delivery-eta serve` answers POST /estimate on this address.")?;
    let bind = loop {
        let input = prompter.prompt_with_default("Server bind address", DEFAULT_BIND)?;
        match input.parse::<SocketAddr>() {
            Ok(_) => break input,
            Err(e) => prompter.say(&format!("  Invalid: {}. Try again.", e))?,
        }
    };

    // 3. Form defaults
    prompter.say("")?;
    prompter.typewriter("The form starts from built-in defaults. You can pick your own starting values.")?;
    let defaults = if prompter.prompt_yes_no("Set default form values?", false)? {
        collect_defaults(prompter)?
    } else {
        RawInput::default()
    };

    Ok(Config {
        theme,
        server: ServerConfig { bind },
        defaults,
    })
}

/// Prompt for each field, re-prompting until the value is valid.
/// Only values that differ from the built-in defaults are kept.
fn collect_defaults<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<RawInput> {
    let builtin = RawInput::from(&InputSpec::FORM_DEFAULTS);
    let builtin_input = InputSpec::FORM_DEFAULTS;
    let mut defaults = RawInput::default();

    for field in Field::ALL {
        let current = builtin_input.value_label(field);
        loop {
            let text = prompter.prompt_with_default(
                &format!("  {} ({})", field.label(), field_hint(field)),
                &current,
            )?;

            let mut candidate = defaults.clone();
            if let Err(e) = candidate.set_text(field, &text) {
                prompter.say(&format!("  Invalid: {}. Try again.", e.problem))?;
                continue;
            }

            match validate(&candidate.clone().or(&builtin)) {
                Ok(input) => {
                    if input.value_label(field) != current {
                        defaults = candidate;
                    }
                    break;
                }
                Err(errors) => {
                    match errors.iter().find(|e| e.field == field) {
                        Some(e) => prompter.say(&format!("  Invalid: {}. Try again.", e.problem))?,
                        None => break,
                    }
                }
            }
        }
    }

    Ok(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scripted(lines: &[&str]) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        let script = lines.iter().map(|l| format!("{}\n", l)).collect::<String>();
        Prompter {
            input: Cursor::new(script.into_bytes()),
            output: Vec::new(),
            animate: false,
        }
    }

    #[test]
    fn test_accept_all_defaults() {
        let mut prompter = scripted(&["", "", ""]);
        let config = collect_config(&mut prompter).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_reprompts_on_invalid_theme_and_bind() {
        let mut prompter = scripted(&["neon", "dark", "nowhere", "0.0.0.0:9000", "n"]);
        let config = collect_config(&mut prompter).unwrap();
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.server.bind, "0.0.0.0:9000");

        let output = String::from_utf8(prompter.output).unwrap();
        assert_eq!(output.matches("Invalid:").count(), 2);
    }

    #[test]
    fn test_custom_defaults_keep_only_changes() {
        let mut prompter = scripted(&[
            "",          // theme
            "",          // bind
            "y",         // set defaults
            "",          // category
            "rural",     // location
            "Overnight", // method (invalid)
            "express",   // method
            "",          // priority
            "",          // weather
            "heavy",     // weight (not a number)
            "200",       // weight (out of range)
            "12.5",      // weight
            "",          // size
            "1200.5",    // distance (not whole)
            "1200",      // distance
            "",          // warehouse
            "",          // delivery
        ]);
        let config = collect_config(&mut prompter).unwrap();

        assert_eq!(config.defaults.customer_location, Some("rural".to_string()));
        assert_eq!(config.defaults.shipping_method, Some("express".to_string()));
        assert_eq!(config.defaults.package_weight, Some(12.5));
        assert_eq!(config.defaults.distance, Some(1200.0));
        assert!(config.defaults.product_category.is_none());
        assert!(config.defaults.weather.is_none());
        assert!(config.validate().is_ok());

        let output = String::from_utf8(prompter.output).unwrap();
        assert_eq!(output.matches("Invalid:").count(), 4);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut prompter = scripted(&[]);
        assert!(collect_config(&mut prompter).is_err());
    }
}
