use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

use delivery_eta::config::{self, Config};
use delivery_eta::estimate::{self, validate, ProximityValue, RawInput, SAMPLE_DATASET};
use delivery_eta::output;
use delivery_eta::tui;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_SERVER: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive estimator form (default if no subcommand)
    Tui,
    /// Estimate delivery time for one shipment
    Estimate(EstimateArgs),
    /// Print the sample dataset
    Sample,
    /// Serve the estimator over HTTP
    Serve {
        /// Address to listen on (defaults to server.bind from config)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Args, Debug, Default)]
struct EstimateArgs {
    /// Product category (Electronics, Clothing, Home & Kitchen, Books, Other)
    #[arg(long)]
    category: Option<String>,
    /// Customer location (Urban, Suburban, Rural)
    #[arg(long)]
    location: Option<String>,
    /// Shipping method (Standard, Express, Same-Day)
    #[arg(long)]
    method: Option<String>,
    /// Shipping priority (Normal, High, Urgent)
    #[arg(long)]
    priority: Option<String>,
    /// Weather conditions (Sunny, Rainy, Snowy, Stormy)
    #[arg(long)]
    weather: Option<String>,
    /// Package weight in kg (0.1 to 100.0)
    #[arg(long)]
    weight: Option<f64>,
    /// Package size (Small, Medium, Large)
    #[arg(long)]
    size: Option<String>,
    /// Distance in km (1 to 5000)
    #[arg(long)]
    distance: Option<f64>,
    /// Near a warehouse (yes/no)
    #[arg(long)]
    warehouse: Option<String>,
    /// Delivery type (Residential, Business)
    #[arg(long)]
    delivery: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl EstimateArgs {
    fn to_raw(&self) -> RawInput {
        RawInput {
            product_category: self.category.clone(),
            customer_location: self.location.clone(),
            shipping_method: self.method.clone(),
            shipping_priority: self.priority.clone(),
            weather: self.weather.clone(),
            package_weight: self.weight,
            package_size: self.size.clone(),
            distance: self.distance,
            warehouse_proximity: self.warehouse.clone().map(ProximityValue::Label),
            delivery_type: self.delivery.clone(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum OutputFormat {
    #[default]
    Text,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "delivery-eta")]
#[command(about = "Rule-based delivery time estimator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/delivery-eta/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    let default_level = if cli.verbose {
        "debug"
    } else if matches!(command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    if let Err(e) = delivery_eta::logging::init_logging(default_level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config_path = cli.config.map(PathBuf::from);
    std::process::exit(run(command, config_path).await);
}

async fn run(command: Commands, config_path: Option<PathBuf>) -> i32 {
    match command {
        // The wizard must work even when the current config is broken
        Commands::Init => run_init(config_path),
        Commands::Sample => {
            println!(
                "{}",
                output::format_sample_table(&SAMPLE_DATASET, output::should_use_colors())
            );
            EXIT_SUCCESS
        }
        Commands::Tui => match load_validated_config(config_path) {
            Ok(config) => run_tui(&config).await,
            Err(code) => code,
        },
        Commands::Estimate(args) => match load_validated_config(config_path) {
            Ok(config) => run_estimate(&config, &args),
            Err(code) => code,
        },
        Commands::Serve { bind } => match load_validated_config(config_path) {
            Ok(config) => run_serve(&config, bind).await,
            Err(code) => code,
        },
    }
}

fn load_validated_config(path: Option<PathBuf>) -> Result<Config, i32> {
    let config = config::load_config(path).map_err(|e| {
        eprintln!("Config error: {:#}", e);
        EXIT_CONFIG
    })?;

    // Validate config at startup
    if let Err(errors) = config.validate() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(EXIT_CONFIG);
    }

    Ok(config)
}

fn run_init(path: Option<PathBuf>) -> i32 {
    match config::run_init_wizard(path) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Init failed: {:#}", e);
            EXIT_CONFIG
        }
    }
}

async fn run_tui(config: &Config) -> i32 {
    let input = match config.default_input() {
        Ok(input) => input,
        Err(errors) => {
            eprintln!("Config errors:");
            eprintln!("{}", output::format_field_errors(&errors));
            return EXIT_CONFIG;
        }
    };

    // Read the background before raw mode takes over the terminal
    let theme = tui::resolve_theme(config.theme);
    let app = tui::App::new(input, tui::ThemeColors::for_theme(theme));

    match tui::run_tui(app).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Terminal error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

fn run_estimate(config: &Config, args: &EstimateArgs) -> i32 {
    let raw = args.to_raw().or(&config.merged_defaults());
    let input = match validate(&raw) {
        Ok(input) => input,
        Err(errors) => {
            eprintln!("Invalid input:");
            eprintln!("{}", output::format_field_errors(&errors));
            return EXIT_INPUT;
        }
    };

    let result = estimate::estimate(&input);
    tracing::debug!(?input, days = result.days, total = result.total, "Estimated");

    match args.format {
        OutputFormat::Text => {
            let use_colors = output::should_use_colors();
            println!("{}", output::format_estimate(&result, use_colors));
            println!();
            println!("{}", output::format_input_table(&input, use_colors));
            println!();
            println!("{}", output::format_breakdown(&result, use_colors));
        }
        OutputFormat::Tsv => println!("{}", output::format_tsv(&result)),
        OutputFormat::Json => match output::format_json(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to render JSON: {}", e);
                return EXIT_FAILURE;
            }
        },
    }

    EXIT_SUCCESS
}

async fn run_serve(config: &Config, bind: Option<String>) -> i32 {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let addr: SocketAddr = match bind.parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Invalid bind address '{}': {}", bind, e);
            return EXIT_CONFIG;
        }
    };

    match delivery_eta::server::serve(addr).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Server error: {:#}", e);
            EXIT_SERVER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("delivery-eta").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_command_is_tui() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_estimate_flags_become_raw_input() {
        let cli = parse(&[
            "estimate",
            "--method",
            "Same-Day",
            "--weight",
            "12.5",
            "--warehouse",
            "no",
            "--format",
            "json",
        ]);
        let Some(Commands::Estimate(args)) = cli.command else {
            panic!("expected estimate subcommand");
        };
        assert_eq!(args.format, OutputFormat::Json);

        let raw = args.to_raw();
        assert_eq!(raw.shipping_method.as_deref(), Some("Same-Day"));
        assert_eq!(raw.package_weight, Some(12.5));
        assert_eq!(
            raw.warehouse_proximity,
            Some(ProximityValue::Label("no".to_string()))
        );
        assert_eq!(raw.weather, None);
    }

    #[test]
    fn test_flags_override_config_defaults() {
        let config: Config = serde_saphyr::from_str("defaults:\n  shippingMethod: Express\n  distance: 600\n").unwrap();
        let args = EstimateArgs {
            distance: Some(1200.0),
            ..Default::default()
        };
        let input = validate(&args.to_raw().or(&config.merged_defaults())).unwrap();
        assert_eq!(input.shipping_method, estimate::ShippingMethod::Express);
        assert_eq!(input.distance.km(), 1200);
    }

    #[tokio::test]
    async fn test_sample_ignores_config() {
        let missing = PathBuf::from("/nonexistent/delivery-eta/config.yaml");
        assert_eq!(run(Commands::Sample, Some(missing)).await, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_estimate_exit_codes() {
        let missing = PathBuf::from("/nonexistent/delivery-eta/config.yaml");
        let code = run(Commands::Estimate(EstimateArgs::default()), Some(missing)).await;
        assert_eq!(code, EXIT_CONFIG);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "theme: dark\n").unwrap();

        let bad = EstimateArgs {
            method: Some("Teleport".to_string()),
            ..Default::default()
        };
        assert_eq!(run(Commands::Estimate(bad), Some(path.clone())).await, EXIT_INPUT);

        let good = EstimateArgs {
            format: OutputFormat::Tsv,
            ..Default::default()
        };
        assert_eq!(run(Commands::Estimate(good), Some(path)).await, EXIT_SUCCESS);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["serve", "--bind", "0.0.0.0:9000", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Serve { bind: Some(_) })));
    }
}
