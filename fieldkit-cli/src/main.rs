use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fieldkit::io::load_field_options;
use fieldkit::types::date::{MAX_DATE, MIN_DATE, NO_ROUNDING, offset};
use fieldkit::{Field, FieldConfig, FieldOptions, TextControl};

#[derive(Debug, Parser)]
#[command(
    name = "fieldkit",
    version,
    about = "Resolve relative dates and check field values from the terminal"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Date used as "today" (YYYY-MM-DD); defaults to the local date
    #[arg(long = "today", value_name = "DATE", global = true, value_parser = parse_today)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve an offset expression such as "-5y+4d" to MM/DD/YYYY
    Offset {
        #[arg(value_name = "EXPR", allow_hyphen_values = true)]
        expr: String,

        /// Plain calendar arithmetic, no snapping to unit boundaries
        #[arg(long = "no-rounding")]
        no_rounding: bool,
    },
    /// Convert a date between YYYY-MM-DD and MM/DD/YYYY
    Convert {
        #[arg(value_name = "VALUE")]
        value: String,

        #[arg(long = "to", value_enum, default_value_t = Target::Display)]
        to: Target,
    },
    /// Bind a headless field, type VALUE into it and validate
    Check {
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,

        /// Field options document (JSON/YAML/TOML by extension)
        #[arg(short = 'o', long = "options", value_name = "PATH")]
        options: Option<PathBuf>,

        /// Field type, overriding the options document
        #[arg(short = 't', long = "type", value_name = "NAME")]
        type_name: Option<String>,

        #[arg(long = "min-date", value_name = "EXPR", allow_hyphen_values = true)]
        min_date: Option<String>,

        #[arg(long = "max-date", value_name = "EXPR", allow_hyphen_values = true)]
        max_date: Option<String>,

        #[arg(long = "required")]
        required: bool,

        /// Print the outcome as JSON
        #[arg(long = "json")]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    Display,
    Storage,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    match cli.command {
        Command::Offset { expr, no_rounding } => {
            let rounding = if no_rounding {
                offset::Rounding::Exact
            } else {
                offset::Rounding::Snap
            };
            let resolved = offset::parse_offset_date(&expr, today, rounding)
                .ok_or_else(|| eyre!("'{expr}' is neither an offset nor a YYYY-MM-DD date"))?;
            println!("{resolved}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Convert { value, to } => {
            let converted = match to {
                Target::Display => offset::storage_to_display(&value),
                Target::Storage => offset::display_to_storage(&value),
            };
            if converted.is_empty() {
                return Err(eyre!("'{value}' is not a valid date in the source format"));
            }
            println!("{converted}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            value,
            options,
            type_name,
            min_date,
            max_date,
            required,
            json,
        } => {
            let mut options = match options {
                Some(path) => load_field_options(&path)
                    .map_err(|err| eyre!("{err:#}"))
                    .wrap_err("failed to load field options")?,
                None => FieldOptions::default(),
            };
            if let Some(name) = type_name {
                options.type_name = Some(name);
            }
            for (key, expr) in [(MIN_DATE, min_date), (MAX_DATE, max_date)] {
                if let Some(expr) = expr {
                    options.attributes.insert(key.to_string(), expr);
                }
            }
            options.require |= required;
            check(value, options, today, json)
        }
    }
}

fn check(value: String, options: FieldOptions, today: NaiveDate, json: bool) -> Result<ExitCode> {
    let mut field = Field::builder(TextControl::new())
        .with_options(options)
        .with_config(FieldConfig::default().with_today(today))
        .bind()?;
    field.control_mut().set_text(&value);
    field.on_change();
    let valid = field.validate(false);
    tracing::debug!(r#type = field.type_name(), valid, "checked value");

    if json {
        let report = json!({
            "valid": valid,
            "type": field.type_name(),
            "value": field.get(),
            "error": field.error(),
            "rounding": !field.options().toggle_attribute(NO_ROUNDING),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(error) = field.error() {
        println!("invalid: {error}");
    } else {
        println!("valid: {}", field.get());
    }

    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn parse_today(raw: &str) -> Result<NaiveDate, String> {
    offset::parse_storage(raw).ok_or_else(|| format!("expected YYYY-MM-DD, got '{raw}'"))
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
