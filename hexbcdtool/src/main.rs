use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hexplay::HexViewBuilder;
use log::{debug, info, warn, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use hexbcd::*;

macro_rules! serialize_yaml {
    ($file:expr, $static_resource:expr) => {
        serde_yaml::from_str(
            &fs::read_to_string($file)
                .unwrap_or(String::from_utf8_lossy(include_bytes!($static_resource)).to_string()),
        )
    };
}

#[derive(Serialize, Deserialize, Debug)]
struct Settings {
    /// Digits per space separated group in printed output, 0 prints a single run.
    group_size: usize,
    /// Also print a hex view of binary data.
    hexdump: bool,
    /// Default for BCD encoding and padding when --allow-odd is not given.
    allow_odd: bool,
}

#[derive(Parser, Debug)]
#[command(name = "hexbcdtool", version, about = "Hex text and compressed BCD conversions")]
struct Cli {
    #[arg(long, value_name = "FILE", default_value = "config/settings.yaml")]
    settings: PathBuf,

    #[arg(long, value_name = "FILE", default_value = "config/log4rs.yaml")]
    log_config: PathBuf,

    /// Log everything to the console
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and normalize hex text
    Hex {
        text: String,
        /// Require an even number of digits
        #[arg(long)]
        even: bool,
    },
    /// Print the contents of a binary file as hex text
    Bin { file: PathBuf },
    /// Decode hex text with an even number of digits
    Unhex { text: String },
    /// Encode an integer as compressed BCD
    BcdEncode {
        value: u64,
        #[arg(long)]
        min_digits: Option<usize>,
        #[arg(long)]
        allow_odd: bool,
    },
    /// Decode a compressed BCD literal to an integer
    BcdDecode { text: String },
    /// Pad a compressed BCD literal with filler digits
    Pad {
        text: String,
        #[arg(long)]
        min_length: Option<usize>,
        #[arg(long)]
        allow_odd: bool,
    },
    /// Encode digits as an EMV compressed numeric (cn) element of SIZE bytes
    Cn { digits: String, size: usize },
    /// Encode digits as an EMV numeric (n) element of SIZE bytes
    N { digits: String, size: usize },
}

fn init_logging(log_config: &Path, verbose: bool) -> Result<()> {
    if !verbose && log_config.exists() {
        return log4rs::init_file(log_config, Default::default());
    }

    let level = if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };

    let stderr: ConsoleAppender = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;

    Ok(())
}

fn format_digits(digits: &str, group_size: usize) -> String {
    if group_size == 0 {
        return digits.to_string();
    }

    let mut output = String::with_capacity(digits.len() + digits.len() / group_size);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % group_size == 0 {
            output.push(' ');
        }
        output.push(c);
    }

    output
}

fn print_binary(settings: &Settings, data: &[u8]) {
    if settings.hexdump {
        println!("{}", HexViewBuilder::new(data).finish());
    }
}

fn print_element(settings: &Settings, data: &[u8]) {
    let hex = HexText::from_binary(data);
    println!("{}", format_digits(hex.as_str(), settings.group_size));
    print_binary(settings, data);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_config, cli.verbose).context("Could not initialize logging")?;

    let settings: Settings = serialize_yaml!(&cli.settings, "../config/settings.yaml")
        .with_context(|| format!("Invalid settings file {}", cli.settings.display()))?;
    debug!("Settings: {:?}", settings);

    match cli.command {
        Command::Hex { text, even } => {
            let hex: HexText = if even {
                EvenHexText::from_text(&text)?.into()
            } else {
                HexText::from_text(&text)?
            };

            if hex.len() % 2 == 1 {
                warn!("Odd number of hex digits, not convertible to binary");
            }

            println!("{}", format_digits(hex.as_str(), settings.group_size));
        }
        Command::Bin { file } => {
            let data =
                fs::read(&file).with_context(|| format!("Could not read {}", file.display()))?;
            info!("Read {} bytes from {}", data.len(), file.display());

            let hex = HexText::from_binary(&data);
            println!("{}", format_digits(hex.as_str(), settings.group_size));
            print_binary(&settings, &data);
        }
        Command::Unhex { text } => {
            let data = EvenHexText::from_text(&text)?.to_binary();
            println!("{}", HexViewBuilder::new(&data).finish());
        }
        Command::BcdEncode {
            value,
            min_digits,
            allow_odd,
        } => {
            let bcd =
                CompressedBcd::from_int(value, min_digits, Some(allow_odd || settings.allow_odd));
            println!("{}", format_digits(bcd.as_str(), settings.group_size));

            if let Ok(data) = bcd.to_binary() {
                print_binary(&settings, &data);
            }
        }
        Command::BcdDecode { text } => {
            let bcd = CompressedBcd::from_text(&text)?;
            println!("{}", bcd.to_u64()?);
        }
        Command::Pad {
            text,
            min_length,
            allow_odd,
        } => {
            let bcd = CompressedBcd::from_text(&text)?
                .pad(min_length, Some(allow_odd || settings.allow_odd));
            println!("{}", format_digits(bcd.as_str(), settings.group_size));
        }
        Command::Cn { digits, size } | Command::N { digits, size } if size == 0 => {
            bail!("Element size for {:?} must be at least one byte", digits);
        }
        Command::Cn { digits, size } => {
            let data = bcdutil::encode_cn(&digits, size)?;
            print_element(&settings, &data);
        }
        Command::N { digits, size } => {
            let data = bcdutil::encode_n(&digits, size)?;
            print_element(&settings, &data);
        }
    }

    Ok(())
}

fn main() {
    std::process::exit(match run() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    });
}
