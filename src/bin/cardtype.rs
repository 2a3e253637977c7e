//! CLI tool for card type identification.
//!
//! # Usage
//!
//! ```bash
//! # Identify a card type
//! cardtype resolve 4111111111111111
//!
//! # Validate a number against a given card type
//! cardtype validate 378282246310005 --card american-express
//!
//! # Validate a security code
//! cardtype code 1234 --card american-express
//!
//! # Format a card number (card type resolved when --card is omitted)
//! cardtype format 4111111111111111
//!
//! # Use extra card types from a JSON file, and only those
//! cardtype --profiles cards.json --registered-only list
//!
//! # Also require a passing Luhn checksum
//! cardtype --luhn validate 4111111111111111 --card visa
//! ```
//!
//! Exit status is 0 on success, 1 when the number does not resolve or fails
//! validation, and 2 when the profiles cannot be loaded or the card type is
//! unknown.

use std::path::PathBuf;
use std::process::exit;

use cc_cardtype::format::{format_with_pattern, format_with_separator};
use cc_cardtype::source::JsonSource;
use cc_cardtype::{CardProfile, Luhn, Resolver, Validator};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cardtype")]
#[command(author, version, about = "Payment card type identification tool")]
struct Cli {
    /// JSON file with additional card profiles
    #[arg(short, long, global = true)]
    profiles: Option<PathBuf>,

    /// Search only the profiles from --profiles, not the built-in ones
    #[arg(long, global = true)]
    registered_only: bool,

    /// Require a passing Luhn checksum for profiles that ask for one
    #[arg(long, global = true)]
    luhn: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the card type of a number
    Resolve {
        /// Card number (spaces and dashes allowed)
        card_number: String,
    },

    /// Validate a number against a card type
    Validate {
        /// Card number to validate
        card_number: String,

        /// Card type alias, e.g. "visa"
        #[arg(short, long)]
        card: String,
    },

    /// Validate a security code against a card type
    Code {
        /// Security code to validate
        code: String,

        /// Card type alias, e.g. "visa"
        #[arg(short, long)]
        card: String,
    },

    /// Format a card number at its card type's breakpoints
    Format {
        /// Card number to format
        card_number: String,

        /// Card type alias; resolved from the number when omitted
        #[arg(short, long)]
        card: Option<String>,

        /// Separator to use
        #[arg(short, long, default_value = " ")]
        separator: String,

        /// Use the regex formatter
        #[arg(long)]
        regex: bool,
    },

    /// List the card types searched, in resolution order
    List,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let resolver = build_resolver(&cli);

    match &cli.command {
        Commands::Resolve { card_number } => cmd_resolve(&resolver, card_number, cli.output),
        Commands::Validate { card_number, card } => {
            let profile = find_profile(&resolver, card, cli.output);
            cmd_validate(&resolver, profile, card_number, cli.output);
        }
        Commands::Code { code, card } => {
            let profile = find_profile(&resolver, card, cli.output);
            cmd_code(&resolver, profile, code, cli.output);
        }
        Commands::Format {
            card_number,
            card,
            separator,
            regex,
        } => {
            let profile = match card {
                Some(alias) => find_profile(&resolver, alias, cli.output),
                None => match resolver.resolve(card_number.as_str()) {
                    Ok(Some(profile)) => profile,
                    Ok(None) => fail(cli.output, "Card type not recognized", 1),
                    Err(e) => fail(cli.output, &e.to_string(), 2),
                },
            };
            cmd_format(profile, card_number, separator, *regex, cli.output);
        }
        Commands::List => cmd_list(&resolver, cli.output),
    }
}

fn build_resolver(cli: &Cli) -> Resolver {
    let mut resolver = if cli.registered_only {
        Resolver::registered_only()
    } else {
        Resolver::new()
    };
    if cli.luhn {
        resolver = resolver.with_validator(Validator::with_checksum(Luhn));
    }
    if let Some(path) = &cli.profiles {
        resolver = match resolver.with_source(&JsonSource::new(path)) {
            Ok(resolver) => resolver,
            Err(e) => fail(cli.output, &e.to_string(), 2),
        };
    }
    resolver
}

fn find_profile<'r>(resolver: &'r Resolver, alias: &str, output: OutputFormat) -> &'r CardProfile {
    resolver
        .find(alias)
        .unwrap_or_else(|| fail(output, &unknown_card_type(alias), 2))
}

fn unknown_card_type(alias: &str) -> String {
    format!("unknown card type \"{}\"", alias)
}

fn render_error(output: OutputFormat, message: &str) -> String {
    match output {
        OutputFormat::Text => format!("Error: {}", message),
        OutputFormat::Json => json!({ "error": message }).to_string(),
    }
}

fn fail(output: OutputFormat, message: &str, code: i32) -> ! {
    let rendered = render_error(output, message);
    match output {
        OutputFormat::Text => eprintln!("{}", rendered),
        OutputFormat::Json => println!("{}", rendered),
    }
    exit(code);
}

fn cmd_resolve(resolver: &Resolver, card_number: &str, output: OutputFormat) {
    match resolver.resolve(card_number) {
        Ok(Some(profile)) => {
            match output {
                OutputFormat::Text => {
                    println!("Card Type: {}", profile.name());
                    println!("Alias: {}", profile.alias());
                    println!("Kind: {}", profile.kind());
                    println!("Security Code: {}", profile.security_code());
                }
                OutputFormat::Json => println!("{}", profile_json(profile)),
            }
            exit(0);
        }
        Ok(None) => {
            match output {
                OutputFormat::Text => println!("Card Type: Unknown"),
                OutputFormat::Json => println!("{}", json!({ "alias": null })),
            }
            exit(1);
        }
        Err(e) => fail(output, &e.to_string(), 2),
    }
}

fn cmd_validate(resolver: &Resolver, profile: &CardProfile, card_number: &str, output: OutputFormat) {
    let valid = resolver.validator().is_number_valid(profile, card_number);
    report_validity(profile, valid, output);
}

fn cmd_code(resolver: &Resolver, profile: &CardProfile, code: &str, output: OutputFormat) {
    let valid = resolver.validator().is_code_valid(profile, code);
    report_validity(profile, valid, output);
}

fn report_validity(profile: &CardProfile, valid: bool, output: OutputFormat) {
    match output {
        OutputFormat::Text => {
            println!("Valid: {}", if valid { "yes" } else { "no" });
            println!("Card Type: {}", profile.name());
        }
        OutputFormat::Json => {
            println!("{}", json!({ "valid": valid, "alias": profile.alias() }));
        }
    }
    exit(if valid { 0 } else { 1 });
}

fn cmd_format(
    profile: &CardProfile,
    card_number: &str,
    separator: &str,
    regex: bool,
    output: OutputFormat,
) {
    let result = if regex {
        format_with_pattern(profile, card_number)
            .map(|formatted| formatted.replace(' ', separator))
    } else {
        format_with_separator(profile, card_number, separator)
    };

    match result {
        Ok(formatted) => match output {
            OutputFormat::Text => println!("{}", formatted),
            OutputFormat::Json => {
                println!("{}", json!({ "alias": profile.alias(), "formatted": formatted }));
            }
        },
        Err(e) => fail(output, &e.to_string(), 1),
    }
}

fn cmd_list(resolver: &Resolver, output: OutputFormat) {
    let candidates = resolver.candidates();
    match output {
        OutputFormat::Text => {
            for profile in &candidates {
                println!("{:<20} {}", profile.alias(), profile.name());
            }
        }
        OutputFormat::Json => {
            let profiles: Vec<_> = candidates.iter().map(|p| profile_json(p)).collect();
            println!("{}", json!(profiles));
        }
    }
}

fn profile_json(profile: &CardProfile) -> serde_json::Value {
    json!({
        "alias": profile.alias(),
        "name": profile.name(),
        "type": profile.kind(),
        "breakpoints": profile.breakpoints(),
        "code": {
            "label": profile.security_code().label(),
            "length": profile.security_code().length(),
        },
        "lengths": profile.lengths().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "idRanges": profile.id_ranges().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "checkLuhn": profile.needs_checksum(),
    })
}
