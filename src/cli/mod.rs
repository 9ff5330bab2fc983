use std::{io::IsTerminal, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum, error::ErrorKind};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use crate::{
    engine::{Engine, SortAttribute},
    error::CliError,
    output::{self, Report},
};

#[derive(Clone, Debug, ValueEnum)]
enum OutputArg {
    Table,
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(name = "carq")]
#[command(about = "Query a collection of car records")]
#[command(version)]
struct CliArgs {
    /// JSON document holding an array of cars
    #[arg(
        short = 'f',
        long = "file",
        env = "CARQ_FILE",
        default_value = "cars.json"
    )]
    file: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        default_value = "table",
        value_enum,
        ignore_case = true,
        global = true
    )]
    output: OutputArg,

    /// Log rejected records and query details
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sort cars by model, price, color or mileage
    Sort {
        #[arg(value_name = "attribute")]
        attribute: String,

        #[arg(long = "desc")]
        descending: bool,
    },
    /// Cars with at least the given mileage
    Mileage {
        #[arg(long = "min")]
        min: u64,
    },
    /// Number of cars per color
    Colors,
    /// Most expensive car of every model
    TopModels,
    /// Every car sharing the highest price
    Top,
    /// Price and mileage statistics
    Stats,
    /// Cars with their components in alphabetical order
    Components,
    /// Cars grouped by component
    ByComponent,
    /// Cars priced within [min, max], ordered by model
    PriceRange {
        #[arg(long = "min")]
        min: Decimal,

        #[arg(long = "max")]
        max: Decimal,
    },
}

pub fn run() -> Result<(), CliError> {
    let Some(args) = parse_cli_args()? else {
        return Ok(());
    };
    init_logging(args.verbose);

    let mut engine = Engine::load(&args.file)?;
    let report = execute(&mut engine, &args.command)?;
    output::print(&report, map_output_format(&args.output))?;
    Ok(())
}

/// Runs one query. Only `components` needs the engine mutably; the others reborrow it shared.
fn execute<'a>(
    engine: &'a mut Engine,
    command: &Command,
) -> Result<Report<'a>, CliError> {
    let report = match command {
        Command::Sort {
            attribute,
            descending,
        } => {
            let attribute: SortAttribute = attribute.parse()?;
            Report::Cars(engine.sort_by(attribute, *descending))
        }
        Command::Mileage { min } => Report::Cars(engine.with_mileage_at_least(*min)),
        Command::Colors => Report::ColorCounts(engine.count_by_color()),
        Command::TopModels => Report::ModelWinners(engine.most_expensive_by_model()?),
        Command::Top => Report::Cars(engine.global_most_expensive()),
        Command::Stats => Report::Statistics(engine.statistics()?),
        Command::Components => Report::Cars(engine.with_sorted_components().iter().collect()),
        Command::ByComponent => Report::ComponentGroups(engine.by_component()),
        Command::PriceRange { min, max } => Report::Cars(engine.price_between(*min, *max)?),
    };
    Ok(report)
}

fn parse_cli_args() -> Result<Option<CliArgs>, CliError> {
    match CliArgs::try_parse() {
        Ok(args) => Ok(Some(args)),
        Err(error) => {
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                print!("{error}");
                return Ok(None);
            }
            Err(CliError::InvalidArgs(error.to_string()))
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "carq=debug" } else { "carq=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

fn map_output_format(format: &OutputArg) -> output::OutputFormat {
    match format {
        OutputArg::Table => output::OutputFormat::Table,
        OutputArg::Json => output::OutputFormat::Json,
        OutputArg::Yaml => output::OutputFormat::Yaml,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{Parser, error::ErrorKind};
    use rust_decimal::Decimal;

    use crate::{
        car::{Car, Color},
        engine::Engine,
        error::{CliError, EngineError},
        output::Report,
    };

    use super::{CliArgs, Command, OutputArg, execute};

    fn engine() -> Engine {
        Engine::from_cars(vec![
            Car::new("MAZDA", Decimal::from(160), Color::Black, 2500, ["ABS"])
                .expect("test car must be valid"),
            Car::new("BMW", Decimal::from(90), Color::Black, 500, ["ESP"])
                .expect("test car must be valid"),
        ])
    }

    #[test]
    fn parses_flags_with_clap() {
        let args = CliArgs::parse_from([
            "carq", "-f", "fleet.json", "-o", "json", "-v", "sort", "price", "--desc",
        ]);

        assert_eq!(args.file, PathBuf::from("fleet.json"));
        assert!(matches!(args.output, OutputArg::Json));
        assert!(args.verbose);
        assert!(matches!(
            args.command,
            Command::Sort { ref attribute, descending: true } if attribute == "price"
        ));
    }

    #[test]
    fn parses_output_enum_case_insensitive_after_subcommand() {
        let args = CliArgs::parse_from(["carq", "colors", "--output", "YAML"]);
        assert!(matches!(args.output, OutputArg::Yaml));
        assert!(matches!(args.command, Command::Colors));
    }

    #[test]
    fn parses_decimal_price_range() {
        let args = CliArgs::parse_from(["carq", "price-range", "--min", "99.5", "--max", "300"]);
        assert!(matches!(
            args.command,
            Command::PriceRange { min, max }
                if min == Decimal::new(995, 1) && max == Decimal::from(300)
        ));
    }

    #[test]
    fn bare_invocation_asks_for_help_not_an_error() {
        let error = CliArgs::try_parse_from(["carq"]).expect_err("subcommand is required");
        assert_eq!(
            error.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn rejects_non_numeric_mileage() {
        assert!(CliArgs::try_parse_from(["carq", "mileage", "--min", "far"]).is_err());
    }

    #[test]
    fn unknown_sort_attribute_is_invalid_argument() {
        let mut engine = engine();
        let command = Command::Sort {
            attribute: "speed".to_string(),
            descending: false,
        };

        let error = execute(&mut engine, &command).expect_err("unknown attribute must fail");
        assert!(matches!(
            error,
            CliError::Engine(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn executes_price_range_query() {
        let mut engine = engine();
        let command = Command::PriceRange {
            min: Decimal::from(100),
            max: Decimal::from(200),
        };

        let report = execute(&mut engine, &command).expect("query must succeed");
        assert!(matches!(report, Report::Cars(ref cars) if cars.len() == 1));
    }

    #[test]
    fn components_query_sorts_engine_components() {
        let mut engine = Engine::from_cars(vec![
            Car::new("FIAT", Decimal::ONE, Color::Red, 1, ["SUNROOF", "ABS"])
                .expect("test car must be valid"),
        ]);

        let report = execute(&mut engine, &Command::Components).expect("query must succeed");
        assert!(matches!(
            report,
            Report::Cars(ref cars) if cars[0].components() == ["ABS", "SUNROOF"]
        ));
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        let mut engine = engine();
        let command = Command::PriceRange {
            min: Decimal::from(200),
            max: Decimal::from(100),
        };

        assert!(execute(&mut engine, &command).is_err());
    }
}
