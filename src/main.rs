use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use usps_rates::{
    BoxDimensions, CarrierNativeMeasures, CartItem, Country, RateProvider, RateQuery,
    ShipmentTracker, UspsService, UspsSettings,
};

#[derive(Debug, Parser)]
#[command(name = "usps-rates")]
#[command(about = "Query USPS shipping rates and tracking events")]
struct Cli {
    /// Path to the settings TOML file
    #[arg(long, default_value = "usps.toml")]
    settings: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch rate options for a shipment
    Rates {
        #[arg(long)]
        origin_zip: String,

        #[arg(long)]
        destination_zip: String,

        /// ISO3 code of the shipping origin
        #[arg(long, default_value = "USA")]
        origin_country: String,

        /// ISO3 code of the destination country
        #[arg(long, default_value = "USA")]
        destination_country: String,

        /// Destination country display name
        #[arg(long, default_value = "United States")]
        destination_country_name: String,

        /// Total shipment weight in ounces
        #[arg(long)]
        weight: Decimal,

        /// Bounding box in inches
        #[arg(long, num_args = 3, value_names = ["LENGTH", "WIDTH", "HEIGHT"])]
        dimensions: Vec<Decimal>,

        /// Declared cart value
        #[arg(long, default_value = "0")]
        value: Decimal,
    },
    /// List tracking events for a tracking number
    Track { tracking_number: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    usps_rates::utils::logger::init_cli_logger(cli.verbose);

    let settings = UspsSettings::from_toml_file(&cli.settings)?;
    let service = UspsService::new(settings, &CarrierNativeMeasures)?;

    match cli.command {
        Command::Rates {
            origin_zip,
            destination_zip,
            origin_country,
            destination_country,
            destination_country_name,
            weight,
            dimensions,
            value,
        } => {
            let query = RateQuery {
                origin_zip,
                destination_zip,
                origin_country_code: Some(origin_country),
                destination_country: Country {
                    iso3: destination_country,
                    name: destination_country_name,
                },
                items: vec![CartItem {
                    unit_price: value,
                    quantity: 1,
                }],
                weight,
                dimensions: BoxDimensions {
                    length: dimensions[0],
                    width: dimensions[1],
                    height: dimensions[2],
                },
            };

            let result = service.get_rates(&query).await;
            for error in &result.errors {
                eprintln!("error: {error}");
            }
            for option in &result.options {
                println!("{}\t{}", option.rate, option.name);
            }
        }
        Command::Track { tracking_number } => {
            println!("{}", service.tracking_url(&tracking_number));
            let events = service.shipment_events(&tracking_number).await;
            if events.is_empty() {
                println!("no tracking events");
            }
            for event in events {
                println!(
                    "{}\t{}\t{} {}",
                    event.date, event.event, event.location, event.country
                );
            }
        }
    }

    Ok(())
}
