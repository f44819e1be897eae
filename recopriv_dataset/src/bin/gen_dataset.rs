use clap::{App, Arg, ArgMatches};
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use rand::rngs::StdRng;
use rand::SeedableRng;
use recopriv_dataset::DatasetConfig;
use std::fs::File;
use std::io::BufWriter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Report> {
    // init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let users = recopriv_dataset::DEFAULT_USERS.to_string();
    let items = recopriv_dataset::DEFAULT_ITEMS.to_string();
    let max_rating = recopriv_dataset::DEFAULT_MAX_RATING.to_string();
    let matches = App::new("gen_dataset")
        .version("0.1")
        .about("Generates a random user/item rating dataset.")
        .arg(
            Arg::with_name("users")
                .long("users")
                .value_name("USERS")
                .help("number of users")
                .default_value(&users)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("items")
                .long("items")
                .value_name("ITEMS")
                .help("number of items")
                .default_value(&items)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("max_rating")
                .long("max-rating")
                .value_name("MAX_RATING")
                .help("ratings are drawn from 1 to this value")
                .default_value(&max_rating)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("FILE")
                .help("file where the ratings are written")
                .default_value("ratings.csv")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("seed of the random generator")
                .takes_value(true),
        )
        .get_matches();

    let config = DatasetConfig::new(
        parse(&matches, "users")?,
        parse(&matches, "items")?,
        parse(&matches, "max_rating")?,
    )?;
    let mut rng = match matches.value_of("seed") {
        Some(seed) => {
            let seed = seed
                .parse::<u64>()
                .wrap_err_with(|| format!("invalid seed {}", seed))?;
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    tracing::debug!("{:?}", config);

    let ratings = recopriv_dataset::generate(&config, &mut rng);

    let output = matches.value_of("output").unwrap_or("ratings.csv");
    let file = File::create(output)
        .wrap_err_with(|| format!("create {}", output))?;
    let lines = recopriv_dataset::write_csv(&ratings, BufWriter::new(file))
        .wrap_err_with(|| format!("write {}", output))?;
    tracing::info!("{} ratings written to {}", lines, output);
    Ok(())
}

fn parse(matches: &ArgMatches<'_>, name: &str) -> Result<u32, Report> {
    let value = matches.value_of(name).unwrap_or_default();
    value
        .parse::<u32>()
        .wrap_err_with(|| format!("invalid {} {:?}", name, value))
}
