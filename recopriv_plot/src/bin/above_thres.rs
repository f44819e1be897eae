use clap::{App, Arg, ArgMatches};
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use recopriv_plot::config::DEFAULT_POPULATION_SIZE;
use recopriv_plot::{
    Aggregation, ExperimentGroup, FsDataSource, MetricTable, PanelGroup,
    PlotFmt, PlotRenderer, ResultsDB,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Report> {
    // init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = App::new("above_thres")
        .version("0.1")
        .about("Plots, per target, the reference against the extra items.")
        .arg(
            Arg::with_name("base_dir")
                .index(1)
                .value_name("BASE_DIR")
                .help("directory containing all group directories")
                .required(true),
        )
        .arg(
            Arg::with_name("group")
                .index(2)
                .value_name("GROUP")
                .help("group directory")
                .required(true),
        )
        .arg(
            Arg::with_name("path_suffix")
                .index(3)
                .value_name("PATH_SUFFIX")
                .help("appended to the group directory; names the figure"),
        )
        .arg(
            Arg::with_name("metric")
                .long("metric")
                .value_name("METRIC")
                .help("metric each target rate is plotted against")
                .default_value("sybil-neighbors")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("auxiliary_fraction")
                .long("auxiliary-fraction")
                .value_name("FRACTION")
                .help("fraction of the reference known as auxiliary items")
                .default_value("0.1")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output_dir")
                .long("output-dir")
                .value_name("DIR")
                .help("directory where the figure is written")
                .default_value(".")
                .takes_value(true),
        )
        .get_matches();

    let value = |name| required(&matches, name);
    let base_dir = PathBuf::from(value("base_dir")?);
    let path_suffix = matches.value_of("path_suffix").unwrap_or_default();
    let group = PanelGroup {
        group: ExperimentGroup::new(value("group")?, ""),
        path_suffix: path_suffix.to_string(),
        population_size: DEFAULT_POPULATION_SIZE,
    };
    let fraction = value("auxiliary_fraction")?;
    let fraction = fraction.parse::<f64>().wrap_err_with(|| {
        format!("auxiliary fraction {} is not a number", fraction)
    })?;
    let metric = value("metric")?;
    // fail on unknown names before touching the filesystem
    MetricTable::new()
        .resolve(metric)
        .wrap_err("resolve metric")?;
    let output_dir = PathBuf::from(value("output_dir")?);

    let db = ResultsDB::new(FsDataSource, &base_dir);
    let renderer = PlotRenderer::new(db, Aggregation::default());
    std::fs::create_dir_all(&output_dir).wrap_err_with(|| {
        format!("create output directory {}", output_dir.display())
    })?;
    let output = output_dir.join(PlotFmt::rates_file_name(path_suffix));
    let rates = renderer
        .render_rates(&output, &group, metric, fraction)
        .wrap_err("render target rates")?;

    let negative = rates.iter().filter(|rate| rate.is_negative()).count();
    println!("{} of {} targets with a negative rate", negative, rates.len());
    Ok(())
}

fn required<'a>(
    matches: &'a ArgMatches<'_>,
    name: &str,
) -> Result<&'a str, Report> {
    matches
        .value_of(name)
        .ok_or_else(|| eyre::eyre!("missing argument {}", name))
}
