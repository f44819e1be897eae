use clap::{App, Arg, ArgMatches};
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use recopriv_plot::config::{self, Aggregation, ExperimentGroup, Layout};
use recopriv_plot::{FsDataSource, PlotRenderer, PlotRequest, ResultsDB};
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

    let matches = App::new("recopriv_plot")
        .version("0.1")
        .about("Plots the results of parameter-sweep experiments.")
        .arg(
            Arg::with_name("base_dir")
                .index(1)
                .value_name("BASE_DIR")
                .help("directory containing all group directories")
                .required(true),
        )
        .arg(
            Arg::with_name("axis")
                .index(2)
                .value_name("AXIS")
                .help("swept parameter, e.g. k-neighbors or removal-rate")
                .required(true),
        )
        .arg(
            Arg::with_name("metrics")
                .index(3)
                .value_name("METRICS")
                .help("comma-separated metrics, one panel per metric")
                .required(true),
        )
        .arg(
            Arg::with_name("layout")
                .index(4)
                .value_name("LAYOUT")
                .help("hundreds digit is the rows, tens digit the columns")
                .required(true),
        )
        .arg(
            Arg::with_name("groups")
                .index(5)
                .value_name("GROUPS")
                .help("comma-separated group directories")
                .required(true),
        )
        .arg(
            Arg::with_name("labels")
                .index(6)
                .value_name("LABELS")
                .help("comma-separated group labels (empty: directory)")
                .required(true),
        )
        .arg(
            Arg::with_name("path_suffix")
                .index(7)
                .value_name("PATH_SUFFIX")
                .help("appended to every group directory; names the figure"),
        )
        .arg(
            Arg::with_name("min_population")
                .long("min-population")
                .help("skip records below the group's population size"),
        )
        .arg(
            Arg::with_name("population_sizes")
                .long("population-sizes")
                .value_name("SIZES")
                .help("comma-separated population sizes (default: 50)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("reduction")
                .long("reduction")
                .value_name("REDUCTION")
                .help("reduction of each sweep point")
                .possible_values(&["mean", "median"])
                .default_value("mean")
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

    let request = parse_request(&matches).wrap_err("parse arguments")?;
    tracing::debug!("{:?}", request);

    let panels = request.panels().wrap_err("resolve plot request")?;
    let db = ResultsDB::new(FsDataSource, &request.base_dir);
    let renderer = PlotRenderer::new(db, request.aggregation);
    // fail on unknown names before touching the filesystem
    renderer
        .plan(&panels, request.layout)
        .wrap_err("resolve plot request")?;

    let output = request.output_path();
    std::fs::create_dir_all(&request.output_dir).wrap_err_with(|| {
        format!("create output directory {}", request.output_dir.display())
    })?;
    renderer
        .render(&output, &panels, request.layout)
        .wrap_err("render figure")?;
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

fn parse_request(matches: &ArgMatches<'_>) -> Result<PlotRequest, Report> {
    let value = |name| required(matches, name);

    let layout_code = value("layout")?;
    let layout_code = layout_code.parse::<u32>().wrap_err_with(|| {
        format!("layout code {} is not a number", layout_code)
    })?;
    let layout = Layout::from_code(layout_code)?;

    let dirs = config::parse_list(value("groups")?);
    let labels = config::parse_list(value("labels")?);
    let groups = ExperimentGroup::from_lists(&dirs, &labels)?;

    let population_sizes = matches
        .value_of("population_sizes")
        .map(config::parse_population_sizes)
        .transpose()?;

    let aggregation = Aggregation {
        min_population: matches.is_present("min_population"),
        reduction: value("reduction")?.parse()?,
    };

    Ok(PlotRequest {
        base_dir: PathBuf::from(value("base_dir")?),
        axis: value("axis")?.to_string(),
        metrics: config::parse_list(value("metrics")?),
        layout,
        groups,
        path_suffix: matches
            .value_of("path_suffix")
            .unwrap_or_default()
            .to_string(),
        population_sizes,
        aggregation,
        output_dir: PathBuf::from(value("output_dir")?),
    })
}
