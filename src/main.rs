use cdsfetch::{
    parse_time, Cds, CdsError, DataFormat, Dataset, Grid, Month, RetrieveRequest, Variable, Year,
    DEFAULT_TEMPERATURE_TARGET,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "cdsfetch")]
#[command(about = "Retrieve ERA5 reanalysis data from the Climate Data Store")]
struct Cli {
    #[arg(long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the request parameters as JSON without contacting the service
    Request {
        /// Start from a preset instead of the individual arguments
        #[arg(long, value_enum)]
        preset: Option<Preset>,

        #[command(flatten)]
        request: RequestArgs,
    },
    /// Retrieve data and write it to a file
    Retrieve {
        #[command(flatten)]
        request: RequestArgs,

        #[arg(long, short, default_value = DEFAULT_TEMPERATURE_TARGET)]
        output: PathBuf,
    },
    /// Flatten a retrieved NetCDF file into CSV
    #[cfg(feature = "netcdf")]
    Extract {
        #[arg(long, short)]
        input: PathBuf,

        #[arg(long, short)]
        output: PathBuf,

        #[arg(long, default_value = "t2m")]
        variable: String,

        #[arg(long, help = "Convert Kelvin values to degrees Celsius")]
        celsius: bool,
    },
    /// Render a near-surface temperature map of one month
    #[cfg(all(feature = "netcdf", feature = "plotting"))]
    Map(MapArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// A year of monthly means on a 2° grid
    Temperature,
    /// One month at native resolution
    Map,
}

#[derive(Debug, Args)]
struct RequestArgs {
    #[arg(long, default_value_t = 2018)]
    year: i32,

    /// Months to retrieve; all twelve when omitted
    #[arg(long, value_delimiter = ',')]
    month: Vec<u32>,

    /// Grid resolution in degrees, "lat,lon" or a single step
    #[arg(long, default_value = "2.0")]
    grid: Grid,

    /// Keep the native resolution instead of interpolating to --grid
    #[arg(long, conflicts_with = "grid")]
    native: bool,

    #[arg(long, value_delimiter = ',', default_value = "00:00")]
    time: Vec<String>,

    #[arg(long, value_delimiter = ',', default_value = "2m_temperature")]
    variable: Vec<String>,

    #[arg(long, default_value = "netcdf")]
    format: DataFormat,

    #[arg(long, default_value = "reanalysis-era5-single-levels-monthly-means")]
    dataset: String,
}

impl RequestArgs {
    fn preset_request(&self, preset: Preset) -> Result<RetrieveRequest, CdsError> {
        let year = Year(self.year);
        let request = match preset {
            Preset::Temperature => RetrieveRequest::monthly_mean_temperature(year),
            Preset::Map => {
                let month = self.month.first().copied().unwrap_or(1);
                RetrieveRequest::monthly_mean_temperature_map(year, Month(month))
            }
        };
        request.validate()?;
        Ok(request)
    }

    fn to_request(&self) -> Result<RetrieveRequest, CdsError> {
        let months = if self.month.is_empty() {
            Month::all()
        } else {
            self.month.iter().copied().map(Month).collect()
        };
        let times = self
            .time
            .iter()
            .map(|t| parse_time(t))
            .collect::<Result<Vec<_>, _>>()?;
        let request = RetrieveRequest::builder()
            .dataset(self.dataset.parse::<Dataset>().unwrap_or_else(|e| match e {}))
            .variables(
                self.variable
                    .iter()
                    .map(|v| v.parse::<Variable>().unwrap_or_else(|e| match e {}))
                    .collect(),
            )
            .years(vec![Year(self.year)])
            .months(months)
            .times(times)
            .maybe_grid((!self.native).then_some(self.grid))
            .format(self.format)
            .build();
        request.validate()?;
        Ok(request)
    }
}

#[cfg(all(feature = "netcdf", feature = "plotting"))]
#[derive(Debug, Args)]
struct MapArgs {
    #[arg(long, default_value_t = 2018)]
    year: i32,

    /// Month to map; may be omitted when --input holds a single time step
    #[arg(long, required_unless_present = "input")]
    month: Option<u32>,

    /// Use an already retrieved file instead of downloading
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long, short, default_value = "map.html")]
    output: PathBuf,

    /// Also write the per-cell colours as CSV
    #[arg(long)]
    colors: Option<PathBuf>,

    #[arg(long, default_value_t = -60.0, allow_hyphen_values = true)]
    vmin: f64,

    #[arg(long, default_value_t = 50.0, allow_hyphen_values = true)]
    vmax: f64,

    #[arg(long, default_value = "RdYlBu_r")]
    cmap: String,

    #[arg(long)]
    title: Option<String>,
}

fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cdsfetch=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cdsfetch=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

async fn run(command: Command) -> Result<(), CdsError> {
    match command {
        Command::Request { preset, request } => {
            let request = match preset {
                Some(preset) => request.preset_request(preset)?,
                None => request.to_request()?,
            };
            let body = serde_json::json!({
                "dataset": request.dataset.as_str(),
                "request": request.to_parameters(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
            );
        }
        Command::Retrieve { request, output } => {
            let request = request.to_request()?;
            let client = Cds::new().await?;
            let file = client
                .retrieve()
                .request(&request)
                .target(&output)
                .call()
                .await?;
            info!("Job {} finished", file.job_id);
            println!("Wrote {} bytes to {}", file.bytes, file.path.display());
        }
        #[cfg(feature = "netcdf")]
        Command::Extract {
            input,
            output,
            variable,
            celsius,
        } => {
            let fields = tokio::task::spawn_blocking(move || {
                cdsfetch::read_fields(&input, &variable)
            })
            .await
            .map_err(cdsfetch::FieldError::from)??;
            let fields: Vec<_> = if celsius {
                fields.into_iter().map(|f| f.to_celsius()).collect()
            } else {
                fields
            };
            cdsfetch::write_csv(&fields, &output)?;
            println!("Wrote {} time steps to {}", fields.len(), output.display());
        }
        #[cfg(all(feature = "netcdf", feature = "plotting"))]
        Command::Map(args) => {
            let cmap: cdsfetch::ColorMap = args.cmap.parse()?;
            let scale = cdsfetch::ColorScale::new(args.vmin, args.vmax, cmap)?;
            let period = args.month.map(|month| (Year(args.year), Month(month)));
            let map = match (&args.input, period) {
                (Some(input), period) => {
                    cdsfetch::load_temperature_map(input, period, args.title.clone(), Some(scale))
                        .await?
                }
                (None, period) => {
                    let (_, month) = period.ok_or(cdsfetch::RequestError::EmptyField("month"))?;
                    let client = Cds::new().await?;
                    client
                        .map()
                        .year(args.year)
                        .month(month.get())
                        .maybe_title(args.title.clone())
                        .scale(scale)
                        .call()
                        .await?
                }
            };
            if let Ok(summary) = map.field().summary() {
                info!(
                    "Field range {:?}..{:?} {}",
                    summary.min,
                    summary.max,
                    map.field().units.as_deref().unwrap_or("")
                );
            }
            map.write_html(&args.output)?;
            if let Some(colors) = &args.colors {
                map.write_color_table(colors)?;
            }
            println!("Wrote map to {}", args.output.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    if let Err(e) = run(cli.command).await {
        error!("{}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
