use clap::{Parser, Subcommand};
use instafilter::batch::{self, BatchOptions};
use instafilter::filter::{FilterKind, Intensity, compute_parameters};
use instafilter::imaging::{Dimensions, OutputFormat, Quality, RustBackend, get_dimensions};
use instafilter::{config, output};
use std::path::PathBuf;

/// Filter selection shared by commands that compute parameters.
#[derive(clap::Args, Clone)]
struct FilterArgs {
    /// Filter to use (e.g. sepia-tone, twirl-distortion). Defaults to [editor] filter
    #[arg(long)]
    filter: Option<FilterKind>,

    /// Slider position, 0.0-1.0. Out-of-range values are clamped
    #[arg(long)]
    intensity: Option<f64>,
}

impl FilterArgs {
    fn resolve(&self, editor: &config::EditorConfig) -> (FilterKind, Intensity) {
        (
            self.filter.unwrap_or(editor.filter),
            Intensity::new(self.intensity.unwrap_or(editor.intensity)),
        )
    }
}

#[derive(Parser)]
#[command(name = "instafilter")]
#[command(about = "Apply photo filters driven by a single intensity slider")]
#[command(long_about = "\
Apply photo filters driven by a single intensity slider

Every filter is controlled by one value between 0.0 and 1.0. The slider is
mapped onto whatever parameters the filter understands:

  sepia-tone        intensity = slider
  crystallize       radius    = slider x 100
  edges             intensity = slider x 200
  gaussian-blur     radius    = slider x 200
  pixellate         scale     = slider x 100
  unsharp-mask      radius    = slider x 200, intensity = slider
  vignette          radius    = slider x 200, intensity = slider
  twirl-distortion  angle     = slider x 2pi, radius 400, centered

Run 'instafilter gen-config' to generate a documented instafilter.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; defaults are used when it does not exist)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available filters and the parameters they accept
    Filters,
    /// Print the parameters a filter would receive, as JSON
    Params {
        #[command(flatten)]
        filter: FilterArgs,

        /// Image width in pixels (needed for centered filters)
        #[arg(long, requires = "height", conflicts_with = "image")]
        width: Option<u32>,

        /// Image height in pixels
        #[arg(long, requires = "width", conflicts_with = "image")]
        height: Option<u32>,

        /// Read width and height from an image file instead
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Filter image files in parallel
    Apply {
        /// Images to filter
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Where to write `<stem>-<filter>.<ext>` files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format (jpg, png, tiff, webp). Defaults to [output] format
        #[arg(long)]
        format: Option<OutputFormat>,
    },
    /// Print a stock instafilter.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Filters => {
            output::print_filter_list();
        }
        Command::Params {
            filter,
            width,
            height,
            image,
        } => {
            let app_config = config::load_config(&cli.config)?;
            let (kind, intensity) = filter.resolve(&app_config.editor);
            let dims = match image {
                Some(path) => Some(get_dimensions(&RustBackend::new(), &path)?),
                None => width
                    .zip(height)
                    .map(|(width, height)| Dimensions { width, height }),
            };
            let parameters = compute_parameters(kind, intensity, dims);
            output::print_parameters(&parameters)?;
        }
        Command::Apply {
            inputs,
            filter,
            output_dir,
            format,
        } => {
            let app_config = config::load_config(&cli.config)?;
            let (kind, intensity) = filter.resolve(&app_config.editor);
            init_thread_pool(&app_config.processing);

            let options = BatchOptions {
                kind,
                intensity,
                output_dir,
                format: format.unwrap_or(app_config.output.format),
                quality: Quality::new(app_config.output.quality),
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_batch_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = batch::run(&inputs, &options, Some(tx));
            if printer.join().is_err() {
                log::warn!("progress printer panicked");
            }
            let summary = result?;
            println!("{}", output::format_batch_summary(&summary));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores: config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
