use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, Level};

const BAR_SIZE: u64 = 10000;

pub(crate) type ProgressCallback<'a> = dyn Fn(f64) + 'a;

#[derive(Parser, Debug)]
#[command(name = "stpp", author, version, about)]
pub struct Cli {
    /// The height raster (TIFF).
    #[arg(required = true)]
    pub height_path: PathBuf,
    /// The directory the processed terrain is written to.
    #[arg(required = true)]
    pub terrain_path: PathBuf,

    /// An optional discharge raster (TIFF) with the same extent as the height raster.
    #[arg(long)]
    pub discharge: Option<PathBuf>,
    /// An optional normal map (PNG), used instead of estimating the normals.
    #[arg(long)]
    pub normal: Option<PathBuf>,

    /// The vertical scale applied to the height samples.
    #[arg(long, default_value_t = 80.0)]
    pub height_scale: f32,
    /// The capacity of the cell pool, defaults to the area of the height raster.
    #[arg(long)]
    pub capacity: Option<usize>,
    #[arg(short, long, default_value_t = false)]
    pub overwrite: bool,

    #[arg(short, long, default_value = "info")]
    pub log_level: Level,
}

pub(crate) struct PreprocessBar<'a> {
    name: String,
    bar: ProgressBar,
    callback: Box<ProgressCallback<'a>>,
}

impl PreprocessBar<'_> {
    pub(crate) fn new(name: String) -> Self {
        let style = ProgressStyle::with_template(
            &(name.clone() + " terrain: {wide_bar} {percent} % [{elapsed}/{duration}]"),
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        let bar = ProgressBar::new(BAR_SIZE).with_style(style);

        let callback = Box::new({
            let progress_bar = bar.clone();
            move |completion: f64| {
                progress_bar.set_position((completion * BAR_SIZE as f64) as u64);
            }
        });

        Self {
            name,
            bar,
            callback,
        }
    }

    pub(crate) fn callback(&self) -> &ProgressCallback {
        self.callback.as_ref()
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
        info!("{} took: {:?}", self.name, self.bar.elapsed());
    }
}
