use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use wcloudhelp::config::{self, Config, Normalization, RenderSettings};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NormalizeArg {
    /// Divide by every count, stopwords included
    Global,
    /// Divide only by the counts that survive filtering
    Filtered,
}

impl From<NormalizeArg> for Normalization {
    fn from(value: NormalizeArg) -> Self {
        match value {
            NormalizeArg::Global => Normalization::Global,
            NormalizeArg::Filtered => Normalization::Filtered,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "wcloudhelp")]
#[command(about = "Render a word cloud that follows a mask and a color image", long_about = None)]
struct Cli {
    /// Set the output path for the wordcloud image
    #[arg(short = 'o', default_value = config::OUT_FILE)]
    outputfile: PathBuf,

    /// Set the path of your stopwords file, 1 word per line
    #[arg(short = 's', default_value = config::STOP_FILE)]
    stopfile: PathBuf,

    /// Verbosity - specify to see some debug output
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbosity: u8,

    /// Set the path of the JSON-encoded input for your weighted dictionary wordlist
    #[arg(short = 'w', default_value = config::WORD_FILE)]
    wordfile: PathBuf,

    /// Count words from a plain text file instead of the JSON wordlist
    #[arg(long)]
    text: Option<PathBuf>,

    /// Set a color file for your wordcloud output
    #[arg(long = "colors", default_value = config::COLOR_FILE)]
    colorfile: PathBuf,

    /// Set a mask file for your wordcloud output
    #[arg(long = "mask", default_value = config::MASK_FILE)]
    maskfile: PathBuf,

    /// Font used to draw the words, DejaVu Sans when not given
    #[arg(long)]
    font: Option<PathBuf>,

    /// Set the output image's width
    #[arg(long, default_value_t = config::DEFAULT_RESOLUTION.0)]
    width: u32,

    /// Set the output image's height
    #[arg(long, default_value_t = config::DEFAULT_RESOLUTION.1)]
    height: u32,

    /// Background color, any CSS color
    #[arg(long, default_value = config::DEFAULT_BACKGROUND)]
    background: String,

    /// Seed for a reproducible layout
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of words drawn
    #[arg(long, default_value_t = RenderSettings::default().max_words)]
    max_words: usize,

    /// Total the word counts are divided by
    #[arg(long, value_enum, default_value_t = NormalizeArg::Global)]
    normalize: NormalizeArg,
}

impl Cli {
    fn into_config(self) -> wcloudhelp::Result<Config> {
        Ok(Config {
            word_file: self.wordfile,
            stop_file: self.stopfile,
            text_file: self.text,
            mask_file: self.maskfile,
            color_file: self.colorfile,
            font_file: self.font,
            out_file: self.outputfile,
            width: self.width,
            height: self.height,
            normalization: self.normalize.into(),
            background_color: config::parse_color(&self.background)?,
            rng_seed: self.seed,
            render: RenderSettings {
                max_words: self.max_words,
                ..RenderSettings::default()
            },
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.into_config()?;
    wcloudhelp::pipeline::run(&config)?;

    println!("Output file: {}", config.out_file.display());
    Ok(())
}
