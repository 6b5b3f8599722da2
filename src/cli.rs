use clap::{Parser, Subcommand, ValueEnum};
use seqstamp::host::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seqstamp", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a stamped preview render of an image sequence
    Plan(PlanArgs),
    /// Print the sequence pattern and frame number of file names
    Pattern(PatternArgs),
    /// Render an output name from a `#` template
    Render(RenderArgs),
}

impl Commands {
    pub fn verbose(&self) -> u8 {
        match self {
            Commands::Plan(a) => a.verbose,
            Commands::Pattern(a) => a.verbose,
            Commands::Render(a) => a.verbose,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FormatArg {
    /// One H.264 QuickTime movie
    Movie,
    /// One image per frame
    Images,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Movie => OutputFormat::H264Quicktime,
            FormatArg::Images => OutputFormat::ImageSequence,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Path to an image; a single image is expanded to its whole sequence
    #[arg(required = true)]
    pub image: Vec<PathBuf>,

    /// Render sequence to the specified path (`#` groups become frame numbers)
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub render_dir: Option<String>,

    /// Date of creation (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Author
    #[arg(short, long)]
    pub author: Option<String>,

    /// Project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Shot
    #[arg(short, long)]
    pub shot: Option<String>,

    /// Sequence
    #[arg(short = 'S', long)]
    pub sequence: Option<String>,

    /// Focal
    #[arg(short, long)]
    pub focal: Option<String>,

    /// Render time
    #[arg(short, long)]
    pub rendertime: Option<String>,

    /// Custom text
    #[arg(short, long)]
    pub text: Option<String>,

    /// Prefix of the per-frame label
    #[arg(long, default_value = "Frame")]
    pub label: String,

    /// Render size as WIDTHxHEIGHT instead of the first frame's size
    #[arg(long)]
    pub resolution: Option<String>,

    /// Output kind
    #[arg(long, value_enum, default_value_t = FormatArg::Movie)]
    pub format: FormatArg,

    /// Reject a sample image whose name has no frame number
    #[arg(long)]
    pub strict: bool,

    /// Write the plan to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub plan_out: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(clap::Args, Debug)]
pub struct PatternArgs {
    /// File names to inspect
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Output template, e.g. `shot_####.png`
    pub template: String,

    /// Frame number
    pub frame: u64,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
