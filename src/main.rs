mod cli;

use chrono::Local;
use clap::Parser;
use cli::{Args, Commands, PatternArgs, PlanArgs, RenderArgs};
use eyre::{Result, WrapErr};
use seqstamp::host::PlanHost;
use seqstamp::stamp::{StampJob, StampMetadata, parse_resolution};
use seqstamp::{DiskSource, SequenceOptions, get_frame_number, get_name_pattern, render_template};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match args.command.verbose() {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Plan(a) => plan(a)?,
        Commands::Pattern(a) => pattern(a)?,
        Commands::Render(a) => render(a),
    }

    Ok(())
}

fn plan(a: PlanArgs) -> Result<()> {
    let options = SequenceOptions { strict: a.strict };
    let frames = seqstamp::resolve_inputs(&DiskSource, &a.image, options)?;

    let mut job = StampJob::new(frames);
    if let Some(out) = a.render_dir {
        job.output = out;
    }
    if let Some(r) = a.resolution.as_deref() {
        job.resolution = Some(parse_resolution(r)?);
    }
    job.format = a.format.into();
    job.frame_label = a.label;
    job.metadata = StampMetadata {
        date: Some(
            a.date
                .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string()),
        ),
        author: a.author,
        project: a.project,
        shot: a.shot,
        sequence: a.sequence,
        focal: a.focal,
        rendertime: a.rendertime,
        text: a.text,
    };

    let mut host = PlanHost::new();
    job.run(&mut host)?;
    let json = host.into_plan().to_json()?;

    match a.plan_out {
        Some(path) => {
            std::fs::write(&path, json)
                .wrap_err_with(|| format!("failed to write plan to `{}`", path.display()))?;
            tracing::info!("wrote plan {}", path.display());
        }
        None => println!("{json}"),
    }

    tracing::info!("batch job finished");
    Ok(())
}

fn pattern(a: PatternArgs) -> Result<()> {
    for name in &a.names {
        let pattern = get_name_pattern(name)?;
        let frame = match get_frame_number(name) {
            Ok(n) => n.to_string(),
            Err(e) => {
                tracing::debug!(name = %name, error = %e, "no frame number");
                "-".to_string()
            }
        };
        println!("{name}\t{pattern}\t{frame}");
    }
    Ok(())
}

fn render(a: RenderArgs) {
    println!("{}", render_template(&a.template, a.frame));
}
