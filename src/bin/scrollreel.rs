use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    /// Log progress to stderr; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the page at one scroll position as a PNG.
    Frame(FrameArgs),
    /// Render a scroll from top to bottom as a numbered PNG sequence.
    Scrub(ScrubArgs),
    /// Print the resolved page configuration as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Page config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Scroll progress in `[0, 1]`.
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Time since mount in milliseconds. Defaults to just after the loader has faded.
    #[arg(long)]
    elapsed_ms: Option<u64>,

    /// How long to wait for frames to load.
    #[arg(long, default_value_t = 60_000)]
    timeout_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    /// Page config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Number of evenly spaced scroll positions to render.
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Milliseconds of host time between steps.
    #[arg(long, default_value_t = 16)]
    step_ms: u64,

    #[arg(long, default_value_t = 60_000)]
    timeout_ms: u64,

    /// Output directory; files are named `scrub-0000.png`, `scrub-0001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Page config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Also load every frame and report how many succeeded.
    #[arg(long)]
    load: bool,

    #[arg(long, default_value_t = 60_000)]
    timeout_ms: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn read_config(path: &Path) -> anyhow::Result<scrollreel::PageConfig> {
    scrollreel::PageConfig::from_path(path)
        .with_context(|| format!("load page config '{}'", path.display()))
}

/// Mount the page and block until every frame slot has settled.
fn mount_loaded(
    config: &scrollreel::PageConfig,
    timeout: Duration,
) -> anyhow::Result<(scrollreel::Host, scrollreel::Session)> {
    let host = scrollreel::Host::new(config.viewport()?, config.device_pixel_ratio);
    let loader = scrollreel::FrameLoader::new(config.loader_threads)?;
    let mut session = scrollreel::Session::mount(&host, config.clone(), &loader)?;
    session
        .wait_for_frames(timeout)
        .with_context(|| format!("load frames from '{}'", config.frames.base_path.display()))?;
    Ok((host, session))
}

fn compositor_for(config: &scrollreel::PageConfig) -> anyhow::Result<scrollreel::Compositor> {
    let dirs: Vec<&Path> = config.font_dirs.iter().map(PathBuf::as_path).collect();
    Ok(scrollreel::Compositor::new(&dirs)?)
}

/// Host time at which the loader has fully faded, assuming frames are already in.
fn settled_ms(config: &scrollreel::PageConfig) -> u64 {
    let exit_ms = (scrollreel::overlay::loader::LoaderPresentation::EXIT_S * 1000.0) as u64;
    config.min_loading_ms + exit_ms + 500
}

fn write_png(path: &Path, frame: scrollreel::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let frame = frame.into_straight();
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be within [0, 1], got {}", args.progress);
    }
    let config = read_config(&args.config)?;
    let (_host, mut session) = mount_loaded(&config, Duration::from_millis(args.timeout_ms))?;

    let at = Duration::from_millis(args.elapsed_ms.unwrap_or_else(|| settled_ms(&config)));
    session.step(at)?;
    session.scroll_to_progress(args.progress);
    let report = session.step(at)?;
    tracing::info!(draw = ?report.draw, index = session.current_index().0, "frame ready");

    let frame = compositor_for(&config)?.compose(&session)?;
    write_png(&args.out, frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    if args.steps == 0 {
        anyhow::bail!("--steps must be >= 1");
    }
    let config = read_config(&args.config)?;
    let (_host, mut session) = mount_loaded(&config, Duration::from_millis(args.timeout_ms))?;
    let compositor = compositor_for(&config)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut t = Duration::from_millis(settled_ms(&config));
    session.step(t)?;
    let last = args.steps.saturating_sub(1).max(1);
    for i in 0..args.steps {
        let p = f64::from(i) / f64::from(last);
        session.scroll_to_progress(p.min(1.0));
        t += Duration::from_millis(args.step_ms);
        session.step(t)?;

        let out = args.out_dir.join(format!("scrub-{i:04}.png"));
        write_png(&out, compositor.compose(&session)?)?;
        tracing::debug!(step = i, progress = p, index = session.current_index().0, "scrub step");
    }
    eprintln!(
        "wrote {} frame(s) to {} ({} canvas draw(s))",
        args.steps,
        args.out_dir.display(),
        session.draw_count()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let config = read_config(&args.config)?;
    let viewport = config.viewport()?;
    let source = config.frame_source()?;
    let tracker = scrollreel::page::scroll::ScrollTracker::new(config.scroll_length_vh);
    let backing =
        scrollreel::playback::fit::compute_backing_size(viewport, config.device_pixel_ratio);
    let last = scrollreel::FrameIndex(source.count - 1);
    let mapping: Vec<serde_json::Value> = [0.0, 0.25, 0.5, 0.75, 0.999, 1.0]
        .into_iter()
        .map(|p| {
            serde_json::json!({
                "progress": p,
                "index": scrollreel::frame_index(p, source.count).0,
            })
        })
        .collect();

    let mut report = serde_json::json!({
        "config": &config,
        "frames": {
            "first": source.path_for(scrollreel::FrameIndex(0)),
            "last": source.path_for(last),
        },
        "backing_size": backing,
        "scroll_span_px": tracker.scroll_span(viewport),
        "mapping": mapping,
    });

    if args.load {
        let (_host, session) = mount_loaded(&config, Duration::from_millis(args.timeout_ms))?;
        let store = session.store();
        report["load"] = serde_json::json!({
            "loaded": store.loaded_count(),
            "failed": store.failed_indices().iter().map(|i| i.0).collect::<Vec<_>>(),
            "images_ready": session.state().images_ready,
        });
    }

    let s = serde_json::to_string_pretty(&report).context("serialize inspect report")?;
    println!("{s}");
    Ok(())
}
