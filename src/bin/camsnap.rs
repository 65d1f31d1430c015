use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use camsnap::{
    ActionContext, AuthScheme, CameraDirectory, ConfigHandle, DownloadRequest, FetchCredential,
    GifRequest, HttpFetcher, ImageSource, OperationReport, ServerConfig, Settings, SizeBound,
    StitchRequest, resolve_destination, run_download, run_gif, run_stitch,
};

#[derive(Parser, Debug)]
#[command(name = "camsnap", version, about = "Grab, stitch, and animate security camera stills")]
struct Cli {
    /// Settings JSON with the camera server and camera directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured server host.
    #[arg(long, global = true)]
    host: Option<String>,

    /// Override the configured server port.
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download one image.
    Download(DownloadArgs),
    /// Stack several sources vertically into one image.
    Stitch(StitchArgs),
    /// Capture a source over time into an animated GIF.
    Gif(GifArgs),
    /// List the cameras in the configured directory.
    Cameras,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Camera number on the configured server.
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    camera: Option<String>,

    /// Literal image URL.
    #[arg(long)]
    url: Option<String>,

    /// Auth scheme for --url (none, basic, digest); basic when only --login is given.
    #[arg(long, requires = "url")]
    auth: Option<AuthScheme>,

    /// Login for --url.
    #[arg(long, requires = "url")]
    login: Option<String>,

    /// Password for --url.
    #[arg(long, requires = "url")]
    password: Option<String>,
}

impl SourceArgs {
    fn into_source(self) -> ImageSource {
        match (self.camera, self.url) {
            (Some(camera), _) => ImageSource::camera(camera),
            (None, url) => {
                let scheme = match (self.auth, &self.login) {
                    (Some(scheme), _) => scheme,
                    (None, Some(_)) => AuthScheme::Basic,
                    (None, None) => AuthScheme::None,
                };
                let credential = (scheme != AuthScheme::None)
                    .then(|| FetchCredential::new(scheme, self.login, self.password));
                ImageSource::url(url.unwrap_or_default(), credential)
            }
        }
    }
}

#[derive(Parser, Debug)]
struct DownloadArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output path; its directory must exist.
    #[arg(long)]
    out: String,

    /// Cap the image width in pixels (0 keeps the source size).
    #[arg(long, default_value_t = 0)]
    max_width: u32,

    /// Skip the per-fetch log line.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Parser, Debug)]
struct StitchArgs {
    /// Camera number, URL, or -1 for an empty slot. Repeat up to ten times.
    #[arg(long = "source", required = true)]
    sources: Vec<String>,

    /// Output path; its directory must exist.
    #[arg(long)]
    out: String,

    /// Cap every source's width in pixels (0 keeps source sizes).
    #[arg(long, default_value_t = 0)]
    max_width: u32,
}

#[derive(Parser, Debug)]
struct GifArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output path; the extension is forced to .gif.
    #[arg(long)]
    out: String,

    /// Capture window in seconds.
    #[arg(long, default_value_t = 10.0)]
    duration: f64,

    /// Seconds between captures.
    #[arg(long, default_value_t = 2.0)]
    interval: f64,

    /// Display time of each frame in milliseconds.
    #[arg(long, default_value_t = 500)]
    frame_delay_ms: u64,

    /// Play the frames back to front.
    #[arg(long, default_value_t = false)]
    reverse: bool,

    /// Cap every frame's width in pixels (0 keeps the source size).
    #[arg(long, default_value_t = 0)]
    max_width: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = match &cli.config {
        Some(path) => Settings::from_path(path)?,
        None => Settings::default(),
    };
    if let Some(host) = cli.host {
        settings.server.host = Some(host);
    }
    if let Some(port) = cli.port {
        settings.server.port = Some(port);
    }
    let handle = ConfigHandle::new(settings.server);
    let directory = CameraDirectory::new(settings.cameras);

    let server = handle.snapshot();
    let report = match cli.cmd {
        Command::Cameras => return cmd_cameras(&directory),
        Command::Download(args) => run_action(server, &directory, |ctx| cmd_download(ctx, args)),
        Command::Stitch(args) => run_action(server, &directory, |ctx| cmd_stitch(ctx, args)),
        Command::Gif(args) => run_action(server, &directory, |ctx| cmd_gif(ctx, args)),
    };

    match report {
        Ok(report) => {
            eprintln!("{report}");
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "operation failed");
            Err(err)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "camsnap=debug" } else { "camsnap=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_action<F>(
    server: Arc<ServerConfig>,
    directory: &CameraDirectory,
    op: F,
) -> anyhow::Result<OperationReport>
where
    F: FnOnce(&ActionContext<'_>) -> anyhow::Result<OperationReport>,
{
    let fetcher = HttpFetcher::new(&server.fetch_options())?;
    op(&ActionContext::new(server, &fetcher, directory))
}

fn cmd_cameras(directory: &CameraDirectory) -> anyhow::Result<()> {
    let cameras = directory.discover();
    if cameras.is_empty() {
        eprintln!("no cameras configured");
    }
    for cam in cameras {
        println!("{}\t{}\t{}", cam.number, cam.name, cam.format.label());
    }
    Ok(())
}

fn cmd_download(ctx: &ActionContext<'_>, args: DownloadArgs) -> anyhow::Result<OperationReport> {
    let req = DownloadRequest {
        max_width: SizeBound::max_width(args.max_width),
        quiet: args.quiet,
        ..DownloadRequest::new(args.source.into_source(), resolve_destination(&args.out)?)
    };
    Ok(run_download(ctx, &req)?)
}

fn cmd_stitch(ctx: &ActionContext<'_>, args: StitchArgs) -> anyhow::Result<OperationReport> {
    let req = StitchRequest::from_slots(&args.sources, resolve_destination(&args.out)?)?
        .with_max_width(SizeBound::max_width(args.max_width));
    Ok(run_stitch(ctx, &req)?)
}

fn cmd_gif(ctx: &ActionContext<'_>, args: GifArgs) -> anyhow::Result<OperationReport> {
    let total = seconds("duration", args.duration)?;
    let interval = seconds("interval", args.interval)?;
    let mut req = GifRequest::new(
        args.source.into_source(),
        resolve_destination(&args.out)?,
        total,
    );
    req.capture.frame_interval = interval;
    req.capture.max_width = SizeBound::max_width(args.max_width);
    req.gif.frame_delay = Duration::from_millis(args.frame_delay_ms);
    req.gif.reverse = args.reverse;
    Ok(run_gif(ctx, &req)?)
}

fn seconds(name: &str, value: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| anyhow::anyhow!("invalid --{name} '{value}': {e}"))
}
