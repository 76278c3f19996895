/// painter3d - render 3D scenes with the painter's algorithm
///
/// Subcommands:
///   render       - write one PNG per resolution
///   view         - browse the rendered resolutions in the terminal
///   dump-config  - print the built-in scene config as JSON
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use painter3d_core::{render, Framebuffer};
use painter3d_terminal::{output, scene, RenderConfig, TerminalViewer};

#[derive(Parser)]
#[command(
    name = "painter3d",
    author,
    version,
    about = "Painter's algorithm renderer for 3D scenes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the scene and write render_RxR.png files
    Render {
        #[command(flatten)]
        scene: SceneArgs,
        /// Directory for the PNG files
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Render the scene and show it in the terminal
    View {
        #[command(flatten)]
        scene: SceneArgs,
        /// Log file while the terminal is in use
        #[arg(long, default_value = "/tmp/painter3d.log")]
        log_file: PathBuf,
    },
    /// Print the built-in config as JSON
    DumpConfig,
}

#[derive(Args)]
struct SceneArgs {
    /// JSON config file; the built-in workshop scene when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Resolutions to render, replacing those in the config
    #[arg(short, long = "resolution")]
    resolutions: Vec<usize>,
}

impl SceneArgs {
    fn load(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        if !self.resolutions.is_empty() {
            config.resolutions = self.resolutions.clone();
        }
        Ok(config)
    }

    /// STL paths in a config are relative to the config file
    fn base_dir(&self) -> PathBuf {
        self.config
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    fn render(&self) -> Result<Vec<Framebuffer>> {
        let config = self.load()?;
        let scene = scene::build_scene(&config, &self.base_dir())?;
        let frames = render(&scene, &config.camera(), &config.settings(), &config.resolutions)
            .context("Rendering failed")?;
        Ok(frames)
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Render { scene, out } => {
            init_logging(None)?;
            let frames = scene.render()?;
            for path in output::save_all(&frames, &out)? {
                info!("Wrote {}", path.display());
            }
        }
        Command::View { scene, log_file } => {
            init_logging(Some(&log_file))?;
            let frames = scene.render()?;
            TerminalViewer::new(frames)?.run()?;
        }
        Command::DumpConfig => {
            println!("{}", RenderConfig::default().to_json()?);
        }
    }

    Ok(())
}
