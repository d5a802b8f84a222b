//! CourtViz: compose a padel court configuration, render a preview, and
//! submit leads to the sales relay.

mod catalog;
mod config;
mod session;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use delivery::{Contact, HttpRelay, LeadPipeline, SubmissionOutcome};
use env_logger::Env;

use config::AppConfig;
use session::Session;

#[derive(Parser)]
#[command(name = "courtviz", about = "Padel court configurator", version)]
struct Cli {
    /// Config file (defaults to courtviz.ron in the current directory).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SceneArgs {
    /// Court model id.
    #[arg(long, default_value = "base")]
    court: String,

    /// Lighting rig id.
    #[arg(long, default_value = "none")]
    lighting: String,

    /// Structure color as a hex value, e.g. #1e66ff.
    #[arg(long)]
    color: Option<String>,

    /// Scene lighting mood.
    #[arg(long, default_value = "studio")]
    scene_lighting: String,

    /// Extra asset ids, comma separated.
    #[arg(long, value_delimiter = ',')]
    extras: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the configured scene to an image file.
    Preview {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output image path.
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },

    /// Submit a lead for the configured scene.
    Submit {
        #[command(flatten)]
        scene: SceneArgs,

        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: Option<String>,

        /// Send the lead without a preview image.
        #[arg(long)]
        no_image: bool,
    },

    /// List the available catalog options.
    Catalog,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let app_config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    match cli.command {
        Command::Preview { scene, output } => preview(&app_config, &scene, &output),
        Command::Submit { scene, name, phone, email, no_image } => {
            submit(&app_config, &scene, name, phone, email, no_image)
        }
        Command::Catalog => {
            print_catalog();
            Ok(())
        }
    }
}

fn compose(app_config: &AppConfig, args: &SceneArgs) -> Result<Session<scene::GltfLoader>> {
    let mut session = Session::new(app_config);
    session.select_court(&args.court)?;
    session.select_lighting(&args.lighting)?;
    session.set_scene_lighting(&args.scene_lighting)?;
    if let Some(hex) = &args.color {
        session.set_structure_color(hex)?;
    }
    for extra in &args.extras {
        session.add_extra(extra)?;
    }
    session.run_until_settled();
    Ok(session)
}

fn preview(app_config: &AppConfig, args: &SceneArgs, output: &PathBuf) -> Result<()> {
    let mut session = compose(app_config, args)?;
    let frame = session.render_frame();
    frame
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    log::info!("wrote {}", output.display());
    Ok(())
}

fn submit(
    app_config: &AppConfig,
    args: &SceneArgs,
    name: String,
    phone: String,
    email: Option<String>,
    no_image: bool,
) -> Result<()> {
    let mut session = compose(app_config, args)?;
    let snapshot = session.config_snapshot();

    let contact = Contact { full_name: name, phone, email };
    let relay = HttpRelay::new(&app_config.relay_endpoint).with_origin(&app_config.origin);
    let mut pipeline = LeadPipeline::new(relay, &app_config.page_url);

    let mut surface = || -> anyhow::Result<image::RgbaImage> { Ok(session.render_frame()) };
    let outcome = pipeline.submit(
        &contact,
        &snapshot,
        if no_image { None } else { Some(&mut surface) },
    );

    match outcome {
        SubmissionOutcome::Delivered => {
            log::info!("lead delivered");
            Ok(())
        }
        SubmissionOutcome::Degraded(reason) => {
            log::warn!("lead delivered without image: {reason:?}");
            Ok(())
        }
        SubmissionOutcome::Failed(err) => bail!("lead submission failed: {err}"),
    }
}

fn print_catalog() {
    println!("Courts:");
    for court in catalog::COURTS {
        println!("  {:<16} {}", court.id, court.label);
    }
    println!("Lighting:");
    for lighting in catalog::LIGHTING {
        println!("  {:<16} {}", lighting.id, lighting.label);
    }
    println!("Extras:");
    for extra in catalog::EXTRAS {
        println!("  {:<16} {}", extra.id, extra.label);
    }
    println!("Structure colors:");
    for swatch in catalog::STRUCTURE_COLORS {
        println!("  {:<16} {}", swatch.hex, swatch.label);
    }
    println!("Scene lighting:");
    for mood in catalog::SCENE_LIGHTING {
        println!("  {:<16} {}", mood.id, mood.label);
    }
}
