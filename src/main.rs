mod arbiter;
mod config;
mod feeds;
mod flight;
mod geometry;
mod render;
mod runner;
mod shutdown;
mod sports;
mod status;
mod weather;
mod web;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use crate::arbiter::{DataArbiter, DisplayMode};
use crate::config::Config;
use crate::feeds::{FeedBoard, Feeds};
use crate::render::{ScrollRenderer, VirtualDisplay};
use crate::runner::MainLoop;
use crate::status::StatusBoard;

#[derive(Parser)]
#[command(name = "approach-board")]
#[command(about = "Scrolling LED board for aircraft on final approach")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    Validate {
        #[arg(long)]
        config: String,
    },
    /// Run the display loop and web server
    Run {
        #[arg(long)]
        config: String,
        /// Override the configured display mode
        #[arg(long, value_enum)]
        mode: Option<DisplayMode>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Run { config, mode } => run(&config, mode).await,
    }
}

fn load(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error loading {}: {}", path, e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    let region = geometry::corridor_bounding_box(&config.corridor);
    let viewport = config.viewport();
    println!("Configuration is valid");
    println!(
        "  query region: N {:.5} S {:.5} W {:.5} E {:.5}",
        region.north, region.south, region.west, region.east
    );
    println!(
        "  viewport: {} px wide, margin {} px, rows {:?}",
        viewport.width_px,
        viewport.margin_px,
        config.layout().rows
    );
    println!(
        "  mode: {:?}, team {}, flight sources {}",
        config.mode,
        config.sports.team,
        config.flight.sources.join(" > ")
    );
    ExitCode::SUCCESS
}

async fn run(path: &str, mode: Option<DisplayMode>) -> ExitCode {
    let Some(mut config) = load(path) else {
        return ExitCode::FAILURE;
    };
    if let Some(mode) = mode {
        config.mode = mode;
    }
    let config = Arc::new(config);

    let board = FeedBoard::new(config.flight.stale_after)
        .with_details_capacity(config.cache.enrichment_capacity);
    let status = StatusBoard::new(config.mode);
    let (trigger, shutdown) = shutdown::channel();
    let trigger = Arc::new(trigger);

    let arbiter = DataArbiter::new(
        config.arbiter_settings(),
        Feeds::from_board(
            &board,
            config.flight.sources.as_slice(),
            config.polling.fetch_timeout,
        ),
    );
    log::info!("Watching region {:?}", arbiter.region());

    let renderer = ScrollRenderer::new(config.viewport(), config.display.scroll.timing());
    let target = VirtualDisplay::new(
        config.display.width_px,
        config.display.height_px,
        config.display.glyph_width_px,
        status.clone(),
    );
    let display = MainLoop::new(arbiter, renderer, target, status.clone())
        .with_layout(config.layout())
        .with_timing(config.polling.interval, config.polling.error_backoff);

    let server = tokio::spawn(web::run_server(
        config.clone(),
        board,
        status,
        shutdown.clone(),
    ));
    let display = tokio::spawn(display.run(shutdown));

    let ctrl_c = trigger.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Cannot listen for Ctrl-C: {}", e);
            return;
        }
        ctrl_c.trigger("Ctrl-C");
    });

    let mut code = ExitCode::SUCCESS;
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            log::error!("Web server failed: {}", e);
            trigger.trigger("web server failed");
            code = ExitCode::FAILURE;
        }
        Err(e) => {
            log::error!("Web server task panicked: {}", e);
            trigger.trigger("web server panicked");
            code = ExitCode::FAILURE;
        }
    }
    if let Err(e) = display.await {
        log::error!("Display task panicked: {}", e);
        code = ExitCode::FAILURE;
    }
    code
}
