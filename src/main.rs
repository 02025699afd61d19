//! astroview - a native glTF model viewer with hover annotations.

use anyhow::Result;
use astroview::app::{AppAction, ViewerApp};
use astroview::asset::ModelSource;
use astroview::config::ViewerConfig;
use std::{env, path::PathBuf};
use tracing::info;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting astroview v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));

    let mut config = match &cli.config_path {
        Some(path) => ViewerConfig::load_from_path(path),
        None => ViewerConfig::load(),
    };
    if let Some((width, height)) = cli.resolution {
        config.width = width;
        config.height = height;
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    let source = ModelSource::parse(&config.model);

    // Create event loop
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = Some(ViewerApp::new(&event_loop, &config, source)?);

    // Run event loop
    event_loop.run(move |event, elwt| {
        if let Some(viewer) = app.as_mut() {
            match viewer.handle_event(&event, elwt) {
                AppAction::Continue => {}
                AppAction::Quit => {
                    info!("Quitting viewer");
                    app = None;
                    elwt.exit();
                }
            }
        } else {
            elwt.exit();
        }
    })?;

    info!("astroview shutting down");
    Ok(())
}

#[derive(Clone, Default)]
struct CliOptions {
    model: Option<String>,
    resolution: Option<(u32, u32)>,
    config_path: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--model" => {
                    if let Some(value) = args.next() {
                        opts.model = Some(value);
                    } else {
                        tracing::error!("--model requires a URL or file path");
                    }
                }
                "--resolution" => {
                    if let Some(raw) = args.next() {
                        match raw.split_once('x') {
                            Some((w, h)) => match (w.parse::<u32>(), h.parse::<u32>()) {
                                (Ok(width), Ok(height)) if width > 0 && height > 0 => {
                                    opts.resolution = Some((width, height));
                                }
                                _ => {
                                    tracing::error!(value = %raw, "--resolution must be like 1280x720");
                                }
                            },
                            None => {
                                tracing::error!(value = %raw, "--resolution must be like 1280x720");
                            }
                        }
                    } else {
                        tracing::error!("--resolution requires a value like 1280x720");
                    }
                }
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config_path = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                _ => {
                    tracing::warn!(argument = %arg, "ignoring unknown argument");
                }
            }
        }

        opts
    }
}
