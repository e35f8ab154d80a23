pub mod config;
pub mod control;
pub mod controller;
pub mod serial;
pub mod session;
pub mod ui;

use crate::config::{resolve_config_path, HandConfig, CONFIG_FILE};
use crate::control::ControlBindings;
use crate::controller::GamepadPoller;
use crate::serial::{AwaitingHello, HandLink};
use crate::session::{ControlSession, DeviceSource};
use crate::ui::{HandControlUI, WINDOW_SIZE, WINDOW_TITLE};
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Drive the robot hand from the keyboard or a gamepad
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "handlink", version)]
struct LaunchArgs {
    /// Serial port the robot hand is attached to (e.g. /dev/ttyACM0, COM3)
    port: String,

    /// Config file [default: ./config.toml, or the per-user copy if only that exists]
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let args = LaunchArgs::parse();

    let config_path = resolve_config_path(
        args.config.clone(),
        Path::new(CONFIG_FILE),
        dirs::config_dir().as_deref(),
    );
    let config = HandConfig::load_or_create(&config_path).await?;

    let bindings = ControlBindings::from_config(&config)
        .map_err(|e| eyre!("{}. Check {}", e, config_path.display()))?;

    let link = HandLink::<AwaitingHello>::open(&args.port, config.serial.baud_rate)?;

    let (link, status) = tokio::select! {
        hello = link.await_hello() => hello?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted while waiting for the robot hand");
            return Ok(());
        }
    };

    let gamepad = match GamepadPoller::create() {
        Ok(poller) => Some(Box::new(poller) as Box<dyn DeviceSource>),
        Err(e) => {
            warn!("{}, continuing with keyboard control only", e);
            None
        }
    };

    let (session, session_handle) = ControlSession::new(bindings, link, status, gamepad);
    let session_task = session.spawn();

    // A dead link ends the program whatever state the window is in
    tokio::spawn(async move {
        match session_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("{}. Exiting.", e);
                std::process::exit(1);
            }
            Err(e) => {
                error!("Control loop aborted: {}", e);
                std::process::exit(1);
            }
        }
    });

    info!("Starting {} window", WINDOW_TITLE);
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size(WINDOW_SIZE);

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |cc| Ok(Box::new(HandControlUI::new(cc, session_handle)))),
    )
    .map_err(|e| eyre!("Failed to run UI: {}", e))?;

    info!("Window closed, serial port released");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<LaunchArgs, clap::Error> {
        LaunchArgs::try_parse_from(std::iter::once("handlink").chain(args.iter().copied()))
    }

    #[test]
    fn port_only() {
        let parsed = parse(&["/dev/ttyACM0"]).unwrap();
        assert_eq!(parsed.port, "/dev/ttyACM0");
        assert_eq!(parsed.config, None);
    }

    #[test]
    fn config_flag_in_any_position() {
        let parsed = parse(&["--config", "hand.toml", "COM3"]).unwrap();
        assert_eq!(parsed.port, "COM3");
        assert_eq!(parsed.config, Some(PathBuf::from("hand.toml")));

        let parsed = parse(&["COM3", "-c", "hand.toml"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("hand.toml")));

        let parsed = parse(&["--config=hand.toml", "COM3"]).unwrap();
        assert_eq!(parsed.port, "COM3");
        assert_eq!(parsed.config, Some(PathBuf::from("hand.toml")));
    }

    #[test]
    fn missing_port_is_reported() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_flags_are_not_taken_as_the_port() {
        assert_eq!(parse(&["-v"]).unwrap_err().kind(), ErrorKind::UnknownArgument);
        assert_eq!(
            parse(&["COM3", "--verbose"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
    }

    #[test]
    fn rejects_stray_arguments_and_missing_values() {
        assert!(parse(&["COM3", "COM4"]).is_err());
        assert!(parse(&["COM3", "--config"]).is_err());
        assert!(parse(&["-c", "--weird", "COM3"]).is_err());
    }
}
