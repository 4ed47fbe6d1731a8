use log::{info, warn};
use notch_core::platform::headless::HeadlessPlatform;
use notch_core::platform::Bounds;
use notch_core::{Config, NotchResult};
use std::io;
use std::sync::mpsc;
use std::thread;

mod cli;
mod host;
mod logger;

use host::Host;

fn main() -> NotchResult<()> {
    let args = cli::parse_args();

    if let Err(e) = logger::init_logger(args.quiet, args.verbose) {
        eprintln!("Failed to initialize logger: {e}");
    }

    let config = if args.use_defaults {
        info!("Using default configuration");
        Config::default()
    } else {
        Config::load(args.config_path.as_deref(), true)
            .map_err(|e| format!("Failed to load config: {e}"))?
    };

    if args.dry_run {
        info!("Configuration is valid");
        return Ok(());
    }

    info!("Starting Notch {}", notch_core::version());

    let screen = Bounds::new(0.0, 0.0, args.screen_width, args.screen_height);
    let platform = HeadlessPlatform::new(screen);
    let (runtime, bridge) = notch_core::start(platform.clone(), config)?;
    let handle = runtime.handle();

    host::spawn_event_printer(bridge).map_err(|e| format!("Failed to start event printer: {e}"))?;

    let (stop_sender, stop_receiver) = mpsc::channel();

    let ctrlc_stop = stop_sender.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_stop.send("Received Ctrl+C");
    })
    .map_err(|e| format!("Error setting Ctrl+C handler: {e}"))?;

    let host = Host::new(handle.clone(), platform);
    thread::Builder::new()
        .name("notch-stdin".to_string())
        .spawn(move || {
            host.run(io::stdin().lock());
            let _ = stop_sender.send("Reached end of input");
        })
        .map_err(|e| format!("Failed to start request reader: {e}"))?;

    match stop_receiver.recv() {
        Ok(reason) => info!("{reason}, shutting down..."),
        Err(_) => warn!("Lost every shutdown trigger, shutting down..."),
    }

    handle.shutdown();
    runtime.join()?;

    info!("Notch stopped");
    Ok(())
}
