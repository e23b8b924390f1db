// AccentFlow CLI
// Hold a modifier, tap a letter, cycle through its accents

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use accentflow_core::feedback;
use accentflow_core::{
    default_config_content, AccentError, Config, DeviceSelector, EvdevSource, EventRouter,
    Pipeline, VirtualDevice,
};

/// Accent composition for Linux keyboards
#[derive(Parser, Debug)]
#[command(name = "accentflow")]
#[command(version)]
#[command(about = "Hold a modifier, tap a letter, cycle through its accents", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Input device path or name (overrides the config file)
    #[arg(short, long, value_name = "DEVICE")]
    device: Option<String>,

    /// Do not grab the input device exclusively
    #[arg(long)]
    no_grab: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// List available keyboard devices
    #[arg(long)]
    list_devices: bool,

    /// Print a starter configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn install_signal_handler(running: Arc<AtomicBool>) {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    std::thread::spawn(move || match Signals::new([SIGINT, SIGTERM]) {
        Ok(mut signals) => {
            if let Some(signal) = signals.forever().next() {
                log::info!("Received signal {}, shutting down", signal);
                running.store(false, Ordering::SeqCst);
            }
        }
        Err(e) => log::warn!("Could not install signal handler: {}", e),
    });
}

fn list_devices() -> anyhow::Result<()> {
    let devices = EvdevSource::list_keyboards().map_err(AccentError::from)?;
    if devices.is_empty() {
        println!("No keyboard devices found (are you in the 'input' group?)");
        return Ok(());
    }
    println!("Available keyboard devices:");
    for device in devices {
        println!("  {}: {} ({})", device.index, device.name, device.path.display());
    }
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let path = Config::resolve_path(args.config.as_deref());
    Config::from_toml_path(&path)
        .map_err(AccentError::from)
        .with_context(|| {
            format!(
                "cannot use {} (run with --print-default-config for a starter file)",
                path.display()
            )
        })
}

/// CLI `--device` wins over the config file; neither means autodetect.
fn device_selector(args: &Args, config: &Config) -> DeviceSelector {
    DeviceSelector::parse(args.device.as_deref().or(config.input_device.as_deref()))
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.print_default_config {
        print!("{}", default_config_content());
        return Ok(());
    }

    if args.list_devices {
        return list_devices();
    }

    let config = load_config(&args)?;

    if args.check_config {
        println!(
            "Configuration OK: {} mapping(s), trigger {}, display {}",
            config.mappings.len(),
            config.trigger,
            config.display_mode
        );
        return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    install_signal_handler(running.clone());

    let grab = config.grab && !args.no_grab;
    let source =
        EvdevSource::acquire(&device_selector(&args, &config), grab).map_err(AccentError::from)?;
    let device_name = source.name().to_string();
    let sink = VirtualDevice::new().map_err(AccentError::from)?;
    let feedback = feedback::for_mode(config.display_mode);

    let router = EventRouter::new(&config.mappings, sink, feedback)
        .with_trigger(config.trigger)
        .with_unicode_keys(config.unicode);
    let mut pipeline = Pipeline::new(source, router);

    println!(
        "accentflow is running on '{}'. Hold {} and tap a letter. Press Ctrl+C to exit.",
        device_name,
        config.trigger
    );

    let result = pipeline.run(&running);

    // Ungrab the physical keyboard before the virtual one goes away.
    let (source, sink, _feedback) = pipeline.into_parts();
    drop(source);
    if let Err(e) = sink.close() {
        log::warn!("Failed to release held keys: {}", e);
    }

    let stats = result?;
    log::info!(
        "Stopped after {} event(s), {} committed, {} dropped",
        stats.events,
        stats.committed,
        stats.dropped
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["accentflow", "--config", "/tmp/test.toml"]);

        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
        assert_eq!(args.device, None);
        assert!(!args.no_grab);
        assert!(!args.verbose);
        assert!(!args.check_config);
        assert!(!args.list_devices);
        assert!(!args.print_default_config);
    }

    #[test]
    fn test_args_with_options() {
        let args = Args::parse_from([
            "accentflow",
            "-c",
            "/tmp/test.toml",
            "-d",
            "/dev/input/event4",
            "--no-grab",
            "-v",
        ]);

        assert_eq!(args.device.as_deref(), Some("/dev/input/event4"));
        assert!(args.no_grab);
        assert!(args.verbose);
    }

    #[test]
    fn test_args_list_devices() {
        let args = Args::parse_from(["accentflow", "--list-devices"]);
        assert!(args.list_devices);
    }

    #[test]
    fn test_args_check_config() {
        let args = Args::parse_from(["accentflow", "--check-config"]);
        assert!(args.check_config);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_device_precedence() {
        let config = Config {
            input_device: Some("/dev/input/event2".to_string()),
            ..Config::default()
        };

        let args = Args::parse_from(["accentflow", "--device", "AT Translated Set 2 keyboard"]);
        assert_eq!(
            device_selector(&args, &config),
            DeviceSelector::Name("AT Translated Set 2 keyboard".to_string())
        );

        let args = Args::parse_from(["accentflow"]);
        assert_eq!(
            device_selector(&args, &config),
            DeviceSelector::Path(PathBuf::from("/dev/input/event2"))
        );

        assert_eq!(
            device_selector(&args, &Config::default()),
            DeviceSelector::Autodetect
        );
    }
}
