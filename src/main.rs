//! Gas Sentinel - Raspberry Pi Gas Alarm Binary
//!
//! Runs the sensor monitor on the main task and the web control page on a
//! background task.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gas_sentinel::{
    hardware, start_web_server, AlarmConfig, AlarmController, AlarmHardware, Monitor, PinConfig,
    StatusReport, WebConfig, DEFAULT_BUTTON_PIN, DEFAULT_BUZZER_PIN, DEFAULT_INDICATOR_PIN,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_SENSOR_CHANNEL, DEFAULT_THRESHOLD, DEFAULT_WEB_HOST,
    DEFAULT_WEB_PORT,
};
use tokio::sync::watch;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "gas_sentinel")]
#[command(about = "Gas Sentinel - Raspberry Pi gas alarm with web control")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Polls a gas sensor and arming button, sounds a buzzer on high readings, and serves a control page")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, default_value = DEFAULT_WEB_HOST)]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Alarm threshold as a fraction of full-scale sensor reading
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Pause between monitor cycles in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    interval: u64,

    /// Directory holding styles.css and script.js
    #[arg(long, default_value = "static")]
    static_dir: String,

    /// Enable CORS headers
    #[arg(long)]
    cors: bool,

    /// Use simulated hardware instead of GPIO (useful for non-Pi systems)
    #[arg(long)]
    no_gpio: bool,

    #[command(flatten)]
    pins: PinArgs,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Args)]
struct PinArgs {
    /// BCM pin of the indicator LED
    #[arg(long, default_value_t = DEFAULT_INDICATOR_PIN)]
    indicator_pin: u8,

    /// BCM pin of the arming button
    #[arg(long, default_value_t = DEFAULT_BUTTON_PIN)]
    button_pin: u8,

    /// BCM pin of the buzzer
    #[arg(long, default_value_t = DEFAULT_BUZZER_PIN)]
    buzzer_pin: u8,

    /// MCP3008 channel of the gas sensor
    #[arg(long, default_value_t = DEFAULT_SENSOR_CHANNEL)]
    sensor_channel: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitor and web server (default)
    Serve,

    /// Take a single status reading and exit
    Read(ReadArgs),
}

#[derive(Args)]
struct ReadArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Read(args)) => read_command(&cli, args),
        Some(Commands::Serve) | None => serve_command(&cli).await,
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn pin_config(cli: &Cli) -> PinConfig {
    PinConfig::default()
        .with_indicator_pin(cli.pins.indicator_pin)
        .with_button_pin(cli.pins.button_pin)
        .with_buzzer_pin(cli.pins.buzzer_pin)
        .with_sensor_channel(cli.pins.sensor_channel)
}

fn alarm_config(cli: &Cli) -> AlarmConfig {
    AlarmConfig::default()
        .with_threshold(cli.threshold)
        .with_poll_interval_ms(cli.interval)
}

/// Claim the configured pins, or fall back to simulated devices.
fn open_hardware(cli: &Cli) -> anyhow::Result<AlarmHardware> {
    let pins = pin_config(cli);
    pins.validate()?;

    if cli.no_gpio {
        info!("GPIO disabled, using simulated hardware");
        return Ok(hardware::SimulatedHardware::new().hardware());
    }

    #[cfg(feature = "gpio")]
    let devices = hardware::rpi::open(&pins).context("Failed to open alarm hardware")?;

    #[cfg(not(feature = "gpio"))]
    let devices = {
        warn!("GPIO support not compiled in, using simulated hardware");
        hardware::SimulatedHardware::new().hardware()
    };

    Ok(devices)
}

async fn serve_command(cli: &Cli) -> anyhow::Result<()> {
    info!("Starting gas sentinel...");

    let devices = open_hardware(cli)?;
    let (controller, button) = AlarmController::from_hardware(alarm_config(cli), devices)?;
    let monitor = Monitor::new(controller.clone(), button)?;

    let web_config = WebConfig::new(&cli.host, cli.port)
        .with_static_path(&cli.static_dir)
        .with_cors(cli.cors);

    info!("Configuration:");
    info!("  - Bind address: {}", web_config.socket_addr()?);
    info!("  - Static files: {}", web_config.static_path.display());
    info!("  - Threshold: {:.2}", cli.threshold);
    info!("  - Poll interval: {}ms", cli.interval);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!("Failed to listen for interrupt: {}", e);
                // Keep the sender alive so the services keep running.
                std::future::pending::<()>().await;
            }
        }
    });

    let mut server = tokio::spawn(start_web_server(
        web_config,
        controller.clone(),
        wait_for_shutdown(shutdown_rx.clone()),
    ));

    tokio::select! {
        result = monitor.run(wait_for_shutdown(shutdown_rx)) => {
            result.context("Monitor loop failed")?;
        }
        // Bind failure, or shutdown reaching the server first.
        result = &mut server => {
            controller.silence()?;
            result.context("Web server task panicked")?.context("Web server failed")?;
            return Ok(());
        }
    }

    server
        .await
        .context("Web server task panicked")?
        .context("Web server failed")?;

    Ok(())
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    loop {
        let stop = *rx.borrow_and_update();
        // A dropped sender also means shutdown.
        if stop || rx.changed().await.is_err() {
            break;
        }
    }
}

fn read_command(cli: &Cli, args: &ReadArgs) -> anyhow::Result<()> {
    let devices = open_hardware(cli)?;
    let (controller, _button) = AlarmController::from_hardware(alarm_config(cli), devices)?;
    let report = controller.status()?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "pretty" => print_pretty_report(&report),
        other => anyhow::bail!("Unsupported format: {}. Use 'json' or 'pretty'", other),
    }

    Ok(())
}

fn print_pretty_report(report: &StatusReport) {
    println!(
        "Gas Sentinel Reading ({})",
        chrono::DateTime::from_timestamp_millis(report.timestamp as i64)
            .unwrap_or_default()
            .format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("==========================================");
    println!("  Status:    {}", report.armed_label());
    println!("  Value:     {:.2}", report.gas_level);
    println!("  Threshold: {:.2}", report.threshold);
    println!("  {}", report.alarm_message());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["gas_sentinel", "--port", "9090", "--threshold", "0.1"])
            .unwrap();
        assert_eq!(cli.port, 9090);
        assert_eq!(cli.threshold, 0.1);
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["gas_sentinel"]).unwrap();
        assert_eq!(cli.port, DEFAULT_WEB_PORT);
        assert_eq!(cli.interval, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(pin_config(&cli), PinConfig::default());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_read_subcommand() {
        let cli = Cli::try_parse_from(["gas_sentinel", "--no-gpio", "read", "--format", "json"])
            .unwrap();
        assert!(cli.no_gpio);
        match cli.command {
            Some(Commands::Read(args)) => assert_eq!(args.format, "json"),
            _ => panic!("expected read subcommand"),
        }
    }

    #[test]
    fn test_web_flags_without_subcommand() {
        let cli = Cli::try_parse_from(["gas_sentinel", "--static-dir", "/srv/www", "--cors"])
            .unwrap();
        assert_eq!(cli.static_dir, "/srv/www");
        assert!(cli.cors);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_serve_subcommand() {
        let cli = Cli::try_parse_from(["gas_sentinel", "--cors", "serve"]).unwrap();
        assert!(cli.cors);
        assert_eq!(cli.static_dir, "static");
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }
}
