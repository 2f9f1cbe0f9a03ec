//! Application startup
//!
//! Resolves settings from the command line and configuration file, starts
//! logging and the async runtime, and runs one lag session against NATS.

use crate::app::cli::{Args, ConsoleReport};
use crate::broker::api::NatsConnector;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{flush_logging, init_logging};
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::version::long_version;
use crate::lag::api::LagSession;
use std::io::IsTerminal;

/// Exit status for configuration and argument errors
const EXIT_INVALID_ARGUMENT: i32 = 2;

/// Run the application and exit with its status code
pub fn startup() {
    let args = Args::parse_from_env();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let code = runtime.block_on(run(args));
    log::info!("Exiting...");
    drop(runtime);
    flush_logging();
    std::process::exit(code);
}

async fn run(mut args: Args) -> i32 {
    // Logging is not up yet; configuration errors go straight to stderr
    let loaded = match Args::load_config_file(&mut args, Args::default_config_path()).await {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_INVALID_ARGUMENT;
        }
    };

    let log_color = args.use_color(std::io::stderr().is_terminal()) && args.log_file_path().is_none();
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        args.log_file_path(),
        log_color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return EXIT_INVALID_ARGUMENT;
    }

    log::debug!("streamlag {}", long_version());
    if let Some(config) = &loaded {
        log::debug!("Loaded configuration from {}", config.path.display());
        for key in &config.ignored_keys {
            log::debug!("Ignoring unknown configuration key '{}'", key);
        }
    }

    if let Err(e) = args.validate() {
        log_error_with_context(&e, "Validating arguments");
        return EXIT_INVALID_ARGUMENT;
    }
    let options = match args.session_options() {
        Ok(options) => options,
        Err(e) => {
            log_error_with_context(&e, "Validating arguments");
            return EXIT_INVALID_ARGUMENT;
        }
    };
    log::debug!("Session options: {:?}", options);

    let format = args.report_format().unwrap_or_default();
    let stdout = std::io::stdout();
    let report_color = args.use_color(stdout.is_terminal());
    let mut sink = ConsoleReport::new(stdout, format)
        .with_clamp_negative(args.clamp_negative)
        .with_color(report_color);

    let shutdown = ShutdownCoordinator::install();
    let session = LagSession::new(NatsConnector, options);

    match session
        .run(args.stream_name(), Some(&shutdown), &mut sink)
        .await
    {
        Ok(summary) => {
            log::debug!(
                "Reported {} durable consumer(s) on '{}', skipped {} ephemeral",
                summary.durable,
                summary.snapshot.name,
                summary.ephemeral
            );
            0
        }
        Err(e) => {
            log_error_with_context(&e, "Reporting consumer lag");
            e.exit_code()
        }
    }
}
