//! # Etiqueta CLI
//!
//! Command-line interface for label rendering and printing.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP service against a network printer
//! etiqueta serve --port 8013 tcp://192.168.0.23:9100
//!
//! # Print one label
//! etiqueta print --label-size 29x90 "Hello" file:///dev/usb/lp0
//!
//! # Save a label as PNG instead of printing
//! etiqueta print --png label.png "Hello"
//!
//! # List label sizes and fonts
//! etiqueta sizes
//! etiqueta fonts --font-folder /usr/share/fonts/truetype/dejavu
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use etiqueta::{
    LabelError,
    config::Config,
    encoder::MonoRasterEncoder,
    label::LabelCatalog,
    orchestrator::Orchestrator,
    request::{Flow, LabelForm},
    server::{self, ServerConfig},
    transport::{Backends, guess_backend},
};

/// Etiqueta - label printing service
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./config.json when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true)]
    loglevel: Option<String>,

    /// Folder with additional .ttf/.otf fonts
    #[arg(long, global = true, value_name = "DIR")]
    font_folder: Option<PathBuf>,

    /// Default label size when a request names none
    #[arg(long, global = true)]
    default_label_size: Option<String>,

    /// Default orientation: standard or rotated
    #[arg(long, global = true)]
    default_orientation: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Encode labels but do not send them to the printer
        #[arg(long)]
        dry_run: bool,

        /// Printer descriptor (like tcp://192.168.0.23:9100 or file:///dev/usb/lp0)
        printer: Option<String>,
    },
    /// Print a single label
    Print {
        /// Label text; use \n for line breaks
        text: String,

        /// Printer descriptor (like tcp://192.168.0.23:9100 or file:///dev/usb/lp0)
        printer: Option<String>,

        /// Label size id (see `etiqueta sizes`)
        #[arg(long)]
        label_size: Option<String>,

        /// Font as "Family (Style)"
        #[arg(long)]
        font: Option<String>,

        /// Font size in pixels
        #[arg(long)]
        font_size: Option<u32>,

        /// standard or rotated
        #[arg(long)]
        orientation: Option<String>,

        /// left, center or right
        #[arg(long)]
        align: Option<String>,

        /// Output to PNG file instead of printing
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Encode but do not send to the printer
        #[arg(long)]
        dry_run: bool,
    },
    /// List known label sizes
    Sizes,
    /// List available fonts
    Fonts,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.server.log_level.as_str()),
    )
    .init();

    if let Err(e) = run(cli, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load the config file and apply the global CLI overrides.
fn load_config(cli: &Cli) -> Result<Config, LabelError> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(level) = &cli.loglevel {
        config.server.log_level = level.to_lowercase();
    }
    if let Some(folder) = &cli.font_folder {
        config.server.font_folders.push(folder.clone());
    }
    if let Some(size) = &cli.default_label_size {
        config.label.default_size = size.clone();
    }
    if let Some(orientation) = &cli.default_orientation {
        config.label.default_orientation = orientation.clone();
    }

    Ok(config)
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator, LabelError> {
    let fonts = Arc::new(config.font_catalog());
    let labels = Arc::new(LabelCatalog::builtin());
    let defaults = config.defaults(&fonts, &labels)?;
    let settings = config.printer_settings();

    if !settings.dry_run {
        guess_backend(&settings.target)?;
    }

    Ok(Orchestrator::new(
        fonts,
        labels.clone(),
        defaults,
        Arc::new(MonoRasterEncoder::new(labels)),
        Arc::new(Backends {
            write_timeout: config.write_timeout(),
        }),
        settings,
    ))
}

fn run(cli: Cli, mut config: Config) -> Result<(), LabelError> {
    match cli.command {
        Commands::Serve {
            host,
            port,
            dry_run,
            printer,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(printer) = printer {
                config.printer.target = printer;
            }
            config.printer.dry_run |= dry_run;

            let orchestrator = Arc::new(build_orchestrator(&config)?);
            let server_config = ServerConfig {
                listen_addr: config.listen_addr(),
            };

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(server_config, orchestrator))
        }
        Commands::Print {
            text,
            printer,
            label_size,
            font,
            font_size,
            orientation,
            align,
            png,
            dry_run,
        } => {
            if let Some(printer) = printer {
                config.printer.target = printer;
            }
            config.printer.dry_run |= dry_run || png.is_some();

            let orchestrator = build_orchestrator(&config)?;
            let form = LabelForm {
                text: Some(text.replace("\\n", "\n")),
                font_family: font,
                font_size: font_size.map(|s| s.to_string()),
                label_size,
                orientation,
                align,
                ..Default::default()
            };

            if let Some(png_path) = png {
                let label = orchestrator.render(&form, Flow::Print)?;
                label
                    .image
                    .save(&png_path)
                    .map_err(|e| LabelError::Image(format!("Failed to save PNG: {}", e)))?;
                println!(
                    "Saved {}x{} label to {}",
                    label.image.width(),
                    label.image.height(),
                    png_path.display()
                );
                return Ok(());
            }

            match orchestrator.try_print(&form)? {
                Some(data) => println!("{}", data),
                None => println!("Printed successfully!"),
            }
            Ok(())
        }
        Commands::Sizes => {
            let labels = LabelCatalog::builtin();
            for spec in labels.iter() {
                let marker = if spec.id == config.label.default_size { "*" } else { " " };
                println!("{} {:<8} {}", marker, spec.id, spec.name);
            }
            Ok(())
        }
        Commands::Fonts => {
            let fonts = config.font_catalog();
            for family in fonts.families() {
                println!("{} ({})", family, fonts.styles(family).join(", "));
            }
            Ok(())
        }
    }
}
