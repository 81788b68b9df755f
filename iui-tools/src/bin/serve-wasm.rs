use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use env_logger::{Env, Target};
use iui_tools::server::{open_in_browser, DEFAULT_BIND, DEFAULT_PORT};
use iui_tools::{cli, AssetManifest, ServeError, Server, ServerConfig};

/// Serves the libiui WebAssembly demo with the MIME types and cross-origin
/// isolation headers it needs.
#[derive(Parser)]
#[command(name = "serve-wasm", version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Open the demo in the default browser
    #[arg(short, long)]
    open: bool,
    /// Directory holding the web assets
    #[arg(long, value_name = "PATH", default_value = "assets/web")]
    dir: PathBuf,
    /// Address to listen on
    #[arg(long, value_name = "ADDR", default_value = DEFAULT_BIND)]
    bind: String,
}

fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn,iui_tools=info"))
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}",
                Local::now().format("%d/%b/%Y %H:%M:%S"),
                record.args()
            )
        })
        .init();
}

fn print_banner(dir: &str, url: &str) {
    let rule = "=".repeat(60);
    println!();
    println!("{rule}");
    println!("  libiui WebAssembly Development Server");
    println!("{rule}");
    println!();
    println!("  Serving: {dir}");
    println!("  URL:     {url}");
    println!();
    println!("  Press Ctrl+C to stop");
    println!();
    println!("{rule}");
    println!();
}

fn main() -> Result<()> {
    let args: Args = cli::parse_or_exit();
    init_logging();

    let dir = fs::canonicalize(&args.dir).unwrap_or_else(|_| args.dir.clone());
    let preflight = match AssetManifest::default().check(&dir) {
        Ok(preflight) => preflight,
        Err(err) => {
            eprintln!("Error: {err}");
            if let ServeError::MissingDirectory(_) = err {
                eprintln!("Please run 'make wasm-install' first to build WebAssembly files.");
            }
            process::exit(1);
        }
    };

    if !preflight.is_complete() {
        println!(
            "Warning: WebAssembly build files not found: {}",
            preflight.missing_optional.join(", ")
        );
        println!("Please run 'CC=emcc make' to build the WebAssembly version.");
        println!();
    }

    let config = ServerConfig::new(&preflight.dir)
        .with_bind(args.bind)
        .with_port(args.port);
    let server = Server::bind(&config)?;

    let handle = server.shutdown_handle();
    ctrlc::set_handler(move || handle.shutdown()).context("failed to install Ctrl+C handler")?;

    let url = server.url();
    print_banner(&server.root().display().to_string(), &url);

    if args.open {
        open_in_browser(&url, webbrowser::open);
    }

    server.run();
    println!("\nServer stopped.");

    Ok(())
}
