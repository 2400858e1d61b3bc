//! hellorun - minimal Cloud Run service and its release pipeline
//!
//! Usage:
//! - Serve (container entrypoint): `hellorun`
//! - Custom port: `hellorun --port 9090`
//! - Run the release pipeline: `hellorun deploy`
//! - Keep the run report: `hellorun deploy --report run.json`

use std::path::PathBuf;

use hellorun::RuntimeConfig;

/// Parse command line arguments
fn parse_args() -> RuntimeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RuntimeConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                config.port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--report" if i + 1 < args.len() => {
                config.report_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("hellorun - minimal Cloud Run service and its release pipeline");
    println!();
    println!("USAGE:");
    println!("    hellorun [OPTIONS] [COMMAND]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>      Override the listening port (serve mode)");
    println!("    --report <PATH>    Write the JSON run report (deploy mode)");
    println!("    -h, --help         Print help information");
    println!();
    println!("COMMANDS:");
    println!("    deploy             Build, push and deploy the service");
    println!();
    println!("EXAMPLES:");
    println!("    hellorun                            # Serve on PORT (default 8080)");
    println!("    hellorun --port 9090                # Serve on a custom port");
    println!("    hellorun deploy                     # Run the release pipeline");
    println!("    hellorun deploy --report run.json   # Keep the run report");
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let config = parse_args();

    hellorun::init_tracing();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");

    // Deploy mode: run the pipeline once and exit with its code
    if args.len() >= 2 && args[1] == "deploy" {
        let code = rt.block_on(hellorun::run_release(config));
        std::process::exit(code);
    }

    // Serve mode
    if let Err(e) = rt.block_on(hellorun::init_and_serve(config)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
