use clap::Parser;
use mcp_bridge::bridge::{Bridge, Endpoint};
use std::process::ExitCode;
use tokio::runtime::Builder;

/// Stdio-to-TCP bridge for the Eclipse MCP server.
/// Forwards stdin/stdout to a TCP connection, line by line, until either
/// side closes.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Host the Eclipse MCP server listens on.
    #[arg(default_value = "localhost")]
    host: String,

    /// TCP port of the Eclipse MCP server.
    #[arg(default_value_t = 8099, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,
}

fn run(args: Args) -> ExitCode {
    let endpoint = Endpoint {
        host: args.host,
        port: args.port,
    };

    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("failed to build async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(async move {
        let bridge = match Bridge::connect(&endpoint).await {
            Ok(bridge) => bridge,
            Err(e) => {
                log::debug!("{:?}", e);
                eprintln!("Cannot connect to Eclipse MCP server at {}", endpoint);
                eprintln!("Make sure Eclipse is running with the MCP plugin.");
                return ExitCode::FAILURE;
            }
        };

        bridge.run().await;
        ExitCode::SUCCESS
    });

    // When the server closes first, a stdin read is still parked on the
    // blocking pool; dropping the runtime would wait for it forever.
    runtime.shutdown_background();
    code
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    run(args)
}
