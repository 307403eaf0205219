//! cycles-mcp - MCP server for cycle-based development workflows.
//!
//! Without a subcommand the binary speaks MCP on stdin/stdout, which is how
//! MCP clients launch it. The other subcommands are for humans and scripts.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cycles_mcp::core::ServerConfig;
use cycles_mcp::mcp::{format_tool, list_resources, tool_definitions, CyclesServer, ToolContent};

/// MCP server for cycle-based development workflows
#[derive(Parser)]
#[command(name = "cycles-mcp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Server configuration file (TOML), overriding $CYCLES_CONFIG
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (default)
    Serve,

    /// List the available tools and resources
    Tools,

    /// Call a tool once and print its result
    Call {
        /// Tool name (e.g. update-progress)
        name: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries JSON-RPC.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        None | Some(Commands::Serve) => {
            let config = load_config(cli.config.as_deref())?;
            cmd_serve(config)?;
        }
        Some(Commands::Tools) => {
            cmd_tools();
        }
        Some(Commands::Call { name, args }) => {
            let config = load_config(cli.config.as_deref())?;
            if !cmd_call(config, &name, &args)? {
                std::process::exit(1);
            }
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load_from_file(path),
        None => ServerConfig::load(),
    }
}

/// Serve MCP on stdio until the client closes stdin.
fn cmd_serve(config: ServerConfig) -> Result<()> {
    let server = CyclesServer::new(config);
    server.serve(io::stdin().lock(), io::stdout().lock()).context("MCP server I/O failed")
}

/// Print the tool and resource catalog.
fn cmd_tools() {
    println!("Tools:\n");
    for tool in tool_definitions() {
        println!("{}\n", format_tool(&tool));
    }

    println!("Resources:\n");
    for resource in list_resources() {
        println!("{}  {}", resource.uri, resource.name);
    }
}

/// Run one tool. Returns whether it succeeded.
fn cmd_call(config: ServerConfig, name: &str, args: &str) -> Result<bool> {
    let arguments: serde_json::Value =
        serde_json::from_str(args).with_context(|| format!("Invalid JSON in --args: {args}"))?;

    let server = CyclesServer::new(config);
    let result = server.call_tool(name, arguments);

    let mut stdout = io::stdout().lock();
    for content in &result.content {
        let ToolContent::Text { text } = content;
        writeln!(stdout, "{text}")?;
    }

    Ok(!result.is_error.unwrap_or(false))
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "cycles-mcp", &mut io::stdout());
}
