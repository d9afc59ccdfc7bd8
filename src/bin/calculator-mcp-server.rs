// ABOUTME: Server binary for the calculator MCP streamable HTTP transport
// ABOUTME: Loads configuration, initializes logging, and serves until a shutdown signal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Calculator MCP Server Binary
//!
//! Serves the MCP endpoint at `http://{host}:{port}/mcp` with the calculator tools.

use anyhow::Result;
use calculator_mcp_server::{
    config::environment::ServerConfig, logging::LoggingConfig, mcp::resources::ServerResources,
    server::McpHttpServer, tools::CalculatorRegistry,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "calculator-mcp-server")]
#[command(about = "Calculator MCP Server - JSON-RPC 2.0 over streamable HTTP")]
pub struct Args {
    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;

    LoggingConfig::for_server(&config).init()?;

    info!("Starting Calculator MCP Server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::new(config, Arc::new(CalculatorRegistry)));
    let tool_count = resources.processor.registry().list_tools().len();
    info!(tools = tool_count, "tool registry ready");

    if let Err(e) = McpHttpServer::new(resources).run().await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
