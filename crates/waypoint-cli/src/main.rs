//! Waypoint CLI
//!
//! Command-line interface and MCP server for the Waypoint scheduler.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use jiff::Zoned;
use log::info;
use mcp::{run_stdio_server, WaypointMcpServer};
use renderer::TerminalRenderer;
use waypoint_core::{
    params::{parse_date, ListPlans},
    PlanStoreBuilder,
};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        plans_dir,
        no_color,
        today,
        command,
    } = Args::parse();

    let today = today
        .as_deref()
        .map(parse_date)
        .transpose()
        .context("Invalid --today")?;

    let store = PlanStoreBuilder::new()
        .with_directory(plans_dir)
        .build()
        .await
        .context("Failed to initialize plan store")?;

    info!("Waypoint started with plans in {}", store.directory().display());

    let renderer = TerminalRenderer::new(!no_color);
    let local_today = || today.unwrap_or_else(|| Zoned::now().date());

    match command {
        Some(Goal { command }) => {
            Cli::new(store, renderer, local_today())
                .handle_goal_command(command)
                .await
        }
        Some(Plan { command }) => {
            Cli::new(store, renderer, local_today())
                .handle_plan_command(command)
                .await
        }
        Some(Task { command }) => {
            Cli::new(store, renderer, local_today())
                .handle_task_command(command)
                .await
        }
        Some(Serve) => {
            info!("Starting Waypoint MCP server");
            run_stdio_server(WaypointMcpServer::new(store, today))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(store, renderer, local_today())
                .list_plans(&ListPlans::default())
                .await
        }
    }
}
