use zoro::api_server::start_server;
use zoro::cli::{parse_command, Command, USAGE};
use zoro::core::advisor::Advisor;
use zoro::core::cortex::Cortex;
use zoro::core::r#loop::chat_loop;
use zoro::core::state::{ZoroConfig, ZORO_DIR};
use zoro::memory::{demo_catalog, GraphCatalog};

use anyhow::Result;
use colored::*;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_filename(".env").ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match parse_command(&args)? {
        Command::Init => init_workspace(),
        Command::Seed => seed_graph().await,
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Serve { port } => {
            let config = ZoroConfig::load()?;
            let advisor = build_advisor(&config).await?;
            start_server(advisor, port.unwrap_or(config.server.port)).await
        }
        Command::Chat => {
            let config = ZoroConfig::load()?;
            let advisor = build_advisor(&config).await?;
            chat_loop(BufReader::new(tokio::io::stdin()), &advisor).await
        }
    }
}

async fn build_advisor(config: &ZoroConfig) -> Result<Advisor> {
    let model = Arc::new(Cortex::new(config));
    let catalog = Arc::new(GraphCatalog::connect(&config.graph).await?);
    Ok(Advisor::new(model, catalog, config.memory_window))
}

async fn seed_graph() -> Result<()> {
    let config = ZoroConfig::load()?;
    let catalog = GraphCatalog::connect(&config.graph).await?;
    let courses = demo_catalog();
    catalog.seed_courses(&courses).await?;

    println!("{} Seeded {} courses into {}", "🌱".green(), courses.len(), config.graph.uri);
    for course in &courses {
        println!("   - {} ({}, {})", course.course_name.bold(), course.duration, course.fees);
    }
    Ok(())
}

fn init_workspace() -> Result<()> {
    let zoro_path = Path::new(ZORO_DIR);
    if zoro_path.join("config.toml").exists() {
        println!("{}", "✅ Zoro is already set up in this workspace.".green());
        return Ok(());
    }
    fs::create_dir_all(zoro_path)?;
    let config = ZoroConfig::default();
    let toml = toml::to_string_pretty(&config)?;
    fs::write(zoro_path.join("config.toml"), toml)?;

    let gitignore_path = Path::new(".gitignore");
    let mut gitignore = if gitignore_path.exists() {
        fs::read_to_string(gitignore_path)?
    } else {
        String::new()
    };
    if !gitignore.contains(".zoro") {
        gitignore.push_str("\n# Zoro local config\n.zoro/\n");
        fs::write(".gitignore", gitignore)?;
    }
    println!("{} Wrote {}", "🧭".green().bold(), ZoroConfig::config_path());
    Ok(())
}
