// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::fs;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use event_router::config::{load_config, RouterConfig};
use event_router::demo::sharpen_pencils_router;
use event_router::engine::JsonPassthrough;
use event_router::observability::init_tracing;

const USAGE: &str = "Usage: event-router [--config <router.yaml|router.toml>] <event.json | '{\"workflow\": ...}'> [more events ...]";

struct CliArgs {
    config: Option<String>,
    events: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut config = None;
    let mut events = Vec::new();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        if arg == "--config" {
            match iter.next() {
                Some(path) => config = Some(path.clone()),
                None => bail!("--config needs a file path\n{}", USAGE),
            }
        } else {
            events.push(arg.clone());
        }
    }

    if events.is_empty() {
        bail!("{}", USAGE);
    }
    Ok(CliArgs { config, events })
}

/// Inline JSON if the argument looks like an object, otherwise a file path.
fn read_event(arg: &str) -> Result<Value> {
    let content = if arg.trim_start().starts_with('{') {
        arg.to_string()
    } else {
        fs::read_to_string(arg).with_context(|| format!("cannot read event file {}", arg))?
    };
    serde_json::from_str(&content).with_context(|| format!("event is not valid JSON: {}", arg))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    init_tracing(&config.logging)?;

    let events = cli
        .events
        .iter()
        .map(|arg| read_event(arg))
        .collect::<Result<Vec<_>>>()?;

    let router = Arc::new(sharpen_pencils_router(&config)?);
    let handler = Arc::new(router.create_handler_with(JsonPassthrough, Vec::new()));

    println!("🚀 Event Router Demo");
    println!("═══════════════════════════════════");
    println!("Matching: {:?}", config.matching);
    println!("Events: {}", events.len());

    // Overlapping invocations share the router but nothing else
    let start_time = Instant::now();
    let tasks: Vec<_> = events
        .into_iter()
        .map(|event| {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let started = Instant::now();
                let response = handler.call(event.clone()).await;
                (event, response, started.elapsed())
            })
        })
        .collect();

    let mut failures = 0;
    for task in tasks {
        let (event, response, elapsed) = task.await?;
        println!("\n📨 Event: {}", event);
        match response {
            Ok(body) => println!("✅ Response ({:?}): {}", elapsed, serde_json::to_string_pretty(&body)?),
            Err(e) => {
                failures += 1;
                println!("❌ Failed ({:?}): {}", elapsed, e);
            }
        }
    }

    println!("\n🎉 Done in {:?}", start_time.elapsed());
    if failures > 0 {
        bail!("{} event(s) could not be routed", failures);
    }
    Ok(())
}
