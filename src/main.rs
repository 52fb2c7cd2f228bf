use clap::{Arg, Command};
use color_eyre::Result;
use std::sync::Arc;

mod adapters;
mod application;
mod domain;
mod ports;

use adapters::{
    api::{ApiClient, HttpTaskStore},
    config::FileConfigStore,
};
use application::{EditSession, ViewController};
use domain::{StatusFilter, TaskId, TaskStatus, TimeFilter};
use ports::ConfigStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize color-eyre for better error reporting
    color_eyre::install()?;

    // Initialize logging to file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("taskpad.log")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Parse command line arguments
    let matches = Command::new("taskpad")
        .version("0.1.0")
        .about("A command-line client for a small personal task list")
        .long_about("A command-line client for a personal task list kept in a remote task store.\n\nThe store is expected at http://localhost:8002 unless overridden with --url\nor the TASKPAD_URL environment variable.")
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Task store base URL (can also be set via TASKPAD_URL env var)")
                .global(true)
        )
        .subcommand(
            Command::new("list")
                .about("List tasks as JSON")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_name("FILTER")
                        .help("all, pending, in_progress or completed")
                )
                .arg(
                    Arg::new("created")
                        .long("created")
                        .value_name("WINDOW")
                        .help("all, today, this_week or this_month")
                )
        )
        .subcommand(
            Command::new("add")
                .about("Create a new task")
                .arg(
                    Arg::new("title")
                        .help("Task title")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .value_name("TEXT")
                        .help("Optional description")
                )
        )
        .subcommand(
            Command::new("get")
                .about("Get a specific task by ID")
                .arg(
                    Arg::new("task_id")
                        .help("Task ID to fetch")
                        .required(true)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("toggle")
                .about("Advance a task one step around the status cycle")
                .arg(
                    Arg::new("task_id")
                        .help("Task ID to advance")
                        .required(true)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("edit")
                .about("Edit a task's fields")
                .arg(
                    Arg::new("task_id")
                        .help("Task ID to edit")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .value_name("TEXT")
                        .help("New title")
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .value_name("TEXT")
                        .help("New description")
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_name("STATUS")
                        .help("pending, in_progress or completed")
                )
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a task")
                .arg(
                    Arg::new("task_id")
                        .help("Task ID to delete")
                        .required(true)
                        .index(1)
                )
        )
        .get_matches();

    // Load configuration
    let config_store = Arc::new(FileConfigStore::new()?);
    let mut config = config_store.load_config().await?;

    // Override with command line arguments or environment variables
    if let Some(url) = matches.get_one::<String>("url") {
        config.api_base_url = Some(url.clone());
    } else if let Ok(url) = std::env::var("TASKPAD_URL") {
        config.api_base_url = Some(url);
    }

    // Save config if we got new values
    config_store.save_config(&config).await?;

    // Create dependencies
    let api_client = ApiClient::new(config.base_url(), config.request_timeout_seconds);
    let store = Arc::new(HttpTaskStore::new(api_client));
    let controller = ViewController::new(store);

    // Handle subcommands
    match matches.subcommand() {
        Some(("list", sub)) => {
            let status = match sub.get_one::<String>("status") {
                Some(raw) => raw.parse::<StatusFilter>()?,
                None => StatusFilter::All,
            };
            let created = match sub.get_one::<String>("created") {
                Some(raw) => raw.parse::<TimeFilter>()?,
                None => TimeFilter::All,
            };

            controller.set_time_filter(created).await;
            match controller.set_status_filter(status).await {
                Ok(()) => {
                    let tasks = controller.visible_tasks().await;
                    let json = serde_json::to_string_pretty(&tasks)?;
                    println!("{json}");
                }
                Err(e) => {
                    eprintln!("❌ Failed to list tasks: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(("add", sub)) => {
            if let Some(title) = sub.get_one::<String>("title") {
                let description = sub.get_one::<String>("description").cloned();

                match controller.add_task(title.clone(), description).await {
                    Ok(task) => {
                        let json = serde_json::to_string_pretty(&task)?;
                        println!("{json}");
                    }
                    Err(e) => {
                        eprintln!("❌ Failed to add task: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
        Some(("get", sub)) => {
            if let Some(task_id) = sub.get_one::<String>("task_id") {
                let id = TaskId::from(task_id.as_str());

                match controller.fetch_task(&id).await {
                    Ok(task) => {
                        let json = serde_json::to_string_pretty(&task)?;
                        println!("{json}");
                    }
                    Err(e) => {
                        eprintln!("❌ Failed to get task: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
        Some(("toggle", sub)) => {
            if let Some(task_id) = sub.get_one::<String>("task_id") {
                let id = TaskId::from(task_id.as_str());

                let result = async {
                    controller.refresh().await?;
                    controller.advance_status(&id).await
                };
                match result.await {
                    Ok(task) => {
                        let json = serde_json::to_string_pretty(&task)?;
                        println!("{json}");
                    }
                    Err(e) => {
                        eprintln!("❌ Failed to toggle task status: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
        Some(("edit", sub)) => {
            if let Some(task_id) = sub.get_one::<String>("task_id") {
                let id = TaskId::from(task_id.as_str());
                let new_title = sub.get_one::<String>("title").cloned();
                let new_description = sub.get_one::<String>("description").cloned();
                let new_status = match sub.get_one::<String>("status") {
                    Some(raw) => Some(raw.parse::<TaskStatus>()?),
                    None => None,
                };

                if new_title.is_none() && new_description.is_none() && new_status.is_none() {
                    eprintln!("❌ Nothing to change: pass --title, --description and/or --status");
                    std::process::exit(1);
                }

                let result = async {
                    controller.refresh().await?;
                    controller.begin_edit(&id).await?;

                    // Buffers are seeded from the task's current values;
                    // lay the given flags over them and commit.
                    if let EditSession::Editing {
                        title,
                        description,
                        status,
                        ..
                    } = controller.edit_session().await
                    {
                        controller
                            .stage_edit(
                                new_title.unwrap_or(title),
                                new_description.or(description),
                                new_status.unwrap_or(status),
                            )
                            .await?;
                    }
                    controller.save_edit().await
                };
                match result.await {
                    Ok(task) => {
                        let json = serde_json::to_string_pretty(&task)?;
                        println!("{json}");
                    }
                    Err(e) => {
                        eprintln!("❌ Failed to edit task: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
        Some(("delete", sub)) => {
            if let Some(task_id) = sub.get_one::<String>("task_id") {
                let id = TaskId::from(task_id.as_str());

                match controller.remove_task(&id).await {
                    Ok(()) => {
                        println!("Deleted task {id}");
                    }
                    Err(e) => {
                        eprintln!("❌ Failed to delete task: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
        _ => {
            eprintln!("❌ No command given. Try --help for usage.");
            std::process::exit(1);
        }
    }

    Ok(())
}
