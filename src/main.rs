//! # Search-A-Word CLI Driver
//!
//! ## Purpose
//! Command line front end for the Search-A-Word client: login/register,
//! document upload and listing, in-document word search with highlighted
//! output, letter search with result download, and the analytics views.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Wire the shared client (session, notifications, transport)
//! 4. Subscribe toast output to stderr
//! 5. Dispatch the subcommand and render its result

use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use searchaword_client::api::auth::RegisterOutcome;
use searchaword_client::errors::{ClientError, Result};
use searchaword_client::{Config, SearchAWordClient, Workspace};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::debug!(category = e.category(), "command failed");
        eprintln!("{}", user_message(&e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let matches = Command::new("searchaword")
        .version("0.1.0")
        .about("Client for the Search-A-Word document search service")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("searchaword.toml"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .about("Log in and persist the session token")
                .arg(Arg::new("username").required(true))
                .arg(Arg::new("password").required(true)),
        )
        .subcommand(
            Command::new("register")
                .about("Register a new account, then log in with it")
                .arg(Arg::new("username").required(true))
                .arg(Arg::new("password").required(true)),
        )
        .subcommand(Command::new("logout").about("Clear the persisted session token"))
        .subcommand(Command::new("whoami").about("Show the current session username"))
        .subcommand(
            Command::new("upload")
                .about("Upload a PDF, DOCX or TXT document")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("list").about("List uploaded documents"))
        .subcommand(
            Command::new("open")
                .about("Open a document, optionally searching for a word")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("word")
                        .long("word")
                        .value_name("WORD")
                        .help("Highlight whole-word matches of WORD"),
                ),
        )
        .subcommand(
            Command::new("letters")
                .about("Find and highlight words matching a letter set")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("letters").required(true))
                .arg(
                    Arg::new("download")
                        .long("download")
                        .value_name("TYPE")
                        .help("Also download the result as txt or pdf"),
                ),
        )
        .subcommand(
            Command::new("trends")
                .about("Show daily search counts")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_name("DATE")
                        .value_parser(value_parser!(NaiveDate)),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("DATE")
                        .value_parser(value_parser!(NaiveDate)),
                ),
        )
        .subcommand(
            Command::new("top").about("Show the most frequent queries").arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize))
                    .default_value("10"),
            ),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").expect("has default");
    let config = Config::from_file(config_path)?;
    init_logging(&config)?;

    let client = SearchAWordClient::new(config)?;

    // toasts surface on stderr as they are emitted
    client.notifications.subscribe(Arc::new(|toast| {
        if let Some(toast) = toast {
            eprintln!("[{}] {}", toast.kind.as_str(), toast.text);
        }
    }));

    match matches.subcommand() {
        Some(("login", sub)) => cmd_login(&client, sub).await,
        Some(("register", sub)) => cmd_register(&client, sub).await,
        Some(("logout", _)) => cmd_logout(&client),
        Some(("whoami", _)) => cmd_whoami(&client),
        Some(("upload", sub)) => cmd_upload(&client, sub).await,
        Some(("list", _)) => cmd_list(&client).await,
        Some(("open", sub)) => cmd_open(&client, sub).await,
        Some(("letters", sub)) => cmd_letters(&client, sub).await,
        Some(("trends", sub)) => cmd_trends(&client, sub).await,
        Some(("top", sub)) => cmd_top(&client, sub).await,
        _ => unreachable!("subcommand is required"),
    }
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let level: tracing::Level =
        config
            .logging
            .level
            .parse()
            .map_err(|_| ClientError::Config {
                message: format!("Invalid log level: {}", config.logging.level),
            })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .with_filter(filter),
            )
            .init();
    }

    Ok(())
}

async fn cmd_login(client: &SearchAWordClient, sub: &ArgMatches) -> Result<()> {
    let username = sub.get_one::<String>("username").expect("required");
    let password = sub.get_one::<String>("password").expect("required");

    match client.auth.login(username, password).await {
        Ok(()) => {
            let name = client.session.username().unwrap_or_else(|| username.clone());
            println!("Logged in as {name}");
            Ok(())
        }
        Err(ClientError::Unauthorized { .. }) | Err(ClientError::Validation { .. }) => {
            Err(ClientError::Unauthorized {
                details: "Invalid username or password".to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

async fn cmd_register(client: &SearchAWordClient, sub: &ArgMatches) -> Result<()> {
    let username = sub.get_one::<String>("username").expect("required");
    let password = sub.get_one::<String>("password").expect("required");

    match client.auth.register_and_login(username, password).await? {
        RegisterOutcome::Authenticated => {
            println!("Registered and logged in as {username}");
        }
        RegisterOutcome::ManualLoginRequired => {
            println!("Registered. Auto login failed, please login manually.");
        }
    }
    Ok(())
}

fn cmd_logout(client: &SearchAWordClient) -> Result<()> {
    client.session.clear()?;
    client.notifications.info("Logged out successfully");
    Ok(())
}

fn cmd_whoami(client: &SearchAWordClient) -> Result<()> {
    match client.session.username() {
        Some(name) => println!("{name}"),
        None => println!("Not logged in"),
    }
    Ok(())
}

async fn cmd_upload(client: &SearchAWordClient, sub: &ArgMatches) -> Result<()> {
    let file = sub.get_one::<PathBuf>("file").expect("required");
    let uploaded = client.documents.upload(file).await?;

    if uploaded.cached {
        println!(
            "Document {} already known (id {}, sha256 {})",
            uploaded.file_name, uploaded.document_id, uploaded.sha256
        );
    } else {
        println!(
            "Uploaded {} as document {} ({} characters extracted)",
            uploaded.file_name,
            uploaded.document_id,
            uploaded.text.len()
        );
    }
    Ok(())
}

async fn cmd_list(client: &SearchAWordClient) -> Result<()> {
    let documents = client.documents.list().await?;
    if documents.is_empty() {
        println!("No documents uploaded yet");
        return Ok(());
    }

    println!("{:>6}  {:<32} {:>10}  {}", "ID", "NAME", "SIZE", "UPLOADED");
    for doc in documents {
        println!(
            "{:>6}  {:<32} {:>10}  {}",
            doc.id,
            doc.file_name,
            doc.file_size,
            doc.uploaded_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn cmd_open(client: &SearchAWordClient, sub: &ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").expect("required");
    let document = client.documents.get(id).await?;

    let mut workspace = Workspace::new();
    let ticket = workspace.begin_open();
    workspace.finish_open(ticket, document);

    if let Some(word) = sub.get_one::<String>("word") {
        let matches = workspace.search_word(word).expect("document is open");
        println!("{} match(es) for '{}'", matches.count(), word);
        println!("{}", matches.highlighted());
    } else {
        let open = workspace.open_document().expect("document is open");
        println!("{} (id {})", open.file_name, open.id);
        println!("{}", open.text);
    }
    Ok(())
}

async fn cmd_letters(client: &SearchAWordClient, sub: &ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").expect("required");
    let letters = sub.get_one::<String>("letters").expect("required");

    let document = client.documents.get(id).await?;
    let words = client.documents.letter_search(id, letters).await?;

    let mut workspace = Workspace::new();
    let ticket = workspace.begin_open();
    workspace.finish_open(ticket, document);

    if words.is_empty() {
        println!("No words match letters '{letters}'");
    } else {
        println!("Words: {}", words.join(", "));
        let matches = workspace
            .apply_letter_results(&words)
            .expect("document is open");
        println!("{} match(es) in the document", matches.count());
        println!("{}", matches.highlighted());
    }

    if let Some(format) = sub.get_one::<String>("download") {
        let download = client
            .documents
            .download_letter_search(id, letters, format)
            .await?;
        tokio::fs::write(&download.file_name, &download.bytes).await?;
        println!("Saved {}", download.file_name);
    }
    Ok(())
}

async fn cmd_trends(client: &SearchAWordClient, sub: &ArgMatches) -> Result<()> {
    let from = sub.get_one::<NaiveDate>("from").copied();
    let to = sub.get_one::<NaiveDate>("to").copied();

    let report = client.analytics.trends(from, to).await?;
    for point in &report.points {
        println!("{}  {:>6}", point.date, point.count);
    }
    println!("Total: {}", report.total);
    Ok(())
}

async fn cmd_top(client: &SearchAWordClient, sub: &ArgMatches) -> Result<()> {
    let limit = *sub.get_one::<usize>("limit").expect("has default");
    let top = client.analytics.top_queries(limit).await?;
    for (rank, query) in top.iter().enumerate() {
        println!("{:>3}. {:<24} {:>6}", rank + 1, query.query_text, query.count);
    }
    Ok(())
}

/// Map an error onto the user-facing message for the terminal.
fn user_message(err: &ClientError) -> String {
    match err {
        ClientError::Network { .. } => {
            "Could not reach the server. Please try again.".to_string()
        }
        ClientError::Unauthorized { details } if !details.is_empty() => details.clone(),
        ClientError::Unauthorized { .. } => "Session expired. Please login again.".to_string(),
        ClientError::Forbidden { .. } => "Access denied.".to_string(),
        ClientError::Validation { .. } => "Please enter valid letters.".to_string(),
        ClientError::NotFound { .. } => "Document not found.".to_string(),
        ClientError::Conflict { .. } => "This document was already uploaded.".to_string(),
        ClientError::PayloadTooLarge { .. } => {
            "The file exceeds the server's size limit.".to_string()
        }
        ClientError::Server { .. } => "Server error. Please try again later.".to_string(),
        ClientError::UploadRejected { reason } => format!("Upload rejected: {reason}"),
        other => other.to_string(),
    }
}
