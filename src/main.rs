//! Bubble CLI
//!
//! Command-line front end for the Bubble client:
//! - Log in, register and log out
//! - List the feed and delete your posts
//! - Upload photos and videos
//! - Check backend health

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use bubble::config::{generate_default_config, LoggingConfig};
use bubble::notify::drain;
use bubble::views::{HealthStatus, BRAND};
use bubble::{App, Config, HydrationOutcome, Toast};

#[derive(Parser)]
#[command(name = "bubble")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Share photos and videos from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show backend health
    Health,

    /// Log in and store the session token
    Login {
        email: String,
        /// Password (default: read from stdin)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        email: String,
        /// Password (default: read from stdin)
        #[arg(short, long)]
        password: Option<String>,
        /// Password confirmation (default: same as password)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Log out and forget the stored token
    Logout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the logged-in user
    Whoami,

    /// List posts, newest first
    Feed,

    /// Delete one of your posts
    Delete {
        /// Post id
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Upload a photo or video
    Upload {
        /// Path to an image or video file
        path: PathBuf,
        #[arg(short, long, default_value = "")]
        caption: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(Config::default_path);
    let mut config = Config::load_from(config_path.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    init_logging(&config.logging);
    match &config_path {
        Some(path) => tracing::debug!("Loaded config from {:?}", path),
        None => tracing::debug!("Using default config with environment overrides"),
    }

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let app = App::new(config).await?;
    let mut toasts = app.notifier().subscribe();

    let result = run(&cli, &app).await;
    print_toasts(&mut toasts);

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bubble={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: &Cli, app: &App) -> anyhow::Result<()> {
    let json = cli.format == "json";

    match &cli.command {
        Commands::Health => {
            let mut home = app.home();
            match home.settled().await {
                HealthStatus::Ready(message) => {
                    if json {
                        println!("{}", serde_json::json!({ "message": message }));
                    } else {
                        println!("{} ({})", BRAND, app.api().base_url());
                        println!("{}", message);
                    }
                }
                status => bail!("{}", status.text()),
            }
        }

        Commands::Login { email, password } => {
            let mut form = app.login_form();
            form.email = email.clone();
            form.password = match password {
                Some(p) => p.clone(),
                None => read_line("Password: ")?,
            };
            if !form.submit(app.session()).await {
                bail!("Login failed");
            }
            print_user(app, json).await?;
        }

        Commands::Register {
            email,
            password,
            confirm,
        } => {
            let mut form = app.register_form();
            form.email = email.clone();
            form.password = match password {
                Some(p) => p.clone(),
                None => read_line("Password: ")?,
            };
            form.confirm_password = match confirm {
                Some(c) => c.clone(),
                None => form.password.clone(),
            };
            if !form.submit(app.session()).await {
                bail!("Registration failed");
            }
            print_user(app, json).await?;
        }

        Commands::Logout { yes } => {
            let mut navbar = app.navbar();
            navbar.request_logout();
            let prompt = navbar.logout_prompt();
            if *yes || confirm(prompt.title, prompt.message)? {
                navbar.confirm_logout(app.session()).await?;
            } else {
                navbar.cancel_logout();
            }
        }

        Commands::Whoami => {
            require_session(app).await?;
            print_user(app, json).await?;
        }

        Commands::Feed => {
            require_session(app).await?;
            let mut feed = app.feed();
            feed.load().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(feed.posts())?);
            } else if feed.is_empty() {
                println!("No posts yet.");
                println!();
                println!("Share your first one with:");
                println!("  bubble upload <path> --caption \"...\"");
            } else {
                println!(
                    "{:<36}  {:<6} {:<17} {:<24} {}",
                    "ID", "Type", "Posted", "Owner", "Caption"
                );
                println!("{}", "-".repeat(100));
                for post in feed.posts() {
                    let owner = if post.is_owner { "you" } else { post.email.as_str() };
                    println!(
                        "{:<36}  {:<6} {:<17} {:<24} {}",
                        post.id,
                        post.file_type.to_string(),
                        post.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        owner,
                        post.caption.as_deref().unwrap_or("-"),
                    );
                }
            }
        }

        Commands::Delete { id, yes } => {
            require_session(app).await?;
            let mut feed = app.feed();
            feed.load().await?;

            if !feed.request_delete(*id) {
                bail!("Post {} not found or not yours", id);
            }
            let prompt = feed.delete_prompt();
            if *yes || confirm(prompt.title, prompt.message)? {
                feed.confirm_delete().await?;
            } else {
                feed.cancel_delete();
            }
        }

        Commands::Upload { path, caption } => {
            require_session(app).await?;
            let mut upload = app.upload();
            upload.select_path(path).await?;
            if let Some(draft) = upload.draft() {
                tracing::info!(
                    file = %draft.preview.file_name,
                    size = %draft.preview.size_label(),
                    "Uploading"
                );
            }
            upload.set_caption(caption.clone());

            let post = upload.submit().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                println!("{}", post.id);
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Resolve the stored token; fail when there is no usable session
async fn require_session(app: &App) -> anyhow::Result<()> {
    match app.start().await {
        HydrationOutcome::Authenticated(_) => Ok(()),
        HydrationOutcome::Anonymous => bail!("Not logged in. Run `bubble login <email>` first"),
        HydrationOutcome::Expired => bail!("Session expired. Run `bubble login <email>` again"),
        HydrationOutcome::Superseded => bail!("Session changed while loading; try again"),
    }
}

async fn print_user(app: &App, json: bool) -> anyhow::Result<()> {
    let Some(user) = app.session().user().await else {
        bail!("User profile unavailable");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("Logged in as {}", user.email);
    }
    Ok(())
}

fn print_toasts(toasts: &mut broadcast::Receiver<Toast>) {
    for toast in drain(toasts) {
        eprintln!("{}", toast);
    }
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}", prompt);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(title: &str, message: &str) -> anyhow::Result<bool> {
    eprintln!("{}", title);
    let answer = read_line(&format!("{} [y/N] ", message))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
