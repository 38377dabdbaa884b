//! coaching-zone: command-line front end for the Coaching Zone webhook.
//! Reads config, sends a question, prints the answer and its sources to
//! stdout, and keeps a local history of past questions.

use clap::{Parser, Subcommand};
use coaching_zone_client::config::{self, Config};
use coaching_zone_client::history::HistoryStore;
use coaching_zone_client::storage;
use coaching_zone_client::view::{self, HistoryLine, View};
use coaching_zone_client::{Controller, HttpTransport, SubmitOutcome};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "coaching-zone", version, about = "Ask the Coaching Zone and browse past answers")]
struct Cli {
    /// Config file (default: ~/.coaching-zone/config.yaml).
    #[arg(long, global = true, env = "COACHING_ZONE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a question (read from stdin when no words are given).
    Ask {
        /// Category key to file the question under.
        #[arg(long)]
        category: Option<String>,
        /// Print the rendered HTML fragment instead of plain text.
        #[arg(long)]
        html: bool,
        question: Vec<String>,
    },
    /// List past questions, newest first.
    History {
        /// Delete the stored history.
        #[arg(long)]
        clear: bool,
    },
    /// Show a stored answer again without contacting the webhook.
    Show {
        timestamp: i64,
        #[arg(long)]
        html: bool,
    },
    /// List the starter prompts.
    Examples,
    /// List the glossary terms.
    Glossary,
}

fn resolve_config_path(flag: Option<PathBuf>) -> PathBuf {
    // --config flag or COACHING_ZONE_CONFIG env var, then the default path.
    if let Some(path) = flag {
        return path;
    }
    config::default_config_path().unwrap_or_else(|| {
        eprintln!("Error: unable to determine config path (set --config or COACHING_ZONE_CONFIG)");
        process::exit(1);
    })
}

fn storage_dir(cfg: &Config, config_path: &Path) -> PathBuf {
    if let Some(dir) = &cfg.storage_dir {
        return dir.clone();
    }
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn read_question_from_stdin() -> String {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).unwrap_or(0);
    line.trim().to_string()
}

fn print_view(out: &mut impl Write, cfg: &Config, view: &View, html: bool) {
    if html {
        let _ = writeln!(out, "{}", view::mount(&cfg.mount_id, &view.to_html()));
        return;
    }
    match view {
        View::Answer(answer) => {
            let _ = writeln!(out, "{}", answer.text);
            if !answer.sources.is_empty() {
                let _ = writeln!(out, "\nQuellen & Links:");
                for link in &answer.sources {
                    let _ = writeln!(out, "  [{}] {} <{}>", link.index, link.title, link.url);
                }
            }
        }
        View::Error(message) => eprintln!("{}", message),
        View::Empty | View::Loading => {}
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config);

    let cfg = match config::load_or_default(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: failed to load config from {}: {}", config_path.display(), e);
            process::exit(1);
        }
    };

    let history = HistoryStore::load(storage::open(&storage_dir(&cfg, &config_path), &cfg.history_key));
    let mut controller = Controller::new(&cfg, HttpTransport::new(), history);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Ask {
            category,
            html,
            question,
        } => {
            if let Some(key) = category {
                if !controller.select_category(&key) {
                    eprintln!("Error: unknown category '{}'", key);
                    process::exit(2);
                }
            }
            let question = if question.is_empty() {
                read_question_from_stdin()
            } else {
                question.join(" ")
            };
            controller.set_question(&question);
            if !controller.can_submit() {
                eprintln!("Error: question must be longer than 3 characters");
                process::exit(2);
            }

            // Single-threaded: one request at a time, like the widget.
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap_or_else(|e| {
                    eprintln!("Error: failed to create runtime: {}", e);
                    process::exit(1);
                });
            let outcome = rt.block_on(controller.submit());

            print_view(&mut out, &cfg, controller.view(), html);
            if let SubmitOutcome::Failed(_) = outcome {
                process::exit(1);
            }
        }
        Command::History { clear: true } => {
            controller.clear_history();
        }
        Command::History { clear: false } => {
            let entries = controller.history().entries();
            if entries.is_empty() {
                let _ = writeln!(out, "{}", view::EMPTY_HISTORY_MESSAGE);
            }
            for exchange in entries {
                let line = HistoryLine::new(exchange, &cfg.categories);
                let _ = writeln!(
                    out,
                    "{}  {}  [{}]  {}",
                    line.timestamp, line.time, line.category_label, line.question
                );
            }
        }
        Command::Show { timestamp, html } => {
            if !controller.reopen(timestamp) {
                eprintln!("Error: no history entry with timestamp {}", timestamp);
                process::exit(1);
            }
            let _ = writeln!(out, "> {}\n", controller.question());
            print_view(&mut out, &cfg, controller.view(), html);
        }
        Command::Examples => {
            for (i, example) in cfg.examples.iter().enumerate() {
                let label = example
                    .category
                    .as_deref()
                    .map(|key| cfg.categories.label_for(key))
                    .unwrap_or("");
                let _ = writeln!(out, "{}. {} [{}]\n   {}", i + 1, example.label, label, example.question);
            }
        }
        Command::Glossary => {
            for (term, explanation) in cfg.glossary.iter() {
                let _ = writeln!(out, "{}: {}", term, explanation);
            }
        }
    }
}
