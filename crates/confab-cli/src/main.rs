use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

use confab_application::{MessageExchange, RenderSignal};
use confab_core::conversation::{ConversationController, ConversationStore, MessageRole};
use confab_core::storage::KeyValueStore;
use confab_core::view::{MessageView, TranscriptView};
use confab_infrastructure::{
    ConfigService, FileKeyValueStore, MemoryKeyValueStore, apply_overrides,
};
use confab_interaction::ProxyApiClient;

#[derive(Parser)]
#[command(name = "confab")]
#[command(about = "Confab - terminal chat with local conversation history", long_about = None)]
struct Cli {
    /// Relay server base URL (overrides config file and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Model identifier forwarded with each request (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Directory for the durable conversation history
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Keep history in memory only; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/new".to_string(),
                "/list".to_string(),
                "/switch".to_string(),
                "/quit".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Renders transcript signals incrementally: new messages are printed as
/// they arrive, and a full reprint happens when the visible conversation
/// changes.
struct TranscriptPrinter {
    rendered: Vec<MessageView>,
    typing_shown: bool,
}

impl TranscriptPrinter {
    fn new() -> Self {
        Self {
            rendered: Vec::new(),
            typing_shown: false,
        }
    }

    fn render(&mut self, view: TranscriptView) {
        match view {
            TranscriptView::Empty => {
                self.rendered.clear();
                self.typing_shown = false;
                println!(
                    "{}",
                    "Start a new chat to talk to the assistant.".bright_black()
                );
            }
            TranscriptView::Conversation { messages, typing } => {
                if messages.starts_with(&self.rendered) {
                    for message in &messages[self.rendered.len()..] {
                        print_message(message);
                    }
                } else {
                    // A different conversation is visible; reprint it whole.
                    println!("{}", "────────────────────────────".bright_black());
                    for message in &messages {
                        print_message(message);
                    }
                }
                self.rendered = messages;

                if typing && !self.typing_shown {
                    println!("{}", "Assistant is typing...".bright_black().italic());
                }
                self.typing_shown = typing;
            }
        }
    }
}

fn print_message(message: &MessageView) {
    let label = match message.role {
        MessageRole::User => "You".green().bold(),
        MessageRole::Assistant => "Assistant".bright_blue().bold(),
        MessageRole::System => "System".bright_black().bold(),
    };
    println!("{label}:");
    for line in message.content.lines() {
        println!("  {line}");
    }
    println!();
}

fn open_storage(cli: &Cli) -> Result<Arc<dyn KeyValueStore>> {
    if cli.ephemeral {
        return Ok(Arc::new(MemoryKeyValueStore::new()));
    }
    let store = match &cli.storage_dir {
        Some(dir) => FileKeyValueStore::new(dir)?,
        None => FileKeyValueStore::default_location()?,
    };
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ===== Configuration =====
    let mut config = ConfigService::new().get_config();
    apply_overrides(&mut config, cli.base_url.clone(), cli.model.clone());

    // ===== Backend Initialization =====
    let storage = open_storage(&cli)?;
    let mut store = ConversationStore::new(storage);
    store.load();
    let controller = ConversationController::new(store);

    let mut backend = ProxyApiClient::new(config.chat.base_url.clone());
    if let Some(secs) = config.chat.request_timeout_secs.filter(|s| *s > 0) {
        backend = backend.with_timeout(Duration::from_secs(secs));
    }

    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel::<RenderSignal>();
    let mut exchange = MessageExchange::new(
        controller,
        Arc::new(backend),
        config.chat.model.clone(),
        signal_tx,
    );

    // Spawn the printer that re-renders on every signal
    let printer = tokio::spawn(async move {
        let mut transcript = TranscriptPrinter::new();
        while let Some(signal) = signal_rx.recv().await {
            if let RenderSignal::Transcript(view) = signal {
                transcript.render(view);
            }
        }
    });

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Confab ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Relay: {}  Model: {}",
            config.chat.base_url, config.chat.model
        )
        .bright_black()
    );
    println!(
        "{}",
        "Type a message, '/new' for a new chat, '/list' to browse, '/switch <n>' to select, '/quit' to exit."
            .bright_black()
    );
    println!();

    if exchange.controller().store().is_empty() {
        exchange.new_conversation();
    }

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if trimmed == "/quit" || trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed == "/new" {
                    exchange.new_conversation();
                    continue;
                }

                if trimmed == "/list" {
                    for (index, entry) in exchange.history_view().iter().enumerate() {
                        let marker = if entry.is_active { "*" } else { " " };
                        println!(
                            "{}",
                            format!("{marker} {:>2}. {}", index + 1, entry.title).bright_cyan()
                        );
                    }
                    continue;
                }

                if let Some(arg) = trimmed.strip_prefix("/switch") {
                    let history = exchange.history_view();
                    match arg.trim().parse::<usize>().ok().and_then(|n| {
                        n.checked_sub(1).and_then(|i| history.get(i))
                    }) {
                        Some(entry) => exchange.select_conversation(entry.id),
                        None => println!("{}", "Usage: /switch <number from /list>".yellow()),
                    }
                    continue;
                }

                if trimmed.starts_with('/') {
                    println!("{}", "Unknown command".bright_black());
                    continue;
                }

                // The exchange is awaited before the next prompt, so sends
                // against one conversation never overlap.
                exchange.send(trimmed).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Dropping the exchange closes the signal channel and ends the printer
    drop(exchange);
    let _ = printer.await;

    Ok(())
}
