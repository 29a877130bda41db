mod app;
mod domain;
mod input;
mod logging;
mod persistence;
mod store;
mod sync;
mod ui;

use anyhow::{anyhow, bail, Context, Result};
use app::{AppState, Effect, Msg};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{checkbox_glyph, CategoryFilter, NewTask, StatusFilter};
use input::KeyAction;
use logging::{init_tracing, LogTarget};
use persistence::{config_file, ensure_data_dir, init_local_data_dir, load_config, log_file, save_config, AppConfig};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::Duration;
use store::{FileStore, MemoryStore, RemoteStore};
use sync::{PendingMutations, SyncLayer};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tasklane")]
#[command(about = "A terminal to-do list mirrored live from a shared document store", long_about = None)]
struct Cli {
    /// Collection document to use instead of the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Keep tasks in memory only (nothing is written to disk)
    #[arg(long, global = true, conflicts_with = "store")]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tasklane directory in the current directory
    Init,
    /// Print the task list once and exit
    List {
        /// Status filter: all, active or completed
        #[arg(short, long, default_value = "all", value_parser = parse_status)]
        status: StatusFilter,
        /// Only show tasks in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// Category (defaults to General)
        #[arg(short, long, default_value = "")]
        category: String,
    },
    /// Delete every completed task
    ClearCompleted,
}

fn parse_status(tag: &str) -> Result<StatusFilter, String> {
    StatusFilter::from_tag(tag).ok_or_else(|| format!("unknown status '{}' (expected all, active or completed)", tag))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        // Initialize local .tasklane directory
        let data_dir = init_local_data_dir()?;
        save_config(config_file(&data_dir), &AppConfig::default())?;
        println!("Initialized tasklane directory: {}", data_dir.display());
        println!();
        println!("Tasklane will now use this local directory for its collection.");
        println!("Run 'tasklane' to open the list.");
        return Ok(());
    }

    let data_dir = ensure_data_dir()?;
    let config = load_config(config_file(&data_dir))?;

    match cli.command {
        None => {
            init_tracing(&config.log_level, LogTarget::File(&log_file(&data_dir)))?;
            let store = open_store(cli.store.as_deref(), cli.ephemeral, &config, &data_dir)?;
            run_tui(store, &config)
        }
        Some(command) => {
            init_tracing(&config.log_level, LogTarget::Stderr)?;
            let store = open_store(cli.store.as_deref(), cli.ephemeral, &config, &data_dir)?;
            run_command(command, store, &config)
        }
    }
}

fn open_store(
    store_path: Option<&Path>,
    ephemeral: bool,
    config: &AppConfig,
    data_dir: &Path,
) -> Result<Arc<dyn RemoteStore>> {
    if ephemeral {
        info!("using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = match store_path {
        Some(path) => path.to_path_buf(),
        None => config.collection_path(data_dir),
    };
    let store = FileStore::open(&path, config.poll_interval())
        .with_context(|| format!("Failed to open collection: {}", path.display()))?;
    Ok(Arc::new(store))
}

fn run_tui(store: Arc<dyn RemoteStore>, config: &AppConfig) -> Result<()> {
    info!(tick_ms = config.tick_ms, "starting tasklane");

    let (tx, rx) = mpsc::channel();
    let sync = SyncLayer::new(store, tx, config.reconnect.clone());
    sync.start().context("Failed to start subscription thread")?;

    let mut app = AppState::new(config.use_emoji);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let mut pending = PendingMutations::default();
    let result = run_app(&mut terminal, &mut app, &rx, &sync, &mut pending, config.tick_duration());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Mutations issued just before quitting still reach the store
    pending.prune();
    if !pending.is_empty() {
        info!(waiting = pending.len(), "waiting for pending mutations");
    }
    let panicked = pending.join_all();
    if panicked > 0 {
        error!(panicked, "some mutations did not complete");
    }

    if let Err(err) = &result {
        error!(error = %err, "event loop failed");
    }
    info!("tasklane exiting");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    events: &mpsc::Receiver<Msg>,
    sync: &SyncLayer,
    pending: &mut PendingMutations,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        // Apply everything the sync layer delivered since the last frame
        while let Ok(msg) = events.try_recv() {
            apply(app, sync, pending, msg);
        }
        pending.prune();

        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout so snapshots show up without a key press
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match input::handle_key(app, key) {
                    Some(KeyAction::Quit) => return Ok(()),
                    Some(KeyAction::Dispatch(msg)) => apply(app, sync, pending, msg),
                    None => {}
                }
            }
        }
    }
}

/// Run one message through the reducer and hand its effects to the sync layer
fn apply(app: &mut AppState, sync: &SyncLayer, pending: &mut PendingMutations, msg: Msg) {
    for effect in app.dispatch(msg) {
        match sync.execute(effect) {
            Ok(handle) => pending.push(handle),
            Err(e) => error!(error = %e, "failed to start mutation"),
        }
    }
}

fn run_command(command: Commands, store: Arc<dyn RemoteStore>, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Init => Ok(()),
        Commands::List { status, category } => {
            let mut app = load_state(store.as_ref(), config)?;
            app.dispatch(Msg::SetStatusFilter(status));
            if let Some(category) = category {
                app.dispatch(Msg::SetCategoryFilter(CategoryFilter::from_value(&category)));
            }
            print_list(&app);
            Ok(())
        }
        Commands::Add { text, category } => {
            let Some(record) = NewTask::from_input(&text, &category) else {
                bail!("Task text cannot be empty");
            };
            let id = store.create(record).context("Failed to add task")?;
            println!("Added task {}", id);
            Ok(())
        }
        Commands::ClearCompleted => {
            let mut app = load_state(store.as_ref(), config)?;
            let effects = app.dispatch(Msg::ClearCompleted);
            let Some(Effect::DeleteAll(ids)) = effects.first() else {
                println!("No completed tasks to clear.");
                return Ok(());
            };
            let total = ids.len();

            let (tx, rx) = mpsc::channel();
            let sync = SyncLayer::new(store, tx, config.reconnect.clone());
            for effect in effects {
                sync.execute(effect)
                    .context("Failed to start mutation")?
                    .join()
                    .map_err(|_| anyhow!("Mutation thread panicked"))?;
            }
            drop(sync);

            let failed = rx
                .iter()
                .filter(|msg| matches!(msg, Msg::MutationFailed { .. }))
                .count();
            println!("Cleared {} completed task(s).", total - failed);
            if failed > 0 {
                bail!("{} delete(s) failed, see log output", failed);
            }
            Ok(())
        }
    }
}

/// State built from the first snapshot of a fresh subscription
fn load_state(store: &dyn RemoteStore, config: &AppConfig) -> Result<AppState> {
    let stream = store.subscribe().context("Failed to subscribe to collection")?;
    let snapshot = stream
        .recv()
        .context("Store closed before delivering the collection")?
        .context("Failed to read collection")?;

    let mut app = AppState::new(config.use_emoji);
    app.dispatch(Msg::SnapshotReceived(snapshot));
    Ok(app)
}

fn print_list(app: &AppState) {
    let view = app.view();
    println!(
        "{} · {}",
        app.filters.status.label(),
        app.filters.category.label()
    );
    println!();

    match &view.empty {
        Some(empty) => println!("  {}", empty.message()),
        None => {
            for task in &view.rows {
                let badge = if task.has_category() {
                    format!("  [{}]", task.category)
                } else {
                    String::new()
                };
                println!("  {} {}{}", checkbox_glyph(task.completed, app.use_emoji), task.text, badge);
            }
        }
    }

    println!();
    println!("{}", view.remaining_text());
}
