use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tabview::{
    events, ui, App, DataSource, DatasetDocument, FallbackSource, FileSource, MemorySession,
    Settings, TableView,
};

#[derive(Parser, Debug)]
#[command(name = "tabview")]
#[command(about = "Search, sort, page through and export tabular JSON data")]
struct Args {
    /// Path to the dataset JSON file
    #[arg(short, long, default_value = "data.json")]
    file: PathBuf,

    /// Settings file (TOML, YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Title used when the dataset has none
    #[arg(long)]
    title: Option<String>,

    /// Rows per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Show every matching row on a single page
    #[arg(long)]
    no_pagination: bool,

    /// Export field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Dataset served if the data file cannot be read at startup
    #[arg(long)]
    fallback: Option<PathBuf>,

    /// Export the full dataset to this path and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let settings = load_settings(&args)?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&args.file, export_path, &settings);
    }

    let file_source = FileSource::new(&args.file);
    let source: Box<dyn DataSource> = match args.fallback {
        Some(ref path) => {
            let fixture = read_document(path)
                .with_context(|| format!("loading fallback data from {}", path.display()))?;
            Box::new(FallbackSource::new(Box::new(file_source), fixture))
        }
        None => Box::new(file_source),
    };

    run_tui(source, settings)
}

/// Send tracing output to `path`; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

/// Settings file and environment first, then CLI overrides.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(ref title) = args.title {
        settings.title = title.clone();
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if args.no_pagination {
        settings.pagination = false;
    }
    if let Some(delimiter) = args.delimiter {
        settings.delimiter = delimiter;
    }
    settings.validate()?;
    Ok(settings)
}

fn read_document(path: &Path) -> Result<DatasetDocument> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let document =
        DatasetDocument::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(document)
}

/// Export the full dataset to `export_path` without starting the UI.
fn export_to_file(data_path: &Path, export_path: &Path, settings: &Settings) -> Result<()> {
    let table = read_document(data_path)?.into_table(&settings.title)?;
    let view = TableView::new(table, settings.view_options());

    let Some(export) = view.export()? else {
        println!("Nothing to export from {}", data_path.display());
        return Ok(());
    };

    std::fs::write(export_path, export.contents.as_bytes())
        .with_context(|| format!("writing {}", export_path.display()))?;
    info!(path = %export_path.display(), rows = export.rows, "export written");
    println!(
        "Exported {} rows to: {}",
        export.rows,
        export_path.display()
    );
    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, settings: Settings) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, settings, Box::new(MemorySession::new()));
    if let Err(e) = app.reload_data() {
        warn!(error = %e, "initial load failed");
    }

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 10;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(5),    // Table
                Constraint::Length(1), // Pager
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::table::render(frame, app, chunks[1]);
            ui::common::render_pager(frame, app, chunks[2]);
            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
