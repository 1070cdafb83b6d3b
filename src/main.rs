mod app;
mod catalog;
mod config;
mod format;
mod input;
mod overlay;
mod ui;
mod view;

use app::App;
use catalog::{Catalog, PodcastId};
use chrono::Utc;
use clap::{Parser, Subcommand};
use config::ExplorerConfig;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use overlay::DetailView;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use view::{CardView, CatalogView, GenreFilter, SortKey};

/// TUI browser for a podcast catalog
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog JSON file (defaults to the built-in data set)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Config file (defaults to config.json in the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Genre filter: "all" or a genre id
    #[arg(short, long, global = true)]
    genre: Option<GenreFilter>,

    /// Sort order
    #[arg(short, long, value_enum, global = true)]
    sort: Option<SortKey>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI browser (default)
    Run,
    /// Print the filtered and sorted podcasts
    List,
    /// Print the details and seasons of one podcast
    Show {
        /// Podcast id
        id: String,
    },
    /// Print the available genre filters
    Genres,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let mut config = ExplorerConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = Some(data);
    }
    if let Some(genre) = cli.genre {
        config.default_genre = genre.genre_id();
    }
    if let Some(sort) = cli.sort {
        config.default_sort = sort;
    }

    init_logging(&config, cli.verbose, matches!(command, Commands::Run))?;

    let catalog = match &config.data_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };

    let mut stdout = std::io::stdout().lock();
    match command {
        Commands::List => {
            let mut view = CatalogView::new(
                GenreFilter::from(config.default_genre),
                config.default_sort,
                config.date_format.clone(),
            );
            view.refresh(&catalog, Utc::now());
            write_cards(&mut stdout, view.cards())?;
        }
        Commands::Show { id } => {
            let Some(podcast) = catalog.podcast(&PodcastId::new(id.as_str())) else {
                eprintln!("Error: no podcast with id {id}");
                std::process::exit(1);
            };
            let detail = DetailView::build(podcast, &catalog, Utc::now(), &config.date_format);
            write_detail(&mut stdout, &detail)?;
        }
        Commands::Genres => {
            write_genres(&mut stdout, &catalog)?;
        }
        Commands::Run => {
            drop(stdout);
            let mut app = App::new(catalog, &config);

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app, config.mouse);

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "terminal loop failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn init_logging(
    config: &ExplorerConfig,
    verbose: bool,
    to_file: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    // The TUI owns the terminal, so it logs to a file instead
    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    mouse: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if mouse {
        crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
    }

    let size = terminal.size()?;
    app.resize(size.width, size.height);
    tracing::info!(
        podcasts = app.catalog.podcasts.len(),
        width = size.width,
        height = size.height,
        "explorer started"
    );

    let result = event_loop(terminal, app);

    if mouse {
        crossterm::execute!(std::io::stdout(), DisableMouseCapture)?;
    }
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Events are handled one at a time, in arrival order
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                input::handle_key(app, key);
            }
            Event::Mouse(mouse) => input::handle_mouse(app, mouse),
            Event::Resize(width, height) => app.resize(width, height),
            _ => {}
        }
    }
}

fn write_cards(out: &mut impl Write, cards: &[CardView]) -> std::io::Result<()> {
    for card in cards {
        writeln!(
            out,
            "{:>6}  {:<32}  {:<11}  {:<14}  {}",
            card.id,
            ui::truncate_str(&card.title, 32),
            card.seasons_label,
            card.updated_label,
            card.genres.join(", ")
        )?;
    }
    Ok(())
}

fn write_detail(out: &mut impl Write, detail: &DetailView) -> std::io::Result<()> {
    writeln!(out, "{}", detail.title)?;
    writeln!(out, "{}", detail.description)?;
    writeln!(out, "Cover: {}", detail.cover.uri)?;
    writeln!(out, "Genres: {}", detail.genres.join(", "))?;
    writeln!(out, "Last updated: {}", detail.updated_label)?;
    writeln!(out)?;
    writeln!(out, "Seasons")?;
    for row in &detail.seasons {
        if row.is_placeholder() {
            writeln!(out, "  ({})", row.title)?;
        } else {
            writeln!(out, "  {}  {}", row.title, row.episodes_label.as_deref().unwrap_or_default())?;
        }
    }
    Ok(())
}

fn write_genres(out: &mut impl Write, catalog: &Catalog) -> std::io::Result<()> {
    for option in view::filter_options(catalog) {
        writeln!(out, "{:>4}  {}", option, option.label(catalog))?;
    }
    Ok(())
}
