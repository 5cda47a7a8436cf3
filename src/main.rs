mod app;
mod clock;
mod config;
mod event;
mod games;
mod input;
mod notify;
mod scene;
mod scores;
mod session;
mod ui;

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::Settings;
use event::{Event, EventHandler};
use scores::{FileStore, HighScores};

/// The terminal belongs to the UI, so log records go to a file.
fn init_logging(path: &Path) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    match File::create(path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let (settings, settings_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    init_logging(&settings.log_file);
    if let Some(e) = settings_error {
        log::warn!("falling back to default settings: {:#}", e);
    }
    log::info!("starting with {:?}", settings);

    let scores = HighScores::new(Box::new(FileStore::open(settings.scores_file.clone())));
    let mut app = App::new(scores, settings.notice_ttl());

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(settings.frame_interval());
    let result = run(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    app.close();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    log::info!("bye");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
            Event::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
