use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{env, io, path::PathBuf, time::Duration};

use markpad::app::App;
use markpad::ui;

#[tokio::main]
async fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("markpad", LevelFilter::Debug);
    }
    logger.init();

    // Restore the terminal even when we panic mid-draw
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    // Read the optional seed file before the terminal switches modes
    let args: Vec<String> = env::args().collect();
    let mut initial_text = None;
    let mut file_path = None;
    let mut load_error = None;
    if args.len() > 1 {
        let path = PathBuf::from(&args[1]);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                log::info!("Seeding editor from {}", path.display());
                initial_text = Some(content);
                file_path = Some(path);
            }
            Err(e) => {
                log::error!("Failed to read '{}': {}", args[1], e);
                load_error = Some(format!("Could not read {}: {}", args[1], e));
            }
        }
    }

    if let Err(e) = enable_raw_mode() {
        eprintln!("Failed to initialize the terminal: {}", e);
        return Err(e.into());
    }
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        eprintln!("Failed to configure the terminal: {}", e);
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = match App::new(initial_text, file_path).await {
        Ok(app) => {
            log::info!("Application initialized successfully");
            app
        }
        Err(e) => {
            restore_terminal()?;
            eprintln!("Failed to initialize the application: {}", e);
            return Err(e);
        }
    };
    if let Some(message) = load_error {
        app.status.warning(message);
    }

    let res = run_app(&mut terminal, app).await;

    restore_terminal()?;

    if let Err(err) = res {
        eprintln!("Error while running the application: {}", err);
        log::error!("Application error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        if let Err(e) = terminal.draw(|f| ui::draw(f, &mut app)) {
            log::error!("Terminal draw error: {}", e);
            // Keep running despite draw errors
        }

        app.update_status();

        if app.should_quit() {
            log::info!("Application shutdown requested");
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    // Emergency exit; nothing needs saving, state is in-memory only
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        log::info!("Exit requested via Ctrl+C");
                        app.quit();
                        continue;
                    }
                    if let Err(e) = app.handle_key_event(key).await {
                        log::error!("Key event handling error: {}", e);
                        app.status.error(format!("Key handling error: {}", e));
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                Event::Resize(_, _) => {
                    log::debug!("Terminal resized");
                    // Handled implicitly by the next draw
                }
                _ => {}
            }
        }
    }

    log::info!("Application loop ended successfully");
    Ok(())
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    // Attempt to show cursor, but don't fail if it errors
    let _ = execute!(stdout, crossterm::cursor::Show);
    Ok(())
}
