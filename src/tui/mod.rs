pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer log output while the TUI is active to prevent it corrupting the display
    crate::logging::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let events = EventHandler::new(250);

    let outcome = (|| -> anyhow::Result<()> {
        loop {
            terminal.draw(|frame| ui::draw(frame, &app))?;

            match events.next()? {
                Event::Key(key) => handle_key_event(&mut app, key),
                Event::Tick => app.update_flash(),
            }

            if app.should_quit {
                return Ok(());
            }
        }
    })();

    ratatui::restore();

    // Flush buffered log lines now that the terminal is restored
    for msg in crate::logging::drain() {
        eprintln!("{}", msg);
    }

    outcome
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if app.input_mode == app::InputMode::Help {
        // Any key exits help
        app.dismiss_help();
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }

        KeyCode::Char('?') => app.show_help(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_section(),
        _ => match app.section {
            app::Section::Form => handle_form_key(app, key),
            app::Section::Results => match key.code {
                KeyCode::Char('e') | KeyCode::Enter | KeyCode::Esc => app.edit(),
                _ => {}
            },
        },
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.next_row(),
        KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

        // Selections
        KeyCode::Char('l') | KeyCode::Right => app.cycle_choice(true),
        KeyCode::Char('h') | KeyCode::Left => app.cycle_choice(false),

        KeyCode::Enter => app.activate(),
        KeyCode::Char('c') => app.calculate(),

        // Mark entry
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.push_char(c),

        _ => {}
    }
}
