//! h5lens - A terminal-based HDF file viewer.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use h5lens::app::App;
use h5lens::file_browser::is_hdf_file;
use h5lens::navigation::PageRequest;
use h5lens::{ui, ViewerError};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "h5lens")]
#[command(about = "A terminal-based HDF4/HDF5 file viewer", long_about = None)]
struct Args {
    /// Path to the HDF file or directory to open
    file: Option<PathBuf>,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(log_file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting h5lens");
    }

    // Validate path if provided
    if let Some(ref path) = args.file {
        if !path.exists() {
            eprintln!("Error: Path not found: {}", path.display());
            std::process::exit(1);
        }
        if path.is_file() && !is_hdf_file(path) {
            eprintln!("Error: {}", ViewerError::unsupported_format(path));
            std::process::exit(1);
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let app = App::new(args.file);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        tracing::info!("h5lens exited");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let mut pending_g = false; // For 'gg' vim binding

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        if app.screen.data_viewer.visible {
            if app.screen.data_viewer.is_editing_page() {
                handle_page_input(&mut app, key);
            } else {
                handle_viewer(&mut app, key);
            }
            continue;
        }

        if app.file_browser_mode {
            if handle_file_browser(&mut app, key) {
                return Ok(());
            }
            continue;
        }

        // Normal mode
        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(()),

            // Navigation
            (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                app.cursor_up();
            },
            (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                app.cursor_down();
            },
            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
                app.screen.explorer.collapse_current();
            },
            (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
                app.screen.explorer.expand_current();
            },
            (KeyModifiers::NONE, KeyCode::Enter) => {
                app.activate_current();
            },

            // Vim navigation
            (KeyModifiers::NONE, KeyCode::Char('g')) => {
                if pending_g {
                    app.goto_first();
                    pending_g = false;
                } else {
                    pending_g = true;
                }
                continue;
            },
            (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
                app.goto_last();
            },

            // Attribute scrolling
            (KeyModifiers::CONTROL, KeyCode::Char('d'))
            | (KeyModifiers::SHIFT, KeyCode::Char('J')) => {
                app.screen.explorer.scroll_attributes_down();
            },
            (KeyModifiers::CONTROL, KeyCode::Char('u'))
            | (KeyModifiers::SHIFT, KeyCode::Char('K')) => {
                app.screen.explorer.scroll_attributes_up();
            },

            // File lifecycle
            (KeyModifiers::NONE, KeyCode::Char('o')) => {
                app.open_file_browser_at_current();
            },
            (KeyModifiers::NONE, KeyCode::Char('x')) => {
                app.close_file();
            },

            // Features
            (KeyModifiers::NONE, KeyCode::Char('v')) => {
                app.toggle_data_viewer();
            },
            (KeyModifiers::NONE, KeyCode::Char('y')) => {
                app.copy_node_path();
            },
            (KeyModifiers::SHIFT, KeyCode::Char('T')) => {
                app.cycle_theme();
            },
            (_, KeyCode::Char('?')) => {
                app.screen.status = "Help: q=quit, j/k=select, h/l=fold, Enter=open dataset, o=open file, x=close file, v=viewers, y=copy path, T=theme".to_string();
            },
            (KeyModifiers::NONE, KeyCode::Esc) => {
                app.screen.error_message = None;
            },

            _ => {},
        }
        pending_g = false;
    }
}

fn handle_page_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_page_input(),
        KeyCode::Esc => app.screen.data_viewer.cancel_page_input(),
        KeyCode::Backspace => app.screen.data_viewer.page_input_backspace(),
        KeyCode::Char(c) => app.screen.data_viewer.page_input_push(c),
        _ => {},
    }
}

fn handle_viewer(app: &mut App, key: KeyEvent) {
    let (rows, cols) = app.active_grid_size();

    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Esc) | (KeyModifiers::NONE, KeyCode::Char('q')) => {
            app.close_viewer();
        },

        // Pan
        (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            app.screen.data_viewer.scroll_up(1);
        },
        (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            app.screen.data_viewer.scroll_down(1, rows);
        },
        (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
            app.screen.data_viewer.scroll_left(1);
        },
        (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
            app.screen.data_viewer.scroll_right(1, cols);
        },
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.screen.data_viewer.scroll_up(20),
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => app.screen.data_viewer.scroll_down(20, rows),

        // Paging
        (KeyModifiers::NONE, KeyCode::Char(']'))
        | (KeyModifiers::NONE, KeyCode::Char('+'))
        | (KeyModifiers::NONE, KeyCode::PageDown) => {
            app.page(PageRequest::Advance(1));
        },
        (KeyModifiers::NONE, KeyCode::Char('['))
        | (KeyModifiers::NONE, KeyCode::Char('-'))
        | (KeyModifiers::NONE, KeyCode::PageUp) => {
            app.page(PageRequest::Advance(-1));
        },
        (KeyModifiers::NONE, KeyCode::Char('g')) => app.screen.data_viewer.start_page_input(),

        (KeyModifiers::NONE, KeyCode::Char('c')) => app.copy_page(),
        (KeyModifiers::NONE, KeyCode::Tab) => app.next_viewer(),
        (KeyModifiers::NONE, KeyCode::Char('v')) => app.toggle_data_viewer(),
        _ => {},
    }
}

/// Returns true when the user asked to quit.
fn handle_file_browser(app: &mut App, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => return true,

        // Navigation
        (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            app.browser_up();
        },
        (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            app.browser_down();
        },

        // Select/Open
        (KeyModifiers::NONE, KeyCode::Enter)
        | (KeyModifiers::NONE, KeyCode::Char('l'))
        | (KeyModifiers::NONE, KeyCode::Right) => {
            app.browser_select();
        },

        // Go to parent directory
        (KeyModifiers::NONE, KeyCode::Char('h')) | (KeyModifiers::NONE, KeyCode::Left) => {
            app.browser_parent();
        },

        (KeyModifiers::NONE, KeyCode::Char('.')) => app.toggle_hidden(),
        (KeyModifiers::NONE, KeyCode::Esc) => app.close_file_browser(),
        (KeyModifiers::SHIFT, KeyCode::Char('T')) => app.cycle_theme(),
        _ => {},
    }
    false
}
