//! User interface rendering.

use crate::app::App;
use crate::data::Storage;
use crate::data_viewer::ui::draw_data_viewer;
use crate::explorer::details::draw_details;
use crate::explorer::tree::draw_tree;
use crate::file_browser::ui::draw_file_browser;
use crate::shared::{draw_keymap, draw_status, KeymapMode, ThemeColors};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

/// Draw the UI.
pub fn draw<S: Storage>(f: &mut Frame<'_>, app: &mut App<S>) {
    let colors = ThemeColors::from_theme(app.theme);

    // Main layout with status bar and key map bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    if app.file_browser_mode {
        draw_file_browser(f, &mut app.file_browser, chunks[0], &colors);
    } else {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[0]);

        let file = app.navigator.file().map(|p| p.to_path_buf());
        draw_tree(f, &mut app.screen.explorer, file.as_deref(), content[0], &colors);
        draw_details(
            f,
            &app.screen.explorer,
            content[1],
            &app.layout.attributes,
            &colors,
        );
    }

    draw_status(
        f,
        chunks[1],
        &app.screen.status,
        app.screen.error_message.as_deref(),
        &colors,
    );
    draw_keymap(f, chunks[2], keymap_mode(app), &colors);

    // Viewer overlay on top of everything
    let data_viewer = &app.screen.data_viewer;
    let viewer = data_viewer.active().and_then(|id| app.navigator.viewer(id));
    draw_data_viewer(f, data_viewer, viewer, &app.layout, &colors);
}

fn keymap_mode<S: Storage>(app: &App<S>) -> KeymapMode {
    let viewer = &app.screen.data_viewer;
    if viewer.visible && viewer.is_editing_page() {
        KeymapMode::PageInput
    } else if viewer.visible {
        KeymapMode::DataViewer
    } else if app.file_browser_mode {
        KeymapMode::FileBrowser
    } else {
        KeymapMode::Explorer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{MemoryDataset, MemoryGroup, MemoryStorage};
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn render(app: &mut App<MemoryStorage>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_tree_and_attributes_side_by_side() {
        let root = MemoryGroup::new()
            .with_attr("title", "demo")
            .with_dataset("d1", MemoryDataset::iota(&[2, 2]));
        let storage = MemoryStorage::new().with_file("demo.h5", root);
        let mut app = App::with_storage(storage, Some(PathBuf::from("demo.h5")));

        let screen = render(&mut app);
        assert!(screen.contains(" demo.h5 "));
        assert!(screen.contains("d1"));
        assert!(screen.contains("Attributes: / (1)"));
        assert!(screen.contains("demo.h5 loaded"));
    }

    #[test]
    fn open_errors_reach_the_status_bar() {
        let mut app = App::with_storage(MemoryStorage::new(), Some(PathBuf::from("gone.h5")));

        let screen = render(&mut app);
        assert!(screen.contains("Failed to open gone.h5"));
        assert!(screen.contains("Welcome to h5lens!"));
    }
}
