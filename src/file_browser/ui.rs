//! File picker rendering.

use super::{EntryKind, FileBrowserState, FileEntry};
use crate::shared::formatters::{format_bytes, truncate};
use crate::shared::ThemeColors;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SIZE_WIDTH: usize = 10;

/// Draw the file picker into `area`.
pub fn draw_file_browser(
    f: &mut Frame<'_>,
    state: &mut FileBrowserState,
    area: Rect,
    colors: &ThemeColors,
) {
    let block = Block::default()
        .title(format!(" Open HDF file: {} ", state.current_dir.display()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.bg2))
        .style(Style::default().bg(colors.bg0));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (list_area, error_area) = match state.error {
        Some(_) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(inner);
            (parts[0], Some(parts[1]))
        },
        None => (inner, None),
    };

    let viewport_height = list_area.height as usize;
    state.adjust_scroll(viewport_height);

    let name_width = (list_area.width as usize).saturating_sub(SIZE_WIDTH + 12);
    let items: Vec<ListItem<'_>> = state
        .entries
        .iter()
        .enumerate()
        .skip(state.scroll)
        .take(viewport_height)
        .map(|(idx, entry)| {
            let line = entry_line(entry, name_width, colors);
            if idx == state.cursor {
                ListItem::new(line).style(
                    Style::default()
                        .fg(colors.bg0)
                        .bg(colors.yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ListItem::new(line)
            }
        })
        .collect();
    f.render_widget(List::new(items), list_area);

    if let (Some(area), Some(error)) = (error_area, state.error.as_deref()) {
        let text = format!("Cannot read directory: {}", error);
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(colors.red)),
            area,
        );
    }
}

fn entry_line<'a>(entry: &FileEntry, name_width: usize, colors: &ThemeColors) -> Line<'a> {
    let link = if entry.is_symlink { " →" } else { "" };
    let name = truncate(&format!("{}{}", entry.name, link), name_width);

    match entry.kind {
        EntryKind::Parent | EntryKind::Directory => Line::from(vec![
            Span::styled("📁 ", Style::default().fg(colors.blue)),
            Span::styled(format!("{}/", name), Style::default().fg(colors.fg0)),
        ]),
        EntryKind::File(format) => {
            let size = entry.size.map(format_bytes).unwrap_or_default();
            let padding = name_width.saturating_sub(name.width()) + 1;
            Line::from(vec![
                Span::styled("📄 ", Style::default().fg(colors.aqua)),
                Span::styled(name, Style::default().fg(colors.aqua)),
                Span::raw(" ".repeat(padding)),
                Span::styled(
                    format!("{:<5}", format.tag()),
                    Style::default().fg(colors.purple),
                ),
                Span::styled(
                    format!("{:>width$}", size, width = SIZE_WIDTH),
                    Style::default().fg(colors.gray),
                ),
            ])
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Theme;
    use ratatui::{backend::TestBackend, Terminal};
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn files_show_format_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = File::create(dir.path().join("scan.he5")).unwrap();
        file.write_all(&[0u8; 2048]).unwrap();
        std::fs::create_dir(dir.path().join("raw")).unwrap();

        let mut state = FileBrowserState::new();
        state.open_dir(dir.path().to_path_buf());

        let colors = ThemeColors::from_theme(Theme::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_file_browser(f, &mut state, area, &colors)
            })
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("raw/"));
        assert!(screen.contains("scan.he5"));
        assert!(screen.contains("HDF5"));
        assert!(screen.contains("2.0 KiB"));
    }
}
