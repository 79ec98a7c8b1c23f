//! Tree panel rendering.

use super::{ExplorerState, TreeItem};
use crate::file_browser::HDF_EXTENSIONS;
use crate::shared::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use std::path::Path;

/// Draw the node tree of the open file, or the welcome text when none is.
pub fn draw_tree(
    f: &mut Frame<'_>,
    explorer: &mut ExplorerState,
    file_path: Option<&Path>,
    area: Rect,
    colors: &ThemeColors,
) {
    if !explorer.has_tree() {
        draw_welcome(f, area, colors);
        return;
    }

    let viewport_height = area.height.saturating_sub(2) as usize;
    explorer.adjust_scroll(viewport_height);

    let cursor = explorer.cursor();
    let items: Vec<ListItem<'_>> = explorer
        .visible_items()
        .iter()
        .enumerate()
        .skip(explorer.scroll_offset())
        .take(viewport_height)
        .map(|(idx, item)| ListItem::new(item_line(item, idx == cursor, colors)))
        .collect();

    let title = match file_path.and_then(Path::file_name) {
        Some(name) => format!(" {} ", name.to_string_lossy()),
        None => " h5lens ".to_string(),
    };
    let position = format!(" {}/{} ", cursor + 1, explorer.visible_items().len());

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .title_bottom(Line::from(position).right_aligned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.bg2))
            .style(Style::default().bg(colors.bg0)),
    );

    f.render_widget(list, area);
}

fn item_line<'a>(item: &TreeItem, selected: bool, colors: &ThemeColors) -> Line<'a> {
    let node = &item.node;
    let marker = match (node.is_group(), item.expanded) {
        (true, true) => "▼ ",
        (true, false) => "▶ ",
        (false, _) => "• ",
    };
    let mut spans = vec![
        Span::raw("  ".repeat(item.level)),
        Span::styled(marker, Style::default().fg(colors.gray)),
    ];

    if node.is_group() {
        spans.push(Span::styled(
            node.display_name(),
            Style::default().fg(colors.yellow),
        ));
        if !item.expanded && !node.children.is_empty() {
            spans.push(Span::styled(
                format!(" ({})", node.children.len()),
                Style::default().fg(colors.gray),
            ));
        }
    } else {
        spans.push(Span::styled(
            node.display_name(),
            Style::default()
                .fg(colors.aqua)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let line = Line::from(spans);
    if selected {
        line.style(
            Style::default()
                .fg(colors.bg0)
                .bg(colors.yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        line
    }
}

/// Draw the welcome screen.
pub fn draw_welcome(f: &mut Frame<'_>, area: Rect, colors: &ThemeColors) {
    let heading = Style::default()
        .fg(colors.yellow)
        .add_modifier(Modifier::BOLD);
    let key = Style::default().fg(colors.aqua);

    let mut lines = vec![
        Line::from(Span::styled("Welcome to h5lens!", heading)),
        Line::from(""),
        Line::from("No file is open. Press o to pick one."),
        Line::from(format!("Opens: .{}", HDF_EXTENSIONS.join(" ."))),
        Line::from(""),
        Line::from(Span::styled("Keys", heading)),
    ];
    let keys = [
        ("j/k", "select node"),
        ("h/l", "collapse/expand group"),
        ("Enter", "open dataset"),
        ("o", "open file"),
        ("x", "close file"),
        ("T", "cycle theme"),
        ("q", "quit"),
    ];
    lines.extend(keys.iter().map(|(k, what)| {
        Line::from(vec![
            Span::styled(format!("  {:<7}", k), key),
            Span::raw(*what),
        ])
    }));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" h5lens ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bg2))
                .style(Style::default().bg(colors.bg0)),
        )
        .style(Style::default().fg(colors.fg0));

    f.render_widget(paragraph, area);
}
