//! Data viewer overlay - pure rendering layer.

use super::image::{Bitmap, ImageView};
use super::slicer::DatasetView;
use super::DataViewerState;
use crate::data::ScalarValue;
use crate::navigation::Viewer;
use crate::shared::formatters::{format_number, format_shape, truncate};
use crate::shared::ThemeColors;
use crate::util::LayoutConfig;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, Wrap,
    },
    Frame,
};

/// Draw the data overlay.
pub fn draw_data_viewer(
    f: &mut Frame<'_>,
    state: &DataViewerState,
    viewer: Option<&Viewer>,
    layout: &LayoutConfig,
    colors: &ThemeColors,
) {
    if !state.visible {
        return;
    }

    let area = centered_rect(90, 90, f.area());

    // Clear the background
    f.render_widget(Clear, area);

    let kind = match viewer {
        Some(Viewer::Image(_)) => "Image",
        _ => "Table",
    };
    let block = Block::default()
        .title(format!(" Data Viewer - {} ", kind))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.bg2))
        .style(Style::default().bg(colors.bg0));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(viewer) = viewer else {
        draw_error(f, inner, "This viewer is no longer open", colors);
        return;
    };

    let has_paging = matches!(viewer, Viewer::Table(view) if view.has_paging());
    let has_status = state.status_message.is_some();

    let mut constraints = vec![Constraint::Length(3)];
    if has_status {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(3));
    if has_paging {
        constraints.push(Constraint::Length(layout.paging.height));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut chunk_idx = 0;
    draw_header(f, chunks[chunk_idx], viewer, colors);
    chunk_idx += 1;

    if let Some(ref msg) = state.status_message {
        let paragraph = Paragraph::new(msg.as_str())
            .style(Style::default().fg(colors.yellow).bg(colors.bg1))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, chunks[chunk_idx]);
        chunk_idx += 1;
    }

    match viewer {
        Viewer::Table(view) => draw_table_view(f, chunks[chunk_idx], state, view, layout, colors),
        Viewer::Image(view) => draw_image_view(f, chunks[chunk_idx], view, layout, colors),
    }
    chunk_idx += 1;

    if let (true, Viewer::Table(view)) = (has_paging, viewer) {
        draw_paging_bar(f, chunks[chunk_idx], state, view, layout, colors);
        chunk_idx += 1;
    }

    draw_footer(f, chunks[chunk_idx], state, viewer, colors);
}

fn draw_header(f: &mut Frame<'_>, area: Rect, viewer: &Viewer, colors: &ThemeColors) {
    let (path, detail) = match viewer {
        Viewer::Table(view) => {
            let total: usize = view.shape().iter().product();
            (
                view.path().to_string(),
                format!(
                    "Shape: {}  ({} total)",
                    format_shape(view.shape()),
                    format_number(total)
                ),
            )
        },
        Viewer::Image(view) => (
            view.path().to_string(),
            format!(
                "Image: {} x {} px",
                view.bitmap().width(),
                view.bitmap().height()
            ),
        ),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                viewer.name().to_string(),
                Style::default()
                    .fg(colors.yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", path), Style::default().fg(colors.gray)),
        ]),
        Line::from(Span::styled(detail, Style::default().fg(colors.fg0))),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors.bg2)),
    );

    f.render_widget(paragraph, area);
}

fn draw_table_view(
    f: &mut Frame<'_>,
    area: Rect,
    state: &DataViewerState,
    view: &DatasetView,
    layout: &LayoutConfig,
    colors: &ThemeColors,
) {
    let config = &layout.table;
    let visible_rows = (area.height as usize).saturating_sub(config.border_padding);
    let col_width = config.column_width as usize;
    let visible_cols = ((area.width as usize)
        .saturating_sub(config.row_header_width as usize + 2)
        / col_width.max(1))
    .clamp(1, config.max_visible_columns);

    let total_rows = view.rows();
    let total_cols = view.cols();
    let start_row = state.scroll.row.min(total_rows.saturating_sub(1));
    let start_col = state.scroll.col.min(total_cols.saturating_sub(1));
    let end_row = (start_row + visible_rows).min(total_rows);
    let end_col = (start_col + visible_cols).min(total_cols);

    let mut rows = Vec::new();
    for row_idx in start_row..end_row {
        let mut cells = vec![Cell::from(format!(
            "{:>width$}",
            row_idx,
            width = (config.row_header_width as usize).saturating_sub(1)
        ))
        .style(Style::default().fg(colors.green))];

        for col_idx in start_col..end_col {
            let (text, color) = match view.cell(row_idx, col_idx) {
                Some(value) => (
                    truncate(&value.to_string(), col_width.saturating_sub(1)),
                    value_color(value, colors),
                ),
                None => (String::new(), colors.gray),
            };
            cells.push(Cell::from(text).style(Style::default().fg(color)));
        }

        rows.push(Row::new(cells));
    }

    let mut header_cells = vec![Cell::from("")];
    for col_idx in start_col..end_col {
        header_cells.push(
            Cell::from(format!("{:>width$}", col_idx, width = col_width.saturating_sub(2))).style(
                Style::default()
                    .fg(colors.green)
                    .add_modifier(Modifier::BOLD),
            ),
        );
    }

    let mut widths = vec![Constraint::Length(config.row_header_width)];
    for _ in start_col..end_col {
        widths.push(Constraint::Length(config.column_width));
    }

    let title = if view.is_empty() {
        format!(" {} | empty ", view.name())
    } else {
        format!(" {} | {} x {} ", view.name(), total_rows, total_cols)
    };

    let table = Table::new(rows, widths)
        .header(Row::new(header_cells).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bg2))
                .title(title)
                .title_style(Style::default().fg(colors.yellow)),
        )
        .style(Style::default().fg(colors.fg0));

    f.render_widget(table, area);

    if total_rows > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total_rows.saturating_sub(visible_rows)).position(start_row);
        f.render_stateful_widget(
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("^"))
                .end_symbol(Some("v")),
            area,
            &mut scrollbar_state,
        );
    }
}

fn value_color(value: &ScalarValue, colors: &ThemeColors) -> Color {
    match value {
        ScalarValue::Float(_) => colors.aqua,
        ScalarValue::Int(_) | ScalarValue::UInt(_) => colors.blue,
        ScalarValue::Bool(_) => colors.orange,
        ScalarValue::Bytes(_) => colors.purple,
    }
}

/// Prev/Next buttons, the page field and the total readout.
fn draw_paging_bar(
    f: &mut Frame<'_>,
    area: Rect,
    state: &DataViewerState,
    view: &DatasetView,
    layout: &LayoutConfig,
    colors: &ThemeColors,
) {
    let last = view.page_count().unwrap_or(0).saturating_sub(1);
    let width = layout.paging.input_width;

    let button = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(colors.bg0).bg(colors.green)
        } else {
            Style::default().fg(colors.gray).bg(colors.bg1)
        };
        Span::styled(label, style)
    };

    let field = match state.page_input() {
        Some(typed) => Span::styled(
            format!(" {:<width$}", format!("{}_", typed), width = width),
            Style::default()
                .fg(colors.bg0)
                .bg(colors.yellow)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(
            format!(" {:<width$}", view.page_index(), width = width),
            Style::default().fg(colors.fg0).bg(colors.bg1),
        ),
    };

    let line = Line::from(vec![
        button(" < Prev ", !view.is_empty() && view.page_index() > 0),
        Span::raw("  Page "),
        field,
        Span::styled(format!(" of {}  ", last), Style::default().fg(colors.gray)),
        button(" Next > ", !view.is_empty() && view.page_index() < last),
    ]);

    let paragraph = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(colors.bg2)),
    );

    f.render_widget(paragraph, area);
}

/// Draw a bitmap with one half-block per two pixel rows.
fn draw_image_view(
    f: &mut Frame<'_>,
    area: Rect,
    view: &ImageView,
    layout: &LayoutConfig,
    colors: &ThemeColors,
) {
    let bitmap = view.bitmap();
    let max_w = (area.width as usize).min(layout.image.max_width);
    let max_h = (area.height as usize * 2).min(layout.image.max_height);
    let (w, h) = bitmap.fit(max_w, max_h);
    if w == 0 || h == 0 {
        draw_error(f, area, "Image has no pixels", colors);
        return;
    }

    let cells_h = (h + 1) / 2;
    let offset_x = (area.width as usize).saturating_sub(w) / 2;
    let offset_y = (area.height as usize).saturating_sub(cells_h) / 2;

    for cy in 0..cells_h {
        for x in 0..w {
            let top = pixel_color(bitmap, x, cy * 2, w, h);
            let bottom = pixel_color(bitmap, x, cy * 2 + 1, w, h);
            let screen_x = area.x + (offset_x + x) as u16;
            let screen_y = area.y + (offset_y + cy) as u16;
            if screen_x >= area.x + area.width || screen_y >= area.y + area.height {
                continue;
            }
            if let Some(cell) = f.buffer_mut().cell_mut((screen_x, screen_y)) {
                cell.set_char('▀').set_fg(top.unwrap_or(colors.bg0));
                cell.set_bg(bottom.unwrap_or(colors.bg0));
            }
        }
    }
}

fn pixel_color(bitmap: &Bitmap, x: usize, y: usize, w: usize, h: usize) -> Option<Color> {
    if y >= h {
        return None;
    }
    bitmap
        .sample(x, y, w, h)
        .map(|[r, g, b]| Color::Rgb(r, g, b))
}

fn draw_footer(
    f: &mut Frame<'_>,
    area: Rect,
    state: &DataViewerState,
    viewer: &Viewer,
    colors: &ThemeColors,
) {
    let help = match viewer {
        _ if state.is_editing_page() => "Type a page number | Enter: Go | Esc: Cancel",
        Viewer::Table(view) if view.has_paging() => {
            "Arrows: Pan | [/]: Prev/Next | g: Go to page | c: Copy page | Tab: Next viewer | Esc"
        },
        Viewer::Table(_) => "Arrows: Pan | c: Copy page | Tab: Next viewer | Esc",
        Viewer::Image(_) => "Tab: Next viewer | Esc",
    };
    let paragraph = Paragraph::new(help)
        .style(Style::default().fg(colors.green))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn draw_error(f: &mut Frame<'_>, area: Rect, error: &str, colors: &ThemeColors) {
    let lines = vec![
        Line::from(Span::styled(
            "Nothing to show",
            Style::default()
                .fg(colors.yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(error, Style::default().fg(colors.fg0))),
        Line::from(""),
        Line::from("Press Esc to close"),
    ];

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(colors.fg0))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// A rectangle centered in `r` covering the given percentages.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{MemoryDataset, MemoryGroup, MemoryStorage};
    use crate::data::{AttributeEntry, Node};
    use crate::error::ViewerError;
    use crate::navigation::{DisplaySink, Navigator, ViewerId};
    use crate::shared::Theme;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::Path;

    struct Ignore;

    impl DisplaySink for Ignore {
        fn show_tree(&mut self, _: &Node) {}
        fn clear_tree(&mut self) {}
        fn show_attributes(&mut self, _: &Node, _: &[AttributeEntry]) {}
        fn clear_attributes(&mut self) {}
        fn show_viewer(&mut self, _: ViewerId, _: &Viewer) {}
        fn report_error(&mut self, _: &ViewerError) {}
    }

    fn render(shape: &[usize]) -> String {
        let root = MemoryGroup::new().with_dataset("d", MemoryDataset::iota(shape));
        let mut nav = Navigator::new(MemoryStorage::new().with_file("f.h5", root));
        nav.open_file(Path::new("f.h5"), &mut Ignore).unwrap();
        let tree = nav.tree().cloned().unwrap();
        let id = nav.activate(&tree.children[0], &mut Ignore).unwrap().unwrap();

        let mut state = DataViewerState::new();
        state.show(id);
        let colors = ThemeColors::from_theme(Theme::GruvboxDark);
        let layout = LayoutConfig::default();

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|f| draw_data_viewer(f, &state, nav.viewer(id), &layout, &colors))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn rank_two_has_no_paging_bar() {
        let screen = render(&[3, 3]);
        assert!(screen.contains("d | 3 x 3"));
        assert!(!screen.contains("Prev"));
    }

    #[test]
    fn odd_image_height_fills_the_last_cell_row() {
        let pixels = vec![ScalarValue::UInt(255); 12];
        let root = MemoryGroup::new().with_dataset(
            "pic",
            MemoryDataset::from_shape(&[3, 4], pixels)
                .unwrap()
                .with_attr("CLASS", "IMAGE"),
        );
        let mut nav = Navigator::new(MemoryStorage::new().with_file("f.h5", root));
        nav.open_file(Path::new("f.h5"), &mut Ignore).unwrap();
        let tree = nav.tree().cloned().unwrap();
        let id = nav.activate(&tree.children[0], &mut Ignore).unwrap().unwrap();
        let Some(Viewer::Image(view)) = nav.viewer(id) else {
            panic!("expected an image viewer");
        };

        let colors = ThemeColors::from_theme(Theme::GruvboxDark);
        let mut layout = LayoutConfig::default();
        layout.image.max_width = 4;
        layout.image.max_height = 3;

        let mut terminal = Terminal::new(TestBackend::new(4, 2)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_image_view(f, area, view, &layout, &colors)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        for x in 0..4u16 {
            let cell = &buffer[(x, 1)];
            assert_eq!(cell.symbol(), "▀");
            assert_eq!(cell.bg, colors.bg0);
        }
    }

    #[test]
    fn rank_three_shows_page_total() {
        let screen = render(&[2, 2, 5]);
        assert!(screen.contains("Prev"));
        assert!(screen.contains("of 4"));
    }
}
