//! Attribute panel: a `Name | Type | Array Size | Value` table.

use super::ExplorerState;
use crate::data::ValueKind;
use crate::shared::formatters::truncate;
use crate::shared::ThemeColors;
use crate::util::layout_config::AttributeLayoutConfig;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

/// Column headings of the attribute table.
pub const COLUMNS: [&str; 4] = ["Name", "Type", "Array Size", "Value"];

/// Draw the attribute panel for the selected node.
pub fn draw_details(
    f: &mut Frame<'_>,
    explorer: &ExplorerState,
    area: Rect,
    config: &AttributeLayoutConfig,
    colors: &ThemeColors,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.bg2))
        .style(Style::default().bg(colors.bg0));

    let Some(table) = explorer.attributes.as_ref() else {
        let paragraph = Paragraph::new(Line::from("Select a node to view its attributes"))
            .style(Style::default().fg(colors.gray))
            .block(block.title(" Attributes "));
        f.render_widget(paragraph, area);
        return;
    };

    let fixed = config.name_width + config.type_width + config.size_width + 5;
    let value_width = area.width.saturating_sub(fixed) as usize;

    let rows: Vec<Row<'_>> = table
        .entries
        .iter()
        .skip(explorer.attribute_scroll)
        .map(|entry| {
            let value_color = match entry.kind {
                ValueKind::Scalar => colors.blue,
                ValueKind::Array => colors.aqua,
                ValueKind::ByteString => colors.purple,
            };
            Row::new(vec![
                Cell::from(truncate(&entry.name, config.name_width as usize))
                    .style(Style::default().fg(colors.green)),
                Cell::from(entry.type_label()).style(Style::default().fg(colors.fg1)),
                Cell::from(entry.length.to_string()).style(Style::default().fg(colors.fg1)),
                Cell::from(truncate(&entry.display_text, value_width))
                    .style(Style::default().fg(value_color)),
            ])
        })
        .collect();

    let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c))).style(
        Style::default()
            .fg(colors.yellow)
            .add_modifier(Modifier::BOLD),
    );

    let title = format!(" Attributes: {} ({}) ", table.path, table.entries.len());
    let widget = Table::new(
        rows,
        [
            Constraint::Length(config.name_width),
            Constraint::Length(config.type_width),
            Constraint::Length(config.size_width),
            Constraint::Min(1),
        ],
    )
    .header(header)
    .block(block.title(title).title_style(Style::default().fg(colors.yellow)))
    .style(Style::default().fg(colors.fg0));

    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::attributes::project_values;
    use crate::data::{AttributeValue, ScalarValue};
    use crate::explorer::AttributeTable;
    use crate::shared::Theme;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn renders_all_four_columns() {
        let entries = project_values(vec![
            ("units".to_string(), "m".into()),
            (
                "flags".to_string(),
                AttributeValue::Array(vec![ScalarValue::Int(1), ScalarValue::Int(2)]),
            ),
        ]);
        let mut explorer = ExplorerState::new();
        explorer.attributes = Some(AttributeTable {
            path: "/g1/".to_string(),
            entries,
        });

        let colors = ThemeColors::from_theme(Theme::GruvboxLight);
        let config = AttributeLayoutConfig::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 8)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_details(f, &explorer, area, &config, &colors)
            })
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        for column in COLUMNS {
            assert!(screen.contains(column), "missing {}", column);
        }
        assert!(screen.contains("Attributes: /g1/ (2)"));
        assert!(screen.contains("1, 2"));
    }
}
