//! Keymap help bar UI component.

use super::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Which key set the help bar describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapMode {
    /// Picking a file.
    FileBrowser,
    /// Typing a page number.
    PageInput,
    /// Data viewer overlay on top.
    DataViewer,
    /// Tree and attribute panels.
    Explorer,
}

/// Draw the keymap help bar.
pub fn draw_keymap(f: &mut Frame<'_>, area: Rect, mode: KeymapMode, colors: &ThemeColors) {
    let keymap_text = match mode {
        KeymapMode::FileBrowser => "jk/↑↓:nav | Enter/l:select | h:parent | .:hidden | q:quit",
        KeymapMode::PageInput => "0-9:page | Enter:go | Esc:cancel",
        KeymapMode::DataViewer => {
            "hjkl:pan | [/]:prev/next page | g:go to page | Tab:next viewer | c:copy | q/Esc:close"
        },
        KeymapMode::Explorer => {
            "q:quit | jk:select | hl:fold | Enter:open | o:open file | x:close file | y:copy path | T:theme"
        },
    };

    let paragraph =
        Paragraph::new(keymap_text).style(Style::default().fg(colors.fg0).bg(colors.bg0));

    f.render_widget(paragraph, area);
}
