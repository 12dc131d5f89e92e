use ratatui::{
    prelude::{Buffer, Line, Rect, Style},
    text::Text,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use derive_setters::Setters;

/// Bordered popup listing the viewer's key bindings
#[derive(Debug, Default, Setters)]
pub struct KeymapPopup<'a> {
    #[setters(into)]
    title: Line<'a>,
    #[setters(skip)]
    bindings: Vec<(&'a str, &'a str)>,
    border_style: Style,
    title_style: Style,
    style: Style,
}

impl<'a> KeymapPopup<'a> {
    pub fn bindings(mut self, bindings: Vec<(&'a str, &'a str)>) -> Self {
        self.bindings = bindings;
        self
    }
}

impl Widget for KeymapPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::new()
            .title(self.title)
            .title_style(self.title_style)
            .borders(Borders::ALL)
            .border_style(self.border_style);
        let lines: Vec<Line> = self
            .bindings
            .iter()
            .map(|(key, action)| {
                if key.is_empty() {
                    Line::from("")
                } else {
                    Line::from(format!("{key:12}{action}"))
                }
            })
            .collect();
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .style(self.style)
            .block(block)
            .render(area, buf);
    }
}
