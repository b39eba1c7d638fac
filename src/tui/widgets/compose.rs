// Compose form widget: phone and message inputs.
//
// Two single-line fields inside one bordered block. The focused field gets
// a highlighted label and a trailing cursor marker. The block title shows
// a sending indicator while a submission is in flight.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::{Field, ViewState};

/// Render the compose form into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = if state.sending {
        "New Message -- Sending..."
    } else {
        "New Message"
    };

    let lines = vec![
        field_line("Phone", &state.phone, state.focus == Field::Phone),
        Line::default(),
        field_line("Message", &state.message, state.focus == Field::Message),
        Line::default(),
        Line::from(Span::styled(
            "  Enter sends to the webhook; both fields are required.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title),
    );
    frame.render_widget(paragraph, area);
}

/// Build one labeled input line, marking the focused field.
fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![
        Span::styled(format!("  {label}: "), label_style),
        Span::raw(value),
    ];
    if focused {
        spans.push(Span::styled(
            "_",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
