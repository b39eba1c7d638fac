// Status bar: endpoint base and session counters.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        status_text(state),
        Style::default().fg(Color::White),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Build the status line text.
pub fn status_text(state: &ViewState) -> String {
    let mut text = format!(
        " SMS Mockup Console | {} | {} exchange(s)",
        state.endpoint,
        state.conversation.len()
    );
    if state.sending {
        text.push_str(" | sending...");
    }
    if state.simulating {
        text.push_str(" | simulating...");
    }
    text
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
