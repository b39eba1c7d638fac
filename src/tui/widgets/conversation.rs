// Conversation log widget: chronological list of webhook exchanges.
//
// Each entry renders as a You block (phone, timestamp, message) followed
// by the Server reply. Server replies are run through the advice extractor
// so the operator sees the human-readable text instead of the raw payload.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use serde_json::Value;

use crate::advice::extract_advice;
use crate::protocol::ConversationEntry;
use crate::tui::ViewState;

/// Render the conversation log into the given area.
///
/// The view is anchored to the newest entry; `conversation_scroll` counts
/// lines scrolled back from the bottom.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!("Conversation ({})", state.conversation.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if state.conversation.is_empty() {
        let paragraph = Paragraph::new("  No messages yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for entry in &state.conversation {
        lines.extend(entry_lines(entry));
    }

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = lines.len();

    // Bottom-anchored window, scrolled back by conversation_scroll lines
    let max_scroll = total.saturating_sub(visible_rows);
    let scroll_back = state.conversation_scroll.min(max_scroll);
    let start = total.saturating_sub(visible_rows + scroll_back);

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(start)
        .take(visible_rows.max(1))
        .collect();

    let paragraph = Paragraph::new(visible).block(block);
    frame.render_widget(paragraph, area);
}

/// Build the display lines for one conversation entry.
pub fn entry_lines(entry: &ConversationEntry) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            " You ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" from {} at {}", entry.phone, entry.received_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!("   {}", entry.message),
        Style::default().fg(Color::Blue),
    )));

    lines.push(Line::from(Span::styled(
        " Server ",
        Style::default()
            .fg(Color::White)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    for text_line in response_display(&entry.response).lines() {
        lines.push(Line::from(Span::styled(
            format!("   {text_line}"),
            Style::default().fg(Color::Green),
        )));
    }

    lines.push(Line::default());
    lines
}

/// Derive the display text for a response payload.
///
/// The backend's reply usually carries an `advice` field whose value is a
/// loosely-structured string; that string goes through the best-effort
/// extractor. Anything else falls back to compact JSON so the raw payload
/// stays visible rather than disappearing.
pub fn response_display(response: &Value) -> String {
    match response {
        Value::String(s) => extract_advice(s).into_owned(),
        Value::Object(map) => match map.get("advice") {
            Some(Value::String(s)) => extract_advice(s).into_owned(),
            _ => compact_json(response),
        },
        _ => compact_json(response),
    }
}

fn compact_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
