// Scheduled-run panel: latest simulation report.
//
// Shows the processed-user count and the generated message list, a
// "no messages" placeholder when the run produced none, a progress note
// while the simulation is in flight, and an idle hint otherwise.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::protocol::ScheduledRunReport;
use crate::tui::ViewState;

/// Render the scheduled-run panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Scheduled Run");

    let paragraph = if state.simulating {
        Paragraph::new("  Simulating...")
            .style(Style::default().fg(Color::Magenta))
            .block(block)
    } else {
        match &state.scheduled_run {
            Some(report) => Paragraph::new(report_lines(report)).block(block),
            None => Paragraph::new("  Press Ctrl+R to simulate a scheduled run.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
        }
    };

    frame.render_widget(paragraph, area);
}

/// Build the display lines for a scheduled-run report.
pub fn report_lines(report: &ScheduledRunReport) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                "  Processed users: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(report.processed_users.to_string()),
        ]),
        Line::from(Span::styled(
            "  Messages:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    if report.messages.is_empty() {
        lines.push(Line::from(Span::styled(
            "   No messages sent in this run.",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }

    for msg in &report.messages {
        lines.push(Line::from(vec![
            Span::styled(
                format!("   To: {} ", msg.to),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        lines.push(Line::from(Span::raw(format!("      {}", msg.message))));
    }

    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
