// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the console:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Compose Form (7 rows)                             |
// +-------------------------+------------------------+
// | Conversation (60%)       | Scheduled Run (40%)    |
// +-------------------------+------------------------+
// | Error Banner (1 row)                              |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each console zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: endpoint base and exchange counter.
    pub status_bar: Rect,
    /// Phone and message inputs.
    pub compose: Rect,
    /// Left side of the middle section: conversation log.
    pub conversation: Rect,
    /// Right side of the middle section: scheduled-run report.
    pub scheduled_run: Rect,
    /// Second-to-last row: error banner (blank when no error).
    pub error_banner: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the console layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | compose(7) | middle(fill) | error(1) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(7), // compose form
            Constraint::Min(8),    // middle section (conversation + scheduled run)
            Constraint::Length(1), // error banner
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let compose = vertical[1];
    let middle = vertical[2];
    let error_banner = vertical[3];
    let help_bar = vertical[4];

    // Horizontal: conversation (60%) | scheduled run (40%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(middle);

    let conversation = horizontal[0];
    let scheduled_run = horizontal[1];

    AppLayout {
        status_bar,
        compose,
        conversation,
        scheduled_run,
        error_banner,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
