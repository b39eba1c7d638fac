// TUI console: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors relevant parts of the application
// state. The app orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::protocol::{ConversationEntry, ScheduledRunReport, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Which compose input currently receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Phone,
    Message,
}

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the console.
pub struct ViewState {
    /// Endpoint base URL, shown in the status bar.
    pub endpoint: String,
    /// Phone input field. Retained across sends.
    pub phone: String,
    /// Message input field. Cleared when a send succeeds.
    pub message: String,
    /// Focused compose field.
    pub focus: Field,
    /// Mirror of the append-only conversation log.
    pub conversation: Vec<ConversationEntry>,
    /// Mirror of the latest scheduled-run report.
    pub scheduled_run: Option<ScheduledRunReport>,
    /// Current error banner text, if any.
    pub error: Option<String>,
    /// A webhook submission is in flight.
    pub sending: bool,
    /// A scheduled-run simulation is in flight.
    pub simulating: bool,
    /// Lines scrolled up from the bottom of the conversation log.
    pub conversation_scroll: usize,
    /// Quit confirmation prompt is active.
    pub confirm_quit: bool,
}

impl ViewState {
    /// Build the initial view state from the loaded config.
    pub fn new(config: &Config) -> Self {
        ViewState {
            endpoint: config.api.base_url.clone(),
            phone: config.ui.phone_prefill.clone().unwrap_or_default(),
            message: String::new(),
            focus: Field::Phone,
            conversation: Vec::new(),
            scheduled_run: None,
            error: None,
            sending: false,
            simulating: false,
            conversation_scroll: 0,
            confirm_quit: false,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            endpoint: String::new(),
            phone: String::new(),
            message: String::new(),
            focus: Field::Phone,
            conversation: Vec::new(),
            scheduled_run: None,
            error: None,
            sending: false,
            simulating: false,
            conversation_scroll: 0,
            confirm_quit: false,
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::SendStarted => {
            state.sending = true;
            state.error = None;
        }
        UiUpdate::ConversationAppended(entry) => {
            state.conversation.push(*entry);
            state.sending = false;
            // Phone is retained for repeated sends; only the message clears.
            state.message.clear();
            // Snap back to the newest entry.
            state.conversation_scroll = 0;
        }
        UiUpdate::SendFailed(msg) => {
            state.sending = false;
            state.error = Some(msg);
        }
        UiUpdate::ScheduledRunStarted => {
            state.simulating = true;
            state.scheduled_run = None;
            state.error = None;
        }
        UiUpdate::ScheduledRunReport(report) => {
            state.simulating = false;
            state.scheduled_run = Some(*report);
        }
        UiUpdate::ScheduledRunFailed(msg) => {
            state.simulating = false;
            state.error = Some(msg);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete console frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::compose::render(frame, layout.compose, state);
    widgets::conversation::render(frame, layout.conversation, state);
    widgets::scheduled_run::render(frame, layout.scheduled_run, state);
    render_error_banner(frame, layout.error_banner, state);
    render_help_bar(frame, layout.help_bar, state);
}

fn render_error_banner(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let Some(error) = &state.error else {
        return;
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        format!(" Error: {error}"),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::Red));
    frame.render_widget(paragraph, area);
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let text = if state.confirm_quit {
        " Quit? y:Yes | n:No"
    } else {
        " Enter:Send | Tab:Switch field | Ctrl+R:Scheduled run | Esc:Dismiss error | Ctrl+Q:Quit"
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore the terminal on crash.
    //    We capture the original hook and chain ours before it.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 4. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 5. Main loop
    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(command) = input::handle_key(key_event, &mut view_state) {
                            let quitting = command == UserCommand::Quit;
                            let _ = cmd_tx.send(command).await;
                            if quitting {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- ignore
                    }
                    Some(Err(_)) => {
                        // Input error -- break out
                        break;
                    }
                    None => {
                        // Stream ended
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 6. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
