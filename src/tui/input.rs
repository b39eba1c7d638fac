// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (field editing,
// focus switching, scrolling, error dismissal).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Field, ViewState};
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app orchestrator (send, scheduled run, quit). Returns `None` when
/// the key press was handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y confirms, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return handle_ctrl_key(key_event, view_state);
    }

    match key_event.code {
        // Submit the compose form. Both fields are required; a submit with
        // a blank field is ignored, matching the form's required inputs.
        KeyCode::Enter => submit(view_state),

        // Focus switching between the two compose fields
        KeyCode::Tab | KeyCode::BackTab => {
            view_state.focus = match view_state.focus {
                Field::Phone => Field::Message,
                Field::Message => Field::Phone,
            };
            None
        }
        KeyCode::Up => {
            view_state.focus = Field::Phone;
            None
        }
        KeyCode::Down => {
            view_state.focus = Field::Message;
            None
        }

        // Conversation scrolling
        KeyCode::PageUp => {
            view_state.conversation_scroll = view_state.conversation_scroll.saturating_add(page_size());
            None
        }
        KeyCode::PageDown => {
            view_state.conversation_scroll = view_state.conversation_scroll.saturating_sub(page_size());
            None
        }

        // Dismiss the error banner
        KeyCode::Esc => {
            view_state.error = None;
            None
        }

        // Field editing
        KeyCode::Backspace => {
            focused_field(view_state).pop();
            None
        }
        KeyCode::Char(c) => {
            focused_field(view_state).push(c);
            None
        }

        _ => None,
    }
}

/// Handle Ctrl-modified keys (other than the Ctrl+C escape hatch).
fn handle_ctrl_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        // Scheduled-run trigger. Ignored while a simulation is pending,
        // mirroring the disabled button in the original form.
        KeyCode::Char('r') => {
            if view_state.simulating {
                None
            } else {
                Some(UserCommand::SimulateScheduledRun)
            }
        }
        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserCommand::Quit),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None, // Block all other input
    }
}

/// Emit a SendMessage command when both compose fields are non-blank.
///
/// The message field is NOT cleared here: it clears only when the send
/// succeeds and the entry is appended (`UiUpdate::ConversationAppended`).
fn submit(view_state: &ViewState) -> Option<UserCommand> {
    if view_state.phone.trim().is_empty() || view_state.message.trim().is_empty() {
        return None;
    }
    Some(UserCommand::SendMessage {
        phone: view_state.phone.clone(),
        message: view_state.message.clone(),
    })
}

fn focused_field(view_state: &mut ViewState) -> &mut String {
    match view_state.focus {
        Field::Phone => &mut view_state.phone,
        Field::Message => &mut view_state.message,
    }
}

/// Page size for PageUp/PageDown scrolling.
fn page_size() -> usize {
    10
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
