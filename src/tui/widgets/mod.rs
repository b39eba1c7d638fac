// TUI widget modules for each console panel.

pub mod compose;
pub mod conversation;
pub mod scheduled_run;
pub mod status_bar;
