//! Selection commands - mark, pattern selection and the annotation form

use super::CommandStatus;
use crate::annotation::Score;
use crate::error::Result;
use crate::session::{PromptAction, Session};

/// Set mark at cursor position
pub fn set_mark(session: &mut Session) -> Result<CommandStatus> {
    session.view.set_mark();
    session.set_message("Mark set");
    Ok(CommandStatus::Success)
}

/// Swap cursor and mark
pub fn exchange_point_and_mark(session: &mut Session) -> Result<CommandStatus> {
    if session.view.exchange_point_and_mark() {
        Ok(CommandStatus::Success)
    } else {
        session.set_message("No mark set");
        Ok(CommandStatus::Failure)
    }
}

/// Select the whole trace
pub fn mark_whole_trace(session: &mut Session) -> Result<CommandStatus> {
    let text = &session.documents.current().text;
    session.view.select(text, 0..text.len());
    Ok(CommandStatus::Success)
}

/// Prompt for a pattern and select its next match
pub fn select_pattern(session: &mut Session) -> Result<CommandStatus> {
    session.start_prompt("Select pattern", PromptAction::SelectPattern);
    Ok(CommandStatus::Success)
}

/// Annotate the selection with the chosen behavior and score
pub fn submit_annotation(session: &mut Session) -> Result<CommandStatus> {
    session.submit_selection()
}

fn show_form(session: &mut Session) {
    let msg = format!("Behavior: {}  Score: {}", session.view.behavior, session.view.score);
    session.set_message(msg);
}

/// Choose the next behavior label
pub fn next_behavior(session: &mut Session) -> Result<CommandStatus> {
    session.view.behavior = session.view.behavior.next();
    show_form(session);
    Ok(CommandStatus::Success)
}

/// Choose the previous behavior label
pub fn previous_behavior(session: &mut Session) -> Result<CommandStatus> {
    session.view.behavior = session.view.behavior.previous();
    show_form(session);
    Ok(CommandStatus::Success)
}

/// Choose score 1
pub fn score_one(session: &mut Session) -> Result<CommandStatus> {
    session.view.score = Score::One;
    show_form(session);
    Ok(CommandStatus::Success)
}

/// Choose score 2
pub fn score_two(session: &mut Session) -> Result<CommandStatus> {
    session.view.score = Score::Two;
    show_form(session);
    Ok(CommandStatus::Success)
}
