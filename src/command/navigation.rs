//! Navigation commands - cursor movement and trace switching

use super::CommandStatus;
use crate::error::Result;
use crate::session::Session;

fn status(moved: bool) -> CommandStatus {
    if moved {
        CommandStatus::Success
    } else {
        CommandStatus::Failure
    }
}

/// Move cursor forward one character
pub fn forward_char(session: &mut Session) -> Result<CommandStatus> {
    let text = &session.documents.current().text;
    session.view.set_goal_col(None);
    Ok(status(session.view.forward_char(text)))
}

/// Move cursor backward one character
pub fn backward_char(session: &mut Session) -> Result<CommandStatus> {
    let text = &session.documents.current().text;
    session.view.set_goal_col(None);
    Ok(status(session.view.backward_char(text)))
}

/// Move cursor forward one word
pub fn forward_word(session: &mut Session) -> Result<CommandStatus> {
    let text = &session.documents.current().text;
    session.view.set_goal_col(None);
    Ok(status(session.view.forward_word(text)))
}

/// Move cursor backward one word
pub fn backward_word(session: &mut Session) -> Result<CommandStatus> {
    let text = &session.documents.current().text;
    session.view.set_goal_col(None);
    Ok(status(session.view.backward_word(text)))
}

/// Move cursor to next screen row
pub fn next_line(session: &mut Session) -> Result<CommandStatus> {
    Ok(status(session.move_vertical(true)))
}

/// Move cursor to previous screen row
pub fn previous_line(session: &mut Session) -> Result<CommandStatus> {
    Ok(status(session.move_vertical(false)))
}

/// Move cursor to beginning of row
pub fn beginning_of_line(session: &mut Session) -> Result<CommandStatus> {
    session.view.set_goal_col(None);
    session.move_to_row_edge(false);
    Ok(CommandStatus::Success)
}

/// Move cursor to end of row
pub fn end_of_line(session: &mut Session) -> Result<CommandStatus> {
    session.view.set_goal_col(None);
    session.move_to_row_edge(true);
    Ok(CommandStatus::Success)
}

/// Move cursor to the start of the trace
pub fn beginning_of_trace(session: &mut Session) -> Result<CommandStatus> {
    let text = &session.documents.current().text;
    session.view.set_goal_col(None);
    session.view.set_cursor(text, 0);
    Ok(CommandStatus::Success)
}

/// Move cursor to the end of the trace
pub fn end_of_trace(session: &mut Session) -> Result<CommandStatus> {
    let text = &session.documents.current().text;
    session.view.set_goal_col(None);
    session.view.set_cursor(text, text.len());
    Ok(CommandStatus::Success)
}

/// Show the next trace
pub fn next_trace(session: &mut Session) -> Result<CommandStatus> {
    if session.switch_document(true) {
        Ok(CommandStatus::Success)
    } else {
        session.set_message("Last trace");
        Ok(CommandStatus::Failure)
    }
}

/// Show the previous trace
pub fn previous_trace(session: &mut Session) -> Result<CommandStatus> {
    if session.switch_document(false) {
        Ok(CommandStatus::Success)
    } else {
        session.set_message("First trace");
        Ok(CommandStatus::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::{Document, DocumentSet};

    fn session(text: &str) -> Session {
        let docs = DocumentSet::new(vec![
            Document::new("a", "Q1", text),
            Document::new("b", "Q2", "second"),
        ])
        .unwrap();
        Session::new(docs, Config::default())
    }

    #[test]
    fn test_char_and_word() {
        let mut s = session("one two");
        assert_eq!(backward_char(&mut s).unwrap(), CommandStatus::Failure);
        forward_word(&mut s).unwrap();
        assert_eq!(s.view.cursor(), 3);
        forward_char(&mut s).unwrap();
        assert_eq!(s.view.cursor(), 4);
        backward_word(&mut s).unwrap();
        assert_eq!(s.view.cursor(), 0);
        end_of_trace(&mut s).unwrap();
        assert_eq!(forward_char(&mut s).unwrap(), CommandStatus::Failure);
        beginning_of_trace(&mut s).unwrap();
        assert_eq!(s.view.cursor(), 0);
    }

    #[test]
    fn test_lines_keep_goal_column() {
        let mut s = session("abcdef\nab\nabcdef");
        end_of_line(&mut s).unwrap();
        assert_eq!(s.view.cursor(), 6);
        next_line(&mut s).unwrap();
        assert_eq!(s.view.cursor(), 9);
        next_line(&mut s).unwrap();
        assert_eq!(s.view.cursor(), 16);
        assert_eq!(next_line(&mut s).unwrap(), CommandStatus::Failure);
        previous_line(&mut s).unwrap();
        previous_line(&mut s).unwrap();
        assert_eq!(s.view.cursor(), 6);
        beginning_of_line(&mut s).unwrap();
        assert_eq!(s.view.cursor(), 0);
    }

    #[test]
    fn test_trace_switching() {
        let mut s = session("first");
        assert_eq!(previous_trace(&mut s).unwrap(), CommandStatus::Failure);
        assert_eq!(s.message(), Some("First trace"));
        assert_eq!(next_trace(&mut s).unwrap(), CommandStatus::Success);
        assert_eq!(s.document().id, "b");
        assert_eq!(next_trace(&mut s).unwrap(), CommandStatus::Failure);
    }
}
