//! Miscellaneous commands

use super::CommandStatus;
use crate::error::Result;
use crate::session::Session;

/// Clear and redraw the whole screen
pub fn redraw_display(session: &mut Session) -> Result<CommandStatus> {
    session.request_redraw();
    Ok(CommandStatus::Success)
}

/// Quit, confirming first when annotations were not exported
pub fn quit(session: &mut Session) -> Result<CommandStatus> {
    session.request_quit();
    Ok(CommandStatus::Success)
}

/// Abort the current operation (C-g)
pub fn abort(session: &mut Session) -> Result<CommandStatus> {
    session.view.clear_mark();
    session.show_help = false;
    session.set_message("Quit");
    Ok(CommandStatus::Abort)
}

/// Toggle the key binding list
pub fn describe_bindings(session: &mut Session) -> Result<CommandStatus> {
    session.show_help = !session.show_help;
    Ok(CommandStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::DocumentSet;

    #[test]
    fn test_abort_clears_mark() {
        let mut s = Session::new(DocumentSet::samples(), Config::default());
        s.view.set_mark();
        s.show_help = true;
        assert_eq!(abort(&mut s).unwrap(), CommandStatus::Abort);
        assert_eq!(s.view.mark(), None);
        assert!(!s.show_help);
    }

    #[test]
    fn test_describe_bindings_toggles() {
        let mut s = Session::new(DocumentSet::samples(), Config::default());
        describe_bindings(&mut s).unwrap();
        assert!(s.show_help);
        describe_bindings(&mut s).unwrap();
        assert!(!s.show_help);
    }

    #[test]
    fn test_quit_without_annotations() {
        let mut s = Session::new(DocumentSet::samples(), Config::default());
        quit(&mut s).unwrap();
        assert!(!s.running);
    }
}
