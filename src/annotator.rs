//! Terminal front end and main loop

use crate::command::{CommandStatus, KeyTable};
use crate::display::Display;
use crate::error::Result;
use crate::input::InputState;
use crate::session::Session;
use crate::terminal::Terminal;

/// Interactive annotator: a session bound to a terminal
pub struct Annotator {
    /// Traces, spans and view
    pub session: Session,
    /// Terminal interface
    pub terminal: Terminal,
    /// Display state
    pub display: Display,
    /// Input state
    pub input: InputState,
    /// Key bindings
    pub keytab: KeyTable,
    /// Terminal size at the last render
    last_size: (u16, u16),
}

impl Annotator {
    pub fn new(session: Session, terminal: Terminal) -> Self {
        let keytab = KeyTable::with_defaults();
        let display = Display::new(keytab.describe());
        Self {
            session,
            terminal,
            display,
            input: InputState::new(),
            keytab,
            last_size: (0, 0),
        }
    }

    /// Run the main loop until quit
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            traces = self.session.documents.len(),
            export = %self.session.config.export_path.display(),
            "annotator started"
        );
        self.display.force_redraw();

        while self.session.running {
            self.render()?;

            let key_event = self.terminal.read_key()?;

            if let Some(key) = self.input.translate_key(key_event) {
                let status = self.session.handle_key(&self.keytab, key)?;
                tracing::trace!(key = %key.display_name(), ?status, "key handled");
                match status {
                    CommandStatus::Success => {}
                    CommandStatus::Failure | CommandStatus::Abort => self.terminal.beep()?,
                }
            } else if self.input.is_ctlx_pending() {
                self.session.set_message("C-x -");
            } else if self.input.is_meta_pending() {
                self.session.set_message("ESC -");
            }
        }

        tracing::info!(
            spans = self.session.store.span_count(),
            exported = !self.session.is_modified(),
            "annotator stopped"
        );
        Ok(())
    }

    /// Lay out for the current terminal size and draw
    fn render(&mut self) -> Result<()> {
        if self.session.take_redraw() {
            self.display.force_redraw();
        }

        let size = (self.terminal.cols(), self.terminal.rows());
        if size != self.last_size {
            self.last_size = size;
            self.display.force_redraw();
        }
        let (cols, rows) = (size.0 as usize, size.1 as usize);
        self.session.set_text_width(cols);

        let height = self.display.text_height(&self.session, rows);
        self.session.ensure_cursor_visible(height);

        self.display.render(&mut self.terminal, &self.session)
    }
}
