//! Colored terminal output on stderr.
//!
//! Stdout is reserved for `build`/`export` results.

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    success: Style,
    failure: Style,
    link: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            success: Style::new().green(),
            failure: Style::new().red().bold(),
            link: Style::new().cyan().underlined(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    /// Green.
    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.success.apply_to(msg).to_string());
    }

    /// Bold red.
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.failure.apply_to(msg).to_string());
    }

    /// `label` followed by an underlined `url`.
    pub(crate) fn link(&self, label: &str, url: &str) {
        self.line(&format!("{label} {}", self.link.apply_to(url)));
    }

    fn line(&self, text: &str) {
        // A closed stderr is not worth failing a command over
        let _ = self.term.write_line(text);
    }
}
