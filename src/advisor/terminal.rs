//! Advisor side-panel state
//!
//! Holds the conversation shown in the terminal and the status of the
//! current reconnaissance analysis. No I/O happens here; the driver feeds in
//! replies as they arrive.

use super::request::ChatTurn;

pub const GREETING: &str =
    "Commander Gemini online. Uplink established. Waiting for situational report.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Advisor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Analyzing,
    Complete,
}

#[derive(Debug, Clone)]
pub struct Terminal {
    messages: Vec<TerminalMessage>,
    next_id: u64,
    awaiting_reply: bool,
    analysis_status: AnalysisStatus,
    analysis_text: String,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    pub fn new() -> Self {
        let mut terminal = Self {
            messages: Vec::new(),
            next_id: 0,
            awaiting_reply: false,
            analysis_status: AnalysisStatus::Idle,
            analysis_text: String::new(),
        };
        terminal.push(Sender::Advisor, GREETING.to_string());
        terminal
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.messages.push(TerminalMessage {
            id: self.next_id,
            sender,
            text,
        });
        self.next_id += 1;
    }

    pub fn messages(&self) -> &[TerminalMessage] {
        &self.messages
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Every message so far as service turns
    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .map(|m| match m.sender {
                Sender::User => ChatTurn::user(m.text.clone()),
                Sender::Advisor => ChatTurn::model(m.text.clone()),
            })
            .collect()
    }

    /// Record a user message. Returns the text to send plus the history that
    /// preceded it, or `None` for blank input.
    pub fn submit(&mut self, text: &str) -> Option<(String, Vec<ChatTurn>)> {
        if text.trim().is_empty() {
            return None;
        }
        let history = self.history();
        self.push(Sender::User, text.to_string());
        self.awaiting_reply = true;
        Some((text.to_string(), history))
    }

    pub fn receive(&mut self, reply: String) {
        self.push(Sender::Advisor, reply);
        self.awaiting_reply = false;
    }

    pub fn analysis_status(&self) -> AnalysisStatus {
        self.analysis_status
    }

    pub fn analysis_text(&self) -> &str {
        &self.analysis_text
    }

    /// A new image was picked; forget the previous report
    pub fn clear_analysis(&mut self) {
        self.analysis_status = AnalysisStatus::Idle;
        self.analysis_text.clear();
    }

    pub fn begin_analysis(&mut self) {
        self.analysis_status = AnalysisStatus::Analyzing;
        self.analysis_text.clear();
    }

    pub fn finish_analysis(&mut self, report: String) {
        self.analysis_status = AnalysisStatus::Complete;
        self.analysis_text = report;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::request::Role;

    #[test]
    fn test_starts_with_greeting() {
        let t = Terminal::new();
        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.messages()[0].sender, Sender::Advisor);
        assert_eq!(t.messages()[0].text, GREETING);
    }

    #[test]
    fn test_submit_builds_history_from_prior_messages() {
        let mut t = Terminal::new();
        assert_eq!(t.submit("   "), None);

        let (text, history) = t.submit("Contact north").unwrap();
        assert_eq!(text, "Contact north");
        assert_eq!(history, vec![ChatTurn::model(GREETING)]);
        assert!(t.awaiting_reply());

        t.receive("Copy that.".into());
        assert!(!t.awaiting_reply());

        let (_, history) = t.submit("Ammo low").unwrap();
        let roles: Vec<Role> = history.iter().map(|h| h.role).collect();
        assert_eq!(roles, vec![Role::Model, Role::User, Role::Model]);

        let ids: Vec<u64> = t.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_analysis_status_flow() {
        let mut t = Terminal::new();
        assert_eq!(t.analysis_status(), AnalysisStatus::Idle);
        t.begin_analysis();
        assert_eq!(t.analysis_status(), AnalysisStatus::Analyzing);
        t.finish_analysis("INTEL REPORT".into());
        assert_eq!(t.analysis_status(), AnalysisStatus::Complete);
        assert_eq!(t.analysis_text(), "INTEL REPORT");
        t.clear_analysis();
        assert_eq!(t.analysis_status(), AnalysisStatus::Idle);
        assert_eq!(t.analysis_text(), "");
    }
}
