//! Session sidebar
//!
//! Displays the session collection as numbered rows and turns the user's
//! row references into intents for the controller. It holds no state of
//! its own beyond the snapshot it was built from.

use crate::controller::Event;
use crate::session::{SessionId, SessionSummary};
use colored::Colorize;
use prettytable::{format, Table};
use std::fmt;

/// What the user asked the sidebar to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarIntent {
    /// Start a new chat
    NewChat,
    /// Open a session
    Select(SessionId),
    /// Delete a session
    Delete(SessionId),
}

impl From<SidebarIntent> for Event {
    fn from(intent: SidebarIntent) -> Self {
        match intent {
            SidebarIntent::NewChat => Event::NewChat,
            SidebarIntent::Select(id) => Event::Select(id),
            SidebarIntent::Delete(id) => Event::Delete(id),
        }
    }
}

/// How the user referred to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRef {
    /// 1-based row number
    Row(usize),
    /// Session id
    Id(SessionId),
}

impl SessionRef {
    /// Parse a user-supplied reference
    ///
    /// Numbers that fit a row count (up to 9999) are row numbers; larger
    /// numbers are ids, which are millisecond timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use nova_scribe::ui::SessionRef;
    ///
    /// assert_eq!(SessionRef::parse("2"), Some(SessionRef::Row(2)));
    /// assert_eq!(SessionRef::parse("1718000000000"), Some(SessionRef::Id(1718000000000)));
    /// assert_eq!(SessionRef::parse("two"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let value: i64 = input.trim().parse().ok()?;
        match value {
            1..=9999 => Some(Self::Row(value as usize)),
            v if v > 9999 => Some(Self::Id(v)),
            _ => None,
        }
    }
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(row) => write!(f, "#{}", row),
            Self::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Snapshot of the session list for display and intent resolution
#[derive(Debug, Clone)]
pub struct Sidebar {
    rows: Vec<SessionSummary>,
    active: Option<SessionId>,
}

impl Sidebar {
    /// Build a sidebar from summaries in collection order
    pub fn new(rows: Vec<SessionSummary>, active: Option<SessionId>) -> Self {
        Self { rows, active }
    }

    /// Resolve a reference to an existing session id
    pub fn resolve(&self, reference: SessionRef) -> Option<SessionId> {
        match reference {
            SessionRef::Row(row) => row
                .checked_sub(1)
                .and_then(|i| self.rows.get(i))
                .map(|s| s.id),
            SessionRef::Id(id) => self.rows.iter().any(|s| s.id == id).then_some(id),
        }
    }

    /// Intent to open the referenced session
    pub fn select(&self, reference: SessionRef) -> Option<SidebarIntent> {
        self.resolve(reference).map(SidebarIntent::Select)
    }

    /// Intent to delete the referenced session
    pub fn delete(&self, reference: SessionRef) -> Option<SidebarIntent> {
        self.resolve(reference).map(SidebarIntent::Delete)
    }

    /// Intent to start a new chat
    pub fn new_chat(&self) -> SidebarIntent {
        SidebarIntent::NewChat
    }

    /// Render the session table
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return format!("{}\n", "No chat sessions yet.".yellow());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row![
            "#".bold(),
            "Title".bold(),
            "Date".bold(),
            "ID".bold()
        ]);

        for (i, row) in self.rows.iter().enumerate() {
            let number = if Some(row.id) == self.active {
                format!("{}*", i + 1).green().to_string()
            } else {
                (i + 1).to_string()
            };
            table.add_row(prettytable::row![
                number,
                row.title,
                row.date,
                row.id.to_string().cyan()
            ]);
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<SessionSummary> {
        vec![
            SessionSummary {
                id: 1_718_000_000_000,
                title: "Invoices".to_string(),
                date: "6/10/2024".to_string(),
            },
            SessionSummary {
                id: 1_718_000_000_500,
                title: "Payroll".to_string(),
                date: "6/10/2024".to_string(),
            },
        ]
    }

    #[test]
    fn test_parse_rejects_zero_and_negative() {
        assert_eq!(SessionRef::parse("0"), None);
        assert_eq!(SessionRef::parse("-3"), None);
    }

    #[test]
    fn test_resolve_rows_and_ids() {
        let sidebar = Sidebar::new(rows(), None);
        assert_eq!(sidebar.resolve(SessionRef::Row(1)), Some(1_718_000_000_000));
        assert_eq!(sidebar.resolve(SessionRef::Row(2)), Some(1_718_000_000_500));
        assert_eq!(sidebar.resolve(SessionRef::Row(3)), None);
        assert_eq!(
            sidebar.resolve(SessionRef::Id(1_718_000_000_500)),
            Some(1_718_000_000_500)
        );
        assert_eq!(sidebar.resolve(SessionRef::Id(1_718_000_000_001)), None);
    }

    #[test]
    fn test_intents_convert_to_events() {
        let sidebar = Sidebar::new(rows(), None);
        let select = sidebar.select(SessionRef::Row(2)).unwrap();
        assert_eq!(Event::from(select), Event::Select(1_718_000_000_500));
        let delete = sidebar.delete(SessionRef::Row(1)).unwrap();
        assert_eq!(Event::from(delete), Event::Delete(1_718_000_000_000));
        assert_eq!(Event::from(sidebar.new_chat()), Event::NewChat);
        assert!(sidebar.delete(SessionRef::Row(9)).is_none());
    }

    #[test]
    fn test_render_lists_titles() {
        colored::control::set_override(false);
        let rendered = Sidebar::new(rows(), Some(1_718_000_000_500)).render();
        assert!(rendered.contains("Invoices"));
        assert!(rendered.contains("Payroll"));
        assert!(rendered.contains("2*"));
    }

    #[test]
    fn test_render_empty() {
        colored::control::set_override(false);
        let rendered = Sidebar::new(vec![], None).render();
        assert!(rendered.contains("No chat sessions yet."));
    }
}
