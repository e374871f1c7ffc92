//! Log filtering and viewer scoping.
//!
//! Filtering is kept apart from aggregation: dashboards build a [`LogFilter`]
//! for the viewer, selection and window, apply it, and hand the surviving
//! logs to the aggregators.

use serde::Serialize;

use super::period::DateWindow;
use crate::types::{Member, WorkoutLog};

/// Which member(s) a dashboard is focused on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MemberSelection {
    #[default]
    All,
    Member(String),
}

impl std::str::FromStr for MemberSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(MemberSelection::All)
        } else {
            Ok(MemberSelection::Member(s.to_string()))
        }
    }
}

/// What the authentication collaborator tells us about the person looking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Viewer {
    pub is_admin: bool,
    pub member_name: Option<String>,
}

impl Viewer {
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            member_name: None,
        }
    }

    pub fn member(member_name: impl Into<String>) -> Self {
        Self {
            is_admin: false,
            member_name: Some(member_name.into()),
        }
    }

    /// Whether records of `member_name` are visible to this viewer.
    pub fn can_see(&self, member_name: &str) -> bool {
        self.is_admin || self.member_name.as_deref() == Some(member_name)
    }
}

/// Member restriction resolved from viewer and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberScope {
    Everyone,
    Only(String),
    /// A non-admin viewer without a member name, or a selection they may not see
    Nobody,
}

impl MemberScope {
    pub fn includes(&self, member_name: &str) -> bool {
        match self {
            MemberScope::Everyone => true,
            MemberScope::Only(name) => name == member_name,
            MemberScope::Nobody => false,
        }
    }
}

/// Predicate over workout logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub window: Option<DateWindow>,
    pub scope: MemberScope,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            window: None,
            scope: MemberScope::Everyone,
        }
    }
}

impl LogFilter {
    /// Resolve the member scope for a viewer and their selection.
    ///
    /// Admins get whatever they selected. Non-admins are always pinned to
    /// their own name; selecting someone else yields nothing.
    pub fn for_viewer(viewer: &Viewer, selection: &MemberSelection) -> Self {
        let scope = match (viewer.is_admin, selection) {
            (true, MemberSelection::All) => MemberScope::Everyone,
            (true, MemberSelection::Member(name)) => MemberScope::Only(name.clone()),
            (false, selection) => match (&viewer.member_name, selection) {
                (None, _) => MemberScope::Nobody,
                (Some(own), MemberSelection::All) => MemberScope::Only(own.clone()),
                (Some(own), MemberSelection::Member(name)) if own == name => {
                    MemberScope::Only(own.clone())
                }
                (Some(_), MemberSelection::Member(_)) => MemberScope::Nobody,
            },
        };
        Self {
            window: None,
            scope,
        }
    }

    /// Restrict to a date window.
    pub fn within(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn matches(&self, log: &WorkoutLog) -> bool {
        self.scope.includes(&log.member_name)
            && self.window.map_or(true, |w| w.contains(log.date))
    }

    pub fn apply(&self, logs: &[WorkoutLog]) -> Vec<WorkoutLog> {
        logs.iter().filter(|log| self.matches(log)).cloned().collect()
    }
}

/// Members counted in participation for `window`: in scope and joined by its end.
pub fn eligible_members<'a>(
    members: &'a [Member],
    scope: &MemberScope,
    window: &DateWindow,
) -> Vec<&'a Member> {
    members
        .iter()
        .filter(|m| scope.includes(&m.member_name) && m.joined_by(window.end))
        .collect()
}
