//! Status badges shown by the dashboard.
//!
//! Every mapping here is total over its enumeration, so a status can always
//! be rendered.

use crate::use_case::domain::UseCaseStatus;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// Icon drawn next to a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusIcon {
    /// Warning triangle.
    Warning,
    /// Clock face.
    Clock,
    /// Check mark in a circle.
    CheckCircle,
}

/// Label, colour class and icon for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBadge {
    /// Text shown to the user.
    pub label: &'static str,
    /// Tailwind text colour class.
    pub color_class: &'static str,
    /// Icon to draw.
    pub icon: StatusIcon,
}

/// Validation currency of an inventoried model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// The next validation is past due.
    Overdue,
    /// The next validation falls inside the upcoming window.
    Upcoming,
    /// No validation is due soon.
    Current,
}

impl ValidationStatus {
    /// Every validation status.
    pub const ALL: [Self; 3] = [Self::Overdue, Self::Upcoming, Self::Current];

    /// Parses a status leniently: `overdue` and `upcoming` (any case) map to
    /// their variants and anything else is `Current`.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "overdue" => Self::Overdue,
            "upcoming" => Self::Upcoming,
            _ => Self::Current,
        }
    }

    /// Classifies a due date relative to `now`.
    ///
    /// Past due is `Overdue`; due within `upcoming_window_days` is
    /// `Upcoming`; anything later is `Current`. A window reaching past the
    /// representable date range counts every future date as `Upcoming`.
    #[must_use]
    pub fn from_due_date(
        next_due: DateTime<Utc>,
        now: DateTime<Utc>,
        upcoming_window_days: u32,
    ) -> Self {
        if next_due < now {
            return Self::Overdue;
        }
        let horizon = Duration::try_days(i64::from(upcoming_window_days))
            .and_then(|window| now.checked_add_signed(window));
        match horizon {
            Some(limit) if next_due > limit => Self::Current,
            _ => Self::Upcoming,
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Upcoming => "upcoming",
            Self::Current => "current",
        }
    }

    /// Returns the badge for this status.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Overdue => StatusBadge {
                label: "Overdue",
                color_class: "text-red-600",
                icon: StatusIcon::Warning,
            },
            Self::Upcoming => StatusBadge {
                label: "Due Soon",
                color_class: "text-yellow-600",
                icon: StatusIcon::Clock,
            },
            Self::Current => StatusBadge {
                label: "Current",
                color_class: "text-green-600",
                icon: StatusIcon::CheckCircle,
            },
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the badge for a use-case lifecycle state.
#[must_use]
pub const fn use_case_badge(status: UseCaseStatus) -> StatusBadge {
    match status {
        UseCaseStatus::Draft => StatusBadge {
            label: "Draft",
            color_class: "text-gray-600",
            icon: StatusIcon::Clock,
        },
        UseCaseStatus::Submitted => StatusBadge {
            label: "Submitted",
            color_class: "text-blue-600",
            icon: StatusIcon::Clock,
        },
        UseCaseStatus::UnderReview => StatusBadge {
            label: "Under Review",
            color_class: "text-yellow-600",
            icon: StatusIcon::Clock,
        },
        UseCaseStatus::Approved => StatusBadge {
            label: "Approved",
            color_class: "text-green-600",
            icon: StatusIcon::CheckCircle,
        },
        UseCaseStatus::SentBack => StatusBadge {
            label: "Sent Back",
            color_class: "text-red-600",
            icon: StatusIcon::Warning,
        },
    }
}
