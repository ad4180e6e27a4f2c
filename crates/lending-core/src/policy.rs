//! Lending policy: loan periods, borrow limits, and overdue fines.
//!
//! Members without a recognised category are lent on student terms.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LendingError, Result};

/// Fine charged per whole overdue calendar day.
pub const FINE_PER_DAY: i64 = 2;

/// Longest loan period a policy table may configure (about a century).
pub const MAX_LOAN_PERIOD_DAYS: i64 = 36_500;

/// Highest daily fine a policy table may configure.
pub const MAX_FINE_PER_DAY: i64 = 1_000_000;

/// Member category that selects the lending terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Student,
    Faculty,
    Staff,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Student, Category::Faculty, Category::Staff];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Student => "student",
            Category::Faculty => "faculty",
            Category::Staff => "staff",
        }
    }

    /// Lenient parse for values read back from a store. Anything that is not
    /// faculty or staff lends on student terms.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or(Category::Student)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LendingError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Category::Student),
            "faculty" => Ok(Category::Faculty),
            "staff" => Ok(Category::Staff),
            other => Err(LendingError::InvalidInput(format!(
                "Unknown category \"{}\" (expected student, faculty, or staff)",
                other
            ))),
        }
    }
}

/// Terms for a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    pub loan_period_days: i64,
    pub borrow_limit: usize,
}

impl CategoryPolicy {
    pub const fn new(loan_period_days: i64, borrow_limit: usize) -> Self {
        Self {
            loan_period_days,
            borrow_limit,
        }
    }
}

/// Complete lending policy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingPolicy {
    pub fine_per_day: i64,
    pub student: CategoryPolicy,
    pub faculty: CategoryPolicy,
    pub staff: CategoryPolicy,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            fine_per_day: FINE_PER_DAY,
            student: CategoryPolicy::new(14, 5),
            faculty: CategoryPolicy::new(30, 10),
            staff: CategoryPolicy::new(21, 7),
        }
    }
}

impl LendingPolicy {
    /// Terms for a category; `None` falls back to student terms.
    pub fn terms(&self, category: Option<Category>) -> CategoryPolicy {
        match category {
            Some(Category::Faculty) => self.faculty,
            Some(Category::Staff) => self.staff,
            Some(Category::Student) | None => self.student,
        }
    }

    /// Due time for a loan issued at `issued`.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::InvalidInput` if the loan period runs past the
    /// representable calendar.
    pub fn due_time(
        &self,
        category: Option<Category>,
        issued: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let days = self.terms(category).loan_period_days;
        Duration::try_days(days)
            .and_then(|period| issued.checked_add_signed(period))
            .ok_or_else(|| {
                LendingError::InvalidInput(format!(
                    "Loan period of {} days is out of range",
                    days
                ))
            })
    }

    /// Fine for `overdue_days` late days; saturates instead of overflowing.
    pub fn fine_for(&self, overdue_days: i64) -> i64 {
        overdue_days.max(0).saturating_mul(self.fine_per_day)
    }

    /// Reject tables that could never lend anything sensibly.
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_FINE_PER_DAY).contains(&self.fine_per_day) {
            return Err(LendingError::InvalidInput(format!(
                "fine_per_day must be between 0 and {}",
                MAX_FINE_PER_DAY
            )));
        }
        for category in Category::ALL {
            let terms = self.terms(Some(category));
            if !(1..=MAX_LOAN_PERIOD_DAYS).contains(&terms.loan_period_days) {
                return Err(LendingError::InvalidInput(format!(
                    "{} loan_period_days must be between 1 and {}",
                    category, MAX_LOAN_PERIOD_DAYS
                )));
            }
        }
        Ok(())
    }
}

/// Whole calendar days between the due date and `at`, never negative.
///
/// Both timestamps are truncated to their UTC date before subtracting.
pub fn overdue_days(due: DateTime<Utc>, at: DateTime<Utc>) -> i64 {
    (at.date_naive() - due.date_naive()).num_days().max(0)
}
