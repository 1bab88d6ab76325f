//! Estimated-payment calendar.
//!
//! Read-only reference data for the quarterly payment schedule of a tax
//! year: one payment entry per due date and one reminder entry on the
//! first of the due month. The final installment falls in January of the
//! following year.

use serde::{Deserialize, Serialize};

/// Kind of calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarEntryKind {
    Reminder,
    Payment,
}

impl CalendarEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Payment => "payment",
        }
    }
}

/// One calendar entry, in the wire shape of the calendar endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEntry {
    #[serde(rename = "_id")]
    pub id: u32,
    pub title: String,
    pub date: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CalendarEntryKind,
}

struct Quarter {
    label: &'static str,
    ordinal: &'static str,
    month: &'static str,
    /// Offset from the tax year; the final installment lands in January of
    /// the following year.
    year_offset: i32,
}

const QUARTERS: [Quarter; 4] = [
    Quarter {
        label: "Q1",
        ordinal: "First",
        month: "April",
        year_offset: 0,
    },
    Quarter {
        label: "Q2",
        ordinal: "Second",
        month: "June",
        year_offset: 0,
    },
    Quarter {
        label: "Q3",
        ordinal: "Third",
        month: "September",
        year_offset: 0,
    },
    Quarter {
        label: "Q4",
        ordinal: "Fourth",
        month: "January",
        year_offset: 1,
    },
];

/// Due and reminder entries for every quarterly installment of `tax_year`,
/// in chronological order.
pub fn payment_schedule(tax_year: i32) -> Vec<CalendarEntry> {
    let mut entries = Vec::with_capacity(QUARTERS.len() * 2);
    let mut id = 1;

    for quarter in &QUARTERS {
        let year = tax_year + quarter.year_offset;
        let due_date = format!("{} 15, {}", quarter.month, year);

        entries.push(CalendarEntry {
            id,
            title: format!("Reminder: {} Estimated tax payment.", quarter.label),
            date: format!("{} 1, {}", quarter.month, year),
            description: format!(
                "Reminder for upcoming {} tax payment on {}",
                quarter.label, due_date
            ),
            kind: CalendarEntryKind::Reminder,
        });
        id += 1;

        entries.push(CalendarEntry {
            id,
            title: format!("{} Estimated tax payment.", quarter.label),
            date: due_date,
            description: format!("{} quarter estimated tax payment due", quarter.ordinal),
            kind: CalendarEntryKind::Payment,
        });
        id += 1;
    }

    entries
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarData {
    pub calendar: Vec<CalendarEntry>,
}

/// `{ success, data: { calendar } }` envelope for the calendar endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarResponse {
    pub success: bool,
    pub data: CalendarData,
}

pub fn calendar_response(tax_year: i32) -> CalendarResponse {
    CalendarResponse {
        success: true,
        data: CalendarData {
            calendar: payment_schedule(tax_year),
        },
    }
}
