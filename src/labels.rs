//! Display labels for enumerated codes sent by the backend.
//!
//! Tables are plain `(code, label)` slices; a locale swaps the slice, not
//! the lookup. Unknown codes display as themselves.

pub type LabelTable = &'static [(&'static str, &'static str)];

pub static FUELING_REASONS: LabelTable = &[
    ("ROUTE", "Regular route"),
    ("EXCURSION", "Field trip"),
    ("MAINTENANCE", "Maintenance run"),
    ("EMERGENCY", "Emergency"),
    ("OTHER", "Other"),
];

pub static SCHEDULES: LabelTable = &[
    ("MORNING", "Morning"),
    ("MIDDAY", "Midday"),
    ("AFTERNOON", "Afternoon"),
    ("EVENING", "Evening"),
];

pub static DAYS_OF_WEEK: LabelTable = &[
    ("MONDAY", "Monday"),
    ("TUESDAY", "Tuesday"),
    ("WEDNESDAY", "Wednesday"),
    ("THURSDAY", "Thursday"),
    ("FRIDAY", "Friday"),
    ("SATURDAY", "Saturday"),
    ("SUNDAY", "Sunday"),
];

pub static EMERGENCY_TYPES: LabelTable = &[
    ("MECHANICAL", "Mechanical failure"),
    ("ACCIDENT", "Accident"),
    ("MEDICAL", "Medical"),
    ("TRAFFIC", "Traffic"),
    ("OTHER", "Other"),
];

/// Case-insensitive lookup; falls back to the code itself.
pub fn label<'a>(table: LabelTable, code: &'a str) -> &'a str {
    table
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code.trim()))
        .map(|(_, l)| *l)
        .unwrap_or(code)
}
