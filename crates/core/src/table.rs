//! Colour-coded table rendering.
//!
//! Each patient becomes one row: identifier, then the codes and their descriptions as
//! newline-joined cells. Every code and description is tinted with the colour of its category
//! (priority, non-priority, malformed or resolved). Categories can be switched off
//! individually.
//!
//! Rendering never fails outward. Any error while preparing rows is turned into a
//! `"Input data formatted incorrectly: ..."` string returned in place of the table.

use crate::constants::{
    NO_DATA_MESSAGE, RENDER_FAILURE_PREFIX, TABLE_HEADERS, UNAVAILABLE_DESCRIPTION,
};
use crate::record::{Diagnosis, Patient, PatientRecord, RecordBuilder};
use crate::sort::{sort_records, SortField, SortOrder};
use crate::{DxError, DxResult};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

/// Colours a table category may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableColor {
    Black,
    Grey,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    LightGrey,
    DarkGrey,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    White,
}

impl TableColor {
    fn to_colored(self) -> colored::Color {
        use colored::Color;
        match self {
            TableColor::Black => Color::Black,
            TableColor::Grey | TableColor::DarkGrey => Color::BrightBlack,
            TableColor::Red => Color::Red,
            TableColor::Green => Color::Green,
            TableColor::Yellow => Color::Yellow,
            TableColor::Blue => Color::Blue,
            TableColor::Magenta => Color::Magenta,
            TableColor::Cyan => Color::Cyan,
            TableColor::LightGrey => Color::White,
            TableColor::LightRed => Color::BrightRed,
            TableColor::LightGreen => Color::BrightGreen,
            TableColor::LightYellow => Color::BrightYellow,
            TableColor::LightBlue => Color::BrightBlue,
            TableColor::LightMagenta => Color::BrightMagenta,
            TableColor::LightCyan => Color::BrightCyan,
            TableColor::White => Color::BrightWhite,
        }
    }
}

impl std::str::FromStr for TableColor {
    type Err = DxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "black" => Ok(TableColor::Black),
            "grey" | "gray" => Ok(TableColor::Grey),
            "red" => Ok(TableColor::Red),
            "green" => Ok(TableColor::Green),
            "yellow" => Ok(TableColor::Yellow),
            "blue" => Ok(TableColor::Blue),
            "magenta" => Ok(TableColor::Magenta),
            "cyan" => Ok(TableColor::Cyan),
            "light_grey" | "light_gray" => Ok(TableColor::LightGrey),
            "dark_grey" | "dark_gray" => Ok(TableColor::DarkGrey),
            "light_red" => Ok(TableColor::LightRed),
            "light_green" => Ok(TableColor::LightGreen),
            "light_yellow" => Ok(TableColor::LightYellow),
            "light_blue" => Ok(TableColor::LightBlue),
            "light_magenta" => Ok(TableColor::LightMagenta),
            "light_cyan" => Ok(TableColor::LightCyan),
            "white" => Ok(TableColor::White),
            _ => Err(DxError::InvalidColor(s.to_string())),
        }
    }
}

/// Whether a category is shown, and in which colour.
///
/// The colour is kept as the caller's raw tag and only validated when a table is rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryStyle {
    pub include: bool,
    pub color: String,
}

impl CategoryStyle {
    pub fn new(include: bool, color: impl Into<String>) -> Self {
        Self {
            include,
            color: color.into(),
        }
    }
}

/// Rendering options for [`render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableOptions {
    pub priority: CategoryStyle,
    pub non_priority: CategoryStyle,
    pub malformed: CategoryStyle,
    pub resolved: CategoryStyle,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// Restrict the table to a single patient.
    pub patient_id: Option<i64>,
    /// Emit ANSI colour codes. Disable for plain-text output.
    pub colorize: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            priority: CategoryStyle::new(true, "red"),
            non_priority: CategoryStyle::new(true, "yellow"),
            malformed: CategoryStyle::new(true, "magenta"),
            resolved: CategoryStyle::new(true, "green"),
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            patient_id: None,
            colorize: true,
        }
    }
}

impl TableOptions {
    fn any_included(&self) -> bool {
        self.priority.include
            || self.non_priority.include
            || self.malformed.include
            || self.resolved.include
    }
}

struct Palette {
    priority: TableColor,
    non_priority: TableColor,
    malformed: TableColor,
    resolved: TableColor,
}

impl Palette {
    fn from_options(options: &TableOptions) -> DxResult<Self> {
        Ok(Self {
            priority: options.priority.color.parse()?,
            non_priority: options.non_priority.color.parse()?,
            malformed: options.malformed.color.parse()?,
            resolved: options.resolved.color.parse()?,
        })
    }
}

/// Builds, sorts and renders `patients` as a table.
///
/// Returns [`NO_DATA_MESSAGE`] when every category is excluded, and an error description
/// when the options cannot be honoured (for example an unknown colour name).
pub fn render(
    patients: &[Patient],
    options: &TableOptions,
    builder: &RecordBuilder<'_>,
) -> String {
    if !options.any_included() {
        return NO_DATA_MESSAGE.to_string();
    }

    match try_render(patients, options, builder) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!("table rendering failed: {}", e);
            format!("{RENDER_FAILURE_PREFIX}: {e}")
        }
    }
}

fn try_render(
    patients: &[Patient],
    options: &TableOptions,
    builder: &RecordBuilder<'_>,
) -> DxResult<String> {
    // Validate colours before any lookups are spent.
    let palette = Palette::from_options(options)?;

    let mut records = builder.build_all(patients);
    sort_records(&mut records, options.sort_field, options.sort_order);
    if let Some(id) = options.patient_id {
        records.retain(|r| r.patient_id == id);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(TABLE_HEADERS.to_vec());

    for record in &records {
        let (codes, descriptions) = row_cells(record, options, &palette);
        table.add_row(vec![record.patient_id.to_string(), codes, descriptions]);
    }

    Ok(table.to_string())
}

fn row_cells(
    record: &PatientRecord,
    options: &TableOptions,
    palette: &Palette,
) -> (String, String) {
    let mut codes: Vec<String> = Vec::new();
    let mut descriptions: Vec<String> = Vec::new();
    let mut push = |code: String, description: &str, color: TableColor| {
        codes.push(paint(&code, color, options.colorize));
        descriptions.push(paint(description, color, options.colorize));
    };

    if options.priority.include {
        for d in record.diagnoses.iter().filter(|d| record.is_priority(&d.description)) {
            push(d.code.to_string(), d.description.as_str(), palette.priority);
        }
    }

    // With the priority category off, priority diagnoses fall through to non-priority.
    if options.non_priority.include {
        let hoisted =
            |d: &Diagnosis| options.priority.include && record.is_priority(&d.description);
        for d in record.diagnoses.iter().filter(|d| !hoisted(*d)) {
            push(d.code.to_string(), d.description.as_str(), palette.non_priority);
        }
    }

    if options.malformed.include {
        for code in &record.malformed_diagnoses {
            push(code.to_string(), UNAVAILABLE_DESCRIPTION, palette.malformed);
        }
    }

    if options.resolved.include {
        for r in &record.resolved_diagnoses {
            let description = r
                .description
                .as_ref()
                .map_or(UNAVAILABLE_DESCRIPTION, |d| d.as_str());
            push(r.code.to_string(), description, palette.resolved);
        }
    }

    (codes.join("\n"), descriptions.join("\n"))
}

fn paint(text: &str, color: TableColor, colorize: bool) -> String {
    if colorize {
        text.color(color.to_colored()).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::PriorityKeywords;
    use crate::lookup::tests_support::{reference_lookup, CountingLookup};
    use rstest::rstest;

    fn sample() -> Vec<Patient> {
        vec![
            Patient::new(0, vec!["I10".into(), "K21.9".into()]),
            Patient::new(
                1,
                vec!["E78.5".into(), "ABC.123".into(), "U07.1".into(), "J96.00".into()],
            ),
            Patient::new(2, vec![]),
            Patient::new(4, vec!["I10".into()]).with_resolved(vec!["E66.9".into()]),
        ]
    }

    fn plain() -> TableOptions {
        TableOptions {
            colorize: false,
            ..TableOptions::default()
        }
    }

    fn render_plain(patients: &[Patient], options: &TableOptions) -> String {
        let lookup = reference_lookup();
        let keywords = PriorityKeywords::default();
        render(patients, options, &RecordBuilder::new(&lookup, &keywords))
    }

    fn line_index(table: &str, needle: &str) -> usize {
        table
            .lines()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("'{needle}' not in table:\n{table}"))
    }

    #[rstest]
    #[case("red", TableColor::Red)]
    #[case(" Light_Blue ", TableColor::LightBlue)]
    #[case("grey", TableColor::Grey)]
    #[case("dark_gray", TableColor::DarkGrey)]
    fn parses_known_colors(#[case] tag: &str, #[case] expected: TableColor) {
        assert_eq!(tag.parse::<TableColor>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_color() {
        let err = "scsdv".parse::<TableColor>().expect_err("unknown");
        assert!(matches!(err, DxError::InvalidColor(ref c) if c == "scsdv"));
    }

    #[test]
    fn all_categories_off_returns_fixed_message() {
        let lookup = CountingLookup::new(reference_lookup());
        let keywords = PriorityKeywords::default();
        let options = TableOptions {
            priority: CategoryStyle::new(false, "red"),
            non_priority: CategoryStyle::new(false, "yellow"),
            malformed: CategoryStyle::new(false, "magenta"),
            resolved: CategoryStyle::new(false, "green"),
            ..plain()
        };

        let out = render(&sample(), &options, &RecordBuilder::new(&lookup, &keywords));
        assert_eq!(out, NO_DATA_MESSAGE);
        assert_eq!(lookup.calls(), 0);
    }

    #[test]
    fn invalid_color_returns_error_string_without_lookups() {
        let lookup = CountingLookup::new(reference_lookup());
        let keywords = PriorityKeywords::default();
        let options = TableOptions {
            malformed: CategoryStyle::new(true, "scsdv"),
            ..plain()
        };

        let out = render(&sample(), &options, &RecordBuilder::new(&lookup, &keywords));
        assert_eq!(out, "Input data formatted incorrectly: unsupported color 'scsdv'");
        assert_eq!(lookup.calls(), 0);
    }

    #[test]
    fn renders_header_and_category_order() {
        let table = render_plain(&sample(), &plain());

        let header = line_index(&table, "Patient ID");
        assert!(table.lines().nth(header).unwrap().contains("ICD-10 Codes"));
        assert!(table.lines().nth(header).unwrap().contains("Diagnoses"));

        // Patient 1: priority first, then non-priority, then malformed.
        let covid = line_index(&table, "U07.1");
        let resp = line_index(&table, "J96.00");
        let lipid = line_index(&table, "E78.5");
        let malformed = line_index(&table, "ABC.123");
        assert!(covid < resp && resp < lipid && lipid < malformed);
        assert!(table.lines().nth(malformed).unwrap().contains(UNAVAILABLE_DESCRIPTION));
    }

    #[test]
    fn sorted_by_priority_count_descending_by_default() {
        let table = render_plain(&sample(), &plain());
        // Patient 1 has two priority diagnoses and must come before patient 0.
        assert!(line_index(&table, "E78.5") < line_index(&table, "K21.9"));
    }

    #[test]
    fn excluded_categories_are_omitted() {
        let options = TableOptions {
            priority: CategoryStyle::new(false, "red"),
            non_priority: CategoryStyle::new(false, "yellow"),
            ..plain()
        };
        let table = render_plain(&sample(), &options);

        assert!(!table.contains("U07.1"));
        assert!(!table.contains("I10"));
        assert!(table.contains("ABC.123"));
        assert!(table.contains("E66.9"));
        assert!(table.contains("Obesity, unspecified"));
    }

    #[test]
    fn priority_off_shows_priority_diagnoses_as_non_priority() {
        let patients = vec![Patient::new(3, vec!["U07.1".into(), "N18.30".into()])];
        let options = TableOptions {
            priority: CategoryStyle::new(false, "red"),
            ..plain()
        };
        let table = render_plain(&patients, &options);

        assert!(table.contains("U07.1"));
        assert!(table.contains("COVID-19"));
        // Input order once priority rows are no longer hoisted.
        assert!(line_index(&table, "U07.1") < line_index(&table, "N18.30"));
    }

    #[test]
    fn unresolvable_resolved_code_uses_placeholder() {
        let patients = vec![Patient::new(8, vec![]).with_resolved(vec!["ZZZ.9".into()])];
        let table = render_plain(&patients, &plain());
        let line = line_index(&table, "ZZZ.9");
        assert!(table.lines().nth(line).unwrap().contains(UNAVAILABLE_DESCRIPTION));
    }

    #[test]
    fn single_patient_filter() {
        let options = TableOptions {
            patient_id: Some(4),
            ..plain()
        };
        let table = render_plain(&sample(), &options);

        assert!(table.contains("E66.9"));
        assert!(!table.contains("U07.1"));
        assert!(!table.contains("K21.9"));
    }

    #[test]
    fn filter_on_unknown_patient_renders_header_only() {
        let options = TableOptions {
            patient_id: Some(99),
            ..plain()
        };
        let table = render_plain(&sample(), &options);
        assert!(table.contains("Patient ID"));
        assert!(!table.contains("I10"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let table = render_plain(&sample(), &plain());
        assert!(!table.contains('\u{1b}'));
    }
}
