//! The section-delimited backup text format.
//!
//! Serialization writes five sections (`CATEGORIES`, `MENU ITEMS`,
//! `INVENTORY`, `TABLES`, `EXPENSES`); parsing recognizes only the first
//! four. The parser is a line state machine: blank lines are skipped, a line
//! of uppercase letters and spaces selects the section, the first line after
//! a header is the column line and is dropped, and everything else is a CSV
//! row split by a quote-aware tokenizer.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::snapshot::{BackupSnapshot, CategoryRow, InventoryRow, MenuItemRow, TableRow};

const CATEGORY_COLUMNS: &str = "Name,Description";
const MENU_ITEM_COLUMNS: &str = "Name,Description,Price,Category,TaxRate,Available,StockQuantity";
const INVENTORY_COLUMNS: &str = "Name,Quantity,Unit,AlertThreshold,Cost";
const TABLE_COLUMNS: &str = "Name,Capacity,Occupied";
const EXPENSE_COLUMNS: &str = "Description,Amount,Category,Date,Notes";

/// A row the parser refused, with where and why.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub section: String,
    pub line: usize,
    pub reason: String,
}

/// Parse result: the recognized rows plus the rows that were skipped.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub snapshot: BackupSnapshot,
    pub skipped: Vec<SkippedRow>,
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn opt_quote(value: &Option<String>) -> String {
    quote(value.as_deref().unwrap_or(""))
}

fn opt_num<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(T::to_string).unwrap_or_default()
}

pub(crate) fn write_categories_section(out: &mut String, rows: &[CategoryRow]) {
    out.push_str("CATEGORIES\n");
    out.push_str(CATEGORY_COLUMNS);
    out.push('\n');
    for row in rows {
        out.push_str(&format!("{},{}\n", quote(&row.name), opt_quote(&row.description)));
    }
}

pub(crate) fn write_menu_items_section(out: &mut String, rows: &[MenuItemRow]) {
    out.push_str("MENU ITEMS\n");
    out.push_str(MENU_ITEM_COLUMNS);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            quote(&row.name),
            opt_quote(&row.description),
            row.price,
            opt_quote(&row.category_name),
            row.tax_rate,
            row.available,
            opt_num(&row.stock_quantity),
        ));
    }
}

pub(crate) fn write_inventory_section(out: &mut String, rows: &[InventoryRow]) {
    out.push_str("INVENTORY\n");
    out.push_str(INVENTORY_COLUMNS);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            quote(&row.name),
            row.quantity,
            quote(&row.unit),
            opt_num(&row.alert_threshold),
            opt_num(&row.cost),
        ));
    }
}

pub(crate) fn write_tables_section(out: &mut String, rows: &[TableRow]) {
    out.push_str("TABLES\n");
    out.push_str(TABLE_COLUMNS);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{},{},{}\n",
            quote(&row.name),
            opt_num(&row.capacity),
            row.occupied,
        ));
    }
}

pub(crate) fn write_expenses_section(out: &mut String, rows: &[super::snapshot::ExpenseRow]) {
    out.push_str("EXPENSES\n");
    out.push_str(EXPENSE_COLUMNS);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            quote(&row.description),
            row.amount,
            quote(&row.category.to_string()),
            quote(&row.date.to_rfc3339()),
            opt_quote(&row.notes),
        ));
    }
}

/// Renders a snapshot into the backup text format.
pub fn serialize_to_text(snapshot: &BackupSnapshot) -> String {
    let mut out = String::new();
    write_categories_section(&mut out, &snapshot.categories);
    out.push('\n');
    write_menu_items_section(&mut out, &snapshot.menu_items);
    out.push('\n');
    write_inventory_section(&mut out, &snapshot.inventory);
    out.push('\n');
    write_tables_section(&mut out, &snapshot.tables);
    out.push('\n');
    write_expenses_section(&mut out, &snapshot.expenses);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Categories,
    MenuItems,
    Inventory,
    Tables,
    /// A header the parser does not know; its rows are dropped without
    /// complaint. `EXPENSES` lands here too.
    Ignored,
}

fn is_section_header(line: &str) -> bool {
    !line.is_empty()
        && line.chars().any(|c| c.is_ascii_uppercase())
        && line.chars().all(|c| c.is_ascii_uppercase() || c == ' ')
}

fn section_for(header: &str) -> Section {
    match header {
        "CATEGORIES" => Section::Categories,
        "MENU ITEMS" => Section::MenuItems,
        "INVENTORY" => Section::Inventory,
        "TABLES" => Section::Tables,
        _ => Section::Ignored,
    }
}

fn section_name(section: Section) -> &'static str {
    match section {
        Section::None => "(none)",
        Section::Categories => "CATEGORIES",
        Section::MenuItems => "MENU ITEMS",
        Section::Inventory => "INVENTORY",
        Section::Tables => "TABLES",
        Section::Ignored => "(ignored)",
    }
}

/// Splits one CSV line. Fields may be wrapped in double quotes; a doubled
/// quote inside a quoted field is a literal quote.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn field(fields: &[String], index: usize) -> &str {
    fields.get(index).map(String::as_str).unwrap_or("")
}

fn opt_field(fields: &[String], index: usize) -> Option<String> {
    let value = field(fields, index);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn decimal_field(fields: &[String], index: usize) -> Decimal {
    field(fields, index).trim().parse().unwrap_or(Decimal::ZERO)
}

fn opt_decimal_field(fields: &[String], index: usize) -> Option<Decimal> {
    field(fields, index).trim().parse().ok()
}

fn bool_field(fields: &[String], index: usize, default: bool) -> bool {
    match field(fields, index).trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}

/// Parses backup text back into a snapshot.
///
/// Never fails: malformed rows become [`SkippedRow`] entries and unknown
/// sections are ignored wholesale. The returned snapshot's `expenses` is
/// always empty because the parser does not recognize that section.
pub fn parse_text(input: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let mut section = Section::None;
    let mut skip_column_line = false;

    for (index, raw) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if is_section_header(line) {
            section = section_for(line);
            skip_column_line = true;
            if section == Section::Ignored {
                debug!(header = line, "ignoring unknown backup section");
            }
            continue;
        }

        if skip_column_line {
            skip_column_line = false;
            continue;
        }

        if matches!(section, Section::None | Section::Ignored) {
            continue;
        }

        let fields = split_csv_line(line);
        if field(&fields, 0).trim().is_empty() {
            warn!(line = line_number, section = section_name(section), "row skipped");
            outcome.skipped.push(SkippedRow {
                section: section_name(section).to_string(),
                line: line_number,
                reason: "missing name in leading field".to_string(),
            });
            continue;
        }

        match section {
            Section::Categories => outcome.snapshot.categories.push(CategoryRow {
                name: field(&fields, 0).to_string(),
                description: opt_field(&fields, 1),
            }),
            Section::MenuItems => outcome.snapshot.menu_items.push(MenuItemRow {
                name: field(&fields, 0).to_string(),
                description: opt_field(&fields, 1),
                price: decimal_field(&fields, 2),
                category_name: opt_field(&fields, 3),
                tax_rate: decimal_field(&fields, 4),
                available: bool_field(&fields, 5, true),
                stock_quantity: field(&fields, 6).trim().parse().ok(),
            }),
            Section::Inventory => outcome.snapshot.inventory.push(InventoryRow {
                name: field(&fields, 0).to_string(),
                quantity: decimal_field(&fields, 1),
                unit: field(&fields, 2).to_string(),
                alert_threshold: opt_decimal_field(&fields, 3),
                cost: opt_decimal_field(&fields, 4),
            }),
            Section::Tables => outcome.snapshot.tables.push(TableRow {
                name: field(&fields, 0).to_string(),
                capacity: field(&fields, 1).trim().parse().ok(),
                occupied: bool_field(&fields, 2, false),
            }),
            Section::None | Section::Ignored => unreachable!(),
        }
    }

    outcome
}
