//! CSV decoding into [`ImportRecord`]s.
//!
//! Carriage returns are removed and the text is split on line feeds; each
//! line is one row, and blank lines are skipped. Fields within a line follow
//! CSV quoting. Columns are matched by header name; their order does not
//! matter and unknown columns are ignored. Every header and value is trimmed,
//! a leading UTF-8 BOM is dropped and short rows are padded with empty values.

use csv::{ReaderBuilder, StringRecord, Trim};

use super::ImportError;

/// UTF-8 byte order mark.
const BOM: char = '\u{feff}';

/// One data row of an import file. Absent values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRecord {
    /// 1-based line number in the source file.
    pub line: u64,
    pub customer_name: String,
    pub customer_notes: String,
    pub site_name: String,
    pub site_general_info: String,
    pub order_part: String,
    pub order_number: String,
    pub order_status: String,
    pub order_creation_date: String,
    pub order_assigned_user: String,
    pub order_notes: String,
    pub user_role: String,
}

/// Recognized header names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    CustomerName,
    CustomerNotes,
    SiteName,
    SiteGeneralInfo,
    OrderPart,
    OrderNumber,
    OrderStatus,
    OrderCreationDate,
    OrderAssignedUser,
    OrderNotes,
    UserRole,
}

impl Column {
    fn from_header(header: &str) -> Option<Self> {
        match header {
            "CustomerName" => Some(Self::CustomerName),
            "CustomerNotes" => Some(Self::CustomerNotes),
            "SiteName" => Some(Self::SiteName),
            "SiteGeneralInfo" => Some(Self::SiteGeneralInfo),
            "OrderPart" => Some(Self::OrderPart),
            "OrderNumber" => Some(Self::OrderNumber),
            "OrderStatus" => Some(Self::OrderStatus),
            "OrderCreationDate" => Some(Self::OrderCreationDate),
            "OrderAssignedUser" => Some(Self::OrderAssignedUser),
            "OrderNotes" => Some(Self::OrderNotes),
            "UserRole" => Some(Self::UserRole),
            _ => None,
        }
    }
}

impl ImportRecord {
    fn field_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::CustomerName => &mut self.customer_name,
            Column::CustomerNotes => &mut self.customer_notes,
            Column::SiteName => &mut self.site_name,
            Column::SiteGeneralInfo => &mut self.site_general_info,
            Column::OrderPart => &mut self.order_part,
            Column::OrderNumber => &mut self.order_number,
            Column::OrderStatus => &mut self.order_status,
            Column::OrderCreationDate => &mut self.order_creation_date,
            Column::OrderAssignedUser => &mut self.order_assigned_user,
            Column::OrderNotes => &mut self.order_notes,
            Column::UserRole => &mut self.user_role,
        }
    }
}

/// Decode an import file.
///
/// # Errors
///
/// Returns `ImportError::EmptyFile` if there is no header or no data row,
/// and `ImportError::Malformed` if the CSV reader rejects a line.
pub fn parse_records(text: &str) -> Result<Vec<ImportRecord>, ImportError> {
    let text = text.strip_prefix(BOM).unwrap_or(text).replace('\r', "");

    let mut columns: Option<Vec<Option<Column>>> = None;
    let mut records = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        let Some(row) = parse_line(line)? else {
            continue;
        };

        match &columns {
            None => {
                columns = Some(
                    row.iter()
                        .map(|header| Column::from_header(header.trim_start_matches(BOM)))
                        .collect(),
                );
            }
            Some(columns) => {
                let line_number = u64::try_from(index + 1).unwrap_or(u64::MAX);
                records.push(to_record(columns, &row, line_number));
            }
        }
    }

    if records.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    Ok(records)
}

/// Split one line into fields. Blank lines yield `None`.
fn parse_line(line: &str) -> Result<Option<StringRecord>, csv::Error> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let row = reader.records().next().transpose()?;
    Ok(row.filter(|row| !is_blank(row)))
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(str::is_empty)
}

fn to_record(columns: &[Option<Column>], row: &StringRecord, line: u64) -> ImportRecord {
    let mut record = ImportRecord {
        line,
        ..ImportRecord::default()
    };

    for (index, column) in columns.iter().enumerate() {
        let Some(column) = column else {
            continue;
        };
        // Missing trailing fields stay empty.
        if let Some(value) = row.get(index) {
            value.clone_into(record.field_mut(*column));
        }
    }

    record
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_field_with_comma_and_escaped_quote() {
        let records = parse_records("CustomerName,CustomerNotes\nACME,\"a,b\"\"c\"\n").unwrap();
        assert_eq!(records[0].customer_notes, "a,b\"c");
    }

    #[test]
    fn test_bom_crlf_and_trimming() {
        let text = "\u{feff} CustomerName , SiteName \r\n  Vinci  ,  Lyon \r\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].customer_name, "Vinci");
        assert_eq!(records[0].site_name, "Lyon");
    }

    #[test]
    fn test_columns_resolved_by_name() {
        let text = "Ignored,SiteName,CustomerName\nx,Nantes,Eiffage\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records[0].customer_name, "Eiffage");
        assert_eq!(records[0].site_name, "Nantes");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let text = "CustomerName,SiteName,OrderNumber\nVinci\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records[0].customer_name, "Vinci");
        assert_eq!(records[0].site_name, "");
        assert_eq!(records[0].order_number, "");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "CustomerName\nVinci\n\n   \nEiffage\n";
        let records = parse_records(text).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Vinci", "Eiffage"]);
        assert_eq!(records[1].line, 5);
    }

    #[test]
    fn test_bare_carriage_return_is_removed() {
        let records = parse_records("CustomerName,CustomerNotes\nVinci,ab\rcd\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].customer_name, "Vinci");
        assert_eq!(records[0].customer_notes, "abcd");
    }

    #[test]
    fn test_unbalanced_quote_stays_on_its_line() {
        let text = "CustomerName,CustomerNotes\nVinci,\"Porte 90\nEiffage,x\nBouygues,y\n";
        let records = parse_records(text).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Vinci", "Eiffage", "Bouygues"]);
        assert_eq!(records[0].customer_notes, "Porte 90");
        assert_eq!(records[2].customer_notes, "y");
        assert_eq!(records[2].line, 4);
    }

    #[test]
    fn test_leading_blank_lines_before_header() {
        let records = parse_records("\n  \nCustomerName\nVinci\n").unwrap();
        assert_eq!(records[0].customer_name, "Vinci");
        assert_eq!(records[0].line, 4);
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        assert!(matches!(parse_records(""), Err(ImportError::EmptyFile)));
        assert!(matches!(parse_records("\u{feff}\n  \n"), Err(ImportError::EmptyFile)));
        assert!(matches!(
            parse_records("CustomerName,SiteName\n"),
            Err(ImportError::EmptyFile)
        ));
    }
}
