//! Spreadsheet decoding (xlsx, xls, ods via `calamine`) and the downloadable
//! import template (via `rust_xlsxwriter`).

use std::{collections::HashMap, io::Cursor};

use calamine::{Data, Reader as _, open_workbook_auto_from_rs};
use rust_xlsxwriter::{Format, Workbook};

use crate::{
  Error, Result, headers,
  row::{Cell, RawRow},
};

/// Which worksheet to read and where its header row sits.
#[derive(Debug, Clone, Default)]
pub struct SheetOptions {
  /// Defaults to the first worksheet.
  pub sheet_name: Option<String>,
  /// Rows above the header row.
  pub skip_rows:  usize,
}

/// One decoded worksheet.
#[derive(Debug, Clone)]
pub struct Sheet {
  pub name:    String,
  /// Distinct, non-blank column headers in column order.
  pub headers: Vec<String>,
  pub rows:    Vec<RawRow>,
}

/// Decode a workbook held in memory.
///
/// Blank rows are dropped, empty cells are left out of their row, columns
/// with a blank header are ignored, and repeated headers are suffixed `_1`,
/// `_2`, … so that no cell is lost.
pub fn decode_workbook(bytes: &[u8], options: &SheetOptions) -> Result<Sheet> {
  let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

  let available = workbook.sheet_names();
  let name = match &options.sheet_name {
    Some(wanted) => available
      .iter()
      .find(|n| *n == wanted)
      .cloned()
      .ok_or_else(|| Error::SheetNotFound {
        name:      wanted.clone(),
        available: available.clone(),
      })?,
    None => available.first().cloned().ok_or(Error::NoWorksheets)?,
  };

  let range = workbook.worksheet_range(&name)?;

  // The range starts at the first used cell, not at A1.
  let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
  let mut rows = range
    .rows()
    .skip(options.skip_rows.saturating_sub(first_row));

  let Some(header_cells) = rows.next() else {
    tracing::debug!(sheet = %name, "worksheet is empty");
    return Ok(Sheet { name, headers: Vec::new(), rows: Vec::new() });
  };
  let columns = header_names(header_cells);
  let headers = columns.iter().flatten().cloned().collect();

  let rows = rows
    .filter_map(|cells| {
      let mut row = RawRow::new();
      for (header, data) in columns.iter().zip(cells) {
        if let Some(header) = header
          && let Some(cell) = cell_of(data)
        {
          row.push(header.clone(), cell);
        }
      }
      (!row.is_empty()).then_some(row)
    })
    .collect::<Vec<_>>();

  tracing::debug!(sheet = %name, rows = rows.len(), "decoded worksheet");
  Ok(Sheet { name, headers, rows })
}

/// Header text per column; `None` for blank headers.
fn header_names(cells: &[Data]) -> Vec<Option<String>> {
  let mut seen: HashMap<String, usize> = HashMap::new();
  cells
    .iter()
    .map(|data| {
      let text = cell_of(data)?.to_text();
      if text.is_empty() {
        return None;
      }
      let count = seen.entry(text.clone()).or_insert(0);
      let name = if *count == 0 { text } else { format!("{text}_{count}") };
      *count += 1;
      Some(name)
    })
    .collect()
}

fn cell_of(data: &Data) -> Option<Cell> {
  let cell = match data {
    Data::Empty | Data::Error(_) => return None,
    Data::Int(n) => Cell::Number(*n as f64),
    Data::Float(n) => Cell::Number(*n),
    Data::String(s) => Cell::Text(s.clone()),
    other => Cell::Text(other.to_string()),
  };
  (!cell.to_text().is_empty()).then_some(cell)
}

// ─── Template ────────────────────────────────────────────────────────────────

enum Example {
  Text(&'static str),
  Number(f64),
}

use Example::{Number as N, Text as T};

const EXAMPLE_ROWS: [[Example; 25]; 2] = [
  [
    T("Aarav Patel"),
    T("Computer Science & Engineering"),
    T("2022-26"),
    N(7.0),
    T("AI/ML"),
    N(9.1),
    T("aarav.patel@student.gls.edu.in"),
    T("+91 9123456789"),
    T("Python, TensorFlow, Machine Learning, React"),
    T("Batch Topper | Hackathon Winner"),
    T("Highest CGPA in the 2022-26 batch | First place at Smart India Hackathon"),
    T("AI/ML, High CGPA, Hackathon Winner"),
    T("https://drive.google.com/file/d/sample-resume/view"),
    T("https://randomuser.me/api/portraits/men/32.jpg"),
    T("Startup X"),
    T("Web Dev Intern"),
    T("Jun 2024 - Aug 2024"),
    T("Built customer-facing UI and improved checkout conversion by 12%"),
    T("Gujarati TTS System"),
    T("Rule-based Gujarati text-to-speech engine deployed as a serverless API"),
    T("Machine Learning, Python, AWS Lambda"),
    T("https://github.com/aarav/gujarati-tts"),
    T("AWS Cloud Practitioner"),
    T("Amazon"),
    N(2024.0),
  ],
  [
    T("Priya Sharma"),
    T("Cyber"),
    T("2021-25"),
    N(8.0),
    T("Cybersecurity"),
    N(8.7),
    T("priya.sharma@student.gls.edu.in"),
    T("+91 9876543210"),
    T("Ethical Hacking, Networking, Python, Cryptography"),
    T("CTF Finalist"),
    T("Finalist at the national capture-the-flag contest"),
    T("Cybersecurity, Research"),
    T("https://drive.google.com/file/d/sample-resume-2/view"),
    T("https://randomuser.me/api/portraits/women/44.jpg"),
    T("SecureNet Solutions | CERT-In"),
    T("Security Analyst Intern | Research Intern"),
    T("Jan 2024 - May 2024 | Jun 2024 - Jul 2024"),
    T("Vulnerability assessments and penetration testing | Malware triage"),
    T("Network Vulnerability Scanner"),
    T("Custom tool for automated network security assessment"),
    T("Python, Nmap, Scapy"),
    T("https://github.com/priya/vuln-scanner"),
    T("Certified Ethical Hacker (CEH)"),
    T("EC-Council"),
    N(2024.0),
  ],
];

/// The import template: a `Students` sheet with a bold, frozen header row
/// and two example rows.
pub fn template_workbook() -> Result<Vec<u8>> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name("Students")?;

  let bold = Format::new().set_bold();
  for (col, header) in headers::TEMPLATE.iter().enumerate() {
    let col = col as u16;
    sheet.write_string_with_format(0, col, *header, &bold)?;
    sheet.set_column_width(col, header.len().max(15) as f64)?;
  }

  for (i, example) in EXAMPLE_ROWS.iter().enumerate() {
    let row = i as u32 + 1;
    for (col, value) in example.iter().enumerate() {
      match value {
        Example::Text(s) => sheet.write_string(row, col as u16, *s)?,
        Example::Number(n) => sheet.write_number(row, col as u16, *n)?,
      };
    }
  }

  sheet.set_freeze_panes(1, 0)?;
  Ok(workbook.save_to_buffer()?)
}
