//! Non-interactive renderings of the table: HTML `<tbody>` rows and an
//! aligned plain-text listing.

use std::fmt::Write as _;

use hearth_core::{Field, Record};

use crate::controller::Table;

/// Escape text for use in HTML element content and quoted attributes.
fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}

fn html_row(out: &mut String, record: &Record) {
  let id = escape(record.id.as_str());
  out.push_str("<tr>\n");
  for field in Field::all() {
    let _ = writeln!(
      out,
      "  <td id=\"{}\">{}</td>",
      escape(&record.cell_id(field)),
      escape(record.get(field)),
    );
  }
  out.push_str("  <td class=\"text-end\">\n");
  let _ = writeln!(
    out,
    "    <button class=\"btn btn-danger btn-sm\" data-action=\"delete\" data-id=\"{id}\">Delete</button>"
  );
  let _ = writeln!(
    out,
    "    <button class=\"btn btn-primary btn-sm\" data-action=\"edit\" data-id=\"{id}\">Edit</button>"
  );
  out.push_str("  </td>\n</tr>\n");
}

/// `<tbody>` contents: one `<tr>` per row in display order, each cell
/// addressable as `{id}-{field}`.
pub fn html_rows(table: &Table) -> String {
  let mut out = String::new();
  for record in table.rows() {
    html_row(&mut out, record);
  }
  out
}

/// Column-aligned listing with a header line, rows in display order.
pub fn text_table(table: &Table) -> String {
  let mut headers = vec!["Id"];
  headers.extend(Field::all().map(Field::label));

  let rows: Vec<Vec<&str>> = table
    .rows()
    .map(|r| {
      let mut cells = vec![r.id.as_str()];
      cells.extend(Field::all().map(|f| r.get(f)));
      cells
    })
    .collect();

  let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
  for row in &rows {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  for line in std::iter::once(&headers).chain(rows.iter()) {
    let cells: Vec<String> = line
      .iter()
      .zip(&widths)
      .map(|(cell, &w)| format!("{cell:<w$}"))
      .collect();
    let _ = writeln!(out, "{}", cells.join("  ").trim_end());
  }
  out
}

#[cfg(test)]
mod tests {
  use hearth_core::{RecordFields, RecordId};

  use super::*;

  fn table() -> Table {
    let mut t = Table::default();
    t.replace(vec![
      RecordFields {
        first_name:   "Ann".into(),
        last_name:    "Doe".into(),
        age:          "30".into(),
        relationship: "Sister".into(),
      }
      .with_id(RecordId::new("1")),
      RecordFields {
        first_name:   "<Ben>".into(),
        last_name:    "O'Doe".into(),
        age:          "7".into(),
        relationship: "Son & heir".into(),
      }
      .with_id(RecordId::new("2")),
    ]);
    t
  }

  #[test]
  fn html_rows_are_addressable_and_reversed() {
    let html = html_rows(&table());
    let ben = html.find("id=\"2-firstName\"").unwrap();
    let ann = html.find("id=\"1-firstName\"").unwrap();
    assert!(ben < ann, "last fetched row renders first");
    assert!(html.contains("<td id=\"1-relationship\">Sister</td>"));
    assert!(html.contains("<td id=\"2-age\">7</td>"));
    assert_eq!(html.matches("<tr>").count(), 2);
    assert!(html.contains("data-action=\"edit\" data-id=\"1\""));
  }

  #[test]
  fn html_escapes_field_text() {
    let html = html_rows(&table());
    assert!(html.contains("<td id=\"2-firstName\">&lt;Ben&gt;</td>"));
    assert!(html.contains("O&#39;Doe"));
    assert!(html.contains("Son &amp; heir"));
  }

  #[test]
  fn empty_table_renders_nothing() {
    assert_eq!(html_rows(&Table::default()), "");
    assert_eq!(text_table(&Table::default()), "Id  First Name  Last Name  Age  Relationship\n");
  }

  #[test]
  fn text_table_aligns_columns() {
    let text = text_table(&table());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Id  First Name  Last Name  Age  Relationship");
    assert_eq!(lines[1], "2   <Ben>       O'Doe      7    Son & heir");
    assert_eq!(lines[2], "1   Ann         Doe        30   Sister");
  }
}
