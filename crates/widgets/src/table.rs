//! Client-side table filtering and sorting.
//!
//! Both helpers bind to a `<table>` by id once and then react to input or
//! header clicks. Rows are the `<tr>` children of the table's `<tbody>`.

use std::cmp::Ordering;

use thiserror::Error;
use tracing::trace;
use voltbill_dom::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("element #{0} not found")]
    NotFound(String),
    #[error("no sortable header at index {0}")]
    NoSuchHeader(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchSummary {
    pub visible: usize,
    pub hidden: usize,
}

/// 表格搜尋。 / Hides rows whose targeted cells do not contain the search term.
#[derive(Debug, Clone)]
pub struct TableSearch {
    table: NodeId,
    input: NodeId,
    columns: Vec<usize>,
}

impl TableSearch {
    /// An empty `columns` list searches every cell.
    pub fn attach(
        doc: &Document,
        table_id: &str,
        input_id: &str,
        columns: Vec<usize>,
    ) -> Result<Self, TableError> {
        let table = doc
            .element_by_id(table_id)
            .ok_or_else(|| TableError::NotFound(table_id.to_string()))?;
        let input = doc
            .element_by_id(input_id)
            .ok_or_else(|| TableError::NotFound(input_id.to_string()))?;
        Ok(Self {
            table,
            input,
            columns,
        })
    }

    /// 處理輸入事件。 / Handles an input event carrying the field's new value.
    pub fn on_input(&self, doc: &mut Document, value: &str) -> SearchSummary {
        doc.set_attr(self.input, "value", value);
        let term = value.trim().to_lowercase();
        let mut summary = SearchSummary::default();

        for row in body_rows(doc, self.table) {
            let cells = row_cells(doc, row, &["td"]);
            let targeted: Vec<NodeId> = if self.columns.is_empty() {
                cells
            } else {
                self.columns
                    .iter()
                    .filter_map(|index| cells.get(*index).copied())
                    .collect()
            };
            let matched = targeted
                .iter()
                .any(|cell| doc.text_content(*cell).to_lowercase().contains(&term));
            if matched {
                doc.set_style(row, "display", "");
                summary.visible += 1;
            } else {
                doc.set_style(row, "display", "none");
                summary.hidden += 1;
            }
        }
        trace!(term = %term, visible = summary.visible, hidden = summary.hidden, "table filtered");
        summary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn class(self) -> &'static str {
        match self {
            SortDirection::Ascending => "sort-asc",
            SortDirection::Descending => "sort-desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOutcome {
    pub column: usize,
    pub direction: SortDirection,
}

/// 表格排序。 / Sorts rows when a `th[data-sortable]` header is clicked.
#[derive(Debug, Clone)]
pub struct TableSort {
    table: NodeId,
    headers: Vec<NodeId>,
}

impl TableSort {
    pub fn attach(doc: &mut Document, table_id: &str) -> Result<Self, TableError> {
        let table = doc
            .element_by_id(table_id)
            .ok_or_else(|| TableError::NotFound(table_id.to_string()))?;
        let headers: Vec<NodeId> = doc
            .find_tag_in(table, "th")
            .into_iter()
            .filter(|header| doc.has_attr(*header, "data-sortable"))
            .collect();
        for header in &headers {
            doc.set_style(*header, "cursor", "pointer");
            doc.set_style(*header, "user-select", "none");
        }
        Ok(Self { table, headers })
    }

    pub fn headers(&self) -> &[NodeId] {
        &self.headers
    }

    /// 點擊第 `index` 個可排序標題。 / Clicks the `index`-th sortable header.
    ///
    /// The position among sortable headers doubles as the cell index that
    /// gets compared.
    pub fn click(&self, doc: &mut Document, index: usize) -> Result<SortOutcome, TableError> {
        let header = *self
            .headers
            .get(index)
            .ok_or(TableError::NoSuchHeader(index))?;
        let direction = if doc.has_class(header, SortDirection::Ascending.class()) {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        for other in &self.headers {
            doc.remove_class(*other, SortDirection::Ascending.class());
            doc.remove_class(*other, SortDirection::Descending.class());
        }
        doc.add_class(header, direction.class());

        let Some(tbody) = tbody(doc, self.table) else {
            return Ok(SortOutcome {
                column: index,
                direction,
            });
        };
        let mut keyed: Vec<(String, NodeId)> = body_rows(doc, self.table)
            .into_iter()
            .map(|row| {
                let text = row_cells(doc, row, &["td", "th"])
                    .get(index)
                    .map(|cell| doc.text_content(*cell).trim().to_string())
                    .unwrap_or_default();
                (text, row)
            })
            .collect();
        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = compare_cells(a, b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        for (_, row) in keyed {
            doc.append_child(tbody, row);
        }

        Ok(SortOutcome {
            column: index,
            direction,
        })
    }
}

/// 兩者皆可解析為數字時以數值比較，否則以字串比較。 / Numeric when both sides parse, lexicographic otherwise.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Strips everything but digits, `.` and `-`, then reads the longest float prefix.
pub fn numeric_value(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    let bytes = cleaned.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if frac_end > frac_start || digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    cleaned[..end].trim_end_matches('.').parse().ok()
}

fn tbody(doc: &Document, table: NodeId) -> Option<NodeId> {
    doc.find_tag_in(table, "tbody").first().copied()
}

fn body_rows(doc: &Document, table: NodeId) -> Vec<NodeId> {
    match tbody(doc, table) {
        Some(tbody) => doc
            .element_children(tbody)
            .into_iter()
            .filter(|row| doc.tag(*row) == Some("tr"))
            .collect(),
        None => Vec::new(),
    }
}

fn row_cells(doc: &Document, row: NodeId, tags: &[&str]) -> Vec<NodeId> {
    doc.element_children(row)
        .into_iter()
        .filter(|cell| doc.tag(*cell).is_some_and(|tag| tags.contains(&tag)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_value_follows_parse_float_prefix_rules() {
        assert_eq!(numeric_value("₹1,234.50"), Some(1234.5));
        assert_eq!(numeric_value("-12 kWh"), Some(-12.0));
        assert_eq!(numeric_value("1.2.3"), Some(1.2));
        assert_eq!(numeric_value(".5"), Some(0.5));
        assert_eq!(numeric_value("5-3"), Some(5.0));
        assert_eq!(numeric_value("Tier"), None);
        assert_eq!(numeric_value("-"), None);
        assert_eq!(numeric_value("."), None);
    }

    #[test]
    fn cells_compare_numerically_only_when_both_parse() {
        assert_eq!(compare_cells("10", "9"), Ordering::Greater);
        assert_eq!(compare_cells("Tier 10", "Tier 9"), Ordering::Greater);
        assert_eq!(compare_cells("abc", "5"), Ordering::Greater);
    }
}
