use proptest::prelude::*;
use voltbill_dom::Document;
use voltbill_widgets::{SortDirection, TableSearch, TableSort};

const USAGE_TABLE: &str = r#"<html><head><title>Usage</title></head><body>
<input id="search" type="text"/>
<table id="usage">
  <thead><tr><th data-sortable="true">Tier</th><th data-sortable="true">Units</th><th>Note</th></tr></thead>
  <tbody>
    <tr><td>Tier 2</td><td>150</td><td>peak</td></tr>
    <tr><td>Tier 1</td><td>45</td><td>base</td></tr>
    <tr><td>Tier 3</td><td>1,200</td><td>overflow</td></tr>
  </tbody>
</table>
</body></html>"#;

fn first_cells(doc: &Document) -> Vec<String> {
    let tbody = doc.query_tag("tbody")[0];
    doc.element_children(tbody)
        .into_iter()
        .map(|row| doc.text_content(doc.element_children(row)[0]))
        .collect()
}

#[test]
fn search_hides_rows_without_the_term() {
    let mut doc = Document::parse(USAGE_TABLE).expect("fixture parses");
    let search = TableSearch::attach(&doc, "usage", "search", Vec::new()).expect("attach");

    let summary = search.on_input(&mut doc, "  5 ");
    assert_eq!(summary.visible, 2);
    assert_eq!(summary.hidden, 1);

    let rows = doc.element_children(doc.query_tag("tbody")[0]);
    assert_eq!(doc.style(rows[0], "display"), None);
    assert_eq!(doc.style(rows[2], "display"), Some("none"));

    let cleared = search.on_input(&mut doc, "");
    assert_eq!(cleared.hidden, 0);
    assert!(rows.iter().all(|row| doc.style(*row, "display").is_none()));
}

#[test]
fn search_restricted_to_columns_ignores_other_cells() {
    let mut doc = Document::parse(USAGE_TABLE).expect("fixture parses");
    let search = TableSearch::attach(&doc, "usage", "search", vec![0, 9]).expect("attach");
    let summary = search.on_input(&mut doc, "PEAK");
    assert_eq!(summary.visible, 0);
    assert_eq!(summary.hidden, 3);
}

#[test]
fn missing_table_is_reported() {
    let doc = Document::parse(USAGE_TABLE).expect("fixture parses");
    assert!(TableSearch::attach(&doc, "nope", "search", Vec::new()).is_err());
}

#[test]
fn sort_toggles_and_marks_a_single_header() {
    let mut doc = Document::parse(USAGE_TABLE).expect("fixture parses");
    let sort = TableSort::attach(&mut doc, "usage").expect("attach");
    assert_eq!(sort.headers().len(), 2);

    let first = sort.click(&mut doc, 1).expect("units header");
    assert_eq!(first.direction, SortDirection::Ascending);
    assert_eq!(first_cells(&doc), ["Tier 1", "Tier 2", "Tier 3"]);

    let second = sort.click(&mut doc, 1).expect("units header");
    assert_eq!(second.direction, SortDirection::Descending);
    assert_eq!(first_cells(&doc), ["Tier 3", "Tier 2", "Tier 1"]);

    sort.click(&mut doc, 0).expect("tier header");
    let headers = sort.headers();
    assert!(doc.has_class(headers[0], "sort-asc"));
    assert!(!doc.has_class(headers[1], "sort-asc"));
    assert!(!doc.has_class(headers[1], "sort-desc"));
    assert!(sort.click(&mut doc, 5).is_err());
}

proptest! {
    #[test]
    fn visible_rows_always_contain_the_term(term in "[a-z0-9 ]{0,4}") {
        let mut doc = Document::parse(USAGE_TABLE).expect("fixture parses");
        let search = TableSearch::attach(&doc, "usage", "search", Vec::new()).expect("attach");
        let summary = search.on_input(&mut doc, &term);
        prop_assert_eq!(summary.visible + summary.hidden, 3);

        let needle = term.trim().to_lowercase();
        let tbody = doc.query_tag("tbody")[0];
        for row in doc.element_children(tbody) {
            let shown = doc.style(row, "display") != Some("none");
            let text = doc.text_content(row).to_lowercase();
            let any_cell = doc
                .element_children(row)
                .into_iter()
                .any(|cell| doc.text_content(cell).to_lowercase().contains(&needle));
            prop_assert_eq!(shown, any_cell, "row {:?}", text);
        }
    }
}
