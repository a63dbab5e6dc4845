use serde_json::json;

use hwpmaker::exam::context::{build_context_block, parse_html_table, NESTED_TABLE_WIDTH};
use hwpmaker::exam::{ContextEntry, GeneratorOptions, IdSpace, Question};
use hwpmaker::hwpx::Element;

fn entries(value: serde_json::Value) -> Vec<ContextEntry> {
    Question::from_value(0, &json!({ "prompt": "p", "contextEntries": value }))
        .unwrap()
        .context_entries
}

fn outer_rows(block: &Element) -> Vec<&Element> {
    let outer = block.descendants("hp:tbl")[0];
    outer.child_elements().filter(|e| e.name() == "hp:tr").collect()
}

fn build(value: serde_json::Value, merge: bool) -> Element {
    let options = GeneratorOptions {
        merge_context_tables: merge,
        ..GeneratorOptions::default()
    };
    let mut ids = IdSpace::new(1, 1);
    build_context_block(&entries(value), &options, &mut ids).unwrap()
}

#[test]
fn test_text_then_table_merges_into_one_row() {
    let input = json!([
        { "label": "자료", "text": "다음 표를 보라." },
        { "headers": ["a", "b"], "rows": [["1", "2"]] },
        "마지막 줄"
    ]);

    let merged = build(input.clone(), true);
    let rows = outer_rows(&merged);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].text_content().starts_with("자료 : 다음 표를 보라."));
    assert_eq!(rows[0].descendants("hp:tbl").len(), 1);

    let separate = build(input, false);
    assert_eq!(outer_rows(&separate).len(), 3);
}

#[test]
fn test_row_addresses_contiguous_after_skips() {
    let block = build(
        json!([
            "첫째",
            { "label": "", "text": "" },
            null,
            { "text": "셋째" }
        ]),
        true,
    );
    let rows = outer_rows(&block);
    assert_eq!(rows.len(), 2);
    let addrs: Vec<u64> = block
        .descendants("hp:cellAddr")
        .iter()
        .filter_map(|a| a.attr_u64("rowAddr"))
        .collect();
    assert_eq!(addrs, vec![0, 1]);
    let tbl = block.descendants("hp:tbl")[0];
    assert_eq!(tbl.get_attr("rowCnt"), Some("2"));
}

#[test]
fn test_object_rows_follow_header_keys() {
    let block = build(
        json!([{
            "type": "table",
            "headers": [{ "label": "이름", "key": "name" }, { "label": "점수", "key": "score" }],
            "rows": [{ "score": 90, "name": "가" }, { "name": "나" }]
        }]),
        true,
    );
    let nested = block.descendants("hp:tbl")[1];
    let cells: Vec<String> = nested
        .descendants("hp:tc")
        .iter()
        .map(|c| c.text_content())
        .collect();
    assert_eq!(cells, vec!["이름", "점수", "가", "90", "나", ""]);
}

#[test]
fn test_nested_table_width_and_columns() {
    let block = build(
        json!([{ "table": { "headers": ["짧음", "아주 긴 머리글 텍스트"], "rows": [["a"]] } }]),
        true,
    );
    let nested = block.descendants("hp:tbl")[1];
    assert_eq!(nested.get_attr("colCnt"), Some("2"));
    let sz = nested.first_child("hp:sz").unwrap();
    assert_eq!(sz.attr_u64("width"), Some(u64::from(NESTED_TABLE_WIDTH)));

    let header_widths: Vec<u64> = nested.descendants("hp:tr")[0]
        .descendants("hp:cellSz")
        .iter()
        .filter_map(|s| s.attr_u64("width"))
        .collect();
    assert_eq!(header_widths.iter().sum::<u64>(), u64::from(NESTED_TABLE_WIDTH));
    assert!(header_widths[1] > header_widths[0]);
}

#[test]
fn test_html_table_spans() {
    let html = r#"<table>
        <tr><th>구분</th><th>1분기</th><th>2분기</th></tr>
        <tr><td rowspan="2">매출</td><td>10</td><td>12</td></tr>
        <tr><td colspan="2">합계 22</td></tr>
    </table>"#;

    let (headers, grid) = parse_html_table(html).unwrap();
    assert_eq!(
        headers,
        Some(vec!["구분".to_string(), "1분기".to_string(), "2분기".to_string()])
    );
    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.col_count(), 3);
    assert!(grid.is_covered(1, 0));
    assert_eq!(grid.get_cell_span(1, 1).col_span, 2);

    let block = build(json!([{ "label": "자료 2", "html": html }]), true);
    let nested = block.descendants("hp:tbl")[1];
    // 머리글 3 + 본문 3 + 병합 셀 1
    assert_eq!(nested.descendants("hp:tc").len(), 7);

    let merged_cell = nested
        .descendants("hp:tc")
        .into_iter()
        .find(|c| c.text_content() == "합계 22")
        .unwrap();
    let span = merged_cell.first_child("hp:cellSpan").unwrap();
    assert_eq!(span.get_attr("colSpan"), Some("2"));
    let addr = merged_cell.first_child("hp:cellAddr").unwrap();
    assert_eq!(addr.get_attr("colAddr"), Some("1"));
    assert_eq!(addr.get_attr("rowAddr"), Some("2"));
}

#[test]
fn test_html_without_table_is_empty_entry() {
    let entries = entries(json!([{ "label": "빈 자료", "html": "<p>표 없음</p>" }]));
    match &entries[0] {
        ContextEntry::Table(table) => assert!(table.is_empty()),
        other => panic!("표 항목이어야 함: {:?}", other),
    }
}

#[test]
fn test_html_rowspan_past_last_row_adds_no_rows() {
    let block = build(
        json!([{ "html": r#"<table><tr><td rowspan="300000">A</td><td>B</td></tr></table>"# }]),
        true,
    );
    let nested = block.descendants("hp:tbl")[1];
    assert_eq!(nested.get_attr("rowCnt"), Some("1"));
    assert_eq!(nested.descendants("hp:tr").len(), 1);
    assert_eq!(nested.descendants("hp:tc").len(), 2);
    let span = nested.descendants("hp:cellSpan")[0];
    assert_eq!(span.get_attr("rowSpan"), Some("1"));
}
