//! 지문 블록.
//!
//! 1열짜리 외곽 표 하나에 지문 항목을 한 행씩 넣는다. 자료 표 항목은
//! 행 안의 문단에 중첩 표로 들어간다.

use tracing::{debug, warn};

use super::estimate::{
    apportion_column_widths, estimate_data_table_row_height, estimate_row_height, text_weight,
};
use super::ids::IdSpace;
use super::model::{ContextEntry, DataTable, GeneratorOptions};
use crate::hwpx::paragraph::{empty_text, run, text_run};
use crate::hwpx::{
    paragraph, paragraph_with_runs, Cell, Element, LineSeg, Margin, ParaStyle, Table, TableGrid,
};

pub const CONTEXT_TABLE_WIDTH: u32 = 30611;
const CONTEXT_CELL_MARGIN: u32 = 850;
/// 외곽 셀 여백을 뺀 중첩 표 너비
pub const NESTED_TABLE_WIDTH: u32 = CONTEXT_TABLE_WIDTH - CONTEXT_CELL_MARGIN * 2;

const OUTER_BORDER_FILL: u32 = 7;
const CELL_BORDER_FILL: u32 = 6;
const CONTEXT_Z_ORDER: u32 = 12;
const ROW_PADDING: u32 = 566;
const OUTER_EXTRA_HEIGHT: u32 = 1700;
const NESTED_EXTRA_HEIGHT: u32 = 1415;
const NESTED_OUT_MARGIN: u32 = 566;
const NESTED_IN_MARGIN: Margin = Margin::new(510, 510, 141, 141);
const ROW_TEXT_WIDTH: u32 = 28908;

const HOST_STYLE: ParaStyle = ParaStyle::new(3, 4, 60);
const HOST_TRAILING_CHAR_PR: u32 = 1;
const ROW_STYLE: ParaStyle = ParaStyle::new(44, 0, 53);
const HEADER_CELL_STYLE: ParaStyle = ParaStyle::new(62, 2, 63);
const BODY_CELL_STYLE: ParaStyle = ParaStyle::new(44, 46, 65);

/// 외곽 표 한 행의 내용
#[derive(Debug, Clone, PartialEq)]
pub enum ContextRow<'a> {
    Text(String),
    Table {
        description: String,
        table: &'a DataTable,
    },
}

impl ContextRow<'_> {
    fn has_content(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Table { description, table } => !description.is_empty() || !table.is_empty(),
        }
    }
}

/// 항목을 행으로 바꾼다. `merge`이면 텍스트 바로 뒤의 표를 한 행으로 합친다.
pub fn merge_entries(entries: &[ContextEntry], merge: bool) -> Vec<ContextRow<'_>> {
    let mut rows = Vec::with_capacity(entries.len());
    let mut index = 0;

    while let Some(entry) = entries.get(index) {
        index += 1;
        let row = match entry {
            ContextEntry::Table(table) => ContextRow::Table {
                description: entry.display_text(),
                table,
            },
            ContextEntry::Text(_) => match entries.get(index) {
                Some(next) if merge => match next {
                    ContextEntry::Table(table) => {
                        index += 1;
                        let text_display = entry.display_text();
                        let mut table_display = next.display_text();
                        if table_display == text_display {
                            table_display.clear();
                        }
                        let description = [text_display, table_display]
                            .into_iter()
                            .filter(|s| !s.is_empty())
                            .collect::<Vec<_>>()
                            .join("\n");
                        ContextRow::Table { description, table }
                    }
                    ContextEntry::Text(_) => ContextRow::Text(entry.display_text()),
                },
                _ => ContextRow::Text(entry.display_text()),
            },
        };
        rows.push(row);
    }
    rows
}

/// 지문 블록 문단. 그릴 행이 하나도 없으면 `None`.
pub fn build_context_block(
    entries: &[ContextEntry],
    options: &GeneratorOptions,
    ids: &mut IdSpace,
) -> Option<Element> {
    let rows: Vec<ContextRow<'_>> = merge_entries(entries, options.merge_context_tables)
        .into_iter()
        .filter(ContextRow::has_content)
        .collect();
    if rows.is_empty() {
        return None;
    }

    let paragraph_id = ids.paragraph();
    let table_id = ids.table();

    let last = rows.len() - 1;
    let mut table = Table::new(table_id, 1)
        .z_order(CONTEXT_Z_ORDER)
        .border_fill(OUTER_BORDER_FILL)
        .in_margin(Margin::uniform(CONTEXT_CELL_MARGIN));
    let mut total_height = OUTER_EXTRA_HEIGHT;

    for (index, row) in rows.iter().enumerate() {
        let (paragraphs, height) = build_row(row, index < last, ids);
        total_height += height;
        table.push_row(vec![Cell::new(0, index as u32)
            .size(CONTEXT_TABLE_WIDTH, height)
            .border_fill(CELL_BORDER_FILL)
            .margin(Margin::uniform(CONTEXT_CELL_MARGIN))
            .paragraphs(paragraphs)]);
    }

    debug!(rows = rows.len(), height = total_height, "지문 블록 생성");

    let table = table
        .size(CONTEXT_TABLE_WIDTH, total_height)
        .into_element();
    Some(paragraph_with_runs(
        paragraph_id,
        HOST_STYLE,
        vec![
            run(HOST_STYLE.char_pr).child(table),
            text_run(HOST_TRAILING_CHAR_PR, "", true),
        ],
        &[LineSeg::new()
            .height(total_height)
            .baseline(total_height.saturating_sub(360).max(978))
            .horz(1130, 30558)],
    ))
}

fn row_paragraph(id: u64, text: &str) -> Element {
    paragraph(
        id,
        ROW_STYLE,
        text,
        LineSeg::new().width(ROW_TEXT_WIDTH),
        false,
    )
}

/// 행 안의 문단들과 행 높이
fn build_row(row: &ContextRow<'_>, followed: bool, ids: &mut IdSpace) -> (Vec<Element>, u32) {
    match row {
        ContextRow::Text(text) => {
            let paragraph = row_paragraph(ids.paragraph(), text);
            (vec![paragraph], estimate_row_height(text) + ROW_PADDING)
        }
        ContextRow::Table { description, table } => {
            let mut paragraphs = Vec::new();
            let mut height = 0;

            if !description.is_empty() {
                paragraphs.push(row_paragraph(ids.paragraph(), description));
                height += estimate_row_height(description);
            }

            let host_height = if table.is_empty() {
                ROW_PADDING
            } else {
                let host_id = ids.paragraph();
                let (nested, table_height) = build_data_table(table, followed, ids);
                let host_height = ROW_PADDING + table_height;
                paragraphs.push(paragraph_with_runs(
                    host_id,
                    ROW_STYLE,
                    vec![run(ROW_STYLE.char_pr).child(nested).child(empty_text())],
                    &[LineSeg::new()
                        .height(host_height)
                        .baseline(host_height.saturating_sub(360).max(978))
                        .width(ROW_TEXT_WIDTH)],
                ));
                host_height
            };

            (paragraphs, height + host_height)
        }
    }
}

/// 중첩 자료 표와 그 높이
fn build_data_table(data: &DataTable, followed: bool, ids: &mut IdSpace) -> (Element, u32) {
    let table_id = ids.table();
    let columns = data.column_count;
    let header_rows = usize::from(data.headers.is_some());

    let weights: Vec<u32> = (0..columns)
        .map(|col| {
            let header = data
                .headers
                .as_ref()
                .map(|h| text_weight(&h[col]))
                .unwrap_or(1);
            data.rows()
                .iter()
                .map(|row| text_weight(&row[col]))
                .fold(header.max(1), u32::max)
        })
        .collect();
    let widths = apportion_column_widths(&weights, NESTED_TABLE_WIDTH);

    let mut heights = Vec::with_capacity(header_rows + data.rows().len());
    if let Some(headers) = &data.headers {
        heights.push(estimate_data_table_row_height(headers));
    }
    heights.extend(data.rows().iter().map(|row| estimate_data_table_row_height(row)));

    let mut table = Table::new(table_id, columns as u32)
        .z_order(CONTEXT_Z_ORDER)
        .out_margin(Margin::new(
            0,
            0,
            NESTED_OUT_MARGIN,
            if followed { NESTED_OUT_MARGIN } else { 0 },
        ))
        .in_margin(NESTED_IN_MARGIN);

    if let Some(headers) = &data.headers {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(col, text)| {
                data_cell(col, 0, 1, 1, text, HEADER_CELL_STYLE, 188, &widths, &heights, ids)
            })
            .collect();
        table.push_row(cells);
    }

    for (r, row) in data.rows().iter().enumerate() {
        let row_addr = r + header_rows;
        let cells = row
            .iter()
            .enumerate()
            .filter(|(col, _)| !data.grid.is_covered(r, *col))
            .map(|(col, text)| {
                let span = data.grid.get_cell_span(r, col);
                data_cell(
                    col,
                    row_addr,
                    span.col_span as usize,
                    span.row_span as usize,
                    text,
                    BODY_CELL_STYLE,
                    380,
                    &widths,
                    &heights,
                    ids,
                )
            })
            .collect();
        table.push_row(cells);
    }

    let height = heights.iter().sum::<u32>() + NESTED_EXTRA_HEIGHT;
    (table.size(NESTED_TABLE_WIDTH, height).into_element(), height)
}

#[allow(clippy::too_many_arguments)]
fn data_cell(
    col: usize,
    row: usize,
    col_span: usize,
    row_span: usize,
    text: &str,
    style: ParaStyle,
    spacing: u32,
    widths: &[u32],
    heights: &[u32],
    ids: &mut IdSpace,
) -> Cell {
    let width: u32 = widths.iter().skip(col).take(col_span).sum();
    let height: u32 = heights.iter().skip(row).take(row_span).sum();
    let text_width = width
        .saturating_sub(NESTED_IN_MARGIN.left + NESTED_IN_MARGIN.right)
        .max(1200);

    Cell::new(col as u32, row as u32)
        .span(col_span as u32, row_span as u32)
        .size(width, height)
        .has_margin(true)
        .margin(NESTED_IN_MARGIN)
        .paragraph(paragraph(
            ids.paragraph(),
            style,
            text,
            LineSeg::new()
                .baseline(808)
                .spacing(spacing)
                .width(text_width),
            false,
        ))
}

/// 셀 하나가 가로로 차지할 수 있는 최대 열 수이자 표 전체의 최대 열 수
pub const MAX_HTML_COL_SPAN: u32 = 1000;
/// `rowspan` 상한
pub const MAX_HTML_ROW_SPAN: u32 = 65534;
/// 격자 전체 셀 수 상한. 넘는 행은 버린다.
pub const MAX_HTML_GRID_CELLS: usize = 10_000;

struct HtmlCell {
    text: String,
    col_span: u32,
    /// 0이면 표 끝까지
    row_span: u32,
    is_header: bool,
}

fn span_attr(cell: &scraper::ElementRef<'_>, name: &str, max: u32) -> u32 {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .map_or(1, |n| n.min(max))
}

fn read_html_rows(html: &str) -> Option<Vec<Vec<HtmlCell>>> {
    let document = scraper::Html::parse_fragment(html);
    let tr_selector = scraper::Selector::parse("tr").ok()?;
    let cell_selector = scraper::Selector::parse("th, td").ok()?;

    let rows = document
        .select(&tr_selector)
        .map(|tr| {
            tr.select(&cell_selector)
                .map(|cell| HtmlCell {
                    text: cell.text().collect::<String>().trim().to_string(),
                    col_span: span_attr(&cell, "colspan", MAX_HTML_COL_SPAN).max(1),
                    row_span: span_attr(&cell, "rowspan", MAX_HTML_ROW_SPAN),
                    is_header: cell.value().name() == "th",
                })
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();
    Some(rows)
}

/// HTML `<table>` 조각을 머리글과 격자로 읽는다 (colspan/rowspan 지원).
///
/// 행 수는 셀이 있는 `<tr>` 수와 같고, 마지막 행을 넘는 `rowspan`은 남은
/// 행까지만 병합한다. 첫 행이 병합 없는 `th`로만 이루어져 있으면 머리글로
/// 분리한다. 행이 없으면 `None`.
pub fn parse_html_table(html: &str) -> Option<(Option<Vec<String>>, TableGrid)> {
    let mut rows = read_html_rows(html)?;
    if rows.is_empty() {
        return None;
    }

    let width = rows
        .iter()
        .map(|row| row.iter().map(|c| c.col_span as usize).sum::<usize>())
        .max()
        .unwrap_or(0)
        .min(MAX_HTML_COL_SPAN as usize);
    let row_limit = (MAX_HTML_GRID_CELLS / width.max(1)).max(1);
    if rows.len() > row_limit {
        warn!(rows = rows.len(), kept = row_limit, "HTML 표 행 수 제한 초과, 나머지 행 생략");
        rows.truncate(row_limit);
    }
    let height = rows.len();

    let mut grid = TableGrid::new(height, width);
    // 열마다 위쪽 병합 셀이 덮는 범위의 끝 행 (exclusive)
    let mut covered_until = vec![0usize; width];
    let mut spans: Vec<(usize, usize, u32, u32)> = Vec::new();

    for (r, row) in rows.iter().enumerate() {
        let mut col = 0;
        for cell in row {
            while col < width && covered_until[col] > r {
                col += 1;
            }
            if col >= width {
                break;
            }

            let remaining = height - r;
            let row_span = match cell.row_span {
                0 => remaining,
                n => (n as usize).min(remaining),
            };
            let col_span = (cell.col_span as usize).min(width - col);

            grid.set_cell(r, col, &cell.text);
            for until in &mut covered_until[col..col + col_span] {
                *until = (*until).max(r + row_span);
            }
            if col_span > 1 || row_span > 1 {
                spans.push((r, col, col_span as u32, row_span as u32));
            }
            col += col_span;
        }
    }

    let header_row = height > 1
        && rows[0].iter().all(|c| c.is_header)
        && !spans.iter().any(|(r, ..)| *r == 0);

    if !header_row {
        for (r, c, cs, rs) in spans {
            grid.set_cell_span(r, c, cs, rs);
        }
        return Some((None, grid));
    }

    let mut body_rows = grid.rows;
    let headers = body_rows.remove(0);
    let mut body = TableGrid::from_rows(body_rows);
    for (r, c, cs, rs) in spans {
        body.set_cell_span(r - 1, c, cs, rs);
    }
    Some((Some(headers), body))
}
