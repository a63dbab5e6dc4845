//! 선택지 블록. 표(번호 셀 + 내용 셀 쌍) 또는 선택지당 문단 하나.

use tracing::debug;

use super::ids::IdSpace;
use super::model::{ChoiceLayout, GeneratorOptions};
use super::statements::KOREAN_CONSONANTS;
use crate::hwpx::paragraph::{run, text_run};
use crate::hwpx::{paragraph, paragraph_with_runs, Cell, Element, LineSeg, Margin, ParaStyle, Table};

pub const CHOICE_TABLE_WIDTH: u32 = 30615;
const NUMERAL_CELL_WIDTH: u32 = 1379;
const NUMERAL_TEXT_WIDTH: u32 = 1440;
const MIN_TEXT_CELL_WIDTH: u32 = 600;
const CHOICE_ROW_HEIGHT: u32 = 1431;
const CHOICE_BORDER_FILL: u32 = 22;
const TEXT_CELL_MARGIN: Margin = Margin::new(184, 0, 0, 0);

const HOST_STYLE: ParaStyle = ParaStyle::new(60, 10, 0);
const HOST_TRAILING_CHAR_PR: u32 = 64;
const CELL_STYLE: ParaStyle = ParaStyle::new(44, 0, 53);
/// 선택지 문단과 문항 사이 여백 문단이 같이 쓰는 모양
const BODY_STYLE: ParaStyle = ParaStyle::new(6, 10, 2);
const CHOICE_Z_ORDER: u32 = 20;

/// 본문 단 안쪽 줄 배치 (horzpos 1130, horzsize 30558)
fn body_line() -> LineSeg {
    LineSeg::new().horz(1130, 30558)
}

/// 선택지 번호.
///
/// 선택지가 한글 자음 한 글자면 `ㄱ.`..`ㅎ.`, 아니면 설정된 번호,
/// 그것도 없으면 `"{index+1}."`.
pub fn choice_numeral(choice: &str, index: usize, numerals: &[String]) -> String {
    let trimmed = choice.trim();
    let mut chars = trimmed.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if KOREAN_CONSONANTS.contains(&c) {
            return format!("{}.", c);
        }
    }

    numerals
        .get(index)
        .filter(|n| !n.is_empty())
        .cloned()
        .unwrap_or_else(|| format!("{}.", index + 1))
}

/// 빈 여백 문단
pub fn spacer_paragraph(id: u64) -> Element {
    paragraph(id, BODY_STYLE, "", body_line(), true)
}

/// 선택지 블록. 선택지가 없으면 빈 목록.
pub fn build_choice_blocks(
    choices: &[String],
    layout: ChoiceLayout,
    options: &GeneratorOptions,
    ids: &mut IdSpace,
) -> Vec<Element> {
    if choices.is_empty() {
        return Vec::new();
    }
    match layout {
        ChoiceLayout::Table => vec![build_choice_table(choices, options, ids)],
        ChoiceLayout::Paragraph => build_choice_paragraphs(choices, options, ids),
    }
}

/// 선택지마다 `"{번호} {내용}"` 문단 하나
pub fn build_choice_paragraphs(
    choices: &[String],
    options: &GeneratorOptions,
    ids: &mut IdSpace,
) -> Vec<Element> {
    choices
        .iter()
        .enumerate()
        .map(|(index, choice)| {
            let numeral = choice_numeral(choice, index, &options.choice_numerals);
            paragraph(
                ids.paragraph(),
                BODY_STYLE,
                &format!("{} {}", numeral, choice),
                body_line(),
                false,
            )
        })
        .collect()
}

/// 한 행의 선택지 수와 내용 셀 너비 (마지막 내용 셀은 나머지를 흡수)
fn text_cell_widths(chunk: usize) -> (u32, u32) {
    let chunk_u32 = u32::try_from(chunk).unwrap_or(u32::MAX).max(1);
    let width = (CHOICE_TABLE_WIDTH / chunk_u32)
        .saturating_sub(NUMERAL_CELL_WIDTH)
        .max(MIN_TEXT_CELL_WIDTH);
    let used = chunk_u32
        .saturating_mul(NUMERAL_CELL_WIDTH)
        .saturating_add((chunk_u32 - 1).saturating_mul(width));
    let last = CHOICE_TABLE_WIDTH.saturating_sub(used).max(MIN_TEXT_CELL_WIDTH);
    (width, last)
}

/// 선택지 표. `choices_per_row`개씩 한 행으로 나누고, 여러 행일 때 마지막 행의
/// 모자란 칸은 빈 셀로 채운다. 한 행에 다 들어가면 선택지 수만큼만 만든다.
pub fn build_choice_table(
    choices: &[String],
    options: &GeneratorOptions,
    ids: &mut IdSpace,
) -> Element {
    let chunk = match options.choices_per_row {
        0 => choices.len(),
        n => n.min(choices.len()),
    }
    .max(1);
    let (text_width, last_text_width) = text_cell_widths(chunk);

    let paragraph_id = ids.paragraph();
    let table_id = ids.table();

    let mut table = Table::new(table_id, (chunk * 2) as u32)
        .z_order(CHOICE_Z_ORDER)
        .border_fill(5)
        .protect(true);

    for (row_index, row) in choices.chunks(chunk).enumerate() {
        let mut cells = Vec::with_capacity(chunk * 2);
        for slot in 0..chunk {
            let index = row_index * chunk + slot;
            let col = (slot * 2) as u32;
            let row_addr = row_index as u32;
            let width = if slot + 1 == chunk {
                last_text_width
            } else {
                text_width
            };

            let (numeral, text) = match row.get(slot) {
                Some(choice) => (
                    choice_numeral(choice, index, &options.choice_numerals),
                    choice.as_str(),
                ),
                None => (String::new(), ""),
            };

            cells.push(
                Cell::new(col, row_addr)
                    .size(NUMERAL_CELL_WIDTH, CHOICE_ROW_HEIGHT)
                    .border_fill(CHOICE_BORDER_FILL)
                    .paragraph(paragraph(
                        ids.paragraph(),
                        CELL_STYLE,
                        &numeral,
                        LineSeg::new().width(NUMERAL_TEXT_WIDTH),
                        false,
                    )),
            );
            cells.push(
                Cell::new(col + 1, row_addr)
                    .size(width, CHOICE_ROW_HEIGHT)
                    .border_fill(CHOICE_BORDER_FILL)
                    .has_margin(true)
                    .margin(TEXT_CELL_MARGIN)
                    .paragraph(paragraph(
                        ids.paragraph(),
                        CELL_STYLE,
                        text,
                        LineSeg::new().width(width.saturating_sub(TEXT_CELL_MARGIN.left)),
                        false,
                    )),
            );
        }
        table.push_row(cells);
    }

    let rows = u32::try_from(table.row_count()).unwrap_or(u32::MAX);
    let height = rows.saturating_mul(CHOICE_ROW_HEIGHT);
    debug!(choices = choices.len(), rows, chunk, "선택지 표 생성");

    let table = table.size(CHOICE_TABLE_WIDTH, height).into_element();
    paragraph_with_runs(
        paragraph_id,
        HOST_STYLE,
        vec![
            run(HOST_STYLE.char_pr).child(table),
            text_run(HOST_TRAILING_CHAR_PR, "", true),
        ],
        &[body_line().height(height).baseline(height.saturating_sub(215))],
    )
}
