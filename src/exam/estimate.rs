//! 텍스트 길이로 행/셀 높이와 열 너비를 추정한다.
//!
//! HWPX 표는 높이를 명시해야 하고 한글이 열 때 다시 계산하지 않으므로,
//! 한글 조판 결과를 근사해 넣는다. 정확할 필요는 없고 텍스트가 길수록
//! 값이 줄어들지 않는 것과 최소 높이만 지키면 된다.

/// 지문 텍스트 행의 한 줄 글자 수
pub const CONTEXT_CHARS_PER_LINE: usize = 32;
/// 자료 표 셀의 한 줄 글자 수
pub const DATA_CELL_CHARS_PER_LINE: usize = 24;
/// 보기 문장의 한 줄 글자 수
pub const STATEMENT_CHARS_PER_LINE: usize = 30;

const ROW_LINE_HEIGHT: u32 = 1150;
const ROW_LINE_SPACING: u32 = 460;
const ROW_PADDING: u32 = 566;
const ROW_MIN_HEIGHT: u32 = 2000;

const DATA_LINE_HEIGHT: u32 = 950;
const DATA_LINE_SPACING: u32 = 380;
const DATA_PADDING: u32 = 472;
pub const DATA_ROW_MIN_HEIGHT: u32 = 1904;

const STATEMENT_LINE_HEIGHT: u32 = 1500;
const STATEMENT_PADDING: u32 = 400;
const STATEMENT_MIN_HEIGHT: u32 = 3200;

/// 최소 열 너비
pub const MIN_COLUMN_WIDTH: u32 = 1200;

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// 화면에 보일 줄 수. 빈 줄도 한 줄로 센다.
pub fn count_visual_lines(text: &str, chars_per_line: usize) -> u32 {
    if text.is_empty() {
        return 1;
    }
    let cpl = chars_per_line.max(1);
    let total: usize = text
        .replace("\r\n", "\n")
        .split('\n')
        .map(|line| {
            let len = char_len(line.trim());
            if len == 0 {
                1
            } else {
                len.div_ceil(cpl).max(1)
            }
        })
        .sum();
    u32::try_from(total.max(1)).unwrap_or(u32::MAX)
}

fn lines_height(lines: u32, line_height: u32, spacing: u32, padding: u32) -> u32 {
    padding
        .saturating_add(lines.saturating_mul(line_height))
        .saturating_add(lines.saturating_sub(1).saturating_mul(spacing))
}

/// 단일 셀 텍스트 행 높이
pub fn estimate_row_height(text: &str) -> u32 {
    let lines = count_visual_lines(text, CONTEXT_CHARS_PER_LINE);
    lines_height(lines, ROW_LINE_HEIGHT, ROW_LINE_SPACING, ROW_PADDING).max(ROW_MIN_HEIGHT)
}

/// 자료 표 한 행의 높이 (셀 중 최댓값)
pub fn estimate_data_table_row_height<S: AsRef<str>>(cells: &[S]) -> u32 {
    cells
        .iter()
        .map(|cell| {
            let lines = count_visual_lines(cell.as_ref(), DATA_CELL_CHARS_PER_LINE);
            lines_height(lines, DATA_LINE_HEIGHT, DATA_LINE_SPACING, DATA_PADDING)
        })
        .fold(DATA_ROW_MIN_HEIGHT, u32::max)
}

/// 보기 상자 본문 셀 높이
pub fn estimate_statement_height<S: AsRef<str>>(statements: &[S]) -> u32 {
    let lines: u32 = statements
        .iter()
        .map(|s| count_visual_lines(s.as_ref(), STATEMENT_CHARS_PER_LINE))
        .sum();
    lines
        .saturating_mul(STATEMENT_LINE_HEIGHT)
        .saturating_add(STATEMENT_PADDING)
        .max(STATEMENT_MIN_HEIGHT)
}

/// 열 너비 계산용 텍스트 가중치: 가장 긴 줄 길이와 줄 수 x 4 중 큰 값
pub fn text_weight(text: &str) -> u32 {
    if text.is_empty() {
        return 1;
    }
    let normalized = text.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let longest = lines
        .iter()
        .map(|line| char_len(line.trim()))
        .max()
        .unwrap_or(0)
        .max(1);
    let weight = longest.max(lines.len() * 4);
    u32::try_from(weight).unwrap_or(u32::MAX)
}

/// 가중치 비례로 `available` 너비를 열에 나눈다.
///
/// 각 열은 `max(1200, available / (열 수 x 2))` 이상이며, 합계가 `available`과
/// 다르면 마지막 열부터 앞으로 최소 너비를 지키며 조정한다.
pub fn apportion_column_widths(weights: &[u32], available: u32) -> Vec<u32> {
    let count = weights.len();
    if count == 0 {
        return Vec::new();
    }

    let available = i64::from(available);
    let minimum = i64::from(MIN_COLUMN_WIDTH).max(available / (count as i64 * 2));
    let total_weight: i64 = weights.iter().map(|w| i64::from((*w).max(1))).sum();

    let mut widths: Vec<i64> = weights
        .iter()
        .map(|w| {
            let proportional = i64::from((*w).max(1)) * available / total_weight;
            proportional.max(minimum)
        })
        .collect();

    let delta = available - widths.iter().sum::<i64>();
    if delta > 0 {
        widths[count - 1] += delta;
    } else if delta < 0 {
        let mut remaining = delta;
        for width in widths.iter_mut().rev() {
            if remaining >= 0 {
                break;
            }
            let adjustable = *width - minimum;
            if adjustable <= 0 {
                continue;
            }
            let adjustment = remaining.max(-adjustable);
            *width += adjustment;
            remaining -= adjustment;
        }
        // 최소 너비 때문에 다 줄이지 못하면 합계가 available을 넘는다
    }

    widths
        .into_iter()
        .map(|w| u32::try_from(w.max(0)).unwrap_or(u32::MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_visual_lines() {
        assert_eq!(count_visual_lines("", 32), 1);
        assert_eq!(count_visual_lines("짧은 문장", 32), 1);
        assert_eq!(count_visual_lines(&"가".repeat(33), 32), 2);
        assert_eq!(count_visual_lines("첫 줄\n\n셋째 줄", 32), 3);
        assert_eq!(count_visual_lines("a\r\nb", 32), 2);
    }

    #[test]
    fn test_row_height_minimum_and_growth() {
        assert_eq!(estimate_row_height(""), 2000);
        assert_eq!(estimate_row_height("짧다"), 2000);
        // 3줄: 566 + 3*1150 + 2*460 = 4936
        assert_eq!(estimate_row_height(&"가".repeat(70)), 4936);
    }

    #[test]
    fn test_row_height_is_monotone() {
        let mut previous = 0;
        for len in 0..200 {
            let h = estimate_row_height(&"가".repeat(len));
            assert!(h >= previous, "길이 {}에서 높이가 줄어듦", len);
            previous = h;
        }
    }

    #[test]
    fn test_data_row_height_uses_tallest_cell() {
        let empty: [&str; 0] = [];
        assert_eq!(estimate_data_table_row_height(&empty), 1904);
        assert_eq!(estimate_data_table_row_height(&["a", "b"]), 1904);
        // 3줄 셀: 472 + 3*950 + 2*380 = 4082
        let tall = "가".repeat(60);
        assert_eq!(estimate_data_table_row_height(&["a", tall.as_str()]), 4082);
    }

    #[test]
    fn test_statement_height() {
        let empty: [&str; 0] = [];
        assert_eq!(estimate_statement_height(&empty), 3200);
        // 3문장 x 1줄 = 4900
        assert_eq!(estimate_statement_height(&["가", "나", "다"]), 4900);
    }

    #[test]
    fn test_text_weight() {
        assert_eq!(text_weight(""), 1);
        assert_eq!(text_weight("ab"), 4);
        assert_eq!(text_weight("abcdefghij"), 10);
        assert_eq!(text_weight("a\nb\nc"), 12);
    }

    #[test]
    fn test_apportion_sums_to_available() {
        let widths = apportion_column_widths(&[10, 20, 30], 28911);
        assert_eq!(widths.iter().sum::<u32>(), 28911);
        assert!(widths[2] > widths[0]);
    }

    #[test]
    fn test_apportion_respects_minimum() {
        let widths = apportion_column_widths(&[1, 1000], 28911);
        let minimum = 28911 / 4;
        assert!(widths[0] >= minimum);
        assert_eq!(widths.iter().sum::<u32>(), 28911);
    }

    #[test]
    fn test_apportion_empty() {
        assert!(apportion_column_widths(&[], 1000).is_empty());
    }
}
