use super::element::Element;

/// 한 줄의 배치 정보 (`hp:lineseg`).
///
/// 한글이 열 때 다시 계산하지 않으므로 생성 시점에 명시해야 한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSeg {
    pub textpos: u32,
    pub vertpos: u32,
    pub vertsize: u32,
    pub textheight: u32,
    pub baseline: u32,
    pub spacing: u32,
    pub horzpos: u32,
    pub horzsize: u32,
    pub flags: u32,
}

impl Default for LineSeg {
    fn default() -> Self {
        Self {
            textpos: 0,
            vertpos: 0,
            vertsize: 1150,
            textheight: 1150,
            baseline: 978,
            spacing: 460,
            horzpos: 0,
            horzsize: 31688,
            flags: 393216,
        }
    }
}

impl LineSeg {
    pub fn new() -> Self {
        Self::default()
    }

    /// vertsize와 textheight를 함께 설정
    pub fn height(mut self, height: u32) -> Self {
        self.vertsize = height;
        self.textheight = height;
        self
    }

    pub fn baseline(mut self, baseline: u32) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn horz(mut self, pos: u32, size: u32) -> Self {
        self.horzpos = pos;
        self.horzsize = size;
        self
    }

    pub fn width(mut self, size: u32) -> Self {
        self.horzsize = size;
        self
    }

    pub fn vertpos(mut self, vertpos: u32) -> Self {
        self.vertpos = vertpos;
        self
    }

    pub fn textpos(mut self, textpos: u32) -> Self {
        self.textpos = textpos;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn to_element(&self) -> Element {
        Element::new("hp:lineseg")
            .attr("textpos", self.textpos)
            .attr("vertpos", self.vertpos)
            .attr("vertsize", self.vertsize)
            .attr("textheight", self.textheight)
            .attr("baseline", self.baseline)
            .attr("spacing", self.spacing)
            .attr("horzpos", self.horzpos)
            .attr("horzsize", self.horzsize)
            .attr("flags", self.flags)
    }
}

pub fn lineseg_array(segs: &[LineSeg]) -> Element {
    Element::new("hp:linesegarray").children(segs.iter().map(LineSeg::to_element))
}

/// 문단이 참조하는 문단 모양 / 스타일 / 글자 모양 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParaStyle {
    pub para_pr: u32,
    pub style: u32,
    pub char_pr: u32,
}

impl ParaStyle {
    pub const fn new(para_pr: u32, style: u32, char_pr: u32) -> Self {
        Self {
            para_pr,
            style,
            char_pr,
        }
    }
}

/// 비어 있는 `hp:run`
pub fn run(char_pr: u32) -> Element {
    Element::new("hp:run").attr("charPrIDRef", char_pr)
}

/// 텍스트가 있으면 `hp:t`를 담은 run, 없으면 `include_empty`일 때만 빈 `hp:t`를 넣는다.
pub fn text_run(char_pr: u32, text: &str, include_empty: bool) -> Element {
    let run = run(char_pr);
    if !text.is_empty() {
        run.child(Element::new("hp:t").text(text))
    } else if include_empty {
        run.child(empty_text())
    } else {
        run
    }
}

pub fn empty_text() -> Element {
    Element::new("hp:t")
}

pub fn ctrl(inner: Element) -> Element {
    Element::new("hp:ctrl").child(inner)
}

/// 다단 설정 컨트롤 (`hp:colPr`)
pub fn column_ctrl(col_count: u32, same_gap: u32) -> Element {
    ctrl(
        Element::new("hp:colPr")
            .attr("id", "")
            .attr("type", "NEWSPAPER")
            .attr("layout", "LEFT")
            .attr("colCount", col_count)
            .attr("sameSz", 1)
            .attr("sameGap", same_gap),
    )
}

fn paragraph_open(id: u64, style: ParaStyle) -> Element {
    Element::new("hp:p")
        .attr("id", id)
        .attr("paraPrIDRef", style.para_pr)
        .attr("styleIDRef", style.style)
        .attr("pageBreak", 0)
        .attr("columnBreak", 0)
        .attr("merged", 0)
}

/// 텍스트 run 하나와 줄 배치 하나로 이루어진 기본 문단
pub fn paragraph(
    id: u64,
    style: ParaStyle,
    text: &str,
    line: LineSeg,
    include_empty_run: bool,
) -> Element {
    paragraph_open(id, style)
        .child(text_run(style.char_pr, text, include_empty_run))
        .child(lineseg_array(&[line]))
}

/// run을 직접 구성하는 문단 (표 앵커, 구역 속성 등)
pub fn paragraph_with_runs(
    id: u64,
    style: ParaStyle,
    runs: Vec<Element>,
    segs: &[LineSeg],
) -> Element {
    paragraph_open(id, style)
        .children(runs)
        .child(lineseg_array(segs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwpx::element::XmlFormat;
    use pretty_assertions::assert_eq;

    const STYLE: ParaStyle = ParaStyle::new(44, 0, 53);

    #[test]
    fn test_lineseg_defaults() {
        let seg = LineSeg::default();
        assert_eq!(seg.vertsize, 1150);
        assert_eq!(seg.baseline, 978);
        assert_eq!(seg.spacing, 460);
        assert_eq!(seg.horzsize, 31688);
        assert_eq!(seg.flags, 393216);
    }

    #[test]
    fn test_paragraph_with_text() {
        let p = paragraph(10, STYLE, "A & B", LineSeg::default(), false);
        let xml = p.to_xml(XmlFormat::Compact).unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<hp:p id="10" paraPrIDRef="44" styleIDRef="0" pageBreak="0" columnBreak="0" merged="0">"#,
                r#"<hp:run charPrIDRef="53"><hp:t>A &amp; B</hp:t></hp:run>"#,
                r#"<hp:linesegarray><hp:lineseg textpos="0" vertpos="0" vertsize="1150" textheight="1150" "#,
                r#"baseline="978" spacing="460" horzpos="0" horzsize="31688" flags="393216"/></hp:linesegarray></hp:p>"#
            )
        );
    }

    #[test]
    fn test_paragraph_empty_run_variants() {
        let with_empty = paragraph(1, STYLE, "", LineSeg::default(), true);
        let run = with_empty.first_child("hp:run").unwrap();
        assert!(run.first_child("hp:t").is_some());

        let without = paragraph(2, STYLE, "", LineSeg::default(), false);
        let run = without.first_child("hp:run").unwrap();
        assert!(run.first_child("hp:t").is_none());
    }

    #[test]
    fn test_lineseg_builder() {
        let seg = LineSeg::new().height(1400).baseline(1190).spacing(560).horz(1130, 30558);
        let el = seg.to_element();
        assert_eq!(el.get_attr("vertsize"), Some("1400"));
        assert_eq!(el.get_attr("textheight"), Some("1400"));
        assert_eq!(el.get_attr("horzpos"), Some("1130"));
        assert_eq!(el.get_attr("horzsize"), Some("30558"));
    }

    #[test]
    fn test_paragraph_with_multiple_segments() {
        let p = paragraph_with_runs(
            3,
            STYLE,
            vec![run(3), run(3)],
            &[LineSeg::default(), LineSeg::default().textpos(101)],
        );
        assert_eq!(p.descendants("hp:run").len(), 2);
        assert_eq!(p.descendants("hp:lineseg").len(), 2);
    }
}
