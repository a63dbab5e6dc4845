use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ExamError, Result, ValidationError};
use crate::hwpx::{PageLayout, TableGrid, XmlFormat};

pub const DEFAULT_CHOICE_NUMERALS: [&str; 10] =
    ["①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩"];
pub const DEFAULT_BASE_PARAGRAPH_ID: u64 = 2147483649;
pub const DEFAULT_BASE_TABLE_ID: u64 = 1900000001;
pub const DEFAULT_ANSWER_HEADING: &str = "정답 및 해설";
pub const DEFAULT_CHOICES_PER_ROW: usize = 5;

/// 선택지 배치 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceLayout {
    /// 번호 셀 + 내용 셀 쌍으로 된 표
    Table,
    /// 선택지마다 문단 하나
    Paragraph,
}

impl ChoiceLayout {
    /// 대소문자/앞뒤 공백 무시
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "paragraph" => Some(Self::Paragraph),
            _ => None,
        }
    }
}

/// 생성 옵션. 호출마다 새로 만들고 생성 중에는 바꾸지 않는다.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    pub choice_numerals: Vec<String>,
    pub spacers_per_question: usize,
    pub base_paragraph_id: u64,
    pub base_table_id: u64,
    pub minify_output: bool,
    /// 문항별 지정이 없을 때 쓸 선택지 배치
    pub choice_layout: Option<ChoiceLayout>,
    /// 텍스트 지문 바로 뒤의 표 지문을 한 행으로 합칠지
    pub merge_context_tables: bool,
    /// 선택지 표 한 행의 선택지 수 (0이면 한 행에 모두)
    pub choices_per_row: usize,
    /// 보기 문장 앞에 ㄱ. ㄴ. ㄷ. 을 붙일지
    pub statement_bullets: bool,
    /// 선택지가 없는 문항을 검증 에러로 볼지
    pub require_choices: bool,
    pub answer_heading: String,
    pub answer_spacers_per_question: usize,
    pub base_answer_paragraph_id: u64,
    pub base_answer_table_id: u64,
    pub page: PageLayout,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            choice_numerals: DEFAULT_CHOICE_NUMERALS.iter().map(|s| s.to_string()).collect(),
            spacers_per_question: 1,
            base_paragraph_id: DEFAULT_BASE_PARAGRAPH_ID,
            base_table_id: DEFAULT_BASE_TABLE_ID,
            minify_output: true,
            choice_layout: None,
            merge_context_tables: true,
            choices_per_row: DEFAULT_CHOICES_PER_ROW,
            statement_bullets: false,
            require_choices: false,
            answer_heading: DEFAULT_ANSWER_HEADING.to_string(),
            answer_spacers_per_question: 1,
            base_answer_paragraph_id: DEFAULT_BASE_PARAGRAPH_ID + 10000,
            base_answer_table_id: DEFAULT_BASE_TABLE_ID + 1000,
            page: PageLayout::default(),
        }
    }
}

impl GeneratorOptions {
    /// JSON 옵션 객체를 읽는다. 필드마다 따로 해석하고 타입이 맞지 않으면 기본값을 쓴다.
    pub fn from_value(value: &Value) -> Self {
        let mut options = Self::default();
        let Some(obj) = value.as_object() else {
            return options;
        };

        if let Some(numerals) = obj.get("choiceNumerals").and_then(Value::as_array) {
            let numerals: Vec<String> = numerals
                .iter()
                .map(|v| scalar_text(v).unwrap_or_default())
                .collect();
            if !numerals.is_empty() {
                options.choice_numerals = numerals;
            }
        }
        if let Some(n) = obj.get("spacersPerQuestion").and_then(Value::as_i64) {
            options.spacers_per_question = clamp_count(n);
        }
        if let Some(base) = obj.get("baseParagraphId").and_then(Value::as_u64) {
            options.base_paragraph_id = base;
        }
        if let Some(base) = obj.get("baseTableId").and_then(Value::as_u64) {
            options.base_table_id = base;
        }
        if let Some(minify) = obj.get("minifyOutput").and_then(Value::as_bool) {
            options.minify_output = minify;
        }
        if let Some(layout) = obj.get("choiceLayout").and_then(Value::as_str) {
            options.choice_layout = ChoiceLayout::parse(layout);
        }
        if let Some(merge) = obj.get("mergeContextTables").and_then(Value::as_bool) {
            options.merge_context_tables = merge;
        }
        if let Some(n) = obj.get("choicesPerRow").and_then(Value::as_i64) {
            options.choices_per_row = clamp_count(n);
        }
        if let Some(bullets) = obj.get("statementBullets").and_then(Value::as_bool) {
            options.statement_bullets = bullets;
        }
        if let Some(require) = obj.get("requireChoices").and_then(Value::as_bool) {
            options.require_choices = require;
        }
        if let Some(heading) = obj.get("answerHeading").and_then(Value::as_str) {
            options.answer_heading = heading.to_string();
        }

        // 정답 구역 값은 본문 값에서 파생된다
        options.answer_spacers_per_question = obj
            .get("answerSpacersPerQuestion")
            .and_then(Value::as_i64)
            .map(clamp_count)
            .unwrap_or(options.spacers_per_question);
        options.base_answer_paragraph_id = obj
            .get("baseAnswerParagraphId")
            .and_then(Value::as_u64)
            .unwrap_or(options.base_paragraph_id.saturating_add(10000));
        options.base_answer_table_id = obj
            .get("baseAnswerTableId")
            .and_then(Value::as_u64)
            .unwrap_or(options.base_table_id.saturating_add(1000));

        options
    }

    pub fn xml_format(&self) -> XmlFormat {
        if self.minify_output {
            XmlFormat::Compact
        } else {
            XmlFormat::Pretty
        }
    }
}

fn clamp_count(n: i64) -> usize {
    usize::try_from(n.max(0)).unwrap_or(usize::MAX)
}

/// 지문 텍스트 항목
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextEntry {
    pub label: Option<String>,
    pub text: String,
}

/// 지문 자료 표. 모든 행은 `column_count`개의 셀을 가진다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    pub label: Option<String>,
    pub text: Option<String>,
    pub headers: Option<Vec<String>>,
    pub grid: TableGrid,
    pub column_count: usize,
}

impl DataTable {
    /// 열 수를 `max(머리글 수, 가장 긴 행)`으로 정하고 모든 행을 맞춘다.
    pub fn new(headers: Option<Vec<String>>, rows: Vec<Vec<String>>) -> Self {
        Self::from_grid(headers, TableGrid::from_rows(rows))
    }

    pub fn from_grid(headers: Option<Vec<String>>, mut grid: TableGrid) -> Self {
        let headers = headers.filter(|h| !h.is_empty());
        let column_count = headers
            .as_ref()
            .map(Vec::len)
            .unwrap_or(0)
            .max(grid.col_count());
        grid.normalize_width(column_count);
        let headers = headers.map(|mut h| {
            h.resize(column_count, String::new());
            h
        });
        Self {
            label: None,
            text: None,
            headers,
            grid,
            column_count,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.grid.rows
    }

    /// 그릴 셀이 없는 표
    pub fn is_empty(&self) -> bool {
        self.column_count == 0 || (self.headers.is_none() && self.grid.rows.is_empty())
    }
}

/// 지문 항목: 텍스트 또는 자료 표
#[derive(Debug, Clone, PartialEq)]
pub enum ContextEntry {
    Text(TextEntry),
    Table(DataTable),
}

impl ContextEntry {
    pub fn text(label: Option<&str>, text: &str) -> Self {
        Self::Text(TextEntry {
            label: label.map(str::to_string),
            text: text.to_string(),
        })
    }

    /// JSON 값 하나를 지문 항목으로 정규화한다.
    ///
    /// `type == "table"` 이거나 `table`/`rows`/`headers`/`html` 필드가 있으면 표,
    /// 그 외 객체는 텍스트, 문자열·숫자는 라벨 없는 텍스트로 본다.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::Text(TextEntry {
                label: None,
                text: scalar_text(value).unwrap_or_default(),
            });
        };

        let label = first_text(obj, &["label", "title", "name"]).filter(|s| !s.is_empty());
        let text = first_text(obj, &["text", "content", "description", "value"]);

        if is_table_entry(obj) {
            let source = obj
                .get("table")
                .and_then(Value::as_object)
                .unwrap_or(obj);
            let mut table = table_from_source(source);
            table.label = label;
            table.text = text.filter(|s| !s.is_empty());
            return Self::Table(table);
        }

        Self::Text(TextEntry {
            label,
            text: text.unwrap_or_default(),
        })
    }

    /// `라벨 : 텍스트`, 한쪽만 있으면 그 값, 둘 다 없으면 빈 문자열
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(entry) => format_display_text(entry.label.as_deref(), Some(&entry.text)),
            Self::Table(table) => format_display_text(table.label.as_deref(), table.text.as_deref()),
        }
    }
}

pub fn format_display_text(label: Option<&str>, text: Option<&str>) -> String {
    let label = label.unwrap_or("");
    let text = text.unwrap_or("");
    match (label.is_empty(), text.is_empty()) {
        (false, false) => format!("{} : {}", label, text),
        (false, true) => label.to_string(),
        (true, false) => text.to_string(),
        (true, true) => String::new(),
    }
}

fn is_table_entry(obj: &Map<String, Value>) -> bool {
    obj.get("type").and_then(Value::as_str) == Some("table")
        || obj.get("table").is_some_and(Value::is_object)
        || obj.get("rows").is_some_and(Value::is_array)
        || obj.get("headers").is_some_and(Value::is_array)
        || obj.get("html").is_some_and(Value::is_string)
}

struct HeaderDef {
    label: String,
    key: Option<String>,
}

fn header_def(value: &Value, index: usize) -> HeaderDef {
    match value.as_object() {
        Some(obj) => HeaderDef {
            label: first_text(obj, &["label", "text", "title", "name"])
                .unwrap_or_else(|| index.to_string()),
            key: first_text(obj, &["key", "field", "id", "name"]),
        },
        None => HeaderDef {
            label: scalar_text(value).unwrap_or_else(|| index.to_string()),
            key: None,
        },
    }
}

fn table_from_source(source: &Map<String, Value>) -> DataTable {
    if let Some(html) = source.get("html").and_then(Value::as_str) {
        if let Some((headers, grid)) = super::context::parse_html_table(html) {
            return DataTable::from_grid(headers, grid);
        }
        return DataTable::default();
    }

    let headers: Option<Vec<HeaderDef>> = source.get("headers").and_then(Value::as_array).map(|list| {
        list.iter()
            .enumerate()
            .map(|(i, h)| header_def(h, i))
            .collect()
    });
    let keyed = headers
        .as_ref()
        .is_some_and(|defs| defs.iter().any(|d| d.key.is_some()));

    let rows: Vec<Vec<String>> = source
        .get("rows")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .map(|row| match row {
                    Value::Array(cells) => cells.iter().map(cell_text).collect(),
                    Value::Object(obj) if keyed => headers
                        .iter()
                        .flatten()
                        .map(|def| {
                            let key = def.key.as_deref().unwrap_or(&def.label);
                            obj.get(key).map(cell_text)
                                .unwrap_or_default()
                        })
                        .collect(),
                    Value::Object(obj) => obj.values().map(cell_text).collect(),
                    other => vec![cell_text(other)],
                })
                .collect()
        })
        .unwrap_or_default();

    let headers = headers.map(|defs| defs.into_iter().map(|d| d.label).collect());
    DataTable::new(headers, rows)
}

fn cell_text(value: &Value) -> String {
    scalar_text(value).unwrap_or_default()
}

/// 문자열·숫자·불리언만 텍스트로 본다
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 키 목록에서 null이 아닌 첫 값을 텍스트로
fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|v| !v.is_null())
        .map(|v| scalar_text(v).unwrap_or_default())
}

/// 선택지(또는 보기 문장) 하나를 문자열로. 문자열/숫자 또는 `text`/`content`/`description` 객체.
pub fn normalize_choice(value: &Value) -> String {
    match value {
        Value::Object(obj) => first_text(obj, &["text", "content", "description"]).unwrap_or_default(),
        other => scalar_text(other).unwrap_or_default(),
    }
}

/// 정규화된 문항
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Question {
    pub prompt: String,
    pub context_entries: Vec<ContextEntry>,
    pub statement_title: Option<String>,
    pub statements: Vec<String>,
    pub choices: Vec<String>,
    /// 문항에 명시된 배치 (없으면 옵션 또는 추론)
    pub choice_layout: Option<ChoiceLayout>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

impl Question {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_choices<S: Into<String>>(mut self, choices: impl IntoIterator<Item = S>) -> Self {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_statements<S: Into<String>>(
        mut self,
        title: Option<&str>,
        statements: impl IntoIterator<Item = S>,
    ) -> Self {
        self.statement_title = title.map(str::to_string);
        self.statements = statements.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_context(mut self, entry: ContextEntry) -> Self {
        self.context_entries.push(entry);
        self
    }

    pub fn with_layout(mut self, layout: ChoiceLayout) -> Self {
        self.choice_layout = Some(layout);
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into()).filter(|s: &String| !s.is_empty());
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into()).filter(|s: &String| !s.is_empty());
        self
    }

    /// JSON 문항 하나를 정규화한다. 객체가 아니거나 프롬프트가 비면 에러.
    pub fn from_value(index: usize, value: &Value) -> std::result::Result<Self, ValidationError> {
        let obj = value
            .as_object()
            .ok_or(ValidationError::NotAnObject { index })?;

        let prompt = obj
            .get("prompt")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingPrompt { index })?;

        let context_entries = obj
            .get("contextEntries")
            .or_else(|| obj.get("context"))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(ContextEntry::from_value)
                    .collect()
            })
            .unwrap_or_default();

        let statement_title = obj
            .get("statementTitle")
            .filter(|v| !v.is_null())
            .or_else(|| obj.get("statementsTitle"))
            .and_then(scalar_text);

        let statements = obj
            .get("statements")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter(|v| !v.is_null())
                    .map(normalize_choice)
                    .collect()
            })
            .unwrap_or_default();

        let choices = obj
            .get("choices")
            .and_then(Value::as_array)
            .map(|list| list.iter().map(normalize_choice).collect())
            .unwrap_or_default();

        let choice_layout = match obj.get("choiceLayout").and_then(Value::as_str) {
            Some(raw) => {
                let parsed = ChoiceLayout::parse(raw);
                if parsed.is_none() {
                    tracing::warn!(index, layout = raw, "알 수 없는 choiceLayout, 자동 판단으로 대체");
                }
                parsed
            }
            None => None,
        };

        Ok(Self {
            prompt: prompt.to_string(),
            context_entries,
            statement_title,
            statements,
            choices,
            choice_layout,
            answer: obj.get("answer").and_then(scalar_text).filter(|s| !s.is_empty()),
            explanation: obj
                .get("explanation")
                .and_then(scalar_text)
                .filter(|s| !s.is_empty()),
        })
    }

    /// 보기 상자를 그릴지 (제목 또는 문장이 있을 때)
    pub fn has_statement_block(&self) -> bool {
        !self.statements.is_empty()
            || self
                .statement_title
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }

    /// 명시값 → 옵션 기본값 → 보기 유무로 추론
    pub fn resolved_layout(&self, default: Option<ChoiceLayout>) -> ChoiceLayout {
        self.choice_layout.or(default).unwrap_or(if self.has_statement_block() {
            ChoiceLayout::Table
        } else {
            ChoiceLayout::Paragraph
        })
    }

    /// 정답 구역에 들어갈 문항인지
    pub fn is_answerable(&self) -> bool {
        self.answer.is_some() || self.explanation.is_some()
    }
}

/// 생성 입력: 문항 목록 + 옵션
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
    pub options: GeneratorOptions,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>, options: GeneratorOptions) -> Self {
        Self { questions, options }
    }

    /// `{ "questions": [...], "options": {...} }` 또는 문항 배열을 읽는다.
    pub fn from_value(value: &Value) -> Result<Self> {
        let (questions, options) = match value {
            Value::Array(_) => (Some(value), None),
            Value::Object(obj) => (obj.get("questions"), obj.get("options")),
            _ => (None, None),
        };

        let list = questions
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
            .ok_or(ValidationError::EmptyQuestions)?;

        let questions = list
            .iter()
            .enumerate()
            .map(|(index, q)| Question::from_value(index, q))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let options = options
            .map(GeneratorOptions::from_value)
            .unwrap_or_default();

        let set = Self { questions, options };
        set.validate()?;
        Ok(set)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// 빈 목록, 빈 프롬프트, (옵션에 따라) 선택지 없는 문항을 거부
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.questions.is_empty() {
            return Err(ValidationError::EmptyQuestions);
        }
        for (index, question) in self.questions.iter().enumerate() {
            if question.prompt.trim().is_empty() {
                return Err(ValidationError::MissingPrompt { index });
            }
            if self.options.require_choices && question.choices.is_empty() {
                return Err(ValidationError::MissingChoices { index });
            }
        }
        Ok(())
    }
}

impl TryFrom<&Value> for QuestionSet {
    type Error = ExamError;

    fn try_from(value: &Value) -> Result<Self> {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_input() {
        let set = QuestionSet::from_value(&json!([{ "prompt": " P " }])).unwrap();
        assert_eq!(set.questions.len(), 1);
        assert_eq!(set.questions[0].prompt, "P");
        assert_eq!(set.options, GeneratorOptions::default());
    }

    #[test]
    fn test_empty_questions_rejected() {
        for input in [json!({ "questions": [] }), json!({}), json!([]), json!("x")] {
            let err = QuestionSet::from_value(&input).unwrap_err();
            assert!(matches!(
                err,
                ExamError::Validation(ValidationError::EmptyQuestions)
            ));
        }
    }

    #[test]
    fn test_missing_prompt_reports_index() {
        let err = QuestionSet::from_value(&json!({ "questions": [{}] })).unwrap_err();
        assert!(matches!(
            err,
            ExamError::Validation(ValidationError::MissingPrompt { index: 0 })
        ));

        let err = QuestionSet::from_value(&json!([{ "prompt": "a" }, { "prompt": "   " }])).unwrap_err();
        assert!(err.to_string().contains("Question at index 1 is missing a prompt."));
    }

    #[test]
    fn test_non_object_question() {
        let err = QuestionSet::from_value(&json!([{ "prompt": "a" }, 3])).unwrap_err();
        assert!(matches!(
            err,
            ExamError::Validation(ValidationError::NotAnObject { index: 1 })
        ));
    }

    #[test]
    fn test_require_choices_option() {
        let input = json!({ "questions": [{ "prompt": "a" }], "options": { "requireChoices": true } });
        let err = QuestionSet::from_value(&input).unwrap_err();
        assert!(matches!(
            err,
            ExamError::Validation(ValidationError::MissingChoices { index: 0 })
        ));

        let lenient = json!({ "questions": [{ "prompt": "a" }] });
        assert!(QuestionSet::from_value(&lenient).is_ok());
    }

    #[test]
    fn test_choice_normalization() {
        assert_eq!(normalize_choice(&json!("가")), "가");
        assert_eq!(normalize_choice(&json!(3)), "3");
        assert_eq!(normalize_choice(&json!({ "text": "본문" })), "본문");
        assert_eq!(normalize_choice(&json!({ "content": "내용" })), "내용");
        assert_eq!(normalize_choice(&json!({ "text": null, "description": "설명" })), "설명");
        assert_eq!(normalize_choice(&json!({ "other": 1 })), "");
        assert_eq!(normalize_choice(&json!(null)), "");
        assert_eq!(normalize_choice(&json!([1, 2])), "");
    }

    #[test]
    fn test_wrong_typed_fields_default() {
        let q = Question::from_value(
            0,
            &json!({ "prompt": "p", "choices": "abc", "statements": 5, "contextEntries": {} }),
        )
        .unwrap();
        assert!(q.choices.is_empty());
        assert!(q.statements.is_empty());
        assert!(q.context_entries.is_empty());
        assert_eq!(q.answer, None);
    }

    #[test]
    fn test_layout_inference() {
        let plain = Question::new("p");
        assert_eq!(plain.resolved_layout(None), ChoiceLayout::Paragraph);

        let with_statements = Question::new("p").with_statements(None, ["가"]);
        assert_eq!(with_statements.resolved_layout(None), ChoiceLayout::Table);

        let titled = Question::from_value(0, &json!({ "prompt": "p", "statementsTitle": "<보기>" })).unwrap();
        assert_eq!(titled.statement_title.as_deref(), Some("<보기>"));
        assert_eq!(titled.resolved_layout(None), ChoiceLayout::Table);

        let explicit = Question::from_value(0, &json!({ "prompt": "p", "choiceLayout": " TABLE " })).unwrap();
        assert_eq!(explicit.choice_layout, Some(ChoiceLayout::Table));

        assert_eq!(plain.resolved_layout(Some(ChoiceLayout::Table)), ChoiceLayout::Table);
    }

    #[test]
    fn test_answer_coercion() {
        let q = Question::from_value(0, &json!({ "prompt": "p", "answer": 4, "explanation": "" })).unwrap();
        assert_eq!(q.answer.as_deref(), Some("4"));
        assert_eq!(q.explanation, None);
        assert!(q.is_answerable());
    }

    #[test]
    fn test_context_text_entries() {
        let entry = ContextEntry::from_value(&json!({ "label": "A 씨", "text": "안녕하세요" }));
        assert_eq!(entry.display_text(), "A 씨 : 안녕하세요");

        let entry = ContextEntry::from_value(&json!("그냥 문장"));
        assert_eq!(entry.display_text(), "그냥 문장");

        let entry = ContextEntry::from_value(&json!({ "title": "제목만" }));
        assert_eq!(entry.display_text(), "제목만");
    }

    #[test]
    fn test_context_table_padding() {
        let entry = ContextEntry::from_value(&json!({
            "type": "table",
            "headers": ["구분", "내용", "비고"],
            "rows": [["a"], ["b", "c", "d", "e"]]
        }));
        let ContextEntry::Table(table) = entry else {
            panic!("표 항목이어야 함");
        };
        assert_eq!(table.column_count, 4);
        assert_eq!(table.headers.as_ref().unwrap().len(), 4);
        assert!(table.rows().iter().all(|row| row.len() == 4));
    }

    #[test]
    fn test_context_table_keyed_rows() {
        let entry = ContextEntry::from_value(&json!({
            "table": {
                "headers": [{ "label": "이름", "key": "name" }, { "label": "나이", "key": "age" }],
                "rows": [{ "age": 30, "name": "홍길동" }, { "name": "김철수" }]
            },
            "label": "표 1"
        }));
        let ContextEntry::Table(table) = entry else {
            panic!("표 항목이어야 함");
        };
        assert_eq!(table.label.as_deref(), Some("표 1"));
        assert_eq!(table.headers, Some(vec!["이름".to_string(), "나이".to_string()]));
        assert_eq!(table.rows()[0], vec!["홍길동".to_string(), "30".to_string()]);
        assert_eq!(table.rows()[1], vec!["김철수".to_string(), String::new()]);
    }

    #[test]
    fn test_context_table_scalar_rows() {
        let entry = ContextEntry::from_value(&json!({ "rows": ["x", 1] }));
        let ContextEntry::Table(table) = entry else {
            panic!("표 항목이어야 함");
        };
        assert_eq!(table.column_count, 1);
        assert_eq!(table.rows().len(), 2);
        assert!(table.headers.is_none());
    }

    #[test]
    fn test_options_coercion() {
        let options = GeneratorOptions::from_value(&json!({
            "choiceNumerals": [],
            "spacersPerQuestion": -3,
            "baseParagraphId": "abc",
            "baseTableId": 5,
            "minifyOutput": false,
            "choicesPerRow": 0
        }));
        assert_eq!(options.choice_numerals.len(), 10);
        assert_eq!(options.spacers_per_question, 0);
        assert_eq!(options.base_paragraph_id, DEFAULT_BASE_PARAGRAPH_ID);
        assert_eq!(options.base_table_id, 5);
        assert_eq!(options.base_answer_table_id, 1005);
        assert_eq!(options.base_answer_paragraph_id, DEFAULT_BASE_PARAGRAPH_ID + 10000);
        assert_eq!(options.answer_spacers_per_question, 0);
        assert_eq!(options.choices_per_row, 0);
        assert_eq!(options.xml_format(), XmlFormat::Pretty);
    }

    #[test]
    fn test_options_non_object_is_default() {
        assert_eq!(GeneratorOptions::from_value(&json!(null)), GeneratorOptions::default());
        assert_eq!(GeneratorOptions::from_value(&json!([1])), GeneratorOptions::default());
    }
}
