/// XML 텍스트/속성 값 이스케이프.
///
/// `&`, `<`, `>`, `"`, `'` 다섯 문자를 엔티티로 바꾼다. 이미 이스케이프된 입력을
/// 넘기면 `&`가 다시 치환되므로 원문은 한 번만 통과시켜야 한다.
pub fn escape_xml(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}

/// `None`은 빈 문자열로 취급
pub fn escape_optional(value: Option<&str>) -> String {
    value.map(escape_xml).unwrap_or_default()
}

/// `&lt;`, `&gt;`, `&amp;`를 대소문자 구분 없이 원문자로 되돌린다.
///
/// 사용자가 이미 엔티티로 적어 보낸 제목 문자열을 비교하기 전에 쓴다.
pub fn decode_common_entities(value: &str) -> String {
    const ENTITIES: [(&str, char); 3] = [("&lt;", '<'), ("&gt;", '>'), ("&amp;", '&')];

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    'outer: while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        for (entity, ch) in ENTITIES {
            if rest.len() >= entity.len()
                && rest.is_char_boundary(entity.len())
                && rest[..entity.len()].eq_ignore_ascii_case(entity)
            {
                out.push(ch);
                rest = &rest[entity.len()..];
                continue 'outer;
            }
        }
        out.push('&');
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}
