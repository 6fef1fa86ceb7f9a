//! Response projection
//!
//! Resolves a key path such as `items`, `data.results` or `pages[0].items`
//! against a JSON response.

use serde_json::Value;

/// One step of an accessor path
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Split `a.b[0].c` into key and index segments
///
/// A bracket holding something other than a number is treated as a key, so
/// `map[name]` reads the `name` field.
fn parse_path(path: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();

    for part in path.split('.').filter(|p| !p.is_empty()) {
        let mut rest = part;
        if let Some(open) = rest.find('[') {
            if open > 0 {
                segments.push(Segment::Key(&rest[..open]));
            }
            rest = &rest[open..];
            while let Some(stripped) = rest.strip_prefix('[') {
                let Some(close) = stripped.find(']') else {
                    break;
                };
                let inner = &stripped[..close];
                match inner.parse::<usize>() {
                    Ok(index) => segments.push(Segment::Index(index)),
                    Err(_) => segments.push(Segment::Key(inner.trim_matches(['"', '\'']))),
                }
                rest = &stripped[close + 1..];
            }
        } else {
            segments.push(Segment::Key(rest));
        }
    }

    segments
}

/// Resolve `path` inside `value`
///
/// Returns `None` when any step is missing. A present `null` resolves to
/// `Some(&Value::Null)`.
pub fn project<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    parse_path(path)
        .into_iter()
        .try_fold(value, |current, segment| match segment {
            Segment::Key(key) => match current {
                Value::Object(map) => map.get(key),
                Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            },
            Segment::Index(index) => match current {
                Value::Array(items) => items.get(index),
                Value::Object(map) => map.get(&index.to_string()),
                _ => None,
            },
        })
}
