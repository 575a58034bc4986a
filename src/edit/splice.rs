//! Rendering a changed mapping back onto the text it was parsed from.
//!
//! Unchanged entries are copied from the original text together with the
//! comments around them. A changed entry whose old and new values are both
//! mappings is spliced one level down, so its untouched children keep their
//! text as well. Any other changed entry is serialized afresh at its original
//! indentation. The spliced text is parsed again and must equal the new
//! mapping; otherwise [`render_onto`] gives up and returns `None`.

use serde_yaml::{Mapping, Value};

/// One key of a block mapping as it appears in the text.
struct Entry<'a> {
    /// Comment and blank lines directly above the key.
    lead: &'a [&'a str],
    key_line: &'a str,
    /// Lines after the key up to the next entry's lead.
    body: &'a [&'a str],
}

/// Render `root` onto `original`, which parsed to `pristine`.
pub(crate) fn render_onto(original: &str, pristine: &Mapping, root: &Mapping) -> Option<String> {
    let lines: Vec<&str> = original.split_inclusive('\n').collect();
    let mut out = String::new();
    splice_mapping(pristine, root, &lines, 0, &mut out)?;

    let reparsed: Value = serde_yaml::from_str(&out).ok()?;
    let same = match reparsed {
        Value::Mapping(mapping) => mapping == *root,
        Value::Null => root.is_empty(),
        _ => false,
    };
    same.then_some(out)
}

fn splice_mapping(
    old: &Mapping,
    new: &Mapping,
    lines: &[&str],
    indent: usize,
    out: &mut String,
) -> Option<()> {
    let (head, entries) = split_entries(lines, indent)?;
    if entries.len() != old.len() {
        return None;
    }
    push_lines(out, head);

    for (key, value) in new {
        let existing = old
            .iter()
            .zip(&entries)
            .find(|((old_key, _), _)| *old_key == key);

        match existing {
            Some(((_, old_value), entry)) if old_value == value => {
                push_lines(out, entry.lead);
                push_text(out, entry.key_line);
                push_lines(out, entry.body);
            }
            Some(((_, old_value), entry)) => {
                push_lines(out, entry.lead);
                let spliced = match (old_value, value) {
                    (Value::Mapping(old_child), Value::Mapping(new_child))
                        if !new_child.is_empty() =>
                    {
                        splice_child(old_child, new_child, entry)
                    }
                    _ => None,
                };
                match spliced {
                    Some(text) => push_text(out, &text),
                    None => push_text(out, &fresh_entry(key, value, indent)?),
                }
            }
            None => push_text(out, &fresh_entry(key, value, indent)?),
        }
    }
    Some(())
}

fn splice_child(old: &Mapping, new: &Mapping, entry: &Entry<'_>) -> Option<String> {
    if !entry.key_line.ends_with('\n') {
        return None;
    }
    let child_indent = entry
        .body
        .iter()
        .find(|line| is_content(line))
        .map(|line| indentation(line))?;
    if child_indent <= indentation(entry.key_line) {
        return None;
    }

    let mut text = entry.key_line.to_string();
    splice_mapping(old, new, entry.body, child_indent, &mut text)?;
    Some(text)
}

/// Split `lines` into the text before the first key and one entry per key at
/// `indent`. Fails when content sits left of `indent`.
fn split_entries<'a>(lines: &'a [&'a str], indent: usize) -> Option<(&'a [&'a str], Vec<Entry<'a>>)> {
    let mut keys = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if !is_content(line) {
            continue;
        }
        let depth = indentation(line);
        if depth < indent {
            return None;
        }
        if depth == indent && is_key_line(line) {
            keys.push(i);
        }
    }

    let Some(&first) = keys.first() else {
        return Some((lines, Vec::new()));
    };

    let mut entries = Vec::with_capacity(keys.len());
    let mut lead_start = first;
    for (n, &key) in keys.iter().enumerate() {
        let end = match keys.get(n + 1) {
            Some(&next) => lead_of(lines, next, indent),
            None => lines.len(),
        };
        entries.push(Entry {
            lead: &lines[lead_start..key],
            key_line: lines[key],
            body: &lines[key + 1..end],
        });
        lead_start = end;
    }
    Some((&lines[..first], entries))
}

/// Start of the comment and blank lines directly above the key at `key`.
fn lead_of(lines: &[&str], key: usize, indent: usize) -> usize {
    let mut start = key;
    while start > 0 {
        let line = lines[start - 1];
        let trimmed = line.trim();
        let attached =
            trimmed.is_empty() || (trimmed.starts_with('#') && indentation(line) <= indent);
        if !attached {
            break;
        }
        start -= 1;
    }
    start
}

/// Serialize `key: value` on its own, indented by `indent` spaces.
fn fresh_entry(key: &Value, value: &Value, indent: usize) -> Option<String> {
    let mut single = Mapping::new();
    single.insert(key.clone(), value.clone());
    let text = serde_yaml::to_string(&single).ok()?;

    let pad = " ".repeat(indent);
    Some(
        text.lines()
            .map(|line| {
                if line.is_empty() {
                    "\n".to_string()
                } else {
                    format!("{}{}\n", pad, line)
                }
            })
            .collect(),
    )
}

fn is_content(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

fn is_key_line(line: &str) -> bool {
    let trimmed = line.trim();
    !(trimmed == "-"
        || trimmed.starts_with("- ")
        || trimmed.starts_with("? ")
        || trimmed.starts_with(": ")
        || trimmed.starts_with("---")
        || trimmed.starts_with("...")
        || trimmed.starts_with('%'))
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn push_text(out: &mut String, text: &str) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(text);
}

fn push_lines(out: &mut String, lines: &[&str]) {
    for line in lines {
        push_text(out, line);
    }
}
