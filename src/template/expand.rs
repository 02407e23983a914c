//! Template expansion.

use super::{Bindings, Expression, Modifier, Operator, Segment, Template, Value, VarSpec};
use tracing::debug;

/// Characters RFC 3986 reserves; `{+var}` and `{#var}` pass them through.
const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

impl Template {
    /// Expand the template against `bindings`.
    ///
    /// Pure: identical inputs always produce byte-identical output.
    pub fn expand(&self, bindings: &Bindings) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        let mut query_open = false;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    out.push_str(text);
                    query_open |= text.contains('?');
                }
                Segment::Expression(expression) => {
                    let start = out.len();
                    let emitted = expand_expression(expression, bindings, query_open, &mut out);
                    // Reserved expansions can carry a literal '?'.
                    query_open |= (emitted && expression.operator.is_query())
                        || out[start..].contains('?');
                }
            }
        }

        debug!(template = %self.source, url = %out, "Expanded URI template");
        out
    }
}

/// Append one expression to `out`. Returns whether anything was emitted.
fn expand_expression(
    expression: &Expression,
    bindings: &Bindings,
    query_open: bool,
    out: &mut String,
) -> bool {
    let operator = expression.operator;
    let first = match operator {
        Operator::Query if query_open => "&",
        _ => operator.first(),
    };

    let mut emitted = false;
    for var in &expression.variables {
        let value = match bindings.get(&var.name) {
            Some(value) if !value.is_undefined() => value,
            _ => continue,
        };

        out.push_str(if emitted { operator.separator() } else { first });
        emitted = true;

        match value {
            Value::String(s) => expand_scalar(operator, var, s, out),
            Value::List(items) => expand_list(operator, var, items, out),
            Value::Assoc(pairs) => expand_assoc(operator, var, pairs, out),
        }
    }
    emitted
}

fn expand_scalar(operator: Operator, var: &VarSpec, value: &str, out: &mut String) {
    if operator.named() {
        out.push_str(&var.name);
        if value.is_empty() {
            out.push_str(operator.if_empty());
            return;
        }
        out.push('=');
    }

    let value = match var.modifier {
        Modifier::Prefix(length) => truncate_chars(value, length),
        _ => value,
    };
    out.push_str(&encode(value, operator.allows_reserved()));
}

fn expand_list(operator: Operator, var: &VarSpec, items: &[String], out: &mut String) {
    let reserved = operator.allows_reserved();

    if var.modifier != Modifier::Explode {
        if operator.named() {
            out.push_str(&var.name);
            out.push('=');
        }
        let joined: Vec<String> = items.iter().map(|item| encode(item, reserved)).collect();
        out.push_str(&joined.join(","));
        return;
    }

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(operator.separator());
        }
        if operator.named() {
            out.push_str(&var.name);
            if item.is_empty() {
                out.push_str(operator.if_empty());
                continue;
            }
            out.push('=');
        }
        out.push_str(&encode(item, reserved));
    }
}

fn expand_assoc(operator: Operator, var: &VarSpec, pairs: &[(String, String)], out: &mut String) {
    let reserved = operator.allows_reserved();

    if var.modifier != Modifier::Explode {
        if operator.named() {
            out.push_str(&var.name);
            out.push('=');
        }
        let joined: Vec<String> = pairs
            .iter()
            .flat_map(|(k, v)| [encode(k, reserved), encode(v, reserved)])
            .collect();
        out.push_str(&joined.join(","));
        return;
    }

    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push_str(operator.separator());
        }
        out.push_str(&encode(key, reserved));
        if operator.named() && value.is_empty() {
            out.push_str(operator.if_empty());
            continue;
        }
        out.push('=');
        out.push_str(&encode(value, reserved));
    }
}

fn truncate_chars(value: &str, length: usize) -> &str {
    match value.char_indices().nth(length) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// Percent-encode everything outside the unreserved set. With
/// `allow_reserved`, reserved characters and existing `%XX` triplets are
/// kept as they are.
fn encode(value: &str, allow_reserved: bool) -> String {
    if !allow_reserved {
        return urlencoding::encode(value).into_owned();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(c) = rest.chars().next() {
        if c == '%' && is_pct_triplet(rest) {
            out.push_str(&rest[..3]);
            rest = &rest[3..];
            continue;
        }
        if RESERVED.contains(c) {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn is_pct_triplet(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 3 && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit()
}
