/*
 * positional.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Positional formatter.
//!
//! Renders templates of the form `{index[,alignment][:format]}`, the output
//! of [`rewrite`](crate::rewrite). `{{` and `}}` are literal braces. The
//! alignment pads with spaces: positive values right-align, negative values
//! left-align. The format specifier is handed to
//! [`FormatValue::render_with`].

use crate::error::{FormatError, FormatResult};
use crate::value::FormatValue;

/// Largest accepted alignment width, in either direction.
const MAX_ALIGNMENT: u64 = 999_999;

/// Render a positional template with the given arguments.
pub fn format_positional(template: &str, args: &[FormatValue]) -> FormatResult<String> {
    let mut output = String::with_capacity(template.len());
    let mut pos = 0;

    while let Some(i) = template[pos..].find(['{', '}']) {
        let at = pos + i;
        output.push_str(&template[pos..at]);
        let rest = &template[at..];

        if rest.starts_with("{{") {
            output.push('{');
            pos = at + 2;
        } else if rest.starts_with("}}") {
            output.push('}');
            pos = at + 2;
        } else if rest.starts_with('}') {
            return Err(invalid(at, "unexpected '}'"));
        } else {
            let close = rest
                .find('}')
                .ok_or_else(|| invalid(at, "unterminated placeholder"))?;
            let item = parse_item(&rest[1..close], at)?;
            let value = args.get(item.index).ok_or(FormatError::IndexOutOfRange {
                index: item.index,
                len: args.len(),
            })?;
            let text = value.render_with(item.spec)?;
            pad(&mut output, &text, item.alignment);
            pos = at + close + 1;
        }
    }

    output.push_str(&template[pos..]);
    Ok(output)
}

/// A parsed `{index,alignment:format}` item.
#[derive(Debug, PartialEq)]
struct FormatItem<'a> {
    index: usize,
    alignment: i64,
    spec: &'a str,
}

fn parse_item(inner: &str, offset: usize) -> FormatResult<FormatItem<'_>> {
    let (head, spec) = match inner.split_once(':') {
        Some((head, spec)) => (head, spec),
        None => (inner, ""),
    };
    let (index, alignment) = match head.split_once(',') {
        Some((index, alignment)) => (index, Some(alignment)),
        None => (head, None),
    };

    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid(offset, "expected an argument index"))?;
    let alignment = match alignment {
        Some(a) => a
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(offset, "expected an integer alignment"))?,
        None => 0,
    };
    if alignment.unsigned_abs() > MAX_ALIGNMENT {
        return Err(invalid(offset, "alignment out of range"));
    }

    Ok(FormatItem {
        index,
        alignment,
        spec,
    })
}

fn pad(output: &mut String, text: &str, alignment: i64) {
    let width = usize::try_from(alignment.unsigned_abs()).unwrap_or(usize::MAX);
    let fill = width.saturating_sub(text.chars().count());
    if alignment > 0 {
        output.extend(std::iter::repeat_n(' ', fill));
        output.push_str(text);
    } else {
        output.push_str(text);
        output.extend(std::iter::repeat_n(' ', fill));
    }
}

fn invalid(offset: usize, message: &str) -> FormatError {
    FormatError::InvalidFormatString {
        offset,
        message: message.to_string(),
    }
}
