/*
 * tokenizer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Named-placeholder tokenizer and rewriter.
//!
//! Scans a template once, left to right, and rewrites every named
//! placeholder into a positional one:
//!
//! ```text
//! "Hello {name}, you owe {amount:N2}"  ->  "Hello {0}, you owe {1:N2}"
//!                                          args = [name, amount]
//! ```
//!
//! Everything after the first `:` or `,` inside a placeholder (the trailer)
//! is copied untouched for the positional formatter. The output is always in
//! positional syntax, so literal braces stay escaped (`{{` / `}}`) until the
//! positional formatter renders them.

use serde::Serialize;

use crate::error::{FormatError, FormatResult};
use crate::options::FormatOptions;
use crate::positional::format_positional;
use crate::resolver::KeyResolver;
use crate::traversal::traverse;
use crate::value::FormatValue;

/// Characters that end a key path and start a trailer.
const TRAILER_START: [char; 2] = [':', ','];

/// A template rewritten into positional form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rewritten {
    /// The template with key paths replaced by argument indices.
    pub template: String,

    /// One argument per placeholder occurrence, in template order.
    pub args: Vec<FormatValue>,
}

impl Rewritten {
    /// Render the positional template with its arguments.
    pub fn render(&self) -> FormatResult<String> {
        format_positional(&self.template, &self.args)
    }
}

/// States of the custom-marker scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Copying literal text.
    Normal,
    /// Just past an opening marker, reading a key path.
    EnterKey,
    /// Inside a trailer, looking for a multi-character closing marker.
    Closing,
}

/// Rewrite `template` into positional form, resolving every key path.
///
/// The resolver is called once per placeholder occurrence, left to right.
/// Repeated keys are resolved again and get their own argument slot.
pub fn rewrite<R: KeyResolver + ?Sized>(
    template: &str,
    resolver: &R,
    options: &FormatOptions<'_>,
) -> FormatResult<Rewritten> {
    let mut scanner = Scanner {
        template,
        pos: 0,
        placeholder_start: 0,
        output: String::with_capacity(template.len()),
        args: Vec::new(),
        resolver,
        options,
    };

    if options.markers.is_default() {
        scanner.scan_braces()?;
    } else {
        scanner.scan_markers()?;
    }

    tracing::trace!(
        positional = %scanner.output,
        args = scanner.args.len(),
        "Rewrote named template"
    );
    Ok(Rewritten {
        template: scanner.output,
        args: scanner.args,
    })
}

/// Call-local scanning state.
struct Scanner<'t, 'o, 'a, R: ?Sized> {
    template: &'t str,
    pos: usize,
    placeholder_start: usize,
    output: String,
    args: Vec<FormatValue>,
    resolver: &'t R,
    options: &'o FormatOptions<'a>,
}

impl<R: KeyResolver + ?Sized> Scanner<'_, '_, '_, R> {
    /// Scan with the default single-character `{` / `}` markers.
    fn scan_braces(&mut self) -> FormatResult<()> {
        let template = self.template;
        loop {
            let rest = &template[self.pos..];
            let Some(i) = rest.find('{') else {
                self.output.push_str(rest);
                return Ok(());
            };
            self.output.push_str(&rest[..=i]);
            self.placeholder_start = self.pos + i;
            self.pos += i + 1;

            let rest = &template[self.pos..];
            if rest.starts_with('{') {
                // `{{` stays escaped for the positional formatter
                self.output.push('{');
                self.pos += 1;
                continue;
            }

            let end = rest
                .find(['}', ':', ','])
                .ok_or_else(|| FormatError::unterminated(self.placeholder_start))?;
            let key_path = &rest[..end];

            if rest[end..].starts_with('}') {
                self.push_argument(key_path)?;
                self.output.push('}');
                self.pos += end + 1;
            } else {
                let trailer = &rest[end..];
                let close = trailer
                    .find('}')
                    .ok_or_else(|| FormatError::unterminated(self.placeholder_start))?;
                self.push_argument(key_path)?;
                self.output.push_str(&trailer[..=close]);
                self.pos += end + close + 1;
            }
        }
    }

    /// Scan with custom markers, which may be several characters long.
    fn scan_markers(&mut self) -> FormatResult<()> {
        let template = self.template;
        let options = self.options;
        let (open, close) = (options.markers.open(), options.markers.close());
        let mut state = ScanState::Normal;
        loop {
            let rest = &template[self.pos..];
            match state {
                ScanState::Normal => match rest.find(open) {
                    None => {
                        push_escaped(&mut self.output, rest);
                        return Ok(());
                    }
                    Some(i) => {
                        push_escaped(&mut self.output, &rest[..i]);
                        self.output.push('{');
                        self.placeholder_start = self.pos + i;
                        self.pos += i + open.len();
                        state = ScanState::EnterKey;
                    }
                },
                ScanState::EnterKey => {
                    let c = rest
                        .find(close)
                        .ok_or_else(|| FormatError::unterminated(self.placeholder_start))?;
                    // Trailer characters only count before the closing marker
                    match rest[..c].find(TRAILER_START) {
                        None => {
                            self.push_argument(&rest[..c])?;
                            self.output.push('}');
                            self.pos += c + close.len();
                            state = ScanState::Normal;
                        }
                        Some(t) => {
                            self.push_argument(&rest[..t])?;
                            self.output.push_str(&rest[t..=t]);
                            self.pos += t + 1;
                            state = ScanState::Closing;
                        }
                    }
                }
                ScanState::Closing => {
                    let c = rest
                        .find(close)
                        .ok_or_else(|| FormatError::unterminated(self.placeholder_start))?;
                    push_escaped(&mut self.output, &rest[..c]);
                    self.output.push('}');
                    self.pos += c + close.len();
                    state = ScanState::Normal;
                }
            }
        }
    }

    /// Resolve a key path, store its value, and write its index.
    fn push_argument(&mut self, key_path: &str) -> FormatResult<()> {
        let value = self.resolve_path(key_path)?;
        let index = self.args.len();
        self.args.push(value);
        self.output.push_str(&index.to_string());
        Ok(())
    }

    fn resolve_path(&self, key_path: &str) -> FormatResult<FormatValue> {
        let (key, members) = match key_path.split_once('.') {
            Some((key, rest)) => (key, rest.split('.').collect::<Vec<_>>()),
            None => (key_path, Vec::new()),
        };

        let root = self
            .resolver
            .resolve(key)
            .or_else(|| self.options.fallback.and_then(|f| f.resolve(key)))
            .ok_or_else(|| FormatError::KeyNotFound {
                key: key.to_string(),
            })?;

        if members.is_empty() {
            return Ok(root);
        }

        let outcome = traverse(root, &members, self.options.member_reader);
        self.options.policy.apply(outcome, key_path)
    }
}

/// Copy literal text, doubling braces so they survive positional formatting.
fn push_escaped(output: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '{' => output.push_str("{{"),
            '}' => output.push_str("}}"),
            _ => output.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Markers;
    use crate::resolver::MapResolver;
    use crate::traversal::TraversalPolicy;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::sync::Mutex;

    fn resolver() -> MapResolver {
        MapResolver::from_pairs([
            ("abc", FormatValue::Int(123)),
            ("defgh", FormatValue::from("<T>")),
            ("ijkl", FormatValue::from("XYZ")),
            ("", FormatValue::from("anonymous")),
        ])
    }

    fn rewrite_default(template: &str) -> FormatResult<Rewritten> {
        rewrite(template, &resolver(), &FormatOptions::default())
    }

    #[test]
    fn test_literal_text_is_unchanged() {
        for template in ["", "plain text", "no placeholders here: a, b. c"] {
            let rewritten = rewrite_default(template).unwrap();
            assert_eq!(rewritten.template, template);
            assert!(rewritten.args.is_empty());
        }
    }

    #[test]
    fn test_occurrence_order() {
        let rewritten = rewrite_default("AAA{defgh}BBB{abc}CCC{ijkl}DDD").unwrap();
        assert_eq!(rewritten.template, "AAA{0}BBB{1}CCC{2}DDD");
        assert_eq!(
            rewritten.args,
            vec![
                FormatValue::from("<T>"),
                FormatValue::Int(123),
                FormatValue::from("XYZ"),
            ]
        );
    }

    #[test]
    fn test_repeated_keys_get_separate_slots() {
        let calls = RefCell::new(Vec::new());
        let counting = |key: &str| {
            calls.borrow_mut().push(key.to_string());
            Some(FormatValue::from(key))
        };
        let rewritten = rewrite("{a}{a}{b}{a}", &counting, &FormatOptions::default()).unwrap();

        assert_eq!(rewritten.template, "{0}{1}{2}{3}");
        assert_eq!(rewritten.args.len(), 4);
        assert_eq!(*calls.borrow(), vec!["a", "a", "b", "a"]);
    }

    #[test]
    fn test_empty_key() {
        let rewritten = rewrite_default("{}").unwrap();
        assert_eq!(rewritten.template, "{0}");
        assert_eq!(rewritten.args, vec![FormatValue::from("anonymous")]);
    }

    #[test]
    fn test_trailer_passes_through() {
        let rewritten = rewrite_default("{abc:yyyyMMdd} {abc,10} {abc,-5:X4}").unwrap();
        assert_eq!(rewritten.template, "{0:yyyyMMdd} {1,10} {2,-5:X4}");
        assert_eq!(rewritten.args.len(), 3);
    }

    #[test]
    fn test_trailer_may_contain_dots_and_commas() {
        let rewritten = rewrite_default("{abc:#,##0.00}").unwrap();
        assert_eq!(rewritten.template, "{0:#,##0.00}");
    }

    #[test]
    fn test_escaped_braces_stay_escaped() {
        let rewritten = rewrite_default("{{abc}}").unwrap();
        assert_eq!(rewritten.template, "{{abc}}");
        assert!(rewritten.args.is_empty());
        assert_eq!(rewritten.render().unwrap(), "{abc}");
    }

    #[test]
    fn test_escape_next_to_placeholder() {
        let rewritten = rewrite_default("{{{abc}}}").unwrap();
        assert_eq!(rewritten.template, "{{{0}}}");
        assert_eq!(rewritten.render().unwrap(), "{123}");
    }

    #[test]
    fn test_unterminated_placeholder() {
        for template in ["{abc", "text {", "{abc:XYZ", "ok {abc} then {ijkl,5"] {
            let err = rewrite_default(template).unwrap_err();
            assert!(
                matches!(err, FormatError::Syntax { .. }),
                "expected syntax error for {template:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_unterminated_ignores_resolver() {
        let never = |_: &str| -> Option<FormatValue> { panic!("resolver must not be called") };
        let err = rewrite("{abc:XYZ", &never, &FormatOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::Syntax { offset: 0, .. }));
    }

    #[test]
    fn test_syntax_error_offset() {
        let err = rewrite_default("abc {abc} {x").unwrap_err();
        assert!(matches!(err, FormatError::Syntax { offset: 10, .. }));
    }

    #[test]
    fn test_key_not_found() {
        let err = rewrite_default("{missing.member}").unwrap_err();
        assert!(matches!(err, FormatError::KeyNotFound { ref key } if key == "missing"));
    }

    #[test]
    fn test_fallback_receives_first_segment() {
        let seen = Mutex::new(Vec::new());
        let fallback = |key: &str| {
            seen.lock().unwrap().push(key.to_string());
            Some(FormatValue::from(serde_json::json!({ "inner": "found" })))
        };
        let options = FormatOptions::default().with_fallback(&fallback);
        let rewritten = rewrite("{missing.inner}", &resolver(), &options).unwrap();

        assert_eq!(rewritten.args, vec![FormatValue::from("found")]);
        assert_eq!(*seen.lock().unwrap(), vec!["missing"]);
    }

    #[test]
    fn test_fallback_not_used_when_primary_hits() {
        let fallback = |_: &str| -> Option<FormatValue> { panic!("fallback must not be called") };
        let options = FormatOptions::default().with_fallback(&fallback);
        let rewritten = rewrite("{abc}", &resolver(), &options).unwrap();
        assert_eq!(rewritten.args, vec![FormatValue::Int(123)]);
    }

    #[test]
    fn test_fallback_miss_is_key_not_found() {
        let fallback = |_: &str| -> Option<FormatValue> { None };
        let options = FormatOptions::default().with_fallback(&fallback);
        let err = rewrite("{nope}", &resolver(), &options).unwrap_err();
        assert!(matches!(err, FormatError::KeyNotFound { .. }));
    }

    #[test]
    fn test_dotted_traversal() {
        let resolver = MapResolver::from_pairs([(
            "a",
            FormatValue::from(serde_json::json!({ "b": { "c": 42 } })),
        )]);
        let rewritten = rewrite("{a.b.c:D4}", &resolver, &FormatOptions::default()).unwrap();
        assert_eq!(rewritten.template, "{0:D4}");
        assert_eq!(rewritten.args, vec![FormatValue::Int(42)]);
        assert_eq!(rewritten.render().unwrap(), "0042");
    }

    #[test]
    fn test_invalid_member_policy() {
        let resolver = MapResolver::from_pairs([("a", FormatValue::from(serde_json::json!({})))]);

        let lenient = FormatOptions::default();
        let rewritten = rewrite("[{a.nonexistent}]", &resolver, &lenient).unwrap();
        assert_eq!(rewritten.args, vec![FormatValue::Null]);
        assert_eq!(rewritten.render().unwrap(), "[]");

        let strict = FormatOptions::default().with_ignore_invalid_property_path(false);
        let err = rewrite("[{a.nonexistent}]", &resolver, &strict).unwrap_err();
        assert!(
            matches!(err, FormatError::InvalidPropertyPath { ref member, .. } if member == "nonexistent")
        );
    }

    #[test]
    fn test_null_root_policy() {
        let resolver = MapResolver::from_pairs([("a", FormatValue::Null)]);

        let rewritten = rewrite("{a.b}", &resolver, &FormatOptions::default()).unwrap();
        assert_eq!(rewritten.args, vec![FormatValue::Null]);

        let strict = FormatOptions::default().with_policy(TraversalPolicy::strict());
        let err = rewrite("{a.b}", &resolver, &strict).unwrap_err();
        assert!(matches!(err, FormatError::TraversalTerminated { .. }));
    }

    #[test]
    fn test_null_without_members_is_fine_even_when_strict() {
        let resolver = MapResolver::from_pairs([("a", FormatValue::Null)]);
        let strict = FormatOptions::default().strict();
        let rewritten = rewrite("<{a}>", &resolver, &strict).unwrap();
        assert_eq!(rewritten.render().unwrap(), "<>");
    }

    #[test]
    fn test_lone_closing_brace_is_copied() {
        let rewritten = rewrite_default("a}}b").unwrap();
        assert_eq!(rewritten.template, "a}}b");
        assert_eq!(rewritten.render().unwrap(), "a}b");
    }

    #[test]
    fn test_multibyte_text() {
        let rewritten = rewrite_default("héllo {ijkl} wörld").unwrap();
        assert_eq!(rewritten.template, "héllo {0} wörld");
    }

    fn custom(open: &str, close: &str) -> FormatOptions<'static> {
        FormatOptions::default().with_markers(Markers::new(open, close).unwrap())
    }

    #[test]
    fn test_custom_markers() {
        let rewritten = rewrite("AAA<<defgh>>BBB<<abc>>", &resolver(), &custom("<<", ">>")).unwrap();
        assert_eq!(rewritten.template, "AAA{0}BBB{1}");
        assert_eq!(
            rewritten.args,
            vec![FormatValue::from("<T>"), FormatValue::Int(123)]
        );
    }

    #[test]
    fn test_custom_markers_with_trailer() {
        let rewritten = rewrite("[% abc:X4 %] [%abc,6%]", &resolver(), &custom("[%", "%]"));
        // Keys are not trimmed; " abc" is a different key
        assert!(matches!(rewritten, Err(FormatError::KeyNotFound { .. })));

        let rewritten = rewrite("[%abc:X4%] [%abc,6%]", &resolver(), &custom("[%", "%]")).unwrap();
        assert_eq!(rewritten.template, "{0:X4} {1,6}");
        assert_eq!(rewritten.render().unwrap(), "007B    123");
    }

    #[test]
    fn test_custom_markers_escape_literal_braces() {
        let rewritten = rewrite("{ {{ <<abc>> }", &resolver(), &custom("<<", ">>")).unwrap();
        assert_eq!(rewritten.template, "{{ {{{{ {0} }}");
        assert_eq!(rewritten.render().unwrap(), "{ {{ 123 }");
    }

    #[test]
    fn test_custom_markers_do_not_escape() {
        // `<<<<` is an opening marker followed by a key starting with `<<`
        let any = |key: &str| Some(FormatValue::from(format!("[{key}]")));
        let rewritten = rewrite("<<<<x>>", &any, &custom("<<", ">>")).unwrap();
        assert_eq!(rewritten.args, vec![FormatValue::from("[<<x]")]);
    }

    #[test]
    fn test_custom_markers_unterminated() {
        for template in ["<<abc", "<<abc>", "<<abc:X4>"] {
            let err = rewrite(template, &resolver(), &custom("<<", ">>")).unwrap_err();
            assert!(matches!(err, FormatError::Syntax { .. }), "{template:?}");
        }
    }

    #[test]
    fn test_custom_single_char_markers() {
        let rewritten = rewrite("$abc$ costs", &resolver(), &custom("$", "$")).unwrap();
        assert_eq!(rewritten.template, "{0} costs");
    }

    #[test]
    fn test_custom_markers_ignore_separators_after_close() {
        let rewritten = rewrite("<<abc>> a:b, c", &resolver(), &custom("<<", ">>")).unwrap();
        assert_eq!(rewritten.template, "{0} a:b, c");
        assert_eq!(rewritten.args, vec![FormatValue::Int(123)]);
    }

    #[test]
    fn test_long_custom_marker_template() {
        // Scanning must stay linear in the template length
        let count = 100_000;
        let template = "<<abc>>".repeat(count);
        let rewritten = rewrite(&template, &resolver(), &custom("<<", ">>")).unwrap();

        assert_eq!(rewritten.args.len(), count);
        assert!(rewritten.template.starts_with("{0}{1}{2}"));
        assert!(rewritten.template.ends_with(&format!("{{{}}}", count - 1)));
    }
}
