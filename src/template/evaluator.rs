//! Expression evaluator seam.
//!
//! The engine never interprets expressions itself. After directives are
//! relocated the content stream is handed, as one markup string, to an
//! [`Evaluator`]; the evaluator's output must again be well-formed XML.

use super::config::Aliases;
use super::context::Context;
use crate::common::xml::unescape_xml;
use crate::common::{BoxError, Error, Result};
use aho_corasick::{AhoCorasick, MatchKind};

/// A template engine that renders the prepared content markup.
pub trait Evaluator {
    /// Opening and closing delimiters of a value expression, e.g. `("{{", "}}")`.
    ///
    /// The `_start_`/`_end_` aliases are rewritten to these before rendering.
    fn delimiters(&self) -> (&str, &str);

    /// Render `markup` with `context`.
    ///
    /// Substituted values must be XML-escaped by the evaluator.
    fn render(&self, markup: &str, context: &Context) -> std::result::Result<String, BoxError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn delimiters(&self) -> (&str, &str) {
        (**self).delimiters()
    }

    fn render(&self, markup: &str, context: &Context) -> std::result::Result<String, BoxError> {
        (**self).render(markup, context)
    }
}

/// Expression spans whose content is unescaped before rendering.
const EXPRESSION_SPANS: [(&str, &str); 3] = [("{{", "}}"), ("{%", "%}"), ("{#", "#}")];

/// Turn serialized content markup into evaluator input: rewrite delimiter
/// aliases, then XML-unescape the inside of every expression span so that
/// `{% if a &lt; b %}` reaches the evaluator as `{% if a < b %}`.
pub fn prepare_markup(markup: &str, aliases: &Aliases, delimiters: (&str, &str)) -> Result<String> {
    let substituted = substitute_aliases(markup, aliases, delimiters)?;
    Ok(unescape_expressions(&substituted))
}

fn substitute_aliases(markup: &str, aliases: &Aliases, (open, close): (&str, &str)) -> Result<String> {
    let mut patterns = Vec::with_capacity(2);
    let mut replacements = Vec::with_capacity(2);
    for (alias, delimiter) in [(aliases.start.as_str(), open), (aliases.end.as_str(), close)] {
        if !alias.is_empty() {
            patterns.push(alias);
            replacements.push(delimiter);
        }
    }
    if patterns.is_empty() {
        return Ok(markup.to_string());
    }
    let automaton = AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostFirst)
        .build(&patterns)
        .map_err(|e| Error::Config(format!("invalid delimiter alias: {e}")))?;
    Ok(automaton.replace_all(markup, &replacements))
}

/// XML-unescape the inside of `{{ }}`, `{% %}` and `{# #}` spans, leaving
/// everything outside them as is. An unterminated span is left untouched.
///
/// # Examples
///
/// ```
/// use sheet_stencil::template::evaluator::unescape_expressions;
///
/// assert_eq!(
///     unescape_expressions("<p>&amp;{{ a &gt; 1 }}</p>"),
///     "<p>&amp;{{ a > 1 }}</p>"
/// );
/// ```
pub fn unescape_expressions(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(start) = memchr::memchr(b'{', rest.as_bytes()) {
        let tail = &rest[start..];
        let Some(&(open, close)) = EXPRESSION_SPANS.iter().find(|(open, _)| tail.starts_with(open))
        else {
            out.push_str(&rest[..=start]);
            rest = &rest[start + 1..];
            continue;
        };
        let Some(end) = tail[open.len()..].find(close) else {
            break;
        };
        let inner_end = open.len() + end;
        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(&unescape_xml(&tail[open.len()..inner_end]));
        out.push_str(close);
        rest = &tail[inner_end + close.len()..];
    }
    out.push_str(rest);
    out
}
