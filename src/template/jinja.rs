//! Bundled evaluator backed by MiniJinja.
//!
//! Substituted values are HTML-escaped, which is also valid XML escaping, so
//! a value such as `R&D` cannot break the rendered content stream. The
//! position tracker is exposed as an object: `tbl.row` and `tbl.col` read
//! the cursor, and `increment_row`, `increment_col`, `set_row` and `set_col`
//! (or their camel-case spellings `IncRow`, `IncCol`, `SetRow`, `SetCol`)
//! move it.

use super::context::{Context, ContextValue};
use super::evaluator::Evaluator;
use super::tracker::PositionTracker;
use crate::common::BoxError;
use minijinja::value::{Enumerator, Object, ObjectRepr, Value, from_args};
use minijinja::{AutoEscape, Environment, ErrorKind, State};
use std::sync::Arc;

/// [`Evaluator`] rendering with a MiniJinja [`Environment`].
#[derive(Debug)]
pub struct MiniJinjaEvaluator {
    env: Environment<'static>,
}

impl MiniJinjaEvaluator {
    /// Create an evaluator with a default environment.
    pub fn new() -> Self {
        Self::with_environment(Environment::new())
    }

    /// Wrap a preconfigured environment (custom filters, functions,
    /// globals). Auto-escaping is forced on for every template.
    pub fn with_environment(mut env: Environment<'static>) -> Self {
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self { env }
    }
}

impl Default for MiniJinjaEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn to_value(value: &ContextValue) -> Value {
    match value {
        ContextValue::Data(data) => Value::from_serialize(data),
        ContextValue::Tracker(tracker) => Value::from_dyn_object(tracker.clone()),
    }
}

impl Evaluator for MiniJinjaEvaluator {
    fn delimiters(&self) -> (&str, &str) {
        ("{{", "}}")
    }

    fn render(&self, markup: &str, context: &Context) -> Result<String, BoxError> {
        let ctx: Value = context
            .iter()
            .map(|(key, value)| (key.to_string(), to_value(value)))
            .collect();
        self.env
            .render_str(markup, ctx)
            .map_err(|e| Box::new(e) as BoxError)
    }
}

impl Object for PositionTracker {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "row" => Some(Value::from(self.row())),
            "col" => Some(Value::from(self.col())),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(&["row", "col"])
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, minijinja::Error> {
        let result = match method {
            "increment_row" | "IncRow" => {
                let (delta,): (Option<i64>,) = from_args(args)?;
                self.increment_row(delta.unwrap_or(1))
            },
            "increment_col" | "IncCol" => {
                let (delta,): (Option<i64>,) = from_args(args)?;
                self.increment_col(delta.unwrap_or(1))
            },
            "set_row" | "SetRow" => {
                let (row,): (i64,) = from_args(args)?;
                self.set_row(row)
            },
            "set_col" | "SetCol" => {
                let (col,): (i64,) = from_args(args)?;
                self.set_col(col)
            },
            _ => {
                return Err(minijinja::Error::new(
                    ErrorKind::UnknownMethod,
                    format!("position tracker has no method named {method}"),
                ));
            },
        };
        Ok(Value::from(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, context: &Context) -> Result<String, BoxError> {
        MiniJinjaEvaluator::new().render(template, context)
    }

    #[test]
    fn test_values_are_escaped() {
        let mut context = Context::new();
        context.insert("dept", json!("R&D <east>"));
        assert_eq!(render("<p>{{ dept }}</p>", &context).unwrap(), "<p>R&amp;D &lt;east&gt;</p>");
    }

    #[test]
    fn test_tracker_methods_and_attributes() {
        let tracker = Arc::new(PositionTracker::new());
        let mut context = Context::new();
        context.insert_tracker("tbl", tracker.clone());
        let out = render(
            "{{ tbl.increment_row() }}{{ tbl.IncRow(2) }}{{ tbl.SetCol(4) }}{{ tbl.IncCol() }}{{ tbl.row }},{{ tbl.col }}",
            &context,
        )
        .unwrap();
        assert_eq!(out, "2,5");
        assert_eq!((tracker.row(), tracker.col()), (2, 5));

        render("{{ tbl.set_row(9) }}", &context).unwrap();
        assert_eq!(tracker.row(), 9);
    }

    #[test]
    fn test_unknown_tracker_method_fails() {
        let mut context = Context::new();
        context.insert_tracker("tbl", Arc::new(PositionTracker::new()));
        assert!(render("{{ tbl.jump() }}", &context).is_err());
    }

    #[test]
    fn test_syntax_error_is_reported() {
        assert!(render("{% for x in %}", &Context::new()).is_err());
    }
}
