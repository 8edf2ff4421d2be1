//! Tree-sitter based scope index construction.

use super::{LineContext, ScopeIndex, ScopeKind, ScopeSpan};
use crate::source::SourceText;
use tree_sitter::{Node, Parser};

impl ScopeIndex {
    /// Build the per-line scope index for one file.
    ///
    /// Never fails: when the source does not parse cleanly, the index
    /// degrades to flat module scope for every line and records
    /// `syntax_error` so callers can surface the condition.
    pub fn build(source: &SourceText) -> Self {
        let mut index = Self::new(source.line_count());

        let mut parser = Parser::new();
        if parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .is_err()
        {
            log::warn!("grammar rejected by tree-sitter; scope attribution disabled");
            index.syntax_error = true;
            return index;
        }

        let Some(tree) = parser.parse(source.text(), None) else {
            index.syntax_error = true;
            return index;
        };

        let root = tree.root_node();
        if root.has_error() {
            log::warn!("syntax error in source; scope attribution degraded to module level");
            index.syntax_error = true;
            return index;
        }

        collect_spans(root, source.text(), None, &mut index.spans);
        index.resolve_lines();
        index
    }

    /// Resolve the innermost covering span and context names for every line.
    ///
    /// Spans are in pre-order, so any span written after another one it
    /// overlaps is nested inside it; overwriting per line leaves the deepest
    /// definition as the final value.
    fn resolve_lines(&mut self) {
        let line_count = self.line_contexts.len() as u32;
        for idx in 0..self.spans.len() {
            let (start, end) = {
                let span = &self.spans[idx];
                (span.start_line, span.end_line.min(line_count))
            };
            for line in start..=end {
                self.set_line_span(line, idx);
            }
        }

        for line_idx in 0..self.line_contexts.len() {
            let Some(innermost) = self.line_spans[line_idx] else {
                continue;
            };
            let mut context = LineContext {
                kind: self.spans[innermost].kind,
                ..LineContext::default()
            };
            let mut current = Some(innermost);
            while let Some(idx) = current {
                let span = &self.spans[idx];
                match span.kind {
                    ScopeKind::Function if context.enclosing_function.is_none() => {
                        context.enclosing_function = Some(span.name.clone());
                    }
                    ScopeKind::Class if context.enclosing_class.is_none() => {
                        context.enclosing_class = Some(span.name.clone());
                    }
                    _ => {}
                }
                current = span.parent;
            }
            self.line_contexts[line_idx] = context;
        }
    }
}

/// Walk a node's children collecting class/function definitions into the arena.
fn collect_spans(node: Node, source: &str, parent: Option<usize>, spans: &mut Vec<ScopeSpan>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_definition(child, source, parent, spans);
    }
}

fn collect_definition(node: Node, source: &str, parent: Option<usize>, spans: &mut Vec<ScopeSpan>) {
    match node.kind() {
        "class_definition" | "function_definition" => {
            push_span(node, node.start_position().row, source, parent, spans);
        }
        "decorated_definition" => {
            // The span starts at the decorator since it is part of the definition.
            let mut cursor = node.walk();
            for inner in node.children(&mut cursor) {
                if matches!(inner.kind(), "class_definition" | "function_definition") {
                    push_span(inner, node.start_position().row, source, parent, spans);
                    return;
                }
            }
        }
        // Definitions can hide inside if/try/with blocks at any depth.
        _ => collect_spans(node, source, parent, spans),
    }
}

fn push_span(
    definition: Node,
    start_row: usize,
    source: &str,
    parent: Option<usize>,
    spans: &mut Vec<ScopeSpan>,
) {
    let Some(name) = find_child_text(definition, "name", source) else {
        return;
    };
    let kind = if definition.kind() == "class_definition" {
        ScopeKind::Class
    } else {
        ScopeKind::Function
    };

    let index = spans.len();
    spans.push(ScopeSpan {
        name,
        kind,
        start_line: start_row as u32 + 1,
        end_line: definition.end_position().row as u32 + 1,
        parent,
    });
    collect_spans(definition, source, Some(index), spans);
}

/// Find a named child field and return its text.
fn find_child_text(node: Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| source[n.byte_range()].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(source: &str) -> ScopeIndex {
        ScopeIndex::build(&SourceText::new(source))
    }

    #[test]
    fn test_module_level_lines_have_no_enclosing_names() {
        let index = index_of("x = 1\ny = 2\n");
        assert!(!index.syntax_error);
        assert!(index.spans.is_empty());
        let ctx = index.context(1).unwrap();
        assert_eq!(ctx.kind, ScopeKind::Module);
        assert!(ctx.enclosing_class.is_none());
        assert!(ctx.enclosing_function.is_none());
    }

    #[test]
    fn test_innermost_definition_wins() {
        let source = "\
class Outer:
    def method(self):
        def inner():
            return 1
        return inner()
";
        let index = index_of(source);

        // Line 4 sits inside inner(), which sits inside method(), which sits
        // inside Outer.
        let ctx = index.context(4).unwrap();
        assert_eq!(ctx.kind, ScopeKind::Function);
        assert_eq!(ctx.enclosing_function.as_deref(), Some("inner"));
        assert_eq!(ctx.enclosing_class.as_deref(), Some("Outer"));

        // Line 5 is back in method().
        let ctx = index.context(5).unwrap();
        assert_eq!(ctx.enclosing_function.as_deref(), Some("method"));
        assert_eq!(ctx.enclosing_class.as_deref(), Some("Outer"));
    }

    #[test]
    fn test_class_body_line_outside_methods() {
        let source = "\
class Config:
    retries = 3

    def reload(self):
        pass
";
        let index = index_of(source);
        let ctx = index.context(2).unwrap();
        assert_eq!(ctx.kind, ScopeKind::Class);
        assert_eq!(ctx.enclosing_class.as_deref(), Some("Config"));
        assert!(ctx.enclosing_function.is_none());
    }

    #[test]
    fn test_class_nested_in_function() {
        let source = "\
def build():
    class Widget:
        size = 1
    return Widget
";
        let index = index_of(source);
        let ctx = index.context(3).unwrap();
        assert_eq!(ctx.kind, ScopeKind::Class);
        assert_eq!(ctx.enclosing_class.as_deref(), Some("Widget"));
        assert_eq!(ctx.enclosing_function.as_deref(), Some("build"));
    }

    #[test]
    fn test_decorated_definition_spans_the_decorator() {
        let source = "\
@cached
def lookup(key):
    return key
";
        let index = index_of(source);
        assert_eq!(index.spans.len(), 1);
        let span = index.span(0);
        assert_eq!(span.name, "lookup");
        assert_eq!(span.start_line, 1);
        assert_eq!(span.end_line, 3);
        assert_eq!(
            index.context(1).unwrap().enclosing_function.as_deref(),
            Some("lookup")
        );
    }

    #[test]
    fn test_async_function_is_a_function() {
        let index = index_of("async def fetch():\n    return 1\n");
        assert_eq!(index.spans.len(), 1);
        assert_eq!(index.span(0).kind, ScopeKind::Function);
        assert_eq!(index.span(0).name, "fetch");
    }

    #[test]
    fn test_definition_inside_conditional_block() {
        let source = "\
if True:
    def guarded():
        pass
";
        let index = index_of(source);
        assert_eq!(index.spans.len(), 1);
        assert_eq!(
            index.context(3).unwrap().enclosing_function.as_deref(),
            Some("guarded")
        );
    }

    #[test]
    fn test_syntax_error_degrades_to_module_scope() {
        let index = index_of("def broken(:\n    pass\n");
        assert!(index.syntax_error);
        assert!(index.spans.is_empty());
        for line in 1..=3 {
            let ctx = index.context(line).unwrap();
            assert_eq!(ctx.kind, ScopeKind::Module);
            assert!(ctx.enclosing_class.is_none());
            assert!(ctx.enclosing_function.is_none());
        }
    }

    #[test]
    fn test_top_level_spans_in_source_order() {
        let source = "\
def first():
    pass

class Second:
    def method(self):
        pass

def third():
    pass
";
        let index = index_of(source);
        let tops: Vec<&str> = index
            .top_level_spans()
            .into_iter()
            .map(|idx| index.span(idx).name.as_str())
            .collect();
        assert_eq!(tops, vec!["first", "Second", "third"]);
    }
}
