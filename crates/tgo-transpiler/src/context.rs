//! State carried while generating a statement list.

use smol_str::SmolStr;

/// Identifiers generated writes refer to inside the current function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteNames {
    /// The context value; `None` in a template function whose context
    /// parameter has no usable name.
    pub ctx: Option<SmolStr>,
    /// Local name of the runtime package; `None` when every alias is
    /// shadowed.
    pub runtime: Option<SmolStr>,
    /// The context parameter is hidden by a binding.
    pub ctx_shadowed: bool,
}

/// A block generated around a tag header or body.
///
/// Scopes start out pending and are only written once an ordinary statement
/// appears inside them, so empty headers and bodies produce no block.
#[derive(Debug, Clone, Default)]
struct Scope {
    /// Indentation of the scope's braces, set once `{` has been written.
    opened_at: Option<String>,
}

/// Open tag scopes of one statement list, outermost first.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    /// Indentation of the outermost tag in the list.
    base: String,
}

impl ScopeStack {
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Push a pending scope. `indent` is the indentation of the statement
    /// opening it.
    pub fn push(&mut self, indent: &str) {
        if self.scopes.is_empty() {
            self.base = indent.to_string();
        }
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope, returning the indentation of its `}` if it
    /// was opened.
    ///
    /// # Panics
    ///
    /// Panics when no scope is open; tags are balanced by analysis.
    pub fn pop(&mut self) -> Option<String> {
        match self.scopes.pop() {
            Some(scope) => scope.opened_at,
            None => panic!("end tag without an open scope"),
        }
    }

    /// Indentation of generated statements, given the indentation of the
    /// source line being transformed.
    pub fn indent(&self, current: &str) -> String {
        match self.scopes.iter().rev().find_map(|s| s.opened_at.as_ref()) {
            Some(opened) => format!("{opened}\t"),
            None if self.scopes.is_empty() => current.to_string(),
            None => self.base.clone(),
        }
    }

    /// Open every pending scope. Returns the indentation for each `{` that
    /// must be written, outermost first.
    pub fn force(&mut self, current: &str) -> Vec<String> {
        let mut indent = self.indent(current);
        let mut opened = Vec::new();
        for scope in self.scopes.iter_mut().filter(|s| s.opened_at.is_none()) {
            scope.opened_at = Some(indent.clone());
            opened.push(indent.clone());
            indent.push('\t');
        }
        opened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pending_scopes_use_base_indent() {
        let mut stack = ScopeStack::default();
        assert_eq!(stack.indent("\n\t"), "\n\t");

        stack.push("\n\t");
        stack.push("\n\t\t");
        assert_eq!(stack.indent("\n\t\t\t"), "\n\t");
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_force_opens_outermost_first() {
        let mut stack = ScopeStack::default();
        stack.push("\n\t");
        stack.push("\n\t\t");
        assert_eq!(stack.force("\n\t\t\t"), vec!["\n\t", "\n\t\t"]);
        assert_eq!(stack.indent("\n"), "\n\t\t\t");
        assert!(stack.force("\n").is_empty());

        stack.push("\n\t\t\t");
        assert_eq!(stack.indent("\n"), "\n\t\t\t");
        assert_eq!(stack.force("\n"), vec!["\n\t\t\t"]);
        assert_eq!(stack.pop().as_deref(), Some("\n\t\t\t"));
        assert_eq!(stack.pop().as_deref(), Some("\n\t\t"));
    }

    #[test]
    #[should_panic(expected = "without an open scope")]
    fn test_pop_empty_panics() {
        ScopeStack::default().pop();
    }
}
