//! Per-wrapper builder collecting generated C fragments.
//!
//! One [`CodeAccumulator`] is created per wrapped function, threaded by
//! `&mut` through every parameter's emission in declaration order, then the
//! single return emission, then rendered and discarded. It is deliberately
//! not synchronized: one accumulator belongs to exactly one generation pass.

use rustc_hash::FxHashMap;

/// Python reserved words. Parameter names colliding with one get a `_`
/// suffix in the keyword array so the generated wrapper stays importable.
const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "exec", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "not", "or", "pass", "print", "raise",
    "return", "try", "while", "with", "yield",
];

fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// C variable table: one declaration statement per distinct C type,
/// comma-joined declarators.
///
/// First-seen order is preserved at both levels (across types and within a
/// type's declarators), so repeated generation of the same parameter list is
/// byte-identical and the emitted files diff cleanly. Adding a declarator
/// that is already present for its type is a no-op.
#[derive(Debug, Default)]
pub struct VarBlock {
    index: FxHashMap<String, usize>,
    entries: Vec<(String, Vec<String>)>,
}

impl VarBlock {
    pub fn add(&mut self, ctype: &str, declarator: &str) {
        let slot = match self.index.get(ctype) {
            Some(&slot) => slot,
            None => {
                self.entries.push((ctype.to_string(), Vec::new()));
                self.index.insert(ctype.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let declarators = &mut self.entries[slot].1;
        if !declarators.iter().any(|d| d == declarator) {
            declarators.push(declarator.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the declaration block, with a trailing blank line when
    /// non-empty.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for (ctype, declarators) in &self.entries {
            out.push_str("    ");
            out.push_str(ctype);
            out.push(' ');
            out.push_str(&declarators.join(", "));
            out.push_str(";\n");
        }
        out.push('\n');
        out
    }
}

/// Mutable, single-pass builder for one wrapper's fragments.
#[derive(Debug, Default)]
pub struct CodeAccumulator {
    varlist: VarBlock,
    parse_format: String,
    parse_refs: Vec<String>,
    kwlist: Vec<String>,
    code_before: Vec<String>,
    code_after: Vec<String>,
    call_args: Vec<String>,
}

impl CodeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a C local of `ctype`. The declarator carries any pointer
    /// prefix and initializer, e.g. `*name = NULL`.
    pub fn declare(&mut self, ctype: &str, declarator: &str) {
        self.varlist.add(ctype, declarator);
    }

    /// Append one logical parameter's unpacking binding: its format codes,
    /// the index-aligned argument references, and its keyword name(s).
    ///
    /// Appended atomically, exactly once per parameter. A parameter may
    /// expand to several references under one code (a buffer rides `s#` with
    /// a data and a length reference but a single keyword name).
    pub fn add_parameter_binding(&mut self, codes: &str, refs: &[String], keywords: &[&str]) {
        self.parse_format.push_str(codes);
        for arg_ref in refs {
            self.parse_refs.push(arg_ref.clone());
        }
        for kw in keywords {
            if is_python_keyword(kw) {
                self.kwlist.push(format!("{kw}_"));
            } else {
                self.kwlist.push((*kw).to_string());
            }
        }
    }

    /// Append a pre-call validation/conversion fragment.
    pub fn push_before(&mut self, code: String) {
        self.code_before.push(code);
    }

    /// Append a post-call conversion/cleanup fragment.
    pub fn push_after(&mut self, code: String) {
        self.code_after.push(code);
    }

    /// Append one expression to the native call's argument list.
    pub fn push_call_arg(&mut self, expr: String) {
        self.call_args.push(expr);
    }

    // =========================================================================
    // Read-back
    // =========================================================================

    /// The `PyArg_ParseTupleAndKeywords` format codes accumulated so far.
    pub fn parse_format(&self) -> &str {
        &self.parse_format
    }

    /// Argument references, index-aligned with the format codes.
    pub fn parse_refs(&self) -> &[String] {
        &self.parse_refs
    }

    /// Keyword names, reserved words already suffixed.
    pub fn keyword_names(&self) -> &[String] {
        &self.kwlist
    }

    pub fn render_variable_block(&self) -> String {
        self.varlist.render()
    }

    /// NULL-terminated keyword array declaration.
    pub fn render_keyword_array(&self) -> String {
        let mut names: Vec<String> = self.kwlist.iter().map(|kw| format!("\"{kw}\"")).collect();
        names.push("NULL".to_string());
        format!("    static char *kwlist[] = {{ {} }};\n", names.join(", "))
    }

    pub fn code_before(&self) -> String {
        self.code_before.concat()
    }

    pub fn code_after(&self) -> String {
        self.code_after.concat()
    }

    /// The native call's argument list, comma-joined.
    pub fn call_args(&self) -> String {
        self.call_args.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varblock_groups_by_type_in_first_seen_order() {
        let mut vars = VarBlock::default();
        vars.add("int", "a");
        vars.add("char", "*s");
        vars.add("int", "b = 5");
        assert_eq!(vars.render(), "    int a, b = 5;\n    char *s;\n\n");
    }

    #[test]
    fn varblock_empty_renders_nothing() {
        let vars = VarBlock::default();
        assert!(vars.is_empty());
        assert_eq!(vars.render(), "");
    }

    #[test]
    fn varblock_ignores_duplicate_declarator() {
        let mut vars = VarBlock::default();
        vars.add("int", "ret");
        vars.add("int", "ret");
        assert_eq!(vars.render(), "    int ret;\n\n");
    }

    #[test]
    fn binding_appends_codes_refs_and_keywords() {
        let mut acc = CodeAccumulator::new();
        acc.add_parameter_binding("i", &["&width".to_string()], &["width"]);
        acc.add_parameter_binding(
            "s#",
            &["&data".to_string(), "&data_len".to_string()],
            &["data"],
        );
        assert_eq!(acc.parse_format(), "is#");
        assert_eq!(acc.parse_refs(), &["&width", "&data", "&data_len"]);
        assert_eq!(acc.keyword_names(), &["width", "data"]);
    }

    #[test]
    fn reserved_word_keyword_gets_suffix() {
        let mut acc = CodeAccumulator::new();
        acc.add_parameter_binding("i", &["&print".to_string()], &["print"]);
        assert_eq!(acc.keyword_names(), &["print_"]);
        assert_eq!(
            acc.render_keyword_array(),
            "    static char *kwlist[] = { \"print_\", NULL };\n"
        );
    }

    #[test]
    fn keyword_array_is_null_terminated_when_empty() {
        let acc = CodeAccumulator::new();
        assert_eq!(
            acc.render_keyword_array(),
            "    static char *kwlist[] = { NULL };\n"
        );
    }

    #[test]
    fn code_blocks_concatenate_in_order() {
        let mut acc = CodeAccumulator::new();
        acc.push_before("    a();\n".to_string());
        acc.push_before("    b();\n".to_string());
        acc.push_after("    return c();".to_string());
        assert_eq!(acc.code_before(), "    a();\n    b();\n");
        assert_eq!(acc.code_after(), "    return c();");
    }

    #[test]
    fn call_args_join_with_comma() {
        let mut acc = CodeAccumulator::new();
        acc.push_call_arg("widget".to_string());
        acc.push_call_arg("&rect".to_string());
        assert_eq!(acc.call_args(), "widget, &rect");
    }

    #[test]
    fn identical_sequences_render_identically() {
        let build = || {
            let mut acc = CodeAccumulator::new();
            acc.declare("int", "x = 5");
            acc.declare("char", "*label");
            acc.declare("int", "y");
            acc.add_parameter_binding("i", &["&x".to_string()], &["x"]);
            acc.add_parameter_binding("s", &["&label".to_string()], &["label"]);
            acc.add_parameter_binding("i", &["&y".to_string()], &["y"]);
            acc
        };
        let a = build();
        let b = build();
        assert_eq!(a.render_variable_block(), b.render_variable_block());
        assert_eq!(a.render_keyword_array(), b.render_keyword_array());
    }
}
