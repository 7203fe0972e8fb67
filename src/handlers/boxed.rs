//! Opaque value wrappers: registered boxed types, hand-wrapped custom
//! boxed types, and plain registered pointers.

use crate::accumulator::CodeAccumulator;
use crate::error::CodegenError;

/// A GType-registered boxed type, checked and unwrapped through the generic
/// boxed support.
#[derive(Debug, Clone)]
pub struct BoxedArg {
    name: String,
    typecode: String,
}

impl BoxedArg {
    pub fn new(name: &str, typecode: &str) -> Self {
        Self {
            name: name.to_string(),
            typecode: typecode.to_string(),
        }
    }

    pub fn emit_parameter(
        &self,
        ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let typename = &self.name;
        let typecode = &self.typecode;
        acc.declare(typename, &format!("*{pname} = NULL"));
        if pnull {
            acc.declare("PyObject", &format!("*py_{pname} = Py_None"));
            acc.push_before(format!(
                r#"    if (pyg_boxed_check(py_{pname}, {typecode}))
        {pname} = pyg_boxed_get(py_{pname}, {typename});
    else if (py_{pname} != Py_None) {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a {typename} or None");
        return NULL;
    }}
"#
            ));
        } else {
            acc.declare("PyObject", &format!("*py_{pname}"));
            acc.push_before(format!(
                r#"    if (pyg_boxed_check(py_{pname}, {typecode}))
        {pname} = pyg_boxed_get(py_{pname}, {typename});
    else {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a {typename}");
        return NULL;
    }}
"#
            ));
        }
        // When the declared key is a different spelling of the family (a
        // const or sibling form) the call site needs an explicit cast back
        // to the declared type.
        match ptype.strip_suffix('*') {
            Some(base) if base.strip_prefix("const-").unwrap_or(base) != typename => {
                let cast = base.replace("const-", "const ");
                acc.push_call_arg(format!("({cast} *){pname}"));
            }
            _ => acc.push_call_arg(pname.to_string()),
        }
        acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        Ok(())
    }

    pub fn emit_return(
        &self,
        ptype: &str,
        owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let typecode = &self.typecode;
        let (ret, owns_return) = if ptype.ends_with('*') {
            acc.declare(&self.name, "*ret");
            ("ret", owns_return)
        } else {
            // A value return lives on the wrapper's stack; ownership of a
            // local cannot transfer, so the boxed wrapper must copy.
            acc.declare(&self.name, "ret");
            ("&ret", false)
        };
        let copy = if owns_return { "FALSE" } else { "TRUE" };
        acc.push_after(format!(
            "    /* pyg_boxed_new handles NULL checking */\n    return pyg_boxed_new({typecode}, {ret}, {copy}, TRUE);"
        ));
        Ok(())
    }
}

/// A hand-wrapped opaque type with its own Python type object, getter, and
/// constructor.
#[derive(Debug, Clone)]
pub struct CustomBoxedArg {
    name: String,
    pytype: String,
    getter: String,
    constructor: String,
}

impl CustomBoxedArg {
    pub fn new(name: &str, pytype: &str, getter: &str, constructor: &str) -> Self {
        Self {
            name: name.to_string(),
            pytype: pytype.to_string(),
            getter: getter.to_string(),
            constructor: constructor.to_string(),
        }
    }

    fn checker(&self) -> String {
        format!("Py{}_Check", self.name)
    }

    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let typename = &self.name;
        let getter = &self.getter;
        if pnull {
            let check = self.checker();
            acc.declare(typename, &format!("*{pname} = NULL"));
            acc.declare("PyObject", &format!("*py_{pname} = Py_None"));
            acc.push_before(format!(
                r#"    if ({check}(py_{pname}))
        {pname} = {getter}(py_{pname});
    else if (py_{pname} != Py_None) {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a {typename} or None");
        return NULL;
    }}
"#
            ));
            acc.push_call_arg(pname.to_string());
            acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        } else {
            acc.declare("PyObject", &format!("*{pname}"));
            acc.push_call_arg(format!("{getter}({pname})"));
            acc.add_parameter_binding(
                "O!",
                &[format!("&{}", self.pytype), format!("&{pname}")],
                &[pname],
            );
        }
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let constructor = &self.constructor;
        acc.declare(&self.name, "*ret");
        acc.push_after(format!(
            "    if (ret)\n        return {constructor}(ret);\n    Py_INCREF(Py_None);\n    return Py_None;"
        ));
        Ok(())
    }
}

/// A GType-registered plain pointer type.
#[derive(Debug, Clone)]
pub struct PointerArg {
    name: String,
    typecode: String,
}

impl PointerArg {
    pub fn new(name: &str, typecode: &str) -> Self {
        Self {
            name: name.to_string(),
            typecode: typecode.to_string(),
        }
    }

    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let typename = &self.name;
        let typecode = &self.typecode;
        acc.declare(typename, &format!("*{pname} = NULL"));
        if pnull {
            acc.declare("PyObject", &format!("*py_{pname} = Py_None"));
            acc.push_before(format!(
                r#"    if (pyg_pointer_check(py_{pname}, {typecode}))
        {pname} = pyg_pointer_get(py_{pname}, {typename});
    else if (py_{pname} != Py_None) {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a {typename} or None");
        return NULL;
    }}
"#
            ));
        } else {
            acc.declare("PyObject", &format!("*py_{pname}"));
            acc.push_before(format!(
                r#"    if (pyg_pointer_check(py_{pname}, {typecode}))
        {pname} = pyg_pointer_get(py_{pname}, {typename});
    else {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a {typename}");
        return NULL;
    }}
"#
            ));
        }
        acc.push_call_arg(pname.to_string());
        acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        Ok(())
    }

    pub fn emit_return(
        &self,
        ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let typecode = &self.typecode;
        if ptype.ends_with('*') {
            acc.declare(&self.name, "*ret");
            acc.push_after(format!(
                "    /* pyg_pointer_new handles NULL checking */\n    return pyg_pointer_new({typecode}, ret);"
            ));
        } else {
            acc.declare(&self.name, "ret");
            acc.push_after(format!(
                "    /* pyg_pointer_new handles NULL checking */\n    return pyg_pointer_new({typecode}, &ret);"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> BoxedArg {
        BoxedArg::new("GdkColor", "GDK_TYPE_COLOR")
    }

    #[test]
    fn boxed_param_checks_boxed_type() {
        let mut acc = CodeAccumulator::new();
        color()
            .emit_parameter("GdkColor*", "color", None, false, &mut acc)
            .unwrap();
        let before = acc.code_before();
        assert!(before.contains("pyg_boxed_check(py_color, GDK_TYPE_COLOR)"));
        assert!(before.contains("pyg_boxed_get(py_color, GdkColor)"));
        assert!(before.contains("should be a GdkColor"));
        assert_eq!(acc.call_args(), "color");
    }

    #[test]
    fn boxed_param_nullable_accepts_none() {
        let mut acc = CodeAccumulator::new();
        color()
            .emit_parameter("GdkColor*", "color", None, true, &mut acc)
            .unwrap();
        assert!(acc.code_before().contains("!= Py_None"));
        assert!(acc
            .render_variable_block()
            .contains("PyObject *py_color = Py_None;"));
    }

    #[test]
    fn boxed_param_const_spelling_casts_call_arg() {
        let mut acc = CodeAccumulator::new();
        color()
            .emit_parameter("const-GdkColor*", "color", None, false, &mut acc)
            .unwrap();
        assert_eq!(acc.call_args(), "(const GdkColor *)color");
    }

    #[test]
    fn boxed_pointer_return_copy_follows_ownership() {
        let mut acc = CodeAccumulator::new();
        color().emit_return("GdkColor*", true, &mut acc).unwrap();
        assert!(acc
            .code_after()
            .contains("pyg_boxed_new(GDK_TYPE_COLOR, ret, FALSE, TRUE);"));

        let mut acc = CodeAccumulator::new();
        color().emit_return("GdkColor*", false, &mut acc).unwrap();
        assert!(acc
            .code_after()
            .contains("pyg_boxed_new(GDK_TYPE_COLOR, ret, TRUE, TRUE);"));
    }

    #[test]
    fn boxed_value_return_always_copies() {
        let mut acc = CodeAccumulator::new();
        color().emit_return("GdkColor", true, &mut acc).unwrap();
        assert!(acc
            .code_after()
            .contains("pyg_boxed_new(GDK_TYPE_COLOR, &ret, TRUE, TRUE);"));
        assert!(acc.render_variable_block().contains("GdkColor ret;"));
    }

    fn font() -> CustomBoxedArg {
        CustomBoxedArg::new("GdkFont", "PyGdkFont_Type", "pygdk_font_get", "pygdk_font_new")
    }

    #[test]
    fn custom_boxed_required_param_unwraps_via_getter() {
        let mut acc = CodeAccumulator::new();
        font()
            .emit_parameter("GdkFont*", "font", None, false, &mut acc)
            .unwrap();
        assert_eq!(acc.call_args(), "pygdk_font_get(font)");
        assert_eq!(acc.parse_refs(), &["&PyGdkFont_Type", "&font"]);
        assert_eq!(acc.parse_format(), "O!");
    }

    #[test]
    fn custom_boxed_nullable_param_checks_then_unwraps() {
        let mut acc = CodeAccumulator::new();
        font()
            .emit_parameter("GdkFont*", "font", None, true, &mut acc)
            .unwrap();
        let before = acc.code_before();
        assert!(before.contains("PyGdkFont_Check(py_font)"));
        assert!(before.contains("font = pygdk_font_get(py_font);"));
        assert!(before.contains("should be a GdkFont or None"));
    }

    #[test]
    fn custom_boxed_return_uses_constructor_with_none_fallback() {
        let mut acc = CodeAccumulator::new();
        font().emit_return("GdkFont*", true, &mut acc).unwrap();
        let after = acc.code_after();
        assert!(after.contains("return pygdk_font_new(ret);"));
        assert!(after.contains("Py_INCREF(Py_None);"));
    }

    fn visual() -> PointerArg {
        PointerArg::new("GdkVisual", "GDK_TYPE_VISUAL")
    }

    #[test]
    fn pointer_param_checks_pointer_type() {
        let mut acc = CodeAccumulator::new();
        visual()
            .emit_parameter("GdkVisual*", "visual", None, false, &mut acc)
            .unwrap();
        assert!(acc
            .code_before()
            .contains("pyg_pointer_check(py_visual, GDK_TYPE_VISUAL)"));
        assert_eq!(acc.parse_format(), "O");
    }

    #[test]
    fn pointer_return_wraps_value_or_pointer() {
        let mut acc = CodeAccumulator::new();
        visual().emit_return("GdkVisual*", false, &mut acc).unwrap();
        assert!(acc
            .code_after()
            .contains("pyg_pointer_new(GDK_TYPE_VISUAL, ret);"));

        let mut acc = CodeAccumulator::new();
        visual().emit_return("GdkVisual", false, &mut acc).unwrap();
        assert!(acc
            .code_after()
            .contains("pyg_pointer_new(GDK_TYPE_VISUAL, &ret);"));
    }
}
