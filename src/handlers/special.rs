//! Narrowly-scoped categories: the void return, atoms, runtime type tags,
//! the `GError**` out-parameter, tree paths, rectangles, and raw Python
//! object passthrough.

use crate::accumulator::CodeAccumulator;
use crate::error::CodegenError;

/// The absent return value.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidArg;

impl VoidArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        _pnull: bool,
        _acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        Err(CodegenError::UnsupportedParameter {
            category: "void",
            parameter: pname.to_string(),
        })
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.push_after("    Py_INCREF(Py_None);\n    return Py_None;".to_string());
        Ok(())
    }
}

/// `GdkAtom` interned identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomArg;

impl AtomArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("GdkAtom", pname);
        acc.declare("PyObject", &format!("*py_{pname} = NULL"));
        acc.push_before(format!(
            "    {pname} = pygdk_atom_from_pyobject(py_{pname});\n    if (PyErr_Occurred())\n        return NULL;\n"
        ));
        acc.push_call_arg(pname.to_string());
        acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("GdkAtom", "ret");
        acc.push_after("    return PyGdkAtom_New(ret);".to_string());
        Ok(())
    }
}

/// `GType` runtime type tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct GTypeArg;

impl GTypeArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("GType", pname);
        acc.declare("PyObject", &format!("*py_{pname} = NULL"));
        acc.push_before(format!(
            "    if (({pname} = pyg_type_from_object(py_{pname})) == 0)\n        return NULL;\n"
        ));
        acc.push_call_arg(pname.to_string());
        acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("GType", "ret");
        acc.push_after("    return pyg_type_wrapper_new(ret);".to_string());
        Ok(())
    }
}

/// The `GError**` out-parameter. Invisible to the Python caller: no
/// unpacking binding, a hidden local passed by address, and a post-call
/// check that raises if the callee set an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct GErrorArg;

impl GErrorArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("GError", &format!("*{pname} = NULL"));
        acc.push_call_arg(format!("&{pname}"));
        acc.push_after(format!(
            "    if (pyg_error_check(&{pname}))\n        return NULL;\n"
        ));
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        _acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        Err(CodegenError::UnsupportedReturn {
            category: "GError out-parameter",
        })
    }
}

/// `GtkTreePath*`, converted from/to Python tuples. The converted parameter
/// is freed after the call in either branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreePathArg;

impl TreePathArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        if pnull {
            acc.declare("GtkTreePath", &format!("*{pname} = NULL"));
            acc.declare("PyObject", &format!("*py_{pname} = Py_None"));
            acc.push_before(format!(
                r#"    if (PyTuple_Check(py_{pname}))
        {pname} = pygtk_tree_path_from_pyobject(py_{pname});
    else if (py_{pname} != Py_None) {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a GtkTreePath or None");
        return NULL;
    }}
"#
            ));
        } else {
            acc.declare("GtkTreePath", &format!("*{pname}"));
            acc.declare("PyObject", &format!("*py_{pname}"));
            acc.push_before(format!(
                r#"    {pname} = pygtk_tree_path_from_pyobject(py_{pname});
    if (!{pname}) {{
        PyErr_SetString(PyExc_TypeError, "could not convert {pname} to a GtkTreePath");
        return NULL;
    }}
"#
            ));
        }
        acc.push_call_arg(pname.to_string());
        acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        acc.push_after(format!(
            "    if ({pname})\n        gtk_tree_path_free({pname});\n"
        ));
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("GtkTreePath", "*ret");
        if owns_return {
            acc.push_after(
                r#"    if (ret) {
        PyObject *py_ret = pygtk_tree_path_to_pyobject(ret);
        gtk_tree_path_free(ret);
        return py_ret;
    }
    Py_INCREF(Py_None);
    return Py_None;"#
                    .to_string(),
            );
        } else {
            acc.push_after(
                r#"    if (ret) {
        PyObject *py_ret = pygtk_tree_path_to_pyobject(ret);
        return py_ret;
    }
    Py_INCREF(Py_None);
    return Py_None;"#
                    .to_string(),
            );
        }
        Ok(())
    }
}

/// Rectangle passed by pointer, converted from a Python sequence. The
/// nullable form needs a backing value local so None can pass NULL while a
/// real operand passes a filled rectangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectanglePtrArg;

impl RectanglePtrArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        if pnull {
            acc.declare("GdkRectangle", &format!("{pname}_rect = {{ 0, 0, 0, 0 }}"));
            acc.declare("GdkRectangle", &format!("*{pname}"));
            acc.declare("PyObject", &format!("*py_{pname} = Py_None"));
            acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
            acc.push_call_arg(pname.to_string());
            acc.push_before(format!(
                r#"    if (py_{pname} == Py_None)
        {pname} = NULL;
    else if (pygdk_rectangle_from_pyobject(py_{pname}, &{pname}_rect))
        {pname} = &{pname}_rect;
    else
        return NULL;
"#
            ));
        } else {
            acc.declare("GdkRectangle", &format!("{pname} = {{ 0, 0, 0, 0 }}"));
            acc.declare("PyObject", &format!("*py_{pname}"));
            acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
            acc.push_call_arg(format!("&{pname}"));
            acc.push_before(format!(
                "    if (!pygdk_rectangle_from_pyobject(py_{pname}, &{pname}))\n        return NULL;\n"
            ));
        }
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        _acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        Err(CodegenError::UnsupportedReturn {
            category: "rectangle pointer",
        })
    }
}

/// Rectangle returned by value, wrapped as a copied boxed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectangleArg;

impl RectangleArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        _pnull: bool,
        _acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        Err(CodegenError::UnsupportedParameter {
            category: "rectangle value",
            parameter: pname.to_string(),
        })
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("GdkRectangle", "ret");
        acc.push_after(
            "    return pyg_boxed_new(GDK_TYPE_RECTANGLE, &ret, TRUE, TRUE);".to_string(),
        );
        Ok(())
    }
}

/// Raw `PyObject*` passthrough.
#[derive(Debug, Clone, Copy, Default)]
pub struct PyObjectArg;

impl PyObjectArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        _pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("PyObject", &format!("*{pname}"));
        acc.add_parameter_binding("O", &[format!("&{pname}")], &[pname]);
        acc.push_call_arg(pname.to_string());
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("PyObject", "*ret");
        if owns_return {
            // The callee's reference transfers straight through.
            acc.push_after(
                "    if (ret)\n        return ret;\n    Py_INCREF(Py_None);\n    return Py_None;"
                    .to_string(),
            );
        } else {
            acc.push_after(
                "    if (!ret) ret = Py_None;\n    Py_INCREF(ret);\n    return ret;".to_string(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_return_is_none_and_param_is_rejected() {
        let mut acc = CodeAccumulator::new();
        VoidArg.emit_return("none", false, &mut acc).unwrap();
        assert_eq!(acc.code_after(), "    Py_INCREF(Py_None);\n    return Py_None;");
        assert!(acc.render_variable_block().is_empty());

        let err = VoidArg
            .emit_parameter("none", "x", None, false, &mut acc)
            .unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedParameter { .. }));
    }

    #[test]
    fn atom_param_converts_and_checks_for_error() {
        let mut acc = CodeAccumulator::new();
        AtomArg
            .emit_parameter("GdkAtom", "target", None, false, &mut acc)
            .unwrap();
        let before = acc.code_before();
        assert!(before.contains("target = pygdk_atom_from_pyobject(py_target);"));
        assert!(before.contains("PyErr_Occurred()"));
    }

    #[test]
    fn gtype_param_fails_on_zero_type() {
        let mut acc = CodeAccumulator::new();
        GTypeArg
            .emit_parameter("GType", "type", None, false, &mut acc)
            .unwrap();
        assert!(acc
            .code_before()
            .contains("if ((type = pyg_type_from_object(py_type)) == 0)"));
    }

    #[test]
    fn gerror_param_is_invisible_to_the_caller() {
        let mut acc = CodeAccumulator::new();
        GErrorArg
            .emit_parameter("GError**", "error", None, false, &mut acc)
            .unwrap();
        // Hidden out-parameter: no unpacking binding, no keyword.
        assert_eq!(acc.parse_format(), "");
        assert!(acc.keyword_names().is_empty());
        assert_eq!(acc.call_args(), "&error");
        assert!(acc.code_after().contains("pyg_error_check(&error)"));
    }

    #[test]
    fn tree_path_param_frees_after_call() {
        let mut acc = CodeAccumulator::new();
        TreePathArg
            .emit_parameter("GtkTreePath*", "path", None, false, &mut acc)
            .unwrap();
        assert!(acc.code_before().contains("pygtk_tree_path_from_pyobject(py_path)"));
        assert!(acc.code_after().contains("gtk_tree_path_free(path)"));
    }

    #[test]
    fn tree_path_return_frees_only_when_owned() {
        let mut acc = CodeAccumulator::new();
        TreePathArg.emit_return("GtkTreePath*", true, &mut acc).unwrap();
        let after = acc.code_after();
        let convert = after.find("pygtk_tree_path_to_pyobject(ret)").unwrap();
        let free = after.find("gtk_tree_path_free(ret)").unwrap();
        assert!(convert < free);

        let mut acc = CodeAccumulator::new();
        TreePathArg.emit_return("GtkTreePath*", false, &mut acc).unwrap();
        assert!(!acc.code_after().contains("gtk_tree_path_free"));
    }

    #[test]
    fn rectangle_ptr_nullable_uses_backing_value() {
        let mut acc = CodeAccumulator::new();
        RectanglePtrArg
            .emit_parameter("GdkRectangle*", "area", None, true, &mut acc)
            .unwrap();
        let vars = acc.render_variable_block();
        assert!(vars.contains("area_rect = { 0, 0, 0, 0 }"));
        assert!(acc.code_before().contains("area = &area_rect;"));
        assert_eq!(acc.call_args(), "area");
    }

    #[test]
    fn rectangle_ptr_required_passes_address() {
        let mut acc = CodeAccumulator::new();
        RectanglePtrArg
            .emit_parameter("GdkRectangle*", "area", None, false, &mut acc)
            .unwrap();
        assert_eq!(acc.call_args(), "&area");
        assert!(acc
            .code_before()
            .contains("pygdk_rectangle_from_pyobject(py_area, &area)"));
    }

    #[test]
    fn rectangle_value_return_copies_into_boxed() {
        let mut acc = CodeAccumulator::new();
        RectangleArg.emit_return("GdkRectangle", false, &mut acc).unwrap();
        assert!(acc
            .code_after()
            .contains("pyg_boxed_new(GDK_TYPE_RECTANGLE, &ret, TRUE, TRUE)"));
    }

    #[test]
    fn pyobject_return_respects_ownership() {
        let mut acc = CodeAccumulator::new();
        PyObjectArg.emit_return("PyObject*", true, &mut acc).unwrap();
        assert!(acc.code_after().contains("return ret;"));
        assert!(!acc.code_after().contains("Py_INCREF(ret)"));

        let mut acc = CodeAccumulator::new();
        PyObjectArg.emit_return("PyObject*", false, &mut acc).unwrap();
        assert!(acc.code_after().contains("Py_INCREF(ret);"));
    }
}
