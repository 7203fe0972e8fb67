//! Text categories: NUL-terminated strings, byte buffers, single
//! characters, and Unicode code points.

use crate::accumulator::CodeAccumulator;
use crate::error::CodegenError;

/// NUL-terminated `char*`/`gchar*` strings and their const/synonym
/// spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringArg;

impl StringArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        match pdflt {
            // A default of NULL stays a pointer literal; anything else is a
            // C string literal.
            Some("NULL") => acc.declare("char", &format!("*{pname} = NULL")),
            Some(dflt) => acc.declare("char", &format!("*{pname} = \"{dflt}\"")),
            None => acc.declare("char", &format!("*{pname}")),
        }
        acc.push_call_arg(pname.to_string());
        let code = if pnull { "z" } else { "s" };
        acc.add_parameter_binding(code, &[format!("&{pname}")], &[pname]);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        if owns_return {
            // The native allocation is released only on the non-NULL path,
            // after the Python string has been built.
            acc.declare("gchar", "*ret");
            acc.push_after(
                "    if (ret) {\n        PyObject *py_ret = PyString_FromString(ret);\n        g_free(ret);\n        return py_ret;\n    }\n    Py_INCREF(Py_None);\n    return Py_None;".to_string(),
            );
        } else {
            acc.declare("const gchar", "*ret");
            acc.push_after(
                "    if (ret)\n        return PyString_FromString(ret);\n    Py_INCREF(Py_None);\n    return Py_None;".to_string(),
            );
        }
        Ok(())
    }
}

/// `guchar*` byte buffers. Parses with an explicit length so embedded NULs
/// survive: one two-character format code, two argument references, one
/// keyword name.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferArg;

impl BufferArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        match pdflt {
            Some(dflt) => acc.declare("guchar", &format!("*{pname} = \"{dflt}\"")),
            None => acc.declare("guchar", &format!("*{pname}")),
        }
        acc.declare("int", &format!("{pname}_len"));
        acc.push_call_arg(pname.to_string());
        let code = if pnull { "z#" } else { "s#" };
        acc.add_parameter_binding(
            code,
            &[format!("&{pname}"), format!("&{pname}_len")],
            &[pname],
        );
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        _acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        Err(CodegenError::UnsupportedReturn {
            category: "byte buffer",
        })
    }
}

/// Single `char`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharArg;

impl CharArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        match pdflt {
            Some(dflt) => acc.declare("char", &format!("{pname} = '{dflt}'")),
            None => acc.declare("char", pname),
        }
        acc.push_call_arg(pname.to_string());
        acc.add_parameter_binding("c", &[format!("&{pname}")], &[pname]);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("gchar", "ret");
        acc.push_after("    return PyString_FromStringAndSize(&ret, 1);".to_string());
        Ok(())
    }
}

/// `gunichar` code points. The operand is a unicode string; anything longer
/// than one code point is a TypeError before conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniCharArg;

impl UniCharArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        match pdflt {
            Some(dflt) => {
                acc.declare("gunichar", &format!("{pname} = '{dflt}'"));
                acc.push_before(format!(
                    r#"    if (py_{pname} != NULL) {{
        if (py_{pname}[1] != 0) {{
            PyErr_SetString(PyExc_TypeError, "{pname} should be a 1 character unicode string");
            return NULL;
        }}
        {pname} = (gunichar)py_{pname}[0];
    }}
"#
                ));
            }
            None => {
                acc.declare("gunichar", pname);
                acc.push_before(format!(
                    r#"    if (py_{pname}[1] != 0) {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a 1 character unicode string");
        return NULL;
    }}
    {pname} = (gunichar)py_{pname}[0];
"#
                ));
            }
        }
        acc.declare("Py_UNICODE", &format!("*py_{pname} = NULL"));
        acc.push_call_arg(pname.to_string());
        acc.add_parameter_binding("u", &[format!("&py_{pname}")], &[pname]);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("gunichar", "ret");
        acc.declare("Py_UNICODE", "py_ret");
        acc.push_after(
            r#"#if !defined(Py_UNICODE_SIZE) || Py_UNICODE_SIZE == 2
    if (ret > 0xffff) {
        PyErr_SetString(PyExc_RuntimeError, "returned character can not be represented in 16-bit unicode");
        return NULL;
    }
#endif
    py_ret = (Py_UNICODE)ret;
    return PyUnicode_FromUnicode(&py_ret, 1);
"#
            .to_string(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_param_nullable_uses_z_code() {
        let mut acc = CodeAccumulator::new();
        StringArg
            .emit_parameter("const-gchar*", "label", None, true, &mut acc)
            .unwrap();
        assert_eq!(acc.parse_format(), "z");
        assert_eq!(acc.call_args(), "label");
    }

    #[test]
    fn string_param_default_is_quoted() {
        let mut acc = CodeAccumulator::new();
        StringArg
            .emit_parameter("gchar*", "name", Some("untitled"), false, &mut acc)
            .unwrap();
        assert!(acc
            .render_variable_block()
            .contains("char *name = \"untitled\";"));
    }

    #[test]
    fn string_param_null_default_stays_bare() {
        let mut acc = CodeAccumulator::new();
        StringArg
            .emit_parameter("gchar*", "name", Some("NULL"), false, &mut acc)
            .unwrap();
        assert!(acc.render_variable_block().contains("char *name = NULL;"));
    }

    #[test]
    fn owned_string_return_frees_after_conversion() {
        let mut acc = CodeAccumulator::new();
        StringArg.emit_return("gchar*", true, &mut acc).unwrap();
        let after = acc.code_after();
        let convert = after.find("PyString_FromString(ret)").unwrap();
        let free = after.find("g_free(ret)").unwrap();
        assert!(convert < free);
        // NULL path returns None without touching the allocation.
        assert!(after.contains("Py_INCREF(Py_None);"));
        assert!(acc.render_variable_block().contains("gchar *ret;"));
    }

    #[test]
    fn borrowed_string_return_never_frees() {
        let mut acc = CodeAccumulator::new();
        StringArg.emit_return("const-gchar*", false, &mut acc).unwrap();
        assert!(!acc.code_after().contains("g_free"));
        assert!(acc.render_variable_block().contains("const gchar *ret;"));
    }

    #[test]
    fn buffer_param_expands_to_data_and_length() {
        let mut acc = CodeAccumulator::new();
        BufferArg
            .emit_parameter("guchar*", "data", None, false, &mut acc)
            .unwrap();
        assert_eq!(acc.parse_format(), "s#");
        assert_eq!(acc.parse_refs(), &["&data", "&data_len"]);
        assert_eq!(acc.keyword_names(), &["data"]);
        assert!(acc.render_variable_block().contains("int data_len;"));
    }

    #[test]
    fn buffer_return_is_rejected() {
        let mut acc = CodeAccumulator::new();
        let err = BufferArg.emit_return("guchar*", false, &mut acc).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedReturn { .. }));
    }

    #[test]
    fn char_return_builds_one_byte_string() {
        let mut acc = CodeAccumulator::new();
        CharArg.emit_return("gchar", false, &mut acc).unwrap();
        assert_eq!(
            acc.code_after(),
            "    return PyString_FromStringAndSize(&ret, 1);"
        );
    }

    #[test]
    fn unichar_param_rejects_multi_code_point_input() {
        let mut acc = CodeAccumulator::new();
        UniCharArg
            .emit_parameter("gunichar", "ch", None, false, &mut acc)
            .unwrap();
        let before = acc.code_before();
        assert!(before.contains("if (py_ch[1] != 0)"));
        assert!(before.contains("should be a 1 character unicode string"));
        assert!(before.contains("ch = (gunichar)py_ch[0];"));
    }

    #[test]
    fn unichar_param_default_guards_on_presence() {
        let mut acc = CodeAccumulator::new();
        UniCharArg
            .emit_parameter("gunichar", "ch", Some("a"), false, &mut acc)
            .unwrap();
        assert!(acc.code_before().contains("if (py_ch != NULL)"));
        assert!(acc.render_variable_block().contains("gunichar ch = 'a';"));
    }

    #[test]
    fn unichar_return_guards_narrow_unicode_builds() {
        let mut acc = CodeAccumulator::new();
        UniCharArg.emit_return("gunichar", false, &mut acc).unwrap();
        let after = acc.code_after();
        assert!(after.contains("Py_UNICODE_SIZE == 2"));
        assert!(after.contains("PyUnicode_FromUnicode(&py_ret, 1)"));
    }
}
