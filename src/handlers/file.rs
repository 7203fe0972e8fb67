//! stdio stream parameters and returns.

use crate::accumulator::CodeAccumulator;
use crate::error::CodegenError;

/// `FILE*`. The operand is a Python file object; the nullable forms accept
/// None as a NULL stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileArg;

impl FileArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        if pnull {
            match pdflt {
                Some(dflt) => {
                    acc.declare("FILE", &format!("*{pname} = {dflt}"));
                    acc.declare("PyObject", &format!("*py_{pname} = NULL"));
                    acc.push_before(format!(
                        r#"    if (py_{pname} == Py_None)
        {pname} = NULL;
    else if (py_{pname} && PyFile_Check(py_{pname}))
        {pname} = PyFile_AsFile(py_{pname});
    else if (py_{pname}) {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a file object or None");
        return NULL;
    }}
"#
                    ));
                }
                None => {
                    acc.declare("FILE", &format!("*{pname} = NULL"));
                    acc.declare("PyObject", &format!("*py_{pname}"));
                    acc.push_before(format!(
                        r#"    if (py_{pname} && PyFile_Check(py_{pname}))
        {pname} = PyFile_AsFile(py_{pname});
    else if (py_{pname} != Py_None) {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a file object or None");
        return NULL;
    }}
"#
                    ));
                }
            }
            acc.push_call_arg(pname.to_string());
            acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        } else if let Some(dflt) = pdflt {
            acc.declare("FILE", &format!("*{pname} = {dflt}"));
            acc.declare("PyObject", &format!("*py_{pname} = NULL"));
            acc.push_before(format!(
                "    if (py_{pname})\n        {pname} = PyFile_AsFile(py_{pname});\n"
            ));
            acc.push_call_arg(pname.to_string());
            acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        } else {
            acc.declare("PyObject", &format!("*{pname}"));
            acc.push_call_arg(format!("PyFile_AsFile({pname})"));
            acc.add_parameter_binding(
                "O!",
                &["&PyFile_Type".to_string(), format!("&{pname}")],
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
        acc.declare("FILE", "*ret");
        acc.push_after(
            "    if (ret)\n        return PyFile_FromFile(ret, \"\", \"\", fclose);\n    Py_INCREF(Py_None);\n    return Py_None;".to_string(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_param_converts_inline() {
        let mut acc = CodeAccumulator::new();
        FileArg
            .emit_parameter("FILE*", "stream", None, false, &mut acc)
            .unwrap();
        assert_eq!(acc.call_args(), "PyFile_AsFile(stream)");
        assert_eq!(acc.parse_format(), "O!");
        assert_eq!(acc.parse_refs(), &["&PyFile_Type", "&stream"]);
    }

    #[test]
    fn nullable_param_accepts_none_as_null_stream() {
        let mut acc = CodeAccumulator::new();
        FileArg
            .emit_parameter("FILE*", "stream", None, true, &mut acc)
            .unwrap();
        let before = acc.code_before();
        assert!(before.contains("PyFile_Check(py_stream)"));
        assert!(before.contains("should be a file object or None"));
        assert_eq!(acc.call_args(), "stream");
        assert!(acc.render_variable_block().contains("FILE *stream = NULL;"));
    }

    #[test]
    fn nullable_defaulted_param_maps_none_to_null() {
        let mut acc = CodeAccumulator::new();
        FileArg
            .emit_parameter("FILE*", "log", Some("stderr"), true, &mut acc)
            .unwrap();
        let before = acc.code_before();
        assert!(before.contains("if (py_log == Py_None)"));
        assert!(before.contains("log = NULL;"));
        assert!(acc.render_variable_block().contains("FILE *log = stderr;"));
    }

    #[test]
    fn return_wraps_stream_or_none() {
        let mut acc = CodeAccumulator::new();
        FileArg.emit_return("FILE*", false, &mut acc).unwrap();
        let after = acc.code_after();
        assert!(after.contains("PyFile_FromFile(ret, \"\", \"\", fclose)"));
        assert!(after.contains("Py_INCREF(Py_None);"));
    }
}
