//! GObject-derived reference types.

use crate::accumulator::CodeAccumulator;
use crate::error::CodegenError;

/// Handler for one registered GObject subclass.
///
/// Carries the class name, the recorded single parent (for hierarchy
/// queries), and the C cast macro derived from the GType typecode
/// (`GTK_TYPE_WIDGET` → `GTK_WIDGET`).
#[derive(Debug, Clone)]
pub struct ObjectArg {
    name: String,
    parent: Option<String>,
    cast: String,
}

impl ObjectArg {
    pub fn new(name: &str, parent: Option<&str>, typecode: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            cast: typecode.replacen("_TYPE_", "_", 1),
        }
    }

    /// The single parent recorded at registration, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let objname = &self.name;
        let cast = &self.cast;
        if pnull {
            match pdflt {
                Some(dflt) => {
                    acc.declare(objname, &format!("*{pname} = {dflt}"));
                    acc.declare("PyGObject", &format!("*py_{pname} = NULL"));
                    acc.push_before(format!(
                        r#"    if ((PyObject *)py_{pname} == Py_None)
        {pname} = NULL;
    else if (py_{pname} && pygobject_check(py_{pname}, &Py{objname}_Type))
        {pname} = {cast}(py_{pname}->obj);
    else if (py_{pname}) {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a {objname} or None");
        return NULL;
    }}
"#
                    ));
                }
                None => {
                    acc.declare(objname, &format!("*{pname} = NULL"));
                    acc.declare("PyGObject", &format!("*py_{pname}"));
                    acc.push_before(format!(
                        r#"    if (py_{pname} && pygobject_check(py_{pname}, &Py{objname}_Type))
        {pname} = {cast}(py_{pname}->obj);
    else if ((PyObject *)py_{pname} != Py_None) {{
        PyErr_SetString(PyExc_TypeError, "{pname} should be a {objname} or None");
        return NULL;
    }}
"#
                    ));
                }
            }
            acc.push_call_arg(pname.to_string());
            acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        } else if let Some(dflt) = pdflt {
            // A default needs a runtime object to convert, so unpacking is
            // optional and conversion waits for a presence check.
            acc.declare(objname, &format!("*{pname} = {dflt}"));
            acc.declare("PyGObject", &format!("*py_{pname} = NULL"));
            acc.push_before(format!(
                "    if (py_{pname})\n        {pname} = {cast}(py_{pname}->obj);\n"
            ));
            acc.push_call_arg(pname.to_string());
            acc.add_parameter_binding("O", &[format!("&py_{pname}")], &[pname]);
        } else {
            acc.declare("PyGObject", &format!("*{pname}"));
            acc.push_call_arg(format!("{cast}({pname}->obj)"));
            acc.add_parameter_binding(
                "O!",
                &[format!("&Py{objname}_Type"), format!("&{pname}")],
                &[pname],
            );
        }
        Ok(())
    }

    pub fn emit_return(
        &self,
        ptype: &str,
        owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let base = ptype.strip_suffix('*').unwrap_or(ptype);
        acc.declare(base, "*ret");
        if owns_return {
            // Drop the transferred reference only after the Python wrapper
            // holds its own.
            acc.declare("PyObject", "*py_ret");
            acc.push_after(
                "    py_ret = pygobject_new((GObject *)ret);\n    g_object_unref(ret);\n    return py_ret;".to_string(),
            );
        } else {
            acc.push_after(
                "    /* pygobject_new handles NULL checking */\n    return pygobject_new((GObject *)ret);".to_string(),
            );
        }
        Ok(())
    }
}
