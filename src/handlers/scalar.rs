//! Numeric categories: machine integers, booleans, `time_t`, unsigned
//! longs, 64-bit integers, and floating point.
//!
//! Scalars are the one family where a default literal initializes the C
//! local directly, with no presence check and no pre-call conversion. The
//! unsigned kinds that exceed the machine-int parse range (`gulong`,
//! `guint64`) take a `PyLong` operand instead and convert in pre-call code
//! so large values survive.

use crate::accumulator::CodeAccumulator;
use crate::error::CodegenError;

/// Declare-and-parse shape shared by every directly-parsed numeric kind.
fn plain_numeric_param(
    ctype: &str,
    code: &str,
    pname: &str,
    pdflt: Option<&str>,
    acc: &mut CodeAccumulator,
) {
    match pdflt {
        Some(dflt) => acc.declare(ctype, &format!("{pname} = {dflt}")),
        None => acc.declare(ctype, pname),
    }
    acc.push_call_arg(pname.to_string());
    acc.add_parameter_binding(code, &[format!("&{pname}")], &[pname]);
}

/// Shape shared by the kinds parsed as a `PyLong` object: declare the C
/// local, take a `PyObject` operand, convert in pre-call code (guarded on
/// presence when a default exists).
fn pylong_param(
    ctype: &str,
    convert: &str,
    pname: &str,
    pdflt: Option<&str>,
    acc: &mut CodeAccumulator,
) {
    match pdflt {
        Some(dflt) => {
            acc.declare(ctype, &format!("{pname} = {dflt}"));
            acc.push_before(format!(
                "    if (py_{pname})\n        {pname} = {convert}(py_{pname});\n"
            ));
        }
        None => {
            acc.declare(ctype, pname);
            acc.push_before(format!("    {pname} = {convert}(py_{pname});\n"));
        }
    }
    acc.declare("PyObject", &format!("*py_{pname} = NULL"));
    acc.push_call_arg(pname.to_string());
    acc.add_parameter_binding(
        "O!",
        &["&PyLong_Type".to_string(), format!("&py_{pname}")],
        &[pname],
    );
}

/// Machine integer (`int`, `gint`, `guint`, the short/long spellings, and
/// the fixed-width kinds the machine int covers).
#[derive(Debug, Clone, Copy, Default)]
pub struct IntArg;

impl IntArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        plain_numeric_param("int", "i", pname, pdflt, acc);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("int", "ret");
        acc.push_after("    return PyInt_FromLong(ret);".to_string());
        Ok(())
    }
}

/// `gboolean`. Parameters parse like ints; results map to the two shared
/// truth singletons, never a fresh object.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolArg;

impl BoolArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        plain_numeric_param("int", "i", pname, pdflt, acc);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("int", "ret");
        acc.declare("PyObject", "*py_ret");
        acc.push_after(
            "    py_ret = ret ? Py_True : Py_False;\n    Py_INCREF(py_ret);\n    return py_ret;"
                .to_string(),
        );
        Ok(())
    }
}

/// `time_t`. Also carries `guint32` when the native signed width covers it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeArg;

impl TimeArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        plain_numeric_param("time_t", "i", pname, pdflt, acc);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("time_t", "ret");
        acc.push_after("    return PyInt_FromLong(ret);".to_string());
        Ok(())
    }
}

/// `gulong` (and `guint32` on narrow-int targets): full unsigned range via
/// `PyLong`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ULongArg;

impl ULongArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        pylong_param("gulong", "PyLong_AsUnsignedLong", pname, pdflt, acc);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("gulong", "ret");
        acc.push_after("    return PyLong_FromUnsignedLong(ret);".to_string());
        Ok(())
    }
}

/// `gint64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Int64Arg;

impl Int64Arg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        plain_numeric_param("gint64", "L", pname, pdflt, acc);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("gint64", "ret");
        acc.push_after("    return PyLong_FromLongLong(ret);".to_string());
        Ok(())
    }
}

/// `guint64`: full unsigned range via `PyLong`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UInt64Arg;

impl UInt64Arg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        pylong_param("guint64", "PyLong_AsUnsignedLongLong", pname, pdflt, acc);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("guint64", "ret");
        acc.push_after("    return PyLong_FromUnsignedLongLong(ret);".to_string());
        Ok(())
    }
}

/// `double`/`float`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleArg;

impl DoubleArg {
    pub fn emit_parameter(
        &self,
        _ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        plain_numeric_param("double", "d", pname, pdflt, acc);
        Ok(())
    }

    pub fn emit_return(
        &self,
        _ptype: &str,
        _owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        acc.declare("double", "ret");
        acc.push_after("    return PyFloat_FromDouble(ret);".to_string());
        Ok(())
    }
}
