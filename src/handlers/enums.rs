//! Enumerations and flag sets.
//!
//! Both take an arbitrary Python operand and resolve it through the runtime
//! enum/flags lookup in pre-call code; a failed lookup raises there and the
//! native call never happens. The difference is the defaulted case: a flag
//! set guards the lookup on operand presence, an enum converts
//! unconditionally.

use crate::accumulator::CodeAccumulator;
use crate::error::CodegenError;

#[derive(Debug, Clone)]
pub struct EnumArg {
    name: String,
    typecode: String,
}

impl EnumArg {
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
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let typecode = &self.typecode;
        match pdflt {
            Some(dflt) => acc.declare(&self.name, &format!("{pname} = {dflt}")),
            None => acc.declare(&self.name, pname),
        }
        acc.declare("PyObject", &format!("*py_{pname} = NULL"));
        acc.push_before(format!(
            "    if (pyg_enum_get_value({typecode}, py_{pname}, (gint *)&{pname}))\n        return NULL;\n"
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
        acc.declare("gint", "ret");
        acc.push_after("    return PyInt_FromLong(ret);".to_string());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FlagsArg {
    name: String,
    typecode: String,
}

impl FlagsArg {
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
        pdflt: Option<&str>,
        _pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        let typecode = &self.typecode;
        let guard = match pdflt {
            Some(dflt) => {
                acc.declare(&self.name, &format!("{pname} = {dflt}"));
                format!("py_{pname} && ")
            }
            None => {
                acc.declare(&self.name, pname);
                String::new()
            }
        };
        acc.declare("PyObject", &format!("*py_{pname} = NULL"));
        acc.push_before(format!(
            "    if ({guard}pyg_flags_get_value({typecode}, py_{pname}, (gint *)&{pname}))\n        return NULL;\n"
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
        acc.declare("guint", "ret");
        acc.push_after("    return PyInt_FromLong(ret);".to_string());
        Ok(())
    }
}
