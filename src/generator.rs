//! One wrapper generation pass.
//!
//! The driver hands over the declared parameter list and return, and gets
//! back every fragment the assembled wrapper needs, or an error and
//! nothing. A fresh accumulator is created per pass and dropped on failure,
//! so a half-rendered wrapper is never observable.

use crate::accumulator::CodeAccumulator;
use crate::error::CodegenError;
use crate::registry::TypeRegistry;

/// One declared parameter, in interface-description terms.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec<'a> {
    pub ctype: &'a str,
    pub name: &'a str,
    pub default: Option<&'a str>,
    pub nullable: bool,
}

impl<'a> ParamSpec<'a> {
    pub fn new(ctype: &'a str, name: &'a str) -> Self {
        Self {
            ctype,
            name,
            default: None,
            nullable: false,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: &'a str) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// The declared return: its type and whether the callee hands the caller
/// ownership of the result.
#[derive(Debug, Clone, Copy)]
pub struct ReturnSpec<'a> {
    pub ctype: &'a str,
    pub owns_return: bool,
}

impl<'a> ReturnSpec<'a> {
    /// A return the caller merely borrows.
    pub fn borrowed(ctype: &'a str) -> Self {
        Self {
            ctype,
            owns_return: false,
        }
    }

    /// A return whose ownership transfers to the caller.
    pub fn owned(ctype: &'a str) -> Self {
        Self {
            ctype,
            owns_return: true,
        }
    }

    /// No return value.
    pub fn none() -> Self {
        Self::borrowed("none")
    }
}

/// Owned snapshot of one pass's fragments, ready for the driver to splice
/// into the wrapper function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperFragments {
    /// `PyArg_ParseTupleAndKeywords` format codes, in parameter order.
    pub parse_format: String,
    /// Argument references, index-aligned with the format codes.
    pub parse_refs: Vec<String>,
    /// Rendered C declarations block.
    pub variable_block: String,
    /// Rendered NULL-terminated keyword array.
    pub keyword_array: String,
    /// Pre-call validation/conversion code.
    pub code_before: String,
    /// Post-call conversion/cleanup code.
    pub code_after: String,
    /// Comma-joined native call arguments.
    pub call_args: String,
}

impl TypeRegistry {
    /// Run one generation pass for a wrapped function.
    ///
    /// Parameters are emitted in declaration order, then the return once.
    /// Any failure (an unregistered type, a category in a position it
    /// cannot fill) aborts the whole pass; partial fragments are never
    /// returned.
    pub fn generate_wrapper(
        &self,
        function: &str,
        params: &[ParamSpec<'_>],
        ret: &ReturnSpec<'_>,
    ) -> Result<WrapperFragments, CodegenError> {
        let mut acc = CodeAccumulator::new();

        for param in params {
            let handler = self.get(param.ctype).ok_or_else(|| CodegenError::UnknownType {
                type_name: param.ctype.to_string(),
                parameter: param.name.to_string(),
            })?;
            handler.emit_parameter(param.ctype, param.name, param.default, param.nullable, &mut acc)?;
        }

        let handler = self
            .get(ret.ctype)
            .ok_or_else(|| CodegenError::UnknownReturnType {
                type_name: ret.ctype.to_string(),
            })?;
        handler.emit_return(ret.ctype, ret.owns_return, &mut acc)?;

        tracing::debug!(function, params = params.len(), "generated wrapper fragments");

        Ok(WrapperFragments {
            parse_format: acc.parse_format().to_string(),
            parse_refs: acc.parse_refs().to_vec(),
            variable_block: acc.render_variable_block(),
            keyword_array: acc.render_keyword_array(),
            code_before: acc.code_before(),
            code_after: acc.code_after(),
            call_args: acc.call_args(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    fn registry() -> TypeRegistry {
        TypeRegistry::with_defaults(&GeneratorConfig::default())
    }

    #[test]
    fn unknown_parameter_type_reports_type_and_name() {
        let err = registry()
            .generate_wrapper(
                "gtk_mystery_frob",
                &[ParamSpec::new("GtkMystery*", "mystery")],
                &ReturnSpec::none(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CodegenError::UnknownType {
                type_name: "GtkMystery*".to_string(),
                parameter: "mystery".to_string(),
            }
        );
    }

    #[test]
    fn unknown_return_type_reports_type() {
        let err = registry()
            .generate_wrapper("gtk_mystery_new", &[], &ReturnSpec::owned("GtkMystery*"))
            .unwrap_err();
        assert!(matches!(err, CodegenError::UnknownReturnType { .. }));
    }

    #[test]
    fn void_function_emits_none_return_only() {
        let fragments = registry()
            .generate_wrapper("gtk_main", &[], &ReturnSpec::none())
            .unwrap();
        assert_eq!(fragments.parse_format, "");
        assert_eq!(fragments.variable_block, "");
        assert_eq!(fragments.code_after, "    Py_INCREF(Py_None);\n    return Py_None;");
    }

    #[test]
    fn unsupported_position_aborts_pass() {
        let err = registry()
            .generate_wrapper(
                "bad",
                &[ParamSpec::new("GdkRectangle", "area")],
                &ReturnSpec::none(),
            )
            .unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedParameter { .. }));
    }
}
