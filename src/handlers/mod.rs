//! Per-category code-generation handlers.
//!
//! Each native-type category gets one handler implementing the two-operation
//! contract: `emit_parameter` writes everything one declared parameter needs
//! into the accumulator (locals, exactly one unpacking binding, optional
//! pre-call validation, call-argument expressions); `emit_return` declares
//! the `ret` local and writes the post-call conversion. The set is closed:
//! a new native-type family adds one variant here plus its registration,
//! and nothing else changes.
//!
//! Handlers are immutable after construction and shared across every type
//! key they are registered under, so a family's bare, pointer, and
//! const-pointer spellings always behave identically.

pub mod boxed;
pub mod enums;
pub mod file;
pub mod object;
pub mod scalar;
pub mod special;
pub mod strings;

pub use boxed::{BoxedArg, CustomBoxedArg, PointerArg};
pub use enums::{EnumArg, FlagsArg};
pub use file::FileArg;
pub use object::ObjectArg;
pub use scalar::{BoolArg, DoubleArg, Int64Arg, IntArg, TimeArg, UInt64Arg, ULongArg};
pub use special::{
    AtomArg, GErrorArg, GTypeArg, PyObjectArg, RectangleArg, RectanglePtrArg, TreePathArg, VoidArg,
};
pub use strings::{BufferArg, CharArg, StringArg, UniCharArg};

use crate::accumulator::CodeAccumulator;
use crate::error::CodegenError;

/// Closed set of native-type categories.
#[derive(Debug, Clone)]
pub enum ArgHandler {
    Void(VoidArg),
    Str(StringArg),
    Buffer(BufferArg),
    Char(CharArg),
    UniChar(UniCharArg),
    Int(IntArg),
    Bool(BoolArg),
    Time(TimeArg),
    ULong(ULongArg),
    Int64(Int64Arg),
    UInt64(UInt64Arg),
    Double(DoubleArg),
    File(FileArg),
    Enum(EnumArg),
    Flags(FlagsArg),
    Object(ObjectArg),
    Boxed(BoxedArg),
    CustomBoxed(CustomBoxedArg),
    Pointer(PointerArg),
    Atom(AtomArg),
    GType(GTypeArg),
    GError(GErrorArg),
    TreePath(TreePathArg),
    RectanglePtr(RectanglePtrArg),
    Rectangle(RectangleArg),
    PyObject(PyObjectArg),
}

impl ArgHandler {
    /// Emit everything one declared parameter contributes to the wrapper.
    pub fn emit_parameter(
        &self,
        ptype: &str,
        pname: &str,
        pdflt: Option<&str>,
        pnull: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        match self {
            Self::Void(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Str(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Buffer(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Char(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::UniChar(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Int(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Bool(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Time(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::ULong(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Int64(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::UInt64(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Double(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::File(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Enum(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Flags(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Object(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Boxed(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::CustomBoxed(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Pointer(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Atom(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::GType(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::GError(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::TreePath(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::RectanglePtr(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::Rectangle(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
            Self::PyObject(h) => h.emit_parameter(ptype, pname, pdflt, pnull, acc),
        }
    }

    /// Emit the return-value declaration and post-call conversion.
    pub fn emit_return(
        &self,
        ptype: &str,
        owns_return: bool,
        acc: &mut CodeAccumulator,
    ) -> Result<(), CodegenError> {
        match self {
            Self::Void(h) => h.emit_return(ptype, owns_return, acc),
            Self::Str(h) => h.emit_return(ptype, owns_return, acc),
            Self::Buffer(h) => h.emit_return(ptype, owns_return, acc),
            Self::Char(h) => h.emit_return(ptype, owns_return, acc),
            Self::UniChar(h) => h.emit_return(ptype, owns_return, acc),
            Self::Int(h) => h.emit_return(ptype, owns_return, acc),
            Self::Bool(h) => h.emit_return(ptype, owns_return, acc),
            Self::Time(h) => h.emit_return(ptype, owns_return, acc),
            Self::ULong(h) => h.emit_return(ptype, owns_return, acc),
            Self::Int64(h) => h.emit_return(ptype, owns_return, acc),
            Self::UInt64(h) => h.emit_return(ptype, owns_return, acc),
            Self::Double(h) => h.emit_return(ptype, owns_return, acc),
            Self::File(h) => h.emit_return(ptype, owns_return, acc),
            Self::Enum(h) => h.emit_return(ptype, owns_return, acc),
            Self::Flags(h) => h.emit_return(ptype, owns_return, acc),
            Self::Object(h) => h.emit_return(ptype, owns_return, acc),
            Self::Boxed(h) => h.emit_return(ptype, owns_return, acc),
            Self::CustomBoxed(h) => h.emit_return(ptype, owns_return, acc),
            Self::Pointer(h) => h.emit_return(ptype, owns_return, acc),
            Self::Atom(h) => h.emit_return(ptype, owns_return, acc),
            Self::GType(h) => h.emit_return(ptype, owns_return, acc),
            Self::GError(h) => h.emit_return(ptype, owns_return, acc),
            Self::TreePath(h) => h.emit_return(ptype, owns_return, acc),
            Self::RectanglePtr(h) => h.emit_return(ptype, owns_return, acc),
            Self::Rectangle(h) => h.emit_return(ptype, owns_return, acc),
            Self::PyObject(h) => h.emit_return(ptype, owns_return, acc),
        }
    }
}
