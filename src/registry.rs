//! String-keyed registry mapping declared type names to handlers.
//!
//! Built once at startup, read-only during generation. Keys are the exact
//! spellings interface descriptions use: bare names, `*`-suffixed pointer
//! forms, `const-`-prefixed forms, and synonyms. A family's spellings all
//! share one handler instance, so qualification never changes behavior.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{GeneratorConfig, NativeIntWidth};
use crate::handlers::{
    ArgHandler, AtomArg, BoolArg, BoxedArg, BufferArg, CharArg, CustomBoxedArg, DoubleArg,
    EnumArg, FileArg, FlagsArg, GErrorArg, GTypeArg, Int64Arg, IntArg, ObjectArg, PointerArg,
    PyObjectArg, RectangleArg, RectanglePtrArg, StringArg, TimeArg, TreePathArg, UInt64Arg,
    ULongArg, UniCharArg, VoidArg,
};

#[derive(Debug, Default)]
pub struct TypeRegistry {
    handlers: FxHashMap<String, Arc<ArgHandler>>,
}

impl TypeRegistry {
    /// An empty registry. Most drivers want [`TypeRegistry::with_defaults`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to a handler. Re-registering a key overwrites silently;
    /// interface descriptions routinely re-declare types with and without
    /// qualifiers, and the last registration wins.
    pub fn register(&mut self, key: &str, handler: Arc<ArgHandler>) {
        if self.handlers.insert(key.to_string(), handler).is_some() {
            tracing::debug!(key, "overwriting existing handler registration");
        }
    }

    /// Register an enumeration. A missing typecode degrades to
    /// `G_TYPE_NONE` so plain C enums still get the lookup path.
    pub fn register_enum(&mut self, name: &str, typecode: Option<&str>) {
        let typecode = typecode.unwrap_or("G_TYPE_NONE");
        let handler = Arc::new(ArgHandler::Enum(EnumArg::new(name, typecode)));
        self.register(name, handler);
    }

    /// Register a flag set. Same typecode defaulting as [`register_enum`].
    ///
    /// [`register_enum`]: TypeRegistry::register_enum
    pub fn register_flag(&mut self, name: &str, typecode: Option<&str>) {
        let typecode = typecode.unwrap_or("G_TYPE_NONE");
        let handler = Arc::new(ArgHandler::Flags(FlagsArg::new(name, typecode)));
        self.register(name, handler);
    }

    /// Register a GObject subclass under its bare and pointer spellings,
    /// recording `parent` for hierarchy queries.
    pub fn register_object(&mut self, name: &str, parent: Option<&str>, typecode: &str) {
        let handler = Arc::new(ArgHandler::Object(ObjectArg::new(name, parent, typecode)));
        // Bare form too, in case a declaration drops the `*`.
        self.register(name, Arc::clone(&handler));
        self.register(&format!("{name}*"), Arc::clone(&handler));
        if name == "GdkPixmap" {
            // Legacy synonym: bitmaps are declared as their own type but
            // marshal exactly like pixmaps.
            self.register("GdkBitmap", Arc::clone(&handler));
            self.register("GdkBitmap*", handler);
        }
    }

    /// Register a boxed type under its bare, pointer, and const-pointer
    /// spellings. A bare name that is already bound is left alone, since
    /// descriptions often declare the same boxed type twice.
    pub fn register_boxed(&mut self, name: &str, typecode: &str) {
        if self.handlers.contains_key(name) {
            return;
        }
        let handler = Arc::new(ArgHandler::Boxed(BoxedArg::new(name, typecode)));
        self.register_family(name, handler);
    }

    /// Register a hand-wrapped opaque type under its bare, pointer, and
    /// const-pointer spellings.
    pub fn register_custom_boxed(
        &mut self,
        name: &str,
        pytype: &str,
        getter: &str,
        constructor: &str,
    ) {
        let handler = Arc::new(ArgHandler::CustomBoxed(CustomBoxedArg::new(
            name,
            pytype,
            getter,
            constructor,
        )));
        self.register_family(name, handler);
    }

    /// Register a plain pointer type under its bare, pointer, and
    /// const-pointer spellings.
    pub fn register_pointer(&mut self, name: &str, typecode: &str) {
        let handler = Arc::new(ArgHandler::Pointer(PointerArg::new(name, typecode)));
        self.register_family(name, handler);
    }

    fn register_family(&mut self, name: &str, handler: Arc<ArgHandler>) {
        self.register(name, Arc::clone(&handler));
        self.register(&format!("{name}*"), Arc::clone(&handler));
        self.register(&format!("const-{name}*"), handler);
    }

    /// Exact lookup, with one deliberate exception: unknown
    /// pointer-qualified `GdkEvent` subtypes fall back to the generic
    /// `GdkEvent*` handler, since every event subtype marshals identically.
    pub fn get(&self, key: &str) -> Option<&Arc<ArgHandler>> {
        if let Some(handler) = self.handlers.get(key) {
            return Some(handler);
        }
        if key.starts_with("GdkEvent") && key.ends_with('*') {
            tracing::debug!(key, "falling back to the generic GdkEvent* handler");
            return self.handlers.get("GdkEvent*");
        }
        None
    }

    /// Whether `otype` equals `ancestor` or reaches it through the
    /// single-parent chain recorded at registration.
    ///
    /// Never errors: unknown names, non-object handlers, and exhausted
    /// chains all answer `false`. The walk keeps a visited set: a cycle in
    /// the registered parents is broken registration data, reported and
    /// answered `false` rather than looping.
    pub fn object_is_a<'a>(&'a self, otype: &'a str, ancestor: &str) -> bool {
        let mut current = otype;
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        loop {
            if current == ancestor {
                return true;
            }
            if !visited.insert(current) {
                tracing::error!(
                    otype,
                    at = current,
                    "cycle in registered object hierarchy"
                );
                return false;
            }
            let Some(handler) = self.get(current) else {
                return false;
            };
            let ArgHandler::Object(object) = handler.as_ref() else {
                return false;
            };
            match object.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Registry pre-loaded with the stock vocabulary: fundamental C and
    /// GLib types, their synonyms, and the base `GObject`.
    pub fn with_defaults(config: &GeneratorConfig) -> Self {
        let mut registry = Self::new();

        let void = Arc::new(ArgHandler::Void(VoidArg));
        registry.register("none", void);

        let string = Arc::new(ArgHandler::Str(StringArg));
        for key in [
            "char*",
            "gchar*",
            "const-char*",
            "char-const*",
            "const-gchar*",
            "gchar-const*",
            "string",
            "static_string",
        ] {
            registry.register(key, Arc::clone(&string));
        }

        let buffer = Arc::new(ArgHandler::Buffer(BufferArg));
        for key in ["unsigned-char*", "const-guchar*", "guchar*"] {
            registry.register(key, Arc::clone(&buffer));
        }

        let character = Arc::new(ArgHandler::Char(CharArg));
        for key in ["char", "gchar", "guchar"] {
            registry.register(key, Arc::clone(&character));
        }

        registry.register("gunichar", Arc::new(ArgHandler::UniChar(UniCharArg)));

        let int = Arc::new(ArgHandler::Int(IntArg));
        for key in [
            "int", "gint", "guint", "short", "gshort", "gushort", "long", "glong", "gsize",
            "gssize", "guint8", "gint8", "guint16", "gint16", "gint32",
        ] {
            registry.register(key, Arc::clone(&int));
        }

        registry.register("gboolean", Arc::new(ArgHandler::Bool(BoolArg)));

        let time = Arc::new(ArgHandler::Time(TimeArg));
        registry.register("time_t", Arc::clone(&time));

        // When the native signed width covers the unsigned 32-bit range,
        // guint32 parses as a machine int; otherwise it must ride the
        // PyLong path.
        match config.native_int_width {
            NativeIntWidth::W64 => registry.register("guint32", time),
            NativeIntWidth::W32 => {
                registry.register("guint32", Arc::new(ArgHandler::ULong(ULongArg)));
            }
        }

        registry.register("gulong", Arc::new(ArgHandler::ULong(ULongArg)));

        let int64 = Arc::new(ArgHandler::Int64(Int64Arg));
        registry.register("gint64", Arc::clone(&int64));
        registry.register("long-long", int64);

        let uint64 = Arc::new(ArgHandler::UInt64(UInt64Arg));
        registry.register("guint64", Arc::clone(&uint64));
        registry.register("unsigned-long-long", uint64);

        let double = Arc::new(ArgHandler::Double(DoubleArg));
        for key in ["double", "gdouble", "float", "gfloat"] {
            registry.register(key, Arc::clone(&double));
        }

        registry.register("FILE*", Arc::new(ArgHandler::File(FileArg)));

        registry.register("GdkAtom", Arc::new(ArgHandler::Atom(AtomArg)));

        registry.register("GType", Arc::new(ArgHandler::GType(GTypeArg)));
        registry.register("GtkType", Arc::new(ArgHandler::GType(GTypeArg)));

        registry.register("GError**", Arc::new(ArgHandler::GError(GErrorArg)));
        registry.register("GtkTreePath*", Arc::new(ArgHandler::TreePath(TreePathArg)));

        let rect_ptr = Arc::new(ArgHandler::RectanglePtr(RectanglePtrArg));
        registry.register("GdkRectangle*", Arc::clone(&rect_ptr));
        registry.register("GtkAllocation*", rect_ptr);
        registry.register("GdkRectangle", Arc::new(ArgHandler::Rectangle(RectangleArg)));

        registry.register("PyObject*", Arc::new(ArgHandler::PyObject(PyObjectArg)));

        // Window system handles are pointer-sized unsigned ints.
        registry.register("GdkNativeWindow", Arc::new(ArgHandler::ULong(ULongArg)));

        registry.register_object("GObject", None, "G_TYPE_OBJECT");

        registry
    }
}
