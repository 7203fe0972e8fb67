//! Generation policy fixed at configuration time.

/// Width of the target platform's native signed integer path.
///
/// Decides how `guint32` values are marshalled: when the native signed width
/// already covers the unsigned 32-bit range, they ride the plain machine
/// integer parse path; otherwise they go through `PyLong` so large values
/// survive the round trip. This is settled once, when the stock registry is
/// built; the emitted code never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeIntWidth {
    W32,
    W64,
}

/// Policy knobs for building a [`crate::registry::TypeRegistry`].
///
/// `Default` derives the integer width from the build target; a driver
/// cross-generating for another platform overrides it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub native_int_width: NativeIntWidth,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let native_int_width = if cfg!(target_pointer_width = "64") {
            NativeIntWidth::W64
        } else {
            NativeIntWidth::W32
        };
        Self { native_int_width }
    }
}

impl GeneratorConfig {
    /// Config with an explicit native integer width.
    pub fn with_native_int_width(native_int_width: NativeIntWidth) -> Self {
        Self { native_int_width }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_build_target() {
        let config = GeneratorConfig::default();
        if cfg!(target_pointer_width = "64") {
            assert_eq!(config.native_int_width, NativeIntWidth::W64);
        } else {
            assert_eq!(config.native_int_width, NativeIntWidth::W32);
        }
    }

    #[test]
    fn explicit_width_overrides() {
        let config = GeneratorConfig::with_native_int_width(NativeIntWidth::W32);
        assert_eq!(config.native_int_width, NativeIntWidth::W32);
    }
}
