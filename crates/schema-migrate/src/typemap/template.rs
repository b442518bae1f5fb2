//! Type name templates with `{N}`, `{P}` and `{S}` placeholders.

use std::fmt;

use crate::core::types::JdbcTypeOptions;

/// Placeholder replaced by the size option.
pub const SIZE_PLACEHOLDER: &str = "{N}";
/// Placeholder replaced by the precision option.
pub const PRECISION_PLACEHOLDER: &str = "{P}";
/// Placeholder replaced by the scale option.
pub const SCALE_PLACEHOLDER: &str = "{S}";

/// A vendor type name with optional size/precision/scale placeholders,
/// e.g. `VARCHAR({N})` or `DECIMAL({P},{S})`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeNameTemplate(&'static str);

impl TypeNameTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn has_size(&self) -> bool {
        self.0.contains(SIZE_PLACEHOLDER)
    }

    pub fn has_precision(&self) -> bool {
        self.0.contains(PRECISION_PLACEHOLDER)
    }

    pub fn has_scale(&self) -> bool {
        self.0.contains(SCALE_PLACEHOLDER)
    }

    /// Whether the template contains any placeholder.
    pub fn is_parameterized(&self) -> bool {
        self.has_size() || self.has_precision() || self.has_scale()
    }

    /// Substitute every placeholder whose value is present.
    ///
    /// Placeholders without a value are left in the output untouched, so a
    /// caller must only expand templates whose required options it has.
    pub fn expand(&self, options: &JdbcTypeOptions) -> String {
        let mut out = self.0.to_string();
        if let Some(size) = options.size {
            out = out.replace(SIZE_PLACEHOLDER, &size.to_string());
        }
        if let Some(precision) = options.precision {
            out = out.replace(PRECISION_PLACEHOLDER, &precision.to_string());
        }
        if let Some(scale) = options.scale {
            out = out.replace(SCALE_PLACEHOLDER, &scale.to_string());
        }
        out
    }
}

impl fmt::Display for TypeNameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
