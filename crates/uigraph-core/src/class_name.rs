use std::fmt;

use crate::TypeHash;

/// Package-qualified class name in the external component library.
///
/// # Examples
///
/// ```
/// use uigraph_core::ClassName;
///
/// let button = ClassName::new("JButton", vec!["javax".into(), "swing".into()]);
/// assert_eq!(button.to_string(), "javax.swing.JButton");
/// assert_eq!(ClassName::parse("javax.swing.JButton"), button);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    /// Package path, outermost first. Empty for the top-level package.
    pub package: Vec<String>,
    /// Simple class name.
    pub name: String,
}

impl ClassName {
    pub fn new(name: impl Into<String>, package: Vec<String>) -> Self {
        Self {
            name: name.into(),
            package,
        }
    }

    /// Create a class name in the top-level package.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: Vec::new(),
        }
    }

    /// Parse a dotted name. The last segment is the simple name.
    pub fn parse(s: &str) -> Self {
        let mut parts: Vec<String> = s
            .split('.')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.pop() {
            Some(name) => Self {
                name,
                package: parts,
            },
            None => Self::global(""),
        }
    }

    pub fn is_global(&self) -> bool {
        self.package.is_empty()
    }

    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Sibling class in the same package.
    pub fn sibling(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: self.package.clone(),
        }
    }

    /// Internal form with `/` separators, as used in symbol tables of emitted units.
    pub fn internal_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package.join("/"), self.name)
        }
    }

    pub fn type_hash(&self) -> TypeHash {
        TypeHash::from_name(&self.to_string())
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.package.join("."), self.name)
        }
    }
}

impl From<&str> for ClassName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
