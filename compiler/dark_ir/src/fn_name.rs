//! Fully-qualified function names.
//!
//! Three kinds of function share one namespace:
//! - standard library: `Module::function_vN` (bare `function` when the module
//!   is empty, no suffix at version 0)
//! - user functions: a plain name defined in the current canvas
//! - package functions: `owner/package/Module::function_vN`

use std::fmt;
use std::str::FromStr;

/// A standard-library function descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StdlibFnName {
    pub module: String,
    pub function: String,
    pub version: u32,
}

/// A package function descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageFnName {
    pub owner: String,
    pub package: String,
    pub module: String,
    pub function: String,
    pub version: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FQFnName {
    Stdlib(StdlibFnName),
    User(String),
    Package(PackageFnName),
}

impl FQFnName {
    /// Standard library name. Use an empty module for operators such as `+`.
    pub fn stdlib(module: &str, function: &str, version: u32) -> Self {
        FQFnName::Stdlib(StdlibFnName {
            module: module.to_string(),
            function: function.to_string(),
            version,
        })
    }

    pub fn user(name: &str) -> Self {
        FQFnName::User(name.to_string())
    }

    pub fn package(owner: &str, package: &str, module: &str, function: &str, version: u32) -> Self {
        FQFnName::Package(PackageFnName {
            owner: owner.to_string(),
            package: package.to_string(),
            module: module.to_string(),
            function: function.to_string(),
            version,
        })
    }

    pub fn is_stdlib(&self) -> bool {
        matches!(self, FQFnName::Stdlib(_))
    }
}

fn write_versioned(f: &mut fmt::Formatter<'_>, function: &str, version: u32) -> fmt::Result {
    if version == 0 {
        write!(f, "{function}")
    } else {
        write!(f, "{function}_v{version}")
    }
}

impl fmt::Display for StdlibFnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.module.is_empty() {
            write!(f, "{}::", self.module)?;
        }
        write_versioned(f, &self.function, self.version)
    }
}

impl fmt::Display for PackageFnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}::", self.owner, self.package, self.module)?;
        write_versioned(f, &self.function, self.version)
    }
}

impl fmt::Display for FQFnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FQFnName::Stdlib(name) => name.fmt(f),
            FQFnName::User(name) => f.write_str(name),
            FQFnName::Package(name) => name.fmt(f),
        }
    }
}

/// Error parsing a function name from its rendered form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FnNameParseError {
    pub input: String,
    pub reason: &'static str,
}

impl fmt::Display for FnNameParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid function name `{}`: {}", self.input, self.reason)
    }
}

impl std::error::Error for FnNameParseError {}

/// Split `function_vN` into its name and version. Anything that does not end
/// in `_v` followed by digits is version 0.
fn split_version(s: &str) -> (&str, u32) {
    if let Some(idx) = s.rfind("_v") {
        let digits = &s[idx + 2..];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(version) = digits.parse() {
                return (&s[..idx], version);
            }
        }
    }
    (s, 0)
}

impl FromStr for FQFnName {
    type Err = FnNameParseError;

    /// Parse a rendered name.
    ///
    /// Names with two `/` separators are package functions, names containing
    /// `::` are stdlib functions, and anything else is a user function.
    /// Operators (`+`, `==`) have no module and so parse as user functions;
    /// construct them with [`FQFnName::stdlib`] instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| FnNameParseError {
            input: s.to_string(),
            reason,
        };
        if s.is_empty() {
            return Err(err("empty name"));
        }

        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [owner, package, rest] => {
                let (module, function) = rest
                    .split_once("::")
                    .ok_or_else(|| err("package function is missing `Module::`"))?;
                if owner.is_empty() || package.is_empty() || module.is_empty() || function.is_empty() {
                    return Err(err("empty component in package function name"));
                }
                let (function, version) = split_version(function);
                Ok(FQFnName::package(owner, package, module, function, version))
            }
            [single] => match single.split_once("::") {
                Some((module, function)) => {
                    if module.is_empty() || function.is_empty() {
                        return Err(err("empty component in stdlib function name"));
                    }
                    let (function, version) = split_version(function);
                    Ok(FQFnName::stdlib(module, function, version))
                }
                None => Ok(FQFnName::user(single)),
            },
            _ => Err(err("expected `owner/package/Module::function`")),
        }
    }
}
