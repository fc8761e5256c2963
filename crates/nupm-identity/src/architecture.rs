//! Processor architecture component of an assembly identity

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown processor architecture \"{0}\"")]
pub struct InvalidArchitectureError(pub String);

/// Target processor architecture of an assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessorArchitecture {
    /// Architecture-neutral; never emitted by the canonical form.
    #[default]
    None,
    Msil,
    X86,
    Ia64,
    Amd64,
    Arm,
}

impl ProcessorArchitecture {
    /// The canonical upper-case spelling used by display names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessorArchitecture::None => "None",
            ProcessorArchitecture::Msil => "MSIL",
            ProcessorArchitecture::X86 => "X86",
            ProcessorArchitecture::Ia64 => "IA64",
            ProcessorArchitecture::Amd64 => "AMD64",
            ProcessorArchitecture::Arm => "ARM",
        }
    }
}

impl fmt::Display for ProcessorArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessorArchitecture {
    type Err = InvalidArchitectureError;

    /// Case-insensitive; an empty string means `None`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(ProcessorArchitecture::None);
        }
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "none" => Ok(ProcessorArchitecture::None),
            "msil" => Ok(ProcessorArchitecture::Msil),
            "x86" => Ok(ProcessorArchitecture::X86),
            "ia64" => Ok(ProcessorArchitecture::Ia64),
            "amd64" => Ok(ProcessorArchitecture::Amd64),
            "arm" => Ok(ProcessorArchitecture::Arm),
            _ => Err(InvalidArchitectureError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("msil".parse(), Ok(ProcessorArchitecture::Msil));
        assert_eq!("MSIL".parse(), Ok(ProcessorArchitecture::Msil));
        assert_eq!("Amd64".parse(), Ok(ProcessorArchitecture::Amd64));
        assert_eq!("x86".parse(), Ok(ProcessorArchitecture::X86));
        assert_eq!("IA64".parse(), Ok(ProcessorArchitecture::Ia64));
        assert_eq!("arm".parse(), Ok(ProcessorArchitecture::Arm));
    }

    #[test]
    fn test_empty_means_none() {
        assert_eq!("".parse(), Ok(ProcessorArchitecture::None));
    }

    #[test]
    fn test_unknown_architecture() {
        assert!("sparc".parse::<ProcessorArchitecture>().is_err());
    }

    #[test]
    fn test_display_is_upper() {
        assert_eq!(ProcessorArchitecture::Msil.to_string(), "MSIL");
        assert_eq!(ProcessorArchitecture::Amd64.to_string(), "AMD64");
    }
}
