use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use jni_invocation::JniError;
use thiserror::Error;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LaunchStep {
    LibraryLoad,
    SymbolResolution,
    RuntimeCreation,
    ClassResolution,
    MethodResolution,
}

impl Display for LaunchStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LaunchStep::LibraryLoad => "load the JVM library",
            LaunchStep::SymbolResolution => "find JNI_CreateJavaVM",
            LaunchStep::RuntimeCreation => "create the JVM",
            LaunchStep::ClassResolution => "find the entry class",
            LaunchStep::MethodResolution => "find the entry method",
        })
    }
}

/// Every variant ends the launch attempt, nothing is retried.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("could not load JVM library {path:?}: {reason}")]
    LibraryLoad {
        path: PathBuf,
        reason: String,
    },
    #[error("could not resolve {symbol}: {reason}")]
    SymbolResolution {
        symbol: &'static str,
        reason: String,
    },
    #[error("could not create JVM: {0}")]
    RuntimeCreation(#[source] JniError),
    #[error("could not resolve class {class_name}: {reason}")]
    ClassResolution {
        class_name: String,
        reason: String,
    },
    #[error("could not resolve method {class_name}.{method_name}{signature}: {reason}")]
    MethodResolution {
        class_name: String,
        method_name: String,
        signature: String,
        reason: String,
    },
}

impl LaunchError {
    pub fn step(&self) -> LaunchStep {
        match self {
            LaunchError::LibraryLoad { .. } => LaunchStep::LibraryLoad,
            LaunchError::SymbolResolution { .. } => LaunchStep::SymbolResolution,
            LaunchError::RuntimeCreation(_) => LaunchStep::RuntimeCreation,
            LaunchError::ClassResolution { .. } => LaunchStep::ClassResolution,
            LaunchError::MethodResolution { .. } => LaunchStep::MethodResolution,
        }
    }

    /// Text shown to the user.
    pub fn user_message(&self) -> String {
        format!("Failed to {}.\n\n{}", self.step(), self)
    }
}
