use std::ffi::{c_void, CStr, CString};
use std::ptr;

use jni::sys::{jboolean, jint, JavaVMInitArgs, JavaVMOption, JNI_FALSE, JNI_TRUE};

use crate::JniError;

/// Owns the option strings for a `JavaVMInitArgs` block. Options are kept narrow and NUL terminated,
/// which is what the invocation api reads.
#[derive(Debug, Clone)]
pub struct InitArgs {
    version: jint,
    ignore_unrecognized: bool,
    options: Vec<CString>,
}

impl InitArgs {
    pub fn new(version: jint) -> Self {
        Self {
            version,
            ignore_unrecognized: false,
            options: vec![],
        }
    }

    pub fn option(mut self, option: impl Into<Vec<u8>>) -> Result<Self, JniError> {
        self.options.push(CString::new(option)?);
        Ok(self)
    }

    pub fn ignore_unrecognized(mut self, ignore_unrecognized: bool) -> Self {
        self.ignore_unrecognized = ignore_unrecognized;
        self
    }

    pub fn version(&self) -> jint {
        self.version
    }

    pub fn is_ignore_unrecognized(&self) -> bool {
        self.ignore_unrecognized
    }

    pub fn options(&self) -> impl Iterator<Item = &CStr> {
        self.options.iter().map(|option| option.as_c_str())
    }

    pub(crate) fn option_table(&self) -> Vec<JavaVMOption> {
        self.options.iter().map(|option| JavaVMOption {
            optionString: option.as_ptr() as *mut _,
            extraInfo: ptr::null_mut::<c_void>(),
        }).collect()
    }

    /// The returned block points into both `self` and `option_table`.
    pub(crate) fn raw(&self, option_table: &mut [JavaVMOption]) -> JavaVMInitArgs {
        let ignore_unrecognized: jboolean = if self.ignore_unrecognized { JNI_TRUE } else { JNI_FALSE };
        JavaVMInitArgs {
            version: self.version,
            nOptions: option_table.len() as jint,
            options: option_table.as_mut_ptr(),
            ignoreUnrecognized: ignore_unrecognized,
        }
    }
}
