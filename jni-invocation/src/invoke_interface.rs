use std::ptr::NonNull;

use jni::sys::{JavaVM, JNI_OK};

use crate::JniError;

/// A created vm. Destroying consumes the handle. There is deliberately no `Drop`: a handle that is
/// never destroyed is left for process exit to clean up.
#[derive(Debug)]
pub struct JavaVm {
    raw: NonNull<JavaVM>,
}

impl JavaVm {
    pub fn from_raw(raw: NonNull<JavaVM>) -> Self {
        Self { raw }
    }

    pub fn destroy(self) -> Result<(), JniError> {
        let destroy_java_vm = unsafe { (**self.raw.as_ptr()).DestroyJavaVM }.ok_or(JniError::MissingFunction("DestroyJavaVM"))?;
        let status = unsafe { destroy_java_vm(self.raw.as_ptr()) };
        if status != JNI_OK {
            return Err(JniError::Status(status));
        }
        Ok(())
    }
}
