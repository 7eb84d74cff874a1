use std::ffi::CStr;
use std::ptr::NonNull;

use jni::sys::{jclass, jmethodID, jvalue, JNIEnv, JNINativeInterface_, JNI_FALSE};

use crate::JniError;

/// The command interface of the creating thread. Only valid on that thread and only while the vm
/// it came from is alive.
#[derive(Debug)]
pub struct JniEnv {
    raw: NonNull<JNIEnv>,
}

macro_rules! table_fn {
    ($env:expr, $name:ident) => {
        $env.function_table().$name.ok_or(JniError::MissingFunction(stringify!($name)))?
    };
}

impl JniEnv {
    pub fn from_raw(raw: NonNull<JNIEnv>) -> Self {
        Self { raw }
    }

    pub fn as_raw(&self) -> *mut JNIEnv {
        self.raw.as_ptr()
    }

    fn function_table(&self) -> &JNINativeInterface_ {
        unsafe { &**self.raw.as_ptr() }
    }

    /// `name` is in internal form, eg `java/lang/Object`.
    pub fn find_class(&self, name: &CStr) -> Result<Option<jclass>, JniError> {
        let find_class = table_fn!(self, FindClass);
        let class = unsafe { find_class(self.as_raw(), name.as_ptr()) };
        Ok(if class.is_null() { None } else { Some(class) })
    }

    pub fn get_static_method_id(&self, class: jclass, name: &CStr, signature: &CStr) -> Result<Option<jmethodID>, JniError> {
        let get_static_method_id = table_fn!(self, GetStaticMethodID);
        let method = unsafe { get_static_method_id(self.as_raw(), class, name.as_ptr(), signature.as_ptr()) };
        Ok(if method.is_null() { None } else { Some(method) })
    }

    pub fn call_static_void_method(&self, class: jclass, method: jmethodID, args: &[jvalue]) -> Result<(), JniError> {
        let call_static_void_method = table_fn!(self, CallStaticVoidMethodA);
        unsafe { call_static_void_method(self.as_raw(), class, method, args.as_ptr()) };
        Ok(())
    }

    pub fn exception_check(&self) -> Result<bool, JniError> {
        let exception_check = table_fn!(self, ExceptionCheck);
        Ok(unsafe { exception_check(self.as_raw()) } != JNI_FALSE)
    }

    pub fn exception_describe(&self) -> Result<(), JniError> {
        let exception_describe = table_fn!(self, ExceptionDescribe);
        unsafe { exception_describe(self.as_raw()) };
        Ok(())
    }

    pub fn exception_clear(&self) -> Result<(), JniError> {
        let exception_clear = table_fn!(self, ExceptionClear);
        unsafe { exception_clear(self.as_raw()) };
        Ok(())
    }
}
