#![allow(non_snake_case)]

use std::ffi::{c_void, NulError};
use std::ptr;
use std::ptr::NonNull;

use jni::sys::{jint, JavaVM, JNIEnv, JNI_OK};
use log::debug;
use thiserror::Error;

pub use crate::init_args::InitArgs;
pub use crate::invoke_interface::JavaVm;
pub use crate::native_interface::JniEnv;

pub mod init_args;
pub mod invoke_interface;
pub mod native_interface;

pub const CREATE_JAVA_VM_SYMBOL: &str = "JNI_CreateJavaVM";

pub type CreateJavaVm = unsafe extern "system" fn(pvm: *mut *mut JavaVM, penv: *mut *mut c_void, args: *mut c_void) -> jint;

#[derive(Error, Debug)]
pub enum JniError {
    #[error("JNI call returned status {0}")]
    Status(jint),
    #[error("JNI_CreateJavaVM returned a null {0}")]
    NullHandle(&'static str),
    #[error("function table has no entry for {0}")]
    MissingFunction(&'static str),
    #[error(transparent)]
    Nul(#[from] NulError),
}

/// Calls the factory with `args`. Only a non negative status with both out pointers set counts as
/// a created vm.
///
/// # Safety
/// `factory` must be a `JNI_CreateJavaVM` implementation, and no other vm may exist in this process.
pub unsafe fn create_java_vm(factory: CreateJavaVm, args: &InitArgs) -> Result<(JavaVm, JniEnv), JniError> {
    let mut option_table = args.option_table();
    let mut raw_args = args.raw(&mut option_table);
    let mut vm: *mut JavaVM = ptr::null_mut();
    let mut env: *mut c_void = ptr::null_mut();
    debug!("calling {} with {} options, version {:#x}", CREATE_JAVA_VM_SYMBOL, raw_args.nOptions, raw_args.version);
    let status = factory(&mut vm, &mut env, &mut raw_args as *mut _ as *mut c_void);
    if status < JNI_OK {
        return Err(JniError::Status(status));
    }
    let vm = NonNull::new(vm).ok_or(JniError::NullHandle("JavaVM"))?;
    let env = NonNull::new(env as *mut JNIEnv).ok_or(JniError::NullHandle("JNIEnv"))?;
    Ok((JavaVm::from_raw(vm), JniEnv::from_raw(env)))
}
