#![allow(dead_code)]

use std::cell::RefCell;
use std::ffi::{c_void, CStr, OsString};
use std::os::raw::c_char;
use std::path::{Path, PathBuf};

use jni::sys::{jboolean, jclass, jint, jmethodID, jvalue, JavaVM, JavaVMInitArgs, JNIEnv, JNIInvokeInterface_, JNINativeInterface_, JNI_ERR, JNI_FALSE, JNI_OK, JNI_TRUE};

use jni_invocation::{CreateJavaVm, CREATE_JAVA_VM_SYMBOL};
use launcher::{current_library_search_path, EntryPoint, FailureNotifier, LaunchError, LaunchStep, RuntimeLibrary, RuntimeLoader};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FailAt {
    LibraryLoad,
    SymbolResolution,
    RuntimeCreation,
    NullEnv,
    MethodResolution,
    DestroyVm,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Event {
    Load { path: PathBuf, search_path: OsString },
    ResolveSymbol,
    CreateVm { version: jint, ignore_unrecognized: bool, options: Vec<String> },
    FindClass(String),
    GetStaticMethodId { name: String, signature: String },
    ExceptionDescribe,
    ExceptionClear,
    CallStaticVoidMethod,
    DestroyVm,
    Release,
    Retain,
    Notify,
}

#[derive(Default)]
struct FakeVmState {
    fail_at: Option<FailAt>,
    events: Vec<Event>,
    pending_exception: bool,
}

thread_local! {
    static FAKE_VM: RefCell<FakeVmState> = RefCell::new(FakeVmState::default());
}

const FAKE_CLASS: usize = 0x10;
const FAKE_METHOD: usize = 0x20;

pub fn reset(fail_at: Option<FailAt>) {
    FAKE_VM.with(|state| {
        *state.borrow_mut() = FakeVmState { fail_at, ..FakeVmState::default() };
    });
}

pub fn events() -> Vec<Event> {
    FAKE_VM.with(|state| state.borrow().events.clone())
}

pub fn pending_exception() -> bool {
    FAKE_VM.with(|state| state.borrow().pending_exception)
}

fn fail_at() -> Option<FailAt> {
    FAKE_VM.with(|state| state.borrow().fail_at)
}

fn record(event: Event) {
    FAKE_VM.with(|state| state.borrow_mut().events.push(event));
}

fn raise() {
    FAKE_VM.with(|state| state.borrow_mut().pending_exception = true);
}

unsafe fn c_string(ptr: *const c_char) -> String {
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

unsafe extern "system" fn find_class(_env: *mut JNIEnv, name: *const c_char) -> jclass {
    let name = c_string(name);
    record(Event::FindClass(name.clone()));
    if name == EntryPoint::default().class_name {
        FAKE_CLASS as jclass
    } else {
        raise();
        std::ptr::null_mut()
    }
}

unsafe extern "system" fn get_static_method_id(_env: *mut JNIEnv, class: jclass, name: *const c_char, signature: *const c_char) -> jmethodID {
    assert_eq!(class as usize, FAKE_CLASS);
    let name = c_string(name);
    let signature = c_string(signature);
    record(Event::GetStaticMethodId { name, signature });
    if fail_at() == Some(FailAt::MethodResolution) {
        raise();
        return std::ptr::null_mut();
    }
    FAKE_METHOD as jmethodID
}

unsafe extern "system" fn call_static_void_method(_env: *mut JNIEnv, class: jclass, method: jmethodID, _args: *const jvalue) {
    assert_eq!(class as usize, FAKE_CLASS);
    assert_eq!(method as usize, FAKE_METHOD);
    record(Event::CallStaticVoidMethod);
}

unsafe extern "system" fn exception_check(_env: *mut JNIEnv) -> jboolean {
    if pending_exception() { JNI_TRUE } else { JNI_FALSE }
}

unsafe extern "system" fn exception_describe(_env: *mut JNIEnv) {
    record(Event::ExceptionDescribe);
}

unsafe extern "system" fn exception_clear(_env: *mut JNIEnv) {
    record(Event::ExceptionClear);
    FAKE_VM.with(|state| state.borrow_mut().pending_exception = false);
}

unsafe extern "system" fn destroy_java_vm(_vm: *mut JavaVM) -> jint {
    record(Event::DestroyVm);
    if fail_at() == Some(FailAt::DestroyVm) {
        return JNI_ERR;
    }
    JNI_OK
}

unsafe extern "system" fn create_java_vm(pvm: *mut *mut JavaVM, penv: *mut *mut c_void, args: *mut c_void) -> jint {
    let args = &*(args as *const JavaVMInitArgs);
    let options = (0..args.nOptions as usize)
        .map(|i| c_string((*args.options.add(i)).optionString))
        .collect();
    record(Event::CreateVm { version: args.version, ignore_unrecognized: args.ignoreUnrecognized == JNI_TRUE, options });
    if fail_at() == Some(FailAt::RuntimeCreation) {
        return JNI_ERR;
    }

    let mut invoke_table: JNIInvokeInterface_ = std::mem::zeroed();
    invoke_table.DestroyJavaVM = Some(destroy_java_vm);
    let vm: JavaVM = Box::into_raw(Box::new(invoke_table));
    *pvm = Box::into_raw(Box::new(vm));

    if fail_at() == Some(FailAt::NullEnv) {
        return JNI_OK;
    }
    let mut native_table: JNINativeInterface_ = std::mem::zeroed();
    native_table.FindClass = Some(find_class);
    native_table.GetStaticMethodID = Some(get_static_method_id);
    native_table.CallStaticVoidMethodA = Some(call_static_void_method);
    native_table.ExceptionCheck = Some(exception_check);
    native_table.ExceptionDescribe = Some(exception_describe);
    native_table.ExceptionClear = Some(exception_clear);
    let env: JNIEnv = Box::into_raw(Box::new(native_table));
    *penv = Box::into_raw(Box::new(env)) as *mut c_void;
    JNI_OK
}

pub struct FakeLoader;

pub struct FakeLibrary;

impl RuntimeLoader for FakeLoader {
    type Library = FakeLibrary;

    fn load(&self, path: &Path) -> Result<FakeLibrary, LaunchError> {
        record(Event::Load { path: path.to_path_buf(), search_path: current_library_search_path() });
        if fail_at() == Some(FailAt::LibraryLoad) {
            return Err(LaunchError::LibraryLoad { path: path.to_path_buf(), reason: "no such file".to_string() });
        }
        Ok(FakeLibrary)
    }
}

impl RuntimeLibrary for FakeLibrary {
    fn create_java_vm(&self) -> Result<CreateJavaVm, LaunchError> {
        record(Event::ResolveSymbol);
        if fail_at() == Some(FailAt::SymbolResolution) {
            return Err(LaunchError::SymbolResolution { symbol: CREATE_JAVA_VM_SYMBOL, reason: "undefined symbol".to_string() });
        }
        Ok(create_java_vm)
    }

    fn retain(self) {
        record(Event::Retain);
        std::mem::forget(self);
    }
}

impl Drop for FakeLibrary {
    fn drop(&mut self) {
        record(Event::Release);
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Notification {
    pub title: String,
    pub step: LaunchStep,
    pub message: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Vec<Notification>,
}

impl FailureNotifier for RecordingNotifier {
    fn notify(&mut self, title: &str, err: &LaunchError) {
        record(Event::Notify);
        self.notifications.push(Notification { title: title.to_string(), step: err.step(), message: err.user_message() });
    }
}
