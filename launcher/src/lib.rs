use std::ffi::CString;
use std::path::{Path, PathBuf};

use jni::sys::{jclass, jint, jmethodID, JNI_VERSION_1_8};
use jni_invocation::{create_java_vm, InitArgs, JniEnv, JniError};
use launch_config::LaunchConfig;
use log::{debug, error, info, warn};

pub use crate::error::{LaunchError, LaunchStep};
pub use crate::loader::{RuntimeLibrary, RuntimeLoader, SystemLibrary, SystemLoader};
pub use crate::notifier::{default_notifier, DefaultNotifier, FailureNotifier, StderrNotifier};
#[cfg(windows)]
pub use crate::notifier::MessageBoxNotifier;
pub use crate::search_path::{append_library_search_path, current_library_search_path, library_search_variable};

pub mod error;
pub mod loader;
pub mod notifier;
pub mod search_path;

pub const FAILURE_TITLE: &str = "Snail";
pub const REQUESTED_JNI_VERSION: jint = JNI_VERSION_1_8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub class_name: String,
    pub method_name: String,
    pub signature: String,
}

impl Default for EntryPoint {
    fn default() -> Self {
        Self {
            class_name: "com/acgist/main/Application".to_string(),
            method_name: "main".to_string(),
            signature: "()V".to_string(),
        }
    }
}

/// Options in config order, with unrecognized options accepted rather than aborting creation.
pub fn init_args(config: &LaunchConfig) -> Result<InitArgs, JniError> {
    config.jvm_options().iter().try_fold(InitArgs::new(REQUESTED_JNI_VERSION).ignore_unrecognized(true), |args, option| args.option(*option))
}

pub struct Launcher<L: RuntimeLoader, N: FailureNotifier> {
    config_path: PathBuf,
    entry_point: EntryPoint,
    loader: L,
    notifier: N,
}

impl Launcher<SystemLoader, DefaultNotifier> {
    pub fn system(config_path: impl AsRef<Path>) -> Self {
        Launcher::new(config_path, SystemLoader, default_notifier())
    }
}

impl<L: RuntimeLoader, N: FailureNotifier> Launcher<L, N> {
    pub fn new(config_path: impl AsRef<Path>, loader: L, notifier: N) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            entry_point: EntryPoint::default(),
            loader,
            notifier,
        }
    }

    pub fn with_entry_point(mut self, entry_point: EntryPoint) -> Self {
        self.entry_point = entry_point;
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn launch(&mut self) -> bool {
        info!("reading launch config from {:?}", self.config_path);
        let config = LaunchConfig::read(&self.config_path);
        self.launch_with(&config)
    }

    pub fn launch_with(&mut self, config: &LaunchConfig) -> bool {
        self.try_launch_with(config).is_ok()
    }

    /// Like `launch_with` but hands back the error. The user has already been notified of it by the
    /// time this returns.
    pub fn try_launch_with(&mut self, config: &LaunchConfig) -> Result<(), LaunchError> {
        append_library_search_path(config.library_search_path());
        let library = match self.loader.load(config.jvm_library_path()) {
            Ok(library) => library,
            Err(err) => return Err(self.report(err)),
        };
        match start_entry_point(&library, config, &self.entry_point) {
            Ok(()) => {
                library.retain();
                Ok(())
            }
            // notify while the library is still loaded, it is released when this returns
            Err(err) => Err(self.report(err)),
        }
    }

    fn report(&mut self, err: LaunchError) -> LaunchError {
        error!("launch failed: {}", err);
        self.notifier.notify(FAILURE_TITLE, &err);
        err
    }
}

fn start_entry_point(library: &impl RuntimeLibrary, config: &LaunchConfig, entry_point: &EntryPoint) -> Result<(), LaunchError> {
    let factory = library.create_java_vm()?;
    let init_args = init_args(config).map_err(LaunchError::RuntimeCreation)?;
    let (vm, env) = unsafe { create_java_vm(factory, &init_args) }.map_err(LaunchError::RuntimeCreation)?;
    info!("created JVM");
    // a resolution failure leaves `vm` undestroyed
    let class = resolve_class(&env, entry_point)?;
    let method = resolve_method(&env, class, entry_point)?;
    info!("invoking {}.{}{}", entry_point.class_name, entry_point.method_name, entry_point.signature);
    // only fails when the function table has no CallStaticVoidMethodA, reported against the method
    env.call_static_void_method(class, method, &[]).map_err(|err| method_error(entry_point, err.to_string()))?;
    debug!("entry method returned, destroying JVM");
    if let Err(err) = vm.destroy() {
        warn!("DestroyJavaVM failed: {}", err);
    }
    Ok(())
}

/// Describes and clears a pending exception. Returns whether there was one.
fn take_pending_exception(env: &JniEnv) -> Result<bool, JniError> {
    if !env.exception_check()? {
        return Ok(false);
    }
    env.exception_describe()?;
    env.exception_clear()?;
    Ok(true)
}

fn resolve_class(env: &JniEnv, entry_point: &EntryPoint) -> Result<jclass, LaunchError> {
    let class_error = |reason: String| LaunchError::ClassResolution { class_name: entry_point.class_name.clone(), reason };
    let class_name = CString::new(entry_point.class_name.as_str()).map_err(|err| class_error(err.to_string()))?;
    let class = env.find_class(class_name.as_c_str());
    let pending = take_pending_exception(env).map_err(|err| class_error(err.to_string()))?;
    match class {
        Ok(Some(class)) if !pending => Ok(class),
        Ok(_) if pending => Err(class_error("FindClass raised an exception".to_string())),
        Ok(_) => Err(class_error("class not found".to_string())),
        Err(err) => Err(class_error(err.to_string())),
    }
}

fn method_error(entry_point: &EntryPoint, reason: String) -> LaunchError {
    LaunchError::MethodResolution {
        class_name: entry_point.class_name.clone(),
        method_name: entry_point.method_name.clone(),
        signature: entry_point.signature.clone(),
        reason,
    }
}

fn resolve_method(env: &JniEnv, class: jclass, entry_point: &EntryPoint) -> Result<jmethodID, LaunchError> {
    let method_name = CString::new(entry_point.method_name.as_str()).map_err(|err| method_error(entry_point, err.to_string()))?;
    let signature = CString::new(entry_point.signature.as_str()).map_err(|err| method_error(entry_point, err.to_string()))?;
    let method = env.get_static_method_id(class, method_name.as_c_str(), signature.as_c_str());
    let pending = take_pending_exception(env).map_err(|err| method_error(entry_point, err.to_string()))?;
    match method {
        Ok(Some(method)) if !pending => Ok(method),
        Ok(_) if pending => Err(method_error(entry_point, "GetStaticMethodID raised an exception".to_string())),
        Ok(_) => Err(method_error(entry_point, "method not found".to_string())),
        Err(err) => Err(method_error(entry_point, err.to_string())),
    }
}
