use std::path::{Path, PathBuf};

use jni_invocation::{CreateJavaVm, CREATE_JAVA_VM_SYMBOL};
use libloading::Library;
use log::{debug, info};

use crate::LaunchError;

pub trait RuntimeLoader {
    type Library: RuntimeLibrary;

    fn load(&self, path: &Path) -> Result<Self::Library, LaunchError>;
}

/// Dropping a library releases it.
pub trait RuntimeLibrary {
    fn create_java_vm(&self) -> Result<CreateJavaVm, LaunchError>;

    /// Keeps the library loaded until the process exits, for code that keeps running inside it.
    fn retain(self);
}

pub struct SystemLoader;

pub struct SystemLibrary {
    path: PathBuf,
    library: Library,
}

#[cfg(unix)]
unsafe fn open_library(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{RTLD_GLOBAL, RTLD_LAZY};
    libloading::os::unix::Library::open(Some(path), RTLD_LAZY | RTLD_GLOBAL).map(Library::from)
}

#[cfg(not(unix))]
unsafe fn open_library(path: &Path) -> Result<Library, libloading::Error> {
    Library::new(path)
}

impl RuntimeLoader for SystemLoader {
    type Library = SystemLibrary;

    fn load(&self, path: &Path) -> Result<SystemLibrary, LaunchError> {
        // dlopen("") hands back the main program rather than failing
        if path.as_os_str().is_empty() {
            return Err(LaunchError::LibraryLoad { path: path.to_path_buf(), reason: "no library path configured".to_string() });
        }
        let library = unsafe { open_library(path) }.map_err(|err| LaunchError::LibraryLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        info!("loaded {:?}", path);
        Ok(SystemLibrary { path: path.to_path_buf(), library })
    }
}

impl RuntimeLibrary for SystemLibrary {
    fn create_java_vm(&self) -> Result<CreateJavaVm, LaunchError> {
        let symbol = unsafe { self.library.get::<CreateJavaVm>(CREATE_JAVA_VM_SYMBOL.as_bytes()) }.map_err(|err| LaunchError::SymbolResolution {
            symbol: CREATE_JAVA_VM_SYMBOL,
            reason: err.to_string(),
        })?;
        Ok(*symbol)
    }

    fn retain(self) {
        let SystemLibrary { path, library } = self;
        debug!("keeping {:?} loaded until exit", path);
        std::mem::forget(library);
    }
}
