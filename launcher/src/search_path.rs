use std::env;
use std::ffi::OsString;

use log::debug;

#[cfg(windows)]
const SEARCH_PATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const SEARCH_PATH_SEPARATOR: &str = ":";

/// The variable the platform loader consults for a library's own dependencies.
pub fn library_search_variable() -> &'static str {
    if cfg!(windows) {
        "PATH"
    } else if cfg!(target_os = "macos") {
        "DYLD_LIBRARY_PATH"
    } else {
        "LD_LIBRARY_PATH"
    }
}

/// Appends `addition` to the search variable. Has to run before the jvm library is loaded, the jvm
/// loads its own natives while it is being created.
pub fn append_library_search_path(addition: &str) {
    let variable = library_search_variable();
    if addition.is_empty() {
        debug!("no search path addition configured, leaving {} alone", variable);
        return;
    }
    let mut value = env::var_os(variable).unwrap_or_default();
    if !value.is_empty() {
        value.push(SEARCH_PATH_SEPARATOR);
    }
    value.push(addition);
    debug!("{}={:?}", variable, value);
    env::set_var(variable, &value);
}

pub fn current_library_search_path() -> OsString {
    env::var_os(library_search_variable()).unwrap_or_default()
}
