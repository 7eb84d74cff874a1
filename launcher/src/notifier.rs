use crate::LaunchError;

pub trait FailureNotifier {
    /// Called once per failed launch, before `launch` returns.
    fn notify(&mut self, title: &str, err: &LaunchError);
}

pub struct StderrNotifier;

impl FailureNotifier for StderrNotifier {
    fn notify(&mut self, title: &str, err: &LaunchError) {
        eprintln!("{}: {}", title, err.user_message());
    }
}

#[cfg(windows)]
pub struct MessageBoxNotifier;

#[cfg(windows)]
impl FailureNotifier for MessageBoxNotifier {
    fn notify(&mut self, title: &str, err: &LaunchError) {
        use windows::core::PCWSTR;
        use windows::Win32::UI::WindowsAndMessaging::{MB_ICONERROR, MB_OK, MessageBoxW};

        let text = to_wide(err.user_message().as_str());
        let caption = to_wide(title);
        let res = unsafe { MessageBoxW(None, PCWSTR(text.as_ptr()), PCWSTR(caption.as_ptr()), MB_OK | MB_ICONERROR) };
        if res.0 == 0 {
            log::error!("MessageBoxW failed, falling back to stderr");
            StderrNotifier.notify(title, err);
        }
    }
}

/// NUL terminated UTF-16 copy of `s`.
#[cfg(windows)]
fn to_wide(s: &str) -> Vec<u16> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;

    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}

#[cfg(windows)]
pub type DefaultNotifier = MessageBoxNotifier;

#[cfg(not(windows))]
pub type DefaultNotifier = StderrNotifier;

pub fn default_notifier() -> DefaultNotifier {
    #[cfg(windows)]
    return MessageBoxNotifier;
    #[cfg(not(windows))]
    return StderrNotifier;
}
