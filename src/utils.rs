use std::path::{Path, PathBuf};

use crate::config::LaunchMode;
use crate::launcher::{Error, Launched};

/// Whether a path of `len` units plus its terminator fits in `capacity` units.
pub fn fits_capacity(len: usize, capacity: usize) -> bool {
    len < capacity
}

/// Absolute path of the running executable, refusing paths that do not fit
/// in `capacity` units (UTF-16 units on Windows, bytes elsewhere).
#[cfg(windows)]
pub fn current_exe_path(capacity: usize) -> Result<PathBuf, Error> {
    use std::{ffi::OsString, os::windows::ffi::OsStringExt};
    use windows::Win32::{Foundation::HMODULE, System::LibraryLoader::GetModuleFileNameW};

    if capacity == 0 {
        return Err(Error::SelfPathTruncated { capacity });
    }

    let mut buffer = vec![0u16; capacity];
    let len = unsafe { GetModuleFileNameW(HMODULE::default(), &mut buffer) } as usize;
    if len == 0 {
        return Err(Error::SelfPathUnavailable(std::io::Error::last_os_error()));
    }
    // A full buffer means the path was cut short.
    if !fits_capacity(len, buffer.len()) {
        return Err(Error::SelfPathTruncated { capacity });
    }

    Ok(PathBuf::from(OsString::from_wide(&buffer[..len])))
}

#[cfg(not(windows))]
pub fn current_exe_path(capacity: usize) -> Result<PathBuf, Error> {
    let path = std::env::current_exe().map_err(Error::SelfPathUnavailable)?;
    if !fits_capacity(path.as_os_str().len(), capacity) {
        return Err(Error::SelfPathTruncated { capacity });
    }
    Ok(path)
}

/// Command line handed to CreateProcessW: the quoted target path and
/// nothing else, NUL-terminated.
#[cfg(windows)]
pub fn command_line(path: &Path) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;

    let mut line = vec![b'"' as u16];
    line.extend(path.as_os_str().encode_wide());
    line.push(b'"' as u16);
    line.push(0);
    line
}

#[cfg(windows)]
pub fn spawn(path: &Path, mode: LaunchMode) -> Result<Launched, Error> {
    use windows::{
        core::{PCWSTR, PWSTR},
        Win32::{Foundation::{CloseHandle, BOOL}, System::Threading::{CreateProcessW, PROCESS_CREATION_FLAGS, PROCESS_INFORMATION, STARTUPINFOW}}
    };

    let mut command_line = command_line(path);
    let startup_info = STARTUPINFOW {
        cb: std::mem::size_of::<STARTUPINFOW>() as u32,
        ..Default::default()
    };
    let mut process_info = PROCESS_INFORMATION::default();

    unsafe {
        CreateProcessW(
            PCWSTR::null(),
            PWSTR(command_line.as_mut_ptr()),
            None,
            None,
            BOOL(0),
            PROCESS_CREATION_FLAGS(0),
            None,
            PCWSTR::null(),
            &startup_info,
            &mut process_info
        )
    }
    .map_err(|e| Error::SpawnFailed {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    unsafe {
        let _ = CloseHandle(process_info.hThread);
    }

    let outcome = match mode {
        LaunchMode::Detach => Ok(Launched::Detached { pid: process_info.dwProcessId }),
        LaunchMode::Supervise => wait_for_exit(process_info.hProcess)
    };

    unsafe {
        let _ = CloseHandle(process_info.hProcess);
    }
    outcome
}

#[cfg(windows)]
fn wait_for_exit(process: windows::Win32::Foundation::HANDLE) -> Result<Launched, Error> {
    use windows::Win32::{Foundation::WAIT_FAILED, System::Threading::{GetExitCodeProcess, WaitForSingleObject, INFINITE}};

    if unsafe { WaitForSingleObject(process, INFINITE) } == WAIT_FAILED {
        return Err(Error::WaitFailed(std::io::Error::last_os_error()));
    }

    let mut code = 0u32;
    unsafe { GetExitCodeProcess(process, &mut code) }
        .map_err(|e| Error::WaitFailed(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    Ok(Launched::Exited { code: Some(code as i32) })
}

#[cfg(not(windows))]
pub fn spawn(path: &Path, mode: LaunchMode) -> Result<Launched, Error> {
    let mut child = std::process::Command::new(path)
        .spawn()
        .map_err(|source| Error::SpawnFailed { path: path.to_path_buf(), source })?;

    match mode {
        // Dropping the handle neither waits for nor kills the child.
        LaunchMode::Detach => Ok(Launched::Detached { pid: child.id() }),
        LaunchMode::Supervise => {
            let status = child.wait().map_err(Error::WaitFailed)?;
            Ok(Launched::Exited { code: status.code() })
        }
    }
}

#[cfg(windows)]
pub fn show_error(message: &str) {
    use crate::i18n::t;
    use windows::{core::HSTRING, Win32::{Foundation::HWND, UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK}}};

    let hwnd: Option<HWND> = None;
    unsafe {
        let _ = MessageBoxW(
            hwnd.as_ref(),
            &HSTRING::from(message),
            &HSTRING::from(t!("launcher.title")),
            MB_OK | MB_ICONERROR
        );
    }
}

#[cfg(not(windows))]
pub fn show_error(message: &str) {
    eprintln!("{}", message);
}
