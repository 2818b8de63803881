use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the built-in level. On Windows the launcher has no
/// console, so records go to the debugger channel (`OutputDebugStringW`,
/// visible in a debugger or DebugView); elsewhere they go to stderr.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    #[cfg(windows)]
    let installed = builder.with_ansi(false).with_writer(|| DebugOutput).try_init().is_ok();
    #[cfg(not(windows))]
    let installed = builder.with_writer(std::io::stderr).try_init().is_ok();

    if installed {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialised");
    }
}

/// Writer that forwards each formatted record to `OutputDebugStringW`.
#[cfg(windows)]
pub struct DebugOutput;

#[cfg(windows)]
impl std::io::Write for DebugOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        use windows::{core::HSTRING, Win32::System::Diagnostics::Debug::OutputDebugStringW};

        let text = String::from_utf8_lossy(buf);
        unsafe { OutputDebugStringW(&HSTRING::from(text.as_ref())) };
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
