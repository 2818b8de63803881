pub use rust_i18n::t;

const SUPPORTED_LOCALES: &[&str] = &["en", "ja"];

/// Picks the message locale from the user's system locale, falling back to English.
pub fn init() {
    if let Some(lang) = system_language() {
        if SUPPORTED_LOCALES.contains(&lang.as_str()) {
            rust_i18n::set_locale(&lang);
        }
    }
}

/// Primary language subtag of a Windows locale name, e.g. "ja" for "ja-JP".
pub fn language_of(locale_name: &str) -> Option<String> {
    let lang = locale_name.split('-').next()?.trim();
    if lang.is_empty() {
        return None;
    }
    Some(lang.to_ascii_lowercase())
}

#[cfg(windows)]
fn system_language() -> Option<String> {
    use windows::Win32::Globalization::GetUserDefaultLocaleName;

    // LOCALE_NAME_MAX_LENGTH
    let mut buffer = [0u16; 85];
    let len = unsafe { GetUserDefaultLocaleName(&mut buffer) };
    if len <= 1 {
        return None;
    }
    let name = String::from_utf16_lossy(&buffer[..len as usize - 1]);
    language_of(&name)
}

// Off Windows the launcher reads no environment, so messages stay in English.
#[cfg(not(windows))]
fn system_language() -> Option<String> {
    None
}
