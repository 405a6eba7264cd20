//! User-Agent string shared by page loads and PDF downloads.
//!
//! The library site serves its search pages and files to regular browsers
//! only, so every request carries one fixed desktop-browser identity.

/// Browser User-Agent sent with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
