//! Shared status icons.
//!
//! Each icon falls back to a plain-text tag on terminals without emoji
//! support.

use console::Emoji;

// Outcome
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[WARN]");

// Stage status
pub static DONE: Emoji<'_, '_> = Emoji("🟢 ", "[x]");
pub static WORKING: Emoji<'_, '_> = Emoji("🟡 ", "[~]");
pub static LINKED: Emoji<'_, '_> = Emoji("🔗 ", "[-]");
pub static EMPTY: Emoji<'_, '_> = Emoji("⚪ ", "[ ]");

// Calls
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "[T]");
pub static EXPIRED: Emoji<'_, '_> = Emoji("⌛ ", "[!]");

pub static KEY: Emoji<'_, '_> = Emoji("🔑 ", "");
pub static FILE: Emoji<'_, '_> = Emoji("📄 ", "");
