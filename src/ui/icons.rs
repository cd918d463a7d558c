//! Shared UI icons, with plain-text fallbacks for terminals without emoji.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[x] ");
pub static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[!] ");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "* ");

// Build view
pub static CART: Emoji<'_, '_> = Emoji("🛒 ", "");
pub static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "? ");
pub static BOLT: Emoji<'_, '_> = Emoji("⚡ ", "");

// Chat
pub static ROBOT: Emoji<'_, '_> = Emoji("🤖 ", "> ");
pub static CLIPBOARD: Emoji<'_, '_> = Emoji("📋 ", "");
