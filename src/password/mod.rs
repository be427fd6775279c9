//! Password generator
//!
//! The password is derived state: every mutator regenerates it, so the
//! string on screen always matches the current length and toggles.

use anyhow::Result;
use rand::Rng;
use serde::Serialize;

use crate::clipboard::ClipboardSink;
use crate::notify::Notifier;

pub const MIN_LENGTH: usize = 6;
pub const MAX_LENGTH: usize = 32;
pub const DEFAULT_LENGTH: usize = 17;

pub const DIGITS: &str = "0123456789";
pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const SYMBOLS: &str = "!@#$%^&*()";

/// Used when every character class is switched off
pub const FALLBACK_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Inputs the password is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordOptions {
    pub length: usize,
    pub digits: bool,
    pub letters: bool,
    pub symbols: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            digits: false,
            letters: true,
            symbols: false,
        }
    }
}

impl PasswordOptions {
    /// Characters eligible for a draw, in the order digits, letters, symbols
    pub fn alphabet(&self) -> String {
        let mut chars = String::new();
        if self.digits {
            chars.push_str(DIGITS);
        }
        if self.letters {
            chars.push_str(LETTERS);
        }
        if self.symbols {
            chars.push_str(SYMBOLS);
        }

        if chars.is_empty() {
            chars.push_str(FALLBACK_ALPHABET);
        }
        chars
    }

    /// True when no class is enabled and the fallback alphabet is in use
    pub fn uses_fallback(&self) -> bool {
        !self.digits && !self.letters && !self.symbols
    }
}

pub fn clamp_length(length: usize) -> usize {
    length.clamp(MIN_LENGTH, MAX_LENGTH)
}

/// Draw `options.length` characters uniformly, with replacement
pub fn generate_with<R: Rng + ?Sized>(options: &PasswordOptions, rng: &mut R) -> String {
    // All alphabets are ASCII, so byte indexing is character indexing
    let alphabet = options.alphabet().into_bytes();
    (0..options.length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

#[derive(Debug, Clone)]
pub struct PasswordState {
    options: PasswordOptions,
    password: String,
}

impl Default for PasswordState {
    fn default() -> Self {
        Self::new(PasswordOptions::default())
    }
}

impl PasswordState {
    /// Create the widget state and generate the initial password
    pub fn new(mut options: PasswordOptions) -> Self {
        options.length = clamp_length(options.length);
        let mut state = Self {
            options,
            password: String::new(),
        };
        state.generate();
        state
    }

    pub fn options(&self) -> &PasswordOptions {
        &self.options
    }

    pub fn length(&self) -> usize {
        self.options.length
    }

    pub fn include_digits(&self) -> bool {
        self.options.digits
    }

    pub fn include_letters(&self) -> bool {
        self.options.letters
    }

    pub fn include_symbols(&self) -> bool {
        self.options.symbols
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Set the length, clamped into the allowed range
    pub fn set_length(&mut self, length: usize) {
        self.options.length = clamp_length(length);
        self.generate();
    }

    pub fn increase_length(&mut self) {
        self.set_length(self.options.length.saturating_add(1));
    }

    pub fn decrease_length(&mut self) {
        self.set_length(self.options.length.saturating_sub(1));
    }

    pub fn toggle_digits(&mut self) {
        self.options.digits = !self.options.digits;
        self.generate();
    }

    pub fn toggle_letters(&mut self) {
        self.options.letters = !self.options.letters;
        self.generate();
    }

    pub fn toggle_symbols(&mut self) {
        self.options.symbols = !self.options.symbols;
        self.generate();
    }

    /// Regenerate from the thread-local generator
    pub fn generate(&mut self) {
        self.generate_from(&mut rand::rng());
    }

    /// Regenerate from an explicit random source
    pub fn generate_from<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.password = generate_with(&self.options, rng);
        tracing::debug!(
            length = self.options.length,
            digits = self.options.digits,
            letters = self.options.letters,
            symbols = self.options.symbols,
            "Generated password"
        );
    }

    /// Copy the current password and acknowledge it.
    ///
    /// The acknowledgement goes out when the write is requested, before
    /// its outcome is known (a one-shot clipboard may block until it is
    /// replaced). A failed write is returned to the caller and not retried.
    pub fn copy_to_clipboard(
        &self,
        clipboard: &mut dyn ClipboardSink,
        notifier: &dyn Notifier,
    ) -> Result<()> {
        if let Err(e) = notifier.notify(crate::notify::APP_NAME, "Password copied!") {
            tracing::warn!("Failed to show notification: {}", e);
        }

        if let Err(e) = clipboard.set_text(&self.password) {
            tracing::warn!("Clipboard write failed: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::MemoryClipboard;
    use crate::notify::testing::RecordingNotifier;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn all_from(password: &str, alphabet: &str) -> bool {
        password.chars().all(|c| alphabet.contains(c))
    }

    #[test]
    fn test_defaults() {
        let state = PasswordState::default();
        assert_eq!(state.length(), 17);
        assert!(!state.include_digits());
        assert!(state.include_letters());
        assert!(!state.include_symbols());
        assert_eq!(state.password().len(), 17, "Initial password generated on creation");
        assert!(all_from(state.password(), LETTERS));
    }

    #[test]
    fn test_alphabet_order() {
        let options = PasswordOptions { length: 6, digits: true, letters: true, symbols: true };
        assert_eq!(options.alphabet(), format!("{}{}{}", DIGITS, LETTERS, SYMBOLS));

        let options = PasswordOptions { length: 6, digits: true, letters: false, symbols: true };
        assert_eq!(options.alphabet(), format!("{}{}", DIGITS, SYMBOLS));
    }

    #[test]
    fn test_digits_only() {
        let options = PasswordOptions { length: 10, digits: true, letters: false, symbols: false };
        let mut rng = StdRng::seed_from_u64(7);
        let password = generate_with(&options, &mut rng);

        assert_eq!(password.len(), 10);
        assert!(all_from(&password, DIGITS), "{}", password);
    }

    #[test]
    fn test_fallback_when_nothing_selected() {
        let options = PasswordOptions { length: 6, digits: false, letters: false, symbols: false };
        assert!(options.uses_fallback());

        let mut rng = StdRng::seed_from_u64(1);
        let password = generate_with(&options, &mut rng);
        assert_eq!(password.len(), 6);
        assert!(password.chars().all(|c| c.is_ascii_lowercase()), "{}", password);
    }

    #[test]
    fn test_every_length_and_combination() {
        let mut rng = StdRng::seed_from_u64(42);
        for length in MIN_LENGTH..=MAX_LENGTH {
            for mask in 1u8..8 {
                let options = PasswordOptions {
                    length,
                    digits: mask & 1 != 0,
                    letters: mask & 2 != 0,
                    symbols: mask & 4 != 0,
                };
                let alphabet = options.alphabet();
                let password = generate_with(&options, &mut rng);

                assert_eq!(password.chars().count(), length);
                assert!(all_from(&password, &alphabet), "{:?} -> {}", options, password);
            }
        }
    }

    #[test]
    fn test_repeated_generation_keeps_shape() {
        let mut state = PasswordState::new(PasswordOptions { length: 12, digits: true, letters: false, symbols: true });
        let alphabet = state.options().alphabet();
        for _ in 0..20 {
            state.generate();
            assert_eq!(state.password().len(), 12);
            assert!(all_from(state.password(), &alphabet));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let options = PasswordOptions::default();
        let a = generate_with(&options, &mut StdRng::seed_from_u64(99));
        let b = generate_with(&options, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_length_clamps() {
        let mut state = PasswordState::default();

        state.set_length(3);
        assert_eq!(state.length(), MIN_LENGTH);
        assert_eq!(state.password().len(), MIN_LENGTH);

        state.set_length(100);
        assert_eq!(state.length(), MAX_LENGTH);
        assert_eq!(state.password().len(), MAX_LENGTH);

        state.set_length(20);
        assert_eq!(state.password().len(), 20);
    }

    #[test]
    fn test_length_steps_stay_in_bounds() {
        let mut state = PasswordState::new(PasswordOptions { length: MIN_LENGTH, ..Default::default() });
        state.decrease_length();
        assert_eq!(state.length(), MIN_LENGTH);

        state.set_length(MAX_LENGTH);
        state.increase_length();
        assert_eq!(state.length(), MAX_LENGTH);

        state.decrease_length();
        assert_eq!(state.length(), MAX_LENGTH - 1);
    }

    #[test]
    fn test_new_clamps_configured_length() {
        let state = PasswordState::new(PasswordOptions { length: 0, ..Default::default() });
        assert_eq!(state.length(), MIN_LENGTH);
    }

    #[test]
    fn test_toggles_regenerate_consistently() {
        let mut state = PasswordState::default();

        state.toggle_letters();
        state.toggle_digits();
        assert!(all_from(state.password(), DIGITS), "{}", state.password());

        state.toggle_digits();
        assert!(state.options().uses_fallback());
        assert!(all_from(state.password(), FALLBACK_ALPHABET));

        state.toggle_symbols();
        assert!(all_from(state.password(), SYMBOLS), "{}", state.password());
        assert_eq!(state.password().len(), DEFAULT_LENGTH);
    }

    #[test]
    fn test_copy_writes_and_notifies() {
        let state = PasswordState::default();
        let mut clipboard = MemoryClipboard::default();
        let notifier = RecordingNotifier::default();

        state.copy_to_clipboard(&mut clipboard, &notifier).unwrap();

        assert_eq!(clipboard.contents.as_deref(), Some(state.password()));
        assert_eq!(notifier.sent.borrow().len(), 1);
        assert_eq!(notifier.sent.borrow()[0].1, "Password copied!");
    }

    #[test]
    fn test_copy_failure_still_notifies() {
        let state = PasswordState::default();
        let mut clipboard = MemoryClipboard { fail: true, ..Default::default() };
        let notifier = RecordingNotifier::default();

        let result = state.copy_to_clipboard(&mut clipboard, &notifier);

        assert!(result.is_err(), "Write failure must be surfaced");
        assert_eq!(notifier.sent.borrow().len(), 1, "Acknowledgement is unconditional");
    }
}
