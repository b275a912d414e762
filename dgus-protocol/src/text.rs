//! Fixed-size panel text
//!
//! Text variables on the panel occupy a fixed number of bytes. A
//! [`FixedText`] holds at most `N` bytes, is transmitted padded with zeros to
//! exactly `N` bytes and remembers whether it changed since it was last
//! sent.

use core::fmt;

use heapless::String;

/// Horizontal placement of text inside its field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    /// Leave the text as is
    None,
    Left,
    Center,
    Right,
}

/// Text of at most `N` bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedText<const N: usize> {
    text: String<N>,
    changed: bool,
}

impl<const N: usize> Default for FixedText<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FixedText<N> {
    /// Empty text
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            changed: false,
        }
    }

    /// Text initialized from `s`, truncated to `N` bytes
    pub fn from_text(s: &str) -> Self {
        let mut text = Self::new();
        text.set(s);
        text
    }

    /// Replace the content, truncating to `N` bytes on a char boundary
    pub fn set(&mut self, s: &str) -> &mut Self {
        self.text.clear();
        self.push_truncated(s);
        self.changed = true;
        self
    }

    /// Replace the content with `s` placed inside the field
    pub fn set_aligned(&mut self, s: &str, alignment: Alignment) -> &mut Self {
        self.set(s);
        self.align(alignment)
    }

    /// Append as much of `s` as fits
    pub fn push_str(&mut self, s: &str) -> &mut Self {
        self.push_truncated(s);
        self.changed = true;
        self
    }

    /// Empty the text
    pub fn reset(&mut self) -> &mut Self {
        self.text.clear();
        self.changed = true;
        self
    }

    /// Pad with spaces so the text sits at `alignment` in the field
    pub fn align(&mut self, alignment: Alignment) -> &mut Self {
        if alignment == Alignment::None {
            return self;
        }

        let chars = self.text.chars().count();
        let free = N.saturating_sub(self.text.len());
        let lead = match alignment {
            Alignment::Center => free / 2,
            Alignment::Right => free,
            _ => 0,
        };

        if lead > 0 && chars > 0 {
            let mut padded = String::<N>::new();
            for _ in 0..lead {
                let _ = padded.push(' ');
            }
            let _ = padded.push_str(&self.text);
            self.text = padded;
        }
        while self.text.len() < N {
            let _ = self.text.push(' ');
        }
        self.changed = true;
        self
    }

    /// Content as a string slice
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Content as bytes (without padding)
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Field size on the panel
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Whether the text changed since the last call with `clear = true`
    pub fn has_changed(&mut self, clear: bool) -> bool {
        let changed = self.changed;
        if clear {
            self.changed = false;
        }
        changed
    }

    fn push_truncated(&mut self, s: &str) {
        let room = N - self.text.len();
        let mut end = s.len().min(room);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        // Cannot fail, `end` bytes fit
        let _ = self.text.push_str(&s[..end]);
    }
}

impl<const N: usize> fmt::Write for FixedText<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl<const N: usize> fmt::Display for FixedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for FixedText<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.text.as_str())
    }
}
