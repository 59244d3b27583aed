use crate::parse::xref::FOOTER_WINDOW;

/// Settings for opening a [`crate::Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    /// Sources larger than this are rejected before anything is parsed.
    pub max_size: Option<u64>,
    /// Number of bytes at the end of the source searched for `startxref`.
    pub footer_window: usize,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            max_size: None,
            footer_window: FOOTER_WINDOW,
        }
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn footer_window(mut self, footer_window: usize) -> Self {
        self.footer_window = footer_window;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let options = OpenOptions::new().max_size(1 << 20).footer_window(64);
        assert_eq!(options.max_size, Some(1 << 20));
        assert_eq!(options.footer_window, 64);
        assert_eq!(OpenOptions::default().footer_window, FOOTER_WINDOW);
    }
}
