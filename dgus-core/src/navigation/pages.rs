//! Navigation state machine
//!
//! The panel only knows which picture to display. The back history and the
//! forward page live here, and every change of the current page is written
//! to the picture register.

use dgus_protocol::{FrameError, FrameSink, FrameWriter, Page, Register, Uint16};
use heapless::Vec;

/// Depth of the back history
pub const MAX_BACK_PAGES: usize = 8;

/// How a page is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShowOptions {
    /// Replace the current page
    None,
    /// Push the current page on the back history first
    SaveBack,
}

/// Errors from navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavigationError {
    /// The back history is full; nothing changed
    HistoryFull,
    /// The page changed but the switch frame could not be queued
    Frame(FrameError),
}

impl From<FrameError> for NavigationError {
    fn from(e: FrameError) -> Self {
        NavigationError::Frame(e)
    }
}

/// Current, forward and back pages
#[derive(Debug, Clone)]
pub struct Pages {
    back: Vec<Page, MAX_BACK_PAGES>,
    forward: Option<Page>,
    current: Page,
}

impl Default for Pages {
    fn default() -> Self {
        Self::new()
    }
}

impl Pages {
    /// Main page, empty history, no forward page
    pub const fn new() -> Self {
        Self {
            back: Vec::new(),
            forward: None,
            current: Page::Main,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn forward(&self) -> Option<Page> {
        self.forward
    }

    /// Back history, oldest first
    pub fn back_pages(&self) -> &[Page] {
        &self.back
    }

    /// Show `page`, saving the current page first with [`ShowOptions::SaveBack`]
    pub fn show<S: FrameSink + ?Sized>(
        &mut self,
        page: Page,
        options: ShowOptions,
        sink: &mut S,
    ) -> Result<(), NavigationError> {
        debug!("Show page {:?}", page);

        if options == ShowOptions::SaveBack {
            self.back
                .push(self.current)
                .map_err(|_| NavigationError::HistoryFull)?;
        }

        self.current = page;
        send_page(page, sink)?;
        Ok(())
    }

    /// Record the current page as the page to resume at
    pub fn save_forward(&mut self) {
        debug!("Save forward page {:?}", self.current);
        self.forward = Some(self.current);
    }

    /// Go back to the previous page, dropping any forward page
    ///
    /// Returns `Ok(false)` when the history is empty.
    pub fn show_back<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<bool, NavigationError> {
        self.forward = None;

        let Some(page) = self.back.pop() else {
            debug!("No back page");
            return Ok(false);
        };

        debug!("Back to page {:?}", page);
        self.current = page;
        send_page(page, sink)?;
        Ok(true)
    }

    /// Show the recorded forward page
    ///
    /// The history is unwound to the point where the forward page was saved,
    /// so the flow leaves no pages behind. Returns `Ok(false)` when no
    /// forward page is recorded.
    pub fn show_forward<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<bool, NavigationError> {
        let Some(page) = self.forward.take() else {
            debug!("No forward page");
            return Ok(false);
        };

        if let Some(at) = self.back.iter().rposition(|p| *p == page) {
            self.back.truncate(at);
        }

        debug!("Forward to page {:?}", page);
        self.current = page;
        send_page(page, sink)?;
        Ok(true)
    }
}

fn send_page<S: FrameSink + ?Sized>(page: Page, sink: &mut S) -> Result<(), FrameError> {
    FrameWriter::register_write(Register::PictureId)
        .write(Uint16::new(page.id() as u16))?
        .send(sink)
}
