//! Ambient output sink with scoped capture.
//!
//! Rendering writes through [`emit`]. With no capture active the text goes to
//! standard output; inside a [`capture`] it accumulates in an in-memory buffer
//! instead. Captures nest and are per thread.
//!
//! A [`Capture`] releases its buffer when finished or dropped, so an early
//! return through `?` never leaves output redirected:
//!
//! ```rust
//! use stencil::templating::output;
//!
//! fn render_page() -> std::io::Result<String> {
//!     let capture = output::capture();
//!     output::emit("<h1>Title</h1>")?;
//!     Ok(capture.finish())
//! }
//!
//! assert_eq!(render_page().unwrap(), "<h1>Title</h1>");
//! assert_eq!(output::depth(), 0);
//! ```

use std::cell::RefCell;
use std::io::{self, Write};
use std::marker::PhantomData;

thread_local! {
    static CAPTURES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Write text to the innermost active capture, or to stdout if none is active.
pub fn emit(text: &str) -> io::Result<()> {
    let captured = CAPTURES.with_borrow_mut(|stack| match stack.last_mut() {
        Some(buffer) => {
            buffer.push_str(text);
            true
        }
        None => false,
    });

    if !captured {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

/// Number of captures currently active on this thread.
pub fn depth() -> usize {
    CAPTURES.with_borrow(Vec::len)
}

/// Start capturing emitted output.
pub fn capture() -> Capture {
    let level = CAPTURES.with_borrow_mut(|stack| {
        stack.push(String::new());
        stack.len()
    });
    tracing::trace!(level, "output capture started");

    Capture {
        level,
        released: false,
        _not_send: PhantomData,
    }
}

/// Guard for an active capture. Dropping it discards the buffer.
#[must_use = "dropping a Capture immediately ends it"]
#[derive(Debug)]
pub struct Capture {
    level: usize,
    released: bool,
    // The buffer lives in a thread local.
    _not_send: PhantomData<*const ()>,
}

impl Capture {
    /// Text captured so far, without ending the capture.
    pub fn contents(&self) -> String {
        CAPTURES.with_borrow(|stack| stack.get(self.level - 1).cloned().unwrap_or_default())
    }

    /// End the capture and return what it collected.
    pub fn finish(mut self) -> String {
        self.release().unwrap_or_default()
    }

    fn release(&mut self) -> Option<String> {
        if self.released {
            return None;
        }
        self.released = true;
        tracing::trace!(level = self.level, "output capture ended");

        CAPTURES.with_borrow_mut(|stack| {
            // Inner captures that were leaked end with this one.
            stack.truncate(self.level);
            if stack.len() == self.level {
                stack.pop()
            } else {
                None
            }
        })
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        self.release();
    }
}
