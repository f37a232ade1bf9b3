use std::io;
use std::path::Path;

/// Saves a picture of the host viewport, like the host's "Save picture".
pub trait ViewportCapture {
    fn capture(&mut self, path: &Path, width: u32, height: u32) -> io::Result<()>;
}
