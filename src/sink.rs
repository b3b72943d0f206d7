//! The byte sink `print` writes to — a minimal stand-in for a full
//! formatted-output stream interface, which is outside this crate's scope.

/// Accepts successive byte slices; a `print` call reports failure as soon as
/// one `write` call returns `false`, mirroring a short write from a real sink.
pub trait Sink {
    fn write(&mut self, bytes: &[u8]) -> bool;
}

impl Sink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> bool {
        self.extend_from_slice(bytes);
        true
    }
}

/// Adapts any [`std::io::Write`] into a [`Sink`], so callers with a file or
/// socket handle are not forced to implement the trait by hand.
pub struct WriteSink<W: std::io::Write>(pub W);

impl<W: std::io::Write> Sink for WriteSink<W> {
    fn write(&mut self, bytes: &[u8]) -> bool {
        self.0.write_all(bytes).is_ok()
    }
}
