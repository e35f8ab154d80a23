//! Reassembly of newline-delimited status text from the hand

/// Upper bound on buffered bytes without a delimiter; older bytes are dropped
const MAX_PENDING: usize = 4096;

#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        if self.pending.len() > MAX_PENDING {
            let excess = self.pending.len() - MAX_PENDING;
            self.pending.drain(..excess);
        }
    }

    /// Next complete line with its `\n` or `\r\n` delimiter stripped
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=end).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Most recent complete line, discarding any older ones
    pub fn latest_line(&mut self) -> Option<String> {
        let mut latest = None;
        while let Some(line) = self.next_line() {
            latest = Some(line);
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_crlf_and_lf() {
        let mut buffer = LineBuffer::new();
        buffer.extend(b"Hand ready\r\nsecond\n");
        assert_eq!(buffer.next_line().as_deref(), Some("Hand ready"));
        assert_eq!(buffer.next_line().as_deref(), Some("second"));
        assert_eq!(buffer.next_line(), None);
    }

    #[test]
    fn waits_for_the_delimiter_across_reads() {
        let mut buffer = LineBuffer::new();
        buffer.extend(b"Gra");
        assert_eq!(buffer.next_line(), None);
        buffer.extend(b"b 50%\r");
        assert_eq!(buffer.next_line(), None);
        buffer.extend(b"\nFl");
        assert_eq!(buffer.next_line().as_deref(), Some("Grab 50%"));
        assert_eq!(buffer.pending.len(), 2);
    }

    #[test]
    fn latest_line_skips_older_lines() {
        let mut buffer = LineBuffer::new();
        buffer.extend(b"one\r\ntwo\r\nthr");
        assert_eq!(buffer.latest_line().as_deref(), Some("two"));
        assert_eq!(buffer.latest_line(), None);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut buffer = LineBuffer::new();
        buffer.extend(&[b'o', b'k', 0xff, b'\n']);
        assert_eq!(buffer.next_line().as_deref(), Some("ok\u{fffd}"));
    }

    #[test]
    fn runaway_input_is_bounded() {
        let mut buffer = LineBuffer::new();
        buffer.extend(&vec![b'a'; MAX_PENDING + 100]);
        assert_eq!(buffer.pending.len(), MAX_PENDING);
    }
}
