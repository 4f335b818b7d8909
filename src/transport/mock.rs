//! # Mock Transport
//!
//! An in-memory transport that records every open, write, and close, and
//! can be told to fail at either phase. The session tests use it to pin
//! down write ordering and handle accounting without hardware attached.

use std::sync::{Arc, Mutex};

use crate::error::{Result, SerpentinaError};
use crate::printer::config::LineConfig;
use crate::transport::{Connection, Transport};

#[derive(Debug, Default)]
struct MockState {
    opens: usize,
    closes: usize,
    writes: Vec<Vec<u8>>,
    write_attempts: usize,
    fail_open: bool,
    fail_write_from: Option<usize>,
    last_config: Option<LineConfig>,
}

/// Recording transport for tests.
///
/// Cloning is cheap and shares the recording, so a test can keep one
/// handle for assertions while the session owns another:
///
/// ```
/// use serpentina::printer::config::LineConfig;
/// use serpentina::transport::{Connection, MockTransport, Transport};
///
/// let mock = MockTransport::new();
/// {
///     let config = LineConfig::default();
///     let mut conn = mock.open(&config).unwrap();
///     conn.write_all(&[0x1B, 0x40]).unwrap();
/// } // connection dropped -> close recorded
///
/// assert_eq!(mock.opens(), 1);
/// assert_eq!(mock.closes(), 1);
/// assert_eq!(mock.writes(), vec![vec![0x1B, 0x40]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `open` call fail.
    #[must_use]
    pub fn fail_open(self) -> Self {
        self.lock().fail_open = true;
        self
    }

    /// Make write attempts fail from the given zero-based attempt index.
    ///
    /// `fail_write_from(0)` fails every write; `fail_write_from(1)` lets
    /// the first write through and fails the rest.
    #[must_use]
    pub fn fail_write_from(self, attempt: usize) -> Self {
        self.lock().fail_write_from = Some(attempt);
        self
    }

    /// Number of successful opens so far.
    pub fn opens(&self) -> usize {
        self.lock().opens
    }

    /// Number of closed (dropped) connections so far.
    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    /// Every successfully written buffer, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().writes.clone()
    }

    /// The line configuration passed to the most recent open.
    pub fn last_config(&self) -> Option<LineConfig> {
        self.lock().last_config.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock transport state poisoned")
    }
}

impl Transport for MockTransport {
    fn open(&self, config: &LineConfig) -> Result<Box<dyn Connection>> {
        let mut state = self.lock();
        state.last_config = Some(config.clone());

        if state.fail_open {
            return Err(SerpentinaError::Open(format!(
                "{}: mock open refused",
                config.port
            )));
        }

        state.opens += 1;
        Ok(Box::new(MockConnection {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockConnection {
    state: Arc<Mutex<MockState>>,
}

impl Connection for MockConnection {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock().expect("mock transport state poisoned");
        let attempt = state.write_attempts;
        state.write_attempts += 1;

        if state.fail_write_from.is_some_and(|from| attempt >= from) {
            return Err(SerpentinaError::Write("mock write refused".to_string()));
        }

        state.writes.push(data.to_vec());
        Ok(())
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.closes += 1;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_opens_writes_closes() {
        let mock = MockTransport::new();
        let config = LineConfig::default();

        {
            let mut conn = mock.open(&config).unwrap();
            conn.write_all(b"abc").unwrap();
            conn.write_all(b"def").unwrap();
        }

        assert_eq!(mock.opens(), 1);
        assert_eq!(mock.closes(), 1);
        assert_eq!(mock.writes(), vec![b"abc".to_vec(), b"def".to_vec()]);
    }

    #[test]
    fn test_fail_open() {
        let mock = MockTransport::new().fail_open();
        let result = mock.open(&LineConfig::default());

        assert!(matches!(result, Err(SerpentinaError::Open(_))));
        assert_eq!(mock.opens(), 0);
        assert_eq!(mock.closes(), 0);
    }

    #[test]
    fn test_fail_write_from() {
        let mock = MockTransport::new().fail_write_from(1);
        let mut conn = mock.open(&LineConfig::default()).unwrap();

        assert!(conn.write_all(b"first").is_ok());
        assert!(matches!(
            conn.write_all(b"second"),
            Err(SerpentinaError::Write(_))
        ));
        assert_eq!(mock.writes(), vec![b"first".to_vec()]);
    }

    #[test]
    fn test_last_config_captured() {
        let mock = MockTransport::new();
        let config = LineConfig::parse("COM9,baud=9600").unwrap();
        let _conn = mock.open(&config).unwrap();

        assert_eq!(mock.last_config().unwrap().port, "COM9");
        assert_eq!(mock.last_config().unwrap().baud, 9600);
    }
}
