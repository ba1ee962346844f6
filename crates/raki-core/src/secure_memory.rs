//! Plaintext buffers for decrypted documents.
//!
//! A [`SecretBuf`] pins its pages in RAM with `mlock` (Unix only) and zeroes the bytes
//! on drop, so decrypted reminders and conversation text do not linger in swap or in
//! freed heap memory after the document has been parsed.

pub struct SecretBuf {
    inner: Vec<u8>,
    locked: bool,
}

impl SecretBuf {
    pub fn new(data: Vec<u8>) -> Self {
        let locked = !data.is_empty() && lock_pages(&data);
        if !locked && !data.is_empty() {
            tracing::debug!(
                target: "raki::secure_memory",
                len = data.len(),
                "mlock unavailable; plaintext buffer is not pinned"
            );
        }
        Self { inner: data, locked }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Copies the plaintext out. The copy is ordinary memory; prefer `as_slice`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.inner.clone()
    }
}

impl AsRef<[u8]> for SecretBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Drop for SecretBuf {
    fn drop(&mut self) {
        for b in self.inner.iter_mut() {
            // Volatile so the zeroing is not elided as a dead store.
            unsafe { std::ptr::write_volatile(b, 0) };
        }
        if self.locked {
            unlock_pages(&self.inner);
        }
    }
}

#[cfg(unix)]
fn lock_pages(data: &[u8]) -> bool {
    unsafe { libc::mlock(data.as_ptr() as *const libc::c_void, data.len()) == 0 }
}

#[cfg(unix)]
fn unlock_pages(data: &[u8]) {
    unsafe {
        libc::munlock(data.as_ptr() as *const libc::c_void, data.len());
    }
}

#[cfg(not(unix))]
fn lock_pages(_data: &[u8]) -> bool {
    false
}

#[cfg(not(unix))]
fn unlock_pages(_data: &[u8]) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_contents() {
        let buf = SecretBuf::new(b"remind me".to_vec());
        assert_eq!(buf.as_slice(), b"remind me");
        assert_eq!(buf.len(), 9);
        assert!(!buf.is_empty());
    }

    #[test]
    fn empty_buffer_is_fine() {
        let buf = SecretBuf::new(Vec::new());
        assert!(buf.is_empty());
    }
}
