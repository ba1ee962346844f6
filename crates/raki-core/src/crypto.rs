//! **CryptoBox**: AES-256-GCM over opaque byte payloads, one key per installation.
//!
//! ## Token format
//!
//! `[12-byte nonce][ciphertext+tag]`, nonce drawn from `OsRng` on every call.
//! There is no version byte: a different key simply fails authentication.
//!
//! ## Key file
//!
//! 64 hex characters (32 bytes). Generated once by [`CryptoBox::load_or_create`] and
//! never regenerated automatically. A key file that exists but cannot be parsed is an
//! error rather than a reason to mint a new key, since that would orphan every document.

use crate::error::{CoreError, CoreResult, DecryptError};
use crate::secure_memory::SecretBuf;
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use std::fs;
use std::path::Path;
use tracing::info;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

pub struct CryptoBox {
    cipher: Aes256Gcm,
}

impl CryptoBox {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Reads the key at `path`, creating it first if the file does not exist.
    pub fn load_or_create(path: &Path) -> CoreResult<Self> {
        if path.exists() {
            let text = fs::read_to_string(path)?;
            let key = decode_key(&text).ok_or_else(|| CoreError::KeyFile {
                path: path.display().to_string(),
                reason: "expected 64 hex characters".to_string(),
            })?;
            return Ok(Self::new(&key));
        }

        let key = Aes256Gcm::generate_key(OsRng);
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(key.as_slice());
        write_key_file(path, &encode_key(&bytes))?;
        info!(target: "raki::crypto", path = %path.display(), "generated new encryption key");
        Ok(Self::new(&bytes))
    }

    /// Encrypts `data` into a fresh token.
    pub fn encrypt(&self, data: &[u8]) -> CoreResult<Vec<u8>> {
        let nonce = Aes256Gcm::generate_nonce(OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, data)
            .map_err(|e| CoreError::Encrypt(e.to_string()))?;
        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(nonce.as_slice());
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypts a token produced by `encrypt` under the same key.
    pub fn decrypt(&self, token: &[u8]) -> Result<Vec<u8>, DecryptError> {
        self.decrypt_secret(token).map(|buf| buf.to_vec())
    }

    /// Like `decrypt`, but keeps the plaintext in a pinned, zero-on-drop buffer.
    pub fn decrypt_secret(&self, token: &[u8]) -> Result<SecretBuf, DecryptError> {
        if token.len() < NONCE_LEN {
            return Err(DecryptError::Truncated(token.len()));
        }
        let (nonce, ciphertext) = token.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| DecryptError::Authentication)?;
        Ok(SecretBuf::new(plain))
    }
}

fn encode_key(key: &[u8; KEY_LEN]) -> String {
    key.iter().map(|b| format!("{:02x}", b)).collect()
}

fn decode_key(text: &str) -> Option<[u8; KEY_LEN]> {
    let hex: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if hex.len() != KEY_LEN * 2 || !hex.is_ascii() {
        return None;
    }
    let mut key = [0u8; KEY_LEN];
    for (i, byte) in key.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(key)
}

fn write_key_file(path: &Path, contents: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
