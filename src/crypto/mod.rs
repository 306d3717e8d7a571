//! AES-128-CBC segment decryption.

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, KeyIvInit};

use crate::error::{Error, Result};

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Read-only cipher material shared by all segment decrypts of one job.
///
/// Every decrypt call constructs its own `cbc::Decryptor` from the same key
/// and IV, so concurrent decrypts never share CBC chaining state.
#[derive(Debug, Clone)]
pub struct CipherContext {
    key: [u8; BLOCK_SIZE],
    iv: [u8; BLOCK_SIZE],
}

/// Output of one segment decrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decrypted {
    pub bytes: Vec<u8>,
    /// Set when unpadding failed and the raw decrypted bytes were kept.
    pub padding_recovered: bool,
}

impl CipherContext {
    /// Build a context from fetched key material and an optional playlist IV.
    ///
    /// A missing IV falls back to the zero IV.
    pub fn new(key: &[u8], iv: Option<[u8; BLOCK_SIZE]>) -> Result<Self> {
        let key: [u8; BLOCK_SIZE] = key.try_into().map_err(|_| {
            Error::Decryption(format!(
                "Invalid key length: {} (expected {})",
                key.len(),
                BLOCK_SIZE
            ))
        })?;

        Ok(Self {
            key,
            iv: iv.unwrap_or([0u8; BLOCK_SIZE]),
        })
    }

    fn decryptor(&self) -> Aes128CbcDec {
        Aes128CbcDec::new(&self.key.into(), &self.iv.into())
    }

    /// Decrypt one segment body.
    ///
    /// Block-aligned input is decrypted as-is. Misaligned input is padded to
    /// the next block boundary before decryption and unpadded afterwards; if
    /// unpadding fails, the raw decrypted bytes are kept and flagged so the
    /// degraded segment stays visible in telemetry.
    pub fn decrypt(&self, data: &[u8]) -> Decrypted {
        if data.len() % BLOCK_SIZE == 0 {
            let mut buf = data.to_vec();
            // NoPadding on an exact block multiple cannot fail
            let _ = self.decryptor().decrypt_padded_mut::<NoPadding>(&mut buf);
            Decrypted {
                bytes: buf,
                padding_recovered: false,
            }
        } else {
            let mut buf = pad_to_block(data);
            let unpadded_len = match self.decryptor().decrypt_padded_mut::<Pkcs7>(&mut buf) {
                Ok(plaintext) => Some(plaintext.len()),
                Err(_) => None,
            };

            match unpadded_len {
                Some(len) => {
                    buf.truncate(len);
                    Decrypted {
                        bytes: buf,
                        padding_recovered: false,
                    }
                }
                None => Decrypted {
                    bytes: buf,
                    padding_recovered: true,
                },
            }
        }
    }
}

/// Extend `data` with PKCS#7-style padding up to the next block boundary.
fn pad_to_block(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut buf = Vec::with_capacity(data.len() + pad_len);
    buf.extend_from_slice(data);
    buf.extend(std::iter::repeat(pad_len as u8).take(pad_len));
    buf
}
