//! Key and Salt Persistence
//!
//! Flat-text records in a configurable directory, one decimal integer per
//! line:
//! - `secret_key.txt`: secret multiplier, public x, public y
//! - `public_key.txt`: public x, public y
//! - `salt_key.txt`: the 64 salt entries
//!
//! Generated once per product release; the signing and validation workflows
//! only ever read them back.
//!
//! SECURITY: raw secret-file contents are held in a `Zeroizing` buffer so
//! the text is wiped when parsing finishes. The parsed big integers
//! themselves cannot be wiped (no zeroize support in the bigint layer); see
//! DESIGN.md.

use std::fs;
use std::path::{Path, PathBuf};

use num_bigint::BigInt;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::curve::{CurveError, Point};
use crate::crypto::ecdsa::{EcdsaError, PrivateKey, PublicKey};
use crate::license::{Salt, SaltError};

pub const SECRET_KEY_FILE: &str = "secret_key.txt";
pub const PUBLIC_KEY_FILE: &str = "public_key.txt";
pub const SALT_FILE: &str = "salt_key.txt";

// MARK: - Errors

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: line {line} is not a valid integer")]
    BadInteger { path: PathBuf, line: usize },
    #[error("{path}: expected {expected} lines, found {found}")]
    WrongLineCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Salt(#[from] SaltError),
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error(transparent)]
    Ecdsa(#[from] EcdsaError),
}

// MARK: - Saving

/// Write the secret record: secret multiplier and public point coordinates.
pub fn save_secret_key(dir: &Path, key: &PrivateKey) -> Result<(), KeystoreError> {
    let (x, y) = key.public_key().coordinates();
    let body = format!(
        "{}\n{}\n{}\n",
        key.secret_multiplier().to_str_radix(10),
        x.to_str_radix(10),
        y.to_str_radix(10),
    );
    write_file(&dir.join(SECRET_KEY_FILE), &body)
}

/// Write the public record: public point coordinates only.
pub fn save_public_key(dir: &Path, key: &PublicKey) -> Result<(), KeystoreError> {
    let (x, y) = key.coordinates();
    let body = format!("{}\n{}\n", x.to_str_radix(10), y.to_str_radix(10));
    write_file(&dir.join(PUBLIC_KEY_FILE), &body)
}

/// Write the salt record, one entry per line.
pub fn save_salt(dir: &Path, salt: &Salt) -> Result<(), KeystoreError> {
    let mut body = String::with_capacity(12 * salt.entries().len());
    for entry in salt.entries() {
        body.push_str(&entry.to_string());
        body.push('\n');
    }
    write_file(&dir.join(SALT_FILE), &body)
}

// MARK: - Loading

/// Read the secret record back and rebuild the private key on `generator`'s
/// subgroup. The public point is revalidated against the key invariants.
pub fn load_secret_key(dir: &Path, generator: &Point) -> Result<PrivateKey, KeystoreError> {
    let path = dir.join(SECRET_KEY_FILE);
    let raw = Zeroizing::new(read_file(&path)?);
    let mut values = parse_decimal_lines(&raw, 3, &path)?;
    let y = values.pop().unwrap_or_default();
    let x = values.pop().unwrap_or_default();
    let secret = values.pop().unwrap_or_default();

    let public = rebuild_public_key(generator, x, y)?;
    Ok(PrivateKey::new(public, secret))
}

/// Read the public record back and rebuild the public key.
pub fn load_public_key(dir: &Path, generator: &Point) -> Result<PublicKey, KeystoreError> {
    let path = dir.join(PUBLIC_KEY_FILE);
    let raw = read_file(&path)?;
    let mut values = parse_decimal_lines(&raw, 2, &path)?;
    let y = values.pop().unwrap_or_default();
    let x = values.pop().unwrap_or_default();
    rebuild_public_key(generator, x, y)
}

/// Read the salt record back, re-reducing each entry modulo 2^31 - 1.
pub fn load_salt(dir: &Path) -> Result<Salt, KeystoreError> {
    let path = dir.join(SALT_FILE);
    let raw = read_file(&path)?;
    let mut entries = Vec::with_capacity(crate::license::SALT_LEN);
    for (idx, line) in non_empty_lines(&raw).enumerate() {
        let value: i64 = line.parse().map_err(|_| KeystoreError::BadInteger {
            path: path.clone(),
            line: idx + 1,
        })?;
        entries.push(value);
    }
    Ok(Salt::from_entries(&entries)?)
}

// MARK: - Helpers

fn rebuild_public_key(
    generator: &Point,
    x: BigInt,
    y: BigInt,
) -> Result<PublicKey, KeystoreError> {
    let curve = generator
        .curve()
        .ok_or_else(|| EcdsaError::InvalidKey("generator must be a finite point".into()))
        .map_err(KeystoreError::Ecdsa)?;
    let n = generator
        .order()
        .ok_or_else(|| EcdsaError::InvalidKey("generator must carry a group order".into()))
        .map_err(KeystoreError::Ecdsa)?;
    let keypoint = Point::with_order(curve.clone(), x, y, n.clone())?;
    Ok(PublicKey::new(generator.clone(), keypoint)?)
}

fn write_file(path: &Path, body: &str) -> Result<(), KeystoreError> {
    fs::write(path, body).map_err(|source| KeystoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_file(path: &Path) -> Result<String, KeystoreError> {
    fs::read_to_string(path).map_err(|source| KeystoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines().map(str::trim).filter(|l| !l.is_empty())
}

fn parse_decimal_lines(
    raw: &str,
    expected: usize,
    path: &Path,
) -> Result<Vec<BigInt>, KeystoreError> {
    let lines: Vec<&str> = non_empty_lines(raw).collect();
    if lines.len() != expected {
        return Err(KeystoreError::WrongLineCount {
            path: path.to_path_buf(),
            expected,
            found: lines.len(),
        });
    }
    let mut values = Vec::with_capacity(expected);
    for (idx, line) in lines.iter().enumerate() {
        let value =
            BigInt::parse_bytes(line.as_bytes(), 10).ok_or_else(|| KeystoreError::BadInteger {
                path: path.to_path_buf(),
                line: idx + 1,
            })?;
        values.push(value);
    }
    Ok(values)
}

// MARK: - Tests
