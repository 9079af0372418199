//! Validation of uploaded FASTA files.

use std::io::Read;

use flate2::read::MultiGzDecoder;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Upper bound on an upload after gzip decompression
pub const MAX_DECOMPRESSED_SIZE: usize = 512 * 1024 * 1024; // 512MB

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
    #[error("File content appears malformed or invalid")]
    InvalidFileContent,
    #[error("Decompressed file exceeds {MAX_DECOMPRESSED_SIZE} bytes")]
    DecompressedTooLarge,
}

/// An upload that passed validation, decompressed and decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub filename: Option<String>,
    pub text: String,
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>();

    if sanitized.trim().is_empty() {
        return Err(ValidationError::InvalidFilename);
    }

    // Hidden files are only accepted with a sequence file extension
    if sanitized.starts_with('.') && !has_known_extension(&sanitized) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Check if filename has a known sequence file extension
fn has_known_extension(filename: &str) -> bool {
    let safe_extensions = [
        ".fa", ".fasta", ".fna", ".ffn", ".fas", ".faa", ".txt", ".gz", ".bgz",
    ];

    let lower = filename.to_lowercase();
    safe_extensions.iter().any(|ext| lower.ends_with(ext))
}

/// True if the content starts with the gzip magic bytes
#[must_use]
pub fn is_gzip(content: &[u8]) -> bool {
    content.starts_with(&GZIP_MAGIC)
}

/// Decompress gzip content, refusing to inflate past `limit` bytes.
///
/// Concatenated gzip members (as written by bgzip) are decoded as one stream.
///
/// # Errors
///
/// Returns `ValidationError::InvalidFileContent` if the stream is corrupt, or
/// `ValidationError::DecompressedTooLarge` if it inflates past `limit`.
pub fn decompress_gzip(content: &[u8], limit: usize) -> Result<Vec<u8>, ValidationError> {
    let mut decoded = Vec::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    MultiGzDecoder::new(content)
        .take(cap)
        .read_to_end(&mut decoded)
        .map_err(|_| ValidationError::InvalidFileContent)?;

    if decoded.len() > limit {
        return Err(ValidationError::DecompressedTooLarge);
    }
    Ok(decoded)
}

/// Validate that file content is not malicious or malformed
///
/// Basic security checks for file content integrity:
/// - Binary content detection
/// - UTF-8 validation
///
/// Empty content passes; the FASTA reader treats it as no records.
///
/// # Errors
///
/// Returns `ValidationError::InvalidFileContent` if the content contains
/// unexpected binary data or fails UTF-8 validation.
pub fn validate_file_content(content: &[u8]) -> Result<(), ValidationError> {
    let non_printable_count = content
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32) || b > 126)
        .count();

    // Allow up to 5% non-printable characters
    if content.len() > 100 && non_printable_count > content.len() / 20 {
        return Err(ValidationError::InvalidFileContent);
    }

    if std::str::from_utf8(content).is_err() {
        return Err(ValidationError::InvalidFileContent);
    }

    Ok(())
}

/// Comprehensive validation of one uploaded FASTA file
///
/// Sanitizes the filename, inflates gzip content, then checks the result is
/// text. FASTA structure is left to the reader: content before the first
/// header is discarded there and an empty file yields no records.
///
/// # Errors
///
/// Returns a `ValidationError` if the filename is unsafe, decompression fails
/// or exceeds [`MAX_DECOMPRESSED_SIZE`], or the content is binary.
pub fn validate_upload(
    filename: Option<&str>,
    content: &[u8],
) -> Result<ValidatedUpload, ValidationError> {
    let filename = filename.map(validate_filename).transpose()?;

    let inflated;
    let content = if is_gzip(content) {
        inflated = decompress_gzip(content, MAX_DECOMPRESSED_SIZE)?;
        inflated.as_slice()
    } else {
        content
    };

    validate_file_content(content)?;

    let text = String::from_utf8(content.to_vec()).map_err(|_| ValidationError::InvalidFileContent)?;

    Ok(ValidatedUpload { filename, text })
}
