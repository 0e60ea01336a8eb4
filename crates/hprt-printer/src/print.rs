//! Print operations.
//!
//! Each one forwards to a single SDK call (plus defaults). `Ok(true)` means the
//! SDK accepted the command; it says nothing about paper coming out. Empty
//! payloads are acknowledged without touching the SDK.

use std::path::Path;

use crate::native::{BluetoothRadio, NativeFault, PrinterSdk};
use crate::session::PrinterSession;
use crate::stored_image::{self, TEMP_IMAGE_FILE_NAME};
use crate::types::{Alignment, CutMode, Justification, TextAttribute};
use crate::{PrinterError, Result};

/// Added to the QR error-correction level before it reaches the SDK.
pub const QR_LEVEL_OFFSET: u8 = 0x30;

/// Feed units before a cut so the last line clears the blade.
pub const CUT_FEED_UNITS: u32 = 500;

/// Separator printed by `horizontal_line`.
pub const HORIZONTAL_LINE: &str = "--------------------------------";

const TEST_PRINT_TEXT: &str = "Hello world\n";

impl<P: PrinterSdk, R: BluetoothRadio> PrinterSession<P, R> {
    /// Print `text`. An empty string is acknowledged without printing and
    /// does not clear any printer buffer.
    pub async fn print_text(
        &self,
        text: &str,
        alignment: Alignment,
        attribute: TextAttribute,
        size: u8,
    ) -> Result<bool> {
        if text.is_empty() {
            return Ok(true);
        }
        tracing::debug!(
            len = text.len(),
            ?alignment,
            attr = attribute.bits(),
            size,
            "Print text"
        );
        self.sdk.print_text(text, alignment as u8, attribute.bits(), size)?;
        Ok(true)
    }

    async fn print_preset(
        &self,
        text: &str,
        alignment: Alignment,
        attribute: TextAttribute,
    ) -> Result<bool> {
        self.print_text(text, alignment, attribute, 0).await
    }

    /// Left aligned, no attributes, default size.
    pub async fn print_text_simple(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Left, TextAttribute::NORMAL).await
    }

    pub async fn print_text_bold(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Left, TextAttribute::BOLD).await
    }

    pub async fn print_text_underline(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Left, TextAttribute::UNDERLINE).await
    }

    pub async fn print_text_mini(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Left, TextAttribute::MINI).await
    }

    pub async fn print_text_white(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Left, TextAttribute::WHITE).await
    }

    pub async fn print_text_double_width(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Left, TextAttribute::DOUBLE_WIDTH).await
    }

    pub async fn print_text_double_height(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Left, TextAttribute::DOUBLE_HEIGHT).await
    }

    /// Double width and double height.
    pub async fn print_text_double(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Left, TextAttribute::DOUBLE_BOTH).await
    }

    pub async fn print_text_left(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Left, TextAttribute::NORMAL).await
    }

    pub async fn print_text_center(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Center, TextAttribute::NORMAL).await
    }

    pub async fn print_text_right(&self, text: &str) -> Result<bool> {
        self.print_preset(text, Alignment::Right, TextAttribute::NORMAL).await
    }

    /// Print an image file. Halftone, scale and DPI go to the SDK as-is.
    pub async fn print_image_from_path(
        &self,
        path: impl AsRef<Path>,
        halftone: u8,
        scale: u8,
        dpi: u8,
    ) -> Result<bool> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(true);
        }
        tracing::debug!(path = %path.display(), halftone, scale, dpi, "Print image");
        self.sdk.print_image(path, halftone, scale, dpi)?;
        Ok(true)
    }

    /// Decode a base64 image, store it as PNG in document storage and print it.
    ///
    /// The file has a fixed name and is left in place, so concurrent calls
    /// overwrite each other. Returns `Ok(false)` when the file cannot be written.
    pub async fn print_image_from_base64(
        &self,
        payload: &str,
        halftone: u8,
        scale: u8,
        dpi: u8,
    ) -> Result<bool> {
        if payload.is_empty() {
            return Ok(true);
        }

        let image = stored_image::decode_base64(payload)?;
        let path = self.options.documents_dir.join(TEMP_IMAGE_FILE_NAME);
        if let Err(e) = stored_image::save_png(&image, &path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to store decoded image");
            return Ok(false);
        }

        self.print_image_from_path(&path, halftone, scale, dpi).await
    }

    /// Print a QR code, then feed the profile's tear spacing.
    ///
    /// `size` goes to the SDK as `size + 1` and `level` as
    /// `level + QR_LEVEL_OFFSET`; both are calibration offsets of the HPRT
    /// firmware. `justification` must be `"L"`, `"C"` or `"R"`, and `size`
    /// must leave room for the offset.
    pub async fn print_qr_code(
        &self,
        text: &str,
        size: u8,
        level: u8,
        justification: &str,
    ) -> Result<bool> {
        if text.is_empty() {
            return Ok(true);
        }
        let justify: Justification = justification.parse()?;

        let native_size = size.checked_add(1).ok_or(PrinterError::InvalidQrSize(size))?;
        let native_level = level.saturating_add(QR_LEVEL_OFFSET);
        tracing::debug!(
            len = text.len(),
            size = native_size,
            level = native_level,
            ?justify,
            "Print QR code"
        );
        self.sdk.print_qr_code(text, native_size, native_level, justify as u8)?;

        self.feed_tear_spacing();
        Ok(true)
    }

    /// Best-effort feed by the profile's tear spacing. Faults are logged,
    /// never returned.
    pub fn feed_tear_spacing(&self) {
        let units = self.options.profile.tear_spacing;
        if let Err(fault) = self.sdk.print_and_feed(units) {
            tracing::warn!(units, error = %fault, "Tear spacing feed failed");
        }
    }

    pub async fn feed(&self, units: u32) -> Result<bool> {
        self.sdk.print_and_feed(units)?;
        Ok(true)
    }

    /// Feed [`CUT_FEED_UNITS`] then partial cut.
    pub async fn cut(&self) -> Result<bool> {
        self.sdk.print_and_feed(CUT_FEED_UNITS)?;
        self.sdk.cut_paper(CutMode::Partial as u8)?;
        tracing::debug!("Paper cut");
        Ok(true)
    }

    /// Print `count` line feeds. Zero is treated as one.
    pub async fn new_line(&self, count: usize) -> Result<bool> {
        for _ in 0..count.max(1) {
            self.sdk.print_text("\n", 0, 0, 0)?;
        }
        Ok(true)
    }

    pub async fn horizontal_line(&self) -> Result<bool> {
        self.sdk.print_text(HORIZONTAL_LINE, 0, 0, 0)?;
        Ok(true)
    }

    /// Hand a prebuilt command file to the SDK. The path is not checked.
    pub async fn print_raw_binary_file(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Print binary file");
        self.sdk.print_binary_file(path)?;
        Ok(true)
    }

    pub async fn test_print(&self) -> Result<()> {
        self.sdk.print_text(TEST_PRINT_TEXT, 0, 0, 0)?;
        Ok(())
    }

    /// Apply a codepage preference of the form `"<index>,<Language>"`.
    ///
    /// Sets the SDK character set and text encoding for the language and
    /// returns the encoding. Any failure is logged and yields `""`.
    pub fn apply_codepage(&self, preference: &str) -> String {
        match self.try_apply_codepage(preference) {
            Ok(encoding) => {
                tracing::info!(%encoding, "Codepage applied");
                encoding
            }
            Err(fault) => {
                tracing::warn!(preference, error = %fault, "Failed to apply codepage");
                String::new()
            }
        }
    }

    fn try_apply_codepage(&self, preference: &str) -> std::result::Result<String, NativeFault> {
        let language = preference
            .split(',')
            .nth(1)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| NativeFault::new("codepage preference has no language"))?;

        let encoding = self.sdk.language_encoding_for(language)?;
        let index = self.sdk.code_page_index_for(language)?;

        self.sdk.set_character_set(index)?;
        self.sdk.set_language_encoding(&encoding)?;
        Ok(encoding)
    }
}
