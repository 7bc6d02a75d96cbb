//! Receipt layout on an ESC/POS thermal printer
//!
//! [`EscPosBuilder`] works in receipt terms: a heading, label/amount rows,
//! item rows, a total and an optional QR code. Every row is laid out on a
//! fixed number of columns, with the currency symbol counted at its printed
//! width. Text stays UTF-8 until [`finish`](EscPosBuilder::finish) converts
//! it to Windows-1252.

use crate::encoding::{convert_to_cp1252, pad_text, text_width};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;

/// QR module size in dots
const QR_MODULE_SIZE: u8 = 6;

/// Lines fed before the cut so the footer clears the blade
const TRAILING_FEED: u8 = 3;

/// Horizontal alignment (ESC a n)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Character style, combining emphasis (ESC E) and size (GS !)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Normal,
    /// Bold, double width and height
    Title,
    /// Bold, double height; column count is unchanged
    Total,
}

impl Style {
    fn bold(self) -> u8 {
        match self {
            Style::Normal => 0x00,
            Style::Title | Style::Total => 0x01,
        }
    }

    fn size(self) -> u8 {
        match self {
            Style::Normal => 0x00,
            Style::Title => 0x11,
            Style::Total => 0x01,
        }
    }
}

/// Receipt writer for a paper roll `width` characters wide
///
/// 58mm rolls hold 32 characters, 80mm rolls 48.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
    currency: String,
}

impl EscPosBuilder {
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(2048);
        buf.extend_from_slice(&[ESC, 0x40]);
        Self {
            buf,
            width,
            currency: "₹".to_string(),
        }
    }

    /// Currency symbol put in front of every amount
    pub fn with_currency(mut self, symbol: &str) -> Self {
        self.currency = symbol.to_string();
        self
    }

    pub fn align(&mut self, align: Align) -> &mut Self {
        let n = match align {
            Align::Left => 0x00,
            Align::Center => 0x01,
        };
        self.buf.extend_from_slice(&[ESC, 0x61, n]);
        self
    }

    fn style(&mut self, style: Style) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x45, style.bold()]);
        self.buf.extend_from_slice(&[GS, 0x21, style.size()]);
        self
    }

    pub fn line(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(b'\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Full-width line of `ch`
    pub fn rule(&mut self, ch: char) -> &mut Self {
        let rule: String = std::iter::repeat_n(ch, self.width).collect();
        self.line(&rule)
    }

    /// Centered business name with an optional second line
    ///
    /// Leaves the writer left-aligned in normal style.
    pub fn heading(&mut self, title: &str, subtitle: Option<&str>) -> &mut Self {
        self.align(Align::Center);
        self.style(Style::Title);
        self.line(title);
        self.style(Style::Normal);
        if let Some(subtitle) = subtitle {
            self.line(subtitle);
        }
        self.align(Align::Left)
    }

    /// `left` flush left and `right` flush right
    ///
    /// When both do not fit they are printed one space apart.
    pub fn pair(&mut self, left: &str, right: &str) -> &mut Self {
        let used = text_width(left) + text_width(right);
        let gap = if used >= self.width {
            1
        } else {
            self.width - used
        };
        let row = format!("{}{}{}", left, " ".repeat(gap), right);
        self.line(&row)
    }

    /// Amount with the currency symbol; a leading '-' stays in front
    fn money(&self, amount: &str) -> String {
        match amount.strip_prefix('-') {
            Some(abs) => format!("-{}{}", self.currency, abs),
            None => format!("{}{}", self.currency, amount),
        }
    }

    /// Label on the left, amount on the right
    pub fn money_row(&mut self, label: &str, amount: &str) -> &mut Self {
        let amount = self.money(amount);
        self.pair(label, &amount)
    }

    /// Dish row: name cut to fit beside its line total, then "qty x price"
    pub fn item_row(&mut self, name: &str, quantity: i32, unit_price: &str, total: &str) -> &mut Self {
        let total = self.money(total);
        let name_width = self.width.saturating_sub(text_width(&total) + 1);
        let name = pad_text(name, name_width, false);
        self.pair(&name, &total);
        let detail = format!("  {} x {}", quantity, self.money(unit_price));
        self.line(&detail)
    }

    /// Grand total in bold double height
    pub fn total_row(&mut self, label: &str, amount: &str) -> &mut Self {
        self.style(Style::Total);
        self.money_row(label, amount);
        self.style(Style::Normal)
    }

    /// Centered QR code (model 2, error correction L)
    pub fn qr(&mut self, data: &str) -> &mut Self {
        self.align(Align::Center);
        self.qr_command(0x41, &[0x32, 0x00]);
        self.qr_command(0x43, &[QR_MODULE_SIZE]);
        self.qr_command(0x45, &[0x30]);

        let mut store = Vec::with_capacity(data.len() + 1);
        store.push(0x30);
        store.extend_from_slice(data.as_bytes());
        self.qr_command(0x50, &store);
        self.qr_command(0x51, &[0x30]);

        self.blank();
        self.align(Align::Left)
    }

    /// GS ( k pL pH 0x31 fn <params>
    fn qr_command(&mut self, function: u8, params: &[u8]) {
        let len = params.len() + 2;
        self.buf.extend_from_slice(&[
            GS,
            0x28,
            0x6B,
            (len & 0xFF) as u8,
            ((len >> 8) & 0xFF) as u8,
            0x31,
            function,
        ]);
        self.buf.extend_from_slice(params);
    }

    /// Feed, cut and convert to the printer code page
    pub fn finish(mut self) -> Vec<u8> {
        self.buf.extend_from_slice(&[ESC, 0x64, TRAILING_FEED]);
        self.buf.extend_from_slice(&[GS, 0x56, 0x00]);
        convert_to_cp1252(&self.buf)
    }

    #[cfg(test)]
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.buf[2..]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_fills_width() {
        let mut b = EscPosBuilder::new(20);
        b.pair("Subtotal", "250.00");
        assert_eq!(b.text(), "Subtotal      250.00\n");
    }

    #[test]
    fn test_pair_overflow() {
        let mut b = EscPosBuilder::new(10);
        b.pair("Service Charge", "25.00");
        assert_eq!(b.text(), "Service Charge 25.00\n");
    }

    #[test]
    fn test_money_row_counts_currency_width() {
        // '₹' prints as "Rs.", three columns
        let mut b = EscPosBuilder::new(20);
        b.money_row("VAT (5%)", "12.50");
        let text = b.text();
        assert_eq!(text, "VAT (5%)    ₹12.50\n");
        assert_eq!(text_width(text.trim_end()), 20);
    }

    #[test]
    fn test_negative_amount_sign_first() {
        let b = EscPosBuilder::new(32).with_currency("$");
        assert_eq!(b.money("-20.00"), "-$20.00");
        assert_eq!(b.money("20.00"), "$20.00");
    }

    #[test]
    fn test_item_row_truncates_name() {
        let mut b = EscPosBuilder::new(20).with_currency("$");
        b.item_row("Chicken Tikka Masala", 2, "170.00", "340.00");
        assert_eq!(b.text(), "Chicken Tikk $340.00\n  2 x $170.00\n");
    }

    #[test]
    fn test_total_row_restores_style() {
        let mut b = EscPosBuilder::new(20).with_currency("$");
        b.total_row("TOTAL", "9.00");
        let raw = &b.buf[2..];
        assert_eq!(&raw[..6], &[ESC, 0x45, 1, GS, 0x21, 0x01]);
        assert_eq!(&raw[raw.len() - 6..], &[ESC, 0x45, 0, GS, 0x21, 0x00]);
    }

    #[test]
    fn test_qr_store_length() {
        let mut b = EscPosBuilder::new(48);
        b.qr("https://x");
        // align(3) + model(9) + size(8) + ecc(8), then store with pL = 9 + 3
        let store = &b.buf[2 + 3 + 9 + 8 + 8..][..8];
        assert_eq!(store, &[GS, 0x28, 0x6B, 12, 0, 0x31, 0x50, 0x30]);
    }

    #[test]
    fn test_finish_cuts_and_converts() {
        let mut b = EscPosBuilder::new(48);
        b.line("₹10");
        let out = b.finish();
        assert!(out.windows(5).any(|w| w == b"Rs.10"));
        assert_eq!(&out[out.len() - 6..], &[ESC, 0x64, 3, GS, 0x56, 0x00]);
    }
}
