//! Receipt rendering
//!
//! A [`ReceiptDocument`] is the bill as shown on screen. Renderers turn it
//! into an artifact:
//! - [`HtmlReceiptRenderer`]: self-contained HTML page, uploaded and shared
//! - [`EscPosReceiptRenderer`]: ESC/POS bytes for a thermal printer

use crate::error::BillingResult;
use crate::money::{format_money, line_total, to_decimal};
use pos_printer::{Align, EscPosBuilder, Printer};
use rust_decimal::Decimal;
use shared::{BillView, BusinessProfile, Order, SurchargeLine};
use std::fmt::Write as _;

const CURRENCY: &str = "₹";
const DEFAULT_THEME_COLOR: &str = "#111827";

/// Input to every renderer
#[derive(Debug, Clone)]
pub struct ReceiptDocument {
    pub order: Order,
    pub bill: BillView,
    pub business: BusinessProfile,
    /// Stored receipt link, printed as a QR code when present
    pub link: Option<String>,
}

impl ReceiptDocument {
    fn business_name(&self) -> &str {
        let name = self.business.name.trim();
        if name.is_empty() { "Restaurant" } else { name }
    }

    fn timestamp(&self) -> String {
        self.order.created_at.format("%d/%m/%Y %H:%M").to_string()
    }

    /// File name for the stored artifact ("bill-ORD-42.html")
    pub fn file_name(&self, extension: &str) -> String {
        let id: String = self
            .order
            .order_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("bill-{}.{}", id, extension)
    }
}

/// Rendered receipt, ready for upload or printing
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

pub trait ReceiptRenderer: Send + Sync {
    fn render(&self, doc: &ReceiptDocument) -> BillingResult<ReceiptArtifact>;
}

fn surcharge_label(line: &SurchargeLine) -> String {
    format!("{} ({}%)", line.kind.label(), line.rate.normalize())
}

fn money(value: Decimal) -> String {
    format!("{}{}", CURRENCY, format_money(value))
}

// ========== HTML ==========

#[derive(Debug, Clone, Default)]
pub struct HtmlReceiptRenderer;

impl HtmlReceiptRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_html(&self, doc: &ReceiptDocument) -> String {
        let bill = &doc.bill;
        let accent = doc
            .business
            .theme_color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_THEME_COLOR);

        let mut body = String::new();
        let _ = write!(
            body,
            "<header><h1>{}</h1>",
            esc(doc.business_name())
        );
        if let Some(tagline) = doc.business.tagline.as_deref().filter(|t| !t.trim().is_empty()) {
            let _ = write!(body, "<p class=\"note\">{}</p>", esc(tagline));
        }
        body.push_str("</header>");

        let _ = write!(
            body,
            "<div class=\"section\">\
             <div class=\"line\"><span>Order</span><span>{}</span></div>\
             <div class=\"line\"><span>Table</span><span>{}</span></div>\
             <div class=\"line\"><span>Date</span><span>{}</span></div>",
            esc(&doc.order.order_id),
            esc(&doc.order.table_number),
            esc(&doc.timestamp()),
        );
        if !doc.order.customer_name.trim().is_empty() {
            let _ = write!(
                body,
                "<div class=\"line\"><span>Customer</span><span>{}</span></div>",
                esc(&doc.order.customer_name)
            );
        }
        if !doc.order.payment_method.trim().is_empty() {
            let _ = write!(
                body,
                "<div class=\"line\"><span>Payment</span><span>{}</span></div>",
                esc(&doc.order.payment_method)
            );
        }
        body.push_str("</div>");

        body.push_str(
            "<table class=\"section\"><thead><tr><th>Item</th><th>Qty</th>\
             <th>Price</th><th>Total</th></tr></thead><tbody>",
        );
        for line in &bill.lines {
            let _ = write!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                esc(line.display_name()),
                line.quantity,
                esc(&money(to_decimal(line.unit_price))),
                esc(&money(line_total(line))),
            );
        }
        body.push_str("</tbody></table>");

        body.push_str("<div class=\"section\">");
        push_row(&mut body, "Subtotal", &money(bill.subtotal));
        if !bill.discount.is_zero() {
            push_row(&mut body, "Discount", &format!("-{}", money(bill.discount)));
        }
        for surcharge in &bill.surcharges {
            push_row(&mut body, &surcharge_label(surcharge), &money(surcharge.amount));
        }
        let _ = write!(
            body,
            "<div class=\"line total\"><strong>Grand Total</strong><strong>{}</strong></div></div>",
            esc(&money(bill.grand_total))
        );

        if let Some(link) = &doc.link {
            let _ = write!(
                body,
                "<p class=\"note center\"><a href=\"{0}\">{0}</a></p>",
                esc(link)
            );
        }
        body.push_str("<p class=\"center\">Thank you for dining with us!</p>");

        html_shell(
            &format!("{} - {}", doc.business_name(), doc.order.order_id),
            accent,
            &body,
        )
    }
}

impl ReceiptRenderer for HtmlReceiptRenderer {
    fn render(&self, doc: &ReceiptDocument) -> BillingResult<ReceiptArtifact> {
        Ok(ReceiptArtifact {
            bytes: self.render_html(doc).into_bytes(),
            content_type: "text/html",
            file_name: doc.file_name("html"),
        })
    }
}

fn push_row(body: &mut String, label: &str, value: &str) {
    let _ = write!(
        body,
        "<div class=\"line\"><span>{}</span><span>{}</span></div>",
        esc(label),
        esc(value)
    );
}

fn esc(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn html_shell(title: &str, accent: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1.0"/>
<title>{}</title>
<style>
body {{ font-family: ui-monospace, SFMono-Regular, Menlo, monospace; margin: 0 auto; max-width: 420px; padding: 16px; color: #111; }}
header {{ text-align: center; border-bottom: 3px solid {}; margin-bottom: 8px; }}
h1 {{ margin: 0 0 4px 0; font-size: 18px; }}
table {{ width: 100%; border-collapse: collapse; font-size: 12px; }}
th, td {{ text-align: right; padding: 2px 0; }}
th:first-child, td:first-child {{ text-align: left; }}
.line {{ display: flex; justify-content: space-between; gap: 8px; font-size: 12px; }}
.total {{ font-size: 14px; border-top: 1px solid #111; margin-top: 4px; padding-top: 4px; }}
.section {{ margin-top: 8px; border-top: 1px dashed #111; padding-top: 6px; }}
.note {{ color: #666; font-size: 11px; word-break: break-all; }}
.center {{ text-align: center; }}
</style>
</head>
<body>{}</body>
</html>"#,
        esc(title),
        esc(accent),
        body
    )
}

// ========== ESC/POS ==========

#[derive(Debug, Clone)]
pub struct EscPosReceiptRenderer {
    width: usize,
}

impl EscPosReceiptRenderer {
    /// Paper width in characters (32 for 58mm, 48 for 80mm)
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn render_bytes(&self, doc: &ReceiptDocument) -> Vec<u8> {
        let bill = &doc.bill;
        let mut b = EscPosBuilder::new(self.width).with_currency(CURRENCY);

        let tagline = doc.business.tagline.as_deref().filter(|t| !t.trim().is_empty());
        b.heading(doc.business_name(), tagline);
        b.blank();

        b.pair(&format!("Order: {}", doc.order.order_id), &doc.timestamp());
        b.pair(
            &format!("Table: {}", doc.order.table_number),
            &doc.order.payment_method,
        );
        if !doc.order.customer_name.trim().is_empty() {
            b.line(&format!("Customer: {}", doc.order.customer_name));
        }
        b.rule('=');

        for line in &bill.lines {
            b.item_row(
                line.display_name(),
                line.quantity,
                &format_money(to_decimal(line.unit_price)),
                &format_money(line_total(line)),
            );
        }
        b.rule('-');

        b.money_row("Subtotal", &format_money(bill.subtotal));
        if !bill.discount.is_zero() {
            b.money_row("Discount", &format_money(-bill.discount));
        }
        for surcharge in &bill.surcharges {
            b.money_row(&surcharge_label(surcharge), &format_money(surcharge.amount));
        }
        b.rule('=');
        b.total_row("TOTAL", &format_money(bill.grand_total));

        if let Some(link) = &doc.link {
            b.blank();
            b.qr(link);
        }

        b.blank();
        b.align(Align::Center);
        b.line("Thank you for dining with us!");
        b.finish()
    }
}

impl Default for EscPosReceiptRenderer {
    fn default() -> Self {
        Self::new(48)
    }
}

impl ReceiptRenderer for EscPosReceiptRenderer {
    fn render(&self, doc: &ReceiptDocument) -> BillingResult<ReceiptArtifact> {
        Ok(ReceiptArtifact {
            bytes: self.render_bytes(doc),
            content_type: "application/octet-stream",
            file_name: doc.file_name("bin"),
        })
    }
}

/// Print the receipt on a thermal printer
pub async fn print_receipt<P: Printer>(
    printer: &P,
    renderer: &EscPosReceiptRenderer,
    doc: &ReceiptDocument,
) -> BillingResult<()> {
    let artifact = renderer.render(doc)?;
    printer.print(&artifact.bytes).await?;
    tracing::info!(order_id = %doc.order.order_id, "Receipt printed");
    Ok(())
}
