//! Sample receipt printed by the host after connecting.

use hprt_printer::{Alignment, BluetoothRadio, PrinterSdk, PrinterSession, TextAttribute};

/// A receipt line: label and price in cents.
pub struct LineItem<'a> {
    pub label: &'a str,
    pub cents: u64,
}

pub const SAMPLE_ITEMS: &[LineItem<'static>] = &[
    LineItem {
        label: "Espresso",
        cents: 280,
    },
    LineItem {
        label: "Croissant",
        cents: 350,
    },
];

/// Format one line so the price is right-aligned within `width` columns.
pub fn format_line(item: &LineItem<'_>, width: usize) -> String {
    let price = format!("{}.{:02}", item.cents / 100, item.cents % 100);
    let pad = width.saturating_sub(item.label.chars().count() + price.len()).max(1);
    format!("{}{}{}\n", item.label, " ".repeat(pad), price)
}

pub async fn print_sample_receipt<P: PrinterSdk, R: BluetoothRadio>(
    session: &PrinterSession<P, R>,
    items: &[LineItem<'_>],
    new_lines: usize,
) -> hprt_printer::Result<()> {
    let width = hprt_printer::HORIZONTAL_LINE.len();

    session
        .print_text("RECEIPT\n", Alignment::Center, TextAttribute::DOUBLE_BOTH, 0)
        .await?;
    session.horizontal_line().await?;
    session.new_line(1).await?;

    for item in items {
        session.print_text_simple(&format_line(item, width)).await?;
    }

    let total: u64 = items.iter().map(|i| i.cents).sum();
    session
        .print_text_bold(&format_line(
            &LineItem {
                label: "TOTAL",
                cents: total,
            },
            width,
        ))
        .await?;
    session.new_line(new_lines).await?;

    session
        .print_qr_code(&format!("receipt:{total}"), 4, 1, "C")
        .await?;
    session.cut().await?;

    tracing::info!(items = items.len(), total_cents = total, "Sample receipt printed");
    Ok(())
}
