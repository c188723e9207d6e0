//! Quote display formatting
//!
//! Renders the charges of a quote as one table per language pair.

use crate::models::{PairCharges, Quote};

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn format_pair(charges: &PairCharges) -> String {
    let service_width = charges
        .rows
        .iter()
        .map(|r| r.service.len())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut output = String::new();
    output.push_str(&format!("{}", charges.pair));
    if charges.fell_back_to_translation {
        output.push_str("  (no Machine Translation rate, quoted as Translation)");
    }
    output.push('\n');

    output.push_str(&format!(
        "  {:<service_width$}  {:<8}  {:>10}  {:>10}  {:>12}\n",
        "Service",
        "UofM",
        "Quantity",
        "Rate",
        "Amount",
        service_width = service_width,
    ));
    output.push_str(&format!(
        "  {:-<service_width$}  {:-<8}  {:->10}  {:->10}  {:->12}\n",
        "",
        "",
        "",
        "",
        "",
        service_width = service_width,
    ));

    for row in &charges.rows {
        output.push_str(&format!(
            "  {:<service_width$}  {:<8}  {:>10}  {:>10}  {:>12.2}\n",
            row.service,
            row.unit_of_measure.to_string(),
            format_number(row.quantity),
            row.rate.map(format_number).unwrap_or_default(),
            row.amount(),
            service_width = service_width,
        ));
    }

    output.push_str(&format!(
        "  {:<service_width$}  {:<8}  {:>10}  {:>10}  {:>12.2}\n",
        "Subtotal",
        "",
        "",
        "",
        charges.total(),
        service_width = service_width,
    ));
    output
}

/// Format a whole quote
pub fn format_quote(quote: &Quote) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Quote {} for {} ({})\n\n",
        quote.id, quote.account, quote.entity
    ));

    if quote.pairs.is_empty() {
        output.push_str("No charges.\n");
        return output;
    }

    for charges in &quote.pairs {
        output.push_str(&format_pair(charges));
        output.push('\n');
    }
    output.push_str(&format!("TOTAL: {:.2}\n", quote.total()));

    let fallback = quote.fallback_pairs();
    if !fallback.is_empty() {
        output.push_str(&format!(
            "\nQuoted with Translation instead of Machine Translation: {}\n",
            fallback
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    output
}
