//! Pay command - record a payment against a visit's invoice

use std::path::Path;

use crate::errors::Result;
use crate::schemas::{Payment, PaymentMethod};

use super::{fetch_visit, print_json, Context};

pub async fn run(
    home: Option<&Path>,
    json: bool,
    visit_id: &str,
    amount: f64,
    method: PaymentMethod,
    reference: Option<String>,
) -> Result<()> {
    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;

    let payment = Payment {
        amount,
        method,
        reference,
    };
    let invoice = workflow.record_payment(&session, &visit, &payment).await?;

    if json {
        return print_json(&invoice);
    }
    if invoice.is_paid() {
        println!("Invoice {} paid in full ({:.2})", invoice.id, invoice.total);
    } else {
        println!(
            "Invoice {}: paid {:.2} of {:.2}, {:.2} outstanding",
            invoice.id,
            invoice.amount_paid,
            invoice.total,
            invoice.balance()
        );
    }
    Ok(())
}
