use tera::{Context, Tera};

use crate::domain::models::booking::Booking;
use crate::domain::models::resource::{Resource, ResourceKind};
use crate::error::AppError;

/// Renders the invoice document emailed on commit. Returns the mail
/// subject and the HTML body.
pub fn render_invoice(templates: &Tera, booking: &Booking, resource: &Resource) -> Result<(String, String), AppError> {
    let mut context = Context::new();
    context.insert("reference", &booking.reference);
    context.insert("booking_type", match booking.resource_kind {
        ResourceKind::Room => "Room",
        ResourceKind::Lawn => "Lawn",
    });
    context.insert("resource_name", &resource.name);
    context.insert("customer_email", &booking.customer_email);
    context.insert("customer_phone", &booking.customer_phone);
    context.insert("check_in", &booking.check_in.format("%Y-%m-%d").to_string());
    context.insert("check_out", &booking.check_out.format("%Y-%m-%d").to_string());
    context.insert("nights", &booking.nights);
    context.insert("adults", &booking.adults);
    context.insert("children", &booking.children);
    context.insert("amount", &booking.amount);
    context.insert("payment_id", &booking.payment_id);

    if let Some(plates) = booking.plate_order {
        context.insert("plate_order", &plates);
        context.insert("rate_label", "Per plate");
        context.insert("rate", &resource.price_per_plate.unwrap_or(0));
    } else {
        context.insert("rate_label", "Per night");
        context.insert("rate", &resource.price);
    }

    let body = templates
        .render("invoice.html", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Invoice render error: {:?}", e)))?;

    let subject = format!("Booking confirmed — invoice {}", booking.reference);
    Ok((subject, body))
}
