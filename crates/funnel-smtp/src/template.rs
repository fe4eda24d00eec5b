// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Order confirmation email content.

/// Rendered subject and bodies for one email.
#[derive(Debug, Clone)]
pub struct EmailContent {
	pub subject: String,
	pub html: String,
	pub text: String,
}

/// Render the order confirmation email.
///
/// `order_code` is the short human-facing reference, not the payment
/// provider's session id.
pub fn order_confirmation(
	order_code: &str,
	product_name: &str,
	price_display: &str,
	site_url: &str,
) -> EmailContent {
	let subject = format!("Order confirmed - {order_code}");

	let html = format!(
		"<html><body style=\"font-family: sans-serif; color: #1a1a1a;\">\
		<h1>Thank you for your order!</h1>\
		<p>Your payment was received and your order is confirmed.</p>\
		<table style=\"border-collapse: collapse;\">\
		<tr><td style=\"padding: 4px 12px 4px 0;\"><strong>Order</strong></td><td>{order_code}</td></tr>\
		<tr><td style=\"padding: 4px 12px 4px 0;\"><strong>Item</strong></td><td>{product_name}</td></tr>\
		<tr><td style=\"padding: 4px 12px 4px 0;\"><strong>Total</strong></td><td>{price_display}</td></tr>\
		</table>\
		<p>Access your purchase any time at <a href=\"{site_url}\">{site_url}</a>.</p>\
		<p>Questions? Just reply to this email.</p>\
		</body></html>"
	);

	let text = format!(
		"Thank you for your order!\n\n\
		Your payment was received and your order is confirmed.\n\n\
		Order: {order_code}\n\
		Item: {product_name}\n\
		Total: {price_display}\n\n\
		Access your purchase any time at {site_url}\n\n\
		Questions? Just reply to this email.\n"
	);

	EmailContent { subject, html, text }
}
