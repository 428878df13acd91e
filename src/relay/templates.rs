//! Fixed message templates for operator notifications and auto-replies

use crate::{
    defaults,
    mail::OutgoingMessage,
    models::{ContactSubmission, QuoteSubmission},
};
use chrono::{Datelike, Utc};

/// Business details printed in auto-replies
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessProfile {
    pub name: String,
    pub support_phone: String,
    pub whatsapp: String,
    pub support_email: String,
    pub postal_line: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            name: defaults::BUSINESS_NAME.to_string(),
            support_phone: defaults::SUPPORT_PHONE.to_string(),
            whatsapp: defaults::SUPPORT_WHATSAPP.to_string(),
            support_email: defaults::SUPPORT_EMAIL.to_string(),
            postal_line: defaults::POSTAL_LINE.to_string(),
        }
    }
}

/// Addressing shared by every message of one submission
#[derive(Debug, Clone)]
pub struct Envelope<'a> {
    /// Mail account identity used as the sender address
    pub sender: &'a str,
    /// Operator mailbox
    pub operator: &'a str,
    pub business: &'a BusinessProfile,
}

/// Escape text for interpolation into HTML bodies
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn current_year() -> i32 {
    Utc::now().year()
}

const OPERATING_HOURS_TEXT: &str = "Monday - Saturday: 9:00 AM - 8:00 PM\nSunday: 10:00 AM - 6:00 PM";
const OPERATING_HOURS_HTML: &str = "Monday - Saturday: 9:00 AM - 8:00 PM<br>\n               Sunday: 10:00 AM - 6:00 PM";

const BASE_STYLE: &str = "\
      body { font-family: Arial, sans-serif; line-height: 1.6; color: #333333; }
      .container { max-width: 600px; margin: 0 auto; padding: 20px; }
      .header { background-color: #0047AB; color: white; padding: 20px; text-align: center; border-radius: 5px 5px 0 0; }
      .content { padding: 20px; background-color: #ffffff; border: 1px solid #dddddd; }
      .details { background-color: #f9f9f9; padding: 15px; margin: 20px 0; border-left: 4px solid #0047AB; }
      .contact-info { background-color: #f5f5f5; padding: 15px; margin-top: 20px; border-radius: 5px; }
      .footer { text-align: center; padding: 20px; color: #666666; font-size: 12px; }";

fn html_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <style>\n{style}\n  </style>\n</head>\n<body>\n  <div class=\"container\">\n    <div class=\"header\">\n      <h1>{title}</h1>\n    </div>\n{body}\n  </div>\n</body>\n</html>\n",
        style = BASE_STYLE,
        title = title,
        body = body,
    )
}

fn detail_line(label: &str, value: &str) -> String {
    format!("        <p><strong>{}:</strong> {}</p>\n", label, escape_html(value))
}

fn contact_info_block(business: &BusinessProfile) -> String {
    format!(
        "      <div class=\"contact-info\">\n        <h3>Quick Assistance</h3>\n        <p><strong>Operating Hours:</strong></p>\n        <p>{hours}</p>\n        <p><strong>Contact Information:</strong></p>\n        <p>Technical Support: {phone}<br>\n           WhatsApp: {whatsapp}<br>\n           Email: {email}</p>\n      </div>\n",
        hours = OPERATING_HOURS_HTML,
        phone = escape_html(&business.support_phone),
        whatsapp = escape_html(&business.whatsapp),
        email = escape_html(&business.support_email),
    )
}

fn footer_block(business: &BusinessProfile, automated: bool) -> String {
    let notice = if automated {
        "      <p>This is an automated response. Please do not reply to this email.</p>\n"
    } else {
        ""
    };
    format!(
        "    <div class=\"footer\">\n{notice}      <p>&copy; {year} {name}. All rights reserved.</p>\n      <p>{postal}</p>\n    </div>",
        notice = notice,
        year = current_year(),
        name = escape_html(&business.name),
        postal = escape_html(&business.postal_line),
    )
}

/// Notification sent to the operator for a contact submission
pub fn contact_notification(submission: &ContactSubmission, envelope: &Envelope<'_>) -> OutgoingMessage {
    let mut details = String::new();
    details.push_str(&detail_line("Name", &submission.name));
    details.push_str(&detail_line("Email", &submission.email));
    details.push_str(&detail_line("Message", &submission.message));

    let body = format!(
        "    <div class=\"content\">\n      <div class=\"details\">\n{}      </div>\n    </div>",
        details
    );

    OutgoingMessage {
        from_name: "Contact Form".to_string(),
        from_address: envelope.sender.to_string(),
        to: envelope.operator.to_string(),
        subject: format!("New Contact Form Submission from {}", submission.name),
        text: Some(format!(
            "Name: {}\nEmail: {}\nMessage: {}\n",
            submission.name, submission.email, submission.message
        )),
        html: html_document("New Contact Form Submission", &body),
    }
}

/// Auto-reply sent to the person who used the contact form
pub fn contact_acknowledgment(submission: &ContactSubmission, envelope: &Envelope<'_>) -> OutgoingMessage {
    let business = envelope.business;

    let text = format!(
        "Dear {name},\n\n\
         Thank you for reaching out to {biz}. We have received your message and our team will review it promptly.\n\n\
         We strive to respond to all inquiries within 24 hours during business days. If your matter requires immediate attention, please call us at {phone}.\n\n\
         Your Message Details:\n\
         - Name: {name}\n\
         - Email: {email}\n\
         - Message: {message}\n\n\
         Operating Hours:\n{hours}\n\n\
         For quick assistance:\n\
         - Technical Support: {phone}\n\
         - WhatsApp: {whatsapp}\n\
         - Email: {support}\n\n\
         Thank you for choosing {biz}. We appreciate your interest in our services.\n\n\
         Best regards,\n\
         Team {biz}\n",
        name = submission.name,
        email = submission.email,
        message = submission.message,
        biz = business.name,
        phone = business.support_phone,
        whatsapp = business.whatsapp,
        support = business.support_email,
        hours = OPERATING_HOURS_TEXT,
    );

    let mut details = String::new();
    details.push_str(&detail_line("Name", &submission.name));
    details.push_str(&detail_line("Email", &submission.email));
    details.push_str(&detail_line("Message", &submission.message));

    let body = format!(
        "    <div class=\"content\">\n      <p>Dear {name},</p>\n      <p>Thank you for reaching out to {biz}. We have received your message and our team will review it promptly.</p>\n      <p>We strive to respond to all inquiries within 24 hours during business days.</p>\n      <div class=\"details\">\n        <h3>Your Message Details:</h3>\n{details}      </div>\n{contact}    </div>\n{footer}",
        name = escape_html(&submission.name),
        biz = escape_html(&business.name),
        details = details,
        contact = contact_info_block(business),
        footer = footer_block(business, true),
    );

    OutgoingMessage {
        from_name: business.name.clone(),
        from_address: envelope.sender.to_string(),
        to: submission.email.clone(),
        subject: format!("Thank You for Contacting {}", business.name),
        text: Some(text),
        html: html_document("Thank You for Contacting Us", &body),
    }
}

/// Notification sent to the operator for a quote request.
/// Optional fields only appear when the requester filled them in.
pub fn quote_notification(submission: &QuoteSubmission, envelope: &Envelope<'_>) -> OutgoingMessage {
    let mut details = String::new();
    details.push_str(&detail_line("Name", &submission.name));
    details.push_str(&detail_line("Email", &submission.email));
    if let Some(phone) = &submission.phone {
        details.push_str(&detail_line("Phone", phone));
    }
    if let Some(address) = &submission.address {
        details.push_str(&detail_line("Address", address));
    }
    details.push_str(&detail_line("Selected Plan", &submission.plan));
    if let Some(message) = &submission.message {
        details.push_str(&detail_line("Message", message));
    }

    let body = format!(
        "    <div class=\"content\">\n      <div class=\"details\">\n        <h3>Customer Details:</h3>\n{}      </div>\n    </div>",
        details
    );

    OutgoingMessage {
        from_name: "Quote Request System".to_string(),
        from_address: envelope.sender.to_string(),
        to: envelope.operator.to_string(),
        subject: format!("New Quote Request - {} Plan", submission.plan),
        text: None,
        html: html_document("New Quote Request", &body),
    }
}

/// Confirmation sent to the person who requested a quote
pub fn quote_acknowledgment(submission: &QuoteSubmission, envelope: &Envelope<'_>) -> OutgoingMessage {
    let business = envelope.business;

    let mut details = String::new();
    details.push_str(&detail_line("Selected Plan", &submission.plan));
    details.push_str(&detail_line("Name", &submission.name));
    details.push_str(&detail_line("Email", &submission.email));

    let body = format!(
        "    <div class=\"content\">\n      <p>Dear {name},</p>\n      <p>Thank you for requesting a quote from {biz}. We have received your request for our {plan} plan.</p>\n      <div class=\"details\">\n        <h3>Your Request Details:</h3>\n{details}      </div>\n      <p>Our team will review your request and get back to you within 24 hours with a detailed quote.</p>\n{contact}    </div>\n{footer}",
        name = escape_html(&submission.name),
        biz = escape_html(&business.name),
        plan = escape_html(&submission.plan),
        details = details,
        contact = contact_info_block(business),
        footer = footer_block(business, false),
    );

    OutgoingMessage {
        from_name: business.name.clone(),
        from_address: envelope.sender.to_string(),
        to: submission.email.clone(),
        subject: format!("Thank You for Your Quote Request - {}", business.name),
        text: None,
        html: html_document("Thank You for Your Quote Request", &body),
    }
}
