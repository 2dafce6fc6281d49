use std::io;

use smsgate::{AppKey, MessageText, RawPhoneNumber, SendOptions, SendSms, SmsGateClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app_key = std::env::var("SMSGATE_APP_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSGATE_APP_KEY environment variable is required",
        )
    })?;
    let phone_raw = std::env::var("SMSGATE_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSGATE_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("SMSGATE_MESSAGE")
        .unwrap_or_else(|_| "Hello from the smsgate demo.".to_owned());

    let client = SmsGateClient::new(AppKey::new(app_key)?)?;
    let phone = RawPhoneNumber::new(phone_raw)?;
    let text = MessageText::new(message)?;
    let request = SendSms::to_many(vec![phone], text, SendOptions::default())?;

    let report = client.send_sms(request).await?;
    println!(
        "outcome: {:?}, accepted: {}/{}",
        report.outcome, report.success_count, report.total_items
    );
    for receipt in &report.receipts {
        println!(
            "  {:?} -> {:?} ({})",
            receipt.to.as_ref().map(|to| to.raw()),
            receipt.message_id.as_ref().map(|id| id.as_str()),
            receipt.status
        );
    }

    Ok(())
}
